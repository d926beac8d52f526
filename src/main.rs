mod app;
mod aspects;
mod config;
mod domain;
mod infrastructure;
mod nlp;
mod report;
mod scrape;
mod sentiment;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config.logging, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::HikeReviewApp::initialize(config, shutdown)?;
    app.run().await
}
