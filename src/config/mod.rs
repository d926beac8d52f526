pub mod env;
mod loader;

pub use env::{AppConfig, AspectConfig, ConfigError, ModelConfig, SiteConfig};
pub use loader::load_config;
