use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info, warn};

use crate::{
    aspects::rank_aspects,
    config::{AppConfig, AspectConfig, SiteConfig},
    domain::{HikeUrl, Report, ReviewPage},
    infrastructure::shutdown::{Shutdown, ShutdownListener},
    nlp::{DependencyParser, NlpruleTagger, PosTagger, RuleParser},
    report,
    scrape::{ExtractionPolicy, ReviewFetcher},
    sentiment::{classify_comments, ModelScorer, SentenceScorer},
};

const PROMPT: &str = "Please enter the url for the hikingupward.com hike.";
const INVALID_URL: &str = "Please enter a valid url for a hike on hikingupward.com.";
const EXIT_WORDS: &[&str] = &["exit", "quit"];

pub struct HikeReviewApp {
    config: AppConfig,
    fetcher: ReviewFetcher,
    scorer: Box<dyn SentenceScorer>,
    parser: Box<dyn DependencyParser>,
    shutdown: Shutdown,
}

impl HikeReviewApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(format!("hike-reviews/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let policy = ExtractionPolicy::from_site(&config.site)?;
        let fetcher = ReviewFetcher::new(http_client, policy, config.fetch_timeout);

        let tagger: Arc<dyn PosTagger> =
            Arc::new(NlpruleTagger::load(&config.models.tokenizer_path)?);
        let scorer = ModelScorer::load(&config.models, Arc::clone(&tagger))
            .context("failed to load sentiment model")?;
        info!(
            target: "app",
            tokenizer = %config.models.tokenizer_path.display(),
            vectorizer = %config.models.vectorizer_path.display(),
            classifier = %config.models.classifier_path.display(),
            "models loaded"
        );

        Ok(Self {
            config,
            fetcher,
            scorer: Box::new(scorer),
            parser: Box::new(RuleParser::new(tagger)),
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let mut shutdown = self.shutdown.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = io::stdout();

        while let Some(hike) =
            prompt_for_hike(&mut lines, &self.config.site, &mut stdout, &mut shutdown).await?
        {
            info!(target: "app", url = %hike, "analysing hike");
            let page = tokio::select! {
                page = self.fetcher.fetch_reviews(&hike) => page?,
                signal = shutdown.notified() => {
                    warn!(target: "app", url = %hike, ?signal, "fetch abandoned");
                    break;
                }
            };

            let report = analyze(
                &page,
                self.scorer.as_ref(),
                self.parser.as_ref(),
                &self.config.aspects,
            );
            for line in report::render(&report) {
                writeln!(stdout, "{line}")?;
            }
            stdout.flush()?;
        }

        info!(target: "app", "session ended");
        Ok(())
    }
}

/// Prompts until a line passes URL validation. `None` means the session is
/// over: an exit word, end of input or a shutdown signal.
pub async fn prompt_for_hike<R, W>(
    lines: &mut Lines<R>,
    site: &SiteConfig,
    out: &mut W,
    shutdown: &mut ShutdownListener,
) -> Result<Option<HikeUrl>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        writeln!(out, "{PROMPT}")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read from stdin")?,
            _ = shutdown.notified() => return Ok(None),
        };
        let Some(line) = line else {
            return Ok(None);
        };
        if EXIT_WORDS.contains(&line.trim()) {
            return Ok(None);
        }

        match HikeUrl::parse(&line, site) {
            Ok(hike) => return Ok(Some(hike)),
            Err(err) => {
                debug!(target: "app", input = %line.trim(), error = %err, "rejected url");
                writeln!(out, "{INVALID_URL}")?;
            }
        }
    }
}

/// Everything after the fetch: sentence buckets, then aspect ranking per bucket.
pub fn analyze(
    page: &ReviewPage,
    scorer: &dyn SentenceScorer,
    parser: &dyn DependencyParser,
    aspects: &AspectConfig,
) -> Report {
    let buckets = classify_comments(page.comments(), scorer);
    if buckets.is_empty() {
        debug!(target: "app", comments = page.comments().len(), "no labelled sentences");
    }
    Report {
        liked: rank_aspects(&buckets.good, parser, aspects),
        disliked: rank_aspects(&buckets.bad, parser, aspects),
    }
}
