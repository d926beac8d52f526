use std::{collections::BTreeSet, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_SITE_HOST: &str = "www.hikingupward.com";
pub const DEFAULT_AREA_CODES: &[&str] = &[
    "GWNF", "GSMNP", "JNF", "MNF", "NNF", "PNF", "SNP", "WMNF", "UNF",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub models: ModelConfig,
    pub aspects: AspectConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub host: String,
    pub area_codes: BTreeSet<String>,
    pub review_link_marker: String,
    /// CSS selector for candidate comment elements.
    pub comment_tag: String,
    /// Text the serialized comment element must contain.
    pub comment_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SITE_HOST.to_string(),
            area_codes: DEFAULT_AREA_CODES.iter().map(|code| code.to_string()).collect(),
            review_link_marker: "all_reviews".to_string(),
            comment_tag: "font".to_string(),
            comment_marker: r#"font size="1""#.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// nlprule tokenizer binary (`en_tokenizer.bin`).
    pub tokenizer_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct AspectConfig {
    pub top: usize,
    pub min_count: usize,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            top: 3,
            min_count: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} must list at least one entry")]
    Empty(&'static str),
    #[error("invalid comment selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}
