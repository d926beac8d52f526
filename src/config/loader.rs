use std::{collections::BTreeSet, env, path::PathBuf, str::FromStr, time::Duration};

use super::env::{
    AppConfig, AspectConfig, ConfigError, DirectoryConfig, LoggingConfig, ModelConfig, SiteConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&|key: &str| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    fn from_source(source: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(source);
        let defaults = SiteConfig::default();

        let area_codes = match vars.raw("AREA_CODES") {
            Some(value) => {
                let codes = value
                    .split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect::<BTreeSet<_>>();
                if codes.is_empty() {
                    return Err(ConfigError::Empty("AREA_CODES"));
                }
                codes
            }
            None => defaults.area_codes,
        };

        let site = SiteConfig {
            host: vars.non_empty("SITE_HOST").unwrap_or(defaults.host),
            area_codes,
            review_link_marker: vars
                .non_empty("REVIEW_LINK_MARKER")
                .unwrap_or(defaults.review_link_marker),
            comment_tag: vars.non_empty("COMMENT_TAG").unwrap_or(defaults.comment_tag),
            comment_marker: vars
                .non_empty("COMMENT_MARKER")
                .unwrap_or(defaults.comment_marker),
        };

        let models = ModelConfig {
            tokenizer_path: vars.path_or("TOKENIZER_PATH", "models/en_tokenizer.bin"),
            vectorizer_path: vars.path_or("VECTORIZER_PATH", "models/vectorizer.json"),
            classifier_path: vars.path_or("CLASSIFIER_PATH", "models/nb_model.json"),
        };

        let aspect_defaults = AspectConfig::default();
        let aspects = AspectConfig {
            top: vars.parse_or("TOP_ASPECTS", aspect_defaults.top)?,
            min_count: vars.parse_or("MIN_ASPECT_COUNT", aspect_defaults.min_count)?,
        };

        let directories = DirectoryConfig {
            logs_dir: vars.raw("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: vars.raw("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let fetch_timeout = Duration::from_millis(vars.parse_or("FETCH_TIMEOUT", 10_000u64)?);

        Ok(Self {
            site,
            models,
            aspects,
            directories,
            logging,
            fetch_timeout,
        })
    }
}

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.raw(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn path_or(&self, key: &str, default: &str) -> PathBuf {
        PathBuf::from(self.non_empty(key).unwrap_or_else(|| default.to_string()))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.non_empty(key) {
            Some(value) => value
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }
}
