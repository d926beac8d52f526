use std::fmt;

use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("not a url: {0}")]
    Parse(#[from] url::ParseError),
    #[error("scheme must be https, got {0}")]
    Scheme(String),
    #[error("host must be {expected}, got {actual}")]
    Host { expected: String, actual: String },
    #[error("unknown area code {0:?}")]
    AreaCode(String),
}

/// A hike page URL that passed validation against the configured site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HikeUrl {
    raw: String,
    url: Url,
}

impl HikeUrl {
    pub fn parse(input: &str, site: &SiteConfig) -> Result<Self, UrlError> {
        let raw = input.trim();
        let url = Url::parse(raw)?;

        if url.scheme() != "https" {
            return Err(UrlError::Scheme(url.scheme().to_string()));
        }

        // `Url` lowercases the host, drops a default port and collapses dot
        // segments, so host and area code are read from the text as typed.
        let (netloc, path) = split_authority(raw);
        if netloc != site.host {
            return Err(UrlError::Host {
                expected: site.host.clone(),
                actual: netloc.to_string(),
            });
        }

        let area = path.split('/').nth(1).unwrap_or_default();
        if !site.area_codes.contains(area) {
            return Err(UrlError::AreaCode(area.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `https://host` base used to absolutize links found on the page.
    pub fn origin(&self) -> Url {
        let mut origin = self.url.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        origin
    }
}

/// Splits `scheme://netloc/path?query#fragment` into the raw netloc and path.
fn split_authority(raw: &str) -> (&str, &str) {
    let rest = raw.split_once("://").map_or("", |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, ""),
    }
}

impl fmt::Display for HikeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
