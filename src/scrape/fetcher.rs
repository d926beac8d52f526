use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

use crate::domain::{HikeUrl, ReviewPage};

use super::policy::ExtractionPolicy;

pub struct ReviewFetcher {
    client: Client,
    policy: ExtractionPolicy,
    timeout: Duration,
}

impl ReviewFetcher {
    pub fn new(client: Client, policy: ExtractionPolicy, timeout: Duration) -> Self {
        Self {
            client,
            policy,
            timeout,
        }
    }

    /// Loads the hike page, follows its reviews link and returns the comments.
    pub async fn fetch_reviews(&self, hike: &HikeUrl) -> Result<ReviewPage> {
        self.fetch_from(hike.url(), &hike.origin()).await
    }

    /// Relative reviews links resolve against `origin`.
    async fn fetch_from(&self, page: &Url, origin: &Url) -> Result<ReviewPage> {
        let body = self.get(page).await?;
        let review_link = {
            let document = Html::parse_document(&body);
            self.policy.find_review_link(&document, origin)
        };

        let Some(review_link) = review_link else {
            info!(target: "fetch", url = %page, "hike page has no reviews link");
            return Ok(ReviewPage::NoReviews);
        };

        debug!(target: "fetch", url = %review_link, "following reviews link");
        let body = self.get(&review_link).await?;
        let comments = self.policy.extract_comments(&Html::parse_document(&body));
        info!(target: "fetch", url = %review_link, comments = comments.len(), "reviews extracted");
        Ok(ReviewPage::Comments(comments))
    }

    async fn get(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("unexpected status from {}", url))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read body of {}", url))?;
        Ok(body)
    }
}
