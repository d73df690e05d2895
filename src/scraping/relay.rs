//! Page fetching with optional relay fallbacks
//!
//! The catalog site is fetched directly and, when that fails, through
//! a list of relay services that take the target URL as a parameter.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ScrapingConfig;
use crate::errors::{AppError, ScrapeError, ScrapeResult};
use crate::utils::http_client::{build_client, read_text, HttpClientOptions};
use crate::utils::UrlUtils;

/// Something that can return the body of a URL
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> ScrapeResult<String>;
}

pub struct RelayFetcher {
    client: Client,
    relays: Vec<String>,
    direct_first: bool,
}

impl RelayFetcher {
    pub fn new(client: Client, relays: Vec<String>, direct_first: bool) -> Self {
        Self {
            client,
            relays,
            direct_first,
        }
    }

    pub fn from_config(config: &ScrapingConfig, user_agent: &str) -> Result<Self, AppError> {
        let client = build_client(&HttpClientOptions::new(user_agent, config.timeout))?;
        Ok(Self::new(client, config.relays.clone(), config.direct_first))
    }

    /// Every URL that will be tried for `target`, in order
    ///
    /// The direct URL is always included; `direct_first` only decides
    /// whether it goes before or after the relays.
    pub fn attempt_urls(&self, target: &str) -> Vec<String> {
        let relayed = self
            .relays
            .iter()
            .map(|template| UrlUtils::build_relay_url(template, target));

        if self.direct_first {
            std::iter::once(target.to_string()).chain(relayed).collect()
        } else {
            relayed.chain(std::iter::once(target.to_string())).collect()
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await?;
        let body = read_text(response).await?;
        if body.trim().is_empty() {
            return Err(AppError::internal("empty response body"));
        }
        Ok(body)
    }
}

#[async_trait]
impl PageSource for RelayFetcher {
    async fn fetch_text(&self, target: &str) -> ScrapeResult<String> {
        let attempts = self.attempt_urls(target);
        let mut last_error = String::from("no attempts made");

        for (index, url) in attempts.iter().enumerate() {
            debug!(
                "Fetching {} (attempt {}/{})",
                UrlUtils::obfuscate_credentials(url),
                index + 1,
                attempts.len()
            );
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!(
                        "Fetch attempt {} for {} failed: {}",
                        index + 1,
                        UrlUtils::obfuscate_credentials(target),
                        e
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(ScrapeError::fetch_failed(target, attempts.len(), last_error))
    }
}
