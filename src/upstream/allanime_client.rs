use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::header;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::UpstreamConfig;

pub type DynUpstreamClient = Arc<dyn UpstreamClientTrait + Send + Sync>;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unexpected upstream response: {0}")]
    Format(String),
}

/// everything that actually goes over the wire, kept behind a trait so the pipeline can be tested
/// with canned bodies
#[automock]
#[async_trait]
pub trait UpstreamClientTrait {
    /// run a graphql query against the aggregator api, returns the raw body because parts of it
    /// are scraped as text
    async fn graphql(&self, variables: &str, query: &str) -> Result<String, UpstreamError>;

    /// fetch a decoded provider locator, these need the referer or they 403
    async fn fetch_provider(&self, url: &str) -> Result<String, UpstreamError>;

    /// fetch an hls manifest, only the user agent is sent here
    async fn fetch_playlist(&self, url: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct AllAnimeClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl AllAnimeClient {
    pub fn new(config: UpstreamConfig) -> Self {
        // the user agent is set on the client so every request masquerades the same way
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                error!("failed to build upstream client, falling back to default: {}", e);
                reqwest::Client::new()
            });

        info!(
            "upstream client ready (api: {}, host: {})",
            config.api_url, config.base_host
        );

        Self { http, config }
    }

    /// decoded locators are scraped text, a malformed one fails here instead of inside reqwest
    fn parse_url(url: &str) -> Result<url::Url, UpstreamError> {
        url::Url::parse(url)
            .map_err(|e| UpstreamError::Format(format!("invalid url {}: {}", url, e)))
    }

    async fn read_body(response: reqwest::Response) -> Result<String, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            error!("upstream returned status {} for {}", status, url);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        debug!("read {} bytes from upstream", body.len());
        Ok(body)
    }
}

#[async_trait]
impl UpstreamClientTrait for AllAnimeClient {
    async fn graphql(&self, variables: &str, query: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(format!("{}/api", self.config.api_url))
            .header(header::REFERER, &self.config.referer)
            .query(&[("variables", variables), ("query", query)])
            .send()
            .await
            .map_err(|e| {
                error!("graphql request failed: {}", e);
                UpstreamError::Transport(e)
            })?;

        Self::read_body(response).await
    }

    async fn fetch_provider(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(Self::parse_url(url)?)
            .header(header::REFERER, &self.config.referer)
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn fetch_playlist(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self.http.get(Self::parse_url(url)?).send().await?;

        Self::read_body(response).await
    }
}
