//! HTTP(S) source for response sheets published online.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Url;
use tracing::instrument;

use gatescore_core::traits::DocumentSource;

use crate::config::HttpConfig;
use crate::error::SourceError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches a document over HTTP(S) with a browser-like request.
///
/// The body is decoded using the charset from `Content-Type`, falling back
/// to UTF-8.
#[derive(Debug)]
pub struct HttpSource {
    url: Url,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str, config: &HttpConfig) -> Result<Self, SourceError> {
        let url = Url::parse(url.trim()).map_err(|_| SourceError::InvalidUrl(url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl(url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url,
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Whether a location should be fetched over the network.
pub fn is_url(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_secs)
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: self.describe(),
            }
            .into());
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(format!("failed to read body: {e}"))
            }
        })?;
        tracing::debug!("fetched {} bytes", body.len());
        Ok(body)
    }
}
