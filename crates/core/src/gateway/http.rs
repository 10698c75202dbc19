use crate::config::Settings;
use crate::error::CalendarError;
use crate::gateway::SnapshotGateway;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_base_url()?;
        Self::new(base_url, settings.http_timeout_secs)
    }

    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(no_store_headers());
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build calendar http client")?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Snapshots change between site builds; never accept a cached copy.
fn no_store_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

#[async_trait::async_trait]
impl SnapshotGateway for HttpGateway {
    fn gateway_name(&self) -> &'static str {
        "http"
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("calendar request failed: {url}"))?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "calendar request rejected");
            return Err(CalendarError::Request {
                path: path.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = res
            .bytes()
            .await
            .with_context(|| format!("failed to read calendar response: {url}"))?;
        Ok(body.to_vec())
    }
}
