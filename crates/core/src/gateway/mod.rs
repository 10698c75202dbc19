use crate::config::Settings;
use crate::domain::SnapshotDocument;
use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;

pub mod dir;
pub mod http;

pub use dir::DirGateway;
pub use http::HttpGateway;

/// Published list of selectable weeks.
pub const WEEKS_PATH: &str = "api/weeks.json";

/// Relative path of one preview document.
pub fn preview_path(week_id: &str, sector_slug: &str) -> String {
    format!("api/preview/{week_id}/{sector_slug}.json")
}

/// Read-only access to the published calendar tree. Every call is a fresh
/// read; implementations never cache and never retry.
#[async_trait::async_trait]
pub trait SnapshotGateway: Send + Sync {
    fn gateway_name(&self) -> &'static str;

    /// Fails with `CalendarError::Request` on a non-success status.
    async fn fetch_bytes(&self, path: &str) -> anyhow::Result<Vec<u8>>;

    async fn fetch_json(&self, path: &str) -> anyhow::Result<Value> {
        let bytes = self.fetch_bytes(path).await?;
        serde_json::from_slice::<Value>(&bytes)
            .with_context(|| format!("response for {path} is not valid JSON"))
    }
}

/// Picks the configured source; a base URL wins over a data directory.
pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn SnapshotGateway>> {
    if settings.base_url.is_some() {
        return Ok(Arc::new(HttpGateway::from_settings(settings)?));
    }
    if settings.data_dir.is_some() {
        return Ok(Arc::new(DirGateway::from_settings(settings)?));
    }
    anyhow::bail!("either EARNINGS_BASE_URL or EARNINGS_DATA_DIR is required")
}

/// Fetches and decodes one preview document.
pub async fn fetch_document(
    gateway: &dyn SnapshotGateway,
    path: &str,
) -> anyhow::Result<SnapshotDocument> {
    let raw = gateway.fetch_json(path).await?;
    serde_json::from_value::<SnapshotDocument>(raw)
        .with_context(|| format!("failed to parse preview document {path}"))
}
