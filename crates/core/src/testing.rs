//! In-memory gateway used by the unit tests.

use crate::error::CalendarError;
use crate::gateway::SnapshotGateway;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FakeGateway {
    documents: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, path: impl Into<String>, value: Value) -> Self {
        self.documents.insert(path.into(), value.to_string().into_bytes());
        self
    }

    pub fn with_bytes(mut self, path: impl Into<String>, bytes: &[u8]) -> Self {
        self.documents.insert(path.into(), bytes.to_vec());
        self
    }

    /// Answers `path` with a 500 even if a document is registered.
    pub fn failing(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait::async_trait]
impl SnapshotGateway for FakeGateway {
    fn gateway_name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_bytes(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(path) {
            return Err(CalendarError::Request {
                path: path.to_string(),
                status: 500,
            }
            .into());
        }

        self.documents.get(path).cloned().ok_or_else(|| {
            CalendarError::Request {
                path: path.to_string(),
                status: 404,
            }
            .into()
        })
    }
}
