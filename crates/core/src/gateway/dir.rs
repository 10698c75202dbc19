use crate::config::Settings;
use crate::error::CalendarError;
use crate::gateway::SnapshotGateway;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves the published tree from a local directory, e.g. a checkout of the
/// generated `docs/` folder.
#[derive(Debug, Clone)]
pub struct DirGateway {
    root: PathBuf,
}

impl DirGateway {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.require_data_dir()?))
    }

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let rel = Path::new(path.trim_start_matches('/'));
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(rel))
    }
}

#[async_trait::async_trait]
impl SnapshotGateway for DirGateway {
    fn gateway_name(&self) -> &'static str {
        "dir"
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let Some(full) = self.resolve(path) else {
            return Err(CalendarError::Request {
                path: path.to_string(),
                status: 400,
            }
            .into());
        };

        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(CalendarError::Request {
                path: path.to_string(),
                status: 404,
            }
            .into()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", full.display()))
            }
        }
    }
}
