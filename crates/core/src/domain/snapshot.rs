use crate::domain::record::EarningsRecord;
use crate::domain::sector::SectorFilter;
use crate::domain::week::WeekRef;
use crate::domain::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of one preview document, for a single week or an aggregated range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<EarningsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_public: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ir_companies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fallback_companies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticker_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sector: SectorFilter,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sector_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<WeekRef>,

    // Keys added by newer generators; kept so a single week passes through whole.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn week_label(&self) -> &str {
        self.week.as_ref().map(|w| w.label.as_str()).unwrap_or("")
    }
}

/// Preview document exactly as published under `api/preview/`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    #[serde(rename = "downloadPath", default, skip_serializing_if = "Option::is_none")]
    pub download_path: Option<String>,
}

/// A resolved preview. Consumers branch on the variant to decide whether the
/// spreadsheet is a published file or must be built locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Precomputed {
        snapshot: Snapshot,
        download_path: String,
    },
    Aggregated {
        snapshot: Snapshot,
    },
}

impl Preview {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            Self::Precomputed { snapshot, .. } | Self::Aggregated { snapshot } => snapshot,
        }
    }

    pub fn into_snapshot(self) -> Snapshot {
        match self {
            Self::Precomputed { snapshot, .. } | Self::Aggregated { snapshot } => snapshot,
        }
    }

    pub fn download_path(&self) -> Option<&str> {
        match self {
            Self::Precomputed { download_path, .. } => Some(download_path),
            Self::Aggregated { .. } => None,
        }
    }

    pub fn into_document(self) -> SnapshotDocument {
        match self {
            Self::Precomputed {
                snapshot,
                download_path,
            } => SnapshotDocument {
                snapshot,
                download_path: Some(download_path),
            },
            Self::Aggregated { snapshot } => SnapshotDocument {
                snapshot,
                download_path: None,
            },
        }
    }
}

impl From<SnapshotDocument> for Preview {
    fn from(doc: SnapshotDocument) -> Self {
        match doc.download_path.filter(|p| !p.trim().is_empty()) {
            Some(download_path) => Self::Precomputed {
                snapshot: doc.snapshot,
                download_path,
            },
            None => Self::Aggregated {
                snapshot: doc.snapshot,
            },
        }
    }
}
