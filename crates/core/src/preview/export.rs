use crate::domain::record::normalize_session_label;
use crate::domain::{EarningsRecord, Preview, SectorFilter};
use crate::gateway::SnapshotGateway;

const CSV_HEADER: &str = "Date,Time,Ticker,Company,Sector,Source";

/// How the spreadsheet for a preview is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPlan {
    /// A file the site build already published.
    FetchFile { path: String, filename: String },
    /// Built locally from the preview's records.
    Generate { filename: String },
}

impl DownloadPlan {
    pub fn for_preview(preview: &Preview, sector: &SectorFilter) -> Self {
        match preview.download_path() {
            Some(path) => Self::FetchFile {
                path: path.to_string(),
                filename: path.rsplit('/').next().unwrap_or(path).to_string(),
            },
            None => Self::Generate {
                filename: format!("earnings_{}_range.csv", sector.slug()),
            },
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::FetchFile { filename, .. } | Self::Generate { filename } => filename,
        }
    }
}

/// A spreadsheet ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub async fn download(
    gateway: &dyn SnapshotGateway,
    preview: &Preview,
    sector: &SectorFilter,
) -> anyhow::Result<Download> {
    let plan = DownloadPlan::for_preview(preview, sector);
    let bytes = match &plan {
        DownloadPlan::FetchFile { path, .. } => gateway.fetch_bytes(path).await?,
        DownloadPlan::Generate { .. } => records_to_csv(&preview.snapshot().records).into_bytes(),
    };
    tracing::info!(filename = plan.filename(), bytes = bytes.len(), "spreadsheet ready");

    Ok(Download {
        filename: plan.filename().to_string(),
        bytes,
    })
}

/// Client-side spreadsheet. Only the company column is quoted.
pub fn records_to_csv(records: &[EarningsRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for r in records {
        lines.push(
            [
                r.date_str().to_string(),
                normalize_session_label(r.session()),
                r.symbol.clone(),
                format!("\"{}\"", r.company.replace('"', "\"\"")),
                r.sector.clone().unwrap_or_default(),
                r.source.as_ref().map(|s| s.as_str().to_string()).unwrap_or_default(),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}
