pub mod aggregate;
pub mod export;
pub mod present;

pub use aggregate::{merge_snapshots, resolve_range, RangeAggregator};
pub use export::{download, records_to_csv, Download, DownloadPlan};
pub use present::{group_by_day, DayGroup, PreviewSummary};
