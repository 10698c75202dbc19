use crate::domain::record::parse_record_date;
use crate::domain::{EarningsRecord, Snapshot};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

const UNSCHEDULED: &str = "Unscheduled";

/// One stop on the day-by-day timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub key: String,
    pub date: Option<NaiveDate>,
    pub count: usize,
    pub is_weekend: bool,
    pub anchor_id: String,
}

impl DayGroup {
    pub fn is_scheduled(&self) -> bool {
        self.key != UNSCHEDULED
    }

    /// "Tue, Oct 7", or the raw key when it is not a date.
    pub fn label(&self) -> String {
        match self.date {
            Some(d) => d.format("%a, %b %-d").to_string(),
            None => self.key.clone(),
        }
    }
}

/// Timeline key of a record: its date, or "Unscheduled".
pub fn day_key(record: &EarningsRecord) -> &str {
    match record.date.as_deref() {
        Some(d) if !d.is_empty() => d,
        _ => UNSCHEDULED,
    }
}

/// Groups records by date in first-appearance order.
pub fn group_by_day(records: &[EarningsRecord]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for record in records {
        let key = day_key(record);
        if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
            group.count += 1;
            continue;
        }

        let date = parse_record_date(Some(key));
        groups.push(DayGroup {
            key: key.to_string(),
            date,
            count: 1,
            is_weekend: date.is_some_and(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun)),
            anchor_id: if key == UNSCHEDULED {
                "day-unscheduled".to_string()
            } else {
                format!("day-{key}")
            },
        });
    }
    groups
}

/// Headline numbers and status text for a rendered preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    pub record_count: usize,
    pub day_count: usize,
    pub missing_count: usize,
    pub week_label: String,
    pub sector_label: Option<String>,
    pub updated: String,
}

impl PreviewSummary {
    pub fn from_snapshot(snapshot: &Snapshot, groups: &[DayGroup]) -> Self {
        let week_label = match snapshot.week_label() {
            "" => "selected weeks".to_string(),
            label => label.to_string(),
        };
        let sector_label = snapshot.sector.name().map(|name| {
            let suffix = if name.to_lowercase().contains("sector") {
                ""
            } else {
                " sector"
            };
            format!("{name}{suffix} ({} tracked)", snapshot.ticker_count)
        });

        Self {
            record_count: snapshot.records.len(),
            day_count: groups.iter().filter(|g| g.is_scheduled()).count(),
            missing_count: snapshot.missing_public.len(),
            week_label,
            sector_label,
            updated: format_updated(snapshot.generated_at.as_deref()),
        }
    }

    pub fn status_line(&self, count: u64) -> String {
        if count > 0 {
            format!("Found {count} companies for {}.", self.week_label)
        } else {
            format!("No scheduled earnings for {}.", self.week_label)
        }
    }

    pub fn match_count(&self) -> String {
        match (self.record_count, self.day_count) {
            (0, _) => "No matches".to_string(),
            (n, 0) => format!("{n} companies"),
            (n, 1) => format!("{n} companies - 1 day"),
            (n, d) => format!("{n} companies - {d} days"),
        }
    }

    pub fn coverage(&self) -> String {
        match self.missing_count {
            0 => "All tickers covered".to_string(),
            n => format!("{n} missing tickers"),
        }
    }
}

/// "Updated Oct 6, 6:00 AM" for a generation timestamp.
pub fn format_updated(generated_at: Option<&str>) -> String {
    let Some(raw) = generated_at.filter(|s| !s.is_empty()) else {
        return "Updated just now".to_string();
    };

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
    match parsed {
        Ok(dt) => format!("Updated {}", dt.format("%b %-d, %-I:%M %p")),
        Err(_) => format!("Updated {raw}"),
    }
}
