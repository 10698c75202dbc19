use crate::domain::week::short_label;
use crate::domain::WeekDescriptor;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;

pub const DEFAULT_WEEKS_BACK: i64 = 1;
pub const DEFAULT_WEEKS_AHEAD: i64 = 12;

// Reporting weeks run Monday through Friday.
const TRADING_DAYS_AFTER_START: i64 = 4;

/// Calendar date on the US east coast, where the earnings sessions are timed.
pub fn today_eastern(now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.with_timezone(&New_York).date_naive()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Selectable weeks around `reference`, earliest first.
pub fn week_options(reference: NaiveDate, weeks_back: i64, weeks_ahead: i64) -> Vec<WeekDescriptor> {
    let base = week_start(reference);
    let mut out: Vec<WeekDescriptor> = (-weeks_back..weeks_ahead)
        .map(|offset| {
            let start = base + Duration::days(7 * offset);
            let end = start + Duration::days(TRADING_DAYS_AFTER_START);
            WeekDescriptor {
                id: start.to_string(),
                label: format!("Week of {} to {}", short_label(start), short_label(end)),
                start_date: start,
                end_date: end,
            }
        })
        .collect();
    out.sort_by_key(|w| w.start_date);
    out
}
