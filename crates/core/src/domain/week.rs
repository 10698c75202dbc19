use crate::domain::null_as_default;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A selectable calendar week. Ids are ISO dates, so lexicographic order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDescriptor {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The week stamp carried inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl From<&WeekDescriptor> for WeekRef {
    fn from(week: &WeekDescriptor) -> Self {
        Self {
            id: week.id.clone(),
            label: week.label.clone(),
            start_date: Some(week.start_date),
            end_date: Some(week.end_date),
        }
    }
}

/// "Oct 6" style label.
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
