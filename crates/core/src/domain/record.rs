use crate::domain::null_as_default;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One company's earnings event as published in a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EarningsRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    /// ISO date; absent means unscheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmo_amc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nasdaq_time_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RecordSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir_source_url: Option<String>,

    // Upstream columns we carry through untouched (eps, fiscal quarter, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EarningsRecord {
    /// Raw session-timing label, preferring `bmo_amc`.
    pub fn session(&self) -> Option<&str> {
        non_empty(self.bmo_amc.as_deref()).or_else(|| non_empty(self.nasdaq_time_label.as_deref()))
    }

    pub fn date_str(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        parse_record_date(self.date.as_deref())
    }

    pub fn has_sector(&self) -> bool {
        non_empty(self.sector.as_deref()).is_some()
    }
}

/// Where a record's schedule came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordSource {
    InvestorRelations,
    Aggregator,
    Other(String),
}

impl RecordSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvestorRelations => "investor_relations",
            Self::Aggregator => "aggregator",
            Self::Other(raw) => raw,
        }
    }

    pub fn describe(source: Option<&RecordSource>) -> String {
        match source {
            None => "Source unconfirmed".to_string(),
            Some(Self::Other(raw)) if raw.is_empty() => "Source unconfirmed".to_string(),
            Some(Self::InvestorRelations) => "Investor relations".to_string(),
            Some(Self::Aggregator) => "Public aggregators".to_string(),
            Some(Self::Other(raw)) => raw.replace(['_', '-'], " "),
        }
    }
}

impl From<String> for RecordSource {
    fn from(value: String) -> Self {
        match value.as_str() {
            "investor_relations" => Self::InvestorRelations,
            "aggregator" => Self::Aggregator,
            _ => Self::Other(value),
        }
    }
}

impl From<RecordSource> for String {
    fn from(value: RecordSource) -> Self {
        value.as_str().to_string()
    }
}

/// Parses a record date. Accepts plain ISO dates and full RFC 3339 timestamps.
pub fn parse_record_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = non_empty(raw)?;
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Maps upstream session labels onto the BMO/AMC wording.
pub fn normalize_session_label(raw: Option<&str>) -> String {
    let Some(value) = non_empty(raw.map(str::trim)) else {
        return "TBD".to_string();
    };

    let key = value
        .to_lowercase()
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    match key.as_str() {
        "time-after-hours" | "after-hours" | "afterhours" => "AMC".to_string(),
        "time-pre-market" | "pre-market" | "premarket" => "BMO".to_string(),
        "bmo" | "amc" => value.to_uppercase(),
        _ => value.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
