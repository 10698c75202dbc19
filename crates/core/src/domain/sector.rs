use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;

const ALL_SECTORS_LABEL: &str = "All";
pub const ALL_SECTORS_SLUG: &str = "all";

// Same unreserved set as the browser's encodeURIComponent.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Sector a snapshot was generated for. On the wire this is a plain string,
/// with `"All"` standing for the unfiltered snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectorFilter {
    #[default]
    AllSectors,
    Named(String),
}

impl SectorFilter {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed == ALL_SECTORS_LABEL || trimmed.is_empty() {
            Self::AllSectors
        } else {
            Self::Named(trimmed.to_string())
        }
    }

    pub fn slug(&self) -> String {
        match self {
            Self::AllSectors => ALL_SECTORS_SLUG.to_string(),
            Self::Named(name) => to_sector_slug(name),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::AllSectors => None,
            Self::Named(name) => Some(name),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::AllSectors)
    }
}

impl From<String> for SectorFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SectorFilter> for String {
    fn from(value: SectorFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SectorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllSectors => f.write_str(ALL_SECTORS_LABEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// URL-safe sector identifier used in preview paths.
pub fn to_sector_slug(value: &str) -> String {
    let dashed = value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    utf8_percent_encode(&dashed, COMPONENT).to_string()
}
