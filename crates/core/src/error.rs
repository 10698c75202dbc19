use std::fmt;

/// Failures the calendar surfaces to the user as a status message.
///
/// Async operations return `anyhow::Result` and carry these values inside the
/// `anyhow::Error`; recover them with `err.downcast_ref::<CalendarError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// A fetch returned a non-success status.
    Request { path: String, status: u16 },
    /// The week range does not resolve against the known weeks, or start follows end.
    InvalidRange { start: String, end: String },
    /// Every fetch of a multi-week aggregation failed.
    NoData { sector: String, weeks: usize },
    /// The query is empty once normalized.
    EmptyQuery,
}

impl CalendarError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { status, .. } => write!(f, "Request failed ({status})"),
            Self::InvalidRange { .. } => write!(f, "Start week must be before end week."),
            Self::NoData { .. } => write!(f, "No data found for selected range."),
            Self::EmptyQuery => write!(f, "Enter a company name or ticker to search."),
        }
    }
}

impl std::error::Error for CalendarError {}
