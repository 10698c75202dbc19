use crate::domain::record::parse_record_date;
use crate::domain::RecordSource;
use chrono::NaiveDate;
use serde::Serialize;

pub mod index;
pub mod lookup;
pub mod normalize;
pub mod sequencer;
pub mod suggest;

pub use index::SearchIndex;
pub use lookup::{search, SEARCH_DISPLAY_LIMIT};
pub use normalize::normalize;
pub use sequencer::{QuerySequencer, QueryTicket};
pub use suggest::{suggest, SUGGESTION_LIMIT};

/// One record flattened together with the week it was published for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchIndexEntry {
    pub company: String,
    pub symbol: String,
    pub date: Option<String>,
    pub sector: String,
    pub source: Option<RecordSource>,
    pub session: Option<String>,
    pub week_id: String,
    pub week_label: String,
}

impl SearchIndexEntry {
    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        parse_record_date(self.date.as_deref())
    }
}
