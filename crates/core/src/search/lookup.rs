use crate::error::CalendarError;
use crate::search::normalize::normalize;
use crate::search::SearchIndexEntry;
use std::cmp::Ordering;

/// How many matches a results list shows.
pub const SEARCH_DISPLAY_LIMIT: usize = 40;

/// Every index entry whose company or ticker contains the query, earliest
/// date first. Repeats across weeks are kept.
///
/// A query with nothing searchable in it is `CalendarError::EmptyQuery`,
/// which callers show as a prompt rather than as "no matches".
pub fn search(
    query: &str,
    index: &[SearchIndexEntry],
) -> Result<Vec<SearchIndexEntry>, CalendarError> {
    let target = normalize(query);
    if target.is_empty() {
        return Err(CalendarError::EmptyQuery);
    }

    let mut matches: Vec<(Option<chrono::NaiveDate>, &SearchIndexEntry)> = index
        .iter()
        .filter(|entry| {
            normalize(&entry.company).contains(&target) || normalize(&entry.symbol).contains(&target)
        })
        .map(|entry| (entry.scheduled_date(), entry))
        .collect();

    matches.sort_by(|(a_date, a), (b_date, b)| match (a_date, b_date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.week_label.cmp(&b.week_label),
    });

    Ok(matches.into_iter().map(|(_, entry)| entry.clone()).collect())
}
