use crate::search::normalize::normalize;
use crate::search::SearchIndexEntry;
use chrono::NaiveDate;
use std::collections::HashSet;

pub const SUGGESTION_LIMIT: usize = 8;

/// Match tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    SymbolPrefix,
    SymbolSubstring,
    CompanyPrefix,
    CompanySubstring,
}

#[derive(Debug)]
struct Candidate<'a> {
    entry: &'a SearchIndexEntry,
    rank: MatchRank,
    rank_index: usize,
    date: Option<NaiveDate>,
}

impl Candidate<'_> {
    // Undated entries sort last within their tier.
    fn sort_key(&self) -> (MatchRank, usize, bool, Option<NaiveDate>) {
        (self.rank, self.rank_index, self.date.is_none(), self.date)
    }
}

/// Autosuggest shortlist: one entry per (company, symbol) pair, best match first.
pub fn suggest(query: &str, index: &[SearchIndexEntry]) -> Vec<SearchIndexEntry> {
    suggest_with_limit(query, index, SUGGESTION_LIMIT)
}

pub fn suggest_with_limit(
    query: &str,
    index: &[SearchIndexEntry],
    limit: usize,
) -> Vec<SearchIndexEntry> {
    let target = normalize(query);
    if target.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut candidates: Vec<Candidate<'_>> = Vec::new();

    for entry in index {
        let symbol_index = normalize(&entry.symbol).find(&target);
        let company_index = normalize(&entry.company).find(&target);
        let Some((rank, rank_index)) = classify(symbol_index, company_index) else {
            continue;
        };

        // First occurrence in index order wins the pair.
        if !seen.insert((entry.company.as_str(), entry.symbol.as_str())) {
            continue;
        }

        candidates.push(Candidate {
            entry,
            rank,
            rank_index,
            date: entry.scheduled_date(),
        });
    }

    candidates.sort_by_key(Candidate::sort_key);
    candidates
        .into_iter()
        .take(limit)
        .map(|c| c.entry.clone())
        .collect()
}

fn classify(symbol_index: Option<usize>, company_index: Option<usize>) -> Option<(MatchRank, usize)> {
    match (symbol_index, company_index) {
        (Some(0), _) => Some((MatchRank::SymbolPrefix, 0)),
        (Some(i), _) => Some((MatchRank::SymbolSubstring, i)),
        (None, Some(0)) => Some((MatchRank::CompanyPrefix, 0)),
        (None, Some(i)) => Some((MatchRank::CompanySubstring, i)),
        (None, None) => None,
    }
}
