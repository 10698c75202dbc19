use earnings_core::domain::{Preview, RecordSource};
use earnings_core::domain::record::normalize_session_label;
use earnings_core::preview::present::day_key;
use earnings_core::preview::{group_by_day, PreviewSummary};
use earnings_core::search::{SearchIndexEntry, SEARCH_DISPLAY_LIMIT};

pub fn print_suggestions(entries: &[SearchIndexEntry]) {
    if entries.is_empty() {
        println!("(no suggestions)");
        return;
    }
    for entry in entries {
        println!(
            "{:<8} {:<40} {:<12} {}",
            entry.symbol,
            entry.company,
            entry.date.as_deref().unwrap_or("TBD"),
            entry.week_label
        );
    }
}

pub fn print_search_results(query: &str, matches: &[SearchIndexEntry]) {
    if matches.is_empty() {
        println!("No upcoming earnings found for \"{query}\".");
        return;
    }

    for entry in matches.iter().take(SEARCH_DISPLAY_LIMIT) {
        println!(
            "{:<12} {:<8} {:<40} {:<5} {:<24} {}",
            entry.date.as_deref().unwrap_or("TBD"),
            entry.symbol,
            entry.company,
            normalize_session_label(entry.session.as_deref()),
            entry.sector,
            RecordSource::describe(entry.source.as_ref()),
        );
    }

    let n = matches.len();
    let plural = if n == 1 { "" } else { "es" };
    println!("Showing {n} match{plural} for \"{query}\".");
}

pub fn print_preview(preview: &Preview) {
    let snapshot = preview.snapshot();
    let groups = group_by_day(&snapshot.records);
    let summary = PreviewSummary::from_snapshot(snapshot, &groups);

    println!("{}", summary.status_line(snapshot.count));
    if let Some(sector) = &summary.sector_label {
        println!("{sector}");
    }
    println!("{} | {} | {}", summary.updated, summary.coverage(), summary.match_count());

    for group in &groups {
        let weekend = if group.is_weekend { " (weekend)" } else { "" };
        println!();
        println!("{} - {}{weekend}", group.label(), group.count);
        let day_records = snapshot
            .records
            .iter()
            .filter(|r| day_key(r) == group.key);
        for r in day_records {
            println!(
                "  {:<5} {:<8} {:<40} {}",
                normalize_session_label(r.session()),
                r.symbol,
                r.company,
                RecordSource::describe(r.source.as_ref()),
            );
        }
    }

    if !snapshot.missing_public.is_empty() {
        println!();
        println!("No public ticker, skipped:");
        for name in &snapshot.missing_public {
            println!("  {name}");
        }
    }

    print_names("Investor relations", &snapshot.ir_companies);
    print_names("Public aggregators", &snapshot.fallback_companies);

    if let Some(path) = preview.download_path() {
        println!();
        println!("Spreadsheet: {path}");
    }
}

fn print_names(title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for name in names {
        println!("  {name}");
    }
}
