use crate::domain::week::short_label;
use crate::domain::{Preview, SectorFilter, Snapshot, WeekDescriptor, WeekRef};
use crate::error::CalendarError;
use crate::gateway::{fetch_document, preview_path, SnapshotGateway};
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Builds the preview for a sector over an inclusive range of weeks.
pub struct RangeAggregator {
    gateway: Arc<dyn SnapshotGateway>,
    weeks: Arc<[WeekDescriptor]>,
}

impl RangeAggregator {
    pub fn new(gateway: Arc<dyn SnapshotGateway>, weeks: impl Into<Arc<[WeekDescriptor]>>) -> Self {
        Self {
            gateway,
            weeks: weeks.into(),
        }
    }

    /// A single week is the published document as-is, with the requested
    /// sector slug stamped on. Longer ranges fetch every week, drop the ones
    /// that fail and merge the rest; only a range where nothing loads is an
    /// error.
    pub async fn aggregate(
        &self,
        sector: &SectorFilter,
        start_week_id: &str,
        end_week_id: &str,
    ) -> anyhow::Result<Preview> {
        let range = resolve_range(&self.weeks, start_week_id, end_week_id)?;
        let slug = sector.slug();

        if let [week] = range {
            let path = preview_path(&week.id, &slug);
            let mut doc = fetch_document(self.gateway.as_ref(), &path).await?;
            doc.snapshot.sector_slug = slug;
            return Ok(Preview::from(doc));
        }

        let gateway = self.gateway.as_ref();
        let fetches = range.iter().map(|week| {
            let path = preview_path(&week.id, &slug);
            async move {
                let res = fetch_document(gateway, &path).await;
                (week, path, res)
            }
        });

        let mut loaded = Vec::with_capacity(range.len());
        for (week, path, res) in join_all(fetches).await {
            match res {
                Ok(doc) => loaded.push(doc.snapshot),
                Err(err) => {
                    tracing::warn!(week_id = %week.id, %path, error = %err, "week missing from range preview");
                }
            }
        }

        if loaded.is_empty() {
            return Err(CalendarError::NoData {
                sector: sector.to_string(),
                weeks: range.len(),
            }
            .into());
        }

        tracing::debug!(
            %sector,
            weeks = range.len(),
            loaded = loaded.len(),
            "merging range preview"
        );

        let snapshot = merge_snapshots(sector, range, loaded);
        Ok(Preview::Aggregated { snapshot })
    }
}

/// The weeks from `start_week_id` through `end_week_id`, inclusive.
pub fn resolve_range<'a>(
    weeks: &'a [WeekDescriptor],
    start_week_id: &str,
    end_week_id: &str,
) -> Result<&'a [WeekDescriptor], CalendarError> {
    let invalid = || CalendarError::InvalidRange {
        start: start_week_id.to_string(),
        end: end_week_id.to_string(),
    };

    let start = weeks
        .iter()
        .position(|w| w.id == start_week_id)
        .ok_or_else(invalid)?;
    let end = weeks
        .iter()
        .position(|w| w.id == end_week_id)
        .ok_or_else(invalid)?;

    if start > end {
        return Err(invalid());
    }
    Ok(&weeks[start..=end])
}

/// Merges successfully loaded week snapshots, in range order, into one
/// client-side preview.
///
/// `range` must be non-empty and `snapshots` must be non-empty.
pub fn merge_snapshots(
    sector: &SectorFilter,
    range: &[WeekDescriptor],
    snapshots: Vec<Snapshot>,
) -> Snapshot {
    let mut records = Vec::new();
    let mut missing_public = BTreeSet::new();
    let mut ir_companies = BTreeSet::new();
    let mut fallback_companies = BTreeSet::new();
    let mut count: u64 = 0;

    let ticker_count = snapshots.first().map(|s| s.ticker_count).unwrap_or(0);
    let generated_at = snapshots.first().and_then(|s| s.generated_at.clone());

    for snapshot in snapshots {
        let week_sector = snapshot.sector.name().map(str::to_string);
        records.extend(snapshot.records.into_iter().map(|mut record| {
            if let Some(name) = &week_sector {
                if !record.has_sector() {
                    record.sector = Some(name.clone());
                }
            }
            record
        }));
        missing_public.extend(snapshot.missing_public);
        ir_companies.extend(snapshot.ir_companies);
        fallback_companies.extend(snapshot.fallback_companies);
        count += snapshot.count;
    }

    records.sort_by(|a, b| {
        a.date_str()
            .cmp(b.date_str())
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let week = match (range.first(), range.last()) {
        (Some(first), Some(last)) => Some(WeekRef {
            id: format!("{}...{}", first.id, last.id),
            label: format!(
                "Weeks of {} to {}",
                short_label(first.start_date),
                short_label(last.end_date)
            ),
            start_date: Some(first.start_date),
            end_date: Some(last.end_date),
        }),
        _ => None,
    };

    Snapshot {
        records,
        count,
        missing_public: missing_public.into_iter().collect(),
        ir_companies: ir_companies.into_iter().collect(),
        fallback_companies: fallback_companies.into_iter().collect(),
        ticker_count,
        generated_at,
        sector: sector.clone(),
        sector_slug: sector.slug(),
        week,
        extra: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SnapshotDocument;
    use crate::testing::FakeGateway;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn weeks() -> Vec<WeekDescriptor> {
        [6, 13, 20]
            .into_iter()
            .map(|day| {
                let start = NaiveDate::from_ymd_opt(2025, 10, day).unwrap();
                WeekDescriptor {
                    id: start.to_string(),
                    label: format!("Week of {start}"),
                    start_date: start,
                    end_date: start + chrono::Duration::days(4),
                }
            })
            .collect()
    }

    fn tech_week(day: u32, records: Value, missing: &[&str], count: u64) -> Value {
        json!({
            "records": records,
            "count": count,
            "missingPublic": missing,
            "irCompanies": ["Acme Robotics"],
            "fallbackCompanies": [],
            "tickerCount": 40 + day,
            "generatedAt": format!("2025-10-{day:02}T06:00:00Z"),
            "sector": "Technology",
            "sectorSlug": "technology",
            "week": {"id": format!("2025-10-{day:02}"), "label": format!("Week {day}")},
            "downloadPath": format!("downloads/2025-10-{day:02}/earnings_technology_2025-10-{day:02}.csv")
        })
    }

    fn gateway() -> FakeGateway {
        FakeGateway::new()
            .with_json(
                "api/preview/2025-10-06/technology.json",
                tech_week(
                    6,
                    json!([
                        {"company": "Zeta Systems", "symbol": "ZETA", "date": "2025-10-08"},
                        {"company": "Acme Robotics", "symbol": "ACME", "date": "2025-10-08", "sector": "Hardware"}
                    ]),
                    &["Private B", "Private A"],
                    2,
                ),
            )
            .with_json(
                "api/preview/2025-10-13/technology.json",
                tech_week(
                    13,
                    json!([
                        {"company": "Unscheduled Co", "symbol": "UNS"},
                        {"company": "Beta Labs", "symbol": "BETA", "date": "2025-10-14"}
                    ]),
                    &["Private A", "Private C"],
                    5,
                ),
            )
            .with_json(
                "api/preview/2025-10-20/technology.json",
                tech_week(20, json!([]), &[], 0),
            )
    }

    fn tech() -> SectorFilter {
        SectorFilter::Named("Technology".to_string())
    }

    #[test]
    fn resolves_inclusive_ranges() {
        let weeks = weeks();
        let range = resolve_range(&weeks, "2025-10-06", "2025-10-13").unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(resolve_range(&weeks, "2025-10-13", "2025-10-13").unwrap().len(), 1);
    }

    #[test]
    fn rejects_reversed_or_unknown_ranges() {
        let weeks = weeks();
        assert!(matches!(
            resolve_range(&weeks, "2025-10-20", "2025-10-06"),
            Err(CalendarError::InvalidRange { .. })
        ));
        assert!(matches!(
            resolve_range(&weeks, "2099-01-05", "2025-10-06"),
            Err(CalendarError::InvalidRange { .. })
        ));
        assert!(matches!(
            resolve_range(&weeks, "2025-10-06", "nope"),
            Err(CalendarError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_range_fails_before_any_fetch() {
        let gw = Arc::new(gateway());
        let agg = RangeAggregator::new(gw.clone(), weeks());
        let err = agg
            .aggregate(&tech(), "2025-10-20", "2025-10-06")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalendarError>(),
            Some(CalendarError::InvalidRange { .. })
        ));
        assert_eq!(gw.total_calls(), 0);
    }

    #[tokio::test]
    async fn single_week_is_the_published_document_with_slug_stamped() {
        let mut published = tech_week(6, json!([{"company": "Zeta Systems", "symbol": "ZETA"}]), &[], 1);
        published["sectorSlug"] = json!("something-else");
        let gw = FakeGateway::new().with_json("api/preview/2025-10-06/technology.json", published.clone());
        let agg = RangeAggregator::new(Arc::new(gw), weeks());

        let preview = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-06")
            .await
            .unwrap();

        let mut expected: SnapshotDocument = serde_json::from_value(published).unwrap();
        expected.snapshot.sector_slug = "technology".to_string();
        assert_eq!(preview, Preview::from(expected));
        assert!(preview.download_path().is_some());
    }

    #[tokio::test]
    async fn single_week_fetch_failure_propagates() {
        let gw = FakeGateway::new().failing("api/preview/2025-10-06/technology.json");
        let agg = RangeAggregator::new(Arc::new(gw), weeks());
        let err = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-06")
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CalendarError>().and_then(CalendarError::status),
            Some(500)
        );
    }

    #[tokio::test]
    async fn merges_multi_week_range() {
        let agg = RangeAggregator::new(Arc::new(gateway()), weeks());
        let preview = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-20")
            .await
            .unwrap();

        assert_eq!(preview.download_path(), None);
        let s = preview.snapshot();

        let order: Vec<_> = s.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["UNS", "ACME", "ZETA", "BETA"]);
        assert_eq!(s.count, 7);
        assert_eq!(s.missing_public, vec!["Private A", "Private B", "Private C"]);
        assert_eq!(s.ir_companies, vec!["Acme Robotics"]);
        assert!(s.fallback_companies.is_empty());
        assert_eq!(s.ticker_count, 46);
        assert_eq!(s.generated_at.as_deref(), Some("2025-10-06T06:00:00Z"));
        assert_eq!(s.sector_slug, "technology");

        let week = s.week.as_ref().unwrap();
        assert_eq!(week.id, "2025-10-06...2025-10-20");
        assert_eq!(week.label, "Weeks of Oct 6 to Oct 24");
    }

    #[tokio::test]
    async fn backfills_sector_only_when_missing() {
        let agg = RangeAggregator::new(Arc::new(gateway()), weeks());
        let preview = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-13")
            .await
            .unwrap();
        let sector_of = |symbol: &str| {
            preview
                .snapshot()
                .records
                .iter()
                .find(|r| r.symbol == symbol)
                .and_then(|r| r.sector.clone())
        };
        assert_eq!(sector_of("ACME").as_deref(), Some("Hardware"));
        assert_eq!(sector_of("ZETA").as_deref(), Some("Technology"));
        assert_eq!(sector_of("UNS").as_deref(), Some("Technology"));
    }

    #[tokio::test]
    async fn all_sector_snapshots_do_not_backfill() {
        let gw = FakeGateway::new()
            .with_json(
                "api/preview/2025-10-06/all.json",
                json!({"sector": "All", "count": 1, "records": [{"company": "Zeta Systems", "symbol": "ZETA"}]}),
            )
            .with_json(
                "api/preview/2025-10-13/all.json",
                json!({"sector": "All", "count": 0, "records": []}),
            );
        let agg = RangeAggregator::new(Arc::new(gw), weeks());
        let preview = agg
            .aggregate(&SectorFilter::AllSectors, "2025-10-06", "2025-10-13")
            .await
            .unwrap();
        assert_eq!(preview.snapshot().records[0].sector, None);
        assert_eq!(preview.snapshot().sector_slug, "all");
    }

    #[tokio::test]
    async fn partial_failures_are_tolerated() {
        let gw = gateway()
            .failing("api/preview/2025-10-06/technology.json")
            .failing("api/preview/2025-10-20/technology.json");
        let agg = RangeAggregator::new(Arc::new(gw), weeks());
        let preview = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-20")
            .await
            .unwrap();
        let s = preview.snapshot();
        assert_eq!(s.count, 5);
        assert_eq!(s.ticker_count, 53);
        assert_eq!(s.missing_public, vec!["Private A", "Private C"]);
    }

    #[tokio::test]
    async fn week_with_null_fields_still_merges() {
        let gw = gateway().with_json(
            "api/preview/2025-10-13/technology.json",
            json!({
                "records": [
                    {"company": null, "symbol": "BETA", "date": "2025-10-14"}
                ],
                "count": null,
                "missingPublic": null,
                "irCompanies": null,
                "tickerCount": null,
                "sector": null,
                "sectorSlug": null,
                "week": {"id": null, "label": null}
            }),
        );
        let agg = RangeAggregator::new(Arc::new(gw), weeks());
        let preview = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-13")
            .await
            .unwrap();
        let s = preview.snapshot();

        let symbols: Vec<_> = s.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ACME", "ZETA", "BETA"]);
        assert_eq!(s.count, 2);
        assert_eq!(s.missing_public, vec!["Private A", "Private B"]);
    }

    #[tokio::test]
    async fn total_failure_is_no_data() {
        let gw = FakeGateway::new();
        let agg = RangeAggregator::new(Arc::new(gw), weeks());
        let err = agg
            .aggregate(&tech(), "2025-10-06", "2025-10-20")
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CalendarError>(),
            Some(&CalendarError::NoData {
                sector: "Technology".to_string(),
                weeks: 3,
            })
        );
    }

    #[test]
    fn name_list_union_ignores_snapshot_order() {
        let weeks = weeks();
        let snap = |names: &[&str]| Snapshot {
            missing_public: names.iter().map(|s| s.to_string()).collect(),
            fallback_companies: names.iter().rev().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let a = merge_snapshots(&tech(), &weeks, vec![snap(&["Cobalt", "Amber"]), snap(&["Birch", "Amber"])]);
        let b = merge_snapshots(&tech(), &weeks, vec![snap(&["Birch", "Amber"]), snap(&["Cobalt", "Amber"])]);

        assert_eq!(a.missing_public, vec!["Amber", "Birch", "Cobalt"]);
        assert_eq!(a.missing_public, b.missing_public);
        assert_eq!(a.fallback_companies, b.fallback_companies);
    }
}
