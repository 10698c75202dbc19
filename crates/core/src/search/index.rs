use crate::domain::sector::ALL_SECTORS_SLUG;
use crate::domain::{Snapshot, WeekDescriptor};
use crate::gateway::{fetch_document, preview_path, SnapshotGateway};
use crate::search::SearchIndexEntry;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Entries = Arc<[SearchIndexEntry]>;
type PendingBuild = Shared<BoxFuture<'static, Entries>>;

enum IndexState {
    NotStarted,
    InProgress(PendingBuild),
    Ready(Entries),
}

/// Cross-week search index, built lazily from every week's unfiltered
/// snapshot and kept for the lifetime of the value.
///
/// Concurrent `load` calls share one build: each week is fetched once no
/// matter how many callers are waiting. The built index is never rebuilt.
pub struct SearchIndex {
    gateway: Arc<dyn SnapshotGateway>,
    weeks: Arc<[WeekDescriptor]>,
    state: Mutex<IndexState>,
}

impl SearchIndex {
    pub fn new(gateway: Arc<dyn SnapshotGateway>, weeks: impl Into<Arc<[WeekDescriptor]>>) -> Self {
        Self {
            gateway,
            weeks: weeks.into(),
            state: Mutex::new(IndexState::NotStarted),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.lock_state(), IndexState::Ready(_))
    }

    pub async fn load(&self) -> Entries {
        let pending = {
            let mut state = self.lock_state();
            let attached = match &*state {
                IndexState::Ready(entries) => return entries.clone(),
                IndexState::InProgress(pending) => Some(pending.clone()),
                IndexState::NotStarted => None,
            };
            match attached {
                Some(pending) => pending,
                None => {
                    let pending = self.start_build();
                    *state = IndexState::InProgress(pending.clone());
                    pending
                }
            }
        };

        let entries = pending.await;
        let mut state = self.lock_state();
        if !matches!(*state, IndexState::Ready(_)) {
            *state = IndexState::Ready(entries.clone());
        }
        entries
    }

    fn start_build(&self) -> PendingBuild {
        let gateway = self.gateway.clone();
        let weeks = self.weeks.clone();
        async move { Entries::from(build_entries(gateway.as_ref(), &weeks).await) }
            .boxed()
            .shared()
    }

    fn lock_state(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn build_entries(
    gateway: &dyn SnapshotGateway,
    weeks: &[WeekDescriptor],
) -> Vec<SearchIndexEntry> {
    let fetches = weeks.iter().map(|week| async move {
        let path = preview_path(&week.id, ALL_SECTORS_SLUG);
        let res = fetch_document(gateway, &path).await;
        (week, path, res)
    });

    let mut entries = Vec::new();
    let mut failures: usize = 0;
    for (week, path, res) in join_all(fetches).await {
        match res {
            Ok(doc) => entries.extend(flatten_week(week, &doc.snapshot)),
            Err(err) => {
                failures += 1;
                tracing::warn!(
                    week_id = %week.id,
                    %path,
                    error = %err,
                    "failed to load search data; skipping week"
                );
            }
        }
    }

    tracing::info!(
        weeks = weeks.len(),
        failures,
        entries = entries.len(),
        "search index built"
    );
    entries
}

fn flatten_week(week: &WeekDescriptor, snapshot: &Snapshot) -> Vec<SearchIndexEntry> {
    let week_label = if week.label.is_empty() {
        snapshot.week_label().to_string()
    } else {
        week.label.clone()
    };
    let snapshot_sector = snapshot.sector.to_string();

    snapshot
        .records
        .iter()
        .map(|record| SearchIndexEntry {
            company: record.company.clone(),
            symbol: record.symbol.clone(),
            date: record.date.clone().filter(|d| !d.is_empty()),
            sector: record
                .sector
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| snapshot_sector.clone()),
            source: record.source.clone(),
            session: record.session().map(str::to_string),
            week_id: week.id.clone(),
            week_label: week_label.clone(),
        })
        .collect()
}
