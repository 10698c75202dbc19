use crate::domain::{Preview, SectorFilter, WeekDescriptor};
use crate::error::CalendarError;
use crate::gateway::{SnapshotGateway, WEEKS_PATH};
use crate::preview::{Download, RangeAggregator};
use crate::search::{QuerySequencer, SearchIndex, SearchIndexEntry};
use anyhow::Context;
use std::sync::Arc;

/// Everything a page session needs: the preloaded weeks, the lazily built
/// search index and the range aggregator, all reading through one gateway.
pub struct Calendar {
    gateway: Arc<dyn SnapshotGateway>,
    weeks: Arc<[WeekDescriptor]>,
    index: SearchIndex,
    aggregator: RangeAggregator,
    sequencer: QuerySequencer,
}

impl Calendar {
    pub fn new(gateway: Arc<dyn SnapshotGateway>, weeks: Vec<WeekDescriptor>) -> Self {
        let weeks: Arc<[WeekDescriptor]> = weeks.into();
        Self {
            index: SearchIndex::new(gateway.clone(), weeks.clone()),
            aggregator: RangeAggregator::new(gateway.clone(), weeks.clone()),
            sequencer: QuerySequencer::new(),
            gateway,
            weeks,
        }
    }

    /// Reads the published week list.
    pub async fn fetch_weeks(gateway: &dyn SnapshotGateway) -> anyhow::Result<Vec<WeekDescriptor>> {
        let raw = gateway.fetch_json(WEEKS_PATH).await?;
        let mut weeks = serde_json::from_value::<Vec<WeekDescriptor>>(raw)
            .with_context(|| format!("failed to parse {WEEKS_PATH}"))?;
        weeks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(weeks)
    }

    pub fn weeks(&self) -> &[WeekDescriptor] {
        &self.weeks
    }

    pub fn sequencer(&self) -> &QuerySequencer {
        &self.sequencer
    }

    pub async fn suggest(&self, query: &str) -> Vec<SearchIndexEntry> {
        if crate::search::normalize(query).is_empty() {
            return Vec::new();
        }
        let index = self.index.load().await;
        crate::search::suggest(query, &index)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchIndexEntry>, CalendarError> {
        if crate::search::normalize(query).is_empty() {
            return Err(CalendarError::EmptyQuery);
        }
        let index = self.index.load().await;
        crate::search::search(query, &index)
    }

    pub async fn preview(
        &self,
        sector: &SectorFilter,
        start_week_id: &str,
        end_week_id: &str,
    ) -> anyhow::Result<Preview> {
        self.aggregator
            .aggregate(sector, start_week_id, end_week_id)
            .await
    }

    pub async fn download(&self, preview: &Preview, sector: &SectorFilter) -> anyhow::Result<Download> {
        crate::preview::download(self.gateway.as_ref(), preview, sector).await
    }
}
