use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::{Filters, Page};
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{FilterStrategy, ResourceKind};
use crate::domain::filter::filter_records;
use crate::domain::pagination::slice_for_page;
use crate::usecase::ports::source::{FetchError, RecordSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub kind: ResourceKind,
    pub limit: u64,
    pub offset: u64,
    pub filters: Filters,
}

#[derive(Default)]
pub struct MemorySource {
    records: HashMap<ResourceKind, Vec<Record>>,
    failing_offsets: HashSet<u64>,
    metrics: MetricsReport,
    calls: Mutex<Vec<FetchCall>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, kind: ResourceKind, records: Vec<Record>) -> Self {
        self.records.insert(kind, records);
        self
    }

    pub fn failing_at(mut self, offset: u64) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsReport) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        limit: u64,
        offset: u64,
        filters: &Filters,
    ) -> Result<Page, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(FetchCall {
                kind,
                limit,
                offset,
                filters: filters.clone(),
            });
        }

        if self.failing_offsets.contains(&offset) {
            return Err(FetchError::status(503, "service unavailable"));
        }

        let all = self.records.get(&kind).cloned().unwrap_or_default();
        let visible = match kind.strategy() {
            FilterStrategy::ServerSide => filter_records(&all, filters, kind.filters()),
            FilterStrategy::ClientSide => all,
        };
        let items = slice_for_page(&visible, limit, offset).to_vec();

        Ok(Page::new(items, visible.len() as u64, limit, offset))
    }

    async fn fetch_metrics(&self, _start_date: &str) -> Result<MetricsReport, FetchError> {
        Ok(self.metrics.clone())
    }
}
