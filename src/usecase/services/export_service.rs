use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::entities::query::Filters;
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{FilterStrategy, ResourceKind};
use crate::domain::filter::filter_records;
use crate::infra::export::csv::{export_file_name, serialize_records};
use crate::usecase::ports::source::{FetchError, RecordSource};

pub const DEFAULT_BATCH_SIZE: u64 = 1000;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("export aborted: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to serialize export: {0}")]
    Write(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub total_to_fetch: u64,
    pub fetched: Vec<Record>,
    pub filter_snapshot: Filters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub kind: ResourceKind,
    pub file_name: String,
    pub filtered: bool,
    pub row_count: usize,
    pub contents: Vec<u8>,
}

pub struct ExportService {
    source: Arc<dyn RecordSource>,
    batch_size: u64,
}

impl ExportService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn export_all(
        &self,
        kind: ResourceKind,
        filters: &Filters,
        today: NaiveDate,
    ) -> Result<ExportOutput, ExportError> {
        let job = self.drain(kind, filters).await.inspect_err(|err| {
            error!(resource = %kind, error = %err, "export failed");
        })?;

        let records = match kind.strategy() {
            FilterStrategy::ServerSide => job.fetched,
            FilterStrategy::ClientSide => {
                filter_records(&job.fetched, &job.filter_snapshot, kind.filters())
            }
        };

        if records.is_empty() {
            warn!(resource = %kind, "nothing to export");
            return Err(ExportError::Empty);
        }

        let contents = serialize_records(kind.columns(), &records)?;
        let filtered = !job.filter_snapshot.is_empty();

        info!(
            resource = %kind,
            rows = records.len(),
            filtered,
            "export ready"
        );

        Ok(ExportOutput {
            kind,
            file_name: export_file_name(kind, filtered, today),
            filtered,
            row_count: records.len(),
            contents,
        })
    }

    async fn drain(&self, kind: ResourceKind, filters: &Filters) -> Result<ExportJob, ExportError> {
        let filter_snapshot = effective_filters(kind, filters);

        match kind.strategy() {
            FilterStrategy::ServerSide => self.drain_batches(kind, filter_snapshot).await,
            FilterStrategy::ClientSide => {
                let all = self
                    .source
                    .fetch_page(kind, u64::MAX, 0, &Filters::new())
                    .await?;
                info!(resource = %kind, total = all.total, "export started");

                Ok(ExportJob {
                    total_to_fetch: all.total,
                    fetched: all.items,
                    filter_snapshot,
                })
            }
        }
    }

    async fn drain_batches(
        &self,
        kind: ResourceKind,
        filter_snapshot: Filters,
    ) -> Result<ExportJob, ExportError> {
        let first = self
            .source
            .fetch_page(kind, self.batch_size, 0, &filter_snapshot)
            .await?;
        let total_batches = first.total.div_ceil(self.batch_size);

        info!(
            resource = %kind,
            total = first.total,
            batches = total_batches,
            "export started"
        );

        let mut job = ExportJob {
            total_to_fetch: first.total,
            fetched: first.items,
            filter_snapshot,
        };

        for batch_idx in 1..total_batches {
            let offset = batch_idx * self.batch_size;
            let page = self
                .source
                .fetch_page(kind, self.batch_size, offset, &job.filter_snapshot)
                .await?;
            debug!(resource = %kind, offset, rows = page.items.len(), "export batch fetched");
            job.fetched.extend(page.items);
        }

        Ok(job)
    }
}

fn effective_filters(kind: ResourceKind, filters: &Filters) -> Filters {
    filters
        .iter()
        .map(|(name, value)| (name, value.trim()))
        .filter(|(_, value)| !value.is_empty())
        .filter(|(name, _)| match kind.strategy() {
            FilterStrategy::ServerSide => kind.forwarded_params().contains(&name.as_str()),
            FilterStrategy::ClientSide => true,
        })
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect()
}
