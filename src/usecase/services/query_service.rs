use std::sync::Arc;

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::{Filters, Page, QueryState};
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{CampaignType, ResourceKind};
use crate::usecase::ports::source::{FetchError, RecordSource};

pub const CAMPAIGN_FETCH_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct QueryService {
    source: Arc<dyn RecordSource>,
}

impl QueryService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> Arc<dyn RecordSource> {
        Arc::clone(&self.source)
    }

    pub async fn product_page(&self, query: &QueryState) -> Result<Page, FetchError> {
        self.source
            .fetch_page(
                ResourceKind::Products,
                query.limit(),
                query.offset(),
                &query.active_filters(),
            )
            .await
    }

    pub async fn all_creators(&self) -> Result<(Vec<Record>, u64), FetchError> {
        let page = self
            .source
            .fetch_page(ResourceKind::Creators, u64::MAX, 0, &Filters::new())
            .await?;
        Ok((page.items, page.total))
    }

    pub async fn campaigns(&self, campaign_type: CampaignType) -> Result<Page, FetchError> {
        let mut filters = Filters::new();
        if let Some(wire_name) = campaign_type.as_filter() {
            filters.insert("campaign_type".to_string(), wire_name.to_string());
        }
        self.source
            .fetch_page(ResourceKind::Campaigns, CAMPAIGN_FETCH_LIMIT, 0, &filters)
            .await
    }

    pub async fn metrics(&self, start_date: &str) -> Result<MetricsReport, FetchError> {
        self.source.fetch_metrics(start_date).await
    }
}
