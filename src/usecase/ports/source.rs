use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::{Filters, Page};
use crate::domain::entities::resource::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{}", network_message(.status, .message))]
    Network {
        status: Option<u16>,
        message: String,
    },
}

fn network_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("request failed with status {status}: {message}"),
        None => format!("request failed: {message}"),
    }
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        FetchError::Network {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Network { status, .. } => *status,
        }
    }
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        limit: u64,
        offset: u64,
        filters: &Filters,
    ) -> Result<Page, FetchError>;

    async fn fetch_metrics(&self, start_date: &str) -> Result<MetricsReport, FetchError>;
}
