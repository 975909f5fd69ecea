use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::{Filters, Page};
use crate::domain::entities::resource::{FilterStrategy, ResourceKind};
use crate::infra::http::wire::{decode_metrics, decode_page, error_message};
use crate::usecase::ports::source::{FetchError, RecordSource};

pub const METRICS_ROUTE: &str = "/api/metrics";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn get_json(&self, route: &str, params: &[(String, String)]) -> Result<Value, FetchError> {
        let url = self.url(route);
        debug!(%url, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|err| FetchError::network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "unexpected status".to_string());
            return Err(FetchError::status(status.as_u16(), message));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| FetchError::network(format!("invalid response body: {err}")))
    }
}

fn page_params(kind: ResourceKind, limit: u64, offset: u64, filters: &Filters) -> Vec<(String, String)> {
    let mut params = vec![
        ("limit".to_string(), limit.to_string()),
        ("offset".to_string(), offset.to_string()),
    ];

    for (name, value) in filters {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if kind.forwarded_params().contains(&name.as_str()) {
            params.push((name.clone(), value.to_string()));
        } else {
            warn!(resource = %kind, filter = %name, "filter not supported upstream, ignoring");
        }
    }

    params
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        limit: u64,
        offset: u64,
        filters: &Filters,
    ) -> Result<Page, FetchError> {
        let params = match kind.strategy() {
            FilterStrategy::ServerSide => page_params(kind, limit, offset, filters),
            // The creators endpoint has no paging or filtering.
            FilterStrategy::ClientSide => Vec::new(),
        };
        let body = self.get_json(kind.proxy_route(), &params).await?;
        decode_page(kind, body, limit, offset)
    }

    async fn fetch_metrics(&self, start_date: &str) -> Result<MetricsReport, FetchError> {
        let params = [("start_date".to_string(), start_date.to_string())];
        let body = self.get_json(METRICS_ROUTE, &params).await?;
        decode_metrics(body)
    }
}
