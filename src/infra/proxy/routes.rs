use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::resource::ResourceKind;
use crate::infra::proxy::error::{ProxyError, ProxyResult};
use crate::infra::proxy::ProxyState;

pub const DEFAULT_LIMIT: &str = "50";
pub const DEFAULT_OFFSET: &str = "0";
pub const METRICS_UPSTREAM_PATH: &str = "/v1/tiktok/metrics/historical/";

pub fn upstream_query(kind: ResourceKind, params: &HashMap<String, String>) -> Vec<(String, String)> {
    let limit = params.get("limit").map_or(DEFAULT_LIMIT, String::as_str);
    let offset = params.get("offset").map_or(DEFAULT_OFFSET, String::as_str);

    let mut query = vec![
        ("limit".to_string(), limit.to_string()),
        ("offset".to_string(), offset.to_string()),
    ];

    for name in kind.forwarded_params() {
        let Some(value) = params.get(*name) else {
            continue;
        };
        if value.is_empty() || (*name == "campaign_type" && value == "all") {
            continue;
        }
        query.push((name.to_string(), value.clone()));
    }

    query
}

async fn fetch_upstream(
    state: &ProxyState,
    path: &str,
    query: &[(String, String)],
) -> ProxyResult<Bytes> {
    let url = state.upstream_url(path);
    debug!(%url, ?query, "forwarding upstream");

    let response = state
        .http
        .get(&url)
        .header(header::ACCEPT, "application/json")
        .header(header::CONTENT_TYPE, "application/json")
        .query(query)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::UpstreamStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice::<IgnoredAny>(&body)?;
    Ok(body)
}

fn json_passthrough(body: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub async fn forward_resource(
    state: ProxyState,
    kind: ResourceKind,
    params: HashMap<String, String>,
) -> ProxyResult<Response> {
    let query = upstream_query(kind, &params);
    let body = fetch_upstream(&state, kind.upstream_path(), &query).await?;
    info!(resource = %kind, bytes = body.len(), "proxied");
    Ok(json_passthrough(body))
}

pub async fn metrics(
    State(state): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> ProxyResult<Response> {
    let query: Vec<(String, String)> = params
        .get("start_date")
        .filter(|value| !value.is_empty())
        .map(|value| vec![("start_date".to_string(), value.clone())])
        .unwrap_or_default();
    let body = fetch_upstream(&state, METRICS_UPSTREAM_PATH, &query).await?;
    Ok(json_passthrough(body))
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn paging_defaults_apply_when_missing() {
        let query = upstream_query(ResourceKind::Products, &params(&[]));
        assert_eq!(
            query,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn forwards_resource_filters_verbatim() {
        let query = upstream_query(
            ResourceKind::Products,
            &params(&[("limit", "200"), ("shop_name", "Acme Co"), ("region", "US")]),
        );

        assert!(query.contains(&("limit".to_string(), "200".to_string())));
        assert!(query.contains(&("shop_name".to_string(), "Acme Co".to_string())));
        assert!(!query.iter().any(|(name, _)| name == "region"));
    }

    #[test]
    fn campaign_type_all_is_not_forwarded() {
        let all = upstream_query(ResourceKind::Campaigns, &params(&[("campaign_type", "all")]));
        let mine = upstream_query(
            ResourceKind::Campaigns,
            &params(&[("campaign_type", "MY_CAMPAIGNS")]),
        );

        assert_eq!(all.len(), 2);
        assert_eq!(mine.last(), Some(&("campaign_type".to_string(), "MY_CAMPAIGNS".to_string())));
    }
}
