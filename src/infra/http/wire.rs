use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::entities::metrics::MetricsReport;
use crate::domain::entities::query::Page;
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{FilterStrategy, ResourceKind};
use crate::domain::pagination::slice_for_page;
use crate::usecase::ports::source::FetchError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub returned: u64,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, FetchError> {
    if !envelope.success {
        let message = envelope
            .message
            .or(envelope.error)
            .unwrap_or_else(|| "API reported failure".to_string());
        return Err(FetchError::network(message));
    }
    envelope
        .data
        .ok_or_else(|| FetchError::network("response has no data"))
}

fn records_of(data: &Map<String, Value>, key: &str) -> Vec<Record> {
    data.get(key)
        .or_else(|| data.get("items"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .cloned()
                .filter_map(Record::from_value)
                .collect()
        })
        .unwrap_or_default()
}

fn reported_total(data: &Map<String, Value>) -> Option<u64> {
    data.get("pagination")
        .and_then(|pagination| Pagination::deserialize(pagination).ok())
        .map(|pagination| pagination.total)
        .or_else(|| data.get("total").and_then(Value::as_u64))
        .or_else(|| data.get("total_count").and_then(Value::as_u64))
}

pub fn decode_page(
    kind: ResourceKind,
    body: Value,
    limit: u64,
    offset: u64,
) -> Result<Page, FetchError> {
    // Bare `{items, total, ...}` bodies carry no envelope.
    let body = match body {
        Value::Object(fields) if !fields.contains_key("data") && !fields.contains_key("success") => {
            let mut envelope = Map::new();
            envelope.insert("data".to_string(), Value::Object(fields));
            Value::Object(envelope)
        }
        other => other,
    };
    let envelope: Envelope<Map<String, Value>> = serde_json::from_value(body)
        .map_err(|err| FetchError::network(format!("unexpected response shape: {err}")))?;
    let data = unwrap_envelope(envelope)?;

    let records = records_of(&data, kind.collection_key());
    let total = reported_total(&data).unwrap_or(records.len() as u64);

    let items = match kind.strategy() {
        FilterStrategy::ServerSide => records,
        FilterStrategy::ClientSide => slice_for_page(&records, limit, offset).to_vec(),
    };

    Ok(Page::new(items, total, limit, offset))
}

pub fn decode_metrics(body: Value) -> Result<MetricsReport, FetchError> {
    let envelope: Envelope<MetricsReport> = serde_json::from_value(body)
        .map_err(|err| FetchError::network(format!("unexpected response shape: {err}")))?;
    unwrap_envelope(envelope)
}

pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_server_paged_products() {
        let body = json!({
            "success": true,
            "data": {
                "products": [{ "product_id": "1" }, { "product_id": "2" }],
                "pagination": { "total": 237, "limit": 2, "offset": 4, "has_next": true, "has_previous": true, "returned": 2 }
            }
        });

        let page = decode_page(ResourceKind::Products, body, 2, 4).expect("should decode");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 237);
        assert_eq!(page.offset, 4);
    }

    #[test]
    fn slices_client_side_creators() {
        let creators: Vec<Value> = (0..5).map(|idx| json!({ "id": idx })).collect();
        let body = json!({ "success": true, "data": { "creators": creators, "total_count": 5 } });

        let page = decode_page(ResourceKind::Creators, body, 2, 2).expect("should decode");

        assert_eq!(page.total, 5);
        let ids: Vec<_> = page.items.iter().filter_map(|row| row.text("id")).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn accepts_flat_items_shape() {
        let body = json!({ "data": { "items": [{ "campaign_id": "9" }], "total": 1 } });

        let page = decode_page(ResourceKind::Campaigns, body, 50, 0).expect("should decode");

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn accepts_bare_page_body() {
        let body = json!({ "items": [{ "product_id": "1" }], "total": 40, "limit": 1, "offset": 0 });

        let page = decode_page(ResourceKind::Products, body, 1, 0).expect("should decode");

        assert_eq!(page.total, 40);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn unsuccessful_envelope_is_an_error() {
        let body = json!({ "success": false, "message": "quota exceeded" });

        let err = decode_page(ResourceKind::Products, body, 50, 0).expect_err("should fail");

        assert_eq!(err, FetchError::network("quota exceeded"));
    }

    #[test]
    fn decodes_metrics_report() {
        let body = json!({
            "success": true,
            "data": {
                "metrics": [{ "metric_date": "2026-10-01", "total_creators": 40 }],
                "period": { "start_date": "2026-09-16", "end_date": "2026-10-16", "total_days": 30 }
            }
        });

        let report = decode_metrics(body).expect("should decode");

        assert_eq!(report.period.total_days, Some(30));
        assert_eq!(report.metrics[0].total_creators, Some(40.0));
    }

    #[test]
    fn null_growth_does_not_fail_metrics() {
        let body = json!({
            "success": true,
            "data": {
                "metrics": [{
                    "metric_date": "2026-10-01",
                    "total_creators": 40,
                    "creators_growth": null,
                    "gmv_growth": null
                }],
                "summary": {
                    "total_creators_change": 5,
                    "total_products_substituted_change": 0,
                    "total_products_in_system_change": 12,
                    "gmv_change": 99.5
                }
            }
        });

        let report = decode_metrics(body).expect("null growth should decode");

        assert_eq!(report.metrics[0].creators_growth, None);
        assert_eq!(
            report.summary.and_then(|summary| summary.gmv_change),
            Some(99.5)
        );
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"error":"Failed to fetch data from API","message":"boom"}"#),
            Some("boom".to_string())
        );
        assert_eq!(error_message("Bad Gateway"), Some("Bad Gateway".to_string()));
        assert_eq!(error_message("  "), None);
    }
}
