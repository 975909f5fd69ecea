use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// Every field tolerates being absent or null; the API sends null growth on
// the first day of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSnapshot {
    pub metric_date: Option<String>,
    pub total_creators: Option<f64>,
    pub creators_growth: Option<f64>,
    pub total_products_substituted: Option<f64>,
    pub products_substituted_growth: Option<f64>,
    pub gmv_generated: Option<f64>,
    pub gmv_growth: Option<f64>,
    pub avg_products_per_creator: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_days: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSummary {
    pub total_creators_change: Option<f64>,
    pub total_products_substituted_change: Option<f64>,
    pub total_products_in_system_change: Option<f64>,
    pub gmv_change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsReport {
    pub metrics: Vec<MetricSnapshot>,
    pub period: Period,
    pub summary: Option<MetricsSummary>,
}

impl MetricsReport {
    pub fn latest(&self) -> Option<&MetricSnapshot> {
        self.metrics.last()
    }
}

pub fn start_date_days_ago(today: NaiveDate, days: u32) -> String {
    (today - Duration::days(i64::from(days)))
        .format("%Y-%m-%d")
        .to_string()
}
