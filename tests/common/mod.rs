// Shared test helpers
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use loadcast::models::FlattenedObservation;
use loadcast::store::MetricStore;
use serde_json::{Value, json};
use tempfile::TempDir;

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

pub fn obs(ts: NaiveDateTime, service: &str, metric: &str, value: f64) -> FlattenedObservation {
    FlattenedObservation {
        timestamp: ts,
        service: service.into(),
        metric_type: metric.into(),
        value,
    }
}

/// Exporter-collection document.
pub fn raw_doc(ts: &str, service: &str, metric: &str, value: Value) -> Value {
    json!({
        "timestamp": ts,
        "service_name": service,
        "metric_type": metric,
        "value": value,
    })
}

/// The four required metrics for one (instant, service).
pub fn complete_group_docs(ts: &str, service: &str) -> Vec<Value> {
    vec![
        raw_doc(ts, service, "cpu_percent", json!(10)),
        raw_doc(ts, service, "memory_used_mb", json!(512)),
        raw_doc(ts, service, "http_requests_total", json!(5)),
        raw_doc(ts, service, "errors_total", json!(0)),
    ]
}

pub async fn temp_store() -> (TempDir, MetricStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monitoring.db");
    let store = MetricStore::connect(path.to_str().unwrap()).await.unwrap();
    store.init().await.unwrap();
    (dir, store)
}
