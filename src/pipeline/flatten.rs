// Dashboard flattening: documents with an arbitrary metric key set → one row per numeric metric.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::{FlattenedObservation, coerce_numeric, parse_wall_clock};

/// Keys that identify a document rather than carry a metric.
pub const IDENTITY_KEYS: [&str; 4] = ["_id", "id", "timestamp", "service"];

/// Flatten one document. Missing timestamp or service drops the whole document.
pub fn flatten_document(doc: &Value) -> Vec<FlattenedObservation> {
    let Some(obj) = doc.as_object() else {
        return Vec::new();
    };
    let Some(timestamp) = obj.get("timestamp").and_then(parse_wall_clock) else {
        return Vec::new();
    };
    let Some(service) = obj
        .get("service")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return Vec::new();
    };

    obj.iter()
        .filter(|(key, _)| !IDENTITY_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            coerce_numeric(value).map(|value| FlattenedObservation {
                timestamp,
                service: service.to_string(),
                metric_type: key.clone(),
                value,
            })
        })
        .collect()
}

pub fn flatten_documents<'a, I>(docs: I) -> Vec<FlattenedObservation>
where
    I: IntoIterator<Item = &'a Value>,
{
    docs.into_iter().flat_map(flatten_document).collect()
}

/// Flatten exported-log text (one JSON object per line). Blank and unparseable lines are skipped.
pub fn flatten_exported_log(text: &str) -> Vec<FlattenedObservation> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable exported line");
                None
            }
        })
        .flat_map(|doc| flatten_document(&doc))
        .collect()
}

/// Sorted distinct service names.
pub fn services(obs: &[FlattenedObservation]) -> Vec<String> {
    obs.iter()
        .map(|o| o.service.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct metric types seen for `service`.
pub fn metrics_for(obs: &[FlattenedObservation], service: &str) -> Vec<String> {
    obs.iter()
        .filter(|o| o.service == service)
        .map(|o| o.metric_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows of one service and metric, ascending by timestamp.
pub fn select(obs: &[FlattenedObservation], service: &str, metric: &str) -> Vec<FlattenedObservation> {
    let mut out: Vec<FlattenedObservation> = obs
        .iter()
        .filter(|o| o.service == service && o.metric_type == metric)
        .cloned()
        .collect();
    out.sort_by_key(|o| o.timestamp);
    out
}
