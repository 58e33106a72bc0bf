// Raw metric points as read from the exporter collection.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::timestamp::parse_utc;

pub const CPU_PERCENT: &str = "cpu_percent";
pub const MEMORY_USED_MB: &str = "memory_used_mb";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const ERRORS_TOTAL: &str = "errors_total";

/// Metric types a group must carry before it is exported.
pub const REQUIRED_METRICS: [&str; 4] = [
    CPU_PERCENT,
    MEMORY_USED_MB,
    HTTP_REQUESTS_TOTAL,
    ERRORS_TOTAL,
];

/// One observation: a single metric of a single service at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetricPoint {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub metric_type: String,
    pub value: f64,
}

impl RawMetricPoint {
    /// Parse `{timestamp, service_name, metric_type, value}`.
    /// Returns None when any of the four is absent, null, empty or not numeric.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let timestamp = doc.get("timestamp").and_then(parse_utc)?;
        let service = non_empty_str(doc.get("service_name"))?;
        let metric_type = non_empty_str(doc.get("metric_type"))?;
        let value = doc.get("value").and_then(coerce_numeric)?;
        Some(Self {
            timestamp,
            service: service.to_string(),
            metric_type: metric_type.to_string(),
            value,
        })
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Numbers and numeric strings coerce; everything else (null, bool, objects, NaN) is None.
pub fn coerce_numeric(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_numeric_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_numeric(&json!(3)), Some(3.0));
        assert_eq!(coerce_numeric(&json!(2.5)), Some(2.5));
        assert_eq!(coerce_numeric(&json!(" 7.25 ")), Some(7.25));
    }

    #[test]
    fn coerce_numeric_rejects_everything_else() {
        assert_eq!(coerce_numeric(&json!(null)), None);
        assert_eq!(coerce_numeric(&json!(true)), None);
        assert_eq!(coerce_numeric(&json!("n/a")), None);
        assert_eq!(coerce_numeric(&json!("NaN")), None);
        assert_eq!(coerce_numeric(&json!({"v": 1})), None);
    }

    #[test]
    fn from_document_skips_missing_fields() {
        let ok = json!({"timestamp": "2024-01-01T00:00:00Z", "service_name": "A", "metric_type": "cpu_percent", "value": 10});
        assert!(RawMetricPoint::from_document(&ok).is_some());

        for field in ["timestamp", "service_name", "metric_type", "value"] {
            let mut doc = ok.clone();
            doc.as_object_mut().unwrap().remove(field);
            assert!(RawMetricPoint::from_document(&doc).is_none(), "{field}");
        }

        let null_value = json!({"timestamp": "2024-01-01T00:00:00Z", "service_name": "A", "metric_type": "cpu_percent", "value": null});
        assert!(RawMetricPoint::from_document(&null_value).is_none());
        let empty_service = json!({"timestamp": "2024-01-01T00:00:00Z", "service_name": "", "metric_type": "cpu_percent", "value": 1});
        assert!(RawMetricPoint::from_document(&empty_service).is_none());
    }

    #[test]
    fn from_document_keeps_zero_value() {
        let doc = json!({"timestamp": "2024-01-01T00:00:00Z", "service_name": "A", "metric_type": "errors_total", "value": 0});
        let p = RawMetricPoint::from_document(&doc).unwrap();
        assert_eq!(p.value, 0.0);
    }
}
