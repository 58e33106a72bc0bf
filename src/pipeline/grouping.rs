// Exporter grouping: raw points → one group per (instant, service) → complete groups become records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::{
    CPU_PERCENT, ERRORS_TOTAL, ExportedRecord, HTTP_REQUESTS_TOTAL, MEMORY_USED_MB,
    REQUIRED_METRICS, RawMetricPoint,
};

/// Composite identity of a group. Ordering is (instant, service), which is also the write order.
pub type GroupKey = (DateTime<Utc>, String);

pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// All metrics seen for one service at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricGroup {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub metrics: BTreeMap<String, f64>,
}

impl MetricGroup {
    fn new(timestamp: DateTime<Utc>, service: String) -> Self {
        Self {
            timestamp,
            service,
            metrics: BTreeMap::new(),
        }
    }

    /// True when every required metric is present.
    pub fn is_complete(&self) -> bool {
        REQUIRED_METRICS
            .iter()
            .all(|m| self.metrics.contains_key(*m))
    }

    /// The exported form, or None if the group is incomplete.
    pub fn to_record(&self, tz: Tz) -> Option<ExportedRecord> {
        Some(ExportedRecord {
            timestamp: format_in_zone(self.timestamp, tz),
            service: self.service.clone(),
            cpu_percent: *self.metrics.get(CPU_PERCENT)?,
            memory_used_mb: *self.metrics.get(MEMORY_USED_MB)?,
            http_requests_total: *self.metrics.get(HTTP_REQUESTS_TOTAL)?,
            errors_total: *self.metrics.get(ERRORS_TOTAL)?,
        })
    }
}

/// Groups points in one pass. A later point for the same key and metric replaces the earlier value.
pub fn group_points<I>(points: I) -> BTreeMap<GroupKey, MetricGroup>
where
    I: IntoIterator<Item = RawMetricPoint>,
{
    let mut groups: BTreeMap<GroupKey, MetricGroup> = BTreeMap::new();
    for p in points {
        let key = (p.timestamp, p.service);
        groups
            .entry(key)
            .or_insert_with_key(|(ts, service)| MetricGroup::new(*ts, service.clone()))
            .metrics
            .insert(p.metric_type, p.value);
    }
    groups
}

/// Records for every complete group, in key order.
pub fn complete_records(groups: &BTreeMap<GroupKey, MetricGroup>, tz: Tz) -> Vec<ExportedRecord> {
    groups.values().filter_map(|g| g.to_record(tz)).collect()
}

pub fn format_in_zone(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format(EXPORT_TIME_FORMAT).to_string()
}
