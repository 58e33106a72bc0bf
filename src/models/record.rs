use serde::{Deserialize, Serialize};

/// One line of the exported log. Field order is fixed so reruns are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRecord {
    /// `YYYY-MM-DD HH:MM:SS` in the exporter's target zone.
    pub timestamp: String,
    pub service: String,
    pub cpu_percent: f64,
    pub memory_used_mb: f64,
    pub http_requests_total: f64,
    pub errors_total: f64,
}
