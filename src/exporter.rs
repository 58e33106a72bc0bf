// One-shot export: exporter collection → complete (instant, service) groups → JSON lines.
// Each run rebuilds the output from scratch; the collection is the source of truth.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::models::{ExportedRecord, RawMetricPoint};
use crate::pipeline::{complete_records, group_points};
use crate::store::MetricStore;

#[derive(Debug, Clone)]
pub struct ExportJob {
    pub collection: String,
    pub output_path: PathBuf,
    pub timezone: Tz,
}

impl ExportJob {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            collection: config.store.exporter_collection.clone(),
            output_path: PathBuf::from(&config.exporter.output_path),
            timezone: config.exporter.timezone()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub documents_read: u64,
    pub points: usize,
    pub groups: usize,
    pub records_written: usize,
}

impl ExportSummary {
    pub fn groups_skipped(&self) -> usize {
        self.groups - self.records_written
    }
}

/// Reads the collection through a cursor, keeping parseable points in ascending timestamp order.
/// The sort is stable, so points sharing an instant keep their arrival order.
pub async fn read_points(
    store: &MetricStore,
    collection: &str,
) -> anyhow::Result<(u64, Vec<RawMetricPoint>)> {
    let mut points = Vec::new();
    let read = store
        .for_each_document(collection, |doc| {
            if let Some(p) = RawMetricPoint::from_document(&doc) {
                points.push(p);
            }
        })
        .await?;
    points.sort_by_key(|p| p.timestamp);
    Ok((read, points))
}

/// Truncates `path` and writes one JSON object per line.
pub fn write_records(path: &Path, records: &[ExportedRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    for r in records {
        serde_json::to_writer(&mut out, r)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[instrument(skip(store, job), fields(operation = "run_export", collection = %job.collection))]
pub async fn run_export(store: &MetricStore, job: &ExportJob) -> anyhow::Result<ExportSummary> {
    let (documents_read, points) = read_points(store, &job.collection).await?;
    let point_count = points.len();
    let groups = group_points(points);
    let records = complete_records(&groups, job.timezone);
    write_records(&job.output_path, &records)?;

    let summary = ExportSummary {
        documents_read,
        points: point_count,
        groups: groups.len(),
        records_written: records.len(),
    };
    info!(
        documents_read = summary.documents_read,
        groups = summary.groups,
        groups_skipped = summary.groups_skipped(),
        records_written = summary.records_written,
        path = %job.output_path.display(),
        "export complete"
    );
    Ok(summary)
}
