// Resampling: bucket observations at a fixed cadence, keep the max per bucket, drop empty buckets.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::models::{AggregatedSeries, Cadence, FlattenedObservation, SeriesPoint};

/// Fewest points a series needs before it is worth forecasting.
pub const MIN_FORECAST_POINTS: usize = 2;

pub fn resample_max(obs: &[FlattenedObservation], cadence: Cadence) -> AggregatedSeries {
    let mut by_bucket: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
    for o in obs {
        let bucket = cadence.bucket_start(o.timestamp);
        by_bucket
            .entry(bucket)
            .and_modify(|max| *max = max.max(o.value))
            .or_insert(o.value);
    }
    AggregatedSeries {
        cadence,
        points: by_bucket
            .into_iter()
            .map(|(timestamp, value)| SeriesPoint { timestamp, value })
            .collect(),
    }
}

impl AggregatedSeries {
    pub fn has_enough_for_forecast(&self) -> bool {
        self.len() >= MIN_FORECAST_POINTS
    }
}
