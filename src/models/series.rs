// Dashboard-side series: flattened rows, resampled buckets, forecasts and the merged chart view.

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// One (timestamp, service, metric, value) row decomposed from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedObservation {
    pub timestamp: NaiveDateTime,
    pub service: String,
    pub metric_type: String,
    pub value: f64,
}

/// Fixed-width bucket, aligned to the Unix epoch (so day buckets start at midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cadence {
    pub seconds: i64,
}

impl Cadence {
    pub const DAY: Cadence = Cadence { seconds: 86_400 };

    pub const fn minutes(n: i64) -> Self {
        Cadence { seconds: n * 60 }
    }

    /// Start of the bucket containing `ts`.
    pub fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let secs = ts.and_utc().timestamp();
        let floored = secs.div_euclid(self.seconds) * self.seconds;
        DateTime::from_timestamp(floored, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(ts)
    }

    /// `ts` advanced by `steps` buckets.
    pub fn step(&self, ts: NaiveDateTime, steps: u32) -> NaiveDateTime {
        ts + TimeDelta::seconds(self.seconds * i64::from(steps))
    }
}

/// Forecast length: `periods` buckets of `cadence` past the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horizon {
    pub periods: u32,
    pub cadence: Cadence,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Sparse resampled series: ascending, one point per non-empty bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    pub cadence: Cadence,
    pub points: Vec<SeriesPoint>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecaster output over the observed buckets plus the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    pub cadence: Cadence,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPoint {
    pub timestamp: NaiveDateTime,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
}

/// Actual vs. forecast for charting. Never fed back into a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSeries {
    pub points: Vec<MergedPoint>,
}
