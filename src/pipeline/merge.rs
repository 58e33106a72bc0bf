// Merge-for-display: outer join of actual and forecast on timestamp, actual forward-filled.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::models::{AggregatedSeries, ForecastSeries, MergedPoint, MergedSeries};

pub fn merge_for_display(actual: &AggregatedSeries, forecast: &ForecastSeries) -> MergedSeries {
    let mut joined: BTreeMap<NaiveDateTime, MergedPoint> = BTreeMap::new();
    for f in &forecast.points {
        joined.insert(
            f.timestamp,
            MergedPoint {
                timestamp: f.timestamp,
                actual: None,
                forecast: Some(f.estimate),
            },
        );
    }
    for a in &actual.points {
        joined
            .entry(a.timestamp)
            .or_insert(MergedPoint {
                timestamp: a.timestamp,
                actual: None,
                forecast: None,
            })
            .actual = Some(a.value);
    }

    let mut last_actual: Option<f64> = None;
    let points = joined
        .into_values()
        .map(|mut p| {
            match p.actual {
                Some(v) => last_actual = Some(v),
                None => p.actual = last_actual,
            }
            p
        })
        .collect();
    MergedSeries { points }
}
