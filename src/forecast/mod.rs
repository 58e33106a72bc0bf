// Forecast boundary: the model is an opaque collaborator; this module guards its inputs and outputs.

mod linear;

pub use linear::{DEFAULT_INTERVAL_Z, LinearTrendForecaster};

use thiserror::Error;

use crate::models::{AggregatedSeries, ForecastSeries, Horizon};
use crate::pipeline::MIN_FORECAST_POINTS;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("not enough data to forecast: {points} point(s), need at least {}", MIN_FORECAST_POINTS)]
    InsufficientData { points: usize },
    #[error("forecast unavailable: {0}")]
    Unavailable(String),
}

/// Series in, series out. Output must cover every observed bucket plus `horizon.periods` steps.
pub trait Forecaster: Send + Sync {
    fn predict(&self, history: &AggregatedSeries, horizon: Horizon)
    -> anyhow::Result<ForecastSeries>;
}

/// Runs the forecaster on `history`. Short series never reach it; its failures become `Unavailable`.
pub fn run_forecast(
    forecaster: &dyn Forecaster,
    history: &AggregatedSeries,
    horizon: Horizon,
) -> Result<ForecastSeries, ForecastError> {
    if !history.has_enough_for_forecast() {
        return Err(ForecastError::InsufficientData {
            points: history.len(),
        });
    }
    let raw = forecaster
        .predict(history, horizon)
        .map_err(|e| ForecastError::Unavailable(format!("{:#}", e)))?;
    Ok(clamp_non_negative(raw))
}

/// Monitored metrics cannot go below zero; neither can their estimate or bounds.
pub fn clamp_non_negative(mut series: ForecastSeries) -> ForecastSeries {
    for p in &mut series.points {
        p.estimate = p.estimate.max(0.0);
        p.lower = p.lower.max(0.0);
        p.upper = p.upper.max(0.0);
    }
    series
}
