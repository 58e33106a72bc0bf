// Least-squares linear trend with a constant-width interval.

use crate::models::{AggregatedSeries, ForecastPoint, ForecastSeries, Horizon};

use super::Forecaster;

/// z for a two-sided 80% interval.
pub const DEFAULT_INTERVAL_Z: f64 = 1.2816;

#[derive(Debug, Clone, Copy)]
pub struct LinearTrendForecaster {
    /// Half-width of the interval in residual standard deviations.
    pub interval_z: f64,
}

impl Default for LinearTrendForecaster {
    fn default() -> Self {
        Self {
            interval_z: DEFAULT_INTERVAL_Z,
        }
    }
}

impl Forecaster for LinearTrendForecaster {
    fn predict(
        &self,
        history: &AggregatedSeries,
        horizon: Horizon,
    ) -> anyhow::Result<ForecastSeries> {
        let (Some(first), Some(last)) = (history.points.first(), history.points.last()) else {
            anyhow::bail!("empty history");
        };
        anyhow::ensure!(
            horizon.cadence.seconds > 0,
            "horizon cadence must be positive, got {}s",
            horizon.cadence.seconds
        );
        let origin = first.timestamp;
        let x_of = |ts: chrono::NaiveDateTime| (ts - origin).num_seconds() as f64 / 86_400.0;

        let n = history.points.len() as f64;
        let xs: Vec<f64> = history.points.iter().map(|p| x_of(p.timestamp)).collect();
        let ys: Vec<f64> = history.points.iter().map(|p| p.value).collect();
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        let sxy: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let intercept = mean_y - slope * mean_x;

        let sse: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let sigma = if history.points.len() > 2 {
            (sse / (n - 2.0)).sqrt()
        } else {
            0.0
        };
        let half_width = self.interval_z * sigma;

        let point_at = |ts: chrono::NaiveDateTime| {
            let estimate = intercept + slope * x_of(ts);
            ForecastPoint {
                timestamp: ts,
                estimate,
                lower: estimate - half_width,
                upper: estimate + half_width,
            }
        };

        let mut points: Vec<ForecastPoint> =
            history.points.iter().map(|p| point_at(p.timestamp)).collect();
        points.extend(
            (1..=horizon.periods).map(|k| point_at(horizon.cadence.step(last.timestamp, k))),
        );

        Ok(ForecastSeries {
            cadence: horizon.cadence,
            points,
        })
    }
}
