// Dashboard pipeline: documents → observations → per-metric short-range and monthly panels.
// Recomputed from scratch on every request.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::{AppConfig, DashboardSource};
use crate::forecast::{ForecastError, Forecaster, run_forecast};
use crate::models::{FlattenedObservation, ForecastSeries, Horizon, MergedSeries};
use crate::pipeline::flatten::{metrics_for, select, services};
use crate::pipeline::{flatten_documents, flatten_exported_log, merge_for_display, resample_max};
use crate::store::MetricStore;

pub const NO_DATA_NOTICE: &str = "No valid metric data available.";
pub const NO_METRICS_NOTICE: &str = "Please select at least one metric.";
const GENERATED_AT_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";

/// Loads the current snapshot of the configured source and flattens it.
#[instrument(skip(store, config), fields(operation = "load_observations"))]
pub async fn load_observations(
    store: &MetricStore,
    config: &AppConfig,
) -> anyhow::Result<Vec<FlattenedObservation>> {
    match config.dashboard.source {
        DashboardSource::Store => {
            let docs = store
                .fetch_collection(&config.store.dashboard_collection)
                .await?;
            Ok(flatten_documents(&docs))
        }
        DashboardSource::ExportedLog => {
            let path = config.exported_log_path();
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| anyhow::anyhow!("exported log {}: {}", path, e))?;
            Ok(flatten_exported_log(&text))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    /// Defaults to the first service in sorted order.
    pub service: Option<String>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub short_range: Horizon,
    pub long_range: Horizon,
}

impl DashboardSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            short_range: config.dashboard.short_horizon(),
            long_range: config.dashboard.long_horizon(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelKind {
    ShortTerm,
    Monthly,
}

impl PanelKind {
    fn title(self, metric: &str) -> String {
        match self {
            PanelKind::ShortTerm => format!("Short-term Forecast for {}", metric),
            PanelKind::Monthly => format!("Monthly Forecast for {}", metric),
        }
    }

    fn x_label(self) -> &'static str {
        match self {
            PanelKind::ShortTerm => "Time",
            PanelKind::Monthly => "Date",
        }
    }

    fn insufficient_message(self, metric: &str) -> String {
        match self {
            PanelKind::ShortTerm => format!("Not enough data for short-term forecast of {}", metric),
            PanelKind::Monthly => format!("Not enough data for monthly forecast of {}", metric),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Panel {
    Ready {
        title: String,
        x_label: String,
        merged: MergedSeries,
        forecast: ForecastSeries,
    },
    InsufficientData {
        message: String,
    },
    ForecastUnavailable {
        message: String,
    },
}

impl Panel {
    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPanels {
    pub metric: String,
    pub short_term: Panel,
    pub monthly: Panel,
}

/// Last successful monthly forecast of a report; what export and email hand out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRangeForecast {
    pub service: String,
    pub metric: String,
    pub forecast: ForecastSeries,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub services: Vec<String>,
    pub selected_service: Option<String>,
    pub available_metrics: Vec<String>,
    pub selected_metrics: Vec<String>,
    pub panels: Vec<MetricPanels>,
    pub notice: Option<String>,
    pub export_available: bool,
    #[serde(skip)]
    pub latest_long_range: Option<LongRangeForecast>,
    pub generated_at: String,
}

#[instrument(skip_all, fields(operation = "build_report", observations = obs.len()))]
pub fn build_report(
    obs: &[FlattenedObservation],
    request: &DashboardRequest,
    settings: &DashboardSettings,
    forecaster: &dyn Forecaster,
) -> DashboardReport {
    let generated_at = chrono::Local::now().format(GENERATED_AT_FORMAT).to_string();
    let all_services = services(obs);

    let selected_service = match &request.service {
        Some(s) => Some(s.clone()),
        None => all_services.first().cloned(),
    };
    let mut report = DashboardReport {
        services: all_services,
        selected_service: selected_service.clone(),
        available_metrics: Vec::new(),
        selected_metrics: request.metrics.clone(),
        panels: Vec::new(),
        notice: None,
        export_available: false,
        latest_long_range: None,
        generated_at,
    };

    let Some(service) = selected_service.filter(|_| !obs.is_empty()) else {
        report.notice = Some(NO_DATA_NOTICE.to_string());
        return report;
    };
    report.available_metrics = metrics_for(obs, &service);
    if request.metrics.is_empty() {
        report.notice = Some(NO_METRICS_NOTICE.to_string());
        return report;
    }

    for metric in &request.metrics {
        let rows = select(obs, &service, metric);
        let (short_term, _) = build_panel(
            PanelKind::ShortTerm,
            metric,
            &rows,
            settings.short_range,
            forecaster,
        );
        let (monthly, monthly_forecast) = build_panel(
            PanelKind::Monthly,
            metric,
            &rows,
            settings.long_range,
            forecaster,
        );
        if let Some(forecast) = monthly_forecast {
            report.latest_long_range = Some(LongRangeForecast {
                service: service.clone(),
                metric: metric.clone(),
                forecast,
            });
        }
        report.panels.push(MetricPanels {
            metric: metric.clone(),
            short_term,
            monthly,
        });
    }
    report.export_available = report.latest_long_range.is_some();
    report
}

fn build_panel(
    kind: PanelKind,
    metric: &str,
    rows: &[FlattenedObservation],
    horizon: Horizon,
    forecaster: &dyn Forecaster,
) -> (Panel, Option<ForecastSeries>) {
    let actual = resample_max(rows, horizon.cadence);
    match run_forecast(forecaster, &actual, horizon) {
        Ok(forecast) => {
            let merged = merge_for_display(&actual, &forecast);
            let panel = Panel::Ready {
                title: kind.title(metric),
                x_label: kind.x_label().to_string(),
                merged,
                forecast: forecast.clone(),
            };
            (panel, Some(forecast))
        }
        Err(ForecastError::InsufficientData { points }) => {
            debug!(metric, points, "insufficient data for forecast");
            let message = kind.insufficient_message(metric);
            (Panel::InsufficientData { message }, None)
        }
        Err(e @ ForecastError::Unavailable(_)) => {
            warn!(metric, error = %e, "forecast failed");
            (
                Panel::ForecastUnavailable {
                    message: format!("Forecast unavailable for {}: {}", metric, e),
                },
                None,
            )
        }
    }
}
