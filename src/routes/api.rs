// Dashboard API handlers. Every call recomputes from the current source snapshot.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::dashboard::{
    DashboardReport, DashboardRequest, DashboardSettings, LongRangeForecast, build_report,
    load_observations,
};
use crate::export_buffer::{self, forecast_table};
use crate::mailer::{MailAttachment, forecast_subject};
use crate::pipeline::flatten::{metrics_for, services};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ForecastQuery {
    service: Option<String>,
    /// Comma-separated metric names.
    metrics: Option<String>,
}

impl ForecastQuery {
    fn into_request(self) -> DashboardRequest {
        DashboardRequest {
            service: self.service.filter(|s| !s.is_empty()),
            metrics: split_metrics(self.metrics.as_deref().unwrap_or_default()),
        }
    }
}

fn split_metrics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
pub(super) struct EmailRequest {
    recipient: String,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    metrics: Vec<String>,
}

async fn compute_report(
    state: &AppState,
    request: &DashboardRequest,
) -> Result<DashboardReport, ApiError> {
    let obs = load_observations(&state.store, &state.config)
        .await
        .map_err(ApiError::unavailable)?;
    let settings = DashboardSettings::from_config(&state.config);
    Ok(build_report(
        &obs,
        request,
        &settings,
        state.forecaster.as_ref(),
    ))
}

fn require_forecast(report: DashboardReport) -> Result<LongRangeForecast, ApiError> {
    report.latest_long_range.ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "no monthly forecast available for export",
        )
    })
}

/// GET /api/services: distinct services in the current data.
pub(super) async fn services_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let obs = load_observations(&state.store, &state.config)
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(services(&obs)))
}

/// GET /api/services/{service}/metrics: metric choices scoped to one service.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let obs = load_observations(&state.store, &state.config)
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(metrics_for(&obs, &service)))
}

/// GET /api/forecast: full report: panels per selected metric.
pub(super) async fn forecast_handler(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = compute_report(&state, &query.into_request()).await?;
    Ok(Json(report))
}

/// GET /api/export: latest monthly forecast as a CSV download.
pub(super) async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = compute_report(&state, &query.into_request()).await?;
    let latest = require_forecast(report)?;
    let bytes = forecast_table(&latest.forecast, &latest.service, &latest.metric)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;
    Ok((
        [
            (header::CONTENT_TYPE, export_buffer::CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_buffer::FILE_NAME),
            ),
        ],
        bytes,
    ))
}

/// POST /api/email: mails the latest monthly forecast. Delivery failure leaves everything else intact.
pub(super) async fn email_handler(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = body.recipient.trim().to_string();
    if recipient.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "recipient must be non-empty",
        ));
    }
    let Some(mailer) = state.mailer.clone() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "mail delivery is not configured",
        ));
    };

    let request = DashboardRequest {
        service: body.service.filter(|s| !s.is_empty()),
        metrics: body.metrics,
    };
    let report = compute_report(&state, &request).await?;
    let latest = require_forecast(report)?;
    let bytes = forecast_table(&latest.forecast, &latest.service, &latest.metric)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;
    let attachment = MailAttachment {
        file_name: export_buffer::FILE_NAME.to_string(),
        content_type: export_buffer::CONTENT_TYPE.to_string(),
        bytes,
    };

    mailer
        .send(&recipient, &forecast_subject(&latest.service), &attachment)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, recipient = %recipient, "forecast mail failed");
            ApiError::new(StatusCode::BAD_GATEWAY, format!("Failed to send email: {}", e))
        })?;

    Ok(Json(serde_json::json!({
        "status": "sent",
        "recipient": recipient,
        "service": latest.service,
        "metric": latest.metric,
    })))
}
