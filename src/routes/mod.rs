// HTTP routes: dashboard controls as a JSON API

mod api;
mod error;
mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::forecast::Forecaster;
use crate::mailer::Mailer;
use crate::store::MetricStore;

pub use error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<MetricStore>,
    pub(crate) forecaster: Arc<dyn Forecaster>,
    /// None when no [mail] section is configured.
    pub(crate) mailer: Option<Arc<dyn Mailer>>,
    pub(crate) config: AppConfig,
}

pub fn app(
    store: Arc<MetricStore>,
    forecaster: Arc<dyn Forecaster>,
    mailer: Option<Arc<dyn Mailer>>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        store,
        forecaster,
        mailer,
        config,
    };
    Router::new()
        .route("/", get(|| async { "loadcast: service load forecast" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/services", get(api::services_handler)) // GET /api/services
        .route(
            "/api/services/{service}/metrics",
            get(api::metrics_handler),
        ) // GET /api/services/{service}/metrics
        .route("/api/forecast", get(api::forecast_handler)) // GET /api/forecast?service=&metrics=
        .route("/api/export", get(api::export_handler)) // GET /api/export?service=&metrics=
        .route("/api/email", post(api::email_handler)) // POST /api/email
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
