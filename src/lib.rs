// Library for both binaries and the integration tests

pub mod config;
pub mod dashboard;
pub mod export_buffer;
pub mod exporter;
pub mod forecast;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod store;
