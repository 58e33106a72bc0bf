use anyhow::Result;
use loadcast::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let app_config = config::AppConfig::load()?;

    let store = Arc::new(store::MetricStore::connect(&app_config.store.path).await?);
    store.init().await?;

    let forecaster: Arc<dyn forecast::Forecaster> = Arc::new(forecast::LinearTrendForecaster {
        interval_z: app_config.dashboard.interval_z,
    });
    let mailer: Option<Arc<dyn mailer::Mailer>> = match &app_config.mail {
        Some(mail_config) => {
            let smtp = mailer::SmtpMailer::from_config(mail_config)?;
            Some(Arc::new(smtp) as Arc<dyn mailer::Mailer>)
        }
        None => {
            tracing::info!("No [mail] section; email endpoint disabled");
            None
        }
    };

    let app = routes::app(store, forecaster, mailer, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        source = ?app_config.dashboard.source,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
