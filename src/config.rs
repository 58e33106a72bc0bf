use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::models::{Cadence, Horizon};

/// Upper bounds for the dashboard horizon settings.
pub const MAX_CADENCE_MINUTES: i64 = 1440;
pub const MAX_HORIZON_PERIODS: u32 = 10_000;
pub const MAX_LONG_HORIZON_DAYS: u32 = 3650;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub exporter: ExporterConfig,
    pub dashboard: DashboardConfig,
    /// Absent section disables the email endpoint.
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file holding the document collections.
    pub path: String,
    /// Raw `{timestamp, service_name, metric_type, value}` documents read by the exporter.
    pub exporter_collection: String,
    /// Per-service documents with one key per metric, read by the dashboard.
    pub dashboard_collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/monitoring.db".into(),
            exporter_collection: "metrics".into(),
            dashboard_collection: "metrics_history".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub output_path: String,
    /// IANA zone the exported timestamps are rendered in.
    pub target_timezone: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            output_path: "/forecast/exportedMetrics.log".into(),
            target_timezone: "Asia/Kolkata".into(),
        }
    }
}

impl ExporterConfig {
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.target_timezone.parse::<Tz>().map_err(|e| {
            anyhow::anyhow!(
                "exporter.target_timezone {:?} is not a known zone: {}",
                self.target_timezone,
                e
            )
        })
    }
}

/// Where the dashboard reads its documents from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSource {
    Store,
    ExportedLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: DashboardSource,
    /// Defaults to exporter.output_path.
    pub exported_log_path: Option<String>,
    pub short_cadence_minutes: i64,
    pub short_horizon_periods: u32,
    pub long_horizon_days: u32,
    /// Forecast interval half-width in residual standard deviations.
    pub interval_z: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DashboardSource::Store,
            exported_log_path: None,
            short_cadence_minutes: 5,
            short_horizon_periods: 96,
            long_horizon_days: 30,
            interval_z: crate::forecast::DEFAULT_INTERVAL_Z,
        }
    }
}

impl DashboardConfig {
    pub fn short_horizon(&self) -> Horizon {
        Horizon {
            periods: self.short_horizon_periods,
            cadence: Cadence::minutes(self.short_cadence_minutes),
        }
    }

    pub fn long_horizon(&self) -> Horizon {
        Horizon {
            periods: self.long_horizon_days,
            cadence: Cadence::DAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (port 587).
    Starttls,
    /// TLS from the first byte (port 465).
    Implicit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default = "default_tls_mode")]
    pub tls: TlsMode,
    pub username: String,
    /// Usually supplied through SMTP_PASSWORD instead.
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_tls_mode() -> TlsMode {
    TlsMode::Starttls
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`), then applies environment overrides.
    /// Without CONFIG_FILE and without config.toml, the documented defaults are used.
    pub fn load() -> anyhow::Result<Self> {
        let s = match std::env::var("CONFIG_FILE") {
            Ok(path) => std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("config file {}: {}", path, e))?,
            Err(_) => read_if_present(Path::new("config.toml"))?,
        };
        let mut config: AppConfig = toml::from_str(&s)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Store location and SMTP credentials may come from the environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STORE_PATH") {
            self.store.path = v;
        }
        if let Some(v) = lookup("EXPORTER_COLLECTION") {
            self.store.exporter_collection = v;
        }
        if let Some(v) = lookup("DASHBOARD_COLLECTION") {
            self.store.dashboard_collection = v;
        }
        if let Some(v) = lookup("EXPORT_OUTPUT_PATH") {
            self.exporter.output_path = v;
        }
        if let Some(mail) = self.mail.as_mut() {
            if let Some(v) = lookup("SMTP_USERNAME") {
                mail.username = v;
            }
            if let Some(v) = lookup("SMTP_PASSWORD") {
                mail.password = Some(v);
            }
        }
    }

    /// Path the dashboard reads when its source is the exported log.
    pub fn exported_log_path(&self) -> &str {
        self.dashboard
            .exported_log_path
            .as_deref()
            .unwrap_or(&self.exporter.output_path)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.store.path.is_empty(), "store.path must be non-empty");
        anyhow::ensure!(
            !self.store.exporter_collection.is_empty(),
            "store.exporter_collection must be non-empty"
        );
        anyhow::ensure!(
            !self.store.dashboard_collection.is_empty(),
            "store.dashboard_collection must be non-empty"
        );
        anyhow::ensure!(
            !self.exporter.output_path.is_empty(),
            "exporter.output_path must be non-empty"
        );
        self.exporter.timezone()?;
        anyhow::ensure!(
            self.dashboard.short_cadence_minutes > 0,
            "dashboard.short_cadence_minutes must be > 0, got {}",
            self.dashboard.short_cadence_minutes
        );
        anyhow::ensure!(
            self.dashboard.short_cadence_minutes <= MAX_CADENCE_MINUTES,
            "dashboard.short_cadence_minutes must be <= {}, got {}",
            MAX_CADENCE_MINUTES,
            self.dashboard.short_cadence_minutes
        );
        anyhow::ensure!(
            (1..=MAX_HORIZON_PERIODS).contains(&self.dashboard.short_horizon_periods),
            "dashboard.short_horizon_periods must be between 1 and {}, got {}",
            MAX_HORIZON_PERIODS,
            self.dashboard.short_horizon_periods
        );
        anyhow::ensure!(
            (1..=MAX_LONG_HORIZON_DAYS).contains(&self.dashboard.long_horizon_days),
            "dashboard.long_horizon_days must be between 1 and {}, got {}",
            MAX_LONG_HORIZON_DAYS,
            self.dashboard.long_horizon_days
        );
        anyhow::ensure!(
            self.dashboard.interval_z.is_finite() && self.dashboard.interval_z >= 0.0,
            "dashboard.interval_z must be a finite value >= 0, got {}",
            self.dashboard.interval_z
        );
        if let Some(mail) = &self.mail {
            anyhow::ensure!(!mail.host.is_empty(), "mail.host must be non-empty");
            anyhow::ensure!(
                mail.port > 0,
                "mail.port must be between 1 and 65535, got {}",
                mail.port
            );
            anyhow::ensure!(!mail.from.is_empty(), "mail.from must be non-empty");
        }
        Ok(())
    }
}

/// Contents of `path`, or an empty string when it does not exist. Other I/O errors propagate.
pub fn read_if_present(path: &Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(anyhow::anyhow!("config file {}: {}", path.display(), e)),
    }
}
