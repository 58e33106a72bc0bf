// Config loading, defaults, overrides and validation

use loadcast::config::{
    AppConfig, DashboardSource, MAX_CADENCE_MINUTES, MAX_HORIZON_PERIODS, MAX_LONG_HORIZON_DAYS,
    TlsMode, read_if_present,
};
use loadcast::models::Cadence;

const VALID_CONFIG: &str = r#"
[server]
port = 8501
host = "0.0.0.0"

[store]
path = "data/monitoring.db"
exporter_collection = "metrics"
dashboard_collection = "metrics_history"

[exporter]
output_path = "/forecast/exportedMetrics.log"
target_timezone = "Asia/Kolkata"

[dashboard]
source = "exported_log"
short_cadence_minutes = 5
short_horizon_periods = 96
long_horizon_days = 30

[mail]
host = "smtp.example.com"
port = 465
tls = "implicit"
username = "forecast-bot"
from = "Forecast Bot <forecast@example.com>"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8501);
    assert_eq!(config.store.exporter_collection, "metrics");
    assert_eq!(config.store.dashboard_collection, "metrics_history");
    assert_eq!(config.exporter.target_timezone, "Asia/Kolkata");
    assert_eq!(config.dashboard.source, DashboardSource::ExportedLog);
    let mail = config.mail.as_ref().expect("mail section");
    assert_eq!(mail.tls, TlsMode::Implicit);
    assert_eq!(mail.port, 465);
    assert!(mail.password.is_none());
}

#[test]
fn test_empty_config_uses_documented_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.server.port, 8501);
    assert_eq!(config.store.path, "data/monitoring.db");
    assert_eq!(config.exporter.output_path, "/forecast/exportedMetrics.log");
    assert_eq!(config.dashboard.source, DashboardSource::Store);
    assert!(config.mail.is_none());

    let short = config.dashboard.short_horizon();
    assert_eq!(short.periods, 96);
    assert_eq!(short.cadence, Cadence::minutes(5));
    let long = config.dashboard.long_horizon();
    assert_eq!(long.periods, 30);
    assert_eq!(long.cadence, Cadence::DAY);
}

#[test]
fn test_exported_log_path_falls_back_to_exporter_output() {
    let config = AppConfig::load_from_str("").unwrap();
    assert_eq!(config.exported_log_path(), "/forecast/exportedMetrics.log");

    let config =
        AppConfig::load_from_str("[dashboard]\nexported_log_path = \"/tmp/x.log\"\n").unwrap();
    assert_eq!(config.exported_log_path(), "/tmp/x.log");
}

#[test]
fn test_mail_defaults_to_starttls_on_587() {
    let config = AppConfig::load_from_str(
        "[mail]\nusername = \"bot\"\nfrom = \"bot@example.com\"\n",
    )
    .unwrap();
    let mail = config.mail.unwrap();
    assert_eq!(mail.host, "smtp.gmail.com");
    assert_eq!(mail.port, 587);
    assert_eq!(mail.tls, TlsMode::Starttls);
}

#[test]
fn test_env_overrides_apply() {
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    config.apply_overrides(|key| match key {
        "STORE_PATH" => Some("/var/lib/loadcast/store.db".into()),
        "DASHBOARD_COLLECTION" => Some("history_v2".into()),
        "SMTP_PASSWORD" => Some("hunter2".into()),
        _ => None,
    });
    assert_eq!(config.store.path, "/var/lib/loadcast/store.db");
    assert_eq!(config.store.dashboard_collection, "history_v2");
    assert_eq!(config.store.exporter_collection, "metrics");
    assert_eq!(config.mail.unwrap().password.as_deref(), Some("hunter2"));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8501", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_unknown_timezone() {
    let bad = VALID_CONFIG.replace("Asia/Kolkata", "Mars/Olympus_Mons");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("target_timezone"));
}

#[test]
fn test_config_validation_rejects_zero_horizon() {
    let bad = VALID_CONFIG.replace("long_horizon_days = 30", "long_horizon_days = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("long_horizon_days"));

    let bad = VALID_CONFIG.replace("short_cadence_minutes = 5", "short_cadence_minutes = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("short_cadence_minutes"));
}

#[test]
fn test_config_validation_rejects_empty_collection() {
    let bad = VALID_CONFIG.replace(
        "exporter_collection = \"metrics\"",
        "exporter_collection = \"\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("exporter_collection"));
}

#[test]
fn test_config_rejects_unknown_source() {
    let bad = VALID_CONFIG.replace("source = \"exported_log\"", "source = \"kafka\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_oversized_horizons() {
    let bad = VALID_CONFIG.replace("long_horizon_days = 30", "long_horizon_days = 4000000000");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("long_horizon_days"));

    let bad = VALID_CONFIG.replace(
        "short_horizon_periods = 96",
        &format!("short_horizon_periods = {}", MAX_HORIZON_PERIODS + 1),
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("short_horizon_periods"));

    let bad = VALID_CONFIG.replace(
        "short_cadence_minutes = 5",
        &format!("short_cadence_minutes = {}", MAX_CADENCE_MINUTES + 1),
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("short_cadence_minutes"));
}

#[test]
fn test_config_accepts_horizons_at_the_bounds() {
    let edge = VALID_CONFIG
        .replace(
            "long_horizon_days = 30",
            &format!("long_horizon_days = {}", MAX_LONG_HORIZON_DAYS),
        )
        .replace(
            "short_horizon_periods = 96",
            &format!("short_horizon_periods = {}", MAX_HORIZON_PERIODS),
        )
        .replace(
            "short_cadence_minutes = 5",
            &format!("short_cadence_minutes = {}", MAX_CADENCE_MINUTES),
        );
    let config = AppConfig::load_from_str(&edge).unwrap();
    assert_eq!(config.dashboard.long_horizon().periods, MAX_LONG_HORIZON_DAYS);
    assert_eq!(config.dashboard.short_horizon().cadence, Cadence::DAY);
}

#[test]
fn test_missing_config_file_reads_as_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let s = read_if_present(&dir.path().join("config.toml")).unwrap();
    assert!(s.is_empty());
}

#[test]
fn test_unreadable_config_file_is_an_error() {
    // A directory exists but cannot be read as a file.
    let dir = tempfile::TempDir::new().unwrap();
    let err = read_if_present(dir.path()).unwrap_err();
    assert!(err.to_string().contains("config file"));
}
