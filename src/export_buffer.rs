// Tabular forecast export (CSV, one row per date).

use crate::models::ForecastSeries;

pub const FILE_NAME: &str = "forecast.csv";
pub const CONTENT_TYPE: &str = "text/csv";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `Service,Metric,Date,Forecast,Lower Bound,Upper Bound`.
pub fn forecast_table(
    forecast: &ForecastSeries,
    service: &str,
    metric: &str,
) -> anyhow::Result<Vec<u8>> {
    write_table(forecast, Some((service, metric)))
}

/// `Date,Forecast,Lower Bound,Upper Bound`.
pub fn forecast_table_plain(forecast: &ForecastSeries) -> anyhow::Result<Vec<u8>> {
    write_table(forecast, None)
}

fn write_table(forecast: &ForecastSeries, prefix: Option<(&str, &str)>) -> anyhow::Result<Vec<u8>> {
    let mut w = csv::Writer::from_writer(Vec::new());
    let mut header = Vec::with_capacity(6);
    if prefix.is_some() {
        header.extend(["Service", "Metric"]);
    }
    header.extend(["Date", "Forecast", "Lower Bound", "Upper Bound"]);
    w.write_record(&header)?;

    for p in &forecast.points {
        let mut row = Vec::with_capacity(6);
        if let Some((service, metric)) = prefix {
            row.push(service.to_string());
            row.push(metric.to_string());
        }
        row.push(p.timestamp.format(DATE_FORMAT).to_string());
        row.push(p.estimate.to_string());
        row.push(p.lower.to_string());
        row.push(p.upper.to_string());
        w.write_record(&row)?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush: {}", e.error()))
}
