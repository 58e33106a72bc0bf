// Domain models: raw points, exported records, dashboard series

mod metric;
mod record;
mod series;
mod timestamp;

pub use metric::{
    CPU_PERCENT, ERRORS_TOTAL, HTTP_REQUESTS_TOTAL, MEMORY_USED_MB, REQUIRED_METRICS,
    RawMetricPoint, coerce_numeric,
};
pub use record::ExportedRecord;
pub use series::{
    AggregatedSeries, Cadence, FlattenedObservation, ForecastPoint, ForecastSeries, Horizon,
    MergedPoint, MergedSeries, SeriesPoint,
};
pub use timestamp::{parse_utc, parse_wall_clock};
