// Reshaping pipeline. Pure functions; the store and the forecaster stay outside.

pub mod flatten;
pub mod grouping;
pub mod merge;
pub mod resample;

pub use flatten::{flatten_document, flatten_documents, flatten_exported_log};
pub use grouping::{GroupKey, MetricGroup, complete_records, format_in_zone, group_points};
pub use merge::merge_for_display;
pub use resample::{MIN_FORECAST_POINTS, resample_max};
