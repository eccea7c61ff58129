mod chart;
mod indicator_manager;
mod json_contract;
mod layout;
mod snapshot;

pub use chart::StockChart;
pub use indicator_manager::IndicatorManager;
pub use json_contract::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshotJsonContractV1};
pub use snapshot::{ChartSnapshot, IndicatorSpec, PointSnapshot, SeriesSnapshot};
