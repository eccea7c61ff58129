//! stockchart: financial charting core.
//!
//! Two coupled engines make up the crate: axis ranges with value/pixel
//! mapping (`core`), and technical indicators deriving new series from
//! source series (`indicators`). `api::StockChart` ties them together with
//! areas, a layout pass and persistence snapshots. Rendering is left to the
//! host.

pub mod api;
pub mod core;
pub mod error;
pub mod indicators;
pub mod telemetry;

pub use api::{ChartSnapshot, IndicatorManager, StockChart};
pub use core::{
    Area, Axis, AxisRange, Bounds, PaintInfo, Point, PointKind, Series, Side, ViewValues,
    ViewValuesOutcome,
};
pub use error::{ChartError, ChartResult};
pub use indicators::{Indicator, IndicatorId, IndicatorKind, IndicatorParams};
