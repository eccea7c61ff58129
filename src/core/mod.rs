pub mod area;
pub mod axis;
pub mod axis_range;
pub mod paint_info;
pub mod point;
pub mod primitives;
pub mod scale_values;
pub mod series;
pub mod types;
pub mod windowing;

pub use area::{Area, AreaConfig};
pub use axis::{Axis, AxisConfig, Side};
pub use axis_range::{AxisRange, ViewValues, ViewValuesOutcome};
pub use paint_info::PaintInfo;
pub use point::{Point, PointKind};
pub use scale_values::{DateTimeScaleValues, ScaleValuesProvider, SmartScaleValues};
pub use series::{Series, SeriesConfig};
pub use types::Bounds;
pub use windowing::ViewWindow;
