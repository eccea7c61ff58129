use serde::{Deserialize, Serialize};

use crate::core::axis_range::AxisRange;
use crate::core::paint_info::PaintInfo;
use crate::core::scale_values::{ScaleValuesProvider, even_scale_values};
use crate::core::types::Bounds;
use crate::error::ChartResult;

pub const DEFAULT_LINES_COUNT: usize = 5;

/// Logical position of an axis around an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Persistable axis settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub side: Side,
    pub range: AxisRange,
    pub visible: bool,
    pub logarithmic: bool,
    pub lines_count: usize,
}

/// One scale of an area: a range plus value/pixel mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    side: Side,
    range: AxisRange,
    global_range: Option<AxisRange>,
    bounds: Bounds,
    visible: bool,
    logarithmic: bool,
    lines_count: usize,
    scale_values_provider: Option<ScaleValuesProvider>,
}

impl Axis {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            range: AxisRange::default(),
            global_range: None,
            bounds: Bounds::default(),
            visible: true,
            logarithmic: false,
            lines_count: DEFAULT_LINES_COUNT,
            scale_values_provider: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> AxisConfig {
        AxisConfig {
            side: self.side,
            range: self.range,
            visible: self.visible,
            logarithmic: self.logarithmic,
            lines_count: self.lines_count,
        }
    }

    /// Applies persisted settings. The side of an axis never changes.
    pub fn apply_config(&mut self, config: &AxisConfig) {
        self.range = config.range;
        self.visible = config.visible;
        self.logarithmic = config.logarithmic;
        self.lines_count = config.lines_count;
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.side.is_horizontal()
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.side.is_vertical()
    }

    #[must_use]
    pub fn range(&self) -> &AxisRange {
        &self.range
    }

    pub fn range_mut(&mut self) -> &mut AxisRange {
        &mut self.range
    }

    #[must_use]
    pub fn global_range(&self) -> Option<&AxisRange> {
        self.global_range.as_ref()
    }

    /// Installs (or clears) the cross-area override for this pass.
    pub fn set_global_range(&mut self, range: Option<AxisRange>) {
        self.global_range = range;
    }

    /// The global override when present, else the axis' own range.
    #[must_use]
    pub fn active_range(&self) -> &AxisRange {
        self.global_range.as_ref().unwrap_or(&self.range)
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Absolute screen rectangle; its width (horizontal) or height
    /// (vertical) is the pixel extent used for mapping.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_logarithmic(&self) -> bool {
        self.logarithmic
    }

    pub fn set_logarithmic(&mut self, logarithmic: bool) {
        self.logarithmic = logarithmic;
    }

    #[must_use]
    pub fn lines_count(&self) -> usize {
        self.lines_count
    }

    pub fn set_lines_count(&mut self, count: usize) {
        self.lines_count = count;
    }

    #[must_use]
    pub fn scale_values_provider(&self) -> Option<&ScaleValuesProvider> {
        self.scale_values_provider.as_ref()
    }

    pub fn set_scale_values_provider(&mut self, provider: Option<ScaleValuesProvider>) {
        self.scale_values_provider = provider;
    }

    pub fn paint_info(&self) -> ChartResult<PaintInfo> {
        PaintInfo::from_axis(self)
    }

    /// Local pixel offset of `value` along this axis.
    pub fn get_coordinate(&self, value: f64) -> ChartResult<f64> {
        self.paint_info()?.coordinate(value)
    }

    /// Value at a pixel offset. Absolute coordinates are first shifted by the
    /// axis origin (left for horizontal axes, top for vertical ones).
    pub fn get_value_by_coordinate(&self, coordinate: f64, is_absolute: bool) -> ChartResult<f64> {
        let local = match (is_absolute, self.is_horizontal()) {
            (false, _) => coordinate,
            (true, true) => coordinate - self.bounds.left,
            (true, false) => coordinate - self.bounds.top,
        };
        self.paint_info()?.value_at(local)
    }

    /// Grid values for `info`; `None` for a degenerate range.
    #[must_use]
    pub fn get_scale_values(&self, info: &PaintInfo) -> Option<Vec<f64>> {
        if info.min == info.max {
            return None;
        }
        match &self.scale_values_provider {
            Some(provider) => provider.scale_values(info, self.lines_count),
            None => Some(even_scale_values(info, self.lines_count)),
        }
    }
}
