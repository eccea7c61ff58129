use serde::{Deserialize, Serialize};

use crate::core::axis::Side;
use crate::core::point::{Point, PointKind};
use crate::core::primitives::round_half_up;
use crate::core::windowing::{ViewWindow, range_max_min};
use crate::error::{ChartError, ChartResult};

/// Persistable series settings (everything except the points themselves).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub name: String,
    pub kind: PointKind,
    pub index_offset: i64,
    pub x_axis_side: Side,
    pub y_axis_side: Side,
    pub visible: bool,
    #[serde(default)]
    pub last_value: Option<f64>,
}

/// Ordered point storage mapped onto a global scale index.
///
/// Storage position `i` sits at scale index `index_offset + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    kind: PointKind,
    points: Vec<Point>,
    index_offset: i64,
    last_value: Option<f64>,
    visible: bool,
    x_axis_side: Side,
    y_axis_side: Side,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PointKind) -> Self {
        Self {
            name: name.into(),
            kind,
            points: Vec::new(),
            index_offset: 0,
            last_value: None,
            visible: true,
            x_axis_side: Side::Bottom,
            y_axis_side: Side::Right,
        }
    }

    #[must_use]
    pub fn from_config(config: &SeriesConfig) -> Self {
        let mut series = Self::new(config.name.clone(), config.kind);
        series.apply_config(config);
        series
    }

    #[must_use]
    pub fn config(&self) -> SeriesConfig {
        SeriesConfig {
            name: self.name.clone(),
            kind: self.kind,
            index_offset: self.index_offset,
            x_axis_side: self.x_axis_side,
            y_axis_side: self.y_axis_side,
            visible: self.visible,
            last_value: self.last_value,
        }
    }

    /// Applies persisted settings; the point kind is fixed at construction.
    pub fn apply_config(&mut self, config: &SeriesConfig) {
        self.name.clone_from(&config.name);
        self.index_offset = config.index_offset;
        self.x_axis_side = config.x_axis_side;
        self.y_axis_side = config.y_axis_side;
        self.visible = config.visible;
        self.last_value = config.last_value;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn kind(&self) -> PointKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn point_at(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn point_at_mut(&mut self, index: usize) -> Option<&mut Point> {
        self.points.get_mut(index)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn has_points(&self) -> bool {
        !self.points.is_empty()
    }

    /// Appends a point of the series' kind.
    pub fn push(&mut self, point: Point) -> ChartResult<()> {
        if point.kind() != self.kind {
            return Err(ChartError::InvalidData(format!(
                "cannot add {:?} point to {:?} series '{}'",
                point.kind(),
                self.kind,
                self.name
            )));
        }
        self.points.push(point);
        Ok(())
    }

    /// Appends a point the caller built with this series' kind.
    pub(crate) fn push_unchecked(&mut self, point: Point) {
        debug_assert_eq!(point.kind(), self.kind);
        self.points.push(point);
    }

    /// Appends a point from raw field values.
    pub fn add_point(&mut self, fields: &[f64]) -> ChartResult<&mut Point> {
        let point = Point::new(self.kind, fields)?;
        self.points.push(point);
        let last = self.points.len() - 1;
        Ok(&mut self.points[last])
    }

    pub fn add_line_point(&mut self, value: f64) -> ChartResult<()> {
        self.push(Point::line(value))
    }

    pub fn add_bar_point(&mut self, v0: f64, v1: f64) -> ChartResult<()> {
        self.push(Point::bar(v0, v1))
    }

    pub fn add_stock_point(
        &mut self,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> ChartResult<()> {
        self.push(Point::stock(open, high, low, close))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Collects field `value_index` of every point, in storage order.
    pub fn field_values(&self, value_index: usize) -> ChartResult<Vec<f64>> {
        if value_index >= self.kind.field_count() {
            return Err(ChartError::InvalidData(format!(
                "value index {value_index} out of range for {:?} series '{}'",
                self.kind, self.name
            )));
        }
        Ok(self
            .points
            .iter()
            .map(|point| point.values()[value_index])
            .collect())
    }

    #[must_use]
    pub fn index_offset(&self) -> i64 {
        self.index_offset
    }

    pub fn set_index_offset(&mut self, offset: i64) {
        self.index_offset = offset;
    }

    /// `round(scale_index) - index_offset`; may be negative or past the end.
    #[must_use]
    pub fn convert_to_array_index(&self, scale_index: f64) -> i64 {
        round_half_up(scale_index) - self.index_offset
    }

    #[must_use]
    pub fn convert_to_array_index_zero_based(&self, scale_index: f64) -> usize {
        usize::try_from(self.convert_to_array_index(scale_index)).unwrap_or(0)
    }

    #[must_use]
    pub fn convert_to_scale_index(&self, array_index: usize) -> f64 {
        (self.index_offset + array_index as i64) as f64
    }

    #[must_use]
    pub fn first_scale_index(&self) -> Option<f64> {
        self.has_points().then(|| self.convert_to_scale_index(0))
    }

    #[must_use]
    pub fn last_scale_index(&self) -> Option<f64> {
        self.points
            .len()
            .checked_sub(1)
            .map(|last| self.convert_to_scale_index(last))
    }

    #[must_use]
    pub fn is_visible_on_screen(&self, view_max: f64, view_min: f64) -> bool {
        if !self.visible {
            return false;
        }
        let (Some(first), Some(last)) = (self.first_scale_index(), self.last_scale_index()) else {
            return false;
        };
        !(first > view_max || last < view_min)
    }

    /// Points in the horizontal view window, paired with their scale index.
    #[must_use]
    pub fn view_window(&self, view_max: f64, view_min: f64) -> ViewWindow<'_> {
        ViewWindow::new(self, view_max, view_min)
    }

    /// Vertical `(max, min)` of the points inside the horizontal view window.
    ///
    /// The scan stops after the first point past `view_max`, which is
    /// still included so edge bars are not clipped.
    #[must_use]
    pub fn max_min_price(&self, view_max: f64, view_min: f64) -> Option<(f64, f64)> {
        if !self.is_visible_on_screen(view_max, view_min) {
            return None;
        }

        self.view_window(view_max, view_min)
            .map(|(_, point)| point.max_min())
            .reduce(|(max, min), (p_max, p_min)| (max.max(p_max), min.min(p_min)))
    }

    /// `(max, min)` over the inclusive array range `start..=end`.
    #[must_use]
    pub fn range_max_min(&self, start: usize, end: usize) -> Option<(f64, f64)> {
        range_max_min(&self.points, start, end)
    }

    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn set_last_value(&mut self, value: Option<f64>) {
        self.last_value = value;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn x_axis_side(&self) -> Side {
        self.x_axis_side
    }

    pub fn set_x_axis_side(&mut self, side: Side) {
        self.x_axis_side = side;
    }

    #[must_use]
    pub fn y_axis_side(&self) -> Side {
        self.y_axis_side
    }

    pub fn set_y_axis_side(&mut self, side: Side) {
        self.y_axis_side = side;
    }
}
