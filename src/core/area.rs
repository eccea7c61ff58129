use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::axis::{Axis, AxisConfig, Side};
use crate::core::series::Series;
use crate::error::ChartResult;

/// Default height share of areas created for oscillators.
pub const SUB_AREA_HEIGHT_PERCENT: f64 = 0.2;

/// Persistable area settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaConfig {
    pub name: String,
    pub visible: bool,
    pub auto_height: bool,
    pub height_percent: f64,
    pub axes: Vec<AxisConfig>,
    pub series: Vec<String>,
}

/// A chart sub-area: four axes plus the names of the series plotted in it.
///
/// Series are referenced by name and resolved by the owning chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    name: String,
    axes: [Axis; 4],
    series: Vec<String>,
    visible: bool,
    auto_height: bool,
    height_percent: f64,
}

fn axis_slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
        Side::Top => 2,
        Side::Bottom => 3,
    }
}

impl Area {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axes: Side::ALL.map(Axis::new),
            series: Vec::new(),
            visible: true,
            auto_height: true,
            height_percent: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> AreaConfig {
        AreaConfig {
            name: self.name.clone(),
            visible: self.visible,
            auto_height: self.auto_height,
            height_percent: self.height_percent,
            axes: self.axes.iter().map(Axis::config).collect(),
            series: self.series.clone(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AreaConfig) -> Self {
        let mut area = Self::new(config.name.clone());
        area.visible = config.visible;
        area.auto_height = config.auto_height;
        area.height_percent = config.height_percent;
        area.series.clone_from(&config.series);
        for axis_config in &config.axes {
            area.axis_mut(axis_config.side).apply_config(axis_config);
        }
        area
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn axis(&self, side: Side) -> &Axis {
        &self.axes[axis_slot(side)]
    }

    pub fn axis_mut(&mut self, side: Side) -> &mut Axis {
        &mut self.axes[axis_slot(side)]
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis; 4] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axis; 4] {
        &mut self.axes
    }

    /// Local pixel offset of `value` on the axis at `side`.
    pub fn get_coordinate(&self, side: Side, value: f64) -> ChartResult<f64> {
        self.axis(side).get_coordinate(value)
    }

    pub fn get_value_by_coordinate(
        &self,
        side: Side,
        coordinate: f64,
        is_absolute: bool,
    ) -> ChartResult<f64> {
        self.axis(side).get_value_by_coordinate(coordinate, is_absolute)
    }

    #[must_use]
    pub fn series_names(&self) -> &[String] {
        &self.series
    }

    #[must_use]
    pub fn contains_series(&self, name: &str) -> bool {
        self.series.iter().any(|series| series == name)
    }

    pub(crate) fn push_series(&mut self, name: impl Into<String>) {
        self.series.push(name.into());
    }

    /// Drops `name` from the area; returns whether it was present.
    pub(crate) fn remove_series(&mut self, name: &str) -> bool {
        let before = self.series.len();
        self.series.retain(|series| series != name);
        self.series.len() != before
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_auto_height(&self) -> bool {
        self.auto_height
    }

    pub fn set_auto_height(&mut self, auto_height: bool) {
        self.auto_height = auto_height;
    }

    /// Height share in `[0, 1]`, used when auto height is off.
    #[must_use]
    pub fn height_percent(&self) -> f64 {
        self.height_percent
    }

    pub fn set_height_percent(&mut self, percent: f64) {
        self.height_percent = percent;
    }

    pub fn set_all_axes_visible(&mut self, visible: bool) {
        for axis in &mut self.axes {
            axis.set_visible(visible);
        }
    }

    pub fn set_axes_visible(&mut self, left: bool, top: bool, right: bool, bottom: bool) {
        self.axis_mut(Side::Left).set_visible(left);
        self.axis_mut(Side::Top).set_visible(top);
        self.axis_mut(Side::Right).set_visible(right);
        self.axis_mut(Side::Bottom).set_visible(bottom);
    }

    pub fn reset_auto_values(&mut self) {
        for axis in &mut self.axes {
            axis.range_mut().reset_auto_values();
        }
    }

    pub fn reset_view_values(&mut self) {
        for axis in &mut self.axes {
            axis.range_mut().reset_view_values();
        }
    }

    /// Expands each auto X range by `[first - 1, last + 1]` of its series.
    pub fn calc_x_auto_values(&mut self, series: &[&Series]) {
        for s in series.iter().filter(|s| s.is_visible() && s.has_points()) {
            let (Some(first), Some(last)) = (s.first_scale_index(), s.last_scale_index()) else {
                continue;
            };
            let range = self.axis_mut(s.x_axis_side()).range_mut();
            if range.is_auto() {
                range.expand_auto_values(last + 1.0, first - 1.0);
            }
        }
    }

    /// Expands each auto Y range by the series' max/min inside the active X
    /// view, padded by the Y range's margin.
    pub fn calc_y_auto_values(&mut self, series: &[&Series]) {
        for s in series.iter().filter(|s| s.is_visible() && s.has_points()) {
            let x_range = self.axis(s.x_axis_side()).active_range();
            let (Some(view_max), Some(view_min)) =
                (x_range.max_view_or_auto_value(), x_range.min_view_or_auto_value())
            else {
                continue;
            };

            let y_range = self.axis_mut(s.y_axis_side()).range_mut();
            if !y_range.is_auto() {
                continue;
            }
            if let Some((max, min)) = s.max_min_price(view_max, view_min) {
                let margin = y_range.get_margin(max, min);
                y_range.expand_auto_values(max + margin, min - margin);
            }
        }
    }

    pub fn calc_auto_values(&mut self, series: &[&Series]) {
        self.reset_auto_values();
        self.calc_x_auto_values(series);
        self.calc_y_auto_values(series);
        trace!(area = %self.name, series = series.len(), "area auto values computed");
    }

    /// Zooms horizontal axes by `h_factor` and vertical axes by `v_factor`.
    pub fn zoom(&mut self, h_factor: f64, v_factor: f64) {
        for axis in &mut self.axes {
            let factor = if axis.is_horizontal() { h_factor } else { v_factor };
            axis.range_mut().zoom_view_values(factor);
        }
    }

    /// Moves horizontal axes by `h_factor` and vertical axes by `v_factor`.
    pub fn move_view(&mut self, h_factor: f64, v_factor: f64) {
        for axis in &mut self.axes {
            let factor = if axis.is_horizontal() { h_factor } else { v_factor };
            axis.range_mut().move_view_values(factor);
        }
    }
}
