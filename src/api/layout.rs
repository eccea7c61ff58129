use tracing::{debug, trace};

use crate::core::{AxisRange, Series, Side};
use crate::error::{ChartError, ChartResult};

use super::StockChart;
use super::chart::lookup_series;

impl StockChart {
    /// Range shared by every area on `side`, when enabled.
    #[must_use]
    pub fn global_axis_range(&self, side: Side) -> Option<&AxisRange> {
        self.global_ranges.get(&side)
    }

    pub fn global_axis_range_mut(&mut self, side: Side) -> Option<&mut AxisRange> {
        self.global_ranges.get_mut(&side)
    }

    /// Synchronizes `side` across all areas through `range`.
    pub fn enable_global_axis_range(&mut self, side: Side, range: AxisRange) {
        self.global_ranges.insert(side, range);
        debug!(side = ?side, "global axis range enabled");
    }

    pub fn disable_global_axis_range(&mut self, side: Side) -> Option<AxisRange> {
        let removed = self.global_ranges.shift_remove(&side);
        for area in &mut self.areas {
            area.axis_mut(side).set_global_range(None);
        }
        debug!(side = ?side, "global axis range disabled");
        removed
    }

    /// Layout pass: local auto values per visible area, then global
    /// aggregation and override assignment, then Y auto values again so they
    /// follow a global X view.
    pub fn recalc(&mut self) {
        self.calc_local_values();
        self.calc_global_values();
        self.calc_y_values();
        trace!(areas = self.areas.len(), "layout pass complete");
    }

    fn calc_local_values(&mut self) {
        let Self {
            areas,
            series,
            indicators,
            ..
        } = self;
        for area in areas.iter_mut().filter(|area| area.is_visible()) {
            let resolved: Vec<&Series> = area
                .series_names()
                .iter()
                .filter_map(|name| lookup_series(series, indicators, name))
                .collect();
            area.calc_auto_values(&resolved);
        }
    }

    fn calc_global_values(&mut self) {
        for (side, global) in &mut self.global_ranges {
            global.reset_auto_values();
            if !global.is_auto() {
                continue;
            }
            for area in self.areas.iter().filter(|area| area.is_visible()) {
                let local = area.axis(*side).range();
                if let (Some(max), Some(min)) =
                    (local.max_or_auto_value(), local.min_or_auto_value())
                {
                    global.expand_auto_values(max, min);
                }
            }
        }
        self.propagate_global_ranges();
    }

    /// Copies the current global ranges into every visible area's axes.
    pub(super) fn propagate_global_ranges(&mut self) {
        for area in self.areas.iter_mut().filter(|area| area.is_visible()) {
            for axis in area.axes_mut() {
                axis.set_global_range(self.global_ranges.get(&axis.side()).copied());
            }
        }
    }

    fn calc_y_values(&mut self) {
        let Self {
            areas,
            series,
            indicators,
            ..
        } = self;
        for area in areas.iter_mut().filter(|area| area.is_visible()) {
            let resolved: Vec<&Series> = area
                .series_names()
                .iter()
                .filter_map(|name| lookup_series(series, indicators, name))
                .collect();
            area.calc_y_auto_values(&resolved);
        }
    }

    /// Clears every view window so all ranges follow their auto/fixed bounds.
    pub fn reset_view(&mut self) {
        for global in self.global_ranges.values_mut() {
            global.reset_view_values();
        }
        for area in &mut self.areas {
            area.reset_view_values();
        }
        self.propagate_global_ranges();
    }

    /// Zooms an area; sides with a global range zoom the shared range.
    pub fn zoom(&mut self, area_name: &str, h_factor: f64, v_factor: f64) -> ChartResult<()> {
        self.apply_view_change(area_name, h_factor, v_factor, AxisRange::zoom_view_values)
    }

    /// Moves an area's view; sides with a global range move the shared range.
    pub fn move_view(&mut self, area_name: &str, h_factor: f64, v_factor: f64) -> ChartResult<()> {
        self.apply_view_change(area_name, h_factor, v_factor, AxisRange::move_view_values)
    }

    fn apply_view_change(
        &mut self,
        area_name: &str,
        h_factor: f64,
        v_factor: f64,
        change: fn(&mut AxisRange, f64),
    ) -> ChartResult<()> {
        let area = self
            .areas
            .iter_mut()
            .find(|area| area.name() == area_name)
            .ok_or_else(|| ChartError::UnknownArea(area_name.to_owned()))?;

        for side in Side::ALL {
            let factor = if side.is_horizontal() { h_factor } else { v_factor };
            match self.global_ranges.get_mut(&side) {
                Some(global) => change(global, factor),
                None => change(area.axis_mut(side).range_mut(), factor),
            }
        }
        self.propagate_global_ranges();
        Ok(())
    }
}
