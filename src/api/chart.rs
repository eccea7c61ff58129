use indexmap::IndexMap;
use tracing::debug;

use crate::core::{Area, AxisRange, Series, Side};
use crate::error::{ChartError, ChartResult};

use super::IndicatorManager;

/// Chart container: ordered areas, user series, indicators and optional
/// per-side global axis ranges shared by every area.
///
/// Series are owned here (user series) or by their indicator (derived
/// series); areas only reference them by name. Names are unique across
/// both stores.
#[derive(Debug, Clone, Default)]
pub struct StockChart {
    pub(super) areas: Vec<Area>,
    pub(super) series: IndexMap<String, Series>,
    pub(super) indicators: IndicatorManager,
    pub(super) global_ranges: IndexMap<Side, AxisRange>,
    pub(super) area_counter: u64,
}

/// Resolves `name` against user series first, then indicator outputs.
pub(super) fn lookup_series<'a>(
    series: &'a IndexMap<String, Series>,
    indicators: &'a IndicatorManager,
    name: &str,
) -> Option<&'a Series> {
    series
        .get(name)
        .or_else(|| indicators.find_output(name))
}

impl StockChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an area with a generated `Area{n}` name and returns the name.
    pub fn add_area(&mut self) -> String {
        let name = self.next_area_name();
        self.areas.push(Area::new(name.clone()));
        debug!(area = %name, areas = self.areas.len(), "area added");
        name
    }

    /// Appends an area with an explicit name.
    pub fn add_area_named(&mut self, name: impl Into<String>) -> ChartResult<&mut Area> {
        let name = name.into();
        if self.area(&name).is_some() {
            return Err(ChartError::InvalidData(format!("area '{name}' already exists")));
        }
        self.areas.push(Area::new(name));
        let last = self.areas.len() - 1;
        Ok(&mut self.areas[last])
    }

    pub(super) fn next_area_name(&mut self) -> String {
        loop {
            self.area_counter += 1;
            let name = format!("Area{}", self.area_counter);
            if self.area(&name).is_none() {
                return name;
            }
        }
    }

    /// Removes an area. Its user series stay in the store, detached.
    pub fn remove_area(&mut self, name: &str) -> ChartResult<Area> {
        let index = self
            .areas
            .iter()
            .position(|area| area.name() == name)
            .ok_or_else(|| ChartError::UnknownArea(name.to_owned()))?;
        debug!(area = %name, "area removed");
        Ok(self.areas.remove(index))
    }

    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    #[must_use]
    pub fn area(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.name() == name)
    }

    pub fn area_mut(&mut self, name: &str) -> Option<&mut Area> {
        self.areas.iter_mut().find(|area| area.name() == name)
    }

    /// The area plotting `series_name`, if any.
    #[must_use]
    pub fn area_of_series(&self, series_name: &str) -> Option<&Area> {
        self.areas
            .iter()
            .find(|area| area.contains_series(series_name))
    }

    #[must_use]
    pub fn contains_series(&self, name: &str) -> bool {
        self.series(name).is_some()
    }

    /// Adds a user series to `area_name`.
    pub fn add_series(&mut self, area_name: &str, series: Series) -> ChartResult<()> {
        if self.contains_series(series.name()) {
            return Err(ChartError::DuplicateSeries(series.name().to_owned()));
        }
        let area = self
            .area_mut(area_name)
            .ok_or_else(|| ChartError::UnknownArea(area_name.to_owned()))?;
        area.push_series(series.name());

        debug!(
            series = %series.name(),
            area = %area_name,
            kind = ?series.kind(),
            points = series.point_count(),
            "series added"
        );
        self.series.insert(series.name().to_owned(), series);
        Ok(())
    }

    /// Removes a user series from the store and from every area.
    ///
    /// Indicators reading from it are kept and skipped on recalculation.
    pub fn remove_series(&mut self, name: &str) -> ChartResult<Series> {
        let series = self
            .series
            .shift_remove(name)
            .ok_or_else(|| ChartError::UnknownSeries(name.to_owned()))?;
        for area in &mut self.areas {
            area.remove_series(name);
        }
        debug!(series = %name, "series removed");
        Ok(series)
    }

    /// Looks up a user series or an indicator output.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Series> {
        lookup_series(&self.series, &self.indicators, name)
    }

    /// Mutable access to a user series. Indicator outputs are read-only.
    pub fn series_mut(&mut self, name: &str) -> Option<&mut Series> {
        self.series.get_mut(name)
    }

    /// User series in insertion order.
    pub fn user_series(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    #[must_use]
    pub fn indicators(&self) -> &IndicatorManager {
        &self.indicators
    }

    /// Local pixel offset of `value` on an area axis.
    pub fn get_coordinate(&self, area_name: &str, side: Side, value: f64) -> ChartResult<f64> {
        self.area(area_name)
            .ok_or_else(|| ChartError::UnknownArea(area_name.to_owned()))?
            .get_coordinate(side, value)
    }

    pub fn get_value_by_coordinate(
        &self,
        area_name: &str,
        side: Side,
        coordinate: f64,
        is_absolute: bool,
    ) -> ChartResult<f64> {
        self.area(area_name)
            .ok_or_else(|| ChartError::UnknownArea(area_name.to_owned()))?
            .get_value_by_coordinate(side, coordinate, is_absolute)
    }
}
