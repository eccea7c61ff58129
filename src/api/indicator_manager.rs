use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::area::SUB_AREA_HEIGHT_PERCENT;
use crate::core::{Area, Series, Side};
use crate::error::{ChartError, ChartResult};
use crate::indicators::{
    BollingerParams, Compute, EmaParams, EnvelopesParams, Indicator, IndicatorId, IndicatorKind,
    IndicatorParams, MacdParams, RsiParams, SmaParams, StochasticParams,
};

use super::StockChart;
use super::chart::lookup_series;

/// Owns every indicator of a chart, keyed by id in creation order.
///
/// Creation order doubles as recalculation order, so an indicator reading
/// another indicator's output always runs after it.
#[derive(Debug, Clone, Default)]
pub struct IndicatorManager {
    indicators: IndexMap<IndicatorId, Indicator>,
    next_id: u64,
}

impl IndicatorManager {
    #[must_use]
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: IndicatorId) -> Option<&Indicator> {
        self.indicators.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.values()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<IndicatorId> {
        self.indicators.keys().copied().collect()
    }

    /// Destination series named `name`, across all indicators.
    #[must_use]
    pub fn find_output(&self, name: &str) -> Option<&Series> {
        self.indicators
            .values()
            .find_map(|indicator| indicator.output(name))
    }

    /// The indicator owning destination series `name`.
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<IndicatorId> {
        self.indicators
            .values()
            .find(|indicator| indicator.output(name).is_some())
            .map(Indicator::id)
    }

    /// First indicator whose source is one of `outputs`.
    fn dependent_of(&self, outputs: &[String]) -> Option<IndicatorId> {
        self.indicators
            .values()
            .find(|indicator| outputs.iter().any(|name| name == indicator.source_name()))
            .map(Indicator::id)
    }

    pub(super) fn allocate_id(&mut self) -> IndicatorId {
        self.next_id += 1;
        IndicatorId(self.next_id)
    }

    pub(super) fn insert(&mut self, indicator: Indicator) {
        self.next_id = self.next_id.max(indicator.id().0);
        self.indicators.insert(indicator.id(), indicator);
    }

    fn get_mut(&mut self, id: IndicatorId) -> Option<&mut Indicator> {
        self.indicators.get_mut(&id)
    }

    fn remove(&mut self, id: IndicatorId) -> Option<Indicator> {
        self.indicators.shift_remove(&id)
    }
}

impl StockChart {
    pub fn add_sma(
        &mut self,
        source: &str,
        value_index: usize,
        params: SmaParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Sma(params))
    }

    pub fn add_ema(
        &mut self,
        source: &str,
        value_index: usize,
        params: EmaParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Ema(params))
    }

    pub fn add_bollinger_bands(
        &mut self,
        source: &str,
        value_index: usize,
        params: BollingerParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Bollinger(params))
    }

    pub fn add_envelopes(
        &mut self,
        source: &str,
        value_index: usize,
        params: EnvelopesParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Envelopes(params))
    }

    pub fn add_rsi(
        &mut self,
        source: &str,
        value_index: usize,
        params: RsiParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Rsi(params))
    }

    pub fn add_macd(
        &mut self,
        source: &str,
        value_index: usize,
        params: MacdParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Macd(params))
    }

    pub fn add_stochastic(
        &mut self,
        source: &str,
        value_index: usize,
        params: StochasticParams,
    ) -> ChartResult<IndicatorId> {
        self.add_indicator(source, value_index, IndicatorParams::Stochastic(params))
    }

    /// Creates an indicator reading field `value_index` of `source`.
    ///
    /// Overlays (SMA, EMA, Bollinger, Envelopes) are plotted in the source's
    /// area; oscillators (RSI, MACD, Stochastic) get a new sub-area. Outputs
    /// use the source's axis sides and are computed right away.
    pub fn add_indicator(
        &mut self,
        source: &str,
        value_index: usize,
        params: IndicatorParams,
    ) -> ChartResult<IndicatorId> {
        let source_series = self
            .series(source)
            .cloned()
            .ok_or_else(|| ChartError::UnknownSeries(source.to_owned()))?;
        if value_index >= source_series.kind().field_count() {
            return Err(ChartError::InvalidData(format!(
                "value index {value_index} out of range for series '{source}'"
            )));
        }
        let parent_index = self
            .areas
            .iter()
            .position(|area| area.contains_series(source))
            .ok_or_else(|| {
                ChartError::InvalidData(format!("series '{source}' is not attached to an area"))
            })?;

        let id = self.indicators.allocate_id();
        let dst_names: Vec<String> = params
            .output_suffixes()
            .iter()
            .map(|suffix| format!("{}{}{}", params.tag(), id.0, suffix))
            .collect();
        if let Some(taken) = dst_names.iter().find(|name| self.contains_series(name)) {
            return Err(ChartError::DuplicateSeries(taken.clone()));
        }

        let mut kind = IndicatorKind::from_params(params, &dst_names)?;
        for output in kind.outputs_mut() {
            output.set_x_axis_side(source_series.x_axis_side());
            output.set_y_axis_side(source_series.y_axis_side());
        }
        let mut indicator = Indicator::new(id, source, value_index, kind);
        indicator.recalc(&source_series)?;

        let target_index = if params.is_overlay() {
            parent_index
        } else {
            let area = self.new_sub_area(parent_index);
            self.areas.push(area);
            self.areas.len() - 1
        };
        for name in &dst_names {
            self.areas[target_index].push_series(name.clone());
        }

        debug!(
            indicator = %id,
            kind = params.tag(),
            source = %source,
            area = %self.areas[target_index].name(),
            outputs = ?dst_names,
            "indicator added"
        );
        self.indicators.insert(indicator);
        Ok(id)
    }

    fn new_sub_area(&mut self, parent_index: usize) -> Area {
        let parent = &self.areas[parent_index];
        let left = parent.axis(Side::Left).is_visible();
        let right = parent.axis(Side::Right).is_visible();

        let mut area = Area::new(self.next_area_name());
        area.set_auto_height(false);
        area.set_height_percent(SUB_AREA_HEIGHT_PERCENT);
        area.set_axes_visible(left, false, right, false);
        area
    }

    /// Removes an indicator and its outputs. Areas left empty by the
    /// removal are dropped too.
    ///
    /// Fails with [`ChartError::IndicatorInUse`] while another indicator
    /// reads one of its outputs; remove the dependent first.
    pub fn remove_indicator(&mut self, id: IndicatorId) -> ChartResult<Indicator> {
        let outputs = self
            .indicators
            .get(id)
            .ok_or(ChartError::UnknownIndicator(id))?
            .output_names();
        if let Some(dependent) = self.indicators.dependent_of(&outputs) {
            return Err(ChartError::IndicatorInUse { id, dependent });
        }
        let indicator = self
            .indicators
            .remove(id)
            .ok_or(ChartError::UnknownIndicator(id))?;

        let mut emptied = Vec::new();
        for area in &mut self.areas {
            let mut touched = false;
            for name in &outputs {
                touched |= area.remove_series(name);
            }
            if touched && area.series_names().is_empty() {
                emptied.push(area.name().to_owned());
            }
        }
        self.areas.retain(|area| !emptied.contains(&area.name().to_owned()));

        debug!(
            indicator = %id,
            outputs = ?outputs,
            removed_areas = ?emptied,
            "indicator removed"
        );
        Ok(indicator)
    }

    /// Replaces an indicator's parameters and recomputes it.
    pub fn update_indicator(
        &mut self,
        id: IndicatorId,
        params: IndicatorParams,
    ) -> ChartResult<()> {
        let source_name = self
            .indicators
            .get(id)
            .ok_or(ChartError::UnknownIndicator(id))?
            .source_name()
            .to_owned();
        let source = self
            .series(&source_name)
            .cloned()
            .ok_or(ChartError::UnknownSeries(source_name))?;

        let indicator = self
            .indicators
            .get_mut(id)
            .ok_or(ChartError::UnknownIndicator(id))?;
        indicator.kind_mut().set_params(params)?;
        indicator.recalc(&source)
    }

    /// Recomputes every indicator in creation order. Indicators whose source
    /// is gone or incompatible are skipped with a warning.
    pub fn recalc_indicators(&mut self) {
        for id in self.indicators.ids() {
            let Self {
                series, indicators, ..
            } = self;
            let Some(indicator) = indicators.get(id) else {
                continue;
            };
            let source_name = indicator.source_name().to_owned();
            let Some(source) = lookup_series(series, indicators, &source_name).cloned() else {
                warn!(
                    indicator = %id,
                    source = %source_name,
                    "skipping indicator with unresolved source"
                );
                continue;
            };

            if let Some(indicator) = indicators.get_mut(id) {
                if let Err(err) = indicator.recalc(&source) {
                    warn!(indicator = %id, error = %err, "skipping indicator recalculation");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::StockChart;
    use crate::core::point::stock_field;
    use crate::core::{PointKind, Series, Side};
    use crate::error::ChartError;
    use crate::indicators::{MacdParams, RsiParams, SmaParams};

    fn chart_with_price() -> (StockChart, String) {
        let mut chart = StockChart::new();
        let area = chart.add_area();
        let mut price = Series::new("price", PointKind::Stock);
        price.set_y_axis_side(Side::Left);
        for i in 0..40 {
            let close = 100.0 + (i as f64 * 0.4).sin() * 5.0;
            price
                .add_stock_point(close - 1.0, close + 2.0, close - 2.0, close)
                .expect("bar");
        }
        chart.add_series(&area, price).expect("price");
        (chart, area)
    }

    #[test]
    fn overlay_goes_into_source_area() {
        let (mut chart, area) = chart_with_price();
        let id = chart
            .add_sma("price", stock_field::CLOSE, SmaParams { period: 5 })
            .expect("sma");

        assert_eq!(chart.areas().len(), 1);
        let name = format!("sma{}", id.0);
        assert!(chart.area(&area).expect("area").contains_series(&name));

        let output = chart.series(&name).expect("output");
        assert_eq!(output.point_count(), 36);
        assert_eq!(output.y_axis_side(), Side::Left);
    }

    #[test]
    fn oscillator_gets_sub_area_removed_with_it() {
        let (mut chart, _) = chart_with_price();
        chart
            .area_mut("Area1")
            .expect("area")
            .axis_mut(Side::Right)
            .set_visible(false);

        let id = chart
            .add_macd("price", stock_field::CLOSE, MacdParams::default())
            .expect("macd");
        assert_eq!(chart.areas().len(), 2);

        let sub = &chart.areas()[1];
        assert!(!sub.is_auto_height());
        assert_eq!(sub.height_percent(), 0.2);
        assert!(sub.axis(Side::Left).is_visible());
        assert!(!sub.axis(Side::Right).is_visible());
        assert!(!sub.axis(Side::Top).is_visible());
        assert!(!sub.axis(Side::Bottom).is_visible());
        assert_eq!(sub.series_names().len(), 3);

        chart.remove_indicator(id).expect("remove");
        assert_eq!(chart.areas().len(), 1);
        assert!(matches!(
            chart.remove_indicator(id),
            Err(ChartError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn chained_indicator_reads_other_output() {
        let (mut chart, _) = chart_with_price();
        let rsi = chart
            .add_rsi("price", stock_field::CLOSE, RsiParams { period: 5 })
            .expect("rsi");
        let rsi_name = format!("rsi{}", rsi.0);
        let sma = chart
            .add_sma(&rsi_name, 0, SmaParams { period: 3 })
            .expect("sma of rsi");

        let sma_output = chart.indicators().get(sma).expect("sma").outputs()[0].clone();
        assert_eq!(sma_output.point_count(), 33);
        assert_eq!(sma_output.index_offset(), 7);
        let area = chart.area_of_series(sma_output.name()).expect("area");
        assert_eq!(area.name(), "Area2");
    }

    #[test]
    fn recalc_follows_appended_points_and_skips_orphans() {
        let (mut chart, _) = chart_with_price();
        let id = chart
            .add_sma("price", stock_field::CLOSE, SmaParams { period: 5 })
            .expect("sma");

        chart
            .series_mut("price")
            .expect("price")
            .add_stock_point(1.0, 2.0, 0.5, 1.5)
            .expect("bar");
        chart.recalc_indicators();
        let output = chart.indicators().get(id).expect("sma").outputs()[0].clone();
        assert_eq!(output.point_count(), 37);

        chart.remove_series("price").expect("remove");
        chart.recalc_indicators();
        let output = chart.indicators().get(id).expect("sma").outputs()[0].clone();
        assert_eq!(output.point_count(), 37);
    }

    #[test]
    fn invalid_value_index_is_rejected() {
        let (mut chart, _) = chart_with_price();
        assert!(chart.add_sma("price", 4, SmaParams::default()).is_err());
        assert!(matches!(
            chart.add_sma("nope", 0, SmaParams::default()),
            Err(ChartError::UnknownSeries(_))
        ));
    }
}
