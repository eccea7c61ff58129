use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::datetime_to_unix_millis;
use crate::core::{Area, AreaConfig, AxisRange, Point, Series, SeriesConfig, Side};
use crate::error::{ChartError, ChartResult};
use crate::indicators::{Compute, Indicator, IndicatorId, IndicatorKind, IndicatorParams};

use super::StockChart;

/// Persisted point: field values plus the timestamp id in unix millis.
///
/// Non-finite values (gaps) are stored as `null` and restored as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub id_unix_ms: Option<i64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub config: SeriesConfig,
    pub points: Vec<PointSnapshot>,
}

/// Everything needed to rebuild one indicator and re-link it by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub id: IndicatorId,
    pub params: IndicatorParams,
    pub source: String,
    pub value_index: usize,
    /// Destination series settings in output order.
    pub outputs: Vec<SeriesConfig>,
}

/// Serializable chart state. Indicator outputs are not stored; they are
/// recomputed from their sources on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub areas: Vec<AreaConfig>,
    pub series: Vec<SeriesSnapshot>,
    pub global_ranges: IndexMap<Side, AxisRange>,
    pub indicators: Vec<IndicatorSpec>,
    #[serde(default)]
    pub area_counter: u64,
}

fn point_snapshot(point: &Point) -> PointSnapshot {
    PointSnapshot {
        values: point
            .values()
            .iter()
            .map(|value| value.is_finite().then_some(*value))
            .collect(),
        id_unix_ms: point.id().map(datetime_to_unix_millis),
        visible: point.is_visible(),
    }
}

fn restore_point(series: &mut Series, snapshot: &PointSnapshot) -> ChartResult<()> {
    let id = snapshot
        .id_unix_ms
        .map(|ms| {
            DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
                ChartError::InvalidData(format!("point id {ms} is not a valid timestamp"))
            })
        })
        .transpose()?;
    let values: Vec<f64> = snapshot
        .values
        .iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();
    let point = series.add_point(&values)?;
    point.set_id(id);
    point.set_visible(snapshot.visible);
    Ok(())
}

impl IndicatorSpec {
    fn from_indicator(indicator: &Indicator) -> Self {
        Self {
            id: indicator.id(),
            params: indicator.params(),
            source: indicator.source_name().to_owned(),
            value_index: indicator.value_index(),
            outputs: indicator.outputs().iter().map(|series| series.config()).collect(),
        }
    }

    fn build(&self) -> ChartResult<Indicator> {
        let names: Vec<String> = self.outputs.iter().map(|config| config.name.clone()).collect();
        let mut kind = IndicatorKind::from_params(self.params, &names)?;
        for (output, config) in kind.outputs_mut().into_iter().zip(&self.outputs) {
            output.apply_config(config);
        }
        Ok(Indicator::new(self.id, self.source.clone(), self.value_index, kind))
    }
}

impl StockChart {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            areas: self.areas.iter().map(Area::config).collect(),
            series: self
                .series
                .values()
                .map(|series| SeriesSnapshot {
                    config: series.config(),
                    points: series.points().iter().map(point_snapshot).collect(),
                })
                .collect(),
            global_ranges: self.global_ranges.clone(),
            indicators: self
                .indicators
                .iter()
                .map(IndicatorSpec::from_indicator)
                .collect(),
            area_counter: self.area_counter,
        }
    }

    /// Rebuilds a chart from a snapshot and recomputes every indicator.
    pub fn from_snapshot(snapshot: &ChartSnapshot) -> ChartResult<Self> {
        let mut chart = Self {
            areas: snapshot.areas.iter().map(Area::from_config).collect(),
            global_ranges: snapshot.global_ranges.clone(),
            area_counter: snapshot.area_counter,
            ..Self::default()
        };

        for series_snapshot in &snapshot.series {
            let config = &series_snapshot.config;
            if chart.series.contains_key(&config.name) {
                return Err(ChartError::DuplicateSeries(config.name.clone()));
            }
            let mut series = Series::from_config(config);
            for point in &series_snapshot.points {
                restore_point(&mut series, point)?;
            }
            chart.series.insert(config.name.clone(), series);
        }

        for spec in &snapshot.indicators {
            let indicator = spec.build()?;
            if let Some(taken) = indicator
                .output_names()
                .into_iter()
                .find(|name| chart.contains_series(name))
            {
                return Err(ChartError::DuplicateSeries(taken));
            }
            chart.indicators.insert(indicator);
        }
        chart.recalc_indicators();

        debug!(
            areas = chart.areas.len(),
            series = chart.series.len(),
            indicators = chart.indicators.len(),
            "chart restored from snapshot"
        );
        Ok(chart)
    }
}
