use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::{ChartError, ChartResult};
use crate::indicators::moving_average::SmaIter;
use crate::indicators::{Compute, align_index_offset, validate_period};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    pub upper_coefficient: f64,
    pub lower_coefficient: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            upper_coefficient: 2.0,
            lower_coefficient: 2.0,
        }
    }
}

impl BollingerParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("bollinger", self.period)?;
        if !self.upper_coefficient.is_finite() || !self.lower_coefficient.is_finite() {
            return Err(ChartError::InvalidData(
                "bollinger coefficients must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Bollinger bands: SMA plus/minus a multiple of the population standard
/// deviation over the same trailing window.
///
/// Outputs, in order: middle (SMA), upper band, lower band.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    params: BollingerParams,
    dst_sma: Series,
    dst_upper: Series,
    dst_lower: Series,
}

impl BollingerBands {
    pub fn new(
        params: BollingerParams,
        sma_name: impl Into<String>,
        upper_name: impl Into<String>,
        lower_name: impl Into<String>,
    ) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst_sma: Series::new(sma_name, PointKind::Line),
            dst_upper: Series::new(upper_name, PointKind::Line),
            dst_lower: Series::new(lower_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> BollingerParams {
        self.params
    }

    pub fn set_params(&mut self, params: BollingerParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn middle(&self) -> &Series {
        &self.dst_sma
    }

    #[must_use]
    pub fn upper(&self) -> &Series {
        &self.dst_upper
    }

    #[must_use]
    pub fn lower(&self) -> &Series {
        &self.dst_lower
    }
}

fn population_stdev(window: &[f64], mean: f64) -> f64 {
    let variance = window
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

impl Compute for BollingerBands {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst_sma.clear();
        self.dst_upper.clear();
        self.dst_lower.clear();

        let period = self.params.period;
        for (window, sma) in values.windows(period).zip(SmaIter::new(values, period)) {
            let stdev = population_stdev(window, sma);
            self.dst_sma.push_unchecked(Point::line(sma));
            self.dst_upper
                .push_unchecked(Point::line(sma + self.params.upper_coefficient * stdev));
            self.dst_lower
                .push_unchecked(Point::line(sma - self.params.lower_coefficient * stdev));
        }

        for dst in [&mut self.dst_sma, &mut self.dst_upper, &mut self.dst_lower] {
            align_index_offset(source, dst);
        }
    }

    fn outputs(&self) -> Vec<&Series> {
        vec![&self.dst_sma, &self.dst_upper, &self.dst_lower]
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        vec![&mut self.dst_sma, &mut self.dst_upper, &mut self.dst_lower]
    }

    fn min_periods(&self) -> usize {
        self.params.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Bollinger Bands"
    }
}
