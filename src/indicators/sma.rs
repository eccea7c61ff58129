use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::ChartResult;
use crate::indicators::moving_average::SmaIter;
use crate::indicators::{Compute, align_index_offset, validate_period};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaParams {
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 26 }
    }
}

impl SmaParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("sma", self.period)
    }
}

/// Simple moving average of one source field.
#[derive(Debug, Clone, PartialEq)]
pub struct Sma {
    params: SmaParams,
    dst: Series,
}

impl Sma {
    pub fn new(params: SmaParams, dst_name: impl Into<String>) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst: Series::new(dst_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> SmaParams {
        self.params
    }

    pub fn set_params(&mut self, params: SmaParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn output(&self) -> &Series {
        &self.dst
    }
}

impl Compute for Sma {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst.clear();
        for average in SmaIter::new(values, self.params.period) {
            self.dst.push_unchecked(Point::line(average));
        }
        align_index_offset(source, &mut self.dst);
    }

    fn outputs(&self) -> Vec<&Series> {
        vec![&self.dst]
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        vec![&mut self.dst]
    }

    fn min_periods(&self) -> usize {
        self.params.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "SMA"
    }
}
