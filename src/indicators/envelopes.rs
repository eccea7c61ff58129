use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::{ChartError, ChartResult};
use crate::indicators::moving_average::EmaIter;
use crate::indicators::{Compute, align_index_offset, validate_period};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopesParams {
    pub period: usize,
    /// Band width in percent of the EMA.
    pub percent: f64,
}

impl Default for EnvelopesParams {
    fn default() -> Self {
        Self {
            period: 26,
            percent: 1.0,
        }
    }
}

impl EnvelopesParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("envelopes", self.period)?;
        if !self.percent.is_finite() {
            return Err(ChartError::InvalidData(
                "envelopes percent must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// EMA envelopes. Outputs, in order: upper band, lower band.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelopes {
    params: EnvelopesParams,
    dst_upper: Series,
    dst_lower: Series,
}

impl Envelopes {
    pub fn new(
        params: EnvelopesParams,
        upper_name: impl Into<String>,
        lower_name: impl Into<String>,
    ) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst_upper: Series::new(upper_name, PointKind::Line),
            dst_lower: Series::new(lower_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> EnvelopesParams {
        self.params
    }

    pub fn set_params(&mut self, params: EnvelopesParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
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

impl Compute for Envelopes {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst_upper.clear();
        self.dst_lower.clear();

        let ratio = self.params.percent / 100.0;
        for ema in EmaIter::new(values, self.params.period) {
            self.dst_upper.push_unchecked(Point::line(ema * (1.0 + ratio)));
            self.dst_lower.push_unchecked(Point::line(ema * (1.0 - ratio)));
        }

        align_index_offset(source, &mut self.dst_upper);
        align_index_offset(source, &mut self.dst_lower);
    }

    fn outputs(&self) -> Vec<&Series> {
        vec![&self.dst_upper, &self.dst_lower]
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        vec![&mut self.dst_upper, &mut self.dst_lower]
    }

    fn min_periods(&self) -> usize {
        self.params.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Envelopes"
    }
}
