use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::ChartResult;
use crate::indicators::moving_average::EmaIter;
use crate::indicators::{Compute, align_index_offset, validate_period};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaParams {
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl EmaParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("ema", self.period)
    }
}

/// Exponential moving average of one source field.
#[derive(Debug, Clone, PartialEq)]
pub struct Ema {
    params: EmaParams,
    dst: Series,
}

impl Ema {
    pub fn new(params: EmaParams, dst_name: impl Into<String>) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst: Series::new(dst_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> EmaParams {
        self.params
    }

    pub fn set_params(&mut self, params: EmaParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn output(&self) -> &Series {
        &self.dst
    }
}

impl Compute for Ema {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst.clear();
        for value in EmaIter::new(values, self.params.period) {
            self.dst.push_unchecked(Point::line(value));
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
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{Ema, EmaParams};
    use crate::indicators::Compute;
    use crate::indicators::test_support::line_source;

    #[test]
    fn ema_of_five_closes() {
        let mut source = line_source(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        source.set_index_offset(40);
        let mut ema = Ema::new(EmaParams { period: 2 }, "ema").expect("ema");
        ema.recalc(&source, &source.field_values(0).expect("closes"));

        let out = ema.output();
        assert_eq!(out.index_offset(), 41);
        let values = out.field_values(0).expect("values");
        let expected = [10.5, 11.5, 11.166_666_666_7, 12.388_888_888_9];
        assert_eq!(values.len(), expected.len());
        for (actual, expected) in values.iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn recalc_replaces_previous_output() {
        let mut source = line_source(&[1.0, 2.0, 3.0]);
        let mut ema = Ema::new(EmaParams { period: 2 }, "ema").expect("ema");
        ema.recalc(&source, &source.field_values(0).expect("values"));
        assert_eq!(ema.output().point_count(), 2);

        source.add_line_point(4.0).expect("point");
        ema.recalc(&source, &source.field_values(0).expect("values"));
        assert_eq!(ema.output().point_count(), 3);
        assert_eq!(ema.output().index_offset(), 1);
    }
}
