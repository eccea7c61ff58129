use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::ChartResult;
use crate::indicators::moving_average::EmaIter;
use crate::indicators::{Compute, align_index_offset, validate_period};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StochasticParams {
    pub period: usize,
    pub slow_k: usize,
    pub slow_d: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            period: 20,
            slow_k: 3,
            slow_d: 3,
        }
    }
}

impl StochasticParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("stochastic", self.period)?;
        validate_period("stochastic slow %K", self.slow_k)?;
        validate_period("stochastic slow %D", self.slow_d)
    }
}

/// Stochastic oscillator.
///
/// Fast %K at source index `i` compares the value with the high/low of the
/// points `i - period ..= i`; a flat window yields `NaN`. Slow %K smooths
/// fast %K with an EMA and slow %D smooths slow %K. Outputs, in order:
/// slow %K, slow %D. Fast %K stays internal.
///
/// The EMA stages carry a `NaN` forward: once a flat window enters the
/// smoothing (in the seed or any later step), every following slow %K and
/// slow %D value is `NaN` too. Fast %K recovers as soon as the window has a
/// range again.
#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    params: StochasticParams,
    fast_k: Series,
    dst_slow_k: Series,
    dst_slow_d: Series,
}

fn push_lines(dst: &mut Series, values: impl IntoIterator<Item = f64>) {
    for value in values {
        dst.push_unchecked(Point::line(value));
    }
}

impl Stochastic {
    pub fn new(
        params: StochasticParams,
        slow_k_name: impl Into<String>,
        slow_d_name: impl Into<String>,
    ) -> ChartResult<Self> {
        params.validate()?;
        let slow_k_name = slow_k_name.into();
        Ok(Self {
            params,
            fast_k: Series::new(format!("{slow_k_name}.fast"), PointKind::Line),
            dst_slow_k: Series::new(slow_k_name, PointKind::Line),
            dst_slow_d: Series::new(slow_d_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> StochasticParams {
        self.params
    }

    pub fn set_params(&mut self, params: StochasticParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn fast_k(&self) -> &Series {
        &self.fast_k
    }

    #[must_use]
    pub fn slow_k(&self) -> &Series {
        &self.dst_slow_k
    }

    #[must_use]
    pub fn slow_d(&self) -> &Series {
        &self.dst_slow_d
    }
}

impl Compute for Stochastic {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.fast_k.clear();
        self.dst_slow_k.clear();
        self.dst_slow_d.clear();

        let period = self.params.period;
        let fast: Vec<f64> = values
            .iter()
            .enumerate()
            .skip(period)
            .map(|(i, value)| match source.range_max_min(i - period, i) {
                Some((max, min)) if max != min => 100.0 * (value - min) / (max - min),
                _ => f64::NAN,
            })
            .collect();
        let slow_k: Vec<f64> = EmaIter::new(&fast, self.params.slow_k).collect();

        push_lines(&mut self.fast_k, fast.iter().copied());
        push_lines(&mut self.dst_slow_k, slow_k.iter().copied());
        push_lines(&mut self.dst_slow_d, EmaIter::new(&slow_k, self.params.slow_d));

        align_index_offset(source, &mut self.fast_k);
        align_index_offset(&self.fast_k, &mut self.dst_slow_k);
        align_index_offset(&self.dst_slow_k, &mut self.dst_slow_d);
    }

    fn outputs(&self) -> Vec<&Series> {
        vec![&self.dst_slow_k, &self.dst_slow_d]
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        vec![&mut self.dst_slow_k, &mut self.dst_slow_d]
    }

    fn min_periods(&self) -> usize {
        self.params.period + self.params.slow_k + self.params.slow_d - 1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Stochastic"
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{Stochastic, StochasticParams};
    use crate::core::point::PointKind;
    use crate::core::series::Series;
    use crate::indicators::Compute;
    use crate::indicators::test_support::line_source;

    fn stochastic(period: usize, slow_k: usize, slow_d: usize) -> Stochastic {
        let params = StochasticParams {
            period,
            slow_k,
            slow_d,
        };
        Stochastic::new(params, "k", "d").expect("stochastic")
    }

    #[test]
    fn fast_k_uses_inclusive_high_low_window() {
        let mut source = Series::new("price", PointKind::Stock);
        source.add_stock_point(10.0, 12.0, 8.0, 11.0).expect("bar");
        source.add_stock_point(11.0, 14.0, 10.0, 13.0).expect("bar");
        source.add_stock_point(13.0, 13.5, 9.0, 10.0).expect("bar");
        let closes = source.field_values(3).expect("closes");

        let mut indicator = stochastic(2, 1, 1);
        indicator.recalc(&source, &closes);

        // window bars 0..=2: high 14, low 8, close 10
        let fast = indicator.fast_k().field_values(0).expect("fast");
        assert_eq!(fast.len(), 1);
        assert_abs_diff_eq!(fast[0], 100.0 * 2.0 / 6.0, epsilon = 1e-9);
        assert_eq!(indicator.fast_k().index_offset(), 2);
        assert_eq!(indicator.slow_d().index_offset(), 2);
    }

    #[test]
    fn flat_window_yields_nan() {
        let values = [5.0; 4];
        let mut indicator = stochastic(2, 1, 1);
        indicator.recalc(&line_source(&values), &values);

        let slow_k = indicator.slow_k().field_values(0).expect("slow k");
        assert_eq!(slow_k.len(), 2);
        assert!(slow_k.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn flat_window_poisons_later_smoothed_values() {
        // window 2..=4 is flat, later windows have a range again
        let values = [1.0, 3.0, 5.0, 5.0, 5.0, 7.0, 4.0, 9.0];
        let mut indicator = stochastic(2, 2, 2);
        indicator.recalc(&line_source(&values), &values);

        let fast = indicator.fast_k().field_values(0).expect("fast");
        assert_eq!(fast.len(), 6);
        assert!(fast[0].is_finite());
        assert!(fast[2].is_nan());
        assert!(fast[3..].iter().all(|value| value.is_finite()));

        let slow_k = indicator.slow_k().field_values(0).expect("slow k");
        assert!(slow_k[0].is_finite());
        assert!(slow_k[1..].iter().all(|value| value.is_nan()));
        let slow_d = indicator.slow_d().field_values(0).expect("slow d");
        assert!(slow_d.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn cascaded_warm_up_chains_alignment() {
        let values: Vec<f64> = (0..10).map(|i| (i as f64 * 1.3).cos() * 5.0 + 20.0).collect();
        let mut source = line_source(&values);
        source.set_index_offset(100);
        let mut indicator = stochastic(3, 2, 3);
        indicator.recalc(&source, &values);

        assert_eq!(indicator.fast_k().point_count(), 7);
        assert_eq!(indicator.slow_k().point_count(), 6);
        assert_eq!(indicator.slow_d().point_count(), 4);
        assert_eq!(indicator.slow_k().index_offset(), 104);
        assert_eq!(indicator.slow_d().index_offset(), 106);
    }

    #[test]
    fn too_few_points_produce_nothing() {
        let values = [1.0, 2.0, 3.0];
        let mut indicator = stochastic(3, 1, 1);
        indicator.recalc(&line_source(&values), &values);
        assert_eq!(indicator.slow_k().point_count(), 0);
        assert_eq!(indicator.slow_d().point_count(), 0);
    }
}
