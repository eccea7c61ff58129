use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::ChartResult;
use crate::indicators::moving_average::ema;
use crate::indicators::{Compute, align_index_offset, validate_period};

/// MACD configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// Fast EMA period (default: 12).
    pub short_period: usize,
    /// Slow EMA period (default: 26).
    pub long_period: usize,
    /// Signal line EMA period (default: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            short_period: 12,
            long_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("macd short", self.short_period)?;
        validate_period("macd long", self.long_period)?;
        validate_period("macd signal", self.signal_period)
    }
}

/// Moving average convergence/divergence.
///
/// Outputs, in order: MACD line, signal line, histogram. The histogram is a
/// bar series of `(0, macd - signal)` aligned with the signal line.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    params: MacdParams,
    dst_macd: Series,
    dst_signal: Series,
    dst_histogram: Series,
}

impl Macd {
    pub fn new(
        params: MacdParams,
        macd_name: impl Into<String>,
        signal_name: impl Into<String>,
        histogram_name: impl Into<String>,
    ) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst_macd: Series::new(macd_name, PointKind::Line),
            dst_signal: Series::new(signal_name, PointKind::Line),
            dst_histogram: Series::new(histogram_name, PointKind::Bar),
        })
    }

    #[must_use]
    pub fn params(&self) -> MacdParams {
        self.params
    }

    pub fn set_params(&mut self, params: MacdParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn macd(&self) -> &Series {
        &self.dst_macd
    }

    #[must_use]
    pub fn signal(&self) -> &Series {
        &self.dst_signal
    }

    #[must_use]
    pub fn histogram(&self) -> &Series {
        &self.dst_histogram
    }
}

impl Compute for Macd {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst_macd.clear();
        self.dst_signal.clear();
        self.dst_histogram.clear();

        let MacdParams {
            short_period,
            long_period,
            signal_period,
        } = self.params;
        let short = ema(values, short_period);
        let long = ema(values, long_period);

        // both EMAs are valid from this source index on
        let start = short_period.max(long_period) - 1;
        let macd: Vec<f64> = (start..values.len())
            .map(|i| short[i + 1 - short_period] - long[i + 1 - long_period])
            .collect();
        for value in &macd {
            self.dst_macd.push_unchecked(Point::line(*value));
        }

        let signal = ema(&macd, signal_period);
        for (value, signal) in macd.iter().skip(signal_period - 1).zip(&signal) {
            self.dst_signal.push_unchecked(Point::line(*signal));
            self.dst_histogram.push_unchecked(Point::bar(0.0, value - signal));
        }

        align_index_offset(source, &mut self.dst_macd);
        align_index_offset(&self.dst_macd, &mut self.dst_signal);
        align_index_offset(&self.dst_macd, &mut self.dst_histogram);
    }

    fn outputs(&self) -> Vec<&Series> {
        vec![&self.dst_macd, &self.dst_signal, &self.dst_histogram]
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        vec![&mut self.dst_macd, &mut self.dst_signal, &mut self.dst_histogram]
    }

    fn min_periods(&self) -> usize {
        self.params.short_period.max(self.params.long_period) + self.params.signal_period - 1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{Macd, MacdParams};
    use crate::indicators::Compute;
    use crate::indicators::moving_average::ema;
    use crate::indicators::test_support::line_source;

    fn macd(short: usize, long: usize, signal: usize) -> Macd {
        let params = MacdParams {
            short_period: short,
            long_period: long,
            signal_period: signal,
        };
        Macd::new(params, "macd", "signal", "hist").expect("macd")
    }

    #[test]
    fn lines_are_index_aligned() {
        let values: Vec<f64> = (0..12).map(|i| 10.0 + (i as f64 * 0.7).sin()).collect();
        let source = line_source(&values);
        let mut indicator = macd(2, 4, 3);
        indicator.recalc(&source, &values);

        let short = ema(&values, 2);
        let long = ema(&values, 4);
        let out = indicator.macd().field_values(0).expect("macd");
        assert_eq!(out.len(), 9);
        assert_eq!(indicator.macd().index_offset(), 3);
        // source index 5: short slot 4, long slot 2
        assert_abs_diff_eq!(out[2], short[4] - long[2], epsilon = 1e-12);

        assert_eq!(indicator.signal().point_count(), 7);
        assert_eq!(indicator.signal().index_offset(), 5);
        assert_eq!(indicator.histogram().index_offset(), 5);

        let signal = indicator.signal().field_values(0).expect("signal");
        let histogram = indicator.histogram().field_values(1).expect("histogram");
        for (k, (s, h)) in signal.iter().zip(&histogram).enumerate() {
            assert_abs_diff_eq!(*h, out[k + 2] - s, epsilon = 1e-12);
        }
    }

    #[test]
    fn short_period_longer_than_long_period_stays_aligned() {
        let values: Vec<f64> = (0..10).map(|i| i as f64 * 1.5).collect();
        let source = line_source(&values);
        let mut indicator = macd(5, 3, 2);
        indicator.recalc(&source, &values);

        assert_eq!(indicator.macd().point_count(), 6);
        assert_eq!(indicator.macd().index_offset(), 4);
        let short = ema(&values, 5);
        let long = ema(&values, 3);
        let out = indicator.macd().field_values(0).expect("macd");
        assert_abs_diff_eq!(out[0], short[0] - long[2], epsilon = 1e-12);
    }

    #[test]
    fn warm_up_boundaries() {
        let mut indicator = macd(3, 5, 2);
        let short_input = line_source(&[1.0, 2.0, 3.0, 4.0]);
        indicator.recalc(&short_input, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(indicator.macd().point_count(), 0);
        assert_eq!(indicator.signal().point_count(), 0);

        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        indicator.recalc(&line_source(&values), &values);
        assert_eq!(indicator.macd().point_count(), 1);
        assert_eq!(indicator.signal().point_count(), 0);
        assert_eq!(indicator.histogram().point_count(), 0);
    }
}
