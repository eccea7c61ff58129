use serde::{Deserialize, Serialize};

use crate::core::point::{Point, PointKind};
use crate::core::series::Series;
use crate::error::ChartResult;
use crate::indicators::moving_average::ema_k;
use crate::indicators::{Compute, align_index_offset, validate_period};

/// Value reported when the average loss is zero.
pub const RSI_NO_LOSS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl RsiParams {
    pub fn validate(&self) -> ChartResult<()> {
        validate_period("rsi", self.period)
    }
}

/// Relative strength index.
///
/// Gains and losses of the first `period` deltas are averaged to seed the
/// smoothing, then both averages follow an EMA with `K = 2 / (period + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rsi {
    params: RsiParams,
    dst: Series,
}

impl Rsi {
    pub fn new(params: RsiParams, dst_name: impl Into<String>) -> ChartResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            dst: Series::new(dst_name, PointKind::Line),
        })
    }

    #[must_use]
    pub fn params(&self) -> RsiParams {
        self.params
    }

    pub fn set_params(&mut self, params: RsiParams) -> ChartResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    #[must_use]
    pub fn output(&self) -> &Series {
        &self.dst
    }
}

fn gain_loss(previous: f64, current: f64) -> (f64, f64) {
    if current > previous {
        (current - previous, 0.0)
    } else if current < previous {
        (0.0, previous - current)
    } else {
        (0.0, 0.0)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return RSI_NO_LOSS;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

impl Compute for Rsi {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.dst.clear();
        let period = self.params.period;
        let k = ema_k(period);

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        let mut averages: Option<(f64, f64)> = None;

        for (i, pair) in values.windows(2).enumerate() {
            let (gain, loss) = gain_loss(pair[0], pair[1]);
            let delta_count = i + 1;

            let (avg_gain, avg_loss) = match averages {
                None if delta_count < period => {
                    gain_sum += gain;
                    loss_sum += loss;
                    continue;
                }
                None => (
                    (gain_sum + gain) / period as f64,
                    (loss_sum + loss) / period as f64,
                ),
                Some((avg_gain, avg_loss)) => (
                    gain * k + avg_gain * (1.0 - k),
                    loss * k + avg_loss * (1.0 - k),
                ),
            };
            averages = Some((avg_gain, avg_loss));
            self.dst.push_unchecked(Point::line(rsi_value(avg_gain, avg_loss)));
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
        self.params.period + 1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "RSI"
    }
}
