//! Streaming moving-average kernels shared by every indicator.
//!
//! Both iterators start emitting at source index `period - 1` and yield
//! nothing when the input is shorter than `period` (or `period == 0`).

/// Smoothing factor `2 / (period + 1)`.
#[must_use]
pub fn ema_k(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Simple moving average over a running sum (add newest, drop oldest).
#[derive(Debug, Clone)]
pub struct SmaIter<'a> {
    values: &'a [f64],
    period: usize,
    index: usize,
    sum: f64,
}

impl<'a> SmaIter<'a> {
    #[must_use]
    pub fn new(values: &'a [f64], period: usize) -> Self {
        let warmup = period.saturating_sub(1).min(values.len());
        Self {
            values,
            period,
            index: warmup,
            sum: values[..warmup].iter().sum(),
        }
    }
}

impl Iterator for SmaIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.period == 0 || self.index >= self.values.len() {
            return None;
        }
        self.sum += self.values[self.index];
        let average = self.sum / self.period as f64;
        self.sum -= self.values[self.index + 1 - self.period];
        self.index += 1;
        Some(average)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.period == 0 {
            0
        } else {
            self.values.len().saturating_sub(self.index)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SmaIter<'_> {}

/// Exponential moving average seeded with the SMA of the first `period`
/// values.
#[derive(Debug, Clone)]
pub struct EmaIter<'a> {
    values: &'a [f64],
    period: usize,
    k: f64,
    index: usize,
    previous: Option<f64>,
}

impl<'a> EmaIter<'a> {
    #[must_use]
    pub fn new(values: &'a [f64], period: usize) -> Self {
        Self {
            values,
            period,
            k: ema_k(period),
            index: period,
            previous: None,
        }
    }
}

impl Iterator for EmaIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let next = match self.previous {
            None => {
                if self.period == 0 || self.period > self.values.len() {
                    return None;
                }
                self.values[..self.period].iter().sum::<f64>() / self.period as f64
            }
            Some(previous) => {
                let value = *self.values.get(self.index)?;
                self.index += 1;
                value * self.k + previous * (1.0 - self.k)
            }
        };
        self.previous = Some(next);
        Some(next)
    }
}

/// Collects [`SmaIter`] output.
#[must_use]
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    SmaIter::new(values, period).collect()
}

/// Collects [`EmaIter`] output.
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    EmaIter::new(values, period).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{ema, ema_k, sma};

    const CLOSES: [f64; 5] = [10.0, 11.0, 12.0, 11.0, 13.0];

    #[test]
    fn sma_uses_trailing_window() {
        let out = sma(&CLOSES, 3);
        assert_eq!(out.len(), 3);
        assert_abs_diff_eq!(out[0], 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], 34.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[2], 12.0, epsilon = 1e-12);
    }

    #[test]
    fn ema_seeds_with_sma() {
        let out = ema(&CLOSES, 2);
        assert_eq!(out.len(), 4);
        assert_abs_diff_eq!(out[0], 10.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], 11.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[2], 11.0 + 1.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[3], 12.0 + 7.0 / 18.0, epsilon = 1e-12);
    }

    #[test]
    fn short_input_or_zero_period_yields_nothing() {
        assert!(sma(&CLOSES, 6).is_empty());
        assert!(ema(&CLOSES, 6).is_empty());
        assert!(sma(&CLOSES, 0).is_empty());
        assert!(ema(&CLOSES, 0).is_empty());
        assert!(sma(&[], 1).is_empty());
    }

    #[test]
    fn period_one_is_identity() {
        assert_eq!(sma(&CLOSES, 1), CLOSES.to_vec());
        assert_eq!(ema(&CLOSES, 1), CLOSES.to_vec());
        assert_abs_diff_eq!(ema_k(1), 1.0, epsilon = 1e-12);
    }
}
