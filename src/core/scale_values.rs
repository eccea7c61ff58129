use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::paint_info::PaintInfo;
use crate::core::primitives::{datetime_to_unix_millis, round_half_up};
use crate::core::series::Series;

/// Pluggable grid-value strategy for an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleValuesProvider {
    Smart(SmartScaleValues),
    DateTime(DateTimeScaleValues),
}

impl ScaleValuesProvider {
    #[must_use]
    pub fn scale_values(&self, info: &PaintInfo, count: usize) -> Option<Vec<f64>> {
        match self {
            Self::Smart(provider) => provider.scale_values(info, count),
            Self::DateTime(provider) => Some(provider.scale_values(info, count)),
        }
    }
}

/// Fallback grid: `count` evenly spaced interior values of `(min, max)`.
#[must_use]
pub fn even_scale_values(info: &PaintInfo, count: usize) -> Vec<f64> {
    let step = (info.max - info.min) / (count as f64 + 1.0);
    (1..=count).map(|k| info.min + step * k as f64).collect()
}

const LEVELS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 7.5];
const MIN_DEPTH: i32 = -5;
const MAX_DEPTH: i32 = 10;

/// "Nice number" grid with steps of 1, 2, 2.5, 5 and 7.5 times a power of ten.
///
/// All arithmetic runs on integers scaled by `10^decimals`, so steps finer
/// than the configured precision are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartScaleValues {
    decimals: u32,
}

impl Default for SmartScaleValues {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl SmartScaleValues {
    #[must_use]
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    fn multiplier(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    fn to_fixed(&self, value: f64) -> i64 {
        (value * self.multiplier()) as i64
    }

    fn from_fixed(&self, value: i64) -> f64 {
        value as f64 / self.multiplier()
    }

    /// Values on the finest level yielding at most `count` lines; `None`
    /// when no level fits.
    #[must_use]
    pub fn scale_values(&self, info: &PaintInfo, count: usize) -> Option<Vec<f64>> {
        let fixed_max = self.to_fixed(info.max);
        let fixed_min = self.to_fixed(info.min);

        let levels = (MIN_DEPTH..MAX_DEPTH)
            .flat_map(|depth| LEVELS.iter().map(move |level| level * 10f64.powi(depth)));

        for level in levels {
            let step = self.to_fixed(level);
            if step == 0 {
                continue;
            }
            let max = fixed_max / step * step;
            let min = fixed_min / step * step;
            let lines = (max - min) / step;
            if lines > 0 && lines as usize <= count {
                let values = (1..=lines)
                    .map(|k| self.from_fixed(min + step * k))
                    .collect();
                return Some(values);
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Bucket {
    Every(i64),
    DayChange,
    YearChange,
}

impl Bucket {
    fn matches(self, prev: DateTime<Utc>, curr: DateTime<Utc>) -> bool {
        match self {
            Self::Every(interval) => datetime_to_unix_millis(curr) % interval == 0,
            Self::DayChange => prev.day() != curr.day(),
            Self::YearChange => prev.year() != curr.year(),
        }
    }
}

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;

const BUCKETS: [Bucket; 9] = [
    Bucket::Every(SECOND_MS),
    Bucket::Every(MINUTE_MS),
    Bucket::Every(5 * MINUTE_MS),
    Bucket::Every(15 * MINUTE_MS),
    Bucket::Every(30 * MINUTE_MS),
    Bucket::Every(HOUR_MS),
    Bucket::Every(4 * HOUR_MS),
    Bucket::DayChange,
    Bucket::YearChange,
];

/// Grid lines at calendar boundaries of a time-indexed series.
///
/// Holds a copy of the series' point timestamps; rebuild it with
/// [`DateTimeScaleValues::from_series`] after appending points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateTimeScaleValues {
    index_offset: i64,
    ids: Vec<Option<DateTime<Utc>>>,
}

impl DateTimeScaleValues {
    #[must_use]
    pub fn from_series(series: &Series) -> Self {
        Self {
            index_offset: series.index_offset(),
            ids: series.points().iter().map(|point| point.id()).collect(),
        }
    }

    /// Boundary positions (`scale_index - 0.5`) of the bucket whose line
    /// count is closest to `count`.
    #[must_use]
    pub fn scale_values(&self, info: &PaintInfo, count: usize) -> Vec<f64> {
        let start = usize::try_from(round_half_up(info.min) - self.index_offset).unwrap_or(0);
        let mut per_bucket: Vec<Vec<f64>> = vec![Vec::new(); BUCKETS.len()];

        for i in (start + 1)..self.ids.len() {
            let scale_index = (self.index_offset + i as i64) as f64;
            if let (Some(prev), Some(curr)) = (self.ids[i - 1], self.ids[i]) {
                for (bucket, values) in BUCKETS.iter().zip(per_bucket.iter_mut()) {
                    if bucket.matches(prev, curr) {
                        values.push(scale_index - 0.5);
                    }
                }
            }
            if scale_index > info.max {
                break;
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for (position, values) in per_bucket.iter().enumerate() {
            let diff = values.len().abs_diff(count);
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((position, diff));
                if diff <= count {
                    break;
                }
            }
        }

        best.map(|(position, _)| per_bucket.swap_remove(position))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    use super::{DateTimeScaleValues, SmartScaleValues, even_scale_values};
    use crate::core::paint_info::PaintInfo;
    use crate::core::point::{Point, PointKind};
    use crate::core::series::Series;

    fn info(min: f64, max: f64) -> PaintInfo {
        PaintInfo {
            max,
            min,
            is_x: false,
            logarithmic: false,
            size: 100.0,
        }
    }

    #[test]
    fn even_values_split_range_into_count_plus_one_parts() {
        let values = even_scale_values(&info(0.0, 60.0), 5);
        assert_eq!(values, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn smart_values_pick_first_level_that_fits() {
        let provider = SmartScaleValues::new(2);
        let values = provider.scale_values(&info(0.0, 100.0), 5).expect("values");
        assert_eq!(values.len(), 5);
        for (actual, expected) in values.iter().zip([20.0, 40.0, 60.0, 80.0, 100.0]) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn smart_values_align_to_step() {
        let provider = SmartScaleValues::new(2);
        let values = provider.scale_values(&info(13.0, 57.0), 5).expect("values");
        for (actual, expected) in values.iter().zip([20.0, 30.0, 40.0, 50.0]) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn date_time_values_mark_day_changes() {
        let mut series = Series::new("price", PointKind::Line);
        for day in 1..=10 {
            for hour in [8, 12, 16] {
                let id = Utc
                    .with_ymd_and_hms(2024, 3, day, hour, 0, 0)
                    .single()
                    .expect("valid timestamp");
                series.push(Point::line(1.0).with_id(id)).expect("point");
            }
        }

        let provider = DateTimeScaleValues::from_series(&series);
        let values = provider.scale_values(&info(0.0, 29.0), 9);
        assert_eq!(values.len(), 9);
        assert_abs_diff_eq!(values[0], 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(values[8], 26.5, epsilon = 1e-12);
    }
}
