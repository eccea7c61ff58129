use ordered_float::OrderedFloat;

use crate::core::point::Point;
use crate::core::series::Series;

/// Iterator over the points of a series that fall inside a horizontal view.
///
/// Yields `(scale_index, point)` starting at the zero-based array index of
/// `view_min` and stops right after the first point beyond `view_max`.
#[derive(Debug, Clone)]
pub struct ViewWindow<'a> {
    series: &'a Series,
    index: usize,
    view_max: f64,
    done: bool,
}

impl<'a> ViewWindow<'a> {
    pub(crate) fn new(series: &'a Series, view_max: f64, view_min: f64) -> Self {
        Self {
            series,
            index: series.convert_to_array_index_zero_based(view_min),
            view_max,
            done: !series.is_visible_on_screen(view_max, view_min),
        }
    }
}

impl<'a> Iterator for ViewWindow<'a> {
    type Item = (f64, &'a Point);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = self.series.point_at(self.index)?;
        let scale_index = self.series.convert_to_scale_index(self.index);
        self.index += 1;
        if scale_index > self.view_max {
            self.done = true;
        }
        Some((scale_index, point))
    }
}

/// `(max, min)` over the inclusive array range `start..=end`, clamped to
/// the available points.
#[must_use]
pub fn range_max_min(points: &[Point], start: usize, end: usize) -> Option<(f64, f64)> {
    if start > end || start >= points.len() {
        return None;
    }
    let window = &points[start..=end.min(points.len() - 1)];

    let max = window
        .iter()
        .map(|point| OrderedFloat(point.max_min().0))
        .max()?;
    let min = window
        .iter()
        .map(|point| OrderedFloat(point.max_min().1))
        .min()?;
    Some((max.0, min.0))
}
