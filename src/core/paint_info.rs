use crate::core::axis::Axis;
use crate::core::primitives::approx_eq;
use crate::error::{ChartError, ChartResult};

/// Frozen view of one axis used while mapping values to pixels.
///
/// `max`/`min` are the active view bounds (global override first), `size` is
/// the pixel extent along the axis direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintInfo {
    pub max: f64,
    pub min: f64,
    pub is_x: bool,
    pub logarithmic: bool,
    pub size: f64,
}

impl PaintInfo {
    /// Captures the axis state; fails when the active range has no bounds.
    pub fn from_axis(axis: &Axis) -> ChartResult<Self> {
        let range = axis.active_range();
        let (Some(max), Some(min)) = (
            range.max_view_or_auto_value(),
            range.min_view_or_auto_value(),
        ) else {
            return Err(ChartError::UndefinedRange);
        };
        let bounds = axis.bounds();

        Ok(Self {
            max,
            min,
            is_x: axis.is_horizontal(),
            logarithmic: axis.is_logarithmic(),
            size: if axis.is_vertical() {
                bounds.height
            } else {
                bounds.width
            },
        })
    }

    fn project(&self, value: f64) -> ChartResult<f64> {
        if !self.logarithmic {
            return Ok(value);
        }
        if value <= 0.0 || !value.is_finite() {
            return Err(ChartError::LogarithmicDomain { value });
        }
        Ok(value.log10())
    }

    /// `(max, min, length)` in projected space. A zero length (flat data)
    /// is allowed.
    fn projected_span(&self) -> ChartResult<(f64, f64, f64)> {
        let max = self.project(self.max)?;
        let min = self.project(self.min)?;
        let length = max - min;
        if length < 0.0 || !length.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "view range [{}, {}] must not be inverted",
                self.min, self.max
            )));
        }
        Ok((max, min, length))
    }

    /// Local pixel offset of `value`.
    ///
    /// Horizontal axes grow from `min` at the left; vertical axes grow from
    /// `max` at the top. Every value maps to 0 on a zero-length range.
    pub fn coordinate(&self, value: f64) -> ChartResult<f64> {
        let (max, min, length) = self.projected_span()?;
        let v = self.project(value)?;
        if length == 0.0 {
            return Ok(0.0);
        }
        let factor = self.size / length;

        let (from, to) = if self.is_x { (v, min) } else { (max, v) };
        if approx_eq(from, to) {
            return Ok(0.0);
        }
        Ok((from - to) * factor)
    }

    /// Inverse of [`PaintInfo::coordinate`] for a local pixel offset. A
    /// zero-length range yields its single value.
    pub fn value_at(&self, coordinate: f64) -> ChartResult<f64> {
        let (max, min, length) = self.projected_span()?;
        if self.size <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis pixel size must be positive".to_owned(),
            ));
        }

        let projected = if self.is_x {
            min + coordinate / self.size * length
        } else {
            max - coordinate / self.size * length
        };
        Ok(if self.logarithmic {
            10f64.powf(projected)
        } else {
            projected
        })
    }
}
