use serde::{Deserialize, Serialize};

/// Preset view windows for [`AxisRange::set_view_values_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewValues {
    /// Whole auto/fixed range.
    FitScreen,
    /// Anchor at the max bound and open toward the min bound.
    ScrollToLast,
    /// Anchor at the min bound and open toward the max bound.
    ScrollToFirst,
}

/// Result of a view-window request.
///
/// `OutOfBounds` means the request was structurally valid but fell outside
/// the current auto/fixed range, so the view was left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewValuesOutcome {
    Applied,
    OutOfBounds,
    Rejected,
}

impl ViewValuesOutcome {
    /// `true` for every request with `max >= min`, including ones that were
    /// ignored because they fell outside the range.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        !matches!(self, Self::Rejected)
    }

    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Value range of one scale.
///
/// Keeps three pairs of bounds:
/// - fixed (`min_value`/`max_value`), used when `auto` is off,
/// - auto, rebuilt from visible data on every layout pass,
/// - view, the currently displayed window; unset means "follow the
///   fixed/auto bounds".
///
/// When both view values are set, `min_view <= max_view`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    auto: bool,
    #[serde(default)]
    min_value: Option<f64>,
    #[serde(default)]
    max_value: Option<f64>,
    #[serde(default)]
    min_view_value: Option<f64>,
    #[serde(default)]
    max_view_value: Option<f64>,
    #[serde(skip)]
    min_auto_value: Option<f64>,
    #[serde(skip)]
    max_auto_value: Option<f64>,
    zoomable: bool,
    movable: bool,
    margin: f64,
    #[serde(default)]
    min_view_length: Option<f64>,
    #[serde(default)]
    max_view_length: Option<f64>,
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            auto: true,
            min_value: None,
            max_value: None,
            min_view_value: None,
            max_view_value: None,
            min_auto_value: None,
            max_auto_value: None,
            zoomable: false,
            movable: false,
            margin: 0.0,
            min_view_length: None,
            max_view_length: None,
        }
    }
}

impl AxisRange {
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn set_auto(&mut self, auto: bool) {
        self.auto = auto;
    }

    #[must_use]
    pub fn is_zoomable(&self) -> bool {
        self.zoomable
    }

    pub fn set_zoomable(&mut self, zoomable: bool) {
        self.zoomable = zoomable;
    }

    #[must_use]
    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn set_movable(&mut self, movable: bool) {
        self.movable = movable;
    }

    #[must_use]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Non-finite margins are ignored.
    pub fn set_margin(&mut self, margin: f64) {
        if margin.is_finite() {
            self.margin = margin;
        }
    }

    /// Padding callers add on both sides of `[min, max]` before expanding.
    #[must_use]
    pub fn get_margin(&self, max: f64, min: f64) -> f64 {
        (max - min) * self.margin
    }

    #[must_use]
    pub fn min_view_length(&self) -> Option<f64> {
        self.min_view_length
    }

    #[must_use]
    pub fn max_view_length(&self) -> Option<f64> {
        self.max_view_length
    }

    /// Clamps the view window length; `None` removes the limit.
    pub fn set_max_min_view_length(
        &mut self,
        max_view_length: Option<f64>,
        min_view_length: Option<f64>,
    ) {
        self.max_view_length = max_view_length.filter(|length| length.is_finite());
        self.min_view_length = min_view_length.filter(|length| length.is_finite());
    }

    /// Sets the fixed bounds used when `auto` is off. Non-finite bounds
    /// count as unset.
    pub fn set_max_min_values(&mut self, max_value: Option<f64>, min_value: Option<f64>) {
        self.max_value = max_value.filter(|value| value.is_finite());
        self.min_value = min_value.filter(|value| value.is_finite());
    }

    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    #[must_use]
    pub fn min_auto_value(&self) -> Option<f64> {
        self.min_auto_value
    }

    #[must_use]
    pub fn max_auto_value(&self) -> Option<f64> {
        self.max_auto_value
    }

    #[must_use]
    pub fn min_view_value(&self) -> Option<f64> {
        self.min_view_value
    }

    #[must_use]
    pub fn max_view_value(&self) -> Option<f64> {
        self.max_view_value
    }

    pub fn reset_auto_values(&mut self) {
        self.min_auto_value = None;
        self.max_auto_value = None;
    }

    pub fn reset_view_values(&mut self) {
        self.min_view_value = None;
        self.max_view_value = None;
    }

    /// Widens the auto bounds to include `[min, max]`. Never narrows them.
    /// Non-finite inputs are ignored.
    pub fn expand_auto_values(&mut self, max: f64, min: f64) {
        if min.is_finite() {
            self.min_auto_value = Some(self.min_auto_value.map_or(min, |current| current.min(min)));
        }
        if max.is_finite() {
            self.max_auto_value = Some(self.max_auto_value.map_or(max, |current| current.max(max)));
        }
    }

    #[must_use]
    pub fn min_or_auto_value(&self) -> Option<f64> {
        if self.auto {
            self.min_auto_value
        } else {
            self.min_value
        }
    }

    #[must_use]
    pub fn max_or_auto_value(&self) -> Option<f64> {
        if self.auto {
            self.max_auto_value
        } else {
            self.max_value
        }
    }

    #[must_use]
    pub fn min_view_or_auto_value(&self) -> Option<f64> {
        self.min_view_value.or_else(|| self.min_or_auto_value())
    }

    #[must_use]
    pub fn max_view_or_auto_value(&self) -> Option<f64> {
        self.max_view_value.or_else(|| self.max_or_auto_value())
    }

    #[must_use]
    pub fn view_length(&self) -> Option<f64> {
        Some(self.max_view_or_auto_value()? - self.min_view_or_auto_value()?)
    }

    #[must_use]
    pub fn length(&self) -> Option<f64> {
        Some(self.max_or_auto_value()? - self.min_or_auto_value()?)
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.min_or_auto_value()?, self.max_or_auto_value()?))
    }

    fn view_bounds(&self) -> Option<(f64, f64)> {
        Some((self.min_view_or_auto_value()?, self.max_view_or_auto_value()?))
    }

    /// Stores a new view window.
    ///
    /// Requests with `max < min` are rejected. Requests not fully inside the
    /// current fixed/auto bounds leave the view untouched and report
    /// [`ViewValuesOutcome::OutOfBounds`] (still "accepted"). Accepted
    /// windows are resized around their midpoint to honor the view length
    /// limits.
    pub fn set_view_values(&mut self, max: f64, min: f64) -> ViewValuesOutcome {
        if max < min {
            return ViewValuesOutcome::Rejected;
        }
        let Some((lower, upper)) = self.bounds() else {
            return ViewValuesOutcome::OutOfBounds;
        };
        if !(max <= upper && min >= lower) {
            return ViewValuesOutcome::OutOfBounds;
        }

        let (mut min, mut max) = (min, max);
        let length = max - min;
        let middle = (max + min) * 0.5;
        let clamp_to = match (self.max_view_length, self.min_view_length) {
            (Some(limit), _) if length > limit => Some(limit),
            (_, Some(limit)) if length < limit => Some(limit),
            _ => None,
        };
        if let Some(limit) = clamp_to {
            let half = limit * 0.5;
            max = middle + half;
            min = middle - half;
        }

        self.min_view_value = Some(min);
        self.max_view_value = Some(max);
        ViewValuesOutcome::Applied
    }

    /// Positions the view window according to `mode`.
    ///
    /// `view_length` of `None` keeps the current view length; it has no
    /// effect in [`ViewValues::FitScreen`].
    pub fn set_view_values_mode(
        &mut self,
        mode: ViewValues,
        view_length: Option<f64>,
    ) -> ViewValuesOutcome {
        let Some((lower, upper)) = self.bounds() else {
            return ViewValuesOutcome::OutOfBounds;
        };
        let length = view_length
            .or_else(|| self.view_length())
            .unwrap_or(upper - lower);

        let (max, min) = match mode {
            ViewValues::FitScreen => (upper, lower),
            ViewValues::ScrollToLast => (upper, (upper - length).max(lower)),
            ViewValues::ScrollToFirst => ((lower + length).min(upper), lower),
        };
        self.set_view_values(max, min)
    }

    /// Widens the current view window to include `[min, max]`.
    pub fn expand_view_values(&mut self, max: f64, min: f64) -> ViewValuesOutcome {
        let new_min = self.min_view_value.map_or(min, |current| current.min(min));
        let new_max = self.max_view_value.map_or(max, |current| current.max(max));
        self.set_view_values(new_max, new_min)
    }

    /// Shrinks (`factor > 0`) or grows (`factor < 0`) the view symmetrically
    /// by `view_length * factor / 2` per side.
    ///
    /// A result covering the whole range on both sides resets the view to
    /// follow the auto/fixed bounds. No-op unless zoomable.
    pub fn zoom_view_values(&mut self, factor: f64) {
        if !self.zoomable {
            return;
        }
        let (Some((view_min, view_max)), Some((lower, upper))) = (self.view_bounds(), self.bounds())
        else {
            return;
        };

        let d = (view_max - view_min) * factor / 2.0;
        let mut new_min = view_min + d;
        let mut new_max = view_max - d;

        if new_max >= upper && new_min <= lower {
            self.reset_view_values();
            return;
        }
        if new_max >= upper && self.max_view_value.is_some() {
            new_max = upper;
        }
        if new_min <= lower && self.min_view_value.is_some() {
            new_min = lower;
        }
        let _ = self.set_view_values(new_max, new_min);
    }

    /// Shifts the view by `view_length * factor`, keeping its length.
    ///
    /// A shift past a bound parks the window against that bound. No-op
    /// unless movable.
    pub fn move_view_values(&mut self, factor: f64) {
        if !self.movable {
            return;
        }
        let (Some((view_min, view_max)), Some((lower, upper))) = (self.view_bounds(), self.bounds())
        else {
            return;
        };

        let length = view_max - view_min;
        let d = length * factor;
        let mut new_min = view_min + d;
        let mut new_max = view_max + d;

        if new_max >= upper && self.max_view_value.is_some() {
            new_max = upper;
            new_min = new_max - length;
        } else if new_min <= lower && self.min_view_value.is_some() {
            new_min = lower;
            new_max = new_min + length;
        }
        let _ = self.set_view_values(new_max, new_min);
    }
}
