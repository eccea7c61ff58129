use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};

/// Storage for point fields; every built-in kind fits inline.
pub type PointFields = SmallVec<[f64; 4]>;

/// Shape of the points stored in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    /// Single value.
    Line,
    /// Two values, e.g. a volume bar `(base, value)` or a band `(upper, lower)`.
    Bar,
    /// Open, high, low, close.
    Stock,
}

impl PointKind {
    #[must_use]
    pub const fn field_count(self) -> usize {
        match self {
            Self::Line => 1,
            Self::Bar => 2,
            Self::Stock => 4,
        }
    }
}

/// Field positions inside a [`PointKind::Stock`] point.
pub mod stock_field {
    pub const OPEN: usize = 0;
    pub const HIGH: usize = 1;
    pub const LOW: usize = 2;
    pub const CLOSE: usize = 3;
}

/// One domain point: a fixed-size vector of values plus an optional
/// timestamp identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    kind: PointKind,
    fields: PointFields,
    id: Option<DateTime<Utc>>,
    visible: bool,
}

impl Point {
    /// Builds a point, checking that `fields` matches the kind's arity.
    pub fn new(kind: PointKind, fields: &[f64]) -> ChartResult<Self> {
        if fields.len() != kind.field_count() {
            return Err(ChartError::FieldCount {
                expected: kind.field_count(),
                actual: fields.len(),
            });
        }

        Ok(Self {
            kind,
            fields: SmallVec::from_slice(fields),
            id: None,
            visible: true,
        })
    }

    #[must_use]
    pub fn line(value: f64) -> Self {
        Self::from_fields(PointKind::Line, SmallVec::from_slice(&[value]))
    }

    #[must_use]
    pub fn bar(v0: f64, v1: f64) -> Self {
        Self::from_fields(PointKind::Bar, SmallVec::from_slice(&[v0, v1]))
    }

    #[must_use]
    pub fn stock(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self::from_fields(
            PointKind::Stock,
            SmallVec::from_slice(&[open, high, low, close]),
        )
    }

    /// Converts decimal OHLC quotes into a stock point.
    pub fn stock_from_decimal(
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::stock(
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        ))
    }

    fn from_fields(kind: PointKind, fields: PointFields) -> Self {
        Self {
            kind,
            fields,
            id: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: DateTime<Utc>) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn kind(&self) -> PointKind {
        self.kind
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.fields
    }

    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.fields.get(index).copied()
    }

    pub fn set_value_at(&mut self, index: usize, value: f64) -> ChartResult<()> {
        let len = self.fields.len();
        let slot = self.fields.get_mut(index).ok_or_else(|| {
            ChartError::InvalidData(format!("field index {index} out of range for {len} fields"))
        })?;
        *slot = value;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> Option<DateTime<Utc>> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<DateTime<Utc>>) {
        self.id = id;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns `(max, min)` as the point contributes to a vertical range.
    ///
    /// Stock points report `(high, low)`; other kinds fold over every field.
    #[must_use]
    pub fn max_min(&self) -> (f64, f64) {
        if self.kind == PointKind::Stock {
            return (
                self.fields[stock_field::HIGH],
                self.fields[stock_field::LOW],
            );
        }

        let first = self.fields[0];
        self.fields
            .iter()
            .skip(1)
            .fold((first, first), |(max, min), &v| (max.max(v), min.min(v)))
    }
}
