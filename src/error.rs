use thiserror::Error;

use crate::indicators::IndicatorId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid {name} period: {value} (must be >= 1)")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("point field count mismatch: expected {expected}, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("logarithmic mapping requires positive values, got {value}")]
    LogarithmicDomain { value: f64 },

    #[error("axis range has no bounds yet")]
    UndefinedRange,

    #[error("unknown series: {0}")]
    UnknownSeries(String),

    #[error("duplicate series name: {0}")]
    DuplicateSeries(String),

    #[error("unknown area: {0}")]
    UnknownArea(String),

    #[error("unknown indicator: {0}")]
    UnknownIndicator(IndicatorId),

    #[error("{id} is the source of {dependent}")]
    IndicatorInUse {
        id: IndicatorId,
        dependent: IndicatorId,
    },
}
