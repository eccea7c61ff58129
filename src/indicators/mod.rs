//! Technical indicators derived from a source series.
//!
//! Every indicator owns its destination series and rebuilds them from
//! scratch on each [`Indicator::recalc`]. Destination index offsets are
//! aligned so that `dst.index_offset + dst.point_count` equals the source's.

pub mod bollinger;
pub mod ema;
pub mod envelopes;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod sma;
pub mod stochastic;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::series::Series;
use crate::error::{ChartError, ChartResult};

pub use bollinger::{BollingerBands, BollingerParams};
pub use ema::{Ema, EmaParams};
pub use envelopes::{Envelopes, EnvelopesParams};
pub use macd::{Macd, MacdParams};
pub use rsi::{Rsi, RsiParams};
pub use sma::{Sma, SmaParams};
pub use stochastic::{Stochastic, StochasticParams};

/// Computation contract shared by all indicator variants.
pub trait Compute {
    /// Clears and rebuilds every destination series from `values`, the
    /// selected field of `source` in storage order.
    fn recalc(&mut self, source: &Series, values: &[f64]);

    /// Destination series, in a fixed per-variant order.
    fn outputs(&self) -> Vec<&Series>;

    fn outputs_mut(&mut self) -> Vec<&mut Series>;

    /// Source points needed before the last output series gets a value.
    fn min_periods(&self) -> usize;

    /// Whether outputs share the source's area (true) or need their own.
    fn is_overlay(&self) -> bool;

    fn name(&self) -> &'static str;
}

/// Shifts `dst` so its last point lines up with the last point of `src`.
pub fn align_index_offset(src: &Series, dst: &mut Series) {
    let missing = src.point_count() as i64 - dst.point_count() as i64;
    dst.set_index_offset(src.index_offset() + missing);
}

pub(crate) fn validate_period(name: &'static str, value: usize) -> ChartResult<()> {
    if value == 0 {
        return Err(ChartError::InvalidPeriod { name, value });
    }
    Ok(())
}

/// Handle returned by the indicator manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorId(pub u64);

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "indicator#{}", self.0)
    }
}

/// Parameters of any indicator variant, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum IndicatorParams {
    Sma(SmaParams),
    Ema(EmaParams),
    Rsi(RsiParams),
    Macd(MacdParams),
    Bollinger(BollingerParams),
    Envelopes(EnvelopesParams),
    Stochastic(StochasticParams),
}

impl IndicatorParams {
    /// Number of destination series the variant produces.
    #[must_use]
    pub fn output_count(&self) -> usize {
        match self {
            Self::Sma(_) | Self::Ema(_) | Self::Rsi(_) => 1,
            Self::Envelopes(_) | Self::Stochastic(_) => 2,
            Self::Macd(_) | Self::Bollinger(_) => 3,
        }
    }

    /// Overlays share the source's area; oscillators get a sub-area.
    #[must_use]
    pub fn is_overlay(&self) -> bool {
        matches!(
            self,
            Self::Sma(_) | Self::Ema(_) | Self::Bollinger(_) | Self::Envelopes(_)
        )
    }

    /// Short lowercase tag used when naming destination series.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Sma(_) => "sma",
            Self::Ema(_) => "ema",
            Self::Rsi(_) => "rsi",
            Self::Macd(_) => "macd",
            Self::Bollinger(_) => "bollinger",
            Self::Envelopes(_) => "envelopes",
            Self::Stochastic(_) => "stochastic",
        }
    }

    /// Suffixes of the destination series, in output order.
    #[must_use]
    pub fn output_suffixes(&self) -> &'static [&'static str] {
        match self {
            Self::Sma(_) | Self::Ema(_) | Self::Rsi(_) => &[""],
            Self::Macd(_) => &["", ".signal", ".histogram"],
            Self::Bollinger(_) => &["", ".upper", ".lower"],
            Self::Envelopes(_) => &[".upper", ".lower"],
            Self::Stochastic(_) => &[".k", ".d"],
        }
    }
}

/// Closed set of indicator variants.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorKind {
    Sma(Sma),
    Ema(Ema),
    Rsi(Rsi),
    Macd(Macd),
    Bollinger(BollingerBands),
    Envelopes(Envelopes),
    Stochastic(Stochastic),
}

impl IndicatorKind {
    /// Builds the variant described by `params`, naming its destination
    /// series from `dst_names` in output order.
    pub fn from_params(params: IndicatorParams, dst_names: &[String]) -> ChartResult<Self> {
        if dst_names.len() != params.output_count() {
            return Err(ChartError::InvalidData(format!(
                "{} expects {} destination names, got {}",
                params.tag(),
                params.output_count(),
                dst_names.len()
            )));
        }
        let name = |i: usize| dst_names[i].clone();

        Ok(match params {
            IndicatorParams::Sma(p) => Self::Sma(Sma::new(p, name(0))?),
            IndicatorParams::Ema(p) => Self::Ema(Ema::new(p, name(0))?),
            IndicatorParams::Rsi(p) => Self::Rsi(Rsi::new(p, name(0))?),
            IndicatorParams::Macd(p) => Self::Macd(Macd::new(p, name(0), name(1), name(2))?),
            IndicatorParams::Bollinger(p) => {
                Self::Bollinger(BollingerBands::new(p, name(0), name(1), name(2))?)
            }
            IndicatorParams::Envelopes(p) => {
                Self::Envelopes(Envelopes::new(p, name(0), name(1))?)
            }
            IndicatorParams::Stochastic(p) => {
                Self::Stochastic(Stochastic::new(p, name(0), name(1))?)
            }
        })
    }

    #[must_use]
    pub fn params(&self) -> IndicatorParams {
        match self {
            Self::Sma(i) => IndicatorParams::Sma(i.params()),
            Self::Ema(i) => IndicatorParams::Ema(i.params()),
            Self::Rsi(i) => IndicatorParams::Rsi(i.params()),
            Self::Macd(i) => IndicatorParams::Macd(i.params()),
            Self::Bollinger(i) => IndicatorParams::Bollinger(i.params()),
            Self::Envelopes(i) => IndicatorParams::Envelopes(i.params()),
            Self::Stochastic(i) => IndicatorParams::Stochastic(i.params()),
        }
    }

    /// Replaces the parameters; the variant must stay the same.
    pub fn set_params(&mut self, params: IndicatorParams) -> ChartResult<()> {
        match (self, params) {
            (Self::Sma(i), IndicatorParams::Sma(p)) => i.set_params(p),
            (Self::Ema(i), IndicatorParams::Ema(p)) => i.set_params(p),
            (Self::Rsi(i), IndicatorParams::Rsi(p)) => i.set_params(p),
            (Self::Macd(i), IndicatorParams::Macd(p)) => i.set_params(p),
            (Self::Bollinger(i), IndicatorParams::Bollinger(p)) => i.set_params(p),
            (Self::Envelopes(i), IndicatorParams::Envelopes(p)) => i.set_params(p),
            (Self::Stochastic(i), IndicatorParams::Stochastic(p)) => i.set_params(p),
            (current, params) => Err(ChartError::InvalidData(format!(
                "cannot apply {} parameters to {}",
                params.tag(),
                current.name()
            ))),
        }
    }

    fn as_compute(&self) -> &dyn Compute {
        match self {
            Self::Sma(i) => i,
            Self::Ema(i) => i,
            Self::Rsi(i) => i,
            Self::Macd(i) => i,
            Self::Bollinger(i) => i,
            Self::Envelopes(i) => i,
            Self::Stochastic(i) => i,
        }
    }

    fn as_compute_mut(&mut self) -> &mut dyn Compute {
        match self {
            Self::Sma(i) => i,
            Self::Ema(i) => i,
            Self::Rsi(i) => i,
            Self::Macd(i) => i,
            Self::Bollinger(i) => i,
            Self::Envelopes(i) => i,
            Self::Stochastic(i) => i,
        }
    }
}

impl Compute for IndicatorKind {
    fn recalc(&mut self, source: &Series, values: &[f64]) {
        self.as_compute_mut().recalc(source, values);
    }

    fn outputs(&self) -> Vec<&Series> {
        self.as_compute().outputs()
    }

    fn outputs_mut(&mut self) -> Vec<&mut Series> {
        self.as_compute_mut().outputs_mut()
    }

    fn min_periods(&self) -> usize {
        self.as_compute().min_periods()
    }

    fn is_overlay(&self) -> bool {
        self.as_compute().is_overlay()
    }

    fn name(&self) -> &'static str {
        self.as_compute().name()
    }
}

/// An indicator bound to a source series by name and a field index.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    id: IndicatorId,
    source: String,
    value_index: usize,
    kind: IndicatorKind,
}

impl Indicator {
    #[must_use]
    pub fn new(
        id: IndicatorId,
        source: impl Into<String>,
        value_index: usize,
        kind: IndicatorKind,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            value_index,
            kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> IndicatorId {
        self.id
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn value_index(&self) -> usize {
        self.value_index
    }

    #[must_use]
    pub fn kind(&self) -> &IndicatorKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut IndicatorKind {
        &mut self.kind
    }

    #[must_use]
    pub fn params(&self) -> IndicatorParams {
        self.kind.params()
    }

    #[must_use]
    pub fn outputs(&self) -> Vec<&Series> {
        self.kind.outputs()
    }

    #[must_use]
    pub fn output(&self, name: &str) -> Option<&Series> {
        self.outputs().into_iter().find(|series| series.name() == name)
    }

    #[must_use]
    pub fn output_names(&self) -> Vec<String> {
        self.outputs()
            .iter()
            .map(|series| series.name().to_owned())
            .collect()
    }

    /// Rebuilds every destination series from `source`.
    pub fn recalc(&mut self, source: &Series) -> ChartResult<()> {
        let values = source.field_values(self.value_index)?;
        self.kind.recalc(source, &values);
        trace!(
            indicator = %self.id,
            kind = self.kind.name(),
            source = %self.source,
            points = values.len(),
            "indicator recalculated"
        );
        Ok(())
    }
}
