//! Error kinds shared by the correlation engine.
//!
//! - `CorrError`: propagated through `Result` (configuration problems and
//!   sampling insufficiency). The engine never retries; callers decide.
//! - `UndefinedRatio`: per-bin marker for zero denominators. It is data, not a
//!   failure, so it travels inside result vectors next to the bins that did
//!   compute cleanly.

use serde::Serialize;
use std::fmt;

/// Failure of an engine call.
#[derive(Clone, Debug, PartialEq)]
pub enum CorrError {
    /// Degenerate polygon, non-increasing bin edges, zero trials, zero-size
    /// sampling domain and similar. Not recoverable by retrying.
    Configuration { reason: String },
    /// Domain-constrained sampling kept fewer points than requested.
    SamplingInsufficiency { requested: usize, obtained: usize },
}

impl CorrError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Missing point count for `SamplingInsufficiency`, `None` otherwise.
    pub fn shortfall(&self) -> Option<usize> {
        match *self {
            Self::SamplingInsufficiency {
                requested,
                obtained,
            } => Some(requested.saturating_sub(obtained)),
            Self::Configuration { .. } => None,
        }
    }
}

impl fmt::Display for CorrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "invalid configuration: {reason}"),
            Self::SamplingInsufficiency {
                requested,
                obtained,
            } => write!(
                f,
                "domain sampling kept {obtained} of {requested} points (short by {}); raise the oversampling factor",
                requested.saturating_sub(*obtained)
            ),
        }
    }
}

impl std::error::Error for CorrError {}

/// Why a per-bin ratio could not be formed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UndefinedRatio {
    /// The null model put no mass in this bin.
    ZeroExpected,
    /// The observed histogram is empty, so it cannot be normalized.
    EmptyObserved,
    /// Every trial histogram is empty.
    EmptyNull,
    /// Mean per-trial count (bin or total) is zero; relative error undefined.
    ZeroMeanCount,
    /// No bootstrap resample produced a defined score for this bin.
    NoDefinedResample,
    /// Region area is zero, so a density cannot be formed.
    ZeroArea,
}

impl fmt::Display for UndefinedRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ZeroExpected => "expected count is zero",
            Self::EmptyObserved => "observed histogram is empty",
            Self::EmptyNull => "null-model histograms are empty",
            Self::ZeroMeanCount => "mean trial count is zero",
            Self::NoDefinedResample => "no resample produced a defined score",
            Self::ZeroArea => "region area is zero",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_only_for_sampling() {
        let e = CorrError::SamplingInsufficiency {
            requested: 500,
            obtained: 420,
        };
        assert_eq!(e.shortfall(), Some(80));
        assert!(e.to_string().contains("short by 80"));
        assert_eq!(CorrError::config("x").shortfall(), None);
    }
}
