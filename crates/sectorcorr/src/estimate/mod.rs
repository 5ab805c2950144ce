//! Correlation score and confidence band per distance bin.
//!
//! Model
//! - `score[b] = Ô[b] / Ê[b] - 1` with `Ô = O / ΣO` and `Ê = ΣₜT / ΣₜΣ_b T`.
//!   The expected side is normalized by the aggregate trial total, never by a
//!   per-trial total.
//! - 0 is parity with the null model, > 0 excess (clustering) and < 0
//!   depletion (inhibition) at that distance.
//! - Zero denominators yield `Err(UndefinedRatio)` for that bin; the other
//!   bins are still reported.
//! - Bands come from an `IntervalEstimator`: `Analytic` (normal approximation
//!   with relative-error propagation, the default) or `Bootstrap` (percentile
//!   over trial resamples).

mod interval;
mod score;

pub use interval::{Analytic, Bootstrap, Interval, IntervalEstimator};
pub use score::correlation_scores;

use crate::error::{CorrError, UndefinedRatio};
use crate::histogram::{Histogram, TrialMatrix};
use serde::Serialize;

/// Per-bin value that may be undefined.
pub type BinValue = Result<f64, UndefinedRatio>;

/// Score and band for one bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BinEstimate {
    pub score: BinValue,
    pub interval: Result<Interval, UndefinedRatio>,
}

/// Estimates for every bin, aligned with the histogram bins.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub bins: Vec<BinEstimate>,
}

impl CorrelationResult {
    pub fn scores(&self) -> Vec<Option<f64>> {
        self.bins.iter().map(|b| b.score.ok()).collect()
    }

    pub fn lower(&self) -> Vec<Option<f64>> {
        self.bins
            .iter()
            .map(|b| b.interval.ok().map(|i| i.lower))
            .collect()
    }

    pub fn upper(&self) -> Vec<Option<f64>> {
        self.bins
            .iter()
            .map(|b| b.interval.ok().map(|i| i.upper))
            .collect()
    }

    /// Bins whose score is undefined, with the reason.
    pub fn undefined_scores(&self) -> Vec<(usize, UndefinedRatio)> {
        self.bins
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.score.err().map(|r| (i, r)))
            .collect()
    }
}

/// Score every bin and attach a band from `estimator`.
pub fn estimate(
    observed: &Histogram,
    trials: &TrialMatrix,
    estimator: &dyn IntervalEstimator,
) -> Result<CorrelationResult, CorrError> {
    let scores = correlation_scores(observed, trials)?;
    let intervals = estimator.intervals(observed, trials, &scores)?;
    Ok(CorrelationResult {
        bins: scores
            .into_iter()
            .zip(intervals)
            .map(|(score, interval)| BinEstimate { score, interval })
            .collect(),
    })
}
