use super::score::correlation_scores;
use super::BinValue;
use crate::cfg::{DEFAULT_CONFIDENCE, Z_95};
use crate::error::{CorrError, UndefinedRatio};
use crate::histogram::{Histogram, TrialMatrix};
use crate::sampler::ReplayToken;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed band `[lower, upper]` around a score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Strategy for the per-bin confidence band.
pub trait IntervalEstimator: Sync {
    /// One entry per bin of `scores`; an undefined score gives an undefined band.
    fn intervals(
        &self,
        observed: &Histogram,
        trials: &TrialMatrix,
        scores: &[BinValue],
    ) -> Result<Vec<Result<Interval, UndefinedRatio>>, CorrError>;
}

fn check_width(trials: &TrialMatrix, scores: &[BinValue]) -> Result<(), CorrError> {
    if scores.len() != trials.width() {
        return Err(CorrError::config(format!(
            "{} scores for {} bins",
            scores.len(),
            trials.width()
        )));
    }
    Ok(())
}

/// Normal-approximation band from relative-error propagation.
///
/// `half = z · |score| · sqrt((σ_b/μ_b)² + (σ_tot/μ_tot)²) / sqrt(N)` with
/// population standard deviations over the N trials.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analytic {
    pub z: f64,
}

impl Default for Analytic {
    fn default() -> Self {
        Self { z: Z_95 }
    }
}

impl IntervalEstimator for Analytic {
    fn intervals(
        &self,
        _observed: &Histogram,
        trials: &TrialMatrix,
        scores: &[BinValue],
    ) -> Result<Vec<Result<Interval, UndefinedRatio>>, CorrError> {
        if !(self.z.is_finite() && self.z > 0.0) {
            return Err(CorrError::config("normal quantile z must be finite and > 0"));
        }
        check_width(trials, scores)?;
        let sqrt_n = (trials.trials() as f64).sqrt();
        let means = trials.column_means();
        let stds = trials.column_std();
        let (total_mean, total_std) = trials.total_mean_std();
        Ok(scores
            .iter()
            .zip(means.iter().zip(&stds))
            .map(|(score, (&mean, &std))| {
                let score = (*score)?;
                if mean == 0.0 || total_mean == 0.0 {
                    return Err(UndefinedRatio::ZeroMeanCount);
                }
                let rel = ((std / mean).powi(2) + (total_std / total_mean).powi(2)).sqrt();
                let half = self.z * score.abs() * rel / sqrt_n;
                Ok(Interval {
                    lower: score - half,
                    upper: score + half,
                })
            })
            .collect())
    }
}

/// Percentile band over resamples of the trial rows (with replacement).
///
/// The observed histogram is held fixed; each resample redraws N trial rows,
/// recomputes the scores, and the band is the central `confidence` mass of
/// the defined resampled scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bootstrap {
    pub resamples: usize,
    pub confidence: f64,
    pub seed: u64,
}

impl Bootstrap {
    pub fn new(resamples: usize, seed: u64) -> Self {
        Self {
            resamples,
            confidence: DEFAULT_CONFIDENCE,
            seed,
        }
    }

    fn validate(&self) -> Result<(), CorrError> {
        if self.resamples == 0 {
            return Err(CorrError::config("bootstrap needs at least one resample"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(CorrError::config("bootstrap confidence must be in (0, 1)"));
        }
        Ok(())
    }
}

impl IntervalEstimator for Bootstrap {
    fn intervals(
        &self,
        observed: &Histogram,
        trials: &TrialMatrix,
        scores: &[BinValue],
    ) -> Result<Vec<Result<Interval, UndefinedRatio>>, CorrError> {
        self.validate()?;
        check_width(trials, scores)?;
        let n = trials.trials();
        let draws = (0..self.resamples)
            .into_par_iter()
            .map(|r| {
                let mut rng = resample_token(self.seed, r as u64).rng();
                let picks: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                correlation_scores(observed, &trials.select(&picks)?)
            })
            .collect::<Result<Vec<_>, CorrError>>()?;

        let lo_q = 0.5 * (1.0 - self.confidence);
        let hi_q = 0.5 * (1.0 + self.confidence);
        Ok(scores
            .iter()
            .enumerate()
            .map(|(b, score)| {
                (*score)?;
                let mut vals: Vec<f64> = draws.iter().filter_map(|d| d[b].ok()).collect();
                if vals.is_empty() {
                    return Err(UndefinedRatio::NoDefinedResample);
                }
                vals.sort_by(f64::total_cmp);
                Ok(Interval {
                    lower: quantile(&vals, lo_q),
                    upper: quantile(&vals, hi_q),
                })
            })
            .collect())
    }
}

// Resamples use their own substream, disjoint from trial streams of the same seed.
const RESAMPLE_STREAM: u64 = u64::MAX - 1;

fn resample_token(seed: u64, r: u64) -> ReplayToken {
    ReplayToken::new(seed, r).substream(RESAMPLE_STREAM)
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::{quantile, resample_token};
    use crate::sampler::ReplayToken;
    use rand::Rng;

    #[test]
    fn quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 0.5), 3.0);
        assert_eq!(quantile(&v, 1.0), 5.0);
        assert!((quantile(&v, 0.125) - 1.5).abs() < 1e-12);
        assert_eq!(quantile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn resample_streams_differ_from_trial_streams() {
        for r in 0..8u64 {
            let tok = resample_token(2024, r);
            assert_eq!(tok.index, r);
            assert_ne!(tok.seed, 2024);
            let a: u64 = tok.rng().gen();
            let b: u64 = ReplayToken::new(2024, r).rng().gen();
            assert_ne!(a, b);
        }
        assert_eq!(resample_token(7, 3), resample_token(7, 3));
    }
}
