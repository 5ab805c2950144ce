use super::BinValue;
use crate::error::{CorrError, UndefinedRatio};
use crate::histogram::{Histogram, TrialMatrix};

/// Normalized observed over normalized expected, minus one, per bin.
pub fn correlation_scores(
    observed: &Histogram,
    trials: &TrialMatrix,
) -> Result<Vec<BinValue>, CorrError> {
    if observed.len() != trials.width() {
        return Err(CorrError::config(format!(
            "observed histogram has {} bins, trials have {}",
            observed.len(),
            trials.width()
        )));
    }
    let obs_total = observed.total();
    let null_sums = trials.column_sums();
    let null_total: u64 = null_sums.iter().sum();
    Ok(observed
        .counts()
        .iter()
        .zip(&null_sums)
        .map(|(&o, &e)| {
            if null_total == 0 {
                return Err(UndefinedRatio::EmptyNull);
            }
            if obs_total == 0 {
                return Err(UndefinedRatio::EmptyObserved);
            }
            if e == 0 {
                return Err(UndefinedRatio::ZeroExpected);
            }
            let o_hat = o as f64 / obs_total as f64;
            let e_hat = e as f64 / null_total as f64;
            Ok(o_hat / e_hat - 1.0)
        })
        .collect())
}
