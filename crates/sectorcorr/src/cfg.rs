//! Fixed defaults for the engine.
//!
//! Policy
//! - Constants live here so call sites never hard-code them. Callers override
//!   through `AnalysisCfg` and the estimator structs, not by editing these.

/// Two-sided 95% normal quantile used by the analytic interval.
pub const Z_95: f64 = 1.96;
/// Bounding-box draws per requested point in domain-constrained sampling.
pub const DEFAULT_OVERSAMPLE: usize = 3;
/// Null-model trials per analysis unit.
pub const DEFAULT_TRIALS: usize = 1000;
/// Monte Carlo draws used to estimate union areas for region densities.
pub const DEFAULT_AREA_SAMPLES: usize = 200_000;
/// Upper bound on generated or explicit bin edges; larger grids are rejected
/// before any allocation.
pub const MAX_BIN_EDGES: usize = 1_000_000;
/// Default bootstrap confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
