//! Sector/point spatial correlation engine.
//!
//! Compares the nearest-boundary distances of an observed point pattern to a
//! reference polygon ("sector") with those of randomized null-model point sets
//! drawn in the same domain, and reports a per-bin correlation score with a
//! confidence band.
//!
//! Layout
//! - `geom`: polygon containment, boundary distance, outline helpers.
//! - `sampler`: replayable point generators and the null-model switch.
//! - `distance`, `histogram`: distance extraction and binning.
//! - `estimate`: correlation scores and interval estimators.
//! - `analysis`: per-sector and per-domain pipelines, pooling, region densities.
//!
//! The crate does no file I/O; callers hand in coordinates and get numbers back.

pub mod analysis;
pub mod cfg;
pub mod distance;
pub mod error;
pub mod estimate;
pub mod geom;
pub mod histogram;
pub mod sampler;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{CorrError, UndefinedRatio};
pub use geom::{Point, Polygon};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::analysis::{
        analyze_cotyledon, analyze_sector, analyze_units, pool, region_densities, AnalysisCfg,
        AreaFilter, DensityCfg, SectorAnalysis, SectorUnit,
    };
    pub use crate::distance::{extract_distances, points_inside};
    pub use crate::error::{CorrError, UndefinedRatio};
    pub use crate::estimate::{
        estimate, Analytic, Bootstrap, CorrelationResult, Interval, IntervalEstimator,
    };
    pub use crate::geom::{Point, Polygon};
    pub use crate::histogram::{BinEdges, BinSpec, Histogram, TrialMatrix};
    pub use crate::sampler::{NullModel, PointSampler, RadialCfg, ReplayToken};
}
