//! Observed-vs-null pipeline for sectors on a domain.
//!
//! Purpose
//! - Turn raw inputs (domain outline, marker positions, sector outlines) into
//!   the observed histogram and the `TrialMatrix` the estimator consumes.
//!
//! Model
//! - Observed points are filtered to the domain first. Each trial draws as many
//!   null points as survived that filter, using the configured `NullModel`.
//! - `analyze_cotyledon` shares one null set per trial between every sector of
//!   the domain. `analyze_units` treats units independently and gives each its
//!   own replay substream.
//! - Trials fan out on rayon and are collected in index order. The first
//!   failing trial aborts the whole unit; partial matrices are never returned.
//!
//! Pooling sums observed histograms and adds trial matrices row by row, so a
//! pooled estimate weights sectors by their point counts.

mod density;

pub use density::{region_densities, DensityCfg, RegionAreas, RegionCounts, RegionDensities};

use crate::cfg::{DEFAULT_OVERSAMPLE, DEFAULT_TRIALS};
use crate::distance::{extract_distances, points_inside};
use crate::error::CorrError;
use crate::estimate::{estimate, CorrelationResult, IntervalEstimator};
use crate::geom::{Point, Polygon};
use crate::histogram::{BinEdges, Histogram, TrialMatrix};
use crate::sampler::{NullModel, ReplayToken};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Knobs for one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisCfg {
    pub edges: BinEdges,
    /// Null-model trials per unit (N).
    pub trials: usize,
    pub seed: u64,
    /// Bounding-box draws per requested point (domain null model only).
    pub oversample: usize,
    #[serde(default)]
    pub null_model: NullModel,
}

impl AnalysisCfg {
    /// Defaults for everything but the bin grid.
    pub fn new(edges: BinEdges) -> Self {
        Self {
            edges,
            trials: DEFAULT_TRIALS,
            seed: 0,
            oversample: DEFAULT_OVERSAMPLE,
            null_model: NullModel::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CorrError> {
        if self.trials == 0 {
            return Err(CorrError::config("trials must be > 0"));
        }
        if self.oversample == 0 {
            return Err(CorrError::config("oversample must be >= 1"));
        }
        Ok(())
    }
}

/// One sector with the marker points measured against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorUnit {
    pub sector: Polygon,
    pub observed: Vec<Point>,
}

/// Observed histogram and null trials for one sector (or a pooled group).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorAnalysis {
    pub observed: Histogram,
    pub trials: TrialMatrix,
}

impl SectorAnalysis {
    pub fn estimate(
        &self,
        estimator: &dyn IntervalEstimator,
    ) -> Result<CorrelationResult, CorrError> {
        estimate(&self.observed, &self.trials, estimator)
    }
}

/// Inclusive sector-area window; sectors outside it are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaFilter {
    pub min: f64,
    pub max: f64,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl AreaFilter {
    pub fn validate(&self) -> Result<(), CorrError> {
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(CorrError::config("area filter needs min <= max"));
        }
        Ok(())
    }

    #[inline]
    pub fn accepts(&self, sector: &Polygon) -> bool {
        let a = sector.area();
        self.min <= a && a <= self.max
    }

    /// Indices of the accepted sectors, in input order.
    pub fn select(&self, sectors: &[Polygon]) -> Vec<usize> {
        sectors
            .iter()
            .enumerate()
            .filter(|(_, s)| self.accepts(s))
            .map(|(i, _)| i)
            .collect()
    }
}

fn run_trials<T, F>(cfg: &AnalysisCfg, seed: u64, per_trial: F) -> Result<Vec<T>, CorrError>
where
    T: Send,
    F: Fn(ReplayToken) -> Result<T, CorrError> + Sync,
{
    (0..cfg.trials)
        .into_par_iter()
        .map(|t| per_trial(ReplayToken::new(seed, t as u64)))
        .collect()
}

fn analyze_with_seed(
    domain: &Polygon,
    unit: &SectorUnit,
    cfg: &AnalysisCfg,
    seed: u64,
) -> Result<SectorAnalysis, CorrError> {
    let inside = points_inside(&unit.observed, domain);
    let count = inside.len();
    if count < unit.observed.len() {
        debug!(
            dropped = unit.observed.len() - count,
            "observed points outside the domain"
        );
    }
    let observed = cfg.edges.bin(&extract_distances(&inside, &unit.sector));
    let sampler = cfg.null_model.sampler(domain, cfg.oversample)?;
    let rows = run_trials(cfg, seed, |tok| {
        let pts = sampler.sample(count, tok)?;
        Ok(cfg.edges.bin(&extract_distances(&pts, &unit.sector)))
    })?;
    debug!(points = count, trials = rows.len(), "sector trials done");
    Ok(SectorAnalysis {
        observed,
        trials: TrialMatrix::new(rows)?,
    })
}

/// Observed histogram plus `cfg.trials` null histograms for one sector.
pub fn analyze_sector(
    domain: &Polygon,
    unit: &SectorUnit,
    cfg: &AnalysisCfg,
) -> Result<SectorAnalysis, CorrError> {
    cfg.validate()?;
    analyze_with_seed(domain, unit, cfg, cfg.seed)
}

/// Independent units on one domain; unit `i` replays from substream `i`.
pub fn analyze_units(
    domain: &Polygon,
    units: &[SectorUnit],
    cfg: &AnalysisCfg,
) -> Result<Vec<SectorAnalysis>, CorrError> {
    cfg.validate()?;
    let root = ReplayToken::new(cfg.seed, 0);
    units
        .iter()
        .enumerate()
        .map(|(i, unit)| analyze_with_seed(domain, unit, cfg, root.substream(i as u64).seed))
        .collect()
}

/// All sectors of one domain against the same marker set and the same null
/// sets: trial `t` draws once and is measured against every sector.
pub fn analyze_cotyledon(
    domain: &Polygon,
    points: &[Point],
    sectors: &[Polygon],
    cfg: &AnalysisCfg,
) -> Result<Vec<SectorAnalysis>, CorrError> {
    cfg.validate()?;
    if sectors.is_empty() {
        return Ok(Vec::new());
    }
    let inside = points_inside(points, domain);
    let count = inside.len();
    info!(
        sectors = sectors.len(),
        points = count,
        trials = cfg.trials,
        "analyzing domain"
    );
    let observed: Vec<Histogram> = sectors
        .iter()
        .map(|s| cfg.edges.bin(&extract_distances(&inside, s)))
        .collect();
    let sampler = cfg.null_model.sampler(domain, cfg.oversample)?;
    // trial-major: per_trial[t][s]
    let per_trial = run_trials(cfg, cfg.seed, |tok| {
        let pts = sampler.sample(count, tok)?;
        Ok(sectors
            .iter()
            .map(|s| cfg.edges.bin(&extract_distances(&pts, s)))
            .collect::<Vec<_>>())
    })?;

    let mut columns: Vec<Vec<Histogram>> = (0..sectors.len())
        .map(|_| Vec::with_capacity(cfg.trials))
        .collect();
    for row in per_trial {
        for (col, h) in columns.iter_mut().zip(row) {
            col.push(h);
        }
    }
    observed
        .into_iter()
        .zip(columns)
        .map(|(observed, rows)| {
            Ok(SectorAnalysis {
                observed,
                trials: TrialMatrix::new(rows)?,
            })
        })
        .collect()
}

/// Sum observed histograms and add trial matrices row-wise.
pub fn pool(parts: &[SectorAnalysis]) -> Result<SectorAnalysis, CorrError> {
    let Some((first, rest)) = parts.split_first() else {
        return Err(CorrError::config("nothing to pool"));
    };
    let mut acc = first.clone();
    for part in rest {
        acc.observed.add(&part.observed)?;
        acc.trials.add_rowwise(&part.trials)?;
    }
    info!(
        parts = parts.len(),
        observed = acc.observed.total(),
        null = acc.trials.grand_total(),
        "pooled sectors"
    );
    Ok(acc)
}

#[cfg(test)]
mod tests;
