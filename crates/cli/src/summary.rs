//! Serializable views of engine results, shaped for JSON and tables.
//!
//! Undefined bins become `null` in the value columns and are listed with
//! their reason in `undefined`, so nothing is silently turned into 0.

use polars::prelude::*;
use sectorcorr::analysis::{RegionAreas, RegionCounts, RegionDensities, SectorAnalysis};
use sectorcorr::estimate::CorrelationResult;
use sectorcorr::histogram::BinEdges;
use sectorcorr::UndefinedRatio;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UndefinedBin {
    pub bin: usize,
    pub reason: UndefinedRatio,
}

/// Per-bin curve: counts, scores and bands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub upper_edges: Vec<f64>,
    pub centers: Vec<f64>,
    pub observed: Vec<u64>,
    pub expected_mean: Vec<f64>,
    pub score: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub undefined: Vec<UndefinedBin>,
}

impl Curve {
    pub fn new(edges: &BinEdges, analysis: &SectorAnalysis, res: &CorrelationResult) -> Self {
        Self {
            upper_edges: edges.upper_edges().to_vec(),
            centers: edges.centers(),
            observed: analysis.observed.counts().to_vec(),
            expected_mean: analysis.trials.column_means(),
            score: res.scores(),
            lower: res.lower(),
            upper: res.upper(),
            undefined: res
                .undefined_scores()
                .into_iter()
                .map(|(bin, reason)| UndefinedBin { bin, reason })
                .collect(),
        }
    }

    pub fn frame(&self) -> PolarsResult<DataFrame> {
        df!(
            "upper_edge" => self.upper_edges.clone(),
            "center" => self.centers.clone(),
            "observed" => self.observed.clone(),
            "expected_mean" => self.expected_mean.clone(),
            "score" => self.score.clone(),
            "lower" => self.lower.clone(),
            "upper" => self.upper.clone()
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SectorReport {
    pub index: usize,
    pub source: String,
    pub area: f64,
    /// Area centroid as `[x, y]`; absent for zero-area outlines.
    pub centroid: Option<[f64; 2]>,
    pub curve: Curve,
}

#[derive(Clone, Debug, Serialize)]
pub struct DensityReport {
    pub range: f64,
    pub counts: RegionCounts,
    pub areas: RegionAreas,
    pub sectors: Option<f64>,
    pub in_range: Option<f64>,
    pub out_of_range: Option<f64>,
}

impl DensityReport {
    pub fn new(range: f64, d: &RegionDensities) -> Self {
        Self {
            range,
            counts: d.counts,
            areas: d.areas,
            sectors: d.sectors.ok(),
            in_range: d.in_range.ok(),
            out_of_range: d.out_of_range.ok(),
        }
    }
}
