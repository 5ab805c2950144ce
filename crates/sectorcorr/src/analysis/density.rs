//! Marker densities in three regions around the sectors of one domain:
//! the sectors themselves, a band of width `range` around them ("in range"),
//! and the rest of the domain ("out of range").
//!
//! The band is the union of radially expanded sectors clipped to the domain.
//! Its area is estimated by Monte Carlo over the domain's bounding box and
//! scaled by the exact domain area; sector and domain areas are exact.

use crate::cfg::DEFAULT_AREA_SAMPLES;
use crate::distance::points_inside;
use crate::error::{CorrError, UndefinedRatio};
use crate::geom::{Point, Polygon};
use crate::sampler::{DomainSampler, ReplayToken};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

const AREA_CHUNK: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityCfg {
    /// Radial expansion applied to every sector vertex.
    pub range: f64,
    /// Bounding-box draws for the union-area estimate.
    pub area_samples: usize,
    pub seed: u64,
}

impl Default for DensityCfg {
    fn default() -> Self {
        Self {
            range: 100.0,
            area_samples: DEFAULT_AREA_SAMPLES,
            seed: 0,
        }
    }
}

impl DensityCfg {
    pub fn validate(&self) -> Result<(), CorrError> {
        if !(self.range.is_finite() && self.range >= 0.0) {
            return Err(CorrError::config("range must be finite and >= 0"));
        }
        if self.area_samples == 0 {
            return Err(CorrError::config("area_samples must be > 0"));
        }
        Ok(())
    }
}

/// Marker counts per region. `sectors` sums per-sector counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegionCounts {
    pub sectors: usize,
    pub in_range: usize,
    pub out_of_range: usize,
}

/// Region areas. `sectors` sums per-sector areas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RegionAreas {
    pub sectors: f64,
    pub in_range: f64,
    pub out_of_range: f64,
    pub domain: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RegionDensities {
    pub counts: RegionCounts,
    pub areas: RegionAreas,
    pub sectors: Result<f64, UndefinedRatio>,
    pub in_range: Result<f64, UndefinedRatio>,
    pub out_of_range: Result<f64, UndefinedRatio>,
}

fn density(count: usize, area: f64) -> Result<f64, UndefinedRatio> {
    if area > 0.0 {
        Ok(count as f64 / area)
    } else {
        Err(UndefinedRatio::ZeroArea)
    }
}

#[inline]
fn in_any(polys: &[Polygon], p: Point) -> bool {
    polys.iter().any(|s| s.contains(p))
}

/// Area of `domain ∩ ⋃ bands`, estimated from seeded bbox draws.
fn union_area(domain: &Polygon, bands: &[Polygon], cfg: &DensityCfg) -> Result<f64, CorrError> {
    let sampler = DomainSampler::new(domain, 1)?;
    let chunks = cfg.area_samples.div_ceil(AREA_CHUNK);
    let (in_domain, in_band) = (0..chunks)
        .into_par_iter()
        .map(|c| {
            let n = AREA_CHUNK.min(cfg.area_samples - c * AREA_CHUNK);
            let mut rng = ReplayToken::new(cfg.seed, c as u64).rng();
            let mut hits = (0usize, 0usize);
            for _ in 0..n {
                let p = sampler.draw_in_bbox(&mut rng);
                if domain.contains(p) {
                    hits.0 += 1;
                    if in_any(bands, p) {
                        hits.1 += 1;
                    }
                }
            }
            hits
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
    if in_domain == 0 {
        return Err(CorrError::config(
            "no area sample landed inside the domain; raise area_samples",
        ));
    }
    Ok(domain.area() * in_band as f64 / in_domain as f64)
}

/// Counts, areas and densities for the three regions of one domain.
///
/// Points outside the domain are ignored. A point is "in range" when it lies
/// in some expanded sector but in no sector.
pub fn region_densities(
    domain: &Polygon,
    points: &[Point],
    sectors: &[Polygon],
    cfg: &DensityCfg,
) -> Result<RegionDensities, CorrError> {
    cfg.validate()?;
    let bands = sectors
        .iter()
        .map(|s| s.expanded_radially(cfg.range))
        .collect::<Result<Vec<_>, _>>()?;
    let inside = points_inside(points, domain);

    let mut counts = RegionCounts::default();
    for &p in &inside {
        counts.sectors += sectors.iter().filter(|s| s.contains(p)).count();
        if !in_any(&bands, p) {
            counts.out_of_range += 1;
        } else if !in_any(sectors, p) {
            counts.in_range += 1;
        }
    }

    let domain_area = domain.area();
    let sector_area: f64 = sectors.iter().map(Polygon::area).sum();
    let band_area = if sectors.is_empty() {
        0.0
    } else {
        union_area(domain, &bands, cfg)?
    };
    let areas = RegionAreas {
        sectors: sector_area,
        in_range: (band_area - sector_area).max(0.0),
        out_of_range: (domain_area - band_area).max(0.0),
        domain: domain_area,
    };
    debug!(?counts, band_area, "region densities");
    Ok(RegionDensities {
        counts,
        areas,
        sectors: density(counts.sectors, areas.sectors),
        in_range: density(counts.in_range, areas.in_range),
        out_of_range: density(counts.out_of_range, areas.out_of_range),
    })
}
