//! Point samplers: null models and synthetic alternatives.
//!
//! Purpose
//! - Produce point sets under the generative models the analysis compares
//!   against: uniform inside an irregular domain (the null model for tissue
//!   outlines), radially uniform (null model in radial form), radially
//!   triangular (attraction alternative), plus deterministic outlines
//!   (circumference, concentric rings) used for sectors and inhibition demos.
//!
//! Model
//! - Every stochastic draw takes a `ReplayToken { seed, index }`. The token is
//!   mixed into a fresh `StdRng`, so calls never share state: trial `t` of a run
//!   is reproducible on its own and trials can run on any thread in any order.
//! - Samplers fail fast on invalid parameters and never retry. Domain sampling
//!   that cannot fill the requested count reports the shortfall.

mod domain;
mod radial;

pub use domain::DomainSampler;
pub use radial::{
    circumference, concentric_rings, triangular_radial, uniform_radial, RadialCfg, RadialProfile,
    RadialSampler,
};

use crate::error::CorrError;
use crate::geom::{Point, Polygon};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// Derive an independent stream for sub-unit `sub` (e.g. one sector of a
    /// multi-sector run) without colliding with this token's trial indices.
    pub fn substream(self, sub: u64) -> Self {
        Self {
            seed: mix(self.seed ^ mix(sub.wrapping_add(0x632b_e59b_d9b4_e019))),
            index: self.index,
        }
    }

    #[inline]
    pub fn rng(self) -> StdRng {
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e37_79b9_7f4a_7c15)));
        StdRng::seed_from_u64(k)
    }
}

// SplitMix64 finalizer.
#[inline]
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// A reproducible source of point sets.
pub trait PointSampler: Sync {
    /// Draw exactly `count` points for replay token `tok`.
    fn sample(&self, count: usize, tok: ReplayToken) -> Result<Vec<Point>, CorrError>;
}

/// Which generative model produces the null-model trials.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NullModel {
    /// Uniform inside the analysis domain (oversample and filter).
    #[default]
    Domain,
    /// Radially uniform around a center; ignores the domain outline.
    UniformRadial(RadialCfg),
    /// Radially triangular around a center; ignores the domain outline.
    TriangularRadial(RadialCfg),
}

impl NullModel {
    /// Build the sampler for this model over `domain`.
    pub fn sampler<'a>(
        &self,
        domain: &'a Polygon,
        oversample: usize,
    ) -> Result<Box<dyn PointSampler + 'a>, CorrError> {
        Ok(match self {
            Self::Domain => Box::new(DomainSampler::new(domain, oversample)?),
            Self::UniformRadial(cfg) => {
                Box::new(RadialSampler::new(*cfg, RadialProfile::Uniform)?)
            }
            Self::TriangularRadial(cfg) => {
                Box::new(RadialSampler::new(*cfg, RadialProfile::Triangular)?)
            }
        })
    }
}

#[cfg(test)]
mod tests;
