use super::{PointSampler, ReplayToken};
use crate::error::CorrError;
use crate::geom::Point;
use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Annulus parameters shared by the radial models.
///
/// Radii are `radius1 + offset` with `offset ∈ [0, radius2]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialCfg {
    pub center: Point,
    /// Inner radius where the distribution starts (usually the sector radius).
    pub radius1: f64,
    /// Radial extent of the distribution beyond `radius1`.
    pub radius2: f64,
}

impl RadialCfg {
    pub fn new(center: Point, radius1: f64, radius2: f64) -> Self {
        Self {
            center,
            radius1,
            radius2,
        }
    }

    pub fn validate(&self) -> Result<(), CorrError> {
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(CorrError::config("radial center must be finite"));
        }
        if !(self.radius1.is_finite() && self.radius1 >= 0.0) {
            return Err(CorrError::config("radius1 must be finite and >= 0"));
        }
        if !(self.radius2.is_finite() && self.radius2 > 0.0) {
            return Err(CorrError::config(
                "radius2 must be finite and > 0 (zero-width annulus)",
            ));
        }
        Ok(())
    }
}

/// Radial offset law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialProfile {
    /// Offset uniform on `[0, radius2]`: no correlation with the inner circle.
    Uniform,
    /// Triangular density peaking at 0 and vanishing at `radius2`: attraction.
    Triangular,
}

impl RadialProfile {
    #[inline]
    fn offset<R: Rng>(self, rng: &mut R, radius2: f64) -> f64 {
        let u: f64 = rng.gen();
        match self {
            Self::Uniform => u * radius2,
            // Inverse CDF of f(x) = 2(b - x)/b² on [0, b]; 1-u and u share a law.
            Self::Triangular => radius2 * (1.0 - u.sqrt()),
        }
    }
}

#[inline]
fn polar_point(center: Point, radius: f64, theta: f64) -> Point {
    center + Vector2::new(theta.cos(), theta.sin()) * radius
}

/// `n` points evenly spaced in angle on a circle; used to materialize a
/// circular sector outline. Deterministic.
pub fn circumference(center: Point, radius: f64, n: usize) -> Result<Vec<Point>, CorrError> {
    if n == 0 {
        return Err(CorrError::config("circumference needs at least one point"));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(CorrError::config("circle radius must be finite and > 0"));
    }
    let step = TAU / n as f64;
    Ok((0..n)
        .map(|k| polar_point(center, radius, step * k as f64))
        .collect())
}

/// Evenly spaced rings at `first_radius + i * spacing`, `per_ring` points each.
/// Points sit at fixed distances from a concentric sector, which makes a
/// comb-shaped (inhibition) distance pattern.
pub fn concentric_rings(
    center: Point,
    first_radius: f64,
    spacing: f64,
    rings: usize,
    per_ring: usize,
) -> Result<Vec<Point>, CorrError> {
    if !(spacing.is_finite() && spacing >= 0.0) {
        return Err(CorrError::config("ring spacing must be finite and >= 0"));
    }
    let mut out = Vec::with_capacity(rings * per_ring);
    for i in 0..rings {
        out.extend(circumference(
            center,
            first_radius + i as f64 * spacing,
            per_ring,
        )?);
    }
    Ok(out)
}

fn radial_draw(
    cfg: &RadialCfg,
    profile: RadialProfile,
    n: usize,
    tok: ReplayToken,
) -> Result<Vec<Point>, CorrError> {
    cfg.validate()?;
    let mut rng = tok.rng();
    Ok((0..n)
        .map(|_| {
            let theta = rng.gen::<f64>() * TAU;
            let r = cfg.radius1 + profile.offset(&mut rng, cfg.radius2);
            polar_point(cfg.center, r, theta)
        })
        .collect())
}

/// Attraction model: density decays linearly from `radius1` to `radius1 + radius2`.
pub fn triangular_radial(
    cfg: &RadialCfg,
    n: usize,
    tok: ReplayToken,
) -> Result<Vec<Point>, CorrError> {
    radial_draw(cfg, RadialProfile::Triangular, n, tok)
}

/// No-correlation control in radial form: offset uniform on `[0, radius2]`.
pub fn uniform_radial(
    cfg: &RadialCfg,
    n: usize,
    tok: ReplayToken,
) -> Result<Vec<Point>, CorrError> {
    radial_draw(cfg, RadialProfile::Uniform, n, tok)
}

/// `PointSampler` adapter over the radial models.
#[derive(Clone, Copy, Debug)]
pub struct RadialSampler {
    cfg: RadialCfg,
    profile: RadialProfile,
}

impl RadialSampler {
    pub fn new(cfg: RadialCfg, profile: RadialProfile) -> Result<Self, CorrError> {
        cfg.validate()?;
        Ok(Self { cfg, profile })
    }
}

impl PointSampler for RadialSampler {
    fn sample(&self, count: usize, tok: ReplayToken) -> Result<Vec<Point>, CorrError> {
        radial_draw(&self.cfg, self.profile, count, tok)
    }
}
