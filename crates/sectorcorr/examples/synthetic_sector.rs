//! Timing probe for the synthetic circular scenario.
//!
//! Purpose
//! - Give a reproducible data point for "how long do 1000 trials take for one
//!   sector with ~1000 markers?" and print the resulting score curve.
//!
//! Setup
//! - Sector: 100-gon of radius 150 at (1250, 1250).
//! - Observed: triangular-radial markers (attraction) beyond the sector.
//! - Null: uniform-radial over the same annulus; bins every 100 from -49.

use std::time::Instant;

use nalgebra::Vector2;
use sectorcorr::analysis::{analyze_sector, AnalysisCfg, SectorUnit};
use sectorcorr::estimate::Analytic;
use sectorcorr::geom::Polygon;
use sectorcorr::histogram::BinEdges;
use sectorcorr::sampler::{circumference, triangular_radial, NullModel, RadialCfg, ReplayToken};

fn main() {
    let c = Vector2::new(1250.0, 1250.0);
    let radial = RadialCfg::new(c, 150.0, 1050.0);
    let domain =
        Polygon::from_xy(&[(0.0, 0.0), (2500.0, 0.0), (2500.0, 2500.0), (0.0, 2500.0)])
            .expect("square domain");
    let sector = Polygon::new(circumference(c, 150.0, 100).expect("ring")).expect("sector");
    let observed = triangular_radial(&radial, 1000, ReplayToken::new(1, 0)).expect("markers");

    let mut cfg = AnalysisCfg::new(BinEdges::stepped(-49.0, 1052.0, 100.0).expect("bins"));
    cfg.null_model = NullModel::UniformRadial(radial);

    let start = Instant::now();
    let run = analyze_sector(&domain, &SectorUnit { sector, observed }, &cfg).expect("analysis");
    let elapsed = start.elapsed().as_secs_f64() * 1e3;
    let res = run.estimate(&Analytic::default()).expect("estimate");

    println!("trials={} markers={}", cfg.trials, run.observed.total());
    for ((x, s), (lo, hi)) in cfg
        .edges
        .upper_edges()
        .iter()
        .zip(res.scores())
        .zip(res.lower().into_iter().zip(res.upper()))
    {
        match (s, lo, hi) {
            (Some(s), Some(lo), Some(hi)) => println!("d<={x:7.1} score={s:+.3} [{lo:+.3}, {hi:+.3}]"),
            _ => println!("d<={x:7.1} undefined"),
        }
    }
    println!("analysis_time_ms={elapsed:.3}");
}
