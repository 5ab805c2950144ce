use super::*;
use nalgebra::vector;

fn center() -> Point {
    vector![1250.0, 1250.0]
}

#[test]
fn circumference_is_evenly_spaced_on_circle() {
    let pts = circumference(center(), 150.0, 100).unwrap();
    assert_eq!(pts.len(), 100);
    for p in &pts {
        assert!(((p - center()).norm() - 150.0).abs() < 1e-9);
    }
    let gap = (pts[1] - pts[0]).norm();
    let closing = (pts[0] - pts[99]).norm();
    assert!((gap - closing).abs() < 1e-9);
}

#[test]
fn circumference_rejects_bad_params() {
    assert!(circumference(center(), 150.0, 0).is_err());
    assert!(circumference(center(), 0.0, 10).is_err());
    assert!(circumference(center(), f64::NAN, 10).is_err());
}

#[test]
fn concentric_rings_cover_each_radius() {
    let pts = concentric_rings(center(), 250.0, 200.0, 5, 100).unwrap();
    assert_eq!(pts.len(), 500);
    for (i, ring) in pts.chunks(100).enumerate() {
        let want = 250.0 + 200.0 * i as f64;
        for p in ring {
            assert!(((p - center()).norm() - want).abs() < 1e-9);
        }
    }
}

#[test]
fn radial_models_stay_in_annulus() {
    let cfg = RadialCfg::new(center(), 150.0, 1050.0);
    let tok = ReplayToken::new(7, 0);
    for pts in [
        uniform_radial(&cfg, 2000, tok).unwrap(),
        triangular_radial(&cfg, 2000, tok).unwrap(),
    ] {
        assert_eq!(pts.len(), 2000);
        for p in &pts {
            let r = (p - center()).norm();
            assert!(r >= 150.0 - 1e-9 && r <= 1200.0 + 1e-9);
        }
    }
}

#[test]
fn triangular_mass_sits_near_inner_edge() {
    let cfg = RadialCfg::new(center(), 150.0, 1050.0);
    let tok = ReplayToken::new(11, 3);
    let mean_offset = |pts: &[Point]| {
        pts.iter().map(|p| (p - center()).norm() - 150.0).sum::<f64>() / pts.len() as f64
    };
    let tri = mean_offset(&triangular_radial(&cfg, 20_000, tok).unwrap());
    let uni = mean_offset(&uniform_radial(&cfg, 20_000, tok).unwrap());
    // Means are b/3 = 350 and b/2 = 525.
    assert!((tri - 350.0).abs() < 15.0, "triangular mean {tri}");
    assert!((uni - 525.0).abs() < 15.0, "uniform mean {uni}");
}

#[test]
fn radial_cfg_validation() {
    assert!(RadialCfg::new(center(), 150.0, 0.0).validate().is_err());
    assert!(RadialCfg::new(center(), -1.0, 10.0).validate().is_err());
    assert!(uniform_radial(&RadialCfg::new(center(), 1.0, 0.0), 3, ReplayToken::new(0, 0)).is_err());
}

#[test]
fn replay_tokens_reproduce_and_separate() {
    let cfg = RadialCfg::new(center(), 150.0, 1050.0);
    let a = uniform_radial(&cfg, 50, ReplayToken::new(42, 7)).unwrap();
    let b = uniform_radial(&cfg, 50, ReplayToken::new(42, 7)).unwrap();
    let c = uniform_radial(&cfg, 50, ReplayToken::new(42, 8)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    let sub = ReplayToken::new(42, 7).substream(1);
    assert_ne!(sub.seed, 42);
    assert_eq!(sub.index, 7);
}

#[test]
fn domain_sampler_keeps_points_inside() {
    let tri = Polygon::from_xy(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)]).unwrap();
    let s = DomainSampler::new(&tri, 3).unwrap();
    let pts = s.sample(300, ReplayToken::new(5, 0)).unwrap();
    assert_eq!(pts.len(), 300);
    assert!(pts.iter().all(|p| tri.contains(*p)));
}

#[test]
fn domain_sampler_reports_shortfall() {
    // A thin sliver covers ~1% of its bounding box; 3x oversampling cannot fill it.
    let sliver =
        Polygon::from_xy(&[(0.0, 0.0), (100.0, 99.0), (100.0, 100.0), (0.0, 1.0)]).unwrap();
    let s = DomainSampler::new(&sliver, 3).unwrap();
    let err = s.sample(500, ReplayToken::new(1, 0)).unwrap_err();
    match err {
        CorrError::SamplingInsufficiency {
            requested,
            obtained,
        } => {
            assert_eq!(requested, 500);
            assert!(obtained < 500);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn domain_sampler_rejects_zero_area_box() {
    let line = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
    assert!(DomainSampler::new(&line, 3).is_err());
    let sq = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
    assert!(DomainSampler::new(&sq, 0).is_err());
}

#[test]
fn domain_sampler_rejects_collinear_domain_with_wide_box() {
    // Diagonal ring: the bbox is a unit-ish square but the polygon has no area.
    let flat = Polygon::from_xy(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap();
    assert!(!flat.bbox().is_degenerate());
    assert!(matches!(
        DomainSampler::new(&flat, 3),
        Err(CorrError::Configuration { .. })
    ));
    assert!(matches!(
        NullModel::Domain.sampler(&flat, 3),
        Err(CorrError::Configuration { .. })
    ));
}

#[test]
fn null_model_builds_matching_sampler() {
    let sq = Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap();
    let s = NullModel::Domain.sampler(&sq, 3).unwrap();
    let pts = s.sample(20, ReplayToken::new(0, 0)).unwrap();
    assert!(pts.iter().all(|p| sq.contains(*p)));

    let cfg = RadialCfg::new(vector![0.0, 0.0], 1.0, 2.0);
    let r = NullModel::UniformRadial(cfg).sampler(&sq, 3).unwrap();
    let pts = r.sample(20, ReplayToken::new(0, 0)).unwrap();
    assert!(pts.iter().all(|p| p.norm() <= 3.0 + 1e-12));
}
