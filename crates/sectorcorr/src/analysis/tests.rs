use super::*;
use crate::estimate::Analytic;
use crate::sampler::{
    circumference, concentric_rings, triangular_radial, uniform_radial, RadialCfg,
};
use nalgebra::vector;

const C: (f64, f64) = (1250.0, 1250.0);

fn center() -> Point {
    vector![C.0, C.1]
}

fn field() -> Polygon {
    Polygon::from_xy(&[(0.0, 0.0), (2500.0, 0.0), (2500.0, 2500.0), (0.0, 2500.0)]).unwrap()
}

fn disc_sector() -> Polygon {
    Polygon::new(circumference(center(), 150.0, 100).unwrap()).unwrap()
}

fn radial() -> RadialCfg {
    RadialCfg::new(center(), 150.0, 1050.0)
}

fn circular_cfg() -> AnalysisCfg {
    let mut cfg = AnalysisCfg::new(BinEdges::stepped(-49.0, 1052.0, 100.0).unwrap());
    cfg.trials = 100;
    cfg.seed = 2024;
    cfg.null_model = NullModel::UniformRadial(radial());
    cfg
}

fn scores_of(points: Vec<Point>) -> Vec<Option<f64>> {
    let unit = SectorUnit {
        sector: disc_sector(),
        observed: points,
    };
    analyze_sector(&field(), &unit, &circular_cfg())
        .unwrap()
        .estimate(&Analytic::default())
        .unwrap()
        .scores()
}

#[test]
fn clustered_points_score_high_near_and_low_far() {
    let pts = triangular_radial(&radial(), 1000, ReplayToken::new(11, 0)).unwrap();
    let s = scores_of(pts);
    assert_eq!(s.len(), 11);
    assert!(s[0].unwrap() > 0.5, "{s:?}");
    assert!(s[10].unwrap() < -0.5, "{s:?}");
}

#[test]
fn uncorrelated_points_score_near_zero() {
    let pts = uniform_radial(&radial(), 1000, ReplayToken::new(12, 0)).unwrap();
    for (b, s) in scores_of(pts).into_iter().enumerate() {
        let s = s.unwrap();
        assert!(s.abs() < 0.5, "bin {b}: {s}");
    }
}

#[test]
fn ring_pattern_empties_the_gaps() {
    // Rings at 250, 450, ..., 1050 sit ~100, 300, ..., 900 from the sector.
    let pts = concentric_rings(center(), 250.0, 200.0, 5, 200).unwrap();
    let s = scores_of(pts);
    for gap in [2, 4, 6, 8] {
        assert_eq!(s[gap], Some(-1.0), "bin {gap}");
    }
    for ring in [1, 3, 5, 7, 9] {
        assert!(s[ring].unwrap() > 0.5, "bin {ring}");
    }
}

#[test]
fn single_sector_cotyledon_matches_sector_run() {
    let domain = field();
    let mut cfg = circular_cfg();
    cfg.null_model = NullModel::Domain;
    cfg.trials = 20;
    let pts = uniform_radial(&radial(), 300, ReplayToken::new(3, 0)).unwrap();
    let unit = SectorUnit {
        sector: disc_sector(),
        observed: pts.clone(),
    };
    let one = analyze_sector(&domain, &unit, &cfg).unwrap();
    let all = analyze_cotyledon(&domain, &pts, &[disc_sector()], &cfg).unwrap();
    assert_eq!(all, vec![one]);
}

#[test]
fn cotyledon_shares_null_sets_between_sectors() {
    let domain = field();
    let mut cfg = circular_cfg();
    cfg.null_model = NullModel::Domain;
    cfg.trials = 10;
    let pts = uniform_radial(&radial(), 200, ReplayToken::new(4, 0)).unwrap();
    // The same sector twice must see identical trials.
    let res = analyze_cotyledon(&domain, &pts, &[disc_sector(), disc_sector()], &cfg).unwrap();
    assert_eq!(res.len(), 2);
    assert_eq!(res[0], res[1]);
    assert_eq!(res[0].trials.trials(), 10);
    assert!(analyze_cotyledon(&domain, &pts, &[], &cfg).unwrap().is_empty());
}

#[test]
fn units_get_distinct_streams_and_replay() {
    let domain = field();
    let mut cfg = circular_cfg();
    cfg.null_model = NullModel::Domain;
    cfg.trials = 5;
    let pts = uniform_radial(&radial(), 100, ReplayToken::new(5, 0)).unwrap();
    let unit = SectorUnit {
        sector: disc_sector(),
        observed: pts,
    };
    let units = vec![unit.clone(), unit];
    let a = analyze_units(&domain, &units, &cfg).unwrap();
    let b = analyze_units(&domain, &units, &cfg).unwrap();
    assert_eq!(a, b);
    assert_eq!(a[0].observed, a[1].observed);
    assert_ne!(a[0].trials, a[1].trials);
}

#[test]
fn shortfall_aborts_the_run() {
    let sliver =
        Polygon::from_xy(&[(0.0, 0.0), (100.0, 99.0), (100.0, 100.0), (0.0, 1.0)]).unwrap();
    let mut cfg = AnalysisCfg::new(BinEdges::linear(0.0, 10.0, 3).unwrap());
    cfg.trials = 8;
    cfg.oversample = 1;
    let pts: Vec<Point> = (1..100).map(|i| vector![i as f64, i as f64 - 0.5]).collect();
    let unit = SectorUnit {
        sector: Polygon::from_xy(&[(40.0, 39.0), (60.0, 59.0), (60.0, 60.0)]).unwrap(),
        observed: pts,
    };
    let err = analyze_sector(&sliver, &unit, &cfg).unwrap_err();
    assert!(err.shortfall().is_some_and(|s| s > 0), "{err}");
}

#[test]
fn pooling_adds_counts() {
    let a = SectorAnalysis {
        observed: Histogram::from_counts(vec![1, 2]),
        trials: TrialMatrix::new(vec![
            Histogram::from_counts(vec![1, 1]),
            Histogram::from_counts(vec![0, 2]),
        ])
        .unwrap(),
    };
    let b = SectorAnalysis {
        observed: Histogram::from_counts(vec![3, 0]),
        trials: TrialMatrix::new(vec![
            Histogram::from_counts(vec![2, 0]),
            Histogram::from_counts(vec![1, 1]),
        ])
        .unwrap(),
    };
    let p = pool(&[a.clone(), b]).unwrap();
    assert_eq!(p.observed.counts(), &[4, 2]);
    assert_eq!(p.trials.rows()[0].counts(), &[3, 1]);
    assert_eq!(p.trials.rows()[1].counts(), &[1, 3]);
    assert_eq!(pool(&[a.clone()]).unwrap(), a);
    assert!(pool(&[]).is_err());
}

#[test]
fn area_filter_is_inclusive() {
    let small = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
    let big = Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap();
    let f = AreaFilter { min: 1.0, max: 50.0 };
    assert_eq!(f.select(&[small.clone(), big.clone()]), vec![0]);
    assert_eq!(AreaFilter::default().select(&[small, big]), vec![0, 1]);
    assert!(AreaFilter { min: 2.0, max: 1.0 }.validate().is_err());
}

#[test]
fn cfg_validation() {
    let edges = BinEdges::linear(0.0, 1.0, 2).unwrap();
    let mut cfg = AnalysisCfg::new(edges);
    assert!(cfg.validate().is_ok());
    cfg.trials = 0;
    assert!(cfg.validate().is_err());
    cfg.trials = 1;
    cfg.oversample = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn cfg_round_trips_through_json() {
    let cfg = circular_cfg();
    let text = serde_json::to_string(&cfg).unwrap();
    let back: AnalysisCfg = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
}
