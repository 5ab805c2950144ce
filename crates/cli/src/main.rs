use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sectorcorr::analysis::{
    analyze_cotyledon, analyze_sector, pool, region_densities, AnalysisCfg, AreaFilter,
    DensityCfg, SectorUnit,
};
use sectorcorr::cfg::{DEFAULT_AREA_SAMPLES, DEFAULT_OVERSAMPLE, DEFAULT_TRIALS};
use sectorcorr::estimate::{Analytic, Bootstrap, IntervalEstimator};
use sectorcorr::geom::{Point, Polygon};
use sectorcorr::histogram::{BinEdges, BinSpec};
use sectorcorr::sampler::{
    circumference, concentric_rings, triangular_radial, uniform_radial, NullModel, RadialCfg,
    ReplayToken,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;
mod summary;

use provenance::{write_sidecar, Payload};
use summary::{Curve, DensityReport, SectorReport};

#[derive(Parser)]
#[command(name = "sectorcorr")]
#[command(about = "Sector/point spatial correlation runner")]
struct Cmd {
    /// Optional run tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Correlate markers with the sectors of one domain and write a JSON curve
    Run {
        /// Domain outline (CSV with x,y)
        #[arg(long)]
        domain: PathBuf,
        /// Marker positions (CSV with x,y)
        #[arg(long)]
        points: PathBuf,
        /// Sector outline; repeat for several sectors
        #[arg(long = "sector", required = true)]
        sectors: Vec<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        /// Also write the pooled curve as a CSV or Parquet table
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_TRIALS)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// lin:MIN:MAX:COUNT, log:MIN:MAX:COUNT, step:START:STOP:STEP or a comma list
        #[arg(long, default_value = "log:15:2500:15")]
        bins: BinSpec,
        /// Edge prepended to the grid (0 gives a first bin down to the boundary)
        #[arg(long)]
        leading_edge: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_OVERSAMPLE)]
        oversample: usize,
        #[arg(long, default_value_t = 0.0)]
        min_area: f64,
        #[arg(long, default_value_t = f64::INFINITY)]
        max_area: f64,
        /// Use a percentile bootstrap with this many resamples instead of the
        /// analytic band
        #[arg(long)]
        bootstrap: Option<usize>,
    },
    /// Marker densities in sectors, in a band around them, and elsewhere
    Density {
        #[arg(long)]
        domain: PathBuf,
        #[arg(long)]
        points: PathBuf,
        #[arg(long = "sector", required = true)]
        sectors: Vec<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        /// Radial expansion of each sector outline
        #[arg(long, default_value_t = 100.0)]
        range: f64,
        #[arg(long, default_value_t = DEFAULT_AREA_SAMPLES)]
        area_samples: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Synthetic circular scenario against a radially uniform null model
    Demo {
        #[arg(long, value_enum)]
        model: DemoModel,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 250)]
        trials: usize,
        #[arg(long, default_value_t = 500)]
        points: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
enum DemoModel {
    /// Markers crowd the sector (triangular radial profile)
    Clustered,
    /// Markers ignore the sector (uniform radial profile)
    Zero,
    /// Markers sit on evenly spaced rings (comb pattern)
    Inhibition,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let tag = cmd.tag;
    match cmd.action {
        Action::Run {
            domain,
            points,
            sectors,
            out,
            table,
            trials,
            seed,
            bins,
            leading_edge,
            oversample,
            min_area,
            max_area,
            bootstrap,
        } => {
            let mut edges = bins.build()?;
            if let Some(edge) = leading_edge {
                edges = edges.with_leading_edge(edge)?;
            }
            let cfg = AnalysisCfg {
                edges,
                trials,
                seed,
                oversample,
                null_model: NullModel::Domain,
            };
            let inputs = Inputs {
                domain,
                points,
                sectors,
            };
            let filter = AreaFilter {
                min: min_area,
                max: max_area,
            };
            run(&inputs, &cfg, filter, bootstrap, &out, table.as_deref(), tag)
        }
        Action::Density {
            domain,
            points,
            sectors,
            out,
            range,
            area_samples,
            seed,
        } => {
            let inputs = Inputs {
                domain,
                points,
                sectors,
            };
            let cfg = DensityCfg {
                range,
                area_samples,
                seed,
            };
            density(&inputs, &cfg, &out, tag)
        }
        Action::Demo {
            model,
            out,
            trials,
            points,
            seed,
        } => demo(model, trials, points, seed, &out, tag),
        Action::Report => report(tag),
    }
}

struct Inputs {
    domain: PathBuf,
    points: PathBuf,
    sectors: Vec<PathBuf>,
}

impl Inputs {
    fn paths(&self) -> impl Iterator<Item = &Path> {
        [self.domain.as_path(), self.points.as_path()]
            .into_iter()
            .chain(self.sectors.iter().map(PathBuf::as_path))
    }

    fn load(&self) -> Result<(Polygon, Vec<Point>, Vec<Polygon>)> {
        let domain = io::read_outline(&self.domain)?;
        let points = io::read_points(&self.points)?;
        let sectors = self
            .sectors
            .iter()
            .map(|p| io::read_outline(p))
            .collect::<Result<Vec<_>>>()?;
        Ok((domain, points, sectors))
    }
}

fn interval_estimator(bootstrap: Option<usize>, seed: u64) -> Box<dyn IntervalEstimator> {
    match bootstrap {
        Some(resamples) => Box::new(Bootstrap::new(resamples, seed)),
        None => Box::new(Analytic::default()),
    }
}

fn run(
    inputs: &Inputs,
    cfg: &AnalysisCfg,
    filter: AreaFilter,
    bootstrap: Option<usize>,
    out: &Path,
    table: Option<&Path>,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(out = %out.display(), trials = cfg.trials, sectors = inputs.sectors.len(), tag = ?tag, "run");
    filter.validate()?;
    let (domain, points, sectors) = inputs.load()?;

    let kept = filter.select(&sectors);
    let skipped: Vec<String> = (0..sectors.len())
        .filter(|i| !kept.contains(i))
        .map(|i| inputs.sectors[i].to_string_lossy().into_owned())
        .collect();
    if !skipped.is_empty() {
        tracing::info!(skipped = skipped.len(), "sectors outside the area window");
    }
    if kept.is_empty() {
        bail!("no sector passed the area filter");
    }
    let kept_polys: Vec<Polygon> = kept.iter().map(|&i| sectors[i].clone()).collect();

    let analyses = analyze_cotyledon(&domain, &points, &kept_polys, cfg)?;
    let estimator = interval_estimator(bootstrap, cfg.seed);
    let sector_reports = kept
        .iter()
        .zip(&analyses)
        .map(|(&i, a)| -> Result<SectorReport> {
            let res = a.estimate(estimator.as_ref())?;
            Ok(SectorReport {
                index: i,
                source: inputs.sectors[i].to_string_lossy().into_owned(),
                area: sectors[i].area(),
                centroid: sectors[i].centroid().map(|c| [c.x, c.y]),
                curve: Curve::new(&cfg.edges, a, &res),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let pooled = pool(&analyses)?;
    let pooled_curve = Curve::new(&cfg.edges, &pooled, &pooled.estimate(estimator.as_ref())?);
    if !pooled_curve.undefined.is_empty() {
        tracing::warn!(bins = pooled_curve.undefined.len(), "pooled curve has undefined bins");
    }

    let interval = if bootstrap.is_some() {
        "bootstrap"
    } else {
        "analytic"
    };
    let doc = json!({
        "config": cfg,
        "interval": interval,
        "pooled": pooled_curve,
        "sectors": sector_reports,
        "skipped": skipped,
    });
    io::write_json(out, &doc)?;
    let params = json!({
        "config": cfg,
        "area_filter": filter,
        "bootstrap": bootstrap,
    });
    write_sidecar(
        out,
        Payload::new(params.clone())
            .with_inputs(inputs.paths())
            .with_tag(tag.clone()),
    )?;
    if let Some(table) = table {
        let mut df = pooled_curve.frame()?;
        io::write_table(table, &mut df)?;
        write_sidecar(
            table,
            Payload::new(params)
                .with_inputs(inputs.paths())
                .with_tag(tag),
        )?;
    }
    tracing::info!(out = %out.display(), "done");
    Ok(())
}

fn density(inputs: &Inputs, cfg: &DensityCfg, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(out = %out.display(), range = cfg.range, tag = ?tag, "density");
    let (domain, points, sectors) = inputs.load()?;
    let d = region_densities(&domain, &points, &sectors, cfg)?;
    io::write_json(out, &DensityReport::new(cfg.range, &d))?;
    write_sidecar(
        out,
        Payload::new(json!({ "density": cfg }))
            .with_inputs(inputs.paths())
            .with_tag(tag),
    )?;
    Ok(())
}

const DEMO_CENTER: (f64, f64) = (1250.0, 1250.0);
const DEMO_SECTOR_RADIUS: f64 = 150.0;
const DEMO_SPREAD: f64 = 1050.0;

fn demo_points(model: DemoModel, radial: &RadialCfg, n: usize, seed: u64) -> Result<Vec<Point>> {
    let tok = ReplayToken::new(seed, u64::MAX);
    Ok(match model {
        DemoModel::Clustered => triangular_radial(radial, n, tok)?,
        DemoModel::Zero => uniform_radial(radial, n, tok)?,
        DemoModel::Inhibition => {
            let rings = 5;
            concentric_rings(radial.center, 250.0, 200.0, rings, (n / rings).max(1))?
        }
    })
}

fn demo(
    model: DemoModel,
    trials: usize,
    n: usize,
    seed: u64,
    out: &Path,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(?model, trials, points = n, "demo");
    let center = Point::new(DEMO_CENTER.0, DEMO_CENTER.1);
    let radial = RadialCfg::new(center, DEMO_SECTOR_RADIUS, DEMO_SPREAD);
    let domain = Polygon::from_xy(&[(0.0, 0.0), (2500.0, 0.0), (2500.0, 2500.0), (0.0, 2500.0)])?;
    let sector = Polygon::new(circumference(center, DEMO_SECTOR_RADIUS, 100)?)?;
    let observed = demo_points(model, &radial, n, seed).context("generating demo markers")?;

    let cfg = AnalysisCfg {
        edges: BinEdges::stepped(-49.0, 1052.0, 100.0)?,
        trials,
        seed,
        oversample: DEFAULT_OVERSAMPLE,
        null_model: NullModel::UniformRadial(radial),
    };
    let analysis = analyze_sector(&domain, &SectorUnit { sector, observed }, &cfg)?;
    let res = analysis.estimate(&Analytic::default())?;
    let curve = Curve::new(&cfg.edges, &analysis, &res);
    io::write_json(out, &json!({ "model": model, "config": cfg, "curve": curve }))?;
    write_sidecar(
        out,
        Payload::new(json!({ "model": model, "config": cfg })).with_tag(tag),
    )?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let mut obj = provenance::header(tag.as_deref());
    obj["params"] = json!({});
    obj["outputs"] = json!([]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
