//! Distance binning: bin edges, histograms and the per-trial matrix.
//!
//! Conventions
//! - Bins are `[e_i, e_{i+1})`; the last bin is closed on both ends.
//! - Values below the first edge, above the last edge, or NaN are dropped,
//!   never clipped into the extreme bins. Observed and null histograms must be
//!   built from the same `BinEdges` for the ratio to mean anything.

use crate::cfg::MAX_BIN_EDGES;
use crate::error::CorrError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Strictly increasing, finite bin boundaries (at least two).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BinEdges(Vec<f64>);

impl TryFrom<Vec<f64>> for BinEdges {
    type Error = CorrError;
    fn try_from(edges: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(edges)
    }
}

impl From<BinEdges> for Vec<f64> {
    fn from(edges: BinEdges) -> Self {
        edges.0
    }
}

impl BinEdges {
    pub fn new(edges: Vec<f64>) -> Result<Self, CorrError> {
        if edges.len() < 2 {
            return Err(CorrError::config(format!(
                "need at least 2 bin edges, got {}",
                edges.len()
            )));
        }
        check_edge_count(edges.len())?;
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(CorrError::config("bin edges must be finite"));
        }
        if let Some(w) = edges.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CorrError::config(format!(
                "bin edges must be strictly increasing (edge {} = {} >= edge {} = {})",
                w,
                edges[w],
                w + 1,
                edges[w + 1]
            )));
        }
        Ok(Self(edges))
    }

    /// `count` edges evenly spaced on `[min, max]`.
    pub fn linear(min: f64, max: f64, count: usize) -> Result<Self, CorrError> {
        check_range(min, max, count)?;
        let step = (max - min) / (count - 1) as f64;
        let mut edges: Vec<f64> = (0..count).map(|i| min + step * i as f64).collect();
        edges[count - 1] = max;
        Self::new(edges)
    }

    /// `count` edges geometrically spaced on `[min, max]`, `min > 0`.
    pub fn logarithmic(min: f64, max: f64, count: usize) -> Result<Self, CorrError> {
        check_range(min, max, count)?;
        if min <= 0.0 {
            return Err(CorrError::config("logarithmic bins need min > 0"));
        }
        let (lo, hi) = (min.ln(), max.ln());
        let step = (hi - lo) / (count - 1) as f64;
        let mut edges: Vec<f64> = (0..count).map(|i| (lo + step * i as f64).exp()).collect();
        edges[0] = min;
        edges[count - 1] = max;
        Self::new(edges)
    }

    /// `start, start + step, ...` strictly below `stop` (half-open like a range).
    pub fn stepped(start: f64, stop: f64, step: f64) -> Result<Self, CorrError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
            return Err(CorrError::config("stepped bins need finite bounds and step > 0"));
        }
        let n = ((stop - start) / step).ceil();
        if !(n >= 2.0) {
            return Err(CorrError::config("stepped bins produce fewer than 2 edges"));
        }
        if n > MAX_BIN_EDGES as f64 {
            return Err(CorrError::config(format!(
                "stepped bins produce {n:e} edges, at most {MAX_BIN_EDGES} allowed"
            )));
        }
        Self::new((0..n as usize).map(|i| start + step * i as f64).collect())
    }

    /// Prepend an edge below the current first edge (e.g. 0 before a log grid).
    pub fn with_leading_edge(self, edge: f64) -> Result<Self, CorrError> {
        let mut edges = Vec::with_capacity(self.0.len() + 1);
        edges.push(edge);
        edges.extend(self.0);
        Self::new(edges)
    }

    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.0.len() - 1
    }

    #[inline]
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Right edge of each bin; the x-coordinate used when reporting per-bin curves.
    pub fn upper_edges(&self) -> &[f64] {
        &self.0[1..]
    }

    pub fn centers(&self) -> Vec<f64> {
        self.0.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Bin index for `d`, or `None` if it falls outside `[first, last]`.
    #[inline]
    pub fn locate(&self, d: f64) -> Option<usize> {
        if !(d >= self.first() && d <= self.last()) {
            return None;
        }
        let upper = self.0.partition_point(|&e| e <= d);
        Some((upper - 1).min(self.bin_count() - 1))
    }

    /// Count `distances` per bin.
    pub fn bin(&self, distances: &[f64]) -> Histogram {
        let mut counts = vec![0u64; self.bin_count()];
        for &d in distances {
            if let Some(b) = self.locate(d) {
                counts[b] += 1;
            }
        }
        Histogram { counts }
    }
}

fn check_edge_count(count: usize) -> Result<(), CorrError> {
    if count > MAX_BIN_EDGES {
        return Err(CorrError::config(format!(
            "{count} bin edges requested, at most {MAX_BIN_EDGES} allowed"
        )));
    }
    Ok(())
}

fn check_range(min: f64, max: f64, count: usize) -> Result<(), CorrError> {
    if count < 2 {
        return Err(CorrError::config("need at least 2 bin edges"));
    }
    check_edge_count(count)?;
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return Err(CorrError::config("bin range needs finite min < max"));
    }
    Ok(())
}

/// Declarative bin layout, as given on a command line or in a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BinSpec {
    Explicit { edges: Vec<f64> },
    Linear { min: f64, max: f64, count: usize },
    Log { min: f64, max: f64, count: usize },
    Step { start: f64, stop: f64, step: f64 },
}

impl BinSpec {
    pub fn build(&self) -> Result<BinEdges, CorrError> {
        match self {
            Self::Explicit { edges } => BinEdges::new(edges.clone()),
            Self::Linear { min, max, count } => BinEdges::linear(*min, *max, *count),
            Self::Log { min, max, count } => BinEdges::logarithmic(*min, *max, *count),
            Self::Step { start, stop, step } => BinEdges::stepped(*start, *stop, *step),
        }
    }
}

/// Parses `lin:MIN:MAX:COUNT`, `log:MIN:MAX:COUNT`, `step:START:STOP:STEP`
/// or a comma-separated edge list.
impl FromStr for BinSpec {
    type Err = CorrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = |t: &str| {
            t.trim()
                .parse::<f64>()
                .map_err(|_| CorrError::config(format!("bad number '{t}' in bin spec '{s}'")))
        };
        let int = |t: &str| {
            t.trim()
                .parse::<usize>()
                .map_err(|_| CorrError::config(format!("bad count '{t}' in bin spec '{s}'")))
        };
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["lin", a, b, n] => Ok(Self::Linear {
                min: num(a)?,
                max: num(b)?,
                count: int(n)?,
            }),
            ["log", a, b, n] => Ok(Self::Log {
                min: num(a)?,
                max: num(b)?,
                count: int(n)?,
            }),
            ["step", a, b, st] => Ok(Self::Step {
                start: num(a)?,
                stop: num(b)?,
                step: num(st)?,
            }),
            [list] => Ok(Self::Explicit {
                edges: list.split(',').map(num).collect::<Result<_, _>>()?,
            }),
            _ => Err(CorrError::config(format!("unrecognized bin spec '{s}'"))),
        }
    }
}

/// Per-bin counts aligned with a `BinEdges`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bin-wise sum with another histogram of the same width.
    pub fn add(&mut self, other: &Histogram) -> Result<(), CorrError> {
        if other.len() != self.len() {
            return Err(CorrError::config(format!(
                "histogram width mismatch: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += *b;
        }
        Ok(())
    }
}

/// One histogram per null-model trial, all of the same width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Histogram>", into = "Vec<Histogram>")]
pub struct TrialMatrix {
    rows: Vec<Histogram>,
}

impl TryFrom<Vec<Histogram>> for TrialMatrix {
    type Error = CorrError;
    fn try_from(rows: Vec<Histogram>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<TrialMatrix> for Vec<Histogram> {
    fn from(m: TrialMatrix) -> Self {
        m.rows
    }
}

impl TrialMatrix {
    pub fn new(rows: Vec<Histogram>) -> Result<Self, CorrError> {
        let Some(first) = rows.first() else {
            return Err(CorrError::config("trial matrix needs at least one trial"));
        };
        let width = first.len();
        if width == 0 {
            return Err(CorrError::config("trial histograms have no bins"));
        }
        if let Some(t) = rows.iter().position(|r| r.len() != width) {
            return Err(CorrError::config(format!(
                "trial {t} has {} bins, expected {width}",
                rows[t].len()
            )));
        }
        Ok(Self { rows })
    }

    #[inline]
    pub fn trials(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    #[inline]
    pub fn rows(&self) -> &[Histogram] {
        &self.rows
    }

    /// Per-bin sum over trials.
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.width()];
        for row in &self.rows {
            for (s, c) in sums.iter_mut().zip(row.counts()) {
                *s += *c;
            }
        }
        sums
    }

    /// Sum over every bin of every trial.
    pub fn grand_total(&self) -> u64 {
        self.rows.iter().map(Histogram::total).sum()
    }

    /// Per-trial totals.
    pub fn row_totals(&self) -> Vec<u64> {
        self.rows.iter().map(Histogram::total).collect()
    }

    /// Trial-averaged (expected) histogram.
    pub fn column_means(&self) -> Vec<f64> {
        let n = self.trials() as f64;
        self.column_sums().into_iter().map(|s| s as f64 / n).collect()
    }

    /// Population standard deviation of each bin across trials.
    pub fn column_std(&self) -> Vec<f64> {
        let means = self.column_means();
        let n = self.trials() as f64;
        let mut acc = vec![0.0; self.width()];
        for row in &self.rows {
            for ((a, &c), m) in acc.iter_mut().zip(row.counts()).zip(&means) {
                let d = c as f64 - m;
                *a += d * d;
            }
        }
        acc.into_iter().map(|s| (s / n).sqrt()).collect()
    }

    /// Mean and population standard deviation of the per-trial totals.
    pub fn total_mean_std(&self) -> (f64, f64) {
        let totals = self.row_totals();
        let n = totals.len() as f64;
        let mean = totals.iter().map(|&t| t as f64).sum::<f64>() / n;
        let var = totals
            .iter()
            .map(|&t| {
                let d = t as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        (mean, var.sqrt())
    }

    /// New matrix made of the given rows (with repetition), for resampling.
    pub fn select(&self, indices: &[usize]) -> Result<Self, CorrError> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.rows
                    .get(i)
                    .cloned()
                    .ok_or_else(|| CorrError::config(format!("trial index {i} out of range")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    /// Trial-wise sum with another matrix of equal shape (pooling sectors).
    pub fn add_rowwise(&mut self, other: &TrialMatrix) -> Result<(), CorrError> {
        if other.trials() != self.trials() {
            return Err(CorrError::config(format!(
                "cannot pool {} trials with {} trials",
                self.trials(),
                other.trials()
            )));
        }
        for (a, b) in self.rows.iter_mut().zip(&other.rows) {
            a.add(b)?;
        }
        Ok(())
    }
}
