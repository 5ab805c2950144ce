//! File boundary of the CLI: coordinate tables in, JSON and tables out.
//!
//! Coordinate files are CSV with a header row. Columns named `x` and `y` are
//! used when present; otherwise the first two columns are taken as x and y.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use sectorcorr::geom::{Point, Polygon};
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn coord_column(df: &DataFrame, name: &str, idx: usize) -> Result<Vec<f64>> {
    let series = match df.column(name) {
        Ok(s) => s.clone(),
        Err(_) => df
            .select_at_idx(idx)
            .cloned()
            .with_context(|| format!("no '{name}' column and fewer than {} columns", idx + 1))?,
    };
    let series = series.cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("missing {name} value in data row {}", row + 1)))
        .collect()
}

/// Read all x/y rows of a CSV file.
pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    let xs = coord_column(&df, "x", 0)?;
    let ys = coord_column(&df, "y", 1)?;
    let pts: Vec<Point> = xs.into_iter().zip(ys).map(|(x, y)| Point::new(x, y)).collect();
    tracing::debug!(path = %path.display(), rows = pts.len(), "read coordinates");
    Ok(pts)
}

/// Read an outline and order its vertices by angle around their mean, so
/// traced outlines saved in arbitrary order still form a simple ring.
pub fn read_outline(path: &Path) -> Result<Polygon> {
    let pts = read_points(path)?;
    if pts.len() < 3 {
        bail!("{}: an outline needs at least 3 vertices, got {}", path.display(), pts.len());
    }
    let poly = Polygon::new(pts).with_context(|| format!("outline {}", path.display()))?;
    Ok(poly.sorted_by_angle())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Write a frame as Parquet when the extension says so, CSV otherwise.
pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(file).finish(df)?;
        }
        _ => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_named_columns_in_any_order() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("pts.csv");
        fs::write(&p, "id,y,x\n1,2.5,1\n2,4,3.5\n").unwrap();
        let pts = read_points(&p).unwrap();
        assert_eq!(pts, vec![Point::new(1.0, 2.5), Point::new(3.5, 4.0)]);
    }

    #[test]
    fn falls_back_to_first_two_columns() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("pts.csv");
        fs::write(&p, "X Coordinate,Y Coordinate\n10,20\n30,40\n").unwrap();
        let pts = read_points(&p).unwrap();
        assert_eq!(pts, vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
    }

    #[test]
    fn outline_is_angle_sorted() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("outline.csv");
        // Square vertices in bow-tie order.
        fs::write(&p, "x,y\n0,0\n1,1\n1,0\n0,1\n").unwrap();
        let poly = read_outline(&p).unwrap();
        assert!((poly.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_outline_is_rejected() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("outline.csv");
        fs::write(&p, "x,y\n0,0\n1,1\n").unwrap();
        assert!(read_outline(&p).is_err());
    }

    #[test]
    fn csv_table_round_trip() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("nested/table.csv");
        let mut df = df!("x" => [1.0, 2.0], "y" => [3.0, 4.0]).unwrap();
        write_table(&p, &mut df).unwrap();
        assert_eq!(read_points(&p).unwrap(), vec![Point::new(1.0, 3.0), Point::new(2.0, 4.0)]);
    }
}
