/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Descriptive statistics, correlation matrices, and variance inflation
//! factors over the numeric columns of the master table.

use crate::master::{MasterRow, NUMERIC_COLUMNS};
use crate::prioritize::average_rank;
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufWriter, Error, Write};

#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub cv_pct: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Per-column descriptive statistics over the defined cells. Columns with
/// no defined cells are left out.
pub fn descriptive_stats(rows: &[MasterRow]) -> Vec<ColumnStats> {
    let mut out = vec![];
    for name in NUMERIC_COLUMNS {
        let values: Vec<f64> = rows.iter().filter_map(|r| r.column(name)).collect();
        if values.is_empty() {
            continue;
        }
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = median_of(&sorted);

        let std = if n > 1 {
            (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0))
                .sqrt()
        } else {
            0f64
        };
        let cv_pct = if mean != 0f64 {
            Some(std / mean * 100.0)
        } else {
            None
        };

        // population moments for shape statistics
        let pop_var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
        let pop_std = pop_var.sqrt();
        let (skewness, kurtosis) = if pop_std > 0f64 {
            let m3 = values
                .iter()
                .map(|v| (v - mean) * (v - mean) * (v - mean))
                .sum::<f64>()
                / n as f64;
            let m4 = values
                .iter()
                .map(|v| {
                    let d = v - mean;
                    d * d * d * d
                })
                .sum::<f64>()
                / n as f64;
            (
                Some(m3 / (pop_std * pop_std * pop_std)),
                Some(m4 / (pop_var * pop_var) - 3.0),
            )
        } else {
            (None, None)
        };

        out.push(ColumnStats {
            name: name.to_string(),
            n: n,
            mean: mean,
            median: median,
            std: std,
            cv_pct: cv_pct,
            skewness: skewness,
            kurtosis: kurtosis,
        });
    }
    out
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut cov = 0f64;
    let mut var_x = 0f64;
    let mut var_y = 0f64;
    for i in 0..x.len() {
        cov += (x[i] - mean_x) * (y[i] - mean_y);
        var_x += (x[i] - mean_x) * (x[i] - mean_x);
        var_y += (y[i] - mean_y) * (y[i] - mean_y);
    }
    if var_x > 0f64 && var_y > 0f64 {
        cov / (var_x * var_y).sqrt()
    } else {
        0f64
    }
}

/// The columns and data used for correlation work: columns with at least
/// two defined cells and nonzero variance, missing cells imputed by the
/// column median.
fn correlation_columns(rows: &[MasterRow]) -> (Vec<String>, Vec<Vec<f64>>) {
    let mut names = vec![];
    let mut data = vec![];
    for name in NUMERIC_COLUMNS {
        let raw: Vec<Option<f64>> = rows.iter().map(|r| r.column(name)).collect();
        let defined: Vec<f64> = raw.iter().filter_map(|v| *v).collect();
        if defined.len() < 2 {
            continue;
        }
        let first = defined[0];
        if defined.iter().all(|v| *v == first) {
            continue;
        }
        let mut sorted = defined.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = median_of(&sorted);
        names.push(name.to_string());
        data.push(raw.iter().map(|v| v.unwrap_or(median)).collect());
    }
    (names, data)
}

/// Pearson and Spearman correlation matrices over the usable columns.
pub fn correlation_matrices(rows: &[MasterRow]) -> (Vec<String>, DMatrix<f64>, DMatrix<f64>) {
    let (names, data) = correlation_columns(rows);
    let p = names.len();
    let ranks: Vec<Vec<f64>> = data.iter().map(|c| average_rank(c)).collect();

    let pearson_m = DMatrix::from_fn(p, p, |i, j| pearson(&data[i], &data[j]));
    let spearman_m = DMatrix::from_fn(p, p, |i, j| pearson(&ranks[i], &ranks[j]));
    (names, pearson_m, spearman_m)
}

/// Variance inflation factors from the inverse of the Pearson correlation
/// matrix. Skipped with a warning when there are no more basins than
/// columns, or when the matrix is singular.
pub fn variance_inflation_factors(rows: &[MasterRow]) -> Option<Vec<(String, f64)>> {
    let (names, data) = correlation_columns(rows);
    let p = names.len();
    let n = rows.len();
    if p == 0 {
        return None;
    }
    if n <= p {
        println!(
            "Warning: VIF analysis skipped; {} basin(s) cannot support {} parameter(s).",
            n, p
        );
        return None;
    }
    let r = DMatrix::from_fn(p, p, |i, j| pearson(&data[i], &data[j]));
    match r.try_inverse() {
        Some(inv) => Some(
            names
                .iter()
                .enumerate()
                .map(|(j, name)| (name.clone(), inv[(j, j)]))
                .collect(),
        ),
        None => {
            println!("Warning: VIF analysis skipped; the correlation matrix is singular.");
            None
        }
    }
}

pub fn write_descriptive_csv(path: &str, stats: &[ColumnStats]) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(writer, "Parameter,N,Mean,Median,Std,CV_pct,Skewness,Kurtosis")?;
    for s in stats {
        let opt = |v: Option<f64>| v.map(|x| format!("{:.6}", x)).unwrap_or_default();
        writeln!(
            writer,
            "{},{},{:.6},{:.6},{:.6},{},{},{}",
            s.name,
            s.n,
            s.mean,
            s.median,
            s.std,
            opt(s.cv_pct),
            opt(s.skewness),
            opt(s.kurtosis)
        )?;
    }
    Ok(())
}

pub fn write_correlation_csv(
    path: &str,
    names: &[String],
    matrix: &DMatrix<f64>,
) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(writer, "Parameter,{}", names.join(","))?;
    for (i, name) in names.iter().enumerate() {
        let cells: Vec<String> = (0..names.len())
            .map(|j| format!("{:.6}", matrix[(i, j)]))
            .collect();
        writeln!(writer, "{},{}", name, cells.join(","))?;
    }
    Ok(())
}

pub fn write_vif_csv(path: &str, vif: &[(String, f64)]) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(writer, "Parameter,VIF")?;
    for (name, value) in vif {
        writeln!(writer, "{},{:.6}", name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areal::areal_aspect;
    use crate::context::{Basin, BasinRing};
    use crate::master::assemble_master;
    use morpho_common::structures::Point2D;

    fn square_basin(id: &str, size_m: f64) -> Basin {
        Basin::from_rings(
            id,
            vec![BasinRing {
                points: vec![
                    Point2D::new(0.0, 0.0),
                    Point2D::new(0.0, size_m),
                    Point2D::new(size_m, size_m),
                    Point2D::new(size_m, 0.0),
                    Point2D::new(0.0, 0.0),
                ],
                is_hole: false,
            }],
        )
    }

    fn master_rows(sizes: &[f64]) -> Vec<MasterRow> {
        let areal = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| {
                areal_aspect(&square_basin(&format!("SB{}", i + 1), *s), *s * 2.0, 2)
            })
            .collect();
        assemble_master(areal, vec![], vec![])
    }

    #[test]
    fn test_descriptive_stats() {
        let rows = master_rows(&[1000.0, 2000.0, 3000.0, 4000.0]);
        let stats = descriptive_stats(&rows);
        let area = stats.iter().find(|s| s.name == "Area_km2").unwrap();
        assert_eq!(area.n, 4);
        assert!((area.mean - 7.5).abs() < 1e-9); // (1 + 4 + 9 + 16) / 4
        assert!((area.median - 6.5).abs() < 1e-9);
        assert!(area.cv_pct.is_some());
        // relief columns produce no statistics rows at all
        assert!(stats.iter().find(|s| s.name == "HI").is_none());
    }

    #[test]
    fn test_correlation_bounds_and_diagonal() {
        let rows = master_rows(&[1000.0, 1500.0, 2500.0, 4000.0]);
        let (names, pearson_m, spearman_m) = correlation_matrices(&rows);
        assert!(!names.is_empty());
        for i in 0..names.len() {
            assert!((pearson_m[(i, i)] - 1.0).abs() < 1e-9);
            assert!((spearman_m[(i, i)] - 1.0).abs() < 1e-9);
            for j in 0..names.len() {
                assert!(pearson_m[(i, j)].abs() <= 1.0 + 1e-9);
                assert!(spearman_m[(i, j)].abs() <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_vif_skipped_when_underdetermined() {
        // 2 basins but many columns
        let rows = master_rows(&[1000.0, 2000.0]);
        assert!(variance_inflation_factors(&rows).is_none());
    }
}
