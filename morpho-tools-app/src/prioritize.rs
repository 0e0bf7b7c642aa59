/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Watershed prioritization: three independently computed rank vectors over
//! the erosion-indicator columns (compound ranking, entropy weighting, and
//! PCA scoring), with Kendall's tau agreement between every method pair.

use crate::context::Basin;
use crate::master::MasterRow;
use nalgebra::DMatrix;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind, Write};

/// Default direct indicators: higher value means more erosion-prone.
pub const DEFAULT_DIRECT: &[&str] = &["Dd", "Fs", "Rbm", "Rn", "Rh", "HI", "MRN"];
/// Default inverse indicators: higher value means less erosion-prone.
pub const DEFAULT_INVERSE: &[&str] = &["Re", "Rc", "Ff"];

/// One erosion-indicator column as fed into the engine, before imputation.
#[derive(Debug, Clone)]
pub struct PriorityColumn {
    pub name: String,
    pub inverse: bool,
    pub values: Vec<Option<f64>>,
}

/// One basin's ranks, scores, and tri-level classes under the three
/// methods. Ranks follow the dense min-tie convention.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRecord {
    pub basin_id: String,
    pub cf_m1: f64,
    pub rank_m1: usize,
    pub priority_m1: &'static str,
    pub score_m2: f64,
    pub rank_m2: usize,
    pub priority_m2: &'static str,
    pub score_m3: f64,
    pub rank_m3: usize,
    pub priority_m3: &'static str,
}

#[derive(Debug, Clone)]
pub struct KendallRow {
    pub pair: String,
    pub tau: f64,
    pub p_value: f64,
    pub agreement: &'static str,
}

#[derive(Debug, Clone)]
pub struct PrioritizationResult {
    pub records: Vec<PriorityRecord>,
    pub kendall: Vec<KendallRow>,
    pub entropy_weights: Vec<(String, f64)>,
    pub excluded_columns: Vec<String>,
}

/// Min-convention tie ranks: tied values share the lowest available rank
/// and the next distinct value skips accordingly.
fn min_rank(values: &[f64], descending: bool) -> Vec<usize> {
    values
        .iter()
        .map(|v| {
            let better = values
                .iter()
                .filter(|o| if descending { **o > *v } else { **o < *v })
                .count();
            better + 1
        })
        .collect()
}

/// Average-tie ranks, used for the Spearman correlation in the statistics
/// stage.
pub fn average_rank(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| {
            let less = values.iter().filter(|o| **o < *v).count();
            let equal = values.iter().filter(|o| **o == *v).count();
            less as f64 + (equal as f64 + 1.0) / 2.0
        })
        .collect()
}

fn percentile_of(values: &[f64], pct: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
    }
}

fn median_of(values: &[f64]) -> f64 {
    percentile_of(values, 50.0)
}

/// Builds the indicator columns from the master table, imputing missing
/// cells with the column median. Columns with no defined value anywhere are
/// excluded with a warning.
pub fn select_columns(
    rows: &[MasterRow],
    direct: &[&str],
    inverse: &[&str],
) -> (Vec<PriorityColumn>, Vec<String>) {
    let mut columns = vec![];
    let mut excluded = vec![];
    for (names, is_inverse) in [(direct, false), (inverse, true)] {
        for name in names {
            let values: Vec<Option<f64>> = rows.iter().map(|r| r.column(name)).collect();
            if values.iter().all(|v| v.is_none()) {
                println!(
                    "Warning: indicator column '{}' has no defined values and was excluded.",
                    name
                );
                excluded.push(name.to_string());
                continue;
            }
            columns.push(PriorityColumn {
                name: name.to_string(),
                inverse: is_inverse,
                values: values,
            });
        }
    }
    (columns, excluded)
}

fn impute(column: &PriorityColumn) -> Vec<f64> {
    let defined: Vec<f64> = column.values.iter().filter_map(|v| *v).collect();
    let median = median_of(&defined);
    column
        .values
        .iter()
        .map(|v| v.unwrap_or(median))
        .collect()
}

fn class_low_is_high(value: f64, p33: f64, p66: f64) -> &'static str {
    if value <= p33 {
        "High"
    } else if value <= p66 {
        "Moderate"
    } else {
        "Low"
    }
}

fn class_high_is_high(value: f64, p33: f64, p66: f64) -> &'static str {
    if value >= p66 {
        "High"
    } else if value >= p33 {
        "Moderate"
    } else {
        "Low"
    }
}

/// Method 1, compound parameter ranking: per-column min-tie ranks (direct
/// descending, inverse ascending), CF = mean rank, final rank ascending by
/// CF.
fn method1(data: &[(bool, Vec<f64>)], n: usize) -> (Vec<f64>, Vec<usize>) {
    let mut rank_sums = vec![0f64; n];
    for (is_inverse, values) in data {
        let ranks = min_rank(values, !*is_inverse);
        for i in 0..n {
            rank_sums[i] += ranks[i] as f64;
        }
    }
    let cf: Vec<f64> = rank_sums.iter().map(|s| s / data.len() as f64).collect();
    let final_ranks = min_rank(&cf, false);
    (cf, final_ranks)
}

/// Method 2, entropy weighting. Returns the per-basin scores and the
/// normalized column weights.
fn method2(data: &[(bool, Vec<f64>)], n: usize) -> (Vec<f64>, Vec<f64>) {
    let k = data.len();

    // min-max normalize so that 1 is always the risky end
    let mut normalized: Vec<Vec<f64>> = Vec::with_capacity(k);
    for (is_inverse, values) in data {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let z: Vec<f64> = values
            .iter()
            .map(|v| {
                if range > 0f64 {
                    if *is_inverse {
                        (max - v) / range
                    } else {
                        (v - min) / range
                    }
                } else {
                    0.5
                }
            })
            .collect();
        normalized.push(z);
    }

    let mut weights = vec![0f64; k];
    if n > 1 {
        let ln_n = (n as f64).ln();
        for (j, z) in normalized.iter().enumerate() {
            let total: f64 = z.iter().sum();
            let entropy: f64 = if total > 0f64 {
                -z.iter()
                    .map(|v| {
                        let p = (v / total).max(1e-12);
                        p * p.ln()
                    })
                    .sum::<f64>()
                    / ln_n
            } else {
                1.0
            };
            weights[j] = 1.0 - entropy;
        }
    }
    let weight_total: f64 = weights.iter().sum();
    if weight_total > 0f64 {
        for w in weights.iter_mut() {
            *w /= weight_total;
        }
    } else {
        // no dispersion anywhere; fall back to equal weights
        for w in weights.iter_mut() {
            *w = 1.0 / k as f64;
        }
    }

    let scores: Vec<f64> = (0..n)
        .map(|i| (0..k).map(|j| weights[j] * normalized[j][i]).sum())
        .collect();
    (scores, weights)
}

/// Composite PCA score from an eigen decomposition: the first
/// `min(3, p)` components weighted by explained-variance share, with the
/// score sign normalized so that higher means riskier. The normalization
/// makes the result independent of the solver's eigenvector sign choices.
fn composite_from_eigen(
    z: &DMatrix<f64>,
    eigenvalues: &[f64],
    eigenvectors: &DMatrix<f64>,
    order: &[usize],
    direct_idx: &[usize],
) -> Vec<f64> {
    let n = z.nrows();
    let p = z.ncols();
    let retain = p.min(3);
    let retained_var: f64 = order[..retain].iter().map(|k| eigenvalues[*k].max(0.0)).sum();

    // sign convention from the mean PC1 loading of the direct columns
    let pc1 = order[0];
    let flip = if direct_idx.is_empty() {
        false
    } else {
        let mean_loading: f64 = direct_idx
            .iter()
            .map(|j| eigenvectors[(*j, pc1)])
            .sum::<f64>()
            / direct_idx.len() as f64;
        mean_loading < 0f64
    };
    let sign = if flip { -1.0 } else { 1.0 };

    let mut composite = vec![0f64; n];
    for k in order[..retain].iter() {
        let lambda = eigenvalues[*k].max(0.0);
        if retained_var <= 0f64 {
            break;
        }
        let weight = lambda / retained_var;
        let v = eigenvectors.column(*k);
        for i in 0..n {
            let mut score = 0f64;
            for j in 0..p {
                score += z[(i, j)] * v[j];
            }
            composite[i] += weight * sign * score;
        }
    }
    composite
}

/// Method 3, PCA-based scoring on the standardized indicator matrix.
fn method3(data: &[(bool, Vec<f64>)], n: usize) -> Vec<f64> {
    let p = data.len();
    if n < 2 {
        return vec![0f64; n];
    }

    // standardize to zero mean, unit sample variance
    let z = DMatrix::from_fn(n, p, |i, j| {
        let values = &data[j].1;
        let mean = values.iter().sum::<f64>() / n as f64;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0);
        if var > 0f64 {
            (values[i] - mean) / var.sqrt()
        } else {
            0f64
        }
    });

    let corr = z.transpose() * &z / (n as f64 - 1.0);
    let eigen = corr.symmetric_eigen();
    let eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    let mut order: Vec<usize> = (0..p).collect();
    order.sort_by(|a, b| eigenvalues[*b].partial_cmp(&eigenvalues[*a]).unwrap());

    let direct_idx: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, (inv, _))| !inv)
        .map(|(j, _)| j)
        .collect();

    composite_from_eigen(&z, &eigenvalues, &eigen.eigenvectors, &order, &direct_idx)
}

/// Kendall's tau-b with tie correction and a normal-approximation two-sided
/// p-value.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len();
    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 && dy == 0.0 {
                ties_x += 1;
                ties_y += 1;
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if dx * dy > 0.0 {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }
    let n0 = (n * (n - 1) / 2) as f64;
    let denom = ((n0 - ties_x as f64) * (n0 - ties_y as f64)).sqrt();
    let tau = if denom > 0f64 {
        (concordant - discordant) as f64 / denom
    } else {
        0f64
    };

    let nf = n as f64;
    let z = if n > 2 {
        3.0 * (concordant - discordant) as f64 / (nf * (nf - 1.0) * (2.0 * nf + 5.0) / 2.0).sqrt()
    } else {
        0f64
    };
    let normal = Normal::new(0.0, 1.0).expect("standard normal");
    let p_value = 2.0 * (1.0 - normal.cdf(z.abs()));
    (tau, p_value.min(1.0))
}

pub fn agreement_class(tau: f64) -> &'static str {
    if tau.abs() > 0.7 {
        "Strong"
    } else if tau.abs() > 0.4 {
        "Moderate"
    } else {
        "Weak"
    }
}

/// Runs all three methods plus the agreement analysis over pre-selected
/// indicator columns.
pub fn prioritize_columns(
    basin_ids: &[String],
    columns: &[PriorityColumn],
    excluded: Vec<String>,
) -> Result<PrioritizationResult, Error> {
    if columns.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "No erosion-indicator columns are available for prioritization.",
        ));
    }
    let n = basin_ids.len();
    if n == 0 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "The master table contains no basins.",
        ));
    }

    let data: Vec<(bool, Vec<f64>)> = columns.iter().map(|c| (c.inverse, impute(c))).collect();

    let (cf, ranks1) = method1(&data, n);
    let (scores2, weights) = method2(&data, n);
    let ranks2 = min_rank(&scores2, true);
    let scores3 = method3(&data, n);
    let ranks3 = min_rank(&scores3, true);

    let (cf_p33, cf_p66) = (percentile_of(&cf, 33.0), percentile_of(&cf, 66.0));
    let (s2_p33, s2_p66) = (percentile_of(&scores2, 33.0), percentile_of(&scores2, 66.0));
    let (s3_p33, s3_p66) = (percentile_of(&scores3, 33.0), percentile_of(&scores3, 66.0));

    let records: Vec<PriorityRecord> = (0..n)
        .map(|i| PriorityRecord {
            basin_id: basin_ids[i].clone(),
            cf_m1: cf[i],
            rank_m1: ranks1[i],
            priority_m1: class_low_is_high(cf[i], cf_p33, cf_p66),
            score_m2: scores2[i],
            rank_m2: ranks2[i],
            priority_m2: class_high_is_high(scores2[i], s2_p33, s2_p66),
            score_m3: scores3[i],
            rank_m3: ranks3[i],
            priority_m3: class_high_is_high(scores3[i], s3_p33, s3_p66),
        })
        .collect();

    let rank_pairs = [
        ("M1-M2", &ranks1, &ranks2),
        ("M1-M3", &ranks1, &ranks3),
        ("M2-M3", &ranks2, &ranks3),
    ];
    let kendall = rank_pairs
        .iter()
        .map(|(pair, a, b)| {
            let x: Vec<f64> = a.iter().map(|r| *r as f64).collect();
            let y: Vec<f64> = b.iter().map(|r| *r as f64).collect();
            let (tau, p_value) = kendall_tau(&x, &y);
            KendallRow {
                pair: pair.to_string(),
                tau: tau,
                p_value: p_value,
                agreement: agreement_class(tau),
            }
        })
        .collect();

    let entropy_weights = columns
        .iter()
        .zip(weights.iter())
        .map(|(c, w)| (c.name.clone(), *w))
        .collect();

    Ok(PrioritizationResult {
        records: records,
        kendall: kendall,
        entropy_weights: entropy_weights,
        excluded_columns: excluded,
    })
}

/// Entry point over the master table with the configured direct and
/// inverse indicator sets.
pub fn prioritize(
    rows: &[MasterRow],
    direct: &[&str],
    inverse: &[&str],
) -> Result<PrioritizationResult, Error> {
    let basin_ids: Vec<String> = rows.iter().map(|r| r.basin_id.clone()).collect();
    let (columns, excluded) = select_columns(rows, direct, inverse);
    prioritize_columns(&basin_ids, &columns, excluded)
}

pub fn write_priority_csv(path: &str, result: &PrioritizationResult) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(
        writer,
        "Basin_ID,CF_M1,Rank_M1,Priority_M1,Score_M2,Rank_M2,Priority_M2,Score_M3,Rank_M3,Priority_M3"
    )?;
    for r in &result.records {
        writeln!(
            writer,
            "{},{:.6},{},{},{:.6},{},{},{:.6},{},{}",
            r.basin_id,
            r.cf_m1,
            r.rank_m1,
            r.priority_m1,
            r.score_m2,
            r.rank_m2,
            r.priority_m2,
            r.score_m3,
            r.rank_m3,
            r.priority_m3
        )?;
    }
    Ok(())
}

pub fn write_kendall_csv(path: &str, result: &PrioritizationResult) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(writer, "Method_Pair,Tau,P_Value,Agreement")?;
    for k in &result.kendall {
        writeln!(
            writer,
            "{},{:.6},{:.6},{}",
            k.pair, k.tau, k.p_value, k.agreement
        )?;
    }
    Ok(())
}

/// Writes the prioritized subbasin polygon layer, carrying the rank and
/// class attributes of all three methods.
pub fn write_priority_shapefile(
    path: &str,
    basins: &[Basin],
    result: &PrioritizationResult,
    projection: &str,
) -> Result<(), Error> {
    use morpho_vector::{AttributeField, FieldData, FieldDataType, ShapeType, Shapefile, ShapefileGeometry};

    let mut output = Shapefile::new(path, ShapeType::Polygon)?;
    output.projection = projection.to_string();
    output
        .attributes
        .add_field(&AttributeField::new("BASIN_ID", FieldDataType::Text, 24, 0));
    output
        .attributes
        .add_field(&AttributeField::new("CF_M1", FieldDataType::Real, 12, 4));
    output
        .attributes
        .add_field(&AttributeField::new("RANK_M1", FieldDataType::Int, 6, 0));
    output
        .attributes
        .add_field(&AttributeField::new("PRIOR_M1", FieldDataType::Text, 10, 0));
    output
        .attributes
        .add_field(&AttributeField::new("SCORE_M2", FieldDataType::Real, 12, 4));
    output
        .attributes
        .add_field(&AttributeField::new("RANK_M2", FieldDataType::Int, 6, 0));
    output
        .attributes
        .add_field(&AttributeField::new("PRIOR_M2", FieldDataType::Text, 10, 0));
    output
        .attributes
        .add_field(&AttributeField::new("SCORE_M3", FieldDataType::Real, 12, 4));
    output
        .attributes
        .add_field(&AttributeField::new("RANK_M3", FieldDataType::Int, 6, 0));
    output
        .attributes
        .add_field(&AttributeField::new("PRIOR_M3", FieldDataType::Text, 10, 0));

    for basin in basins {
        let record = match result.records.iter().find(|r| r.basin_id == basin.basin_id) {
            Some(r) => r,
            None => continue,
        };
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        for ring in &basin.rings {
            sfg.add_part(&ring.points);
        }
        output.add_record(sfg);
        output.attributes.add_record(
            vec![
                FieldData::Text(record.basin_id.clone()),
                FieldData::Real(record.cf_m1),
                FieldData::Int(record.rank_m1 as i32),
                FieldData::Text(record.priority_m1.to_string()),
                FieldData::Real(record.score_m2),
                FieldData::Int(record.rank_m2 as i32),
                FieldData::Text(record.priority_m2.to_string()),
                FieldData::Real(record.score_m3),
                FieldData::Int(record.rank_m3 as i32),
                FieldData::Text(record.priority_m3.to_string()),
            ],
            false,
        );
    }
    output.write()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, inverse: bool, values: &[f64]) -> PriorityColumn {
        PriorityColumn {
            name: name.to_string(),
            inverse: inverse,
            values: values.iter().map(|v| Some(*v)).collect(),
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("SB{}", i)).collect()
    }

    #[test]
    fn test_min_rank_tie_convention() {
        // two tied for best share rank 1; the next value takes rank 3
        assert_eq!(min_rank(&[10.0, 10.0, 5.0], true), vec![1, 1, 3]);
        assert_eq!(min_rank(&[1.0, 2.0, 2.0, 3.0], false), vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_rank_set_is_dense_permutation_with_min_ties() {
        let values = [4.0, 1.0, 4.0, 2.0, 9.0];
        let ranks = min_rank(&values, true);
        assert_eq!(ranks, vec![2, 5, 2, 4, 1]);
    }

    #[test]
    fn test_entropy_weights_sum_to_one() {
        let columns = vec![
            column("Dd", false, &[1.0, 3.0, 5.0, 2.0]),
            column("MRN", false, &[0.2, 0.9, 0.4, 0.6]),
            column("Re", true, &[0.9, 0.6, 0.3, 0.7]),
        ];
        let data: Vec<(bool, Vec<f64>)> =
            columns.iter().map(|c| (c.inverse, impute(c))).collect();
        let (_, weights) = method2(&data, 4);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(weights.iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn test_three_basin_synthetic_all_methods_agree() {
        let columns = vec![
            column("Dd", false, &[1.0, 3.0, 5.0]),
            column("Re", true, &[0.9, 0.6, 0.3]),
        ];
        let result = prioritize_columns(&ids(3), &columns, vec![]).unwrap();

        // basin 3 (Dd=5.0, Re=0.3) is unambiguously the most erosion-prone
        assert_eq!(result.records[2].rank_m1, 1);
        assert_eq!(result.records[2].rank_m2, 1);
        assert_eq!(result.records[2].rank_m3, 1);
        assert_eq!(result.records[0].rank_m1, 3);
        assert_eq!(result.records[0].rank_m2, 3);
        assert_eq!(result.records[0].rank_m3, 3);
        assert!((result.records[2].cf_m1 - 1.0).abs() < 1e-9);
        assert!((result.records[0].cf_m1 - 3.0).abs() < 1e-9);

        for k in &result.kendall {
            assert!((k.tau - 1.0).abs() < 1e-9);
            assert_eq!(k.agreement, "Strong");
        }
        assert_eq!(result.records[2].priority_m1, "High");
        assert_eq!(result.records[0].priority_m1, "Low");
    }

    #[test]
    fn test_median_imputation() {
        let col = PriorityColumn {
            name: "Dd".to_string(),
            inverse: false,
            values: vec![Some(1.0), None, Some(3.0), Some(5.0)],
        };
        assert_eq!(impute(&col), vec![1.0, 3.0, 3.0, 5.0]);
    }

    #[test]
    fn test_single_basin_degenerates_to_rank_one() {
        let columns = vec![column("Dd", false, &[2.5])];
        let result = prioritize_columns(&ids(1), &columns, vec![]).unwrap();
        assert_eq!(result.records[0].rank_m1, 1);
        assert_eq!(result.records[0].rank_m2, 1);
        assert_eq!(result.records[0].rank_m3, 1);
    }

    #[test]
    fn test_no_columns_is_an_error() {
        assert!(prioritize_columns(&ids(3), &[], vec![]).is_err());
    }

    #[test]
    fn test_pca_composite_invariant_to_eigenvector_sign() {
        // the PC1 loading check must cancel the solver's arbitrary
        // eigenvector sign choice
        let data = vec![
            (false, vec![1.0, 3.0, 5.0, 4.0]),
            (false, vec![0.5, 0.9, 1.4, 1.1]),
        ];
        let n = 4;
        let p = 2;
        let z = DMatrix::from_fn(n, p, |i, j| {
            let values = &data[j].1;
            let mean = values.iter().sum::<f64>() / n as f64;
            let var =
                values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0);
            (values[i] - mean) / var.sqrt()
        });
        let corr = z.transpose() * &z / (n as f64 - 1.0);
        let eigen = corr.clone().symmetric_eigen();
        let eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|a, b| eigenvalues[*b].partial_cmp(&eigenvalues[*a]).unwrap());

        let direct_idx = [0usize, 1usize];
        let forward =
            composite_from_eigen(&z, &eigenvalues, &eigen.eigenvectors, &order, &direct_idx);
        let negated_vectors = -eigen.eigenvectors.clone();
        let backward =
            composite_from_eigen(&z, &eigenvalues, &negated_vectors, &order, &direct_idx);
        for (a, b) in forward.iter().zip(backward.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_kendall_tau() {
        let (tau, p) = kendall_tau(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        assert!((tau - 1.0).abs() < 1e-12);
        assert!(p < 0.2);

        let (tau, _) = kendall_tau(&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]);
        assert!((tau + 1.0).abs() < 1e-12);

        let (tau, _) = kendall_tau(&[1.0, 2.0, 3.0, 4.0], &[2.0, 1.0, 4.0, 3.0]);
        assert!(tau.abs() < 0.7);
    }

    #[test]
    fn test_agreement_classes() {
        assert_eq!(agreement_class(0.9), "Strong");
        assert_eq!(agreement_class(-0.8), "Strong");
        assert_eq!(agreement_class(0.5), "Moderate");
        assert_eq!(agreement_class(0.1), "Weak");
    }

    #[test]
    fn test_ranks_are_independent_of_record_order() {
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let basin_ids = ids(5);
        let columns = vec![
            column("Dd", false, &[3.1, 1.4, 4.8, 2.2, 0.7]),
            column("Fs", false, &[6.0, 2.5, 8.1, 4.4, 1.9]),
            column("Re", true, &[0.55, 0.82, 0.41, 0.66, 0.93]),
        ];
        let baseline = prioritize_columns(&basin_ids, &columns, vec![]).unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        let mut perm: Vec<usize> = (0..5).collect();
        perm.shuffle(&mut rng);

        let shuffled_ids: Vec<String> = perm.iter().map(|&i| basin_ids[i].clone()).collect();
        let shuffled_columns: Vec<PriorityColumn> = columns
            .iter()
            .map(|c| PriorityColumn {
                name: c.name.clone(),
                inverse: c.inverse,
                values: perm.iter().map(|&i| c.values[i]).collect(),
            })
            .collect();
        let shuffled = prioritize_columns(&shuffled_ids, &shuffled_columns, vec![]).unwrap();

        for rec in &baseline.records {
            let other = shuffled
                .records
                .iter()
                .find(|r| r.basin_id == rec.basin_id)
                .unwrap();
            assert_eq!(rec.rank_m1, other.rank_m1);
            assert_eq!(rec.rank_m2, other.rank_m2);
            assert_eq!(rec.rank_m3, other.rank_m3);
            assert_eq!(rec.priority_m1, other.priority_m1);
        }
    }
}
