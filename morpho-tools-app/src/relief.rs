/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Relief aspect: per-basin elevation statistics, relief ratios, the
//! hypsometric integral and curve, and slope/ruggedness summaries, all from
//! grids clipped to the basin polygon.

use crate::areal::ArealRecord;
use crate::context::Basin;
use morpho_common::structures::Point2D;
use morpho_raster::Raster;

/// Whether a basin's raster statistics came from a true polygon clip or
/// from the whole-extent fallback. The fallback is degraded behavior and is
/// always logged, never silent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipOutcome {
    Clipped,
    WholeExtent,
}

/// Fewer valid cells than this and the hypsometric integral is withheld.
const MIN_HYPSO_CELLS: usize = 10;

/// Collects the raster values inside the basin polygon. When the basin's
/// bounding box misses the grid entirely the clip has failed; every valid
/// cell of the grid is returned instead, flagged as `WholeExtent`.
pub fn clip_to_basin(raster: &Raster, basin: &Basin) -> (Vec<f64>, ClipOutcome) {
    let nodata = raster.configs.nodata;
    let extent = raster.get_bounding_box();
    if !extent.overlaps(basin.bbox) {
        let values: Vec<f64> = raster.data.iter().copied().filter(|v| *v != nodata).collect();
        return (values, ClipOutcome::WholeExtent);
    }

    // crop to the bounding extent, then mask by polygon containment
    let row_start = raster.get_row_from_y(basin.bbox.max_y).max(0);
    let row_end = raster
        .get_row_from_y(basin.bbox.min_y)
        .min(raster.configs.rows as isize - 1);
    let col_start = raster.get_column_from_x(basin.bbox.min_x).max(0);
    let col_end = raster
        .get_column_from_x(basin.bbox.max_x)
        .min(raster.configs.columns as isize - 1);

    let mut values = vec![];
    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let z = raster.get_value(row, col);
            if z == nodata {
                continue;
            }
            let p = Point2D::new(raster.get_x_from_column(col), raster.get_y_from_row(row));
            if basin.contains(&p) {
                values.push(z);
            }
        }
    }
    (values, ClipOutcome::Clipped)
}

/// Linear-interpolated percentile of an ascending-sorted slice.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
    }
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// One basin's relief-aspect record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliefRecord {
    pub basin_id: String,
    pub clip_outcome: ClipOutcome,
    pub elev_min: f64,
    pub elev_max: f64,
    pub elev_mean: f64,
    pub relief_m: f64,
    pub relief_ratio: Option<f64>,
    pub relative_relief: Option<f64>,
    pub ruggedness_number: Option<f64>,
    pub melton_ruggedness: Option<f64>,
    pub hypsometric_integral: Option<f64>,
    /// 101 points of (relative area, relative elevation), empty when the
    /// integral is withheld.
    pub hypsometric_curve: Vec<(f64, f64)>,
    pub slope_mean: Option<f64>,
    pub slope_std: Option<f64>,
    pub slope_skewness: Option<f64>,
    pub tri_mean: Option<f64>,
}

/// Computes the relief aspect for one basin. Returns `None` when the DEM
/// clip holds no valid cells at all; the caller warns and the basin keeps
/// null relief columns in the master table.
pub fn relief_aspect(
    basin: &Basin,
    areal: &ArealRecord,
    dem: &Raster,
    slope: &Raster,
    tri: &Raster,
    verbose: bool,
) -> Option<ReliefRecord> {
    let (mut elev, outcome) = clip_to_basin(dem, basin);
    if outcome == ClipOutcome::WholeExtent {
        println!(
            "Warning: basin '{}' lies outside the DEM extent; whole-extent statistics used.",
            basin.basin_id
        );
    }
    if elev.is_empty() {
        return None;
    }

    elev.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let elev_min = elev[0];
    let elev_max = elev[elev.len() - 1];
    let elev_mean = elev.iter().sum::<f64>() / elev.len() as f64;
    let relief_m = elev_max - elev_min;

    let ratio = |num: f64, den: f64| -> Option<f64> {
        if den > 0f64 {
            Some(num / den)
        } else {
            None
        }
    };

    let relief_ratio = ratio(relief_m, areal.basin_length_km * 1000.0);
    let relative_relief = ratio(relief_m, areal.perimeter_km);
    let ruggedness_number = areal.drainage_density.map(|dd| relief_m * dd / 1000.0);
    let melton_ruggedness = ratio(relief_m, areal.area_km2.sqrt());

    let (hypsometric_integral, hypsometric_curve) = if elev.len() < MIN_HYPSO_CELLS {
        if verbose {
            println!(
                "Warning: basin '{}' has only {} valid DEM cell(s); hypsometric integral withheld.",
                basin.basin_id,
                elev.len()
            );
        }
        (None, vec![])
    } else if relief_m > 0f64 {
        let hi = (elev_mean - elev_min) / relief_m;
        let curve: Vec<(f64, f64)> = (0..=100)
            .map(|p| {
                let rel_area = 1.0 - p as f64 / 100.0;
                let rel_elev = (percentile(&elev, p as f64) - elev_min) / relief_m;
                (rel_area, rel_elev)
            })
            .collect();
        (Some(hi), curve)
    } else {
        // perfectly flat clip: the integral's denominator is zero
        (None, vec![])
    };

    let (slope_vals, _) = clip_to_basin(slope, basin);
    let slope_mean = mean_of(&slope_vals);
    let (slope_std, slope_skewness) = match slope_mean {
        Some(m) => {
            let n = slope_vals.len() as f64;
            let var = slope_vals.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;
            let std = var.sqrt();
            let skew = if std > 0f64 {
                Some(
                    slope_vals
                        .iter()
                        .map(|v| (v - m) * (v - m) * (v - m))
                        .sum::<f64>()
                        / n
                        / (std * std * std),
                )
            } else {
                None
            };
            (Some(std), skew)
        }
        None => (None, None),
    };

    let (tri_vals, _) = clip_to_basin(tri, basin);
    let tri_mean = mean_of(&tri_vals);

    Some(ReliefRecord {
        basin_id: basin.basin_id.clone(),
        clip_outcome: outcome,
        elev_min: elev_min,
        elev_max: elev_max,
        elev_mean: elev_mean,
        relief_m: relief_m,
        relief_ratio: relief_ratio,
        relative_relief: relative_relief,
        ruggedness_number: ruggedness_number,
        melton_ruggedness: melton_ruggedness,
        hypsometric_integral: hypsometric_integral,
        hypsometric_curve: hypsometric_curve,
        slope_mean: slope_mean,
        slope_std: slope_std,
        slope_skewness: slope_skewness,
        tri_mean: tri_mean,
    })
}

/// Basin shape from the elongation ratio.
pub fn shape_class(re: f64) -> &'static str {
    if re >= 0.9 {
        "Circular"
    } else if re >= 0.8 {
        "Oval"
    } else if re >= 0.7 {
        "Less Elongated"
    } else if re >= 0.5 {
        "Elongated"
    } else {
        "More Elongated"
    }
}

/// Basin maturity from the circularity ratio.
pub fn circularity_class(rc: f64) -> &'static str {
    if rc >= 0.75 {
        "Circular/Young"
    } else if rc >= 0.50 {
        "Intermediate"
    } else {
        "Elongated/Old"
    }
}

/// Erosional stage from the hypsometric integral.
pub fn hypsometric_class(hi: f64) -> &'static str {
    if hi > 0.60 {
        "Monadnock"
    } else if hi > 0.35 {
        "Mature"
    } else {
        "Peneplain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areal::areal_aspect;
    use crate::context::BasinRing;
    use morpho_raster::RasterConfigs;

    fn square_basin(x0: f64, y0: f64, size_m: f64) -> Basin {
        Basin::from_rings(
            "SB1",
            vec![BasinRing {
                points: vec![
                    Point2D::new(x0, y0),
                    Point2D::new(x0, y0 + size_m),
                    Point2D::new(x0 + size_m, y0 + size_m),
                    Point2D::new(x0 + size_m, y0),
                    Point2D::new(x0, y0),
                ],
                is_hole: false,
            }],
        )
    }

    fn grid(rows: usize, columns: usize, res: f64, f: impl Fn(usize, usize) -> f64) -> Raster {
        let configs = RasterConfigs {
            rows: rows,
            columns: columns,
            west: 0.0,
            south: 0.0,
            east: columns as f64 * res,
            north: rows as f64 * res,
            resolution_x: res,
            resolution_y: res,
            nodata: -32768.0,
            epsg_code: 32643,
            ..Default::default()
        };
        let mut r = Raster::initialize_using_config("test.asc", &configs);
        for row in 0..rows {
            for col in 0..columns {
                r.set_value(row as isize, col as isize, f(row, col));
            }
        }
        r
    }

    #[test]
    fn test_clip_masks_outside_cells() {
        let dem = grid(10, 10, 10.0, |_, _| 100.0);
        let basin = square_basin(0.0, 0.0, 50.0); // lower-left quarter
        let (values, outcome) = clip_to_basin(&dem, &basin);
        assert_eq!(outcome, ClipOutcome::Clipped);
        assert_eq!(values.len(), 25);
    }

    #[test]
    fn test_clip_fallback_outside_extent() {
        let dem = grid(4, 4, 10.0, |_, _| 1.0);
        let basin = square_basin(5000.0, 5000.0, 100.0);
        let (values, outcome) = clip_to_basin(&dem, &basin);
        assert_eq!(outcome, ClipOutcome::WholeExtent);
        assert_eq!(values.len(), 16);
    }

    #[test]
    fn test_relief_and_hypsometry() {
        // elevation rises 1m per row moving south from 100m
        let dem = grid(10, 10, 10.0, |row, _| 100.0 + row as f64);
        let slope = grid(10, 10, 10.0, |_, _| 5.0);
        let tri = grid(10, 10, 10.0, |_, _| 0.5);
        let basin = square_basin(0.0, 0.0, 100.0);
        let areal = areal_aspect(&basin, 400.0, 2);

        let rec = relief_aspect(&basin, &areal, &dem, &slope, &tri, false).unwrap();
        assert!((rec.elev_min - 100.0).abs() < 1e-9);
        assert!((rec.elev_max - 109.0).abs() < 1e-9);
        assert!((rec.relief_m - 9.0).abs() < 1e-9);
        // uniform distribution over 10 levels: HI = 0.5
        assert!((rec.hypsometric_integral.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(rec.hypsometric_curve.len(), 101);
        assert!((rec.hypsometric_curve[0].0 - 1.0).abs() < 1e-9);
        assert!((rec.hypsometric_curve[0].1 - 0.0).abs() < 1e-9);
        assert!((rec.hypsometric_curve[100].0 - 0.0).abs() < 1e-9);
        assert!((rec.hypsometric_curve[100].1 - 1.0).abs() < 1e-9);
        assert!((rec.slope_mean.unwrap() - 5.0).abs() < 1e-9);
        assert!((rec.slope_std.unwrap() - 0.0).abs() < 1e-9);
        assert!(rec.slope_skewness.is_none());
        assert!((rec.tri_mean.unwrap() - 0.5).abs() < 1e-9);

        let mrn = 9.0 / areal.area_km2.sqrt();
        assert!((rec.melton_ruggedness.unwrap() - mrn).abs() < 1e-9);
        let rn = 9.0 * areal.drainage_density.unwrap() / 1000.0;
        assert!((rec.ruggedness_number.unwrap() - rn).abs() < 1e-9);
    }

    #[test]
    fn test_hypsometric_withheld_under_ten_cells() {
        let dem = grid(3, 3, 10.0, |row, col| (row * 3 + col) as f64);
        let slope = grid(3, 3, 10.0, |_, _| 1.0);
        let tri = grid(3, 3, 10.0, |_, _| 1.0);
        let basin = square_basin(0.0, 0.0, 30.0); // 9 cells
        let areal = areal_aspect(&basin, 10.0, 1);
        let rec = relief_aspect(&basin, &areal, &dem, &slope, &tri, false).unwrap();
        assert!(rec.hypsometric_integral.is_none());
        assert!(rec.hypsometric_curve.is_empty());
        // the rest of the record is still computed
        assert!((rec.relief_m - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_valid_cells_yields_none() {
        let dem = grid(4, 4, 10.0, |_, _| -32768.0);
        let slope = grid(4, 4, 10.0, |_, _| 1.0);
        let tri = grid(4, 4, 10.0, |_, _| 1.0);
        let basin = square_basin(0.0, 0.0, 40.0);
        let areal = areal_aspect(&basin, 10.0, 1);
        assert!(relief_aspect(&basin, &areal, &dem, &slope, &tri, false).is_none());
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(shape_class(0.95), "Circular");
        assert_eq!(shape_class(0.9), "Circular");
        assert_eq!(shape_class(0.85), "Oval");
        assert_eq!(shape_class(0.75), "Less Elongated");
        assert_eq!(shape_class(0.6), "Elongated");
        assert_eq!(shape_class(0.3), "More Elongated");

        assert_eq!(circularity_class(0.8), "Circular/Young");
        assert_eq!(circularity_class(0.6), "Intermediate");
        assert_eq!(circularity_class(0.2), "Elongated/Old");

        assert_eq!(hypsometric_class(0.7), "Monadnock");
        assert_eq!(hypsometric_class(0.5), "Mature");
        assert_eq!(hypsometric_class(0.35), "Peneplain");
        assert_eq!(hypsometric_class(0.2), "Peneplain");
    }
}
