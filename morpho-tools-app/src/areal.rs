/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Areal aspect indices. Geometry is carried in metres and reported in
//! km and km2. Basin length uses Hack's approximation rather than a traced
//! longest flow path.

use crate::context::Basin;

/// One basin's areal-aspect record. Fields whose formula has a zero
/// denominator, or that need streams the basin does not have, are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArealRecord {
    pub basin_id: String,
    pub area_km2: f64,
    pub perimeter_km: f64,
    pub basin_length_km: f64,
    pub stream_length_km: f64,
    pub drainage_density: Option<f64>,
    pub stream_frequency: Option<f64>,
    pub texture_ratio: Option<f64>,
    pub form_factor: Option<f64>,
    pub elongation_ratio: Option<f64>,
    pub circularity_ratio: Option<f64>,
    pub compactness_coefficient: Option<f64>,
    pub overland_flow_length: Option<f64>,
    pub channel_maintenance: Option<f64>,
}

/// Computes the areal aspect for one basin given its total associated
/// stream length and segment count.
pub fn areal_aspect(basin: &Basin, total_stream_length_m: f64, total_nu: usize) -> ArealRecord {
    let area_km2 = basin.area_m2 / 1.0e6;
    let perimeter_km = basin.perimeter_m / 1000.0;
    // Hack (1957): L = 1.312 * A^0.568, linearized here to the square-root
    // form used for compact basins
    let basin_length_km = (basin.area_m2 / 1.128).sqrt() / 1000.0;
    let stream_length_km = total_stream_length_m / 1000.0;

    let ratio = |num: f64, den: f64| -> Option<f64> {
        if den > 0f64 {
            Some(num / den)
        } else {
            None
        }
    };

    let drainage_density = if total_nu > 0 {
        ratio(stream_length_km, area_km2)
    } else {
        None
    };
    let stream_frequency = if total_nu > 0 {
        ratio(total_nu as f64, area_km2)
    } else {
        None
    };
    let texture_ratio = if total_nu > 0 {
        ratio(total_nu as f64, perimeter_km)
    } else {
        None
    };

    let form_factor = ratio(area_km2, basin_length_km * basin_length_km);
    let elongation_ratio = ratio(
        2.0 * (area_km2 / std::f64::consts::PI).sqrt(),
        basin_length_km,
    );
    let circularity_ratio = ratio(
        4.0 * std::f64::consts::PI * area_km2,
        perimeter_km * perimeter_km,
    );
    let compactness_coefficient = ratio(
        perimeter_km,
        2.0 * (std::f64::consts::PI * area_km2).sqrt(),
    );

    // both derive from Dd and are undefined when Dd is undefined or zero
    let overland_flow_length = drainage_density.and_then(|dd| ratio(1.0, 2.0 * dd));
    let channel_maintenance = drainage_density.and_then(|dd| ratio(1.0, dd));

    ArealRecord {
        basin_id: basin.basin_id.clone(),
        area_km2: area_km2,
        perimeter_km: perimeter_km,
        basin_length_km: basin_length_km,
        stream_length_km: stream_length_km,
        drainage_density: drainage_density,
        stream_frequency: stream_frequency,
        texture_ratio: texture_ratio,
        form_factor: form_factor,
        elongation_ratio: elongation_ratio,
        circularity_ratio: circularity_ratio,
        compactness_coefficient: compactness_coefficient,
        overland_flow_length: overland_flow_length,
        channel_maintenance: channel_maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BasinRing;
    use morpho_common::structures::Point2D;

    fn square_basin(size_m: f64) -> Basin {
        Basin::from_rings(
            "SB1",
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

    #[test]
    fn test_areal_formulas() {
        // 2km x 2km basin, 8km of streams in 4 segments
        let basin = square_basin(2000.0);
        let rec = areal_aspect(&basin, 8000.0, 4);

        assert!((rec.area_km2 - 4.0).abs() < 1e-9);
        assert!((rec.perimeter_km - 8.0).abs() < 1e-9);
        let lb = (4.0e6f64 / 1.128).sqrt() / 1000.0;
        assert!((rec.basin_length_km - lb).abs() < 1e-9);

        assert!((rec.drainage_density.unwrap() - 2.0).abs() < 1e-9);
        assert!((rec.stream_frequency.unwrap() - 1.0).abs() < 1e-9);
        assert!((rec.texture_ratio.unwrap() - 0.5).abs() < 1e-9);
        assert!((rec.form_factor.unwrap() - 4.0 / (lb * lb)).abs() < 1e-9);
        assert!(
            (rec.elongation_ratio.unwrap() - 2.0 * (4.0 / std::f64::consts::PI).sqrt() / lb).abs()
                < 1e-9
        );
        assert!(
            (rec.circularity_ratio.unwrap() - 4.0 * std::f64::consts::PI * 4.0 / 64.0).abs()
                < 1e-9
        );
        assert!(
            (rec.compactness_coefficient.unwrap()
                - 8.0 / (2.0 * (std::f64::consts::PI * 4.0).sqrt()))
            .abs()
                < 1e-9
        );
        assert!((rec.overland_flow_length.unwrap() - 0.25).abs() < 1e-9);
        assert!((rec.channel_maintenance.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_defined_indices_are_non_negative() {
        let basin = square_basin(3500.0);
        let rec = areal_aspect(&basin, 12345.0, 7);
        for v in [
            rec.drainage_density,
            rec.stream_frequency,
            rec.texture_ratio,
            rec.form_factor,
            rec.elongation_ratio,
            rec.circularity_ratio,
            rec.compactness_coefficient,
        ] {
            let v = v.unwrap();
            assert!(v.is_finite() && v >= 0.0);
        }
    }

    #[test]
    fn test_zero_streams_yield_null_not_zero() {
        let basin = square_basin(2000.0);
        let rec = areal_aspect(&basin, 0.0, 0);
        assert!(rec.drainage_density.is_none());
        assert!(rec.stream_frequency.is_none());
        assert!(rec.texture_ratio.is_none());
        assert!(rec.overland_flow_length.is_none());
        assert!(rec.channel_maintenance.is_none());
        // purely geometric indices remain defined
        assert!(rec.form_factor.is_some());
        assert!(rec.elongation_ratio.is_some());
    }

    #[test]
    fn test_idempotent() {
        let basin = square_basin(1700.0);
        let a = areal_aspect(&basin, 5000.0, 3);
        let b = areal_aspect(&basin, 5000.0, 3);
        assert_eq!(a, b);
    }
}
