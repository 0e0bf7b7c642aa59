/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Linear aspect of the drainage network: per-order stream counts and
//! lengths, bifurcation and length ratios, and their basin-level means.

use crate::context::StreamSegment;
use std::collections::BTreeMap;

/// Per-(basin, order) statistics. `rb` is undefined at the highest observed
/// order and `rl` at the lowest; both stay `None` there rather than zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderStat {
    pub order: i32,
    pub nu: usize,
    pub lu_m: f64,
    pub lsm_m: f64,
    pub rb: Option<f64>,
    pub rl: Option<f64>,
}

/// One basin's linear-aspect summary.
#[derive(Debug, Clone)]
pub struct LinearSummary {
    pub basin_id: String,
    pub orders: BTreeMap<i32, OrderStat>,
    pub total_nu: usize,
    pub total_lu_m: f64,
    pub rbm: Option<f64>,
    pub wrbm: Option<f64>,
}

/// Computes the linear aspect for one basin from its associated segments.
/// A basin with a single observed order yields empty ratios and `None`
/// means, which is not an error.
pub fn linear_aspect(basin_id: &str, segments: &[&StreamSegment]) -> LinearSummary {
    let mut orders: BTreeMap<i32, OrderStat> = BTreeMap::new();
    for seg in segments {
        let stat = orders.entry(seg.order).or_insert(OrderStat {
            order: seg.order,
            nu: 0,
            lu_m: 0f64,
            lsm_m: 0f64,
            rb: None,
            rl: None,
        });
        stat.nu += 1;
        stat.lu_m += seg.length_m;
    }
    for stat in orders.values_mut() {
        stat.lsm_m = stat.lu_m / stat.nu as f64;
    }

    // ratios over adjacent observed orders
    let observed: Vec<i32> = orders.keys().copied().collect();
    for w in observed.windows(2) {
        let (lower, upper) = (w[0], w[1]);
        let nu_upper = orders[&upper].nu;
        let rb = if nu_upper > 0 {
            Some(orders[&lower].nu as f64 / nu_upper as f64)
        } else {
            None
        };
        let rl = if orders[&lower].lsm_m > 0f64 {
            Some(orders[&upper].lsm_m / orders[&lower].lsm_m)
        } else {
            None
        };
        orders.get_mut(&lower).unwrap().rb = rb;
        orders.get_mut(&upper).unwrap().rl = rl;
    }

    let mut total_nu = 0usize;
    let mut total_lu_m = 0f64;
    for stat in orders.values() {
        total_nu += stat.nu;
        total_lu_m += stat.lu_m;
    }

    // mean bifurcation ratio over the defined pairs
    let defined_rb: Vec<f64> = orders.values().filter_map(|s| s.rb).collect();
    let rbm = if defined_rb.is_empty() {
        None
    } else {
        Some(defined_rb.iter().sum::<f64>() / defined_rb.len() as f64)
    };

    // Strahler weighted mean: each pair weighted by the combined segment
    // count of its two orders
    let mut weighted_sum = 0f64;
    let mut weight_total = 0f64;
    for w in observed.windows(2) {
        if let Some(rb) = orders[&w[0]].rb {
            let weight = (orders[&w[0]].nu + orders[&w[1]].nu) as f64;
            weighted_sum += rb * weight;
            weight_total += weight;
        }
    }
    let wrbm = if weight_total > 0f64 {
        Some(weighted_sum / weight_total)
    } else {
        None
    };

    LinearSummary {
        basin_id: basin_id.to_string(),
        orders: orders,
        total_nu: total_nu,
        total_lu_m: total_lu_m,
        rbm: rbm,
        wrbm: wrbm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_common::structures::Point2D;

    fn seg(order: i32, length_m: f64) -> StreamSegment {
        StreamSegment::new(
            vec![Point2D::new(0.0, 0.0), Point2D::new(length_m, 0.0)],
            order,
        )
    }

    #[test]
    fn test_boundary_ratios_are_undefined() {
        let segs = vec![
            seg(1, 100.0),
            seg(1, 200.0),
            seg(1, 300.0),
            seg(2, 400.0),
            seg(2, 500.0),
            seg(3, 600.0),
        ];
        let refs: Vec<&StreamSegment> = segs.iter().collect();
        let summary = linear_aspect("SB1", &refs);

        assert_eq!(summary.orders[&1].nu, 3);
        assert!((summary.orders[&1].lu_m - 600.0).abs() < 1e-9);
        assert!((summary.orders[&1].lsm_m - 200.0).abs() < 1e-9);

        // Rb defined everywhere except the maximum order
        assert!((summary.orders[&1].rb.unwrap() - 1.5).abs() < 1e-9);
        assert!((summary.orders[&2].rb.unwrap() - 2.0).abs() < 1e-9);
        assert!(summary.orders[&3].rb.is_none());

        // RL defined everywhere except the minimum order
        assert!(summary.orders[&1].rl.is_none());
        assert!((summary.orders[&2].rl.unwrap() - 450.0 / 200.0).abs() < 1e-9);
        assert!((summary.orders[&3].rl.unwrap() - 600.0 / 450.0).abs() < 1e-9);

        assert!((summary.rbm.unwrap() - 1.75).abs() < 1e-9);
        // wRbm = (1.5*5 + 2.0*3) / 8
        assert!((summary.wrbm.unwrap() - 13.5 / 8.0).abs() < 1e-9);
        assert_eq!(summary.total_nu, 6);
        assert!((summary.total_lu_m - 2100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_order_basin() {
        let segs = vec![seg(1, 100.0), seg(1, 150.0)];
        let refs: Vec<&StreamSegment> = segs.iter().collect();
        let summary = linear_aspect("SB1", &refs);
        assert!(summary.orders[&1].rb.is_none());
        assert!(summary.orders[&1].rl.is_none());
        assert!(summary.rbm.is_none());
        assert!(summary.wrbm.is_none());
    }

    #[test]
    fn test_no_segments() {
        let summary = linear_aspect("SB1", &[]);
        assert!(summary.orders.is_empty());
        assert_eq!(summary.total_nu, 0);
        assert!(summary.rbm.is_none());
    }

    #[test]
    fn test_idempotent() {
        let segs = vec![seg(1, 100.0), seg(1, 250.0), seg(2, 400.0)];
        let refs: Vec<&StreamSegment> = segs.iter().collect();
        let a = linear_aspect("SB1", &refs);
        let b = linear_aspect("SB1", &refs);
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.rbm, b.rbm);
        assert_eq!(a.wrbm, b.wrbm);
    }
}
