/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! The master morphometric table: an outer join of the areal, relief, and
//! linear-summary tables on basin id, with interpretive classification
//! labels and wide per-order columns bounded by the observed maximum order.

use crate::areal::ArealRecord;
use crate::linear::LinearSummary;
use crate::relief::{circularity_class, hypsometric_class, shape_class, ReliefRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Error, Write};

/// One row of the master table. A basin absent from a sub-table keeps that
/// sub-table's columns null rather than being dropped.
#[derive(Debug, Clone)]
pub struct MasterRow {
    pub basin_id: String,
    pub areal: Option<ArealRecord>,
    pub relief: Option<ReliefRecord>,
    pub total_nu: Option<usize>,
    pub total_lu_km: Option<f64>,
    pub rbm: Option<f64>,
    pub wrbm: Option<f64>,
    /// (Nu, Lu_km) keyed by Strahler order.
    pub orders: BTreeMap<i32, (usize, f64)>,
    pub shape_class: Option<&'static str>,
    pub circ_class: Option<&'static str>,
    pub hyps_class: Option<&'static str>,
}

/// The numeric columns addressable by name in the statistics and
/// prioritization stages.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "Area_km2", "Perim_km", "Lb_km", "Lu_km", "Nu", "Dd", "Fs", "T", "Ff", "Re", "Rc", "Cc",
    "Lg", "C", "Rbm", "wRbm", "H_m", "Rh", "Rr", "Rn", "MRN", "HI", "Slope_mean", "Slope_std",
    "Slope_skew", "TRI_mean",
];

impl MasterRow {
    /// Looks a numeric column up by name; null cells come back as `None`.
    pub fn column(&self, name: &str) -> Option<f64> {
        let a = self.areal.as_ref();
        let r = self.relief.as_ref();
        match name {
            "Area_km2" => a.map(|v| v.area_km2),
            "Perim_km" => a.map(|v| v.perimeter_km),
            "Lb_km" => a.map(|v| v.basin_length_km),
            "Lu_km" => self.total_lu_km,
            "Nu" => self.total_nu.map(|v| v as f64),
            "Dd" => a.and_then(|v| v.drainage_density),
            "Fs" => a.and_then(|v| v.stream_frequency),
            "T" => a.and_then(|v| v.texture_ratio),
            "Ff" => a.and_then(|v| v.form_factor),
            "Re" => a.and_then(|v| v.elongation_ratio),
            "Rc" => a.and_then(|v| v.circularity_ratio),
            "Cc" => a.and_then(|v| v.compactness_coefficient),
            "Lg" => a.and_then(|v| v.overland_flow_length),
            "C" => a.and_then(|v| v.channel_maintenance),
            "Rbm" => self.rbm,
            "wRbm" => self.wrbm,
            "H_m" => r.map(|v| v.relief_m),
            "Rh" => r.and_then(|v| v.relief_ratio),
            "Rr" => r.and_then(|v| v.relative_relief),
            "Rn" => r.and_then(|v| v.ruggedness_number),
            "MRN" => r.and_then(|v| v.melton_ruggedness),
            "HI" => r.and_then(|v| v.hypsometric_integral),
            "Slope_mean" => r.and_then(|v| v.slope_mean),
            "Slope_std" => r.and_then(|v| v.slope_std),
            "Slope_skew" => r.and_then(|v| v.slope_skewness),
            "TRI_mean" => r.and_then(|v| v.tri_mean),
            _ => None,
        }
    }
}

/// Outer-joins the three aspect tables on basin id. Row order follows the
/// areal table, with ids unique to the other tables appended after.
pub fn assemble_master(
    areal: Vec<ArealRecord>,
    relief: Vec<ReliefRecord>,
    linear: Vec<LinearSummary>,
) -> Vec<MasterRow> {
    let mut id_order: Vec<String> = vec![];
    for rec in &areal {
        id_order.push(rec.basin_id.clone());
    }
    for rec in &relief {
        if !id_order.contains(&rec.basin_id) {
            id_order.push(rec.basin_id.clone());
        }
    }
    for rec in &linear {
        if !id_order.contains(&rec.basin_id) {
            id_order.push(rec.basin_id.clone());
        }
    }

    let mut areal_map: BTreeMap<String, ArealRecord> = BTreeMap::new();
    for rec in areal {
        areal_map.insert(rec.basin_id.clone(), rec);
    }
    let mut relief_map: BTreeMap<String, ReliefRecord> = BTreeMap::new();
    for rec in relief {
        relief_map.insert(rec.basin_id.clone(), rec);
    }
    let mut linear_map: BTreeMap<String, LinearSummary> = BTreeMap::new();
    for rec in linear {
        linear_map.insert(rec.basin_id.clone(), rec);
    }

    let mut rows = vec![];
    for basin_id in id_order {
        let areal = areal_map.remove(&basin_id);
        let relief = relief_map.remove(&basin_id);
        let linear = linear_map.remove(&basin_id);

        let shape_class = areal
            .as_ref()
            .and_then(|a| a.elongation_ratio)
            .map(shape_class);
        let circ_class = areal
            .as_ref()
            .and_then(|a| a.circularity_ratio)
            .map(circularity_class);
        let hyps_class = relief
            .as_ref()
            .and_then(|r| r.hypsometric_integral)
            .map(hypsometric_class);

        let (total_nu, total_lu_km, rbm, wrbm, orders) = match linear {
            Some(l) => (
                Some(l.total_nu),
                Some(l.total_lu_m / 1000.0),
                l.rbm,
                l.wrbm,
                l.orders
                    .iter()
                    .map(|(k, s)| (*k, (s.nu, s.lu_m / 1000.0)))
                    .collect(),
            ),
            None => (None, None, None, None, BTreeMap::new()),
        };

        rows.push(MasterRow {
            basin_id: basin_id,
            areal: areal,
            relief: relief,
            total_nu: total_nu,
            total_lu_km: total_lu_km,
            rbm: rbm,
            wrbm: wrbm,
            orders: orders,
            shape_class: shape_class,
            circ_class: circ_class,
            hyps_class: hyps_class,
        });
    }
    rows
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.6}", v),
        None => String::new(),
    }
}

/// The set of Strahler orders observed anywhere in the table, which bounds
/// the wide per-order columns.
pub fn observed_orders(rows: &[MasterRow]) -> Vec<i32> {
    let mut orders: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.orders.keys().copied())
        .collect();
    orders.sort();
    orders.dedup();
    orders
}

/// Writes the master table as delimited text, one row per basin.
pub fn write_master_csv(path: &str, rows: &[MasterRow]) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);

    let orders = observed_orders(rows);
    let mut header: Vec<String> = vec!["Basin_ID".to_string()];
    header.extend(NUMERIC_COLUMNS.iter().map(|c| c.to_string()));
    header.extend(
        ["Shape_Class", "Circ_Class", "Hyps_Class"]
            .iter()
            .map(|c| c.to_string()),
    );
    for k in &orders {
        header.push(format!("Nu_order{}", k));
        header.push(format!("Lu_order{}_km", k));
    }
    writeln!(writer, "{}", header.join(","))?;

    for row in rows {
        let mut cells: Vec<String> = vec![row.basin_id.clone()];
        for col in NUMERIC_COLUMNS {
            cells.push(fmt_opt(row.column(col)));
        }
        cells.push(row.shape_class.unwrap_or("").to_string());
        cells.push(row.circ_class.unwrap_or("").to_string());
        cells.push(row.hyps_class.unwrap_or("").to_string());
        for k in &orders {
            match row.orders.get(k) {
                Some((nu, lu_km)) => {
                    cells.push(nu.to_string());
                    cells.push(format!("{:.6}", lu_km));
                }
                None => {
                    cells.push(String::new());
                    cells.push(String::new());
                }
            }
        }
        writeln!(writer, "{}", cells.join(","))?;
    }
    Ok(())
}

/// Writes the hypsometric curves, one row per (basin, percentile) sample.
pub fn write_hypsometric_csv(path: &str, relief: &[ReliefRecord]) -> Result<(), Error> {
    let f = File::create(path)?;
    let mut writer = BufWriter::new(f);
    writeln!(writer, "Basin_ID,Relative_Area,Relative_Elevation")?;
    for rec in relief {
        for (rel_area, rel_elev) in &rec.hypsometric_curve {
            writeln!(writer, "{},{:.6},{:.6}", rec.basin_id, rel_area, rel_elev)?;
        }
    }
    Ok(())
}
