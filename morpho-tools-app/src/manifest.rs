/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! The machine-readable run manifest: input paths, healing counts, the
//! association predicate that was used, and the agreement summary, written
//! as JSON alongside the tabular outputs.

use crate::associate::{AssociationReport, JoinPredicate};
use crate::normalize::{HealReport, SnapResult, WorkingCrs};
use crate::prioritize::PrioritizationResult;
use serde_derive::Serialize;
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind};

#[derive(Serialize, Debug, Clone, Default)]
pub struct ManifestInputs {
    pub subbasins: String,
    pub streams: String,
    pub dem: String,
    pub flow_accumulation: Option<String>,
    pub slope: Option<String>,
    pub pour_points: Option<String>,
    pub order_field: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ManifestCrs {
    pub utm_zone: isize,
    pub band: char,
    pub epsg_code: u16,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct ManifestHeal {
    pub features_in: usize,
    pub features_out: usize,
    pub parts_dropped: usize,
    pub rings_closed: usize,
}

impl From<&HealReport> for ManifestHeal {
    fn from(r: &HealReport) -> ManifestHeal {
        ManifestHeal {
            features_in: r.features_in,
            features_out: r.features_out,
            parts_dropped: r.parts_dropped,
            rings_closed: r.rings_closed,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ManifestAssociation {
    pub predicate: String,
    pub assigned: usize,
    pub orphans: usize,
}

impl From<&AssociationReport> for ManifestAssociation {
    fn from(r: &AssociationReport) -> ManifestAssociation {
        ManifestAssociation {
            predicate: match r.predicate {
                JoinPredicate::Within => "within".to_string(),
                JoinPredicate::Intersects => "intersects".to_string(),
            },
            assigned: r.assigned,
            orphans: r.orphans,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ManifestSnap {
    pub point_num: usize,
    pub distance_m: f64,
    pub moved: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct ManifestKendall {
    pub pair: String,
    pub tau: f64,
    pub p_value: f64,
    pub agreement: String,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct RunManifest {
    pub version: String,
    pub inputs: ManifestInputs,
    pub working_crs: Option<ManifestCrs>,
    pub basin_healing: ManifestHeal,
    pub stream_healing: ManifestHeal,
    pub association: Option<ManifestAssociation>,
    pub pour_point_snaps: Vec<ManifestSnap>,
    pub excluded_columns: Vec<String>,
    pub entropy_weights: Vec<(String, f64)>,
    pub kendall: Vec<ManifestKendall>,
    pub outputs: Vec<String>,
    pub elapsed: String,
}

impl RunManifest {
    pub fn set_working_crs(&mut self, crs: &WorkingCrs) {
        self.working_crs = Some(ManifestCrs {
            utm_zone: crs.zone,
            band: crs.band,
            epsg_code: crs.epsg_code,
        });
    }

    pub fn set_snaps(&mut self, snaps: &[SnapResult]) {
        self.pour_point_snaps = snaps
            .iter()
            .map(|s| ManifestSnap {
                point_num: s.point_num,
                distance_m: s.distance_m,
                moved: s.moved,
            })
            .collect();
    }

    pub fn set_prioritization(&mut self, result: &PrioritizationResult) {
        self.excluded_columns = result.excluded_columns.clone();
        self.entropy_weights = result.entropy_weights.clone();
        self.kendall = result
            .kendall
            .iter()
            .map(|k| ManifestKendall {
                pair: k.pair.clone(),
                tau: k.tau,
                p_value: k.p_value,
                agreement: k.agreement.to_string(),
            })
            .collect();
    }

    pub fn write(&self, path: &str) -> Result<(), Error> {
        let f = File::create(path)?;
        let writer = BufWriter::new(f);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| Error::new(ErrorKind::Other, format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serializes() {
        let mut manifest = RunManifest {
            version: "1.2.0".to_string(),
            ..Default::default()
        };
        manifest.inputs.subbasins = "subbasins.shp".to_string();
        manifest.set_working_crs(&WorkingCrs {
            zone: 43,
            band: 'Q',
            epsg_code: 32643,
        });
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("\"epsg_code\":32643"));
        assert!(json.contains("subbasins.shp"));
    }
}
