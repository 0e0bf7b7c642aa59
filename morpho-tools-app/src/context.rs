/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use morpho_common::algorithms::{point_in_poly, polygon_area, polygon_perimeter};
use morpho_common::structures::{BoundingBox, Point2D};
use morpho_raster::Raster;

/// One ring of a basin polygon. The first ring of a `Basin` is always the
/// outer boundary; any further rings are holes.
#[derive(Debug, Clone)]
pub struct BasinRing {
    pub points: Vec<Point2D>,
    pub is_hole: bool,
}

/// A single-part subbasin polygon. Geometry is fixed once loaded; derived
/// morphometric fields live in the stage output tables, not here.
#[derive(Debug, Clone)]
pub struct Basin {
    pub basin_id: String,
    pub rings: Vec<BasinRing>,
    pub bbox: BoundingBox,
    pub area_m2: f64,
    pub perimeter_m: f64,
}

impl Basin {
    /// Builds a basin from its rings, computing the bounding box, the area
    /// net of holes, and the outer-ring perimeter.
    pub fn from_rings(basin_id: &str, rings: Vec<BasinRing>) -> Basin {
        let mut bbox = BoundingBox::default();
        let mut area = 0f64;
        let mut perimeter = 0f64;
        for ring in &rings {
            let a = polygon_area(&ring.points);
            if ring.is_hole {
                area -= a;
            } else {
                area += a;
                perimeter += polygon_perimeter(&ring.points);
                for p in &ring.points {
                    bbox.expand_to_point(*p);
                }
            }
        }
        Basin {
            basin_id: basin_id.to_string(),
            rings: rings,
            bbox: bbox,
            area_m2: area.max(0f64),
            perimeter_m: perimeter,
        }
    }

    /// True when the point lies inside the outer boundary and outside
    /// every hole.
    pub fn contains(&self, p: &Point2D) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            if !ring.is_hole && point_in_poly(p, &ring.points) {
                inside = true;
                break;
            }
        }
        if !inside {
            return false;
        }
        for ring in &self.rings {
            if ring.is_hole && point_in_poly(p, &ring.points) {
                return false;
            }
        }
        true
    }
}

/// A single-part stream reach carrying its Strahler order. `basin_id` is
/// filled in by the basin-stream association stage; segments left unassigned
/// are kept in the layer but excluded from per-basin aggregates.
#[derive(Debug, Clone)]
pub struct StreamSegment {
    pub points: Vec<Point2D>,
    pub order: i32,
    pub length_m: f64,
    pub basin_id: Option<String>,
}

impl StreamSegment {
    pub fn new(points: Vec<Point2D>, order: i32) -> StreamSegment {
        let mut length = 0f64;
        for i in 1..points.len() {
            length += points[i - 1].distance(&points[i]);
        }
        StreamSegment {
            points: points,
            order: order,
            length_m: length,
            basin_id: None,
        }
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

/// The immutable bundle of normalized inputs shared by every analysis stage.
/// Stages take it by shared reference and return new derived tables; nothing
/// downstream of the normalizer mutates it.
pub struct AnalysisContext {
    pub dem: Raster,
    pub slope: Raster,
    pub tri: Raster,
    pub flow_accum: Option<Raster>,
    pub epsg_code: u16,
    pub basins: Vec<Basin>,
    pub streams: Vec<StreamSegment>,
}

impl AnalysisContext {
    /// The stream segments assigned to one basin.
    pub fn streams_of<'a>(&'a self, basin_id: &str) -> Vec<&'a StreamSegment> {
        self.streams
            .iter()
            .filter(|s| s.basin_id.as_deref() == Some(basin_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64, reverse: bool) -> Vec<Point2D> {
        let mut pts = vec![
            Point2D::new(x0, y0),
            Point2D::new(x0, y0 + size),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0, y0),
        ];
        if reverse {
            pts.reverse();
        }
        pts
    }

    #[test]
    fn test_area_net_of_holes() {
        let rings = vec![
            BasinRing {
                points: square(0.0, 0.0, 100.0, false),
                is_hole: false,
            },
            BasinRing {
                points: square(10.0, 10.0, 10.0, true),
                is_hole: true,
            },
        ];
        let basin = Basin::from_rings("SB1", rings);
        assert!((basin.area_m2 - 9900.0).abs() < 1e-9);
        assert!((basin.perimeter_m - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_honours_holes() {
        let rings = vec![
            BasinRing {
                points: square(0.0, 0.0, 100.0, false),
                is_hole: false,
            },
            BasinRing {
                points: square(40.0, 40.0, 20.0, true),
                is_hole: true,
            },
        ];
        let basin = Basin::from_rings("SB1", rings);
        assert!(basin.contains(&Point2D::new(5.0, 5.0)));
        assert!(!basin.contains(&Point2D::new(50.0, 50.0))); // inside the hole
        assert!(!basin.contains(&Point2D::new(150.0, 50.0)));
    }

    #[test]
    fn test_segment_length() {
        let seg = StreamSegment::new(
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(30.0, 40.0),
                Point2D::new(30.0, 100.0),
            ],
            2,
        );
        assert!((seg.length_m - 110.0).abs() < 1e-9);
        assert_eq!(seg.order, 2);
        assert!(seg.basin_id.is_none());
    }
}
