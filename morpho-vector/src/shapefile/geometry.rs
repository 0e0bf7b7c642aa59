/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use morpho_common::algorithms::is_clockwise_order;
use morpho_common::structures::{BoundingBox, Point2D};
use std::fmt;
use std::io::{Error, ErrorKind};

/// The ESRI Shapefile geometry types. Z and M variants are recognized on
/// read but their measure payloads are discarded; only the planimetric
/// types can be written.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum ShapeType {
    #[default]
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Result<ShapeType, Error> {
        match value {
            0 => Ok(ShapeType::Null),
            1 => Ok(ShapeType::Point),
            3 => Ok(ShapeType::PolyLine),
            5 => Ok(ShapeType::Polygon),
            8 => Ok(ShapeType::MultiPoint),
            11 => Ok(ShapeType::PointZ),
            13 => Ok(ShapeType::PolyLineZ),
            15 => Ok(ShapeType::PolygonZ),
            18 => Ok(ShapeType::MultiPointZ),
            21 => Ok(ShapeType::PointM),
            23 => Ok(ShapeType::PolyLineM),
            25 => Ok(ShapeType::PolygonM),
            28 => Ok(ShapeType::MultiPointM),
            _ => Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unrecognized ShapeType code {}", value),
            )),
        }
    }

    pub fn to_int(&self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
        }
    }

    /// Maps the Z and M variants onto their planimetric base type.
    pub fn base_shape_type(&self) -> ShapeType {
        match self {
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeType::Point,
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeType::PolyLine
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => ShapeType::Polygon,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeType::MultiPoint
            }
            ShapeType::Null => ShapeType::Null,
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single shapefile record geometry. Multi-part features hold the start
/// index of each part within `points`.
#[derive(Default, Clone, Debug)]
pub struct ShapefileGeometry {
    pub shape_type: ShapeType,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub num_parts: i32,
    pub num_points: i32,
    pub parts: Vec<i32>,
    pub points: Vec<Point2D>,
}

impl ShapefileGeometry {
    pub fn new(shape_type: ShapeType) -> ShapefileGeometry {
        ShapefileGeometry {
            shape_type: shape_type,
            ..Default::default()
        }
    }

    /// Adds a part from a slice of points, updating the feature extent.
    pub fn add_part(&mut self, points: &[Point2D]) {
        self.parts.push(self.points.len() as i32);
        self.num_parts += 1;
        for p in points {
            self.points.push(*p);
            self.num_points += 1;
        }
        self.recalculate_extent();
    }

    /// Adds a single point, used with `ShapeType::Point` records.
    pub fn add_point(&mut self, p: Point2D) {
        self.points.push(p);
        self.num_points += 1;
        self.recalculate_extent();
    }

    /// The index range `[start, end)` of a part's points.
    pub fn part_range(&self, part_num: usize) -> (usize, usize) {
        let start = self.parts[part_num] as usize;
        let end = if part_num < self.parts.len() - 1 {
            self.parts[part_num + 1] as usize
        } else {
            self.points.len()
        };
        (start, end)
    }

    pub fn get_part_points(&self, part_num: usize) -> &[Point2D] {
        let (start, end) = self.part_range(part_num);
        &self.points[start..end]
    }

    /// Record content length in bytes, including the leading shape type,
    /// as required by the .shp and .shx record headers.
    pub fn get_length(&self) -> i32 {
        match self.shape_type.base_shape_type() {
            ShapeType::Null => 4,
            ShapeType::Point => 4 + 16,
            ShapeType::PolyLine | ShapeType::Polygon => {
                4 + 32 + 8 + 4 * self.num_parts + 16 * self.num_points
            }
            _ => 0,
        }
    }

    /// In polygon records, hole rings are stored in counter-clockwise
    /// order while outer rings are clockwise.
    pub fn is_hole(&self, part_num: i32) -> bool {
        if part_num < 0 || part_num >= self.num_parts {
            return false;
        }
        let pts = self.get_part_points(part_num as usize);
        if pts.len() < 3 {
            return false;
        }
        !is_clockwise_order(pts)
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    fn recalculate_extent(&mut self) {
        let bb = BoundingBox::from_points(&self.points);
        self.x_min = bb.min_x;
        self.x_max = bb.max_x;
        self.y_min = bb.min_y;
        self.y_max = bb.max_y;
    }
}

#[cfg(test)]
mod test {
    use super::{ShapeType, ShapefileGeometry};
    use morpho_common::structures::Point2D;

    #[test]
    fn test_shape_type_codes() {
        assert_eq!(ShapeType::from_int(5).unwrap(), ShapeType::Polygon);
        assert_eq!(ShapeType::Polygon.to_int(), 5);
        assert_eq!(ShapeType::PolyLineZ.base_shape_type(), ShapeType::PolyLine);
        assert!(ShapeType::from_int(99).is_err());
    }

    #[test]
    fn test_multipart_geometry() {
        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        sfg.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)]);
        sfg.add_part(&[Point2D::new(5.0, 5.0), Point2D::new(5.0, 9.0)]);
        assert_eq!(sfg.num_parts, 2);
        assert_eq!(sfg.num_points, 4);
        assert_eq!(sfg.part_range(0), (0, 2));
        assert_eq!(sfg.part_range(1), (2, 4));
        assert_eq!(sfg.x_max, 5.0);
        assert_eq!(sfg.y_max, 9.0);
        // content: 4 type + 32 bbox + 8 counts + 2*4 parts + 4*16 points
        assert_eq!(sfg.get_length(), 116);
    }

    #[test]
    fn test_hole_detection() {
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        // outer ring, clockwise
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        // hole ring, counter-clockwise
        sfg.add_part(&[
            Point2D::new(2.0, 2.0),
            Point2D::new(8.0, 2.0),
            Point2D::new(8.0, 8.0),
            Point2D::new(2.0, 8.0),
            Point2D::new(2.0, 2.0),
        ]);
        assert!(!sfg.is_hole(0));
        assert!(sfg.is_hole(1));
    }
}
