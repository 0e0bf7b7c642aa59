/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use crate::structures::Point2D;

/// Returns the perimeter of a ring of points. If the ring is not closed,
/// the closing segment is included.
pub fn polygon_perimeter(points: &[Point2D]) -> f64 {
    let mut ret = 0f64;
    for a in 1..points.len() {
        ret += points[a].distance(&points[a - 1]);
    }
    if !points[0].nearly_equals(&points[points.len() - 1]) {
        ret += points[points.len() - 1].distance(&points[0]);
    }
    ret
}

#[cfg(test)]
mod test {
    use super::polygon_perimeter;
    use crate::structures::Point2D;

    #[test]
    fn test_polygon_perimeter() {
        let poly = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 5.0),
            Point2D::new(0.0, 5.0),
            Point2D::new(0.0, 0.0),
        ];
        assert_eq!(polygon_perimeter(&poly), 30.0);
        // same answer without the closing vertex
        assert_eq!(polygon_perimeter(&poly[0..4]), 30.0);
    }
}
