/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use crate::structures::Point2D;

/// Returns the unsigned area of a ring of points, by the shoelace formula.
/// The closing (duplicated) vertex may be present or absent.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let end_point = if points[0] == points[points.len() - 1] {
        points.len() - 1
    } else {
        points.len()
    };
    if end_point < 3 {
        return 0f64;
    }
    let mut area = 0f64;
    for j in 0..end_point {
        let n1 = j;
        let n2 = if j < end_point - 1 { j + 1 } else { 0 };
        area += points[n1].x * points[n2].y - points[n2].x * points[n1].y;
    }
    (area / 2.0).abs()
}
