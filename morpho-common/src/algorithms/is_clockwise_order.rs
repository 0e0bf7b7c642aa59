/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use crate::structures::Point2D;

/// Checks whether a sequence of Point2D are in clockwise order, based on
/// the signed area of the ring. The closing (duplicated) vertex may be
/// present or absent.
pub fn is_clockwise_order(points: &[Point2D]) -> bool {
    let end_point = if points[0] == points[points.len() - 1] {
        // The last point is the same as the first; exclude it.
        points.len() - 1
    } else {
        points.len()
    };

    if end_point < 3 {
        return false;
    } // something's wrong!

    let mut area = 0f64;
    for j in 0..end_point {
        let n1 = j;
        let n2 = if j < end_point - 1 { j + 1 } else { 0 };
        area += points[n1].x * points[n2].y - points[n2].x * points[n1].y;
    }
    // a positive signed area indicates counter-clockwise order
    area / 2.0 < 0f64
}

#[cfg(test)]
mod test {
    use super::is_clockwise_order;
    use crate::structures::Point2D;

    #[test]
    fn test_is_clockwise_order() {
        let mut points: Vec<Point2D> = Vec::new();
        points.push(Point2D::new(0f64, 0f64));
        points.push(Point2D::new(1f64, 0f64));
        points.push(Point2D::new(1f64, 1f64));
        points.push(Point2D::new(0f64, 1f64));
        points.push(Point2D::new(0f64, 0f64));

        assert_eq!(is_clockwise_order(&points), false);

        points.reverse();
        assert_eq!(is_clockwise_order(&points), true);
    }
}
