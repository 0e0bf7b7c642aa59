/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

use crate::structures::Point2D;

/// Tests whether a point is within a polygon using the winding number (wn).
/// The point falls within the test polygon if the winding number is odd.
/// Notice that points on the edge of the poly will be deemed outside.
///
/// Input:   p = a point,
///          poly[] = vertex points of a polygon v[n+1] with v[n]=v[0]
pub fn point_in_poly(p: &Point2D, poly: &[Point2D]) -> bool {
    winding_number(p, poly) % 2 != 0i32
}

/// Calculates the winding number (wn) of a point with respect to a closed
/// ring of vertices. The point falls within the ring if the winding number
/// is non-zero.
///
/// Input:   p = a point,
///          poly[] = vertex points of a polygon poly[n+1] with poly[n]=poly[0]
pub fn winding_number(p: &Point2D, poly: &[Point2D]) -> i32 {
    if !poly[0].nearly_equals(&poly[poly.len() - 1]) {
        panic!(
            "Error (from poly_ops::winding_number): point sequence does not form a closed polygon."
        );
    }
    let mut wn = 0i32;
    // loop through all edges of the polygon
    for i in 0..poly.len() - 1 {
        // edge from poly[i] to poly[i+1]
        if poly[i].y <= p.y {
            if poly[i + 1].y > p.y {
                // an upward crossing
                if p.is_left(&poly[i], &poly[i + 1]) > 0f64 {
                    wn += 1i32; // have a valid up intersect
                }
            }
        } else {
            if poly[i + 1].y <= p.y {
                // a downward crossing
                if p.is_left(&poly[i], &poly[i + 1]) < 0f64 {
                    wn -= 1i32; // have a valid down intersect
                }
            }
        }
    }
    wn
}
