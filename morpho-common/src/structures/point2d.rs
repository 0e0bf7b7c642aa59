/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::f64;
use std::fmt;
use std::ops::{Add, Sub};

const EPSILON: f64 = f64::EPSILON * 2.0;

/// A 2-D point, with x and y fields.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x: x, y: y }
    }

    /// Euclidean distance between this point and another.
    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)).sqrt()
    }

    pub fn midpoint(p1: &Point2D, p2: &Point2D) -> Point2D {
        Point2D::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
    }

    /// Tests whether the coordinates of two points are identical to
    /// within floating-point tolerance.
    pub fn nearly_equals(&self, other: &Point2D) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    /// Tests if this point is Left|On|Right of the infinite line through p0 and p1.
    /// Returns > 0 for left, = 0 for on, and < 0 for right of the line.
    pub fn is_left(&self, p0: &Point2D, p1: &Point2D) -> f64 {
        (p1.x - p0.x) * (self.y - p0.y) - (self.x - p0.x) * (p1.y - p0.y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, other: Point2D) -> Point2D {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, other: Point2D) -> Point2D {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}
