/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use super::Point2D;
use std::f64;

/// An axis-aligned rectangle described by its minimum and maximum
/// coordinates. A default `BoundingBox` is initialized such that the
/// first call to `expand_to` sets all four edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x: min_x,
            max_x: max_x,
            min_y: min_y,
            max_y: max_y,
        }
    }

    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            bb.expand_to_point(*p);
        }
        bb
    }

    pub fn is_initialized(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn expand_to_point(&mut self, p: Point2D) {
        if p.x < self.min_x {
            self.min_x = p.x;
        }
        if p.x > self.max_x {
            self.max_x = p.x;
        }
        if p.y < self.min_y {
            self.min_y = p.y;
        }
        if p.y > self.max_y {
            self.max_y = p.y;
        }
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        if other.min_x < self.min_x {
            self.min_x = other.min_x;
        }
        if other.max_x > self.max_x {
            self.max_x = other.max_x;
        }
        if other.min_y < self.min_y {
            self.min_y = other.min_y;
        }
        if other.max_y > self.max_y {
            self.max_y = other.max_y;
        }
    }

    pub fn contains_point(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use crate::structures::Point2D;

    #[test]
    fn test_expand_to_point() {
        let mut bb = BoundingBox::default();
        assert!(!bb.is_initialized());
        bb.expand_to_point(Point2D::new(1.0, 2.0));
        bb.expand_to_point(Point2D::new(-1.0, 5.0));
        assert!(bb.is_initialized());
        assert_eq!(bb, BoundingBox::new(-1.0, 1.0, 2.0, 5.0));
    }

    #[test]
    fn test_overlaps() {
        let bb1 = BoundingBox::new(0.0, 5.0, 0.0, 5.0);
        let bb2 = BoundingBox::new(4.0, 9.0, 4.0, 9.0);
        let bb3 = BoundingBox::new(6.0, 9.0, 6.0, 9.0);
        assert!(bb1.overlaps(bb2));
        assert!(!bb1.overlaps(bb3));
    }

    #[test]
    fn test_contains_point() {
        let bb = BoundingBox::new(0.0, 5.0, 0.0, 5.0);
        assert!(bb.contains_point(Point2D::new(2.5, 2.5)));
        assert!(!bb.contains_point(Point2D::new(5.1, 2.5)));
    }
}
