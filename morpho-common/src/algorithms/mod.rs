// private sub-module defined in other files
mod is_clockwise_order;
mod poly_area;
mod poly_ops;
mod poly_perimeter;

// exports identifiers from private sub-modules in the current module namespace
pub use self::is_clockwise_order::is_clockwise_order;
pub use self::poly_area::polygon_area;
pub use self::poly_ops::{point_in_poly, winding_number};
pub use self::poly_perimeter::polygon_perimeter;
