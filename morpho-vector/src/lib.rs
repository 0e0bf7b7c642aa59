/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

pub mod shapefile;

// exports identifiers from sub-modules in the current module namespace
pub use crate::shapefile::attributes::*;
pub use crate::shapefile::geometry::*;
pub use crate::shapefile::Shapefile;
