/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

pub mod algorithms;
pub mod structures;
pub mod utils;
