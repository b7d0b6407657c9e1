//! Catalog input and map output.

pub mod fits;
