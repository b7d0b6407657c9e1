//! Weak-lensing mass mapping from shear catalogs.
//!
//! This crate grids irregularly scattered, weighted shear measurements onto
//! a regular 2-D grid under either a pixel or an RA/Dec coordinate
//! convention, then convolves the grid with a compensated aperture filter to
//! produce E-mode (signal) and B-mode (systematics) signal-to-noise maps.

pub mod catalog;
pub mod config;
pub mod coordinates;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod io;
pub mod mapping;
pub mod pipeline;

// Re-exports for easier access
pub use catalog::{CatalogError, ScaledCatalog, ShearCatalog};
pub use config::{Config, ConfigError, CoordinateSystemKind, MethodKind};
pub use coordinates::{coordinate_system, Boundaries, CoordinateSystem, MAX_GRID_SIZE};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::MapError;
pub use grid::{bin_shear_grid, ShearGrid};
pub use mapping::{filter_u, ApertureMassMapper, MassMapper, MassMaps};
pub use pipeline::{map_catalog, run, run_mapping, RunOutput};
