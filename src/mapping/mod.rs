//! Mass-mapping methods.
//!
//! A mapping method turns a gridded shear field into E-mode and B-mode maps.
//! Only the aperture-mass method lives in this crate; the linear
//! Kaiser-Squires inversion is an external component selected through the
//! same configuration enum.

pub mod aperture_mass;

pub use aperture_mass::{filter_u, ApertureMassMapper};

use ndarray::Array2;

use crate::diagnostics::Diagnostics;
use crate::grid::ShearGrid;

/// E/B-mode map pair handed to output consumers. For the aperture-mass
/// method both maps are noise-normalized (signal-to-noise).
#[derive(Debug, Clone)]
pub struct MassMaps {
    /// E-mode map: the lensing signal candidate.
    pub e: Array2<f64>,
    /// B-mode map: the systematics null test.
    pub b: Array2<f64>,
}

/// A mass-mapping method operating on a shear grid.
pub trait MassMapper {
    /// Method name as it appears in configuration.
    fn name(&self) -> &'static str;

    /// Produce E/B maps from a shear grid.
    fn create_maps(&self, grid: &ShearGrid, diagnostics: &mut Diagnostics) -> MassMaps;
}
