//! Coordinate systems for catalog positions.
//!
//! The two supported conventions differ in how boundaries are computed and
//! how grid resolution is expressed (an absolute pixel divisor versus an
//! angular bin size), but both rasterize through the shared binner in
//! [`crate::grid`]. The sky/pixel difference in the second shear component's
//! sign lives here too, on the variant it belongs to, rather than at the
//! call sites that run the mapping.

mod pixel;
mod radec;

pub use pixel::PixelSystem;
pub use radec::SkyRaDecSystem;

use crate::catalog::{CatalogError, ScaledCatalog, ShearCatalog};
use crate::config::{Config, ConfigError, CoordinateSystemKind};
use crate::diagnostics::Diagnostics;
use crate::grid::ShearGrid;

/// Safety ceiling on either grid dimension. Grids larger than this are
/// downsampled automatically; the quadratic convolution cost and memory use
/// make anything beyond it a misconfiguration.
pub const MAX_GRID_SIZE: usize = 10_000;

/// Rectangular field extent in a coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    pub coord1_min: f64,
    pub coord1_max: f64,
    pub coord2_min: f64,
    pub coord2_max: f64,
    /// Axis label for the first coordinate, e.g. "X" or "RA".
    pub coord1_name: &'static str,
    /// Axis label for the second coordinate, e.g. "Y" or "Dec".
    pub coord2_name: &'static str,
    /// Unit label for both axes.
    pub units: &'static str,
}

impl Boundaries {
    pub fn coord1_span(&self) -> f64 {
        self.coord1_max - self.coord1_min
    }

    pub fn coord2_span(&self) -> f64 {
        self.coord2_max - self.coord2_min
    }
}

/// Grid parameters resolved from method-specific configuration.
#[derive(Debug, Clone, Copy)]
pub struct GridParameters {
    /// Spatial binning divisor applied to pixel systems.
    pub downsample_factor: f64,
    /// Ceiling on either grid dimension.
    pub max_grid_size: usize,
}

/// Behaviour shared by every coordinate convention.
pub trait CoordinateSystem {
    /// Multiplier applied to the second shear component before mapping.
    /// Sky conventions flip it; pixel conventions do not.
    fn shear_sign(&self) -> f64;

    /// Derive the scaled working-frame coordinates for a catalog. The input
    /// catalog is not modified.
    fn transform_coordinates(&self, catalog: &ShearCatalog) -> ScaledCatalog;

    /// Compute `(scaled, true)` field boundaries from raw coordinate
    /// extremes. Fails on empty input.
    fn calculate_boundaries(
        &self,
        coord1: &[f64],
        coord2: &[f64],
        diagnostics: &mut Diagnostics,
    ) -> Result<(Boundaries, Boundaries), CatalogError>;

    /// Resolve grid parameters from the method-specific configuration.
    fn grid_parameters(&self, config: &Config, diagnostics: &mut Diagnostics) -> GridParameters;

    /// Bin a transformed catalog into a shear grid over the scaled
    /// boundaries, enforcing the grid-size ceiling where it applies.
    fn create_grid(
        &self,
        catalog: &ScaledCatalog,
        boundaries: &Boundaries,
        config: &Config,
        diagnostics: &mut Diagnostics,
    ) -> Result<ShearGrid, ConfigError>;
}

/// Look up the coordinate system for a configured kind.
pub fn coordinate_system(kind: CoordinateSystemKind) -> Box<dyn CoordinateSystem> {
    match kind {
        CoordinateSystemKind::Pixel => Box::new(PixelSystem),
        CoordinateSystemKind::RaDec => Box::new(SkyRaDecSystem),
    }
}

/// Min and max of a coordinate column, or `None` when it is empty.
pub(crate) fn extremes(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_of_empty_slice_is_none() {
        assert_eq!(extremes(&[]), None);
    }

    #[test]
    fn extremes_finds_min_and_max() {
        assert_eq!(extremes(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    }

    #[test]
    fn factory_matches_sign_convention() {
        assert_eq!(
            coordinate_system(CoordinateSystemKind::Pixel).shear_sign(),
            1.0
        );
        assert_eq!(
            coordinate_system(CoordinateSystemKind::RaDec).shear_sign(),
            -1.0
        );
    }
}
