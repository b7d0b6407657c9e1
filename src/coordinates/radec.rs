//! Equatorial sky coordinate system (RA/Dec in degrees).
//!
//! Right ascension compresses with declination: one degree of RA subtends
//! `cos(dec)` degrees on the sky. The working frame multiplies RA offsets
//! from the field centre by `cos(dec)` so that distances are locally
//! isotropic and the shared binner can treat both axes alike. Reported
//! "true" boundaries apply the same correction to the RA extent so a field
//! does not appear to widen at high declination.

use crate::catalog::{CatalogError, ScaledCatalog, ShearCatalog};
use crate::config::{Config, ConfigError};
use crate::diagnostics::Diagnostics;
use crate::grid::{bin_shear_grid, ShearGrid};

use super::{extremes, Boundaries, CoordinateSystem, GridParameters, MAX_GRID_SIZE};

/// RA/Dec sky coordinates with a declination-compressed working frame.
pub struct SkyRaDecSystem;

impl SkyRaDecSystem {
    /// RA midpoint used as the compression origin.
    fn ra_center(coord1: &[f64]) -> f64 {
        let (ra_min, ra_max) = extremes(coord1).unwrap_or((0.0, 0.0));
        0.5 * (ra_min + ra_max)
    }

    /// Compress RA offsets from the field centre by each record's own
    /// declination cosine.
    fn scale_ra(coord1: &[f64], coord2: &[f64]) -> Vec<f64> {
        let ra_center = Self::ra_center(coord1);
        coord1
            .iter()
            .zip(coord2)
            .map(|(&ra, &dec)| ra_center + (ra - ra_center) * dec.to_radians().cos())
            .collect()
    }
}

impl CoordinateSystem for SkyRaDecSystem {
    fn shear_sign(&self) -> f64 {
        // RA increases eastward while the grid x axis increases westward;
        // the parity flip negates the second shear component.
        -1.0
    }

    fn transform_coordinates(&self, catalog: &ShearCatalog) -> ScaledCatalog {
        let coord1_scaled = Self::scale_ra(catalog.coord1(), catalog.coord2());
        let coord2_scaled = catalog.coord2().to_vec();
        ScaledCatalog::new(catalog.clone(), coord1_scaled, coord2_scaled)
    }

    fn calculate_boundaries(
        &self,
        coord1: &[f64],
        coord2: &[f64],
        _diagnostics: &mut Diagnostics,
    ) -> Result<(Boundaries, Boundaries), CatalogError> {
        let (ra_min, ra_max) = extremes(coord1).ok_or(CatalogError::Empty)?;
        let (dec_min, dec_max) = extremes(coord2).ok_or(CatalogError::Empty)?;

        // Scaled boundaries span the exact extremes of the working-frame
        // coordinates, so every transformed record is contained.
        let scaled_ra = Self::scale_ra(coord1, coord2);
        let (scaled_ra_min, scaled_ra_max) =
            extremes(&scaled_ra).ok_or(CatalogError::Empty)?;
        let scaled = Boundaries {
            coord1_min: scaled_ra_min,
            coord1_max: scaled_ra_max,
            coord2_min: dec_min,
            coord2_max: dec_max,
            coord1_name: "RA",
            coord2_name: "Dec",
            units: "deg",
        };

        // True boundaries stay centred on the field but shrink the RA extent
        // by the mid-field declination cosine.
        let ra_center = 0.5 * (ra_min + ra_max);
        let dec_center = 0.5 * (dec_min + dec_max);
        let ra_half_extent = 0.5 * (ra_max - ra_min) * dec_center.to_radians().cos();
        let truth = Boundaries {
            coord1_min: ra_center - ra_half_extent,
            coord1_max: ra_center + ra_half_extent,
            coord2_min: dec_min,
            coord2_max: dec_max,
            coord1_name: "RA",
            coord2_name: "Dec",
            units: "deg",
        };

        Ok((scaled, truth))
    }

    fn grid_parameters(&self, _config: &Config, _diagnostics: &mut Diagnostics) -> GridParameters {
        // Sky grids are sized from the angular resolution, not a divisor.
        GridParameters {
            downsample_factor: 1.0,
            max_grid_size: MAX_GRID_SIZE,
        }
    }

    fn create_grid(
        &self,
        catalog: &ScaledCatalog,
        boundaries: &Boundaries,
        config: &Config,
        _diagnostics: &mut Diagnostics,
    ) -> Result<ShearGrid, ConfigError> {
        let resolution_arcmin = config
            .radec
            .resolution
            .ok_or(ConfigError::MissingKey("radec.resolution"))?;

        let n_cols = (boundaries.coord1_span() * 60.0 / resolution_arcmin)
            .ceil()
            .max(1.0) as usize;
        let n_rows = (boundaries.coord2_span() * 60.0 / resolution_arcmin)
            .ceil()
            .max(1.0) as usize;

        let base = catalog.catalog();
        Ok(bin_shear_grid(
            catalog.coord1_scaled(),
            catalog.coord2_scaled(),
            base.g1(),
            base.g2(),
            base.weight(),
            boundaries,
            n_rows,
            n_cols,
        ))
    }
}
