//! Detector pixel coordinate system.

use crate::catalog::{CatalogError, ScaledCatalog, ShearCatalog};
use crate::config::{Config, ConfigError};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::grid::{bin_shear_grid, ShearGrid};

use super::{extremes, Boundaries, CoordinateSystem, GridParameters, MAX_GRID_SIZE};

/// Coordinate span beyond which pixel input is suspect; fields this wide are
/// usually sky coordinates routed to the wrong system.
const SUSPECT_RANGE: f64 = 1e5;

/// Pixel coordinates: the working frame is the native frame, and grid
/// resolution is an integer-ish downsampling of the pixel scale.
pub struct PixelSystem;

impl CoordinateSystem for PixelSystem {
    fn shear_sign(&self) -> f64 {
        1.0
    }

    fn transform_coordinates(&self, catalog: &ShearCatalog) -> ScaledCatalog {
        // Identity: scaled coordinates equal the raw pixel positions.
        ScaledCatalog::new(
            catalog.clone(),
            catalog.coord1().to_vec(),
            catalog.coord2().to_vec(),
        )
    }

    fn calculate_boundaries(
        &self,
        coord1: &[f64],
        coord2: &[f64],
        diagnostics: &mut Diagnostics,
    ) -> Result<(Boundaries, Boundaries), CatalogError> {
        let (x_min, x_max) = extremes(coord1).ok_or(CatalogError::Empty)?;
        let (y_min, y_max) = extremes(coord2).ok_or(CatalogError::Empty)?;

        for (axis, span) in [("X", x_max - x_min), ("Y", y_max - y_min)] {
            if span > SUSPECT_RANGE {
                diagnostics.record(Diagnostic::LargeCoordinateRange { axis, span });
            }
        }

        let boundaries = Boundaries {
            coord1_min: x_min.floor(),
            coord1_max: x_max.ceil(),
            coord2_min: y_min.floor(),
            coord2_max: y_max.ceil(),
            coord1_name: "X",
            coord2_name: "Y",
            units: "pixels",
        };

        // No scaling in pixel space: scaled and true boundaries coincide.
        Ok((boundaries.clone(), boundaries))
    }

    fn grid_parameters(&self, config: &Config, diagnostics: &mut Diagnostics) -> GridParameters {
        let downsample_factor = match config.pixel.downsample_factor {
            Some(factor) => factor,
            None => {
                diagnostics.record(Diagnostic::DefaultApplied {
                    key: "pixel.downsample_factor",
                    value: 1.0,
                });
                1.0
            }
        };
        GridParameters {
            downsample_factor,
            max_grid_size: MAX_GRID_SIZE,
        }
    }

    fn create_grid(
        &self,
        catalog: &ScaledCatalog,
        boundaries: &Boundaries,
        config: &Config,
        diagnostics: &mut Diagnostics,
    ) -> Result<ShearGrid, ConfigError> {
        let params = self.grid_parameters(config, diagnostics);
        let mut downsample = params.downsample_factor;

        let raw_cols = boundaries.coord1_span().ceil().max(1.0);
        let raw_rows = boundaries.coord2_span().ceil().max(1.0);

        let mut n_cols = (raw_cols / downsample).ceil() as usize;
        let mut n_rows = (raw_rows / downsample).ceil() as usize;

        if n_cols > params.max_grid_size || n_rows > params.max_grid_size {
            let requested = (n_rows, n_cols);
            // Smallest factor that brings the larger raw dimension under the
            // ceiling; never lower than what was configured.
            let min_downsample = raw_cols.max(raw_rows) / params.max_grid_size as f64;
            downsample = downsample.max(min_downsample);
            n_cols = (raw_cols / downsample).ceil() as usize;
            n_rows = (raw_rows / downsample).ceil() as usize;
            diagnostics.record(Diagnostic::GridSizeAdjusted {
                requested,
                adjusted: (n_rows, n_cols),
                downsample_factor: downsample,
            });
        }

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
