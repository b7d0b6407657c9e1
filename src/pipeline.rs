//! Run orchestration: configuration to finished maps.
//!
//! The flow follows the data model: select a coordinate system, load the
//! catalog, compute boundaries from the raw coordinates, transform into the
//! working frame, bin into a shear grid, apply the system's shear sign
//! convention, then run the configured mapping method.

use std::path::Path;

use log::{debug, info};

use crate::catalog::ShearCatalog;
use crate::config::{Config, ConfigError, MethodKind};
use crate::coordinates::{coordinate_system, Boundaries};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::MapError;
use crate::io::fits::{load_shear_catalog, write_mass_maps};
use crate::mapping::{ApertureMassMapper, MassMapper, MassMaps};

/// Everything a mapping run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// E/B maps from the configured method.
    pub maps: MassMaps,
    /// Boundaries in the scaled (binning) frame.
    pub scaled_boundaries: Boundaries,
    /// Boundaries in the reported (true) frame.
    pub true_boundaries: Boundaries,
    /// Recoverable conditions observed along the way.
    pub diagnostics: Diagnostics,
}

/// Build the configured mapping method.
fn make_mapper(
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Box<dyn MassMapper>, ConfigError> {
    match config.method {
        MethodKind::ApertureMass => {
            let scale = match config.filter.scale {
                Some(scale) => scale,
                None => {
                    diagnostics.record(Diagnostic::DefaultApplied {
                        key: "filter.scale",
                        value: 1.0,
                    });
                    1.0
                }
            };
            Ok(Box::new(ApertureMassMapper::new(scale)))
        }
        MethodKind::KaiserSquires => Err(ConfigError::MethodUnavailable("kaiser_squires")),
    }
}

/// Map an already-loaded catalog. This is the whole pipeline minus file I/O,
/// which keeps it directly testable on synthetic catalogs.
pub fn map_catalog(catalog: &ShearCatalog, config: &Config) -> Result<RunOutput, MapError> {
    let mut diagnostics = Diagnostics::new();
    let system = coordinate_system(config.coordinate_system);

    let (scaled_boundaries, true_boundaries) =
        system.calculate_boundaries(catalog.coord1(), catalog.coord2(), &mut diagnostics)?;
    debug!(
        "field: {} {:.4}..{:.4}, {} {:.4}..{:.4} ({})",
        true_boundaries.coord1_name,
        true_boundaries.coord1_min,
        true_boundaries.coord1_max,
        true_boundaries.coord2_name,
        true_boundaries.coord2_min,
        true_boundaries.coord2_max,
        true_boundaries.units,
    );

    let transformed = system.transform_coordinates(catalog);
    let mut grid = system.create_grid(&transformed, &scaled_boundaries, config, &mut diagnostics)?;

    // Sign convention is a property of the coordinate system, applied once
    // before any method sees the grid.
    let sign = system.shear_sign();
    if sign != 1.0 {
        grid.g2.mapv_inplace(|v| sign * v);
    }

    let mapper = make_mapper(config, &mut diagnostics)?;
    let (n_rows, n_cols) = grid.shape();
    info!(
        "running {} on a {}x{} grid",
        mapper.name(),
        n_rows,
        n_cols
    );
    let maps = mapper.create_maps(&grid, &mut diagnostics);

    Ok(RunOutput {
        maps,
        scaled_boundaries,
        true_boundaries,
        diagnostics,
    })
}

/// Run a full mapping from configuration: load the catalog, map it, and
/// persist the result when an output path is configured.
pub fn run_mapping(config: &Config) -> Result<RunOutput, MapError> {
    let catalog = load_shear_catalog(&config.input_path, &config.columns, config.input_hdu)?;
    let output = map_catalog(&catalog, config)?;

    if let Some(output_path) = &config.output_path {
        write_mass_maps(output_path, &output.maps, &output.true_boundaries)
            .map_err(MapError::from)?;
    }

    Ok(output)
}

/// Entry point for the CLI: parse a configuration file and run it.
pub fn run<P: AsRef<Path>>(config_path: P) -> Result<RunOutput, MapError> {
    let config = Config::from_file(config_path)?;
    run_mapping(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ColumnConfig, CoordinateSystemKind, FilterConfig, PixelConfig, RadecConfig,
    };

    fn pixel_config() -> Config {
        Config {
            coordinate_system: CoordinateSystemKind::Pixel,
            method: MethodKind::ApertureMass,
            input_path: "unused.fits".into(),
            input_hdu: None,
            columns: ColumnConfig {
                coord1: "x".into(),
                coord2: "y".into(),
                g1: "g1".into(),
                g2: "g2".into(),
                weight: "w".into(),
            },
            pixel: PixelConfig {
                downsample_factor: Some(1.0),
            },
            radec: RadecConfig::default(),
            filter: FilterConfig { scale: Some(2.0) },
            output_path: None,
        }
    }

    #[test]
    fn kaiser_squires_is_reported_unavailable() {
        let mut config = pixel_config();
        config.method = MethodKind::KaiserSquires;
        let mut diagnostics = Diagnostics::new();
        let result = make_mapper(&config, &mut diagnostics);
        assert!(matches!(
            result,
            Err(ConfigError::MethodUnavailable("kaiser_squires"))
        ));
    }

    #[test]
    fn missing_filter_scale_defaults_with_warning() {
        let mut config = pixel_config();
        config.filter.scale = None;
        let mut diagnostics = Diagnostics::new();
        let mapper = make_mapper(&config, &mut diagnostics).unwrap();
        assert_eq!(mapper.name(), "aperture_mass");
        assert!(matches!(
            diagnostics.records()[0],
            Diagnostic::DefaultApplied {
                key: "filter.scale",
                value
            } if value == 1.0
        ));
    }
}
