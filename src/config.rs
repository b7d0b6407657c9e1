//! Run configuration model.
//!
//! A run is described by a single JSON document naming the coordinate system,
//! the mapping method, the input catalog and its column names, plus optional
//! per-method sections. Unknown keys are ignored; optional keys fall back to
//! documented defaults and the fallback is reported through the diagnostics
//! channel by whoever applies it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or names an unknown variant
    /// (for example an unrecognized mapping method).
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A required key has no value and no default.
    #[error("missing required configuration key `{0}`")]
    MissingKey(&'static str),

    /// The named method is recognized but provided by an external component,
    /// not this crate.
    #[error("mapping method `{0}` is not available here")]
    MethodUnavailable(&'static str),
}

/// Which coordinate convention the catalog positions use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystemKind {
    /// Detector pixel coordinates.
    #[serde(rename = "pixel")]
    Pixel,
    /// Right ascension / declination in degrees.
    #[serde(rename = "radec")]
    RaDec,
}

/// Which mass-mapping method to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    /// Direct-space aperture-mass convolution.
    #[serde(rename = "aperture_mass")]
    ApertureMass,
    /// Linear Fourier-space inversion, supplied by an external component.
    #[serde(rename = "kaiser_squires")]
    KaiserSquires,
}

/// Catalog column names in the input table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// First coordinate column (X or RA).
    pub coord1: String,
    /// Second coordinate column (Y or Dec).
    pub coord2: String,
    /// First shear component column.
    pub g1: String,
    /// Second shear component column.
    pub g2: String,
    /// Per-object weight column.
    pub weight: String,
}

/// Pixel-system options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PixelConfig {
    /// Spatial binning divisor; defaults to 1 when absent.
    pub downsample_factor: Option<f64>,
}

/// Sky-system options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadecConfig {
    /// Angular bin size in arcminutes. Required when the coordinate system
    /// is `radec`.
    pub resolution: Option<f64>,
}

/// Aperture-mass filter options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Aperture scale radius in grid pixels; defaults to 1.0 when absent.
    pub scale: Option<f64>,
}

/// Full run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Coordinate convention of the catalog positions.
    pub coordinate_system: CoordinateSystemKind,
    /// Mapping method to run.
    pub method: MethodKind,
    /// Path of the input catalog table.
    pub input_path: PathBuf,
    /// Table extension (HDU) index holding the catalog; defaults to the
    /// first extension.
    #[serde(default)]
    pub input_hdu: Option<usize>,
    /// Catalog column names.
    pub columns: ColumnConfig,
    /// Pixel-system options.
    #[serde(default)]
    pub pixel: PixelConfig,
    /// Sky-system options.
    #[serde(default)]
    pub radec: RadecConfig,
    /// Aperture-mass filter options.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Where to persist the output maps; skipped when absent.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Config {
    /// Load and parse a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "coordinate_system": "pixel",
            "method": "aperture_mass",
            "input_path": "catalog.fits",
            "columns": {
                "coord1": "x",
                "coord2": "y",
                "g1": "g1",
                "g2": "g2",
                "weight": "w"
            }
        })
    }

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: Config = serde_json::from_value(minimal_json()).unwrap();
        assert_eq!(config.coordinate_system, CoordinateSystemKind::Pixel);
        assert_eq!(config.method, MethodKind::ApertureMass);
        assert!(config.pixel.downsample_factor.is_none());
        assert!(config.filter.scale.is_none());
        assert!(config.output_path.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut json = minimal_json();
        json["plotting"] = serde_json::json!({"cmap": "viridis"});
        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.method, MethodKind::ApertureMass);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut json = minimal_json();
        json["method"] = serde_json::json!("massey_refregier");
        assert!(serde_json::from_value::<Config>(json).is_err());
    }

    #[test]
    fn radec_section_parses() {
        let mut json = minimal_json();
        json["coordinate_system"] = serde_json::json!("radec");
        json["radec"] = serde_json::json!({"resolution": 0.4});
        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.coordinate_system, CoordinateSystemKind::RaDec);
        assert_eq!(config.radec.resolution, Some(0.4));
    }
}
