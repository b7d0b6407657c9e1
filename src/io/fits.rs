//! FITS catalog loading and map persistence.
//!
//! The catalog loader reads five named columns from a binary table HDU into
//! a validated [`ShearCatalog`]. The map writer persists E/B maps as image
//! HDUs tagged with a linear world-coordinate header derived from the true
//! field boundaries, so downstream viewers place the maps on the sky.

use std::path::{Path, PathBuf};

use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::Array2;
use thiserror::Error;

use crate::catalog::ShearCatalog;
use crate::config::ColumnConfig;
use crate::coordinates::Boundaries;
use crate::error::MapError;
use crate::mapping::MassMaps;

/// HDU index holding the catalog table when the configuration does not say
/// otherwise; binary tables live in the first extension.
const DEFAULT_TABLE_HDU: usize = 1;

/// Failures reading or writing FITS files.
#[derive(Error, Debug)]
pub enum FitsError {
    /// Underlying FITS library error.
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),

    /// A required catalog column is absent from the table.
    #[error("column `{column}` not found in {path}")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
        /// Path of the catalog file.
        path: PathBuf,
    },
}

/// Load a shear catalog from a FITS binary table.
///
/// `hdu_index` selects the table extension; `None` uses the first extension.
/// Fails fatally when a column is missing or the loaded columns violate the
/// catalog invariants (empty, mismatched lengths, negative weights).
pub fn load_shear_catalog<P: AsRef<Path>>(
    path: P,
    columns: &ColumnConfig,
    hdu_index: Option<usize>,
) -> Result<ShearCatalog, MapError> {
    let path = path.as_ref();
    let mut fptr = FitsFile::open(path).map_err(FitsError::from)?;
    let hdu = fptr
        .hdu(hdu_index.unwrap_or(DEFAULT_TABLE_HDU))
        .map_err(FitsError::from)?;

    // Translate the library error into a column-specific one so the failing
    // field is identifiable.
    let mut read_column = |column: &str| -> Result<Vec<f64>, FitsError> {
        hdu.read_col::<f64>(&mut fptr, column)
            .map_err(|_| FitsError::ColumnNotFound {
                column: column.to_string(),
                path: path.to_path_buf(),
            })
    };

    let coord1 = read_column(&columns.coord1)?;
    let coord2 = read_column(&columns.coord2)?;
    let g1 = read_column(&columns.g1)?;
    let g2 = read_column(&columns.g2)?;
    let weight = read_column(&columns.weight)?;

    log::info!("loaded {} records from {}", coord1.len(), path.display());

    Ok(ShearCatalog::new(coord1, coord2, g1, g2, weight)?)
}

/// Write one map as an image HDU with a linear world-coordinate header.
fn write_map_hdu(
    fptr: &mut FitsFile,
    name: &str,
    map: &Array2<f64>,
    boundaries: &Boundaries,
) -> Result<(), FitsError> {
    let (n_rows, n_cols) = map.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[n_rows, n_cols],
    };
    let hdu = fptr.create_image(name.to_string(), &description)?;

    // FITS images put their origin at the bottom-left; flip rows on the way
    // out so viewers see the field the right way up.
    let flipped = map.slice(ndarray::s![..;-1, ..]);
    let flat: Vec<f64> = flipped.iter().copied().collect();
    hdu.write_image(fptr, &flat)?;

    hdu.write_key(fptr, "CRPIX1", n_cols as f64 / 2.0)?;
    hdu.write_key(fptr, "CRPIX2", n_rows as f64 / 2.0)?;
    hdu.write_key(
        fptr,
        "CRVAL1",
        0.5 * (boundaries.coord1_min + boundaries.coord1_max),
    )?;
    hdu.write_key(
        fptr,
        "CRVAL2",
        0.5 * (boundaries.coord2_min + boundaries.coord2_max),
    )?;
    hdu.write_key(fptr, "CDELT1", boundaries.coord1_span() / n_cols as f64)?;
    hdu.write_key(fptr, "CDELT2", boundaries.coord2_span() / n_rows as f64)?;

    let (ctype1, ctype2) = if boundaries.units == "deg" {
        ("RA---TAN", "DEC--TAN")
    } else {
        ("PIXEL", "PIXEL")
    };
    hdu.write_key(fptr, "CTYPE1", ctype1)?;
    hdu.write_key(fptr, "CTYPE2", ctype2)?;
    hdu.write_key(fptr, "BUNIT", "S/N")?;

    Ok(())
}

/// Persist E/B maps to a FITS file, one image HDU per map, headers derived
/// from the true (reported) field boundaries. Overwrites any existing file.
pub fn write_mass_maps<P: AsRef<Path>>(
    path: P,
    maps: &MassMaps,
    true_boundaries: &Boundaries,
) -> Result<(), FitsError> {
    let path = path.as_ref();
    let mut fptr = FitsFile::create(path).overwrite().open()?;

    write_map_hdu(&mut fptr, "E_MODE", &maps.e, true_boundaries)?;
    write_map_hdu(&mut fptr, "B_MODE", &maps.b, true_boundaries)?;

    log::info!("wrote mass maps to {}", path.display());
    Ok(())
}
