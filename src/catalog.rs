//! Shear catalog containers.
//!
//! A [`ShearCatalog`] is a column-oriented collection of per-object shear
//! measurements: a position in some coordinate system's native units, the two
//! shear components and a non-negative weight. Catalogs are immutable once
//! constructed; the coordinate transform derives a [`ScaledCatalog`] instead
//! of mutating in place.

use thiserror::Error;

/// Validation failures for catalog construction.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog contains no records.
    #[error("catalog contains no records")]
    Empty,

    /// A column has a different length than the coordinate columns.
    #[error("column `{column}` has {len} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        column: &'static str,
        /// Observed length.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// A record carries a negative weight.
    #[error("negative weight {value} at record {row}")]
    NegativeWeight {
        /// Index of the offending record.
        row: usize,
        /// The negative weight value.
        value: f64,
    },
}

/// Column-oriented catalog of weighted shear measurements.
#[derive(Debug, Clone, Default)]
pub struct ShearCatalog {
    coord1: Vec<f64>,
    coord2: Vec<f64>,
    g1: Vec<f64>,
    g2: Vec<f64>,
    weight: Vec<f64>,
}

impl ShearCatalog {
    /// Build a catalog from its columns, validating the shape invariants:
    /// equal column lengths, at least one record, no negative weights.
    pub fn new(
        coord1: Vec<f64>,
        coord2: Vec<f64>,
        g1: Vec<f64>,
        g2: Vec<f64>,
        weight: Vec<f64>,
    ) -> Result<Self, CatalogError> {
        let expected = coord1.len();
        for (column, len) in [
            ("coord2", coord2.len()),
            ("g1", g1.len()),
            ("g2", g2.len()),
            ("weight", weight.len()),
        ] {
            if len != expected {
                return Err(CatalogError::LengthMismatch {
                    column,
                    len,
                    expected,
                });
            }
        }
        if expected == 0 {
            return Err(CatalogError::Empty);
        }
        if let Some((row, &value)) = weight.iter().enumerate().find(|(_, &w)| w < 0.0) {
            return Err(CatalogError::NegativeWeight { row, value });
        }

        Ok(Self {
            coord1,
            coord2,
            g1,
            g2,
            weight,
        })
    }

    pub fn len(&self) -> usize {
        self.coord1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coord1.is_empty()
    }

    pub fn coord1(&self) -> &[f64] {
        &self.coord1
    }

    pub fn coord2(&self) -> &[f64] {
        &self.coord2
    }

    pub fn g1(&self) -> &[f64] {
        &self.g1
    }

    pub fn g2(&self) -> &[f64] {
        &self.g2
    }

    pub fn weight(&self) -> &[f64] {
        &self.weight
    }
}

/// A catalog augmented with coordinates mapped into a coordinate system's
/// locally isotropic working frame. The original catalog is untouched.
#[derive(Debug, Clone)]
pub struct ScaledCatalog {
    catalog: ShearCatalog,
    coord1_scaled: Vec<f64>,
    coord2_scaled: Vec<f64>,
}

impl ScaledCatalog {
    /// Attach scaled coordinate columns to a catalog. The scaled columns must
    /// match the catalog length; this is an internal invariant of the
    /// coordinate systems, so a mismatch is a programming error.
    pub(crate) fn new(
        catalog: ShearCatalog,
        coord1_scaled: Vec<f64>,
        coord2_scaled: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(catalog.len(), coord1_scaled.len());
        debug_assert_eq!(catalog.len(), coord2_scaled.len());
        Self {
            catalog,
            coord1_scaled,
            coord2_scaled,
        }
    }

    pub fn catalog(&self) -> &ShearCatalog {
        &self.catalog
    }

    pub fn coord1_scaled(&self) -> &[f64] {
        &self.coord1_scaled
    }

    pub fn coord2_scaled(&self) -> &[f64] {
        &self.coord2_scaled
    }
}
