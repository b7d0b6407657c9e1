//! Top-level error type for mapping runs.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::io::fits::FitsError;

/// Any fatal failure a mapping run can produce. Recoverable conditions never
/// surface here; they go through [`crate::diagnostics::Diagnostics`].
#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Fits(#[from] FitsError),
}
