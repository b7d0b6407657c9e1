//! Structured diagnostics for recoverable conditions.
//!
//! The mapping pipeline never aborts on size or numerical issues; it adjusts
//! parameters or propagates special values and records what happened here.
//! Callers receive the full sequence of records with the run output and can
//! inspect or surface them however they like. Each record is also mirrored to
//! the `log` facade at warn level as it is recorded.

use std::fmt;

/// A single recoverable condition observed during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A coordinate axis spans an implausibly large pixel range, which
    /// usually means sky coordinates were fed to the pixel system.
    LargeCoordinateRange {
        /// Axis label, e.g. "X".
        axis: &'static str,
        /// Observed min-to-max span.
        span: f64,
    },
    /// Grid dimensions exceeded the safety ceiling and the downsample factor
    /// was raised to compensate.
    GridSizeAdjusted {
        /// Grid dimensions before adjustment (rows, cols).
        requested: (usize, usize),
        /// Grid dimensions after adjustment (rows, cols).
        adjusted: (usize, usize),
        /// Effective downsample factor after adjustment.
        downsample_factor: f64,
    },
    /// An optional configuration key was absent and its default was used.
    DefaultApplied {
        /// Dotted configuration key, e.g. "pixel.downsample_factor".
        key: &'static str,
        /// The default value that was applied.
        value: f64,
    },
    /// Apertures with zero accumulated noise produced non-finite
    /// signal-to-noise pixels, which are propagated unchanged.
    DegenerateNoise {
        /// Number of affected pixels.
        pixels: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LargeCoordinateRange { axis, span } => {
                write!(f, "large coordinate range on {axis} axis: {span:.1}")
            }
            Diagnostic::GridSizeAdjusted {
                requested,
                adjusted,
                downsample_factor,
            } => write!(
                f,
                "grid size {}x{} exceeds ceiling, downsample raised to {:.1} giving {}x{}",
                requested.0, requested.1, downsample_factor, adjusted.0, adjusted.1
            ),
            Diagnostic::DefaultApplied { key, value } => {
                write!(f, "no `{key}` configured, using default {value}")
            }
            Diagnostic::DegenerateNoise { pixels } => {
                write!(f, "{pixels} pixels have zero aperture noise, SNR is non-finite there")
            }
        }
    }
}

/// Ordered collection of diagnostics gathered over one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a condition and mirror it to the log.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }
}
