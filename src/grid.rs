//! Weighted binning of scattered shear measurements onto a regular grid.
//!
//! Every coordinate system rasterizes its catalog through the same
//! scatter-accumulate algorithm: each record lands in one bin, bins collect
//! `Σw`, `Σ g1·w` and `Σ g2·w`, and occupied bins are normalized to the
//! weighted mean. How a coordinate system decides bin counts and boundaries
//! stays out of this module.

use ndarray::Array2;

use crate::coordinates::Boundaries;

/// Gridded weighted-mean shear components. Cells that received no weight are
/// exactly zero.
#[derive(Debug, Clone)]
pub struct ShearGrid {
    /// First shear component, shape `(n_rows, n_cols)`.
    pub g1: Array2<f64>,
    /// Second shear component, same shape as `g1`.
    pub g2: Array2<f64>,
}

impl ShearGrid {
    /// Grid shape as `(n_rows, n_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.g1.dim()
    }
}

/// Bin a catalog into an `(n_rows, n_cols)` shear grid over `boundaries`.
///
/// Axis 1 (columns) follows `coord1`, axis 0 (rows) follows `coord2`. Each
/// axis is split into equal-width bins spanning `[min, max]` with the upper
/// edge inclusive. Records that fall outside the bin range are dropped
/// silently; with boundaries derived from the same coordinates this only
/// happens through floating-point edge effects or deliberate field clipping.
pub fn bin_shear_grid(
    coord1_scaled: &[f64],
    coord2_scaled: &[f64],
    g1: &[f64],
    g2: &[f64],
    weight: &[f64],
    boundaries: &Boundaries,
    n_rows: usize,
    n_cols: usize,
) -> ShearGrid {
    let mut g1_grid = Array2::<f64>::zeros((n_rows, n_cols));
    let mut g2_grid = Array2::<f64>::zeros((n_rows, n_cols));
    let mut weight_grid = Array2::<f64>::zeros((n_rows, n_cols));

    let bin_width_1 = boundaries.coord1_span() / n_cols as f64;
    let bin_width_2 = boundaries.coord2_span() / n_rows as f64;

    for index in 0..coord1_scaled.len() {
        let c1 = coord1_scaled[index];
        let c2 = coord2_scaled[index];
        if !c1.is_finite() || !c2.is_finite() {
            continue;
        }

        let col = bin_index(c1, boundaries.coord1_min, boundaries.coord1_max, bin_width_1, n_cols);
        let row = bin_index(c2, boundaries.coord2_min, boundaries.coord2_max, bin_width_2, n_rows);
        let (Some(col), Some(row)) = (col, row) else {
            continue;
        };

        let w = weight[index];
        weight_grid[[row, col]] += w;
        g1_grid[[row, col]] += g1[index] * w;
        g2_grid[[row, col]] += g2[index] * w;
    }

    // Weighted mean where any weight accumulated; empty bins stay exactly 0.
    for ((row, col), &w) in weight_grid.indexed_iter() {
        if w != 0.0 {
            g1_grid[[row, col]] /= w;
            g2_grid[[row, col]] /= w;
        }
    }

    ShearGrid {
        g1: g1_grid,
        g2: g2_grid,
    }
}

/// Map a coordinate to its bin, with the upper boundary folded into the last
/// bin. Returns `None` for coordinates outside `[min, max]`.
fn bin_index(value: f64, min: f64, max: f64, bin_width: f64, n_bins: usize) -> Option<usize> {
    if value < min || value > max {
        return None;
    }
    let index = ((value - min) / bin_width) as usize;
    Some(index.min(n_bins - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Boundaries;
    use float_cmp::approx_eq;

    fn unit_boundaries(extent: f64) -> Boundaries {
        Boundaries {
            coord1_min: 0.0,
            coord1_max: extent,
            coord2_min: 0.0,
            coord2_max: extent,
            coord1_name: "X",
            coord2_name: "Y",
            units: "pixels",
        }
    }

    #[test]
    fn distinct_bins_reproduce_per_point_values() {
        // One unit-weight record per bin: the weighted mean must be the
        // contributor's value exactly.
        let coord1 = vec![0.5, 1.5, 2.5];
        let coord2 = vec![0.5, 1.5, 2.5];
        let g1 = vec![0.1, -0.2, 0.3];
        let g2 = vec![-0.1, 0.2, -0.3];
        let weight = vec![1.0, 1.0, 1.0];

        let grid = bin_shear_grid(
            &coord1,
            &coord2,
            &g1,
            &g2,
            &weight,
            &unit_boundaries(3.0),
            3,
            3,
        );

        for k in 0..3 {
            assert_eq!(grid.g1[[k, k]], g1[k]);
            assert_eq!(grid.g2[[k, k]], g2[k]);
        }
    }

    #[test]
    fn multiple_records_accumulate_weighted_mean() {
        let coord1 = vec![0.2, 0.8];
        let coord2 = vec![0.3, 0.7];
        let g1 = vec![0.1, 0.4];
        let g2 = vec![0.0, 0.0];
        let weight = vec![1.0, 3.0];

        let grid = bin_shear_grid(
            &coord1,
            &coord2,
            &g1,
            &g2,
            &weight,
            &unit_boundaries(1.0),
            1,
            1,
        );

        let expected = (0.1 * 1.0 + 0.4 * 3.0) / 4.0;
        assert!(approx_eq!(f64, grid.g1[[0, 0]], expected, epsilon = 1e-12));
    }

    #[test]
    fn empty_bins_are_exactly_zero() {
        let grid = bin_shear_grid(
            &[0.5],
            &[0.5],
            &[0.9],
            &[0.9],
            &[1.0],
            &unit_boundaries(4.0),
            4,
            4,
        );

        let occupied: usize = grid
            .g1
            .iter()
            .zip(grid.g2.iter())
            .filter(|(a, b)| **a != 0.0 || **b != 0.0)
            .count();
        assert_eq!(occupied, 1);
        assert_eq!(grid.g1[[3, 3]], 0.0);
        assert!(grid.g1.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zero_weight_records_contribute_nothing() {
        let grid = bin_shear_grid(
            &[0.5, 0.5],
            &[0.5, 0.5],
            &[0.1, 100.0],
            &[0.0, 100.0],
            &[1.0, 0.0],
            &unit_boundaries(1.0),
            1,
            1,
        );

        assert_eq!(grid.g1[[0, 0]], 0.1);
        assert_eq!(grid.g2[[0, 0]], 0.0);
    }

    #[test]
    fn upper_edge_lands_in_last_bin() {
        let grid = bin_shear_grid(
            &[2.0],
            &[2.0],
            &[0.5],
            &[0.0],
            &[1.0],
            &unit_boundaries(2.0),
            2,
            2,
        );

        assert_eq!(grid.g1[[1, 1]], 0.5);
    }

    #[test]
    fn out_of_range_records_are_dropped() {
        let grid = bin_shear_grid(
            &[-0.1, 2.1, 1.0],
            &[1.0, 1.0, 1.0],
            &[1.0, 1.0, 0.25],
            &[0.0, 0.0, 0.0],
            &[1.0, 1.0, 1.0],
            &unit_boundaries(2.0),
            2,
            2,
        );

        // Only the in-range record survives.
        let total: f64 = grid.g1.iter().sum();
        assert_eq!(total, 0.25);
    }
}
