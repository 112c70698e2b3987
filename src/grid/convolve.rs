//! Kernel convolution over a `Grid`
//!
//! Each output cell is the unnormalized weighted sum of the input cells
//! under the kernel, with the kernel centred on the output position.
//! Neighbours that fall outside the grid contribute nothing (zero
//! padding, no wrap-around). An optional transformation maps
//! `(current value, raw sum)` to the output value.

use thiserror::Error;
use tracing::trace;

use super::matrix::Grid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Kernel must have odd dimensions (got {rows}x{columns})")]
    EvenDimensions { rows: usize, columns: usize },

    #[error(
        "Kernel ({kernel_rows}x{kernel_columns}) must not be larger than the grid ({grid_rows}x{grid_columns})"
    )]
    TooLarge {
        kernel_rows: usize,
        kernel_columns: usize,
        grid_rows: usize,
        grid_columns: usize,
    },
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Maps `(current value, raw convolution sum)` to the next value
pub type Transform<'a> = &'a dyn Fn(f64, f64) -> f64;

/// Check the kernel against the grid it is going to be applied to
fn validate(grid: &Grid, kernel: &Grid) -> Result<()> {
    if kernel.rows() % 2 == 0 || kernel.columns() % 2 == 0 {
        return Err(KernelError::EvenDimensions {
            rows: kernel.rows(),
            columns: kernel.columns(),
        });
    }
    if kernel.rows() > grid.rows() || kernel.columns() > grid.columns() {
        return Err(KernelError::TooLarge {
            kernel_rows: kernel.rows(),
            kernel_columns: kernel.columns(),
            grid_rows: grid.rows(),
            grid_columns: grid.columns(),
        });
    }
    Ok(())
}

/// Convolve `grid` with `kernel`, producing a new grid of the same size.
///
/// The input grid is never modified.
pub fn convolve(grid: &Grid, kernel: &Grid, transform: Option<Transform<'_>>) -> Result<Grid> {
    validate(grid, kernel)?;

    let mut result = grid.empty_like();

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let raw = weighted_sum(grid, kernel, row, column);
            let value = match transform {
                Some(transform) => transform(grid.get(row, column), raw),
                None => raw,
            };
            result.set(row, column, value);
        }
    }

    trace!(
        "Convolved {}x{} grid with {}x{} kernel",
        grid.rows(),
        grid.columns(),
        kernel.rows(),
        kernel.columns()
    );
    Ok(result)
}

/// Kernel-weighted sum of the neighbourhood around `(row, column)`
fn weighted_sum(grid: &Grid, kernel: &Grid, row: usize, column: usize) -> f64 {
    let center_row = kernel.rows() / 2;
    let center_column = kernel.columns() / 2;
    let mut sum = 0.0;

    for i in 0..kernel.rows() {
        // row + i - center_row, skipping positions above or below the grid
        let Some(grid_row) = (row + i).checked_sub(center_row) else {
            continue;
        };
        if grid_row >= grid.rows() {
            continue;
        }
        for j in 0..kernel.columns() {
            let Some(grid_column) = (column + j).checked_sub(center_column) else {
                continue;
            };
            if grid_column >= grid.columns() {
                continue;
            }
            sum += grid.get(grid_row, grid_column) * kernel.get(i, j);
        }
    }
    sum
}
