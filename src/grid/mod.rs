//! Cellular grid and the convolution engine.
//!
//! - **matrix**: fixed-size numeric grid with dual (row/column and linear) indexing
//! - **convolve**: kernel convolution with an optional per-cell transformation
//! - **seed**: random initial populations
//!
//! # Generation step
//!
//! ```text
//! Grid ──convolve(kernel, transform)──▶ Grid (next generation)
//! ```

pub mod convolve;
pub mod matrix;
pub mod seed;

pub use convolve::{convolve, KernelError, Transform};
pub use matrix::{Grid, GridError};
pub use seed::random_grid;
