//! Game of Life on top of the convolution engine
//!
//! The automaton is expressed as a convolution: an all-ones 3x3 kernel with
//! a zero centre counts the eight neighbours of every cell, and the B3/S23
//! rule maps `(current, count)` to the next state.

use thiserror::Error;
use tracing::debug;

use crate::grid::{convolve, Grid, GridError, KernelError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifeError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

pub type Result<T> = std::result::Result<T, LifeError>;

/// 3x3 kernel counting the eight surrounding cells
pub fn neighbor_kernel() -> Result<Grid> {
    let kernel = Grid::from_rows(&[
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
    ])?;
    Ok(kernel)
}

/// B3/S23: a live cell survives with 2 or 3 neighbours, a dead cell is
/// born with exactly 3. Any other combination, including cell values other
/// than 0 and 1, yields a dead cell.
pub fn conway(current: f64, neighbors: f64) -> f64 {
    let survives = current == 1.0 && (neighbors == 2.0 || neighbors == 3.0);
    let born = current == 0.0 && neighbors == 3.0;
    if survives || born {
        1.0
    } else {
        0.0
    }
}

/// The current generation plus the kernel used to advance it
pub struct Simulation {
    grid: Grid,
    kernel: Grid,
    generation: u64,
}

impl Simulation {
    pub fn new(grid: Grid) -> Result<Self> {
        Ok(Self {
            grid,
            kernel: neighbor_kernel()?,
            generation: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of steps taken so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> f64 {
        self.grid.sum()
    }

    /// True once no cell holds a positive value
    pub fn is_extinct(&self) -> bool {
        self.population() <= 0.0
    }

    /// Replace the grid with the next generation
    pub fn step(&mut self) -> Result<()> {
        self.grid = convolve(&self.grid, &self.kernel, Some(&conway))?;
        self.generation += 1;
        debug!(
            "Generation {}: population {}",
            self.generation,
            self.population()
        );
        Ok(())
    }
}
