//! lifeterm - Game of Life in the terminal, driven by kernel convolution
//!
//! Each generation is computed by convolving the grid with a neighbour
//! counting kernel and mapping every `(cell, count)` pair through the
//! B3/S23 rule. The display keeps a character buffer and redraws only the
//! positions that changed since the previous frame.
//!
//! # Architecture
//!
//! ```text
//! App
//! ├── Simulation (life)
//! │   ├── Grid        (grid::matrix)
//! │   └── convolve()  (grid::convolve)
//! └── Renderer (ui::renderer)
//!     ├── char + colour buffer, border, status line
//!     └── dirty queue -> crossterm cursor writes
//! ```

pub mod app;
pub mod config;
pub mod grid;
pub mod life;
pub mod ui;

pub use app::{App, CellStyle, Tick};
pub use config::Config;
pub use grid::{convolve, Grid};
pub use life::Simulation;
pub use ui::{Renderer, TerminalGuard};
