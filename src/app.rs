//! Simulation driver
//!
//! Ties a `Simulation` to a `Renderer`: paint the current generation,
//! flush the changed cells, advance, and stop once the population is gone.
//! Input handling and pacing live in the binary; this type only knows
//! about one frame at a time.

use std::io::Write;

use anyhow::Context;
use crossterm::style::Color;
use tracing::trace;

use crate::config::Config;
use crate::grid::Grid;
use crate::life::Simulation;
use crate::ui::Renderer;

/// How cells are drawn
#[derive(Debug, Clone, Copy)]
pub struct CellStyle {
    pub live_glyph: char,
    pub dead_glyph: char,
    pub live_color: Color,
    pub status_color: Color,
}

impl CellStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            live_glyph: config.live_glyph,
            dead_glyph: config.dead_glyph,
            live_color: config.colors.live.to_crossterm(),
            status_color: Color::White,
        }
    }
}

/// Outcome of advancing one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Extinct,
}

pub struct App<W: Write> {
    simulation: Simulation,
    renderer: Renderer<W>,
    style: CellStyle,
}

impl<W: Write> App<W> {
    pub fn new(grid: Grid, renderer: Renderer<W>, style: CellStyle) -> anyhow::Result<Self> {
        anyhow::ensure!(
            grid.rows() == renderer.rows() && grid.columns() == renderer.columns(),
            "Grid is {}x{} but the display is {}x{}",
            grid.rows(),
            grid.columns(),
            renderer.rows(),
            renderer.columns()
        );
        let simulation = Simulation::new(grid).context("Failed to set up simulation")?;
        Ok(Self {
            simulation,
            renderer,
            style,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    /// Blank the display and redraw the border
    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.renderer.clear().context("Failed to clear display")?;
        Ok(())
    }

    /// Paint the current generation and flush what changed.
    ///
    /// Returns the number of positions drawn.
    pub fn draw(&mut self) -> anyhow::Result<usize> {
        let grid = self.simulation.grid();
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let (glyph, color) = if grid.get(row, column) == 1.0 {
                    (self.style.live_glyph, self.style.live_color)
                } else {
                    (self.style.dead_glyph, self.style.live_color)
                };
                self.renderer.fill_pixel(glyph, color, row, column);
            }
        }

        let status = format!(
            "gen {}  pop {}",
            self.simulation.generation(),
            self.simulation.population()
        );
        self.renderer.set_status(&status, self.style.status_color);

        let drawn = self.renderer.render().context("Failed to render frame")?;
        trace!("Frame {}: {} positions drawn", self.simulation.generation(), drawn);
        Ok(drawn)
    }

    /// Compute the next generation
    pub fn tick(&mut self) -> anyhow::Result<Tick> {
        self.simulation
            .step()
            .context("Failed to compute next generation")?;
        Ok(if self.simulation.is_extinct() {
            Tick::Extinct
        } else {
            Tick::Running
        })
    }
}
