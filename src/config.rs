//! Configuration for lifeterm.
//!
//! Settings are read from `~/.lifeterm/config.toml`. Every key is optional;
//! anything missing falls back to the built-in default.
//!
//! ```toml
//! rows = 20
//! columns = 20
//! cell_width = 2
//! cell_height = 1
//! probability = 0.25
//! delay_ms = 100
//! live_glyph = "█"
//! dead_glyph = " "
//! border_style = "double"   # single, double, rounded
//!
//! [colors]
//! live = { r = 255, g = 255, b = 255 }
//! border = { r = 120, g = 120, b = 120 }
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use unicode_width::UnicodeWidthChar;

use crate::ui::{BorderStyle, RenderOptions};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Seeding probability {0} must be between 0 and 1")]
    Probability(f64),

    #[error("Glyph {glyph:?} is wider than a cell ({cell_width} columns)")]
    GlyphTooWide { glyph: char, cell_width: usize },
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Terminal columns per cell
    pub cell_width: usize,
    /// Terminal rows per cell
    pub cell_height: usize,
    /// Chance that a cell starts alive
    pub probability: f64,
    /// Pause between generations when running continuously
    pub delay_ms: u64,
    pub live_glyph: char,
    pub dead_glyph: char,
    pub border_style: BorderStyle,
    pub colors: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 20,
            cell_width: 2,
            cell_height: 1,
            probability: 0.25,
            delay_ms: 100,
            live_glyph: '\u{2588}',
            dead_glyph: ' ',
            border_style: BorderStyle::default(),
            colors: ColorConfig::default(),
        }
    }
}

/// Display colours
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub live: Color,
    pub border: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            live: Color::new(255, 255, 255),
            border: Color::new(255, 255, 255),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match Self::from_toml(&content) {
                        Ok(config) => {
                            info!("Loaded config from {}", path.display());
                            return config;
                        }
                        Err(e) => warn!("Ignoring {}: {}", path.display(), e),
                    },
                    Err(e) => warn!("Could not read {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check values the renderer and grid do not validate themselves
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::Probability(self.probability));
        }
        // Zero-width cells are rejected by the renderer
        if self.cell_width > 0 {
            for glyph in [self.live_glyph, self.dead_glyph] {
                if glyph.width().unwrap_or(1) > self.cell_width {
                    return Err(ConfigError::GlyphTooWide {
                        glyph,
                        cell_width: self.cell_width,
                    });
                }
            }
        }
        Ok(())
    }

    /// Renderer settings derived from this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            border: self.border_style,
            border_color: self.colors.border.to_crossterm(),
            ..RenderOptions::default()
        }
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".lifeterm").join("config.toml"))
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Home directory from `USERPROFILE`, then `HOME`
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
