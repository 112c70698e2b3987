//! Differential renderer using crossterm
//!
//! Keeps a character + colour buffer for the whole drawing area (margins,
//! border, cells and a status line) and a FIFO of buffer positions that
//! changed since the last flush. Only queued positions are written to the
//! terminal, each one by moving the cursor straight to it.
//!
//! # Buffer layout
//!
//! ```text
//! col:  0  1  2 ..            LEFT+BORDER+columns
//! row 0                                 (top margin)
//! row 1    ╔  ═  ═  ═  ═  ═  ╗
//! row 2    ║  cells ...      ║
//!  ...     ║                 ║
//!          ╚  ═  ═  ═  ═  ═  ╝
//!          status line                  (bottom margin)
//! ```

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, SetForegroundColor},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

const TOP_MARGIN: usize = 1;
const BOTTOM_MARGIN: usize = 1;
const LEFT_MARGIN: usize = 1;
const RIGHT_MARGIN: usize = 0;
const BORDER: usize = 1;

pub const MIN_ROWS: usize = 8;
pub const MAX_ROWS: usize = 32;
pub const MIN_COLUMNS: usize = 16;
pub const MAX_COLUMNS: usize = 64;
pub const MAX_CELL_SIZE: usize = 8;

const DEFAULT_COLOR: Color = Color::White;
const BLANK: char = ' ';

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("The number of grid rows ({0}) is not within the acceptable range ({min} to {max})", min = MIN_ROWS, max = MAX_ROWS)]
    RowsOutOfRange(usize),

    #[error("The number of grid columns ({0}) is not within the acceptable range ({min} to {max})", min = MIN_COLUMNS, max = MAX_COLUMNS)]
    ColumnsOutOfRange(usize),

    #[error("Cell size {width}x{height} is not within the acceptable range (1 to {max})", max = MAX_CELL_SIZE)]
    CellSizeOutOfRange { width: usize, height: usize },

    #[error("Failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RendererError>;

/// Border drawing style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Single,
    #[default]
    Double,
    Rounded,
}

/// Border characters
struct BorderChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

impl BorderStyle {
    fn chars(self) -> BorderChars {
        match self {
            BorderStyle::Single => BorderChars {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
            BorderStyle::Double => BorderChars {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
            BorderStyle::Rounded => BorderChars {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
        }
    }
}

/// Renderer settings that do not affect the logical grid size
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Terminal columns per cell
    pub cell_width: usize,
    /// Terminal rows per cell
    pub cell_height: usize,
    pub border: BorderStyle,
    pub border_color: Color,
    /// Foreground colour set after every flush
    pub restore_color: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_width: 1,
            cell_height: 1,
            border: BorderStyle::default(),
            border_color: DEFAULT_COLOR,
            restore_color: Color::Reset,
        }
    }
}

/// One buffered drawing position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pixel {
    ch: char,
    color: Color,
}

impl Default for Pixel {
    fn default() -> Self {
        Self {
            ch: BLANK,
            color: DEFAULT_COLOR,
        }
    }
}

/// Fixed-size grid display that only redraws what changed
pub struct Renderer<W: Write> {
    out: W,
    rows: usize,
    columns: usize,
    options: RenderOptions,
    buffer_height: usize,
    buffer_width: usize,
    buffer: Vec<Pixel>,
    /// Buffer positions (row, column) waiting to be drawn
    queue: VecDeque<(usize, usize)>,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer for a `rows x columns` grid.
    ///
    /// The whole buffer, border included, is queued for the first `render`.
    pub fn new(rows: usize, columns: usize, options: RenderOptions, out: W) -> Result<Self> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(RendererError::RowsOutOfRange(rows));
        }
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
            return Err(RendererError::ColumnsOutOfRange(columns));
        }
        let cell_sizes = 1..=MAX_CELL_SIZE;
        if !cell_sizes.contains(&options.cell_width) || !cell_sizes.contains(&options.cell_height) {
            return Err(RendererError::CellSizeOutOfRange {
                width: options.cell_width,
                height: options.cell_height,
            });
        }

        let buffer_height = TOP_MARGIN + BOTTOM_MARGIN + 2 * BORDER + rows;
        let buffer_width = LEFT_MARGIN + RIGHT_MARGIN + 2 * BORDER + columns;

        let mut renderer = Self {
            out,
            rows,
            columns,
            options,
            buffer_height,
            buffer_width,
            buffer: Vec::new(),
            queue: VecDeque::with_capacity(buffer_height * buffer_width),
        };
        renderer.initialize_buffer();
        renderer.draw_border();
        Ok(renderer)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Buffer dimensions as (height, width), margins and border included
    pub fn buffer_size(&self) -> (usize, usize) {
        (self.buffer_height, self.buffer_width)
    }

    /// Terminal size needed to show the whole buffer, as (columns, rows)
    pub fn screen_size(&self) -> (usize, usize) {
        (
            self.buffer_width * self.options.cell_width,
            self.buffer_height * self.options.cell_height,
        )
    }

    /// Number of buffer positions waiting to be drawn
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Character and colour currently buffered for a grid cell
    pub fn cell(&self, row: usize, column: usize) -> Option<(char, Color)> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let pixel = self.buffer[self.index(row + Self::row_offset(), column + Self::column_offset())];
        Some((pixel.ch, pixel.color))
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Write a character at a grid cell; unchanged values are not queued
    pub fn fill_pixel(&mut self, ch: char, color: Color, row: usize, column: usize) {
        debug_assert!(
            row < self.rows && column < self.columns,
            "cell ({}, {}) out of range",
            row,
            column
        );
        self.write(row + Self::row_offset(), column + Self::column_offset(), ch, color);
    }

    /// Show `text` on the line below the border, truncated to the buffer width
    pub fn set_status(&mut self, text: &str, color: Color) {
        let row = TOP_MARGIN + 2 * BORDER + self.rows;
        let mut chars = text.chars();
        for column in LEFT_MARGIN..self.buffer_width {
            let ch = chars.next().unwrap_or(BLANK);
            self.write(row, column, ch, color);
        }
    }

    /// Reset the buffer and border, then redraw everything
    pub fn clear(&mut self) -> Result<usize> {
        self.initialize_buffer();
        self.draw_border();
        self.render()
    }

    /// Draw every queued position in FIFO order.
    ///
    /// Returns the number of positions drawn.
    pub fn render(&mut self) -> Result<usize> {
        let mut drawn = 0;
        let mut current_color = None;

        while let Some((row, column)) = self.queue.pop_front() {
            let pixel = self.buffer[self.index(row, column)];
            if current_color != Some(pixel.color) {
                queue!(self.out, SetForegroundColor(pixel.color))?;
                current_color = Some(pixel.color);
            }

            let block = self.block(pixel.ch);
            let x = column * self.options.cell_width;
            let y = row * self.options.cell_height;
            for line in 0..self.options.cell_height {
                queue!(self.out, MoveTo(x as u16, (y + line) as u16), Print(&block))?;
            }
            drawn += 1;
        }

        queue!(self.out, SetForegroundColor(self.options.restore_color))?;
        self.out.flush()?;

        trace!("Rendered {} positions", drawn);
        Ok(drawn)
    }

    /// Update one buffer position and queue it if it changed
    fn write(&mut self, row: usize, column: usize, ch: char, color: Color) {
        let index = self.index(row, column);
        let pixel = Pixel { ch, color };
        if self.buffer[index] == pixel {
            return;
        }
        self.buffer[index] = pixel;
        self.queue.push_back((row, column));
    }

    /// One line of a cell block, honouring double-width glyphs.
    ///
    /// A glyph wider than the cell is drawn as blanks.
    fn block(&self, ch: char) -> String {
        let glyph_width = ch.width().unwrap_or(1).max(1);
        if glyph_width > self.options.cell_width {
            return std::iter::repeat(BLANK).take(self.options.cell_width).collect();
        }
        let repeats = (self.options.cell_width / glyph_width).max(1);
        let mut line: String = std::iter::repeat(ch).take(repeats).collect();
        for _ in repeats * glyph_width..self.options.cell_width {
            line.push(BLANK);
        }
        line
    }

    /// Blank every position and queue the whole buffer
    fn initialize_buffer(&mut self) {
        self.buffer = vec![Pixel::default(); self.buffer_height * self.buffer_width];
        self.queue.clear();
        for row in 0..self.buffer_height {
            for column in 0..self.buffer_width {
                self.queue.push_back((row, column));
            }
        }
    }

    /// Border glyphs go straight into the buffer; their positions are
    /// already queued by `initialize_buffer`.
    fn draw_border(&mut self) {
        let chars = self.options.border.chars();
        let color = self.options.border_color;
        let top = TOP_MARGIN;
        let bottom = TOP_MARGIN + BORDER + self.rows;
        let left = LEFT_MARGIN;
        let right = LEFT_MARGIN + BORDER + self.columns;

        let mut put = |row: usize, column: usize, ch: char| {
            let index = row * self.buffer_width + column;
            self.buffer[index] = Pixel { ch, color };
        };

        put(top, left, chars.top_left);
        put(top, right, chars.top_right);
        put(bottom, left, chars.bottom_left);
        put(bottom, right, chars.bottom_right);
        for row in top + BORDER..bottom {
            put(row, left, chars.vertical);
            put(row, right, chars.vertical);
        }
        for column in left + BORDER..right {
            put(top, column, chars.horizontal);
            put(bottom, column, chars.horizontal);
        }
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        row * self.buffer_width + column
    }

    /// Grid row to buffer row
    const fn row_offset() -> usize {
        TOP_MARGIN + BORDER
    }

    /// Grid column to buffer column
    const fn column_offset() -> usize {
        LEFT_MARGIN + BORDER
    }
}
