//! Fixed-size 2D numeric grid with initialization tracking
//!
//! A `Grid` stores `rows * columns` values in a single row-major array.
//! Cells can be addressed either by `(row, column)` or by a linear index;
//! both go through the same offset mapping, so they always observe the
//! same backing cell.
//!
//! Alongside the values the grid keeps a mask of cells that have been
//! explicitly written, which is what the `append_row`/`append_value`
//! builder methods use to find the next free slot.

use std::fmt;
use std::ops::Index;
use thiserror::Error;

/// Smallest supported extent in either dimension
pub const MIN_DIMENSION: usize = 1;
/// Largest supported extent in either dimension
pub const MAX_DIMENSION: usize = 4096;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error(
        "Grid dimensions {rows}x{columns} are outside the supported range ({min} to {max})",
        min = MIN_DIMENSION,
        max = MAX_DIMENSION
    )]
    DimensionsOutOfRange { rows: usize, columns: usize },

    #[error("Row length {actual} does not match the number of columns ({expected})")]
    RowLength { expected: usize, actual: usize },

    #[error("Grid is full")]
    Full,

    #[error("Cannot build a grid from no rows")]
    Empty,
}

pub type Result<T> = std::result::Result<T, GridError>;

/// A 2D array of cell values
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Number of rows (fixed at construction)
    rows: usize,
    /// Number of columns (fixed at construction)
    columns: usize,
    /// Cell values, row-major
    cells: Vec<f64>,
    /// Which cells have been explicitly written
    initialized: Vec<bool>,
    /// Initialized cells per row
    row_fill: Vec<usize>,
    /// Number of initialized cells
    initialized_count: usize,
    /// Number of rows whose every column has been written
    completed_rows: usize,
}

impl Grid {
    /// Create an all-zero grid with no initialized cells
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        let supported = MIN_DIMENSION..=MAX_DIMENSION;
        if !supported.contains(&rows) || !supported.contains(&columns) {
            return Err(GridError::DimensionsOutOfRange { rows, columns });
        }

        let size = rows * columns;
        Ok(Self {
            rows,
            columns,
            cells: vec![0.0; size],
            initialized: vec![false; size],
            row_fill: vec![0; rows],
            initialized_count: 0,
            completed_rows: 0,
        })
    }

    /// A fresh grid with the same dimensions
    pub fn empty_like(&self) -> Self {
        let size = self.len();
        Self {
            rows: self.rows,
            columns: self.columns,
            cells: vec![0.0; size],
            initialized: vec![false; size],
            row_fill: vec![0; self.rows],
            initialized_count: 0,
            completed_rows: 0,
        }
    }

    /// Build a grid by appending each row in order.
    ///
    /// The column count is taken from the first row; every following row
    /// must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().ok_or(GridError::Empty)?.as_ref().len();
        let mut grid = Self::new(rows.len(), columns)?;
        for row in rows {
            grid.append_row(row.as_ref())?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: dimensions are at least 1x1
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells written since construction or the last `clear`
    pub fn initialized_count(&self) -> usize {
        self.initialized_count
    }

    /// Number of rows whose every column has been written
    pub fn completed_rows(&self) -> usize {
        self.completed_rows
    }

    pub fn is_full(&self) -> bool {
        self.initialized_count == self.len()
    }

    pub fn is_initialized(&self, row: usize, column: usize) -> bool {
        self.initialized[self.offset(row, column)]
    }

    /// Row-major offset of `(row, column)` into the backing storage
    #[inline]
    fn offset(&self, row: usize, column: usize) -> usize {
        debug_assert!(column < self.columns, "column {} out of range", column);
        row * self.columns + column
    }

    /// `(row, column)` of a linear index
    #[inline]
    fn position(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[self.offset(row, column)]
    }

    /// Write a cell and mark it initialized
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.cells[offset] = value;

        if !self.initialized[offset] {
            self.initialized[offset] = true;
            self.initialized_count += 1;
            self.row_fill[row] += 1;
            if self.row_fill[row] == self.columns {
                self.completed_rows += 1;
            }
        }
    }

    pub fn get_linear(&self, index: usize) -> f64 {
        let (row, column) = self.position(index);
        self.get(row, column)
    }

    pub fn set_linear(&mut self, index: usize, value: f64) {
        let (row, column) = self.position(index);
        self.set(row, column, value);
    }

    /// Write a full row into the first row that is not yet complete
    pub fn append_row(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.columns {
            return Err(GridError::RowLength {
                expected: self.columns,
                actual: values.len(),
            });
        }
        let row = self
            .row_fill
            .iter()
            .position(|&filled| filled < self.columns)
            .ok_or(GridError::Full)?;

        for (column, &value) in values.iter().enumerate() {
            self.set(row, column, value);
        }
        Ok(())
    }

    /// Write a single value into the first uninitialized linear slot
    pub fn append_value(&mut self, value: f64) -> Result<()> {
        if self.is_full() {
            return Err(GridError::Full);
        }
        // Appends are contiguous, so the next slot is usually `initialized_count`
        let index = if !self.initialized[self.initialized_count] {
            self.initialized_count
        } else {
            self.initialized
                .iter()
                .position(|&written| !written)
                .ok_or(GridError::Full)?
        };
        self.set_linear(index, value);
        Ok(())
    }

    /// Reset values, mask and counters; dimensions are kept
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
        self.initialized.fill(false);
        self.row_fill.fill(0);
        self.initialized_count = 0;
        self.completed_rows = 0;
    }

    /// Whether `value` occurs among the written cells
    pub fn contains(&self, value: f64) -> bool {
        self.find(value).is_some()
    }

    /// Linear indices of written cells, in row-major order
    fn written(&self) -> impl Iterator<Item = usize> + '_ {
        self.initialized
            .iter()
            .enumerate()
            .filter(|(_, written)| **written)
            .map(|(index, _)| index)
    }

    fn find(&self, value: f64) -> Option<usize> {
        self.written().find(|&index| self.cells[index] == value)
    }

    /// Remove the first written occurrence of `value`.
    ///
    /// The written values after it shift back by one written slot and the
    /// last written slot is released, so `initialized_count` always equals
    /// the number of marked cells. For contiguous appends this is a plain
    /// left shift. Returns false if the value was not found.
    pub fn remove(&mut self, value: f64) -> bool {
        let Some(index) = self.find(value) else {
            return false;
        };

        let slots: Vec<usize> = self.written().skip_while(|&slot| slot < index).collect();
        for pair in slots.windows(2) {
            self.cells[pair[0]] = self.cells[pair[1]];
        }
        if let Some(&last) = slots.last() {
            self.cells[last] = 0.0;
            self.initialized[last] = false;
        }
        self.initialized_count -= 1;
        self.recount_rows();
        true
    }

    fn recount_rows(&mut self) {
        for (row, fill) in self.row_fill.iter_mut().enumerate() {
            let start = row * self.columns;
            *fill = self.initialized[start..start + self.columns]
                .iter()
                .filter(|&&written| written)
                .count();
        }
        self.completed_rows = self
            .row_fill
            .iter()
            .filter(|&&fill| fill == self.columns)
            .count();
    }

    /// Sum of every cell, initialized or not
    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// All values in row-major order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().copied()
    }

    /// Values of a single row
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Copy all values, row-major, into `target` starting at `offset`
    pub fn copy_to(&self, target: &mut [f64], offset: usize) {
        target[offset..offset + self.len()].copy_from_slice(&self.cells);
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        &self.cells[self.offset(row, column)]
    }
}

impl Index<usize> for Grid {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        let (row, column) = self.position(index);
        &self[(row, column)]
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = f64;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for value in self.row(row) {
                write!(f, "{}\t", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 5).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.len(), 20);
        assert_eq!(grid.initialized_count(), 0);
        assert_eq!(grid.completed_rows(), 0);
        assert_eq!(grid.sum(), 0.0);
        assert!(grid.iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_dimensions_out_of_range() {
        assert_eq!(
            Grid::new(0, 3),
            Err(GridError::DimensionsOutOfRange { rows: 0, columns: 3 })
        );
        assert!(Grid::new(3, MAX_DIMENSION + 1).is_err());
        assert!(Grid::new(MAX_DIMENSION, 1).is_ok());
    }

    #[test]
    fn test_row_and_linear_indexing_share_storage() {
        let mut grid = Grid::new(3, 4).unwrap();
        for row in 0..3 {
            for column in 0..4 {
                let value = (row * 10 + column) as f64;
                grid.set(row, column, value);
                assert_eq!(grid.get(row, column), value);
                assert_eq!(grid.get_linear(row * 4 + column), value);
                assert_eq!(grid[(row, column)], value);
                assert_eq!(grid[row * 4 + column], value);
            }
        }

        grid.set_linear(6, -1.5);
        assert_eq!(grid.get(1, 2), -1.5);
    }

    #[test]
    fn test_initialized_count_ignores_overwrites() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(0, 0, 1.0);
        grid.set(2, 1, 1.0);
        grid.set_linear(4, 1.0);
        assert_eq!(grid.initialized_count(), 3);

        grid.set(0, 0, 5.0);
        grid.set_linear(7, 2.0); // same cell as (2, 1)
        assert_eq!(grid.initialized_count(), 3);
        assert!(grid.is_initialized(1, 1));
        assert!(!grid.is_initialized(1, 0));
    }

    #[test]
    fn test_zero_write_counts_as_initialized() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(1, 1, 0.0);
        assert!(grid.is_initialized(1, 1));
        assert_eq!(grid.initialized_count(), 1);
    }

    #[test]
    fn test_completed_rows_tracks_full_rows() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set(1, 0, 1.0);
        grid.set(1, 1, 1.0);
        assert_eq!(grid.completed_rows(), 0);
        grid.set(1, 2, 1.0);
        assert_eq!(grid.completed_rows(), 1);
        grid.set(1, 2, 3.0);
        assert_eq!(grid.completed_rows(), 1);
    }

    #[test]
    fn test_append_row() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.append_row(&[1.0, 2.0, 3.0]).unwrap();
        grid.append_row(&[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(grid.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(grid.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(grid.completed_rows(), 2);
        assert!(grid.is_full());

        assert_eq!(grid.append_row(&[7.0, 8.0, 9.0]), Err(GridError::Full));
    }

    #[test]
    fn test_append_row_length_mismatch_leaves_grid_untouched() {
        let mut grid = Grid::new(2, 3).unwrap();
        assert_eq!(
            grid.append_row(&[1.0, 2.0]),
            Err(GridError::RowLength { expected: 3, actual: 2 })
        );
        assert_eq!(grid.initialized_count(), 0);
        assert_eq!(grid.sum(), 0.0);
    }

    #[test]
    fn test_append_row_skips_completed_rows() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(0, 0, 1.0);
        grid.set(0, 1, 1.0);
        grid.append_row(&[2.0, 2.0]).unwrap();
        assert_eq!(grid.row(1), &[2.0, 2.0]);
    }

    #[test]
    fn test_append_value_fills_linear_slots() {
        let mut grid = Grid::new(2, 2).unwrap();
        for value in [1.0, 2.0, 3.0, 4.0] {
            grid.append_value(value).unwrap();
        }
        assert_eq!(grid.get(0, 1), 2.0);
        assert_eq!(grid.get(1, 0), 3.0);
        assert_eq!(grid.completed_rows(), 2);
        assert_eq!(grid.append_value(5.0), Err(GridError::Full));
        assert_eq!(grid.initialized_count(), 4);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[[0.0, 1.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.sum(), 4.0);

        let empty: [[f64; 3]; 0] = [];
        assert_eq!(Grid::from_rows(&empty), Err(GridError::Empty));

        let ragged = [vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(Grid::from_rows(&ragged), Err(GridError::RowLength { .. })));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut grid = Grid::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        grid.clear();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.initialized_count(), 0);
        assert_eq!(grid.completed_rows(), 0);
        assert_eq!(grid.sum(), 0.0);
        grid.append_row(&[5.0, 6.0]).unwrap();
        assert_eq!(grid.row(0), &[5.0, 6.0]);
    }

    #[test]
    fn test_contains_only_scans_written_cells() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.append_value(7.0).unwrap();
        assert!(grid.contains(7.0));
        assert!(!grid.contains(3.0));
        // 0.0 sits in uninitialized slots only
        assert!(!grid.contains(0.0));
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut grid = Grid::new(2, 2).unwrap();
        for value in [1.0, 2.0, 3.0] {
            grid.append_value(value).unwrap();
        }

        assert!(grid.remove(2.0));
        assert_eq!(grid.initialized_count(), 2);
        assert_eq!(grid.iter().collect::<Vec<_>>(), vec![1.0, 3.0, 0.0, 0.0]);
        assert_eq!(grid.completed_rows(), 1);
        assert!(!grid.is_initialized(1, 0));

        assert!(!grid.remove(9.0));
        assert_eq!(grid.initialized_count(), 2);
    }

    #[test]
    fn test_remove_last_initialized_value() {
        let mut grid = Grid::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(grid.remove(4.0));
        assert_eq!(grid.completed_rows(), 1);
        assert_eq!(grid.sum(), 6.0);
        grid.append_value(8.0).unwrap();
        assert_eq!(grid.get(1, 1), 8.0);
    }

    #[test]
    fn test_remove_after_sparse_writes_keeps_counts() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(1, 1, 5.0);
        // (0, 0) holds 0.0 but was never written
        assert!(!grid.remove(0.0));
        assert!(grid.remove(5.0));
        assert_eq!(grid.initialized_count(), 0);
        assert!(!grid.is_initialized(1, 1));

        for value in [1.0, 2.0, 3.0] {
            grid.append_value(value).unwrap();
        }
        assert_eq!(grid.initialized_count(), 3);
        assert!(!grid.is_full());
        grid.append_value(4.0).unwrap();
        assert!(grid.is_full());
        assert_eq!(grid.append_value(5.0), Err(GridError::Full));
    }

    #[test]
    fn test_remove_shifts_across_gaps() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, 1.0);
        grid.set(1, 0, 2.0);
        grid.set(1, 1, 3.0);

        assert!(grid.remove(1.0));
        assert_eq!(grid.iter().collect::<Vec<_>>(), vec![2.0, 0.0, 3.0, 0.0]);
        assert_eq!(grid.initialized_count(), 2);
        assert!(grid.is_initialized(0, 0));
        assert!(!grid.is_initialized(0, 1));
        assert!(grid.is_initialized(1, 0));
        assert!(!grid.is_initialized(1, 1));
        assert_eq!(grid.completed_rows(), 0);
    }

    #[test]
    fn test_iter_is_restartable() {
        let grid = Grid::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let first: Vec<f64> = grid.iter().collect();
        let second: Vec<f64> = (&grid).into_iter().collect();
        assert_eq!(first, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(first, second);
        assert_eq!(grid.sum(), 10.0);
    }

    #[test]
    fn test_copy_to_and_display() {
        let grid = Grid::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let mut flat = [0.0; 5];
        grid.copy_to(&mut flat, 1);
        assert_eq!(flat, [0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.to_string(), "1\t2\t\n3\t4\t\n");
    }
}
