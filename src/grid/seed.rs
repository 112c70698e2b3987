//! Random initial populations

use rand::Rng;

use super::matrix::{Grid, Result};

/// Build a grid where each cell is alive (`1.0`) with the given probability.
///
/// Cells are appended in row-major order, so the result is fully initialized.
pub fn random_grid<R: Rng>(
    rows: usize,
    columns: usize,
    probability: f64,
    rng: &mut R,
) -> Result<Grid> {
    let mut grid = Grid::new(rows, columns)?;
    for _ in 0..grid.len() {
        let alive = rng.gen::<f64>() < probability;
        grid.append_value(if alive { 1.0 } else { 0.0 })?;
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_grid_is_full_and_binary() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = random_grid(10, 12, 0.25, &mut rng).unwrap();
        assert!(grid.is_full());
        assert_eq!(grid.completed_rows(), 10);
        assert!(grid.iter().all(|v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_grid(5, 5, 0.0, &mut rng).unwrap().sum(), 0.0);
        assert_eq!(random_grid(5, 5, 1.0, &mut rng).unwrap().sum(), 25.0);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = random_grid(8, 8, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = random_grid(8, 8, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_grid(0, 5, 0.5, &mut rng).is_err());
    }
}
