//! Initial board generators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::{Error, Result};

/// Each cell alive independently with probability `density`.
pub fn random(size: usize, density: f64, seed: u64) -> Result<Board> {
    if !(0.0..=1.0).contains(&density) {
        return Err(Error::InvalidDensity(density));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = (0..size * size)
        .map(|_| (rng.random::<f64>() < density) as u8)
        .collect();
    Board::from_cells(size, cells)
}

/// An alive `side` x `side` square in the middle of the board.
pub fn square(size: usize, side: usize) -> Result<Board> {
    if side > size {
        return Err(Error::InvalidShape(format!(
            "{side}x{side} square does not fit a {size}x{size} board"
        )));
    }
    let start = (size - side) / 2;
    let cells = (start..start + side).flat_map(|r| (start..start + side).map(move |c| (r, c)));
    Board::from_alive(size, cells)
}

#[cfg(test)]
mod tests {
    use super::{random, square};

    #[test]
    fn random_is_reproducible() {
        let a = random(32, 0.5, 123).unwrap();
        let b = random(32, 0.5, 123).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, random(32, 0.5, 124).unwrap());
    }

    #[test]
    fn random_density_extremes() {
        assert_eq!(random(16, 0.0, 1).unwrap().population(), 0);
        assert_eq!(random(16, 1.0, 1).unwrap().population(), 256);
        assert!(random(16, 1.5, 1).is_err());
    }

    #[test]
    fn square_is_centered() {
        let board = square(16, 2).unwrap();
        assert_eq!(board.population(), 4);
        for (r, c) in [(7, 7), (7, 8), (8, 7), (8, 8)] {
            assert!(board.get(r, c));
        }
    }
}
