//! Neighbor counting.
//!
//! Two strategies produce the same integer counts on a toroidal board:
//! - spectral: transform, multiply by the cached kernel spectrum, invert,
//!   round, roll back into place;
//! - spatial: direct correlation with the point-reflected mask.
//!
//! Both see the mask through convolution, so an entry at `(a, b)` counts the
//! cell at offset `(c_r - a, c_c - b)` from the mask center. For the
//! symmetric masks used in practice that is the plain offset.

use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex64;

use crate::backend::ComputeBackend;
use crate::board::Board;
use crate::error::{Error, Result};
use crate::kernel::{Kernel, output_shift};
use crate::mask::NeighborhoodMask;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Frequency-domain circular convolution. Toroidal only.
    #[default]
    Spectral,
    /// Direct correlation; honors either boundary.
    Spatial,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Edges wrap around.
    #[default]
    Toroidal,
    /// Off-board neighbors are dead.
    Fixed,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spectral" | "fft" => Ok(Self::Spectral),
            "spatial" | "conv" | "direct" => Ok(Self::Spatial),
            other => Err(Error::Parse {
                line: 1,
                message: format!("unknown strategy {other:?}"),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Spectral => "spectral",
            Self::Spatial => "spatial",
        })
    }
}

impl FromStr for Boundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toroidal" | "torus" | "wrap" => Ok(Self::Toroidal),
            "fixed" | "bounded" | "dead" => Ok(Self::Fixed),
            other => Err(Error::Parse {
                line: 1,
                message: format!("unknown boundary {other:?}"),
            }),
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Toroidal => "toroidal",
            Self::Fixed => "fixed",
        })
    }
}

/// Frequency-domain counter with its cached kernel spectrum and work buffers.
pub struct SpectralCounter {
    size: usize,
    max_count: u32,
    kernel_spectrum: Vec<Complex64>,
    work: Vec<Complex64>,
    rounded: Vec<u32>,
}

impl SpectralCounter {
    pub fn new<B: ComputeBackend>(
        size: usize,
        mask: &NeighborhoodMask,
        backend: &mut B,
    ) -> Result<Self> {
        let kernel = Kernel::build(size, mask)?;
        let kernel_spectrum = kernel.spectrum(backend);
        Ok(Self {
            size,
            max_count: mask.sum(),
            kernel_spectrum,
            work: vec![Complex64::default(); size * size],
            rounded: vec![0; size * size],
        })
    }

    pub fn count<B: ComputeBackend>(&mut self, backend: &mut B, board: &Board, out: &mut [u32]) {
        let n = self.size;
        for (w, &c) in self.work.iter_mut().zip(board.cells()) {
            *w = Complex64::new(c as f64, 0.0);
        }
        backend.transform(n, &mut self.work);
        backend.multiply(&mut self.work, &self.kernel_spectrum);
        backend.inverse_transform(n, &mut self.work);
        backend.round_real(&self.work, self.max_count, &mut self.rounded);
        backend.roll(n, &self.rounded, output_shift(n), out);
    }
}

/// Direct counter over the reflected mask's offsets.
pub struct SpatialCounter {
    size: usize,
    offsets: Vec<(isize, isize)>,
    boundary: Boundary,
}

impl SpatialCounter {
    pub fn new(size: usize, mask: &NeighborhoodMask, boundary: Boundary) -> Result<Self> {
        if mask.height() > size || mask.width() > size {
            return Err(Error::InvalidShape(format!(
                "{}x{} mask does not fit a {size}x{size} board",
                mask.height(),
                mask.width()
            )));
        }
        Ok(Self {
            size,
            offsets: mask.reflected().offsets(),
            boundary,
        })
    }

    pub fn count<B: ComputeBackend>(&self, backend: &B, board: &Board, out: &mut [u32]) {
        backend.correlate(self.size, board.cells(), &self.offsets, self.boundary, out);
    }
}

pub enum NeighborCounter {
    Spectral(SpectralCounter),
    Spatial(SpatialCounter),
}

impl NeighborCounter {
    /// Build the counter for `strategy`, precomputing everything that does
    /// not depend on the board contents.
    pub fn new<B: ComputeBackend>(
        strategy: Strategy,
        boundary: Boundary,
        size: usize,
        mask: &NeighborhoodMask,
        backend: &mut B,
    ) -> Result<Self> {
        match (strategy, boundary) {
            (Strategy::Spectral, Boundary::Fixed) => Err(Error::UnsupportedBoundary),
            (Strategy::Spectral, Boundary::Toroidal) => Ok(Self::Spectral(
                SpectralCounter::new(size, mask, backend)?,
            )),
            (Strategy::Spatial, boundary) => {
                Ok(Self::Spatial(SpatialCounter::new(size, mask, boundary)?))
            }
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Spectral(_) => Strategy::Spectral,
            Self::Spatial(_) => Strategy::Spatial,
        }
    }

    /// Write the neighbor count of every cell of `board` into `out`.
    pub fn count<B: ComputeBackend>(&mut self, backend: &mut B, board: &Board, out: &mut [u32]) {
        match self {
            Self::Spectral(c) => c.count(backend, board, out),
            Self::Spatial(c) => c.count(backend, board, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Boundary, NeighborCounter, Strategy};
    use crate::backend::SerialBackend;
    use crate::board::Board;
    use crate::error::Error;
    use crate::mask::NeighborhoodMask;

    fn counts(
        strategy: Strategy,
        boundary: Boundary,
        board: &Board,
        mask: &NeighborhoodMask,
    ) -> Vec<u32> {
        let mut backend = SerialBackend::new();
        let mut counter =
            NeighborCounter::new(strategy, boundary, board.size(), mask, &mut backend).unwrap();
        let mut out = vec![0; board.cell_count()];
        counter.count(&mut backend, board, &mut out);
        out
    }

    #[test]
    fn spectral_rejects_fixed_boundary() {
        let mut backend = SerialBackend::new();
        let err = NeighborCounter::new(
            Strategy::Spectral,
            Boundary::Fixed,
            8,
            &NeighborhoodMask::moore(1),
            &mut backend,
        );
        assert!(matches!(err, Err(Error::UnsupportedBoundary)));
    }

    #[test]
    fn single_cell_lights_its_moore_ring() {
        let board = Board::from_alive(6, [(2, 3)]).unwrap();
        let mask = NeighborhoodMask::moore(1);
        for strategy in [Strategy::Spectral, Strategy::Spatial] {
            let out = counts(strategy, Boundary::Toroidal, &board, &mask);
            for r in 0..6usize {
                for c in 0..6usize {
                    let ring = r.abs_diff(2) <= 1 && c.abs_diff(3) <= 1 && (r, c) != (2, 3);
                    assert_eq!(out[r * 6 + c], ring as u32, "{strategy} at ({r},{c})");
                }
            }
        }
    }

    #[test]
    fn asymmetric_mask_agrees_across_strategies() {
        let mask = NeighborhoodMask::from_rows(&[[1u8, 1, 0], [0, 0, 0], [0, 0, 1]]).unwrap();
        let board = Board::from_alive(7, [(0, 0), (3, 4), (6, 6), (5, 1)]).unwrap();
        let spectral = counts(Strategy::Spectral, Boundary::Toroidal, &board, &mask);
        let spatial = counts(Strategy::Spatial, Boundary::Toroidal, &board, &mask);
        assert_eq!(spectral, spatial);
    }

    #[test]
    fn corner_cell_counts_fewer_without_wrap() {
        let board = Board::from_alive(4, [(0, 0)]).unwrap();
        let mask = NeighborhoodMask::moore(1);
        let torus = counts(Strategy::Spatial, Boundary::Toroidal, &board, &mask);
        let fixed = counts(Strategy::Spatial, Boundary::Fixed, &board, &mask);
        assert_eq!(torus.iter().sum::<u32>(), 8);
        assert_eq!(fixed.iter().sum::<u32>(), 3);
        assert_eq!(torus[15], 1);
        assert_eq!(fixed[15], 0);
    }
}
