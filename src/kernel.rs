//! Board-shaped convolution kernel.
//!
//! The mask is embedded into an otherwise-zero `n` x `n` matrix with its top
//! left corner at `((n - h - 1) div 2, (n - w - 1) div 2)`, wrapping modulo
//! `n`. Together with the output roll of `1 - n / 2` this puts every count
//! back on the cell it belongs to.

use rustfft::num_complex::Complex64;
use tracing::debug;

use crate::backend::ComputeBackend;
use crate::error::{Error, Result};
use crate::mask::NeighborhoodMask;

#[derive(Clone, Debug)]
pub struct Kernel {
    size: usize,
    cells: Vec<f64>,
}

impl Kernel {
    pub fn build(size: usize, mask: &NeighborhoodMask) -> Result<Self> {
        let (h, w) = (mask.height(), mask.width());
        if h > size || w > size {
            return Err(Error::InvalidShape(format!(
                "{h}x{w} mask does not fit a {size}x{size} board"
            )));
        }
        let (row0, col0) = window_origin(size, h, w);
        let mut cells = vec![0.0; size * size];
        for r in 0..h {
            let kr = (row0 + r as isize).rem_euclid(size as isize) as usize;
            for c in 0..w {
                let kc = (col0 + c as isize).rem_euclid(size as isize) as usize;
                cells[kr * size + kc] = mask.get(r, c) as f64;
            }
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Forward transform of the kernel; computed once per automaton.
    pub fn spectrum<B: ComputeBackend>(&self, backend: &mut B) -> Vec<Complex64> {
        let mut data: Vec<Complex64> = self
            .cells
            .iter()
            .map(|&v| Complex64::new(v, 0.0))
            .collect();
        backend.transform(self.size, &mut data);
        debug!(size = self.size, backend = %backend.kind(), "kernel spectrum cached");
        data
    }
}

/// Top-left corner of the mask window; may be negative when the mask is as
/// large as the board.
pub fn window_origin(size: usize, h: usize, w: usize) -> (isize, isize) {
    let n = size as isize;
    (
        (n - h as isize - 1).div_euclid(2),
        (n - w as isize - 1).div_euclid(2),
    )
}

/// Shift that aligns circular-convolution output with the cell indices.
pub fn output_shift(size: usize) -> isize {
    1 - (size / 2) as isize
}
