//! Numeric backends.
//!
//! A [`ComputeBackend`] provides every bulk array operation the stepping
//! engine needs. The backend is picked once, when an automaton is built, and
//! owns whatever resources it needs (FFT plans, a thread pool) for the
//! automaton's lifetime. The row kernels in this module are shared by every
//! implementation; backends differ only in how they schedule rows.

mod parallel;
mod serial;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::counter::Boundary;
use crate::error::{Error, Result};
use crate::rule::RuleTable;

pub use parallel::RayonBackend;
pub use serial::SerialBackend;

/// Bulk array operations over square `n` x `n` row-major buffers.
pub trait ComputeBackend {
    fn kind(&self) -> BackendKind;

    /// Worker threads the backend schedules onto.
    fn threads(&self) -> usize {
        1
    }

    /// Forward 2-D DFT, in place.
    fn transform(&mut self, n: usize, data: &mut [Complex64]);

    /// Normalized inverse 2-D DFT, in place.
    fn inverse_transform(&mut self, n: usize, data: &mut [Complex64]);

    /// `data[i] *= by[i]`.
    fn multiply(&self, data: &mut [Complex64], by: &[Complex64]);

    /// Real parts rounded to the nearest integer and clamped to `0..=max`.
    fn round_real(&self, data: &[Complex64], max: u32, out: &mut [u32]);

    /// Count, for every cell, the live cells at `offsets` from it.
    fn correlate(
        &self,
        n: usize,
        cells: &[u8],
        offsets: &[(isize, isize)],
        boundary: Boundary,
        out: &mut [u32],
    );

    /// Cyclic shift by `shift` along both axes: `dst[i][j] = src[i - shift][j - shift]`.
    fn roll(&self, n: usize, src: &[u32], shift: isize, dst: &mut [u32]);

    /// Next state of every cell from its current state and neighbor count.
    fn apply_rule(&self, cells: &[u8], counts: &[u32], table: &RuleTable, out: &mut [u8]);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Single-threaded CPU.
    #[default]
    Serial,
    /// Rows scheduled across a dedicated rayon pool.
    Rayon,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" | "cpu" => Ok(Self::Serial),
            "rayon" | "parallel" => Ok(Self::Rayon),
            other => Err(Error::UnsupportedBackend(format!(
                "{other:?} (expected serial or rayon)"
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Serial => "serial",
            Self::Rayon => "rayon",
        })
    }
}

/// Runtime-selected backend.
pub enum Backend {
    Serial(SerialBackend),
    Rayon(RayonBackend),
}

impl Backend {
    pub fn new(kind: BackendKind, threads: usize) -> Result<Self> {
        Ok(match kind {
            BackendKind::Serial => Self::Serial(SerialBackend::new()),
            BackendKind::Rayon => Self::Rayon(RayonBackend::new(threads)?),
        })
    }
}

impl ComputeBackend for Backend {
    fn kind(&self) -> BackendKind {
        match self {
            Self::Serial(b) => b.kind(),
            Self::Rayon(b) => b.kind(),
        }
    }

    fn threads(&self) -> usize {
        match self {
            Self::Serial(b) => b.threads(),
            Self::Rayon(b) => b.threads(),
        }
    }

    fn transform(&mut self, n: usize, data: &mut [Complex64]) {
        match self {
            Self::Serial(b) => b.transform(n, data),
            Self::Rayon(b) => b.transform(n, data),
        }
    }

    fn inverse_transform(&mut self, n: usize, data: &mut [Complex64]) {
        match self {
            Self::Serial(b) => b.inverse_transform(n, data),
            Self::Rayon(b) => b.inverse_transform(n, data),
        }
    }

    fn multiply(&self, data: &mut [Complex64], by: &[Complex64]) {
        match self {
            Self::Serial(b) => b.multiply(data, by),
            Self::Rayon(b) => b.multiply(data, by),
        }
    }

    fn round_real(&self, data: &[Complex64], max: u32, out: &mut [u32]) {
        match self {
            Self::Serial(b) => b.round_real(data, max, out),
            Self::Rayon(b) => b.round_real(data, max, out),
        }
    }

    fn correlate(
        &self,
        n: usize,
        cells: &[u8],
        offsets: &[(isize, isize)],
        boundary: Boundary,
        out: &mut [u32],
    ) {
        match self {
            Self::Serial(b) => b.correlate(n, cells, offsets, boundary, out),
            Self::Rayon(b) => b.correlate(n, cells, offsets, boundary, out),
        }
    }

    fn roll(&self, n: usize, src: &[u32], shift: isize, dst: &mut [u32]) {
        match self {
            Self::Serial(b) => b.roll(n, src, shift, dst),
            Self::Rayon(b) => b.roll(n, src, shift, dst),
        }
    }

    fn apply_rule(&self, cells: &[u8], counts: &[u32], table: &RuleTable, out: &mut [u8]) {
        match self {
            Self::Serial(b) => b.apply_rule(cells, counts, table, out),
            Self::Rayon(b) => b.apply_rule(cells, counts, table, out),
        }
    }
}

/// Forward/inverse plans for one transform length.
pub(crate) struct FftPlans {
    pub(crate) n: usize,
    pub(crate) forward: Arc<dyn Fft<f64>>,
    pub(crate) inverse: Arc<dyn Fft<f64>>,
}

/// Planner plus the plans for the most recent length.
pub(crate) struct PlanCache {
    planner: FftPlanner<f64>,
    plans: Option<FftPlans>,
}

impl PlanCache {
    pub(crate) fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plans: None,
        }
    }

    pub(crate) fn get(&mut self, n: usize) -> &FftPlans {
        if self.plans.as_ref().is_some_and(|p| p.n != n) {
            self.plans = None;
        }
        let planner = &mut self.planner;
        self.plans.get_or_insert_with(|| FftPlans {
            n,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
        })
    }
}

/// Square in-place transpose.
pub(crate) fn transpose(n: usize, data: &mut [Complex64]) {
    for i in 0..n {
        for j in (i + 1)..n {
            data.swap(i * n + j, j * n + i);
        }
    }
}

#[inline]
pub(crate) fn round_count(value: Complex64, max: u32) -> u32 {
    // `as` saturates, so tiny negative residues land on 0.
    (value.re.round() as u32).min(max)
}

/// One output row of the direct neighbor count.
pub(crate) fn correlate_row(
    n: usize,
    cells: &[u8],
    offsets: &[(isize, isize)],
    boundary: Boundary,
    row: usize,
    out: &mut [u32],
) {
    out.fill(0);
    let size = n as isize;
    for &(dr, dc) in offsets {
        let src_row = row as isize + dr;
        let src_row = match boundary {
            Boundary::Toroidal => src_row.rem_euclid(size),
            Boundary::Fixed if (0..size).contains(&src_row) => src_row,
            Boundary::Fixed => continue,
        } as usize;
        let src = &cells[src_row * n..(src_row + 1) * n];
        match boundary {
            Boundary::Toroidal => {
                let k = dc.rem_euclid(size) as usize;
                // out[c] += src[(c + k) mod n], split at the wrap point
                for (o, &s) in out[..n - k].iter_mut().zip(&src[k..]) {
                    *o += s as u32;
                }
                for (o, &s) in out[n - k..].iter_mut().zip(&src[..k]) {
                    *o += s as u32;
                }
            }
            Boundary::Fixed => {
                let lo = (-dc).clamp(0, size) as usize;
                let hi = (size - dc).clamp(0, size) as usize;
                if lo >= hi {
                    continue;
                }
                let src_lo = (lo as isize + dc) as usize;
                for (o, &s) in out[lo..hi].iter_mut().zip(&src[src_lo..]) {
                    *o += s as u32;
                }
            }
        }
    }
}

/// One output row of [`ComputeBackend::roll`].
pub(crate) fn roll_row(n: usize, src: &[u32], shift: isize, row: usize, out: &mut [u32]) {
    let k = shift.rem_euclid(n as isize) as usize;
    let src_row = (row + n - k) % n;
    let src = &src[src_row * n..(src_row + 1) * n];
    out[k..].copy_from_slice(&src[..n - k]);
    out[..k].copy_from_slice(&src[n - k..]);
}

#[inline]
pub(crate) fn apply_rule_slice(cells: &[u8], counts: &[u32], table: &RuleTable, out: &mut [u8]) {
    for ((o, &cell), &count) in out.iter_mut().zip(cells).zip(counts) {
        *o = table.lookup(cell, count);
    }
}

#[cfg(test)]
mod tests {
    use rustfft::num_complex::Complex64;

    use super::{BackendKind, ComputeBackend, SerialBackend, correlate_row, roll_row, round_count};
    use crate::counter::Boundary;
    use crate::error::Error;

    #[test]
    fn backend_names_parse() {
        assert_eq!("Serial".parse::<BackendKind>().unwrap(), BackendKind::Serial);
        assert_eq!("parallel".parse::<BackendKind>().unwrap(), BackendKind::Rayon);
        assert!(matches!(
            "cuda".parse::<BackendKind>(),
            Err(Error::UnsupportedBackend(_))
        ));
    }

    #[test]
    fn rounding_absorbs_transform_residue() {
        let cases = [
            (2.999_999, 3),
            (3.000_001, 3),
            (-1e-7, 0),
            (1e-6, 0),
            (7.999_999_5, 8),
        ];
        for (re, expected) in cases {
            assert_eq!(round_count(Complex64::new(re, 1e-7), 8), expected, "{re}");
        }
        // clamped to the mask maximum
        assert_eq!(round_count(Complex64::new(8.000_001, 0.0), 8), 8);
        assert_eq!(round_count(Complex64::new(9.0, 0.0), 8), 8);
    }

    #[test]
    fn round_real_fills_every_cell() {
        let data = [
            Complex64::new(0.999_999, 0.0),
            Complex64::new(-0.000_000_3, 0.0),
            Complex64::new(4.000_000_9, -2e-9),
            Complex64::new(2.0, 0.0),
        ];
        let mut out = [99u32; 4];
        SerialBackend::new().round_real(&data, 8, &mut out);
        assert_eq!(out, [1, 0, 4, 2]);
    }

    #[test]
    fn roll_row_matches_cyclic_definition() {
        let n = 4;
        let src: Vec<u32> = (0..16).collect();
        for shift in [-5isize, -1, 0, 1, 3, 6] {
            for row in 0..n {
                let mut out = vec![0; n];
                roll_row(n, &src, shift, row, &mut out);
                for (col, &v) in out.iter().enumerate() {
                    let r = (row as isize - shift).rem_euclid(n as isize) as usize;
                    let c = (col as isize - shift).rem_euclid(n as isize) as usize;
                    assert_eq!(v, src[r * n + c], "shift {shift} at ({row},{col})");
                }
            }
        }
    }

    #[test]
    fn correlate_row_fixed_drops_off_board_offsets() {
        // single live cell in the corner of a 3x3 board
        let cells = [1u8, 0, 0, 0, 0, 0, 0, 0, 0];
        let offsets = [(0isize, -1isize), (0, 1)];
        let mut out = [0u32; 3];
        correlate_row(3, &cells, &offsets, Boundary::Fixed, 0, &mut out);
        assert_eq!(out, [0, 1, 0]);
        correlate_row(3, &cells, &offsets, Boundary::Toroidal, 0, &mut out);
        assert_eq!(out, [0, 1, 1]);
    }
}
