//! Single-threaded backend.

use rustfft::num_complex::Complex64;

use super::{
    BackendKind, ComputeBackend, PlanCache, apply_rule_slice, correlate_row, roll_row,
    round_count, transpose,
};
use crate::counter::Boundary;
use crate::rule::RuleTable;

pub struct SerialBackend {
    plans: PlanCache,
    scratch: Vec<Complex64>,
}

impl Default for SerialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialBackend {
    pub fn new() -> Self {
        Self {
            plans: PlanCache::new(),
            scratch: Vec::new(),
        }
    }

    fn transform_2d(&mut self, n: usize, data: &mut [Complex64], inverse: bool) {
        let plans = self.plans.get(n);
        let fft = if inverse {
            plans.inverse.clone()
        } else {
            plans.forward.clone()
        };
        let scratch_len = fft.get_inplace_scratch_len();
        if self.scratch.len() < scratch_len {
            self.scratch.resize(scratch_len, Complex64::default());
        }
        let scratch = &mut self.scratch[..scratch_len];
        // rustfft transforms every consecutive n-length chunk: rows, then columns.
        fft.process_with_scratch(data, scratch);
        transpose(n, data);
        fft.process_with_scratch(data, scratch);
        transpose(n, data);
    }
}

impl ComputeBackend for SerialBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Serial
    }

    fn transform(&mut self, n: usize, data: &mut [Complex64]) {
        self.transform_2d(n, data, false);
    }

    fn inverse_transform(&mut self, n: usize, data: &mut [Complex64]) {
        self.transform_2d(n, data, true);
        let scale = 1.0 / (n * n) as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }

    fn multiply(&self, data: &mut [Complex64], by: &[Complex64]) {
        for (d, &b) in data.iter_mut().zip(by) {
            *d *= b;
        }
    }

    fn round_real(&self, data: &[Complex64], max: u32, out: &mut [u32]) {
        for (o, &v) in out.iter_mut().zip(data) {
            *o = round_count(v, max);
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
        for (row, out_row) in out.chunks_mut(n).enumerate() {
            correlate_row(n, cells, offsets, boundary, row, out_row);
        }
    }

    fn roll(&self, n: usize, src: &[u32], shift: isize, dst: &mut [u32]) {
        for (row, dst_row) in dst.chunks_mut(n).enumerate() {
            roll_row(n, src, shift, row, dst_row);
        }
    }

    fn apply_rule(&self, cells: &[u8], counts: &[u32], table: &RuleTable, out: &mut [u8]) {
        apply_rule_slice(cells, counts, table, out);
    }
}
