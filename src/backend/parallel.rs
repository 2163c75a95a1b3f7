//! Rayon backend: every operation runs row-parallel on a dedicated pool.

use rayon::prelude::*;
use rustfft::num_complex::Complex64;

use super::{
    BackendKind, ComputeBackend, PlanCache, apply_rule_slice, correlate_row, roll_row,
    round_count, transpose,
};
use crate::counter::Boundary;
use crate::error::{Error, Result};
use crate::rule::RuleTable;

/// Elements handed to one rayon task for flat elementwise passes.
const ELEMENTWISE_CHUNK: usize = 16_384;

pub struct RayonBackend {
    pool: rayon::ThreadPool,
    threads: usize,
    plans: PlanCache,
}

impl RayonBackend {
    pub fn new(threads: usize) -> Result<Self> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("conv-life-{i}"))
            .build()
            .map_err(|e| Error::UnsupportedBackend(format!("rayon pool: {e}")))?;
        Ok(Self {
            pool,
            threads,
            plans: PlanCache::new(),
        })
    }

    fn transform_2d(&mut self, n: usize, data: &mut [Complex64], inverse: bool) {
        let plans = self.plans.get(n);
        let fft = if inverse {
            plans.inverse.clone()
        } else {
            plans.forward.clone()
        };
        let scratch_len = fft.get_inplace_scratch_len();
        let rows = |data: &mut [Complex64]| {
            data.par_chunks_mut(n).for_each_init(
                || vec![Complex64::default(); scratch_len],
                |scratch, row| fft.process_with_scratch(row, scratch),
            );
        };
        self.pool.install(|| {
            rows(data);
            transpose(n, data);
            rows(data);
            transpose(n, data);
        });
    }
}

impl ComputeBackend for RayonBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rayon
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn transform(&mut self, n: usize, data: &mut [Complex64]) {
        self.transform_2d(n, data, false);
    }

    fn inverse_transform(&mut self, n: usize, data: &mut [Complex64]) {
        self.transform_2d(n, data, true);
        let scale = 1.0 / (n * n) as f64;
        self.pool.install(|| {
            data.par_chunks_mut(ELEMENTWISE_CHUNK).for_each(|chunk| {
                for v in chunk {
                    *v *= scale;
                }
            });
        });
    }

    fn multiply(&self, data: &mut [Complex64], by: &[Complex64]) {
        self.pool.install(|| {
            data.par_chunks_mut(ELEMENTWISE_CHUNK)
                .zip(by.par_chunks(ELEMENTWISE_CHUNK))
                .for_each(|(d, b)| {
                    for (d, &b) in d.iter_mut().zip(b) {
                        *d *= b;
                    }
                });
        });
    }

    fn round_real(&self, data: &[Complex64], max: u32, out: &mut [u32]) {
        self.pool.install(|| {
            out.par_chunks_mut(ELEMENTWISE_CHUNK)
                .zip(data.par_chunks(ELEMENTWISE_CHUNK))
                .for_each(|(o, d)| {
                    for (o, &v) in o.iter_mut().zip(d) {
                        *o = round_count(v, max);
                    }
                });
        });
    }

    fn correlate(
        &self,
        n: usize,
        cells: &[u8],
        offsets: &[(isize, isize)],
        boundary: Boundary,
        out: &mut [u32],
    ) {
        self.pool.install(|| {
            out.par_chunks_mut(n)
                .enumerate()
                .for_each(|(row, out_row)| correlate_row(n, cells, offsets, boundary, row, out_row));
        });
    }

    fn roll(&self, n: usize, src: &[u32], shift: isize, dst: &mut [u32]) {
        self.pool.install(|| {
            dst.par_chunks_mut(n)
                .enumerate()
                .for_each(|(row, dst_row)| roll_row(n, src, shift, row, dst_row));
        });
    }

    fn apply_rule(&self, cells: &[u8], counts: &[u32], table: &RuleTable, out: &mut [u8]) {
        self.pool.install(|| {
            out.par_chunks_mut(ELEMENTWISE_CHUNK)
                .zip(cells.par_chunks(ELEMENTWISE_CHUNK))
                .zip(counts.par_chunks(ELEMENTWISE_CHUNK))
                .for_each(|((o, c), k)| apply_rule_slice(c, k, table, o));
        });
    }
}
