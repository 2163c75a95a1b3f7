//! Square binary board.
//!
//! Cells are stored row-major as `u8` (0 = dead, 1 = alive). Coordinates are
//! `(row, col)` with `(0, 0)` in the top-left corner.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<u8>,
}

impl Board {
    /// An all-dead board of `size` x `size` cells.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidShape("board size must be at least 1".into()));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Wrap a row-major cell buffer, validating shape and values.
    pub fn from_cells(size: usize, cells: Vec<u8>) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidShape("board size must be at least 1".into()));
        }
        if cells.len() != size * size {
            return Err(Error::InvalidShape(format!(
                "expected {} cells for a {size}x{size} board, got {}",
                size * size,
                cells.len()
            )));
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(Error::InvalidCell { index, value });
        }
        Ok(Self { size, cells })
    }

    /// Build from nested rows; every row must be as long as there are rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(Error::InvalidShape(format!(
                    "board is not square: row {r} has {} cells, expected {size}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::from_cells(size, cells)
    }

    /// Build a board with the given `(row, col)` cells alive.
    pub fn from_alive<I>(size: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut board = Self::new(size)?;
        for (row, col) in alive {
            if row >= size || col >= size {
                return Err(Error::InvalidShape(format!(
                    "cell ({row}, {col}) lies outside a {size}x{size} board"
                )));
            }
            board.cells[row * size + col] = 1;
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell is alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col] != 0
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        self.cells[row * self.size + col] = alive as u8;
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }

    /// Visit alive cells in row-major order.
    pub fn for_each_alive<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (i, &c) in self.cells.iter().enumerate() {
            if c != 0 {
                f(i / self.size, i % self.size);
            }
        }
    }

    pub(crate) fn cells_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for &c in row {
                f.write_str(if c != 0 { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
