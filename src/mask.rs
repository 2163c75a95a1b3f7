//! Neighborhood masks.

use crate::error::{Error, Result};

/// Odd-sized binary matrix naming which relative offsets count as neighbors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NeighborhoodMask {
    height: usize,
    width: usize,
    cells: Vec<u8>,
}

impl NeighborhoodMask {
    pub fn new(height: usize, width: usize, cells: Vec<u8>) -> Result<Self> {
        if height == 0 || width == 0 || height % 2 == 0 || width % 2 == 0 {
            return Err(Error::InvalidShape(format!(
                "mask dimensions must be odd, got {height}x{width}"
            )));
        }
        if cells.len() != height * width {
            return Err(Error::InvalidShape(format!(
                "expected {} mask entries for {height}x{width}, got {}",
                height * width,
                cells.len()
            )));
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(Error::InvalidCell { index, value });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(height * width);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::InvalidShape("mask rows differ in length".into()));
            }
            cells.extend_from_slice(row);
        }
        Self::new(height, width, cells)
    }

    /// Square of side `2 * radius + 1`, all ones except the center.
    pub fn moore(radius: usize) -> Self {
        let side = 2 * radius + 1;
        let mut cells = vec![1; side * side];
        cells[radius * side + radius] = 0;
        Self {
            height: side,
            width: side,
            cells,
        }
    }

    /// Diamond of Manhattan radius `radius`, center excluded.
    pub fn von_neumann(radius: usize) -> Self {
        let side = 2 * radius + 1;
        let mut cells = vec![0; side * side];
        for r in 0..side {
            for c in 0..side {
                let d = r.abs_diff(radius) + c.abs_diff(radius);
                if d != 0 && d <= radius {
                    cells[r * side + c] = 1;
                }
            }
        }
        Self {
            height: side,
            width: side,
            cells,
        }
    }

    /// Same mask with the center entry set, so a cell counts itself.
    pub fn with_center(mut self) -> Self {
        let center = (self.height / 2) * self.width + self.width / 2;
        self.cells[center] = 1;
        self
    }

    /// All-ones `side` x `side` mask; the center counts itself.
    pub fn full(side: usize) -> Result<Self> {
        Self::new(side, side, vec![1; side * side])
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.width + col]
    }

    /// Highest neighbor count this mask can produce.
    pub fn sum(&self) -> u32 {
        self.cells.iter().map(|&c| c as u32).sum()
    }

    /// Mask rotated by 180 degrees about its center.
    pub fn reflected(&self) -> Self {
        let mut cells = self.cells.clone();
        cells.reverse();
        Self {
            height: self.height,
            width: self.width,
            cells,
        }
    }

    /// `(row_offset, col_offset)` of every set entry relative to the center.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let cr = (self.height / 2) as isize;
        let cc = (self.width / 2) as isize;
        let mut out = Vec::new();
        for r in 0..self.height {
            for c in 0..self.width {
                if self.get(r, c) != 0 {
                    out.push((r as isize - cr, c as isize - cc));
                }
            }
        }
        out
    }
}
