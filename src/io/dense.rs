//! Dense frame dump: shape plus every cell value, as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct DenseFrame {
    shape: [usize; 2],
    rows: Vec<Vec<u8>>,
}

pub fn write<W: Write>(board: &Board, writer: W) -> Result<()> {
    let n = board.size();
    let frame = DenseFrame {
        shape: [n, n],
        rows: board.cells().chunks(n).map(<[u8]>::to_vec).collect(),
    };
    serde_json::to_writer(writer, &frame)?;
    Ok(())
}

pub fn read<R: Read>(reader: R) -> Result<Board> {
    let frame: DenseFrame = serde_json::from_reader(reader)?;
    let [rows, cols] = frame.shape;
    if rows != cols {
        return Err(Error::InvalidShape(format!(
            "dense frame is {rows}x{cols}, boards must be square"
        )));
    }
    if frame.rows.len() != rows {
        return Err(Error::InvalidShape(format!(
            "dense frame declares {rows} rows but holds {}",
            frame.rows.len()
        )));
    }
    Board::from_rows(&frame.rows)
}

pub fn save(board: &Board, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(board, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Board> {
    read(BufReader::new(File::open(path)?))
}
