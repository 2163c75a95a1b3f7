//! Board sources and frame sinks.

pub mod dense;
pub mod life106;
pub mod seed;

use std::path::Path;

use crate::board::Board;
use crate::error::Result;

/// Save `board` picking the format from the extension: `.life`/`.lif` write
/// Life 1.06, anything else a dense JSON frame.
pub fn save_board(board: &Board, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if is_life_path(path) {
        life106::save(board, path)
    } else {
        dense::save(board, path)
    }
}

/// Load a board written by [`save_board`]. Life 1.06 files carry no size,
/// so `size` must be given for them; dense frames ignore it.
pub fn load_board(path: impl AsRef<Path>, size: usize) -> Result<Board> {
    let path = path.as_ref();
    if is_life_path(path) {
        life106::load(path, size)
    } else {
        dense::load(path)
    }
}

fn is_life_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("life") || e.eq_ignore_ascii_case("lif"))
}
