//! Life 1.06 sparse export.
//!
//! A `#Life 1.06` header followed by one `x y` pair per alive cell, where `x`
//! is the column and `y` the row. Cells are listed column by column (`x`
//! outer, `y` inner). Lines are newline-separated with no trailing newline.

use std::fs;
use std::path::Path;

use crate::board::Board;
use crate::error::{Error, Result};

pub const HEADER: &str = "#Life 1.06";

pub fn to_string(board: &Board) -> String {
    let n = board.size();
    let mut lines = vec![HEADER.to_string()];
    for x in 0..n {
        for y in 0..n {
            if board.get(y, x) {
                lines.push(format!("{x} {y}"));
            }
        }
    }
    lines.join("\n")
}

/// Parse Life 1.06 text onto an all-dead `size` x `size` board.
///
/// Comment lines (`#...`) and blank lines are skipped. Coordinates outside
/// the board are an error.
pub fn parse(text: &str, size: usize) -> Result<Board> {
    let mut board = Board::new(size)?;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_err = |message: String| Error::Parse {
            line: i + 1,
            message,
        };
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(parse_err(format!("expected \"x y\", got {line:?}")));
        };
        let x: usize = x
            .parse()
            .map_err(|e| parse_err(format!("bad x {x:?}: {e}")))?;
        let y: usize = y
            .parse()
            .map_err(|e| parse_err(format!("bad y {y:?}: {e}")))?;
        if x >= size || y >= size {
            return Err(parse_err(format!(
                "cell ({x}, {y}) lies outside a {size}x{size} board"
            )));
        }
        board.set(y, x, true);
    }
    Ok(board)
}

pub fn save(board: &Board, path: &Path) -> Result<()> {
    fs::write(path, to_string(board))?;
    Ok(())
}

pub fn load(path: &Path, size: usize) -> Result<Board> {
    parse(&fs::read_to_string(path)?, size)
}

#[cfg(test)]
mod tests {
    use super::{HEADER, parse, to_string};
    use crate::board::Board;
    use crate::error::Error;

    #[test]
    fn lists_cells_column_major() {
        // (row, col): (0, 1), (1, 0), (2, 1)
        let board = Board::from_alive(3, [(0, 1), (1, 0), (2, 1)]).unwrap();
        assert_eq!(to_string(&board), "#Life 1.06\n0 1\n1 0\n1 2");
    }

    #[test]
    fn empty_board_is_header_only() {
        assert_eq!(to_string(&Board::new(4).unwrap()), HEADER);
    }

    #[test]
    fn rejects_out_of_range_cells() {
        let err = parse("#Life 1.06\n0 0\n4 1", 4).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse("#Life 1.06\n1 2 3", 4).is_err());
        assert!(parse("#Life 1.06\n-1 2", 4).is_err());
    }
}
