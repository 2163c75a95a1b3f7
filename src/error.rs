//! Error types for conv-life.

use thiserror::Error;

/// Errors raised while building or feeding an automaton.
///
/// Everything here is reported at construction or load time; stepping an
/// already-built automaton cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Board is not square, or the mask does not fit the board.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A cell or mask entry outside {0, 1}.
    #[error("invalid cell value {value} at index {index} (expected 0 or 1)")]
    InvalidCell { index: usize, value: u8 },

    /// A rule count that no neighborhood can ever reach.
    #[error("invalid rule: count {count} exceeds the mask maximum of {max}")]
    InvalidRule { count: u32, max: u32 },

    /// Requested execution backend is unknown or could not be started.
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// The spectral strategy always wraps, so it cannot honor a fixed boundary.
    #[error("the spectral strategy only supports the toroidal boundary")]
    UnsupportedBoundary,

    #[error("density must lie in [0, 1], got {0}")]
    InvalidDensity(f64),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
