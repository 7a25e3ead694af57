//! Error types for tabulon table recovery.

use thiserror::Error;

/// Errors raised when geometry is used outside of its defined domain.
///
/// These all describe programming errors on the caller's side: the engine
/// never produces them for well-formed page primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("oblique ruling has no position, start or end: ({x1}, {y1}) -> ({x2}, {y2})")]
    ObliqueRuling { x1: f64, y1: f64, x2: f64, y2: f64 },

    #[error("cannot compute the bounding box of an empty collection")]
    EmptyBoundingBox,

    #[error("rulings must be one horizontal and one vertical")]
    NotPerpendicular,
}

/// Convenience Result type alias for TableError.
pub type Result<T> = std::result::Result<T, TableError>;
