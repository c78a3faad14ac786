use thiserror::Error;

/// Result alias used throughout the crate.
pub type TopoResult<T> = Result<T, TopoError>;

/// Errors raised while building or running topological models.
#[derive(Debug, Error)]
pub enum TopoError {
    #[error("shape mismatch in {op}: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("ragged matrix data: row {row} has {found} columns, expected {expected}")]
    RaggedRows { row: usize, found: usize, expected: usize },

    #[error("missing structural operator: {0}")]
    MissingOperator(&'static str),

    #[error("invalid cell {cell:?}: {reason}")]
    InvalidCell { cell: Vec<usize>, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
