use thiserror::Error;

/// Errors produced by matrix algebra, network construction and inference.
#[derive(Debug, Error)]
pub enum SwanError {
    /// A network or layer was described with an unusable size.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Operand shapes of a matrix operation are incompatible.
    #[error("dimension mismatch in {}: {}x{} and {}x{}", .op, .lhs.0, .lhs.1, .rhs.0, .rhs.1)]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// A destination or replacement matrix does not have the required shape.
    #[error("shape mismatch: expected {}x{}, found {}x{}", .expected.0, .expected.1, .found.0, .found.1)]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("cannot execute a network without any layers")]
    EmptyNetwork,

    /// Malformed dataset buffer (IDX header, truncation, count mismatch).
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SwanError>;
