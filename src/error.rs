use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum PointIndexError {
    /// The input points or query did not satisfy the index contract:
    /// inconsistent or zero dimensionality, a non-finite coordinate, or an
    /// unknown index method.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A search was issued against an index containing no points.
    #[error("Cannot search an empty index.")]
    EmptyIndex,
}

/// Alias for `std::result::Result` with [`PointIndexError`] as the error type.
pub type Result<T> = std::result::Result<T, PointIndexError>;
