//! Error types for occlusion queries.

use thiserror::Error;

/// Errors raised while answering a visibility query.
///
/// None of these reach callers of the fail-open entry point; they exist so the
/// failure can be logged with a meaningful cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input geometry that cannot be mapped onto the voxel grid
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Integer coordinate arithmetic left the representable range
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// The chunk data provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
