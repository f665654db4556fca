use thiserror::Error;

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or composing transforms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Singular matrix: transform cannot be inverted")]
    SingularMatrix,

    #[error("Transforms cannot be composed: {0}")]
    NotComposable(String),
}
