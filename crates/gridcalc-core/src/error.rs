//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when editing or reading a sheet
///
/// These are failures of an operation: the sheet is left exactly as it was.
/// Evaluation problems such as `#DIV/0!` are not errors in this sense; they
/// are ordinary cell values (see [`CellError`](crate::CellError)).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range position
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Formula text could not be parsed
    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    /// Accepting the edit would make a cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(String),

    /// Writing sheet output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid position error with a message
    pub fn invalid_position<S: Into<String>>(msg: S) -> Self {
        Error::InvalidPosition(msg.into())
    }
}
