//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while building a formula
///
/// Evaluation never fails with this type; evaluation problems are
/// reported in-band as [`gridcalc_core::CellError`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<FormulaError> for gridcalc_core::Error {
    fn from(err: FormulaError) -> Self {
        match err {
            FormulaError::Parse(msg) => gridcalc_core::Error::FormulaParse(msg),
        }
    }
}
