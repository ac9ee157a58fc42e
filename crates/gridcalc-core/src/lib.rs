//! # gridcalc-core
//!
//! Core value types for the gridcalc spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`Position`] and [`Size`] - Cell addressing and printable extents
//! - [`CellValue`] and [`CellError`] - What a cell evaluates to
//! - [`Error`] - Failures of sheet operations
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellValue, Position};
//!
//! let pos: Position = "C2".parse().unwrap();
//! assert_eq!((pos.row, pos.col), (1, 2));
//! assert_eq!(pos.to_string(), "C2");
//!
//! assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellError, CellValue, Position, Size};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: i32 = 16_384;

/// Leading character marking cell text as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character forcing cell text to be taken literally
pub const ESCAPE_SIGN: char = '\'';
