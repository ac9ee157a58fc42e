//! Cell-related value types
//!
//! This module contains:
//! - [`Position`] - A cell's location (e.g., "A1")
//! - [`Size`] - The extent of a printable area
//! - [`CellValue`] - The value observed when reading a cell
//! - [`CellError`] - In-band evaluation errors

mod position;
mod value;

pub use position::{Position, Size};
pub use value::{CellError, CellValue};
