//! # gridcalc
//!
//! An in-memory spreadsheet engine with dependency tracking.
//!
//! Cells hold literal text or formulas (`=A1*2+B3`). Every edit keeps the
//! dependency graph between cells up to date, rejects edits that would
//! make a cell depend on itself, and drops the memoized results of every
//! formula affected by the change. Formulas are evaluated lazily, the first
//! time their value is read.
//!
//! ## Features
//!
//! - Arithmetic formulas over numbers and A1-style cell references
//! - Circular dependency detection at edit time
//! - Memoized formula results with targeted invalidation
//! - Tab-separated dumps of values or texts
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! sheet.set_cell(a1, "=B1+1").unwrap();
//! assert_eq!(sheet.value_at(a1).unwrap(), CellValue::Number(1.0));
//!
//! // B1 -> A1 -> B1 would be a cycle
//! assert!(matches!(sheet.set_cell(b1, "=A1"), Err(Error::CircularDependency(_))));
//!
//! let mut out = Vec::new();
//! sheet.print_values(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "1\n");
//! ```

mod cell;
mod dependency;
pub mod prelude;
mod print;
mod sheet;

pub use cell::{CellMut, CellRef};
pub use print::PrintOptions;
pub use sheet::Sheet;

// Re-export core types
pub use gridcalc_core::{
    CellError, CellValue, Error, Position, Result, Size, ESCAPE_SIGN, FORMULA_SIGN, MAX_COLS,
    MAX_ROWS,
};

// Re-export formula types
pub use gridcalc_formula::{parse_formula, Formula, FormulaError, FormulaExpr, FormulaValue};
