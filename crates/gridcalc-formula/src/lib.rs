//! # gridcalc-formula
//!
//! Formula parser and evaluator for gridcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST), for `+ - * /`, unary signs,
//!   parentheses, numbers and A1-style cell references
//! - Formula evaluation against a caller-supplied cell lookup
//! - Canonical re-rendering of a parsed formula back to text
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_formula::{parse_formula, FormulaValue};
//!
//! let formula = parse_formula("(A1 + 4) / 2").unwrap();
//! assert_eq!(formula.expression(), "(A1+4)/2");
//! assert_eq!(formula.evaluate(&|_| Ok(6.0)), FormulaValue::Number(5.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, text_to_number, CellLookup, FormulaValue};
pub use formula::{parse_formula, Formula};
pub use parser::parse_expression;
