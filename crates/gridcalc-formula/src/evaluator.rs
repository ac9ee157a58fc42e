//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use gridcalc_core::{CellError, CellValue, Position};

/// Resolves a referenced position to the number it contributes
///
/// Implementations decide how empty cells, text and errors map to numbers;
/// an `Err` aborts evaluation and becomes the formula's result.
pub type CellLookup<'a> = dyn Fn(Position) -> Result<f64, CellError> + 'a;

/// Result of evaluating a formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Error(CellError),
}

impl From<Result<f64, CellError>> for FormulaValue {
    fn from(result: Result<f64, CellError>) -> Self {
        match result {
            Ok(n) => FormulaValue::Number(n),
            Err(e) => FormulaValue::Error(e),
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::Error(e) => CellValue::Error(e),
        }
    }
}

/// Evaluate a formula AST
///
/// References are resolved through `lookup`; references to invalid positions
/// yield `#REF!` without consulting it.
pub fn evaluate(expr: &FormulaExpr, lookup: &CellLookup<'_>) -> FormulaValue {
    eval_expr(expr, lookup).into()
}

fn eval_expr(expr: &FormulaExpr, lookup: &CellLookup<'_>) -> Result<f64, CellError> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::CellRef(pos) => {
            if !pos.is_valid() {
                return Err(CellError::Ref);
            }
            lookup(*pos)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let value = eval_expr(operand, lookup)?;
            Ok(match op {
                UnaryOperator::Plus => value,
                UnaryOperator::Negate => -value,
            })
        }

        FormulaExpr::BinaryOp { op, left, right } => {
            let l = eval_expr(left, lookup)?;
            let r = eval_expr(right, lookup)?;
            let result = match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => l / r,
            };
            // Division by zero and overflow both surface as #DIV/0!
            if result.is_finite() {
                Ok(result)
            } else {
                Err(CellError::Div0)
            }
        }
    }
}

/// Interpret text as a number the way a formula reads a text cell
///
/// Leading whitespace is ignored and empty text counts as zero; anything
/// that is not entirely a finite number is `#VALUE!`.
pub fn text_to_number(text: &str) -> Result<f64, CellError> {
    let trimmed = text.trim_start();
    if text.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CellError::Value),
    }
}
