//! Formula Abstract Syntax Tree types

use gridcalc_core::{CellError, Position};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),

    /// Single cell reference
    CellRef(Position),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

/// Printing precedence of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precedence {
    Add,
    Subtract,
    Multiply,
    Divide,
    Unary,
    Atom,
}

impl FormulaExpr {
    /// Append every cell reference in the tree, in source order
    pub fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            FormulaExpr::Number(_) => {}
            FormulaExpr::CellRef(pos) => out.push(*pos),
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            FormulaExpr::UnaryOp { operand, .. } => operand.collect_references(out),
        }
    }

    fn precedence(&self) -> Precedence {
        match self {
            FormulaExpr::Number(_) | FormulaExpr::CellRef(_) => Precedence::Atom,
            FormulaExpr::UnaryOp { .. } => Precedence::Unary,
            FormulaExpr::BinaryOp { op, .. } => match op {
                BinaryOperator::Add => Precedence::Add,
                BinaryOperator::Subtract => Precedence::Subtract,
                BinaryOperator::Multiply => Precedence::Multiply,
                BinaryOperator::Divide => Precedence::Divide,
            },
        }
    }

    fn write_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        child: &FormulaExpr,
        right_side: bool,
    ) -> fmt::Result {
        if needs_parens(self.precedence(), child.precedence(), right_side) {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

/// Whether `child` must be parenthesised under `parent` to keep its meaning.
fn needs_parens(parent: Precedence, child: Precedence, right_side: bool) -> bool {
    use Precedence::*;

    let additive = matches!(child, Add | Subtract);
    let multiplicative = matches!(child, Multiply | Divide);
    match parent {
        Subtract => right_side && additive,
        Multiply => additive,
        Unary => additive || multiplicative,
        Divide => additive || (right_side && multiplicative),
        Add | Atom => false,
    }
}

/// Renders the expression in canonical form, without the leading `=`.
impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::CellRef(pos) if pos.is_valid() => write!(f, "{}", pos),
            FormulaExpr::CellRef(_) => write!(f, "{}", CellError::Ref),
            FormulaExpr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                self.write_operand(f, operand, false)
            }
            FormulaExpr::BinaryOp { op, left, right } => {
                self.write_operand(f, left, false)?;
                write!(f, "{}", op.symbol())?;
                self.write_operand(f, right, true)
            }
        }
    }
}
