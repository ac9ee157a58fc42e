//! Parsed formula handle used by cells

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, CellLookup, FormulaValue};
use crate::parser::parse_expression;
use gridcalc_core::Position;

/// A parsed formula together with the cells it reads
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: FormulaExpr,
    /// Valid referenced positions, sorted row-major and deduplicated
    references: Vec<Position>,
}

impl Formula {
    /// Wrap an already built expression
    pub fn new(ast: FormulaExpr) -> Self {
        let mut references = Vec::new();
        ast.collect_references(&mut references);
        references.retain(Position::is_valid);
        references.sort_unstable();
        references.dedup();

        Self { ast, references }
    }

    /// Evaluate against the given cell lookup
    pub fn evaluate(&self, lookup: &CellLookup<'_>) -> FormulaValue {
        evaluate(&self.ast, lookup)
    }

    /// Positions this formula reads from
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    /// Canonical source text, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }
}

/// Parse formula source (without the leading `=`)
///
/// # Example
/// ```rust
/// use gridcalc_core::Position;
/// use gridcalc_formula::{parse_formula, FormulaValue};
///
/// let formula = parse_formula("B1 + A2*A2 + B1").unwrap();
/// assert_eq!(
///     formula.referenced_cells(),
///     &[Position::new(0, 1), Position::new(1, 0)]
/// );
/// assert_eq!(formula.evaluate(&|_| Ok(2.0)), FormulaValue::Number(8.0));
/// ```
pub fn parse_formula(expression: &str) -> FormulaResult<Formula> {
    parse_expression(expression).map(Formula::new)
}
