//! Cells and their content variants
//!
//! A [`Sheet`] owns every cell in an arena and hands out [`CellRef`] and
//! [`CellMut`] views. Dependency edges between cells are arena indices, so
//! a cell never holds a reference to another cell.

use std::cell::OnceCell;

use ahash::AHashSet;
use gridcalc_core::{CellValue, Position, Result, ESCAPE_SIGN, FORMULA_SIGN};
use gridcalc_formula::{parse_formula, Formula, FormulaValue};

use crate::sheet::Sheet;

/// Index of a cell in its sheet's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CellId(pub(crate) usize);

/// What a cell currently holds
#[derive(Debug)]
pub(crate) enum CellContent {
    Empty,
    /// Non-empty literal text, stored exactly as entered
    Text(String),
    Formula {
        formula: Formula,
        /// Memoized result. Filled lazily through `&Sheet` on first read and
        /// emptied through `&mut Sheet` when anything upstream changes.
        cache: OnceCell<FormulaValue>,
    },
}

impl CellContent {
    /// Classify raw cell text
    ///
    /// A lone `=` is text: an empty expression is not a formula.
    pub(crate) fn from_text(text: String) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }

        if text.len() > 1 && text.starts_with(FORMULA_SIGN) {
            let formula = parse_formula(&text[FORMULA_SIGN.len_utf8()..])?;
            return Ok(CellContent::Formula {
                formula,
                cache: OnceCell::new(),
            });
        }

        Ok(CellContent::Text(text))
    }

    /// Source form: literal text, or `=` followed by the canonical expression
    pub(crate) fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula { formula, .. } => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    pub(crate) fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula { formula, .. } => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    /// Non-formula content has nothing to recompute, so it always counts as valid.
    pub(crate) fn is_cache_valid(&self) -> bool {
        match self {
            CellContent::Formula { cache, .. } => cache.get().is_some(),
            CellContent::Empty | CellContent::Text(_) => true,
        }
    }

    /// Drop the memoized result; returns whether there was one
    pub(crate) fn invalidate_cache(&mut self) -> bool {
        match self {
            CellContent::Formula { cache, .. } => cache.take().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }

    /// Literal value of non-formula content
    pub(crate) fn literal_value(text: &str) -> CellValue {
        let text = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
        CellValue::Text(text.to_string())
    }
}

/// A cell node in the sheet arena
#[derive(Debug)]
pub(crate) struct Cell {
    pub(crate) position: Position,
    pub(crate) content: CellContent,
    /// Out-edges: cells this cell's formula reads
    pub(crate) dependencies: AHashSet<CellId>,
    /// In-edges: cells whose formula reads this cell
    pub(crate) dependents: AHashSet<CellId>,
}

impl Cell {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            content: CellContent::Empty,
            dependencies: AHashSet::new(),
            dependents: AHashSet::new(),
        }
    }
}

/// Shared view of a materialized cell
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    sheet: &'a Sheet,
    id: CellId,
}

impl<'a> CellRef<'a> {
    pub(crate) fn new(sheet: &'a Sheet, id: CellId) -> Self {
        Self { sheet, id }
    }

    fn cell(&self) -> &'a Cell {
        self.sheet.node(self.id)
    }

    /// Position of the cell in its sheet
    pub fn position(&self) -> Position {
        self.cell().position
    }

    /// Current value, evaluating (and caching) a formula if needed
    pub fn value(&self) -> CellValue {
        self.sheet.cell_value(self.id)
    }

    /// Text as entered; formulas come back in canonical form
    pub fn text(&self) -> String {
        self.cell().content.text()
    }

    /// Positions read by this cell's formula, sorted and deduplicated
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell().content.referenced_cells()
    }

    /// Positions of the cells whose formulas read this cell, sorted
    pub fn dependents(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .cell()
            .dependents
            .iter()
            .map(|&id| self.sheet.node(id).position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Check if the cell holds no content
    pub fn is_empty(&self) -> bool {
        matches!(self.cell().content, CellContent::Empty)
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(self.cell().content, CellContent::Formula { .. })
    }

    /// Check if a formula result is currently memoized
    pub fn has_cached_value(&self) -> bool {
        match &self.cell().content {
            CellContent::Formula { cache, .. } => cache.get().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }
}

/// Exclusive view of a materialized cell
#[derive(Debug)]
pub struct CellMut<'a> {
    sheet: &'a mut Sheet,
    id: CellId,
}

impl<'a> CellMut<'a> {
    pub(crate) fn new(sheet: &'a mut Sheet, id: CellId) -> Self {
        Self { sheet, id }
    }

    /// Replace the cell's content
    ///
    /// Fails with [`Error::FormulaParse`](gridcalc_core::Error::FormulaParse)
    /// or [`Error::CircularDependency`](gridcalc_core::Error::CircularDependency),
    /// in which case nothing changes.
    pub fn set<S: Into<String>>(&mut self, text: S) -> Result<()> {
        let content = CellContent::from_text(text.into())?;
        self.sheet.apply_content(self.id, content)
    }

    /// Reset the cell to empty; the cell itself stays in the sheet
    pub fn clear(&mut self) {
        self.sheet.reset_content(self.id);
    }

    /// Borrow as a shared view
    pub fn view(&self) -> CellRef<'_> {
        CellRef::new(&*self.sheet, self.id)
    }
}
