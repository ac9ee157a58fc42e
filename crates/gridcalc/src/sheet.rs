//! Sheet: cell storage, editing and evaluation

use gridcalc_core::{CellError, CellValue, Error, Position, Result, Size};
use gridcalc_formula::text_to_number;

use crate::cell::{Cell, CellContent, CellId, CellMut, CellRef};

/// A grid of cells with dependency tracking and memoized formula results
///
/// Cells live in an arena; the grid maps positions to arena slots. A cell
/// is materialised when it is written or when a formula references it,
/// and stays until [`Sheet::clear_cell`] removes it.
///
/// # Example
///
/// ```rust
/// use gridcalc::prelude::*;
///
/// let mut sheet = Sheet::new();
/// let a1: Position = "A1".parse().unwrap();
/// let b1: Position = "B1".parse().unwrap();
///
/// sheet.set_cell(a1, "5").unwrap();
/// sheet.set_cell(b1, "=A1*2").unwrap();
/// assert_eq!(sheet.value_at(b1).unwrap(), CellValue::Number(10.0));
///
/// sheet.set_cell(a1, "7").unwrap();
/// assert_eq!(sheet.value_at(b1).unwrap(), CellValue::Number(14.0));
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    /// Row-major position index into `cells`
    grid: Vec<Vec<Option<CellId>>>,
    cells: Vec<Option<Cell>>,
    /// Recyclable arena slots
    free: Vec<CellId>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of the cell at `pos`
    ///
    /// Empty text empties the cell, text starting with `=` (and longer than
    /// that) is a formula, anything else is literal text. On error the sheet
    /// is left unchanged.
    pub fn set_cell<S: Into<String>>(&mut self, pos: Position, text: S) -> Result<()> {
        check_position(pos, "set_cell")?;

        let content = CellContent::from_text(text.into()).map_err(|e| {
            tracing::debug!("Rejected edit of {pos}: {e}");
            e
        })?;

        let (id, created) = self.ensure_cell(pos);
        if let Err(e) = self.apply_content(id, content) {
            if created {
                self.release(id);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Get the cell at `pos`, if one is materialised there
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellRef<'_>>> {
        check_position(pos, "get_cell")?;
        Ok(self.id_at(pos).map(|id| CellRef::new(self, id)))
    }

    /// Get mutable access to the cell at `pos`, if one is materialised there
    pub fn cell_mut(&mut self, pos: Position) -> Result<Option<CellMut<'_>>> {
        check_position(pos, "cell_mut")?;
        Ok(self.id_at(pos).map(|id| CellMut::new(self, id)))
    }

    /// Clear the cell at `pos`
    ///
    /// A cell that other formulas still read stays behind as an empty
    /// placeholder; otherwise it is removed from the sheet.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos, "clear_cell")?;

        let Some(id) = self.id_at(pos) else {
            return Ok(());
        };

        self.reset_content(id);
        if self.node(id).dependents.is_empty() {
            self.release(id);
            tracing::debug!("Removed cell {pos}");
        } else {
            tracing::trace!("Kept {pos} as placeholder for its dependents");
        }
        Ok(())
    }

    /// Clear every cell in row-major order, then free them all
    pub fn clear(&mut self) {
        let ids: Vec<CellId> = self.grid.iter().flatten().flatten().copied().collect();
        for &id in &ids {
            self.reset_content(id);
        }
        for id in ids {
            self.release(id);
        }
    }

    /// Smallest area covering every non-empty cell
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (row, cells) in self.grid.iter().enumerate() {
            let last_used = cells.iter().rposition(|slot| {
                slot.is_some_and(|id| !matches!(self.node(id).content, CellContent::Empty))
            });
            if let Some(col) = last_used {
                size.rows = row + 1;
                size.cols = size.cols.max(col + 1);
            }
        }
        size
    }

    /// Value of the cell at `pos`; an absent cell is [`CellValue::Empty`]
    pub fn value_at(&self, pos: Position) -> Result<CellValue> {
        Ok(self
            .get_cell(pos)?
            .map(|cell| cell.value())
            .unwrap_or_default())
    }

    /// Text of the cell at `pos`; an absent cell is the empty string
    pub fn text_at(&self, pos: Position) -> Result<String> {
        Ok(self
            .get_cell(pos)?
            .map(|cell| cell.text())
            .unwrap_or_default())
    }

    /// Number of materialised cells, placeholders included
    pub fn cell_count(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    pub(crate) fn id_at(&self, pos: Position) -> Option<CellId> {
        if !pos.is_valid() {
            return None;
        }
        *self
            .grid
            .get(pos.row as usize)?
            .get(pos.col as usize)?
    }

    pub(crate) fn node(&self, id: CellId) -> &Cell {
        match self.cells.get(id.0) {
            Some(Some(cell)) => cell,
            _ => unreachable!("dangling cell id {id:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: CellId) -> &mut Cell {
        match self.cells.get_mut(id.0) {
            Some(Some(cell)) => cell,
            _ => unreachable!("dangling cell id {id:?}"),
        }
    }

    /// Get or create the cell at a valid `pos`; the flag tells whether it was created
    pub(crate) fn ensure_cell(&mut self, pos: Position) -> (CellId, bool) {
        if let Some(id) = self.id_at(pos) {
            return (id, false);
        }

        let (row, col) = (pos.row as usize, pos.col as usize);
        if self.grid.len() <= row {
            self.grid.resize_with(row + 1, Vec::new);
        }
        if self.grid[row].len() <= col {
            self.grid[row].resize(col + 1, None);
        }

        let cell = Cell::new(pos);
        let id = match self.free.pop() {
            Some(id) => {
                self.cells[id.0] = Some(cell);
                id
            }
            None => {
                self.cells.push(Some(cell));
                CellId(self.cells.len() - 1)
            }
        };
        self.grid[row][col] = Some(id);
        (id, true)
    }

    /// Free an edge-less cell and its grid slot
    fn release(&mut self, id: CellId) {
        let pos = self.node(id).position;
        self.grid[pos.row as usize][pos.col as usize] = None;
        self.cells[id.0] = None;
        self.free.push(id);
    }

    /// Replace a cell's content, rewiring edges and invalidating caches
    ///
    /// Rejected without any change if the new content would make the cell
    /// depend on itself.
    pub(crate) fn apply_content(&mut self, id: CellId, content: CellContent) -> Result<()> {
        let pos = self.node(id).position;
        if self.would_create_cycle(id, content.referenced_cells()) {
            tracing::debug!("Rejected edit of {pos}: circular dependency");
            return Err(Error::CircularDependency(pos.to_string()));
        }

        self.detach_dependencies(id);
        self.node_mut(id).content = content;
        self.attach_dependencies(id);
        tracing::trace!(
            "Rewired {pos} to {} dependencies",
            self.node(id).dependencies.len()
        );

        let invalidated = self.invalidate_from(id);
        tracing::trace!("Edit of {pos} invalidated {invalidated} cached values");
        Ok(())
    }

    /// Empty a cell in place; never fails since empty content references nothing
    pub(crate) fn reset_content(&mut self, id: CellId) {
        self.detach_dependencies(id);
        self.node_mut(id).content = CellContent::Empty;
        let invalidated = self.invalidate_from(id);
        tracing::trace!(
            "Cleared {}, invalidated {invalidated} cached values",
            self.node(id).position
        );
    }

    /// Evaluate a cell, filling its cache on the way
    pub(crate) fn cell_value(&self, id: CellId) -> CellValue {
        match &self.node(id).content {
            CellContent::Empty => CellValue::Empty,
            CellContent::Text(text) => CellContent::literal_value(text),
            CellContent::Formula { formula, cache } => {
                if cache.get().is_none() {
                    self.fill_caches_upstream(id);
                }
                let value = cache.get_or_init(|| formula.evaluate(&|pos| self.lookup_number(pos)));
                (*value).into()
            }
        }
    }

    /// Number a formula reads from `pos`
    pub(crate) fn lookup_number(&self, pos: Position) -> std::result::Result<f64, CellError> {
        if !pos.is_valid() {
            return Err(CellError::Ref);
        }
        let Some(id) = self.id_at(pos) else {
            return Ok(0.0);
        };
        match self.cell_value(id) {
            CellValue::Empty => Ok(0.0),
            CellValue::Number(n) => Ok(n),
            CellValue::Text(text) => text_to_number(&text),
            CellValue::Error(e) => Err(e),
        }
    }
}

impl Drop for Sheet {
    fn drop(&mut self) {
        self.clear();
    }
}

fn check_position(pos: Position, operation: &str) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(Error::invalid_position(format!(
            "({}, {}) passed to Sheet::{operation}",
            pos.row, pos.col
        )))
    }
}
