//! Dependency tracking between cells
//!
//! Every formula cell has out-edges to the cells it reads (its dependencies)
//! and every cell has in-edges from the formulas that read it (its
//! dependents). Both directions are kept in sync on every edit so that
//! cycle checks and cache invalidation can walk the graph without scanning
//! the sheet.

use ahash::AHashSet;
use gridcalc_core::Position;

use crate::cell::{CellContent, CellId};
use crate::sheet::Sheet;

impl Sheet {
    /// Check if giving `target` a formula that reads `referenced` would close a cycle
    ///
    /// Such a cycle exists exactly when one of the referenced cells already
    /// depends on `target`, directly or transitively, or is `target` itself.
    /// Positions with no cell cannot depend on anything and are skipped.
    pub(crate) fn would_create_cycle(&self, target: CellId, referenced: &[Position]) -> bool {
        if referenced.is_empty() {
            return false;
        }

        let referenced: AHashSet<CellId> =
            referenced.iter().filter_map(|&pos| self.id_at(pos)).collect();
        if referenced.is_empty() {
            return false;
        }

        let mut visited = AHashSet::new();
        let mut stack = vec![target];
        while let Some(cell) = stack.pop() {
            if !visited.insert(cell) {
                continue;
            }
            if referenced.contains(&cell) {
                return true;
            }
            stack.extend(
                self.node(cell)
                    .dependents
                    .iter()
                    .copied()
                    .filter(|dependent| !visited.contains(dependent)),
            );
        }

        false
    }

    /// Remove all out-edges of a cell, along with the matching in-edges
    pub(crate) fn detach_dependencies(&mut self, cell: CellId) {
        let dependencies = std::mem::take(&mut self.node_mut(cell).dependencies);
        for dependency in dependencies {
            self.node_mut(dependency).dependents.remove(&cell);
        }
    }

    /// Wire a cell to everything its current content references
    ///
    /// Referenced positions without a cell get an empty placeholder so the
    /// edge has somewhere to live.
    pub(crate) fn attach_dependencies(&mut self, cell: CellId) {
        let referenced = self.node(cell).content.referenced_cells().to_vec();
        for pos in referenced {
            let (dependency, created) = self.ensure_cell(pos);
            if created {
                tracing::trace!("Created placeholder cell {pos}");
            }
            self.node_mut(cell).dependencies.insert(dependency);
            self.node_mut(dependency).dependents.insert(cell);
        }
    }

    /// Drop cached results of `start` and everything downstream of it
    ///
    /// `start` itself is always processed. Below it, a cell whose cache is
    /// already empty is not descended into: anything that read through it
    /// was emptied when it was. Returns the number of caches dropped.
    pub(crate) fn invalidate_from(&mut self, start: CellId) -> usize {
        let mut invalidated = 0;
        let mut stack = vec![start];
        let mut forced = true;

        while let Some(cell) = stack.pop() {
            let node = self.node_mut(cell);
            if !forced && !node.content.is_cache_valid() {
                continue;
            }
            forced = false;

            if node.content.invalidate_cache() {
                invalidated += 1;
            }
            stack.extend(node.dependents.iter().copied());
        }

        invalidated
    }

    /// Evaluate every uncached formula `cell` reads from, inputs first, then `cell` itself
    ///
    /// Walks out-edges with an explicit stack, so that each evaluation finds
    /// its inputs already cached and reads them without recursing.
    pub(crate) fn fill_caches_upstream(&self, cell: CellId) {
        let mut visited = AHashSet::new();
        let mut stack = vec![(cell, false)];

        while let Some((current, inputs_ready)) = stack.pop() {
            let node = self.node(current);
            let CellContent::Formula { formula, cache } = &node.content else {
                continue;
            };
            if cache.get().is_some() {
                continue;
            }

            if inputs_ready {
                cache.get_or_init(|| formula.evaluate(&|pos| self.lookup_number(pos)));
                continue;
            }
            if !visited.insert(current) {
                continue;
            }

            stack.push((current, true));
            stack.extend(
                node.dependencies
                    .iter()
                    .copied()
                    .filter(|dependency| !visited.contains(dependency))
                    .map(|dependency| (dependency, false)),
            );
        }
    }
}
