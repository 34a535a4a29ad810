//! Per-row expansion state for the two-level deal table.
//!
//! Every row is collapsed until toggled; rows are independent (no accordion
//! exclusivity) and toggling is the only transition. Expansion reveals data
//! the row already holds — it never triggers I/O.

use std::collections::HashSet;

/// Expansion state keyed by row id.
#[derive(Debug, Default)]
pub struct ExpandableRows {
    expanded: HashSet<i64>,
}

impl ExpandableRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a row's state unconditionally. Returns the new state.
    pub fn toggle(&mut self, row_id: i64) -> bool {
        if self.expanded.remove(&row_id) {
            false
        } else {
            self.expanded.insert(row_id);
            true
        }
    }

    pub fn is_expanded(&self, row_id: i64) -> bool {
        self.expanded.contains(&row_id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Reset all rows, e.g. when a filter change replaces the row set.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}
