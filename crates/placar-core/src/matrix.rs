// Dense labeled matrices built from sparse tallies.
//
// Building one is always two phases: tally into a map keyed by
// (row label, column label), then materialize every cell of the label grid,
// filling unseen pairs with zero.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledMatrix<R, C> {
    /// Row labels, ascending.
    pub row_labels: Vec<R>,
    /// Column labels, ascending.
    pub col_labels: Vec<C>,
    /// `cells[i][j]` belongs to `(row_labels[i], col_labels[j])`.
    pub cells: Vec<Vec<u32>>,
}

impl<R: Ord + Copy, C: Ord + Copy> LabeledMatrix<R, C> {
    /// Materialize a dense grid over the given labels. Tally entries whose
    /// labels are not in the grid are ignored.
    pub fn from_tally(
        row_labels: Vec<R>,
        col_labels: Vec<C>,
        tally: &BTreeMap<(R, C), u32>,
    ) -> Self {
        let cells = row_labels
            .iter()
            .map(|&r| {
                col_labels
                    .iter()
                    .map(|&c| tally.get(&(r, c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();
        LabeledMatrix {
            row_labels,
            col_labels,
            cells,
        }
    }

    /// Cell value by label. `None` when either label is outside the grid.
    pub fn get(&self, row: R, col: C) -> Option<u32> {
        let i = self.row_labels.binary_search(&row).ok()?;
        let j = self.col_labels.binary_search(&col).ok()?;
        Some(self.cells[i][j])
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.col_labels.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    pub fn nonzero_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v > 0).count()
    }
}
