// Column-name canonicalization and column pruning.

use crate::dataset::RawTable;
use tracing::debug;

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

/// Match date, day/month/year text.
pub const DATE: &str = "data";
/// Round text; the round number is embedded somewhere in it.
pub const ROUND: &str = "rodata";
pub const HOME_TEAM: &str = "mandante";
pub const AWAY_TEAM: &str = "visitante";
pub const HOME_SCORE: &str = "mandante_placar";
pub const AWAY_SCORE: &str = "visitante_placar";
/// Names the winning team, or anything else for a draw.
pub const WINNER: &str = "vencedor";

/// Every column the aggregators read.
pub const MATCH_COLUMNS: [&str; 7] = [
    DATE, ROUND, HOME_TEAM, AWAY_TEAM, HOME_SCORE, AWAY_SCORE, WINNER,
];

/// Lineup and coach columns that carry nothing for aggregation.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 4] = [
    "formacao_mandante",
    "formacao_visitante",
    "tecnico_mandante",
    "tecnico_visitante",
];

/// Trim, lowercase, and replace spaces with underscores.
pub fn canonical_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Normalized table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl NormalizedTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this canonical name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

/// Canonicalize every column name and drop the blacklisted ones. Blacklist
/// entries are canonicalized too, and entries that match no column are
/// ignored. Unknown columns pass through.
pub fn normalize<S: AsRef<str>>(table: RawTable, dropped: &[S]) -> NormalizedTable {
    let dropped: Vec<String> = dropped.iter().map(|d| canonical_column(d.as_ref())).collect();

    let mut keep = Vec::new();
    let mut columns = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        let name = canonical_column(header);
        if dropped.contains(&name) {
            debug!("dropping column `{}`", name);
            continue;
        }
        keep.push(idx);
        columns.push(name);
    }

    let rows = table
        .rows
        .into_iter()
        .map(|row| keep.iter().map(|&i| row.get(i).cloned().flatten()).collect())
        .collect();

    NormalizedTable { columns, rows }
}
