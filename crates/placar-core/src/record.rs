// Typed match records projected from the normalized table.

use crate::error::{Aggregator, PipelineError, Result};
use crate::schema::{
    NormalizedTable, AWAY_SCORE, AWAY_TEAM, DATE, HOME_SCORE, HOME_TEAM, MATCH_COLUMNS, ROUND,
    WINNER,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

// ---------------------------------------------------------------------------
// MatchRecord
// ---------------------------------------------------------------------------

/// One match as it appears in the dataset. Every field is optional: the column
/// may be absent, or the cell empty or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub date: Option<String>,
    pub round_raw: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub winner: Option<String>,
}

/// Highest goal count accepted for one side. Anything above is treated as a
/// data-entry error.
pub const MAX_GOALS: u32 = 99;

/// A side's score, or `None` when it is missing or above `MAX_GOALS`.
pub fn goals_in_range(score: Option<u32>) -> Option<u32> {
    score.filter(|&g| g <= MAX_GOALS)
}

impl MatchRecord {
    /// Both scores, or `None` if either is missing or out of range.
    pub fn scores(&self) -> Option<(u32, u32)> {
        Some((goals_in_range(self.home_score)?, goals_in_range(self.away_score)?))
    }

    pub fn total_goals(&self) -> Option<u32> {
        self.scores().and_then(|(home, away)| home.checked_add(away))
    }
}

/// Parse a score cell. Accepts plain integers and integral floats (`"2.0"`)
/// up to `MAX_GOALS`; negative, fractional, oversized or non-numeric text is
/// missing.
pub fn parse_score(text: &str) -> Option<u32> {
    let text = text.trim();
    let goals = match text.parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            let v = text.parse::<f64>().ok()?;
            if !(v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(MAX_GOALS)) {
                return None;
            }
            v as u32
        }
    };
    goals_in_range(Some(goals))
}

// ---------------------------------------------------------------------------
// MatchSet
// ---------------------------------------------------------------------------

/// The full record set plus the canonical columns that were present.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    records: Vec<MatchRecord>,
    columns: BTreeSet<&'static str>,
}

impl MatchSet {
    pub fn from_table(table: &NormalizedTable) -> Self {
        let columns: BTreeSet<&'static str> = MATCH_COLUMNS
            .iter()
            .copied()
            .filter(|c| table.column_index(c).is_some())
            .collect();

        let idx = |name: &str| table.column_index(name);
        let (date, round, home, away) = (idx(DATE), idx(ROUND), idx(HOME_TEAM), idx(AWAY_TEAM));
        let (home_score, away_score, winner) = (idx(HOME_SCORE), idx(AWAY_SCORE), idx(WINNER));

        let mut unparsed_scores = 0usize;
        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let text = |col: Option<usize>| col.and_then(|c| table.cell(row, c));
            let mut score = |col: Option<usize>| {
                let raw = text(col)?;
                let parsed = parse_score(raw);
                if parsed.is_none() {
                    unparsed_scores += 1;
                    debug!("row {}: unparseable score `{}`", row, raw);
                }
                parsed
            };

            records.push(MatchRecord {
                home_score: score(home_score),
                away_score: score(away_score),
                date: text(date).map(String::from),
                round_raw: text(round).map(String::from),
                home_team: text(home).map(String::from),
                away_team: text(away).map(String::from),
                winner: text(winner).map(String::from),
            });
        }

        if unparsed_scores > 0 {
            debug!("{} score cells could not be parsed", unparsed_scores);
        }

        MatchSet { records, columns }
    }

    /// Build a set from already-typed records; every match column counts as
    /// present.
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        MatchSet {
            records,
            columns: MATCH_COLUMNS.iter().copied().collect(),
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Fail with `MissingField` on the first required column that is absent.
    pub fn require(&self, aggregator: Aggregator, columns: &[&'static str]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(&column) => Err(PipelineError::MissingField { aggregator, column }),
            None => Ok(()),
        }
    }
}
