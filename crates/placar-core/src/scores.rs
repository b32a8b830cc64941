// Score-line frequency and per-side goal distributions.

use crate::error::{Aggregator, PipelineError, Result};
use crate::matrix::LabeledMatrix;
use crate::record::{goals_in_range, MatchRecord, MatchSet};
use crate::schema::{AWAY_SCORE, HOME_SCORE};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Rows are home goals `0..=max_home`, columns away goals `0..=max_away`.
pub type ScoreMatrix = LabeledMatrix<u32, u32>;

// ---------------------------------------------------------------------------
// Score-line frequency
// ---------------------------------------------------------------------------

/// Count each exact (home, away) score line. Records missing either score are
/// skipped.
pub fn tally_scorelines(records: &[MatchRecord]) -> BTreeMap<(u32, u32), u32> {
    let mut tally = BTreeMap::new();
    for scores in records.iter().filter_map(MatchRecord::scores) {
        *tally.entry(scores).or_insert(0) += 1;
    }
    tally
}

/// Dense score-line frequency matrix anchored at zero goals on both axes.
pub fn score_frequency(matches: &MatchSet) -> Result<ScoreMatrix> {
    matches.require(Aggregator::ScoreFrequency, &[HOME_SCORE, AWAY_SCORE])?;

    let tally = tally_scorelines(matches.records());
    let (Some(max_home), Some(max_away)) = (
        tally.keys().map(|&(h, _)| h).max(),
        tally.keys().map(|&(_, a)| a).max(),
    ) else {
        return Err(PipelineError::EmptyPartition {
            aggregator: Aggregator::ScoreFrequency,
            detail: "no record has both scores".into(),
        });
    };

    debug!(
        "{} distinct score lines, grid {}x{}",
        tally.len(),
        max_home + 1,
        max_away + 1
    );
    Ok(LabeledMatrix::from_tally(
        (0..=max_home).collect(),
        (0..=max_away).collect(),
        &tally,
    ))
}

// ---------------------------------------------------------------------------
// Goal histograms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// This side's score, when present and in range.
    pub fn score(&self, record: &MatchRecord) -> Option<u32> {
        goals_in_range(match self {
            Side::Home => record.home_score,
            Side::Away => record.away_score,
        })
    }

    fn column(&self) -> &'static str {
        match self {
            Side::Home => HOME_SCORE,
            Side::Away => AWAY_SCORE,
        }
    }
}

/// How many matches ended with each goal count for one side, over the dense
/// range `[min, max]` of observed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalHistogram {
    pub side: Side,
    pub goals: Vec<u32>,
    pub matches: Vec<u32>,
}

pub fn goal_histogram(matches: &MatchSet, side: Side) -> Result<GoalHistogram> {
    matches.require(Aggregator::GoalHistogram, &[side.column()])?;

    let mut tally: BTreeMap<u32, u32> = BTreeMap::new();
    for goals in matches.records().iter().filter_map(|r| side.score(r)) {
        *tally.entry(goals).or_insert(0) += 1;
    }

    let (Some(&min), Some(&max)) = (tally.keys().next(), tally.keys().next_back()) else {
        return Err(PipelineError::EmptyPartition {
            aggregator: Aggregator::GoalHistogram,
            detail: format!("no record has a {} score", side.column()),
        });
    };

    let goals: Vec<u32> = (min..=max).collect();
    let counts = goals
        .iter()
        .map(|g| tally.get(g).copied().unwrap_or(0))
        .collect();
    Ok(GoalHistogram {
        side,
        goals,
        matches: counts,
    })
}
