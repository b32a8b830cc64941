// Match outcome classification.
//
// Two rules exist and are deliberately kept apart:
// - by winner field: compares the `vencedor` text with the team names. Used
//   for the full-dataset outcome distribution.
// - by score: compares the two scores. Used for the season-scoped view.
// A record may classify differently under each rule when the winner field is
// stale or malformed; neither rule corrects the other.

use crate::error::{Aggregator, PipelineError, Result};
use crate::record::{MatchRecord, MatchSet};
use crate::schema::{AWAY_TEAM, HOME_TEAM, WINNER};
use serde::Serialize;
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Away, Outcome::Draw];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "Home",
            Outcome::Away => "Away",
            Outcome::Draw => "Draw",
        }
    }
}

/// What the winner field names, relative to the two teams of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerField {
    HomeTeam,
    AwayTeam,
    /// Anything else: a draw sentinel, a misspelled team, or nothing at all.
    Other,
}

impl WinnerField {
    pub fn of(record: &MatchRecord) -> Self {
        let Some(winner) = record.winner.as_deref() else {
            return WinnerField::Other;
        };
        if record.home_team.as_deref() == Some(winner) {
            WinnerField::HomeTeam
        } else if record.away_team.as_deref() == Some(winner) {
            WinnerField::AwayTeam
        } else {
            WinnerField::Other
        }
    }
}

impl From<WinnerField> for Outcome {
    fn from(field: WinnerField) -> Self {
        match field {
            WinnerField::HomeTeam => Outcome::Home,
            WinnerField::AwayTeam => Outcome::Away,
            WinnerField::Other => Outcome::Draw,
        }
    }
}

/// Classify by the winner field. Never fails: unmatched values are draws.
pub fn classify_by_winner(record: &MatchRecord) -> Outcome {
    WinnerField::of(record).into()
}

/// Classify by comparing scores. `None` when either score is missing.
pub fn classify_by_score(record: &MatchRecord) -> Option<Outcome> {
    let (home, away) = record.scores()?;
    Some(match home.cmp(&away) {
        Ordering::Greater => Outcome::Home,
        Ordering::Less => Outcome::Away,
        Ordering::Equal => Outcome::Draw,
    })
}

// ---------------------------------------------------------------------------
// Counts and percentages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub home: u32,
    pub away: u32,
    pub draw: u32,
}

impl OutcomeCounts {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Home => self.home += 1,
            Outcome::Away => self.away += 1,
            Outcome::Draw => self.draw += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Away => self.away,
            Outcome::Draw => self.draw,
        }
    }

    pub fn total(&self) -> u32 {
        self.home + self.away + self.draw
    }

    /// Share of each outcome, in percent rounded to two decimals. `None` when
    /// there is nothing to divide by.
    pub fn percentages(&self) -> Option<OutcomePercentages> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let pct = |n: u32| round2(n as f64 / total as f64 * 100.0);
        Some(OutcomePercentages {
            home: pct(self.home),
            away: pct(self.away),
            draw: pct(self.draw),
        })
    }
}

impl FromIterator<Outcome> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::default();
        for outcome in iter {
            counts.add(outcome);
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomePercentages {
    pub home: f64,
    pub away: f64,
    pub draw: f64,
}

impl OutcomePercentages {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Away => self.away,
            Outcome::Draw => self.draw,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Full-dataset distribution
// ---------------------------------------------------------------------------

/// Outcome counts over every record, classified by the winner field.
pub fn count_by_winner(matches: &MatchSet) -> Result<OutcomeCounts> {
    matches.require(Aggregator::ResultClassifier, &[HOME_TEAM, AWAY_TEAM, WINNER])?;
    Ok(matches.records().iter().map(classify_by_winner).collect())
}

/// Percentages for the full-dataset distribution.
pub fn share_by_winner(counts: &OutcomeCounts) -> Result<OutcomePercentages> {
    counts.percentages().ok_or_else(|| PipelineError::EmptyPartition {
        aggregator: Aggregator::ResultClassifier,
        detail: "dataset has no records".into(),
    })
}
