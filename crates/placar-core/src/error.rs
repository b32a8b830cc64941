// Error taxonomy for the aggregation pipeline.
//
// Per-record parse failures are not represented here: an unparseable date,
// round or score degrades to a missing value and the record is excluded from
// the aggregations that need it.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Aggregator names
// ---------------------------------------------------------------------------

/// Identifies which derived table an error belongs to, so a failure in one
/// aggregator can be reported without aborting the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    ResultClassifier,
    ScoreFrequency,
    GoalHistogram,
    RoundAverages,
    RoundSeason,
    SeasonFilter,
}

impl Aggregator {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregator::ResultClassifier => "result classifier",
            Aggregator::ScoreFrequency => "score frequency",
            Aggregator::GoalHistogram => "goal histogram",
            Aggregator::RoundAverages => "round averages",
            Aggregator::RoundSeason => "round/season goals",
            Aggregator::SeasonFilter => "season filter",
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dataset could not be read at all. Fatal for the whole run.
    #[error("dataset unavailable at {path}: {source}")]
    SourceUnavailable { path: String, source: csv::Error },

    /// A column the aggregator depends on is absent after normalization.
    #[error("{aggregator}: required column `{column}` is missing")]
    MissingField {
        aggregator: Aggregator,
        column: &'static str,
    },

    /// The aggregation selected zero records, so no ratio or range exists.
    #[error("{aggregator}: no matching records ({detail})")]
    EmptyPartition {
        aggregator: Aggregator,
        detail: String,
    },
}

impl PipelineError {
    /// The aggregator this error is scoped to, or `None` for run-wide errors.
    pub fn aggregator(&self) -> Option<Aggregator> {
        match self {
            PipelineError::SourceUnavailable { .. } => None,
            PipelineError::MissingField { aggregator, .. }
            | PipelineError::EmptyPartition { aggregator, .. } => Some(*aggregator),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_aggregator_and_column() {
        let err = PipelineError::MissingField {
            aggregator: Aggregator::ScoreFrequency,
            column: "mandante_placar",
        };
        assert_eq!(
            err.to_string(),
            "score frequency: required column `mandante_placar` is missing"
        );
        assert_eq!(err.aggregator(), Some(Aggregator::ScoreFrequency));
    }

    #[test]
    fn source_unavailable_is_not_scoped() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = PipelineError::SourceUnavailable {
            path: "missing.csv".into(),
            source: csv::Error::from(io),
        };
        assert!(err.aggregator().is_none());
        assert!(err.to_string().starts_with("dataset unavailable at missing.csv"));
    }
}
