// Runs every aggregation over one loaded table.
//
// Stages: normalize -> extract records -> classify / score frequency /
// histograms -> annotate temporal keys -> round aggregations -> season view.
// A failure in one aggregator is recorded and the others still run.

use crate::dataset::RawTable;
use crate::error::{Aggregator, PipelineError};
use crate::outcome::{count_by_winner, share_by_winner, OutcomeCounts, OutcomePercentages};
use crate::record::MatchSet;
use crate::rounds::{round_averages, round_season_totals, RoundAverages, RoundSeasonMatrix};
use crate::schema::{normalize, DEFAULT_DROPPED_COLUMNS};
use crate::scores::{goal_histogram, score_frequency, GoalHistogram, ScoreMatrix, Side};
use crate::season::{season_summary, SeasonSummary};
use crate::temporal::annotate;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Columns removed during normalization.
    pub dropped_columns: Vec<String>,
    /// Season for the score-classified view; skipped when `None`.
    pub season: Option<i32>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            dropped_columns: DEFAULT_DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            season: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatorFailure {
    pub aggregator: Aggregator,
    pub message: String,
}

/// Every derived table. A `None` table has a matching entry in `failures`,
/// except `season`, which is also `None` when no season was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub matches: usize,
    pub columns: Vec<String>,
    pub outcomes: Option<OutcomeCounts>,
    pub outcome_percentages: Option<OutcomePercentages>,
    pub score_frequency: Option<ScoreMatrix>,
    pub home_goals: Option<GoalHistogram>,
    pub away_goals: Option<GoalHistogram>,
    pub round_averages: Option<RoundAverages>,
    pub round_season_goals: Option<RoundSeasonMatrix>,
    pub season: Option<SeasonSummary>,
    pub failures: Vec<AggregatorFailure>,
}

impl AnalysisReport {
    fn settle<T>(
        &mut self,
        aggregator: Aggregator,
        result: Result<T, PipelineError>,
    ) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("{}", e);
                self.failures.push(AggregatorFailure {
                    aggregator,
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

pub fn run(table: RawTable, options: &PipelineOptions) -> AnalysisReport {
    let normalized = normalize(table, &options.dropped_columns);
    let matches = MatchSet::from_table(&normalized);
    info!(
        "Normalized {} records over {} columns",
        matches.len(),
        normalized.columns().len()
    );

    let mut report = AnalysisReport {
        matches: matches.len(),
        columns: normalized.columns().to_vec(),
        ..AnalysisReport::default()
    };

    let counts = count_by_winner(&matches);
    report.outcomes = report.settle(Aggregator::ResultClassifier, counts);
    if let Some(counts) = report.outcomes {
        let share = share_by_winner(&counts);
        report.outcome_percentages = report.settle(Aggregator::ResultClassifier, share);
    }
    let frequency = score_frequency(&matches);
    report.score_frequency = report.settle(Aggregator::ScoreFrequency, frequency);
    let home = goal_histogram(&matches, Side::Home);
    report.home_goals = report.settle(Aggregator::GoalHistogram, home);
    let away = goal_histogram(&matches, Side::Away);
    report.away_goals = report.settle(Aggregator::GoalHistogram, away);

    let annotated = annotate(&matches);
    let averages = round_averages(&annotated);
    report.round_averages = report.settle(Aggregator::RoundAverages, averages);
    let totals = round_season_totals(&annotated);
    report.round_season_goals = report.settle(Aggregator::RoundSeason, totals);
    if let Some(season) = options.season {
        let summary = season_summary(&annotated, season);
        report.season = report.settle(Aggregator::SeasonFilter, summary);
    }

    info!(
        "Pipeline finished: {} aggregators failed",
        report.failures.len()
    );
    report
}
