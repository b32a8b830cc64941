// Season-scoped outcome distribution, classified by score.

use crate::error::{Aggregator, PipelineError, Result};
use crate::outcome::{classify_by_score, OutcomeCounts, OutcomePercentages};
use crate::schema::{AWAY_SCORE, DATE, HOME_SCORE};
use crate::temporal::AnnotatedSet;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: i32,
    /// Matches in the season that have both scores.
    pub total: u32,
    pub counts: OutcomeCounts,
    pub percentages: OutcomePercentages,
}

/// Restrict to one season and compute the share of home wins, away wins and
/// draws, comparing scores rather than reading the winner field. Matches
/// without both scores are left out of the total.
pub fn season_summary(set: &AnnotatedSet<'_>, season: i32) -> Result<SeasonSummary> {
    set.require(Aggregator::SeasonFilter, &[DATE, HOME_SCORE, AWAY_SCORE])?;

    let in_season: Vec<_> = set
        .matches()
        .iter()
        .filter(|m| m.season() == Some(season))
        .collect();
    let counts: OutcomeCounts = in_season
        .iter()
        .filter_map(|m| classify_by_score(m.record))
        .collect();

    let unscored = in_season.len() - counts.total() as usize;
    if unscored > 0 {
        debug!("season {}: {} matches without both scores", season, unscored);
    }

    let percentages = counts.percentages().ok_or_else(|| {
        let observed: Vec<String> = set.seasons().iter().map(i32::to_string).collect();
        PipelineError::EmptyPartition {
            aggregator: Aggregator::SeasonFilter,
            detail: format!(
                "season {season} has no scored matches (seasons present: {})",
                if observed.is_empty() {
                    "none".to_string()
                } else {
                    observed.join(", ")
                }
            ),
        }
    })?;

    Ok(SeasonSummary {
        season,
        total: counts.total(),
        counts,
        percentages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::record::{MatchRecord, MatchSet};
    use crate::temporal::annotate;

    fn game(date: &str, home: Option<u32>, away: Option<u32>, winner: &str) -> MatchRecord {
        MatchRecord {
            date: Some(date.into()),
            home_team: Some("Casa".into()),
            away_team: Some("Fora".into()),
            home_score: home,
            away_score: away,
            winner: Some(winner.into()),
            ..MatchRecord::default()
        }
    }

    #[test]
    fn percentages_for_one_season() {
        let set = MatchSet::from_records(vec![
            game("05/08/2020", Some(2), Some(1), "Casa"),
            game("12/08/2020", Some(0), Some(0), "-"),
            game("19/08/2020", Some(1), Some(3), "Fora"),
            game("19/08/2019", Some(5), Some(0), "Casa"),
        ]);
        let annotated = annotate(&set);

        let summary = season_summary(&annotated, 2020).unwrap();
        assert_eq!(summary.total, 3);
        for outcome in Outcome::ALL {
            assert_eq!(summary.counts.get(outcome), 1);
            assert!((summary.percentages.get(outcome) - 33.33).abs() < 1e-9);
        }
    }

    #[test]
    fn uses_scores_not_winner_field() {
        // The winner field claims a home win, but the score is level.
        let set = MatchSet::from_records(vec![game("05/08/2020", Some(1), Some(1), "Casa")]);
        let annotated = annotate(&set);

        let summary = season_summary(&annotated, 2020).unwrap();
        assert_eq!(summary.counts.draw, 1);
        assert!((summary.percentages.draw - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let set = MatchSet::from_records(vec![
            game("01/06/2021", Some(1), Some(0), ""),
            game("02/06/2021", Some(1), Some(0), ""),
            game("03/06/2021", Some(0), Some(2), ""),
            game("04/06/2021", Some(0), Some(0), ""),
            game("05/06/2021", Some(2), Some(2), ""),
            game("06/06/2021", Some(3), Some(1), ""),
            game("07/06/2021", Some(0), Some(1), ""),
        ]);
        let annotated = annotate(&set);

        let pct = season_summary(&annotated, 2021).unwrap().percentages;
        let sum = pct.home + pct.away + pct.draw;
        assert!((sum - 100.0).abs() <= 0.03, "sum was {sum}");
    }

    #[test]
    fn unscored_matches_are_excluded() {
        let set = MatchSet::from_records(vec![
            game("05/08/2020", Some(2), Some(1), "Casa"),
            game("06/08/2020", None, Some(1), "Fora"),
        ]);
        let annotated = annotate(&set);

        let summary = season_summary(&annotated, 2020).unwrap();
        assert_eq!(summary.total, 1);
        assert!((summary.percentages.home - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_season_is_an_error() {
        let set = MatchSet::from_records(vec![game("05/08/2020", Some(2), Some(1), "Casa")]);
        let annotated = annotate(&set);

        let err = season_summary(&annotated, 1999).unwrap_err();
        match err {
            PipelineError::EmptyPartition { aggregator, detail } => {
                assert_eq!(aggregator, Aggregator::SeasonFilter);
                assert!(detail.contains("1999"));
                assert!(detail.contains("seasons present: 2020"));
            }
            other => panic!("expected EmptyPartition, got: {other}"),
        }
    }
}
