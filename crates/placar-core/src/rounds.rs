// Goals by round: per-round averages, and total goals per (season, round).

use crate::error::{Aggregator, Result};
use crate::matrix::LabeledMatrix;
use crate::schema::{AWAY_SCORE, DATE, HOME_SCORE, ROUND};
use crate::scores::Side;
use crate::temporal::{AnnotatedMatch, AnnotatedSet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Rows are seasons, columns rounds, both ascending.
pub type RoundSeasonMatrix = LabeledMatrix<i32, u32>;

// ---------------------------------------------------------------------------
// Season x round totals
// ---------------------------------------------------------------------------

/// Sum total goals per (season, round). Records missing a season, a round, or
/// either score are skipped.
pub fn tally_round_goals(matches: &[AnnotatedMatch<'_>]) -> BTreeMap<(i32, u32), u32> {
    let mut tally = BTreeMap::new();
    for m in matches {
        let (Some(season), Some(round), Some(goals)) = (m.season(), m.round(), m.total_goals())
        else {
            continue;
        };
        let bucket = tally.entry((season, round)).or_insert(0u32);
        *bucket = bucket.saturating_add(goals);
    }
    tally
}

/// Dense season x round matrix of total goals. The axes are the distinct
/// seasons and rounds actually observed; an empty tally yields an empty
/// matrix.
pub fn round_season_totals(set: &AnnotatedSet<'_>) -> Result<RoundSeasonMatrix> {
    set.require(Aggregator::RoundSeason, &[DATE, ROUND, HOME_SCORE, AWAY_SCORE])?;

    let tally = tally_round_goals(set.matches());
    let seasons: BTreeSet<i32> = tally.keys().map(|&(s, _)| s).collect();
    let rounds: BTreeSet<u32> = tally.keys().map(|&(_, r)| r).collect();

    debug!(
        "{} buckets over {} seasons and {} rounds",
        tally.len(),
        seasons.len(),
        rounds.len()
    );
    Ok(LabeledMatrix::from_tally(
        seasons.into_iter().collect(),
        rounds.into_iter().collect(),
        &tally,
    ))
}

// ---------------------------------------------------------------------------
// Per-round averages
// ---------------------------------------------------------------------------

/// Mean home and away goals per round, aligned to `rounds`. A side is `None`
/// for a round where no match has that side's score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundAverages {
    pub rounds: Vec<u32>,
    pub home: Vec<Option<f64>>,
    pub away: Vec<Option<f64>>,
}

#[derive(Default, Clone, Copy)]
struct GoalSum {
    goals: u64,
    matches: u32,
}

impl GoalSum {
    fn add(&mut self, goals: Option<u32>) {
        if let Some(g) = goals {
            self.goals += u64::from(g);
            self.matches += 1;
        }
    }

    fn mean(self) -> Option<f64> {
        (self.matches > 0).then(|| self.goals as f64 / f64::from(self.matches))
    }
}

/// Averages across all seasons, keyed by round number. Each side is averaged
/// over the matches that have that side's score, so a match missing only the
/// away score still counts toward the home mean.
pub fn round_averages(set: &AnnotatedSet<'_>) -> Result<RoundAverages> {
    set.require(Aggregator::RoundAverages, &[ROUND, HOME_SCORE, AWAY_SCORE])?;

    let mut sums: BTreeMap<u32, (GoalSum, GoalSum)> = BTreeMap::new();
    for m in set.matches() {
        let Some(round) = m.round() else {
            continue;
        };
        let (home, away) = (Side::Home.score(m.record), Side::Away.score(m.record));
        if home.is_none() && away.is_none() {
            continue;
        }
        let entry = sums.entry(round).or_default();
        entry.0.add(home);
        entry.1.add(away);
    }

    let mut averages = RoundAverages::default();
    for (round, (home, away)) in sums {
        averages.rounds.push(round);
        averages.home.push(home.mean());
        averages.away.push(away.mean());
    }
    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MatchRecord, MatchSet};
    use crate::temporal::annotate;

    fn game(date: &str, round: &str, home: u32, away: u32) -> MatchRecord {
        MatchRecord {
            date: Some(date.into()),
            round_raw: Some(round.into()),
            home_score: Some(home),
            away_score: Some(away),
            ..MatchRecord::default()
        }
    }

    #[test]
    fn sums_goals_per_bucket_and_zero_fills() {
        let set = MatchSet::from_records(vec![
            game("01/05/2019", "1", 2, 1),
            game("01/05/2019", "1", 0, 1),
            game("08/05/2019", "2", 3, 3),
            game("02/05/2020", "1", 1, 0),
            game("20/06/2020", "3", 0, 0),
        ]);
        let annotated = annotate(&set);

        let m = round_season_totals(&annotated).unwrap();
        assert_eq!(m.row_labels, vec![2019, 2020]);
        assert_eq!(m.col_labels, vec![1, 2, 3]);
        assert_eq!(m.get(2019, 1), Some(4));
        assert_eq!(m.get(2019, 2), Some(6));
        assert_eq!(m.get(2019, 3), Some(0));
        assert_eq!(m.get(2020, 1), Some(1));
        assert_eq!(m.get(2020, 2), Some(0));
        assert_eq!(m.get(2020, 3), Some(0));
    }

    #[test]
    fn records_missing_a_key_are_skipped() {
        let set = MatchSet::from_records(vec![
            game("01/05/2019", "1", 2, 1),
            game("01/05/2019", "final", 5, 5),
            game("not a date", "1", 4, 4),
        ]);
        let annotated = annotate(&set);

        let m = round_season_totals(&annotated).unwrap();
        assert_eq!(m.shape(), (1, 1));
        assert_eq!(m.total(), 3);
    }

    #[test]
    fn no_buckets_gives_empty_matrix() {
        let set = MatchSet::from_records(vec![game("??", "final", 1, 0)]);
        let annotated = annotate(&set);

        let m = round_season_totals(&annotated).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn averages_per_round() {
        let set = MatchSet::from_records(vec![
            game("01/05/2019", "Rodada 2", 2, 1),
            game("01/05/2020", "2", 1, 0),
            game("01/05/2020", "1", 3, 3),
            game("01/05/2020", "sem rodada", 9, 9),
        ]);
        let annotated = annotate(&set);

        let avg = round_averages(&annotated).unwrap();
        assert_eq!(avg.rounds, vec![1, 2]);
        assert_eq!(avg.home, vec![Some(3.0), Some(1.5)]);
        assert_eq!(avg.away, vec![Some(3.0), Some(0.5)]);
    }

    #[test]
    fn averages_skip_missing_scores_per_side() {
        let set = MatchSet::from_records(vec![
            game("01/05/2020", "1", 2, 0),
            MatchRecord {
                home_score: Some(4),
                away_score: None,
                ..game("02/05/2020", "1", 0, 0)
            },
            MatchRecord {
                home_score: None,
                away_score: Some(1),
                ..game("03/05/2020", "2", 0, 0)
            },
        ]);
        let annotated = annotate(&set);

        let avg = round_averages(&annotated).unwrap();
        assert_eq!(avg.rounds, vec![1, 2]);
        assert_eq!(avg.home, vec![Some(3.0), None]);
        assert_eq!(avg.away, vec![Some(0.0), Some(1.0)]);
    }

    #[test]
    fn oversized_score_is_skipped_not_summed() {
        let set = MatchSet::from_records(vec![
            MatchRecord {
                home_score: crate::record::parse_score("4294967295"),
                ..game("01/05/2019", "1", 0, 1)
            },
            MatchRecord {
                home_score: Some(u32::MAX),
                ..game("01/05/2019", "1", 0, 1)
            },
            game("01/05/2019", "1", 2, 1),
        ]);
        let annotated = annotate(&set);

        let m = round_season_totals(&annotated).unwrap();
        assert_eq!(m.get(2019, 1), Some(3));

        let avg = round_averages(&annotated).unwrap();
        assert_eq!(avg.home, vec![Some(2.0)]);
        assert_eq!(avg.away, vec![Some(1.0)]);
    }
}
