// Season and round keys derived from loosely formatted text.

use crate::error::{Aggregator, Result};
use crate::record::{MatchRecord, MatchSet};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit run regex"));

/// Day-first formats, tried in order. ISO dates are accepted as well.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

// ---------------------------------------------------------------------------
// Key extraction
// ---------------------------------------------------------------------------

pub fn parse_match_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Calendar year of the match date, or `None` if the date does not parse.
pub fn extract_season(date: &str) -> Option<i32> {
    parse_match_date(date).map(|d| d.year())
}

/// The first run of ASCII digits in the text, as an integer. `None` when the
/// text has no digits or the run overflows.
pub fn extract_round(text: &str) -> Option<u32> {
    DIGIT_RUN_RE.find(text)?.as_str().parse().ok()
}

// ---------------------------------------------------------------------------
// Annotated records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalKeys {
    pub season: Option<i32>,
    pub round: Option<u32>,
}

impl TemporalKeys {
    pub fn of(record: &MatchRecord) -> Self {
        TemporalKeys {
            season: record.date.as_deref().and_then(extract_season),
            round: record.round_raw.as_deref().and_then(extract_round),
        }
    }
}

/// A record together with its derived keys. The record itself is untouched.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedMatch<'a> {
    pub record: &'a MatchRecord,
    pub keys: TemporalKeys,
}

impl AnnotatedMatch<'_> {
    pub fn season(&self) -> Option<i32> {
        self.keys.season
    }

    pub fn round(&self) -> Option<u32> {
        self.keys.round
    }

    pub fn total_goals(&self) -> Option<u32> {
        self.record.total_goals()
    }
}

/// The record set viewed through its temporal annotations.
#[derive(Debug, Clone)]
pub struct AnnotatedSet<'a> {
    source: &'a MatchSet,
    matches: Vec<AnnotatedMatch<'a>>,
}

impl<'a> AnnotatedSet<'a> {
    pub fn matches(&self) -> &[AnnotatedMatch<'a>] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn require(&self, aggregator: Aggregator, columns: &[&'static str]) -> Result<()> {
        self.source.require(aggregator, columns)
    }

    /// Distinct seasons present, ascending.
    pub fn seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self.matches.iter().filter_map(|m| m.season()).collect();
        seasons.sort_unstable();
        seasons.dedup();
        seasons
    }
}

/// Attach season and round keys to every record.
pub fn annotate(matches: &MatchSet) -> AnnotatedSet<'_> {
    let annotated: Vec<AnnotatedMatch<'_>> = matches
        .records()
        .iter()
        .map(|record| AnnotatedMatch {
            record,
            keys: TemporalKeys::of(record),
        })
        .collect();

    let no_season = annotated.iter().filter(|m| m.season().is_none()).count();
    let no_round = annotated.iter().filter(|m| m.round().is_none()).count();
    if no_season > 0 || no_round > 0 {
        debug!(
            "{} records without a season, {} without a round",
            no_season, no_round
        );
    }

    AnnotatedSet {
        source: matches,
        matches: annotated,
    }
}
