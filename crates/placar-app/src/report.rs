// Report output: JSON for the chart renderer, or a plain-text dump.

use crate::config::OutputFormat;
use placar_core::matrix::LabeledMatrix;
use placar_core::outcome::Outcome;
use placar_core::AnalysisReport;
use std::fmt::{Display, Write};

pub fn render(
    report: &AnalysisReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(report),
        OutputFormat::Json => serde_json::to_string(report),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn matrix_text<R: Display, C: Display>(out: &mut String, m: &LabeledMatrix<R, C>) {
    let _ = write!(out, "{:>6}", "");
    for c in &m.col_labels {
        let _ = write!(out, "{c:>5}");
    }
    out.push('\n');
    for (r, row) in m.row_labels.iter().zip(&m.cells) {
        let _ = write!(out, "{r:>6}");
        for v in row {
            let _ = write!(out, "{v:>5}");
        }
        out.push('\n');
    }
}

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Matches: {}", report.matches);

    if let Some(counts) = &report.outcomes {
        let _ = writeln!(out, "\nResults (winner field)");
        for outcome in Outcome::ALL {
            let pct = report
                .outcome_percentages
                .map(|p| format!(" ({:.2}%)", p.get(outcome)))
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<5} {}{}", outcome.label(), counts.get(outcome), pct);
        }
    }

    for hist in [&report.home_goals, &report.away_goals].into_iter().flatten() {
        let _ = writeln!(out, "\nGoals per match ({:?})", hist.side);
        for (g, n) in hist.goals.iter().zip(&hist.matches) {
            let _ = writeln!(out, "  {g:>3}: {n}");
        }
    }

    if let Some(m) = &report.score_frequency {
        let _ = writeln!(out, "\nScore lines (rows home, columns away)");
        matrix_text(&mut out, m);
    }

    if let Some(avg) = &report.round_averages {
        let _ = writeln!(out, "\nAverage goals per round (home / away)");
        let mean = |v: &Option<f64>| v.map(|m| format!("{m:.2}")).unwrap_or_else(|| "-".into());
        for ((r, h), a) in avg.rounds.iter().zip(&avg.home).zip(&avg.away) {
            let _ = writeln!(out, "  {r:>3}: {} / {}", mean(h), mean(a));
        }
    }

    if let Some(m) = &report.round_season_goals {
        let _ = writeln!(out, "\nTotal goals (rows season, columns round)");
        matrix_text(&mut out, m);
    }

    if let Some(summary) = &report.season {
        let _ = writeln!(
            out,
            "\nSeason {} results (by score, {} matches)",
            summary.season, summary.total
        );
        for outcome in Outcome::ALL {
            let _ = writeln!(
                out,
                "  {:<5} {:.2}%",
                outcome.label(),
                summary.percentages.get(outcome)
            );
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "\nSkipped");
        for failure in &report.failures {
            let _ = writeln!(out, "  {}", failure.message);
        }
    }

    out
}
