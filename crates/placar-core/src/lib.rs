// Library root: football match-result aggregation.
//
// Turns a table of historical match rows into outcome counts, score-line
// frequency matrices, goal distributions, per-round and per-season goal
// totals, and season-scoped outcome shares.

pub mod dataset;
pub mod error;
pub mod matrix;
pub mod outcome;
pub mod pipeline;
pub mod record;
pub mod rounds;
pub mod schema;
pub mod scores;
pub mod season;
pub mod temporal;

pub use dataset::{load_from_reader, load_table, RawTable};
pub use error::{Aggregator, PipelineError};
pub use pipeline::{run, AnalysisReport, PipelineOptions};
