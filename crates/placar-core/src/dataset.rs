// Dataset loading.
//
// Reads the match-results export (one row per match, header row first) into an
// untyped table. Column names are kept exactly as they appear in the file;
// canonicalization happens in `schema`.

use crate::error::{PipelineError, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A row-major table of optional text cells. Empty or whitespace-only cells
/// are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cell(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load a table from any reader. Malformed rows (wrong field count, invalid
/// UTF-8) are logged and skipped; only a failure to read the header row is an
/// error.
pub fn load_from_reader<R: Read>(
    rdr: R,
    delimiter: u8,
) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new().delimiter(delimiter).from_reader(rdr);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(cell).collect()),
            Err(e) => {
                skipped += 1;
                warn!("skipping malformed row: {}", e);
            }
        }
    }
    if skipped > 0 {
        warn!("{} malformed rows skipped", skipped);
    }

    Ok(RawTable { headers, rows })
}

/// Load the match table from a delimited file on disk.
pub fn load_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| PipelineError::SourceUnavailable {
        path: path.display().to_string(),
        source: csv::Error::from(e),
    })?;
    let table = load_from_reader(file, delimiter).map_err(|e| PipelineError::SourceUnavailable {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(
        "Loaded {} rows ({} columns) from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_headers_and_rows() {
        let csv_data = "\
ID,Data,Mandante,Visitante
1,29/03/2003,Guarani,Vasco
2,29/03/2003,Athletico-PR,Gremio";

        let table = load_from_reader(csv_data.as_bytes(), b',').unwrap();
        assert_eq!(table.headers, vec!["ID", "Data", "Mandante", "Visitante"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][2].as_deref(), Some("Athletico-PR"));
    }

    #[test]
    fn empty_cells_become_none() {
        let csv_data = "\
a,b,c
1,,  ";

        let table = load_from_reader(csv_data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows[0], vec![Some("1".to_string()), None, None]);
    }

    #[test]
    fn cells_are_trimmed() {
        let csv_data = "\
a,b
  Flamengo  , 2 ";

        let table = load_from_reader(csv_data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows[0][0].as_deref(), Some("Flamengo"));
        assert_eq!(table.rows[0][1].as_deref(), Some("2"));
    }

    #[test]
    fn rows_with_wrong_field_count_skipped() {
        let csv_data = "\
a,b,c
1,2,3
4,5
6,7,8";

        let table = load_from_reader(csv_data.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][0].as_deref(), Some("6"));
    }

    #[test]
    fn semicolon_delimiter() {
        let csv_data = "\
a;b
1;2";

        let table = load_from_reader(csv_data.as_bytes(), b';').unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0][1].as_deref(), Some("2"));
    }

    #[test]
    fn header_only_is_empty() {
        let table = load_from_reader("a,b,c".as_bytes(), b',').unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 3);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let path = std::env::temp_dir().join("placar_dataset_does_not_exist.csv");
        let _ = std::fs::remove_file(&path);

        let err = load_table(&path, b',').unwrap_err();
        match err {
            PipelineError::SourceUnavailable { path: p, .. } => {
                assert!(p.ends_with("placar_dataset_does_not_exist.csv"));
            }
            other => panic!("expected SourceUnavailable, got: {other}"),
        }
    }
}
