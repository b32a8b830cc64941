// Configuration loading and validation (config/analysis.toml).

use placar_core::schema::DEFAULT_DROPPED_COLUMNS;
use placar_core::PipelineOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub delimiter: u8,
    pub season: Option<i32>,
    pub dropped_columns: Vec<String>,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Config {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            dropped_columns: self.dropped_columns.clone(),
            season: self.season,
        }
    }
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    dataset: DatasetSection,
    #[serde(default)]
    analysis: AnalysisSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetSection {
    path: String,
    #[serde(default = "default_delimiter")]
    delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalysisSection {
    #[serde(default)]
    season: Option<i32>,
    #[serde(default = "default_dropped_columns")]
    dropped_columns: Vec<String>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        AnalysisSection {
            season: None,
            dropped_columns: default_dropped_columns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSection {
    #[serde(default = "default_format")]
    format: String,
    #[serde(default = "default_pretty")]
    pretty: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        OutputSection {
            format: default_format(),
            pretty: default_pretty(),
        }
    }
}

fn default_delimiter() -> String {
    ",".into()
}

fn default_dropped_columns() -> Vec<String> {
    DEFAULT_DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_format() -> String {
    "json".into()
}

fn default_pretty() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analysis.toml` under `base_dir`. Does not copy
/// defaults; see `load_config()`.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("analysis.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: AnalysisFile =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })?;

    validate(file)
}

/// Copy every file in `defaults/` that is missing from `config/`. Files
/// ending in `.example` are skipped and existing files are never overwritten.
/// Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    if !defaults_dir.exists() {
        if config_dir.exists() {
            return Ok(vec![]);
        }
        return Err(copy_err(format!(
            "neither defaults/ nor config/ directory found in {}; \
             run from the project root or ensure defaults/ is present",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("failed to create config directory: {e}")))?;

    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("failed to read defaults directory: {e}")))?;

    let mut copied = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| copy_err(format!("failed to read defaults entry: {e}")))?
            .path();
        let Some(file_name) = source.file_name().filter(|_| source.is_file()) else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        // Existing files are left untouched.
        let target = config_dir.join(file_name);
        let mut dest = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(dest) => dest,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(copy_err(format!(
                    "failed to create {}: {e}",
                    target.display()
                )))
            }
        };
        let mut src = std::fs::File::open(&source)
            .map_err(|e| copy_err(format!("failed to read {}: {e}", source.display())))?;
        std::io::copy(&mut src, &mut dest).map_err(|e| {
            copy_err(format!(
                "failed to copy {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;
        copied.push(target);
    }
    copied.sort();

    Ok(copied)
}

/// Load config relative to the working directory, copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

fn validate(file: AnalysisFile) -> Result<Config, ConfigError> {
    if file.dataset.path.trim().is_empty() {
        return Err(invalid("dataset.path", "must not be empty".into()));
    }

    let delimiter = match file.dataset.delimiter.as_bytes() {
        [b] if b.is_ascii() => *b,
        _ => {
            return Err(invalid(
                "dataset.delimiter",
                format!(
                    "must be a single ASCII character, got {:?}",
                    file.dataset.delimiter
                ),
            ))
        }
    };

    if let Some(season) = file.analysis.season {
        if !(1900..=2100).contains(&season) {
            return Err(invalid(
                "analysis.season",
                format!("must be a calendar year between 1900 and 2100, got {season}"),
            ));
        }
    }

    let format = match file.output.format.trim().to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        "text" => OutputFormat::Text,
        other => {
            return Err(invalid(
                "output.format",
                format!("must be \"json\" or \"text\", got {other:?}"),
            ))
        }
    };

    Ok(Config {
        dataset_path: PathBuf::from(file.dataset.path),
        delimiter,
        season: file.analysis.season,
        dropped_columns: file.analysis.dropped_columns,
        format,
        pretty: file.output.pretty,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
