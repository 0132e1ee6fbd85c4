//! Timing curves read from the simulator's flat files.
//!
//! One file per (distribution, processor count): `{label}_{count}.csv`, one
//! average access time per line, one line per memory module.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request distribution the simulator was run with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Uniform,
    Normal,
}

impl Distribution {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Normal => "normal",
        }
    }

    /// Chart caption, e.g. "Uniform Distribution".
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        let head: String = chars.next().map(|c| c.to_ascii_uppercase()).into_iter().collect();
        format!("{head}{} Distribution", chars.as_str())
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Average access time per memory module for one configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub distribution: Distribution,
    pub processors: u32,
    pub values: Vec<f64>,
}

impl Series {
    /// (module index, value) pairs; module indices start at 1.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| ((i + 1) as f64, v))
            .collect()
    }

    /// Value recorded for a 1-based module index.
    #[inline]
    pub fn value_at_module(&self, module: usize) -> Option<f64> {
        module.checked_sub(1).and_then(|i| self.values.get(i)).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("{}:{line}: invalid number {token:?}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        token: String,
    },
    #[error("failed to read {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a series was or was not produced.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded(Series),
    Missing { file: PathBuf },
    ShapeMismatch {
        file: PathBuf,
        found: usize,
        expected: usize,
    },
    /// Only produced when `strict_parse` is off.
    Unparsable { file: PathBuf, line: usize },
}

impl LoadOutcome {
    pub fn into_series(self) -> Option<Series> {
        match self {
            Self::Loaded(series) => Some(series),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SeriesLoader {
    dir: PathBuf,
    module_count: usize,
    strict_parse: bool,
}

impl SeriesLoader {
    pub fn new(dir: impl Into<PathBuf>, module_count: usize) -> Self {
        Self {
            dir: dir.into(),
            module_count,
            strict_parse: true,
        }
    }

    pub fn with_strict_parse(mut self, strict: bool) -> Self {
        self.strict_parse = strict;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }

    pub fn file_name(distribution: Distribution, processors: u32) -> String {
        format!("{}_{}.csv", distribution.label(), processors)
    }

    pub fn path_for(&self, distribution: Distribution, processors: u32) -> PathBuf {
        self.dir.join(Self::file_name(distribution, processors))
    }

    /// Load one series; any non-fatal reason for absence maps to `None`.
    pub fn load(
        &self,
        distribution: Distribution,
        processors: u32,
    ) -> Result<Option<Series>, SeriesError> {
        Ok(self.fetch(distribution, processors)?.into_series())
    }

    /// Like [`load`](Self::load) but reports why a series is absent.
    pub fn fetch(
        &self,
        distribution: Distribution,
        processors: u32,
    ) -> Result<LoadOutcome, SeriesError> {
        let file = self.path_for(distribution, processors);
        if !file.exists() {
            info!("Missing: {}", file_label(&file));
            return Ok(LoadOutcome::Missing { file });
        }

        let text = fs::read_to_string(&file).map_err(|source| SeriesError::Io {
            file: file.clone(),
            source,
        })?;

        let values = match parse_values(&text) {
            Ok(values) => values,
            Err((line, token)) if self.strict_parse => {
                return Err(SeriesError::Parse { file, line, token });
            }
            Err((line, token)) => {
                warn!(
                    "Skipping {}: line {line} is not a number ({token:?})",
                    file_label(&file)
                );
                return Ok(LoadOutcome::Unparsable { file, line });
            }
        };

        if values.len() != self.module_count {
            warn!(
                "Malformed: {} has {} values, expected {}",
                file_label(&file),
                values.len(),
                self.module_count
            );
            return Ok(LoadOutcome::ShapeMismatch {
                file,
                found: values.len(),
                expected: self.module_count,
            });
        }

        debug!(%distribution, processors, "loaded {}", file.display());
        Ok(LoadOutcome::Loaded(Series {
            distribution,
            processors,
            values,
        }))
    }
}

/// Bare file name for console messages; falls back to the full path.
pub(crate) fn file_label(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// Parse one number per non-blank line. On failure returns the 1-based line
/// number and the offending token.
fn parse_values(text: &str) -> Result<Vec<f64>, (usize, String)> {
    let mut values = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => return Err((i + 1, token.to_string())),
        }
    }
    Ok(values)
}
