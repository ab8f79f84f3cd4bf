use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::tokenize::english_stopwords;

/// Default chapter delimiter of the plain-text source.
pub const DEFAULT_DELIMITER: &str = "= = = = = =";

/// Options of one analysis run. Every field has a default, so a JSON config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Regular expression separating segments.
    pub delimiter: String,
    /// Zero-based positions (in the raw split) of segments to drop.
    pub excluded_segments: BTreeSet<usize>,
    pub stopwords: BTreeSet<String>,
    pub noise_words: BTreeSet<String>,
    /// Words kept per segment.
    pub top_k: usize,
    /// Words kept for the whole document.
    pub aggregate_top_x: usize,
    /// Run the per-segment stages on the rayon pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            delimiter: DEFAULT_DELIMITER.to_string(),
            excluded_segments: BTreeSet::new(),
            stopwords: english_stopwords(),
            noise_words: BTreeSet::new(),
            top_k: 5,
            aggregate_top_x: 5,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(AnalysisError::configuration("top_k must be greater than 0"));
        }
        if self.aggregate_top_x == 0 {
            return Err(AnalysisError::configuration(
                "aggregate_top_x must be greater than 0",
            ));
        }
        if self.delimiter.is_empty() {
            return Err(AnalysisError::configuration(
                "segment delimiter cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Settings read from a JSON config file. Absent keys stay `None` so the
/// command line can tell "not set" from "set to the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub delimiter: Option<String>,
    pub excluded_segments: Option<BTreeSet<usize>>,
    pub stopwords: Option<BTreeSet<String>>,
    pub noise_words: Option<BTreeSet<String>>,
    pub top_k: Option<usize>,
    pub aggregate_top_x: Option<usize>,
    pub parallel: Option<bool>,
}

impl ConfigFile {
    /// Fills unset keys from [`AnalysisConfig::default`]. Without
    /// `builtin_stopwords`, a file that lists no stopwords gets an empty set
    /// instead of the English list; stopwords listed in the file are kept either way.
    pub fn into_config(self, builtin_stopwords: bool) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        let stopwords = match self.stopwords {
            Some(words) => words,
            None if builtin_stopwords => defaults.stopwords,
            None => BTreeSet::new(),
        };
        AnalysisConfig {
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            excluded_segments: self.excluded_segments.unwrap_or(defaults.excluded_segments),
            stopwords,
            noise_words: self.noise_words.unwrap_or(defaults.noise_words),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            aggregate_top_x: self.aggregate_top_x.unwrap_or(defaults.aggregate_top_x),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        }
    }
}

/// Reads a JSON config file. Values are not validated here; call
/// [`AnalysisConfig::validate`] once every override has been applied.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let raw = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Reads a word list with one word per line. Blank lines and lines starting
/// with `#` are skipped; words are lowercased.
pub fn load_word_list(path: &Path) -> Result<BTreeSet<String>> {
    let raw = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}
