//! # chapter_analysis
//!
//! Deterministic word-frequency and sentiment analysis of one long text
//! split into chapters. Each chapter is tokenized, counted and ranked, its
//! top-K words are extracted and its sentiment is scored; the chapters are
//! then aggregated into a document-wide ranking and joined into one flat
//! dataset of `(Segment, Sentiment, Rank, Word, Count)` rows.
//!
//! ```
//! use chapter_analysis::{AnalysisConfig, LexiconScorer, analyze_document};
//! let mut config = AnalysisConfig::default();
//! config.delimiter = "###".to_string();
//! config.top_k = 1;
//! config.aggregate_top_x = 1;
//! let analysis = analyze_document("spice spice sand###desert desert", &config, &LexiconScorer::new()).unwrap();
//! assert_eq!(analysis.rows[1].word, "desert");
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod frequency;
pub mod pipeline;
pub mod segment;
pub mod sentiment;
pub mod tokenize;
pub mod topk;

pub use aggregate::{
    DocumentFrequency, TopKAppearances, aggregate_document, aggregate_top_k, merge_tables,
    unique_words,
};
pub use config::{AnalysisConfig, ConfigFile, DEFAULT_DELIMITER, load_config, load_word_list};
pub use dataset::{AnalysisRow, DATASET_COLUMNS, build_dataset};
pub use error::{AnalysisError, Result};
pub use export::{ExportFormat, csv_safe_cell, export_analysis, summary};
pub use frequency::{FrequencyTable, RankedList, count_words, rank};
pub use pipeline::{Analysis, SegmentAnalysis, analyze_document};
pub use segment::{Segment, Segmenter};
pub use sentiment::{LexiconScorer, SentimentScorer, score_segment};
pub use tokenize::{ENGLISH_STOPWORDS, Tokenizer, english_stopwords};
pub use topk::{TopKEntry, top_k};

/// Outcome of [`analyze_path`]: the rendered summary and the files written.
#[derive(Debug)]
pub struct AnalysisReport {
    pub result: String,
    pub outputs: Vec<PathBuf>,
    pub analysis: Analysis,
}

/// Reads a whole document as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    if text.is_empty() {
        return Err(AnalysisError::invalid_input(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(text)
}

///Reads `path`, analyzes it and exports the results into `out_dir`, named after the file stem.
pub fn analyze_path<S>(
    path: &Path,
    config: &AnalysisConfig,
    scorer: &S,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<AnalysisReport>
where
    S: SentimentScorer + ?Sized,
{
    let text = read_document(path)?;
    let analysis = analyze_document(&text, config, scorer)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let outputs = export_analysis(&analysis, &stem, format, out_dir)?;
    Ok(AnalysisReport {
        result: summary(&analysis),
        outputs,
        analysis,
    })
}
