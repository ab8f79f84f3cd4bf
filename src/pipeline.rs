//! End-to-end run over one document.
//!
//! Segments are independent until aggregation: each one is tokenized,
//! counted, ranked, cut to its top-K and scored on its own, optionally on the
//! rayon pool. Results are always reassembled in segment order before the
//! document-wide stages run, so a parallel run produces the same output as a
//! sequential one. The first failing stage aborts the whole run.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::{DocumentFrequency, TopKAppearances, aggregate_document, aggregate_top_k};
use crate::config::AnalysisConfig;
use crate::dataset::{AnalysisRow, build_dataset};
use crate::error::Result;
use crate::frequency::{RankedList, count_words, rank};
use crate::segment::{Segment, Segmenter};
use crate::sentiment::{SentimentScorer, score_segment};
use crate::tokenize::Tokenizer;
use crate::topk::{TopKEntry, top_k};

/// Everything computed for one segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentAnalysis {
    pub index: usize,
    #[serde(skip)]
    pub text: String,
    /// Cleaned tokens in text order.
    pub tokens: Vec<String>,
    pub ranked: RankedList,
    pub top_k: Vec<TopKEntry>,
    pub sentiment: f64,
}

/// Result of [`analyze_document`].
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub segments: Vec<SegmentAnalysis>,
    pub document: DocumentFrequency,
    pub appearances: TopKAppearances,
    pub rows: Vec<AnalysisRow>,
}

impl Analysis {
    pub fn sentiments(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.sentiment).collect()
    }
}

fn analyze_segment<S>(
    segment: &Segment,
    tokenizer: &Tokenizer,
    k: usize,
    scorer: &S,
) -> Result<SegmentAnalysis>
where
    S: SentimentScorer + ?Sized,
{
    let run = || -> Result<SegmentAnalysis> {
        let tokens = tokenizer.tokenize(&segment.text)?;
        let ranked = rank(&count_words(&tokens)?)?;
        let top = top_k(&ranked, k, segment.index)?;
        let sentiment = score_segment(scorer, &segment.text)?;
        debug!(
            "segment {}: {} tokens, {} distinct, sentiment {:.4}",
            segment.index,
            tokens.len(),
            ranked.len(),
            sentiment
        );
        Ok(SegmentAnalysis {
            index: segment.index,
            text: segment.text.clone(),
            tokens,
            ranked,
            top_k: top,
            sentiment,
        })
    };
    run().map_err(|e| e.in_segment(segment.index))
}

///Runs the whole analysis over one document text.
/// # Example
/// ```
/// use chapter_analysis::{AnalysisConfig, LexiconScorer, analyze_document};
/// let mut config = AnalysisConfig::default();
/// config.delimiter = "###".to_string();
/// config.top_k = 2;
/// config.aggregate_top_x = 2;
/// let text = "spice spice sand worm###paul paul jessica spice";
/// let analysis = analyze_document(text, &config, &LexiconScorer::new()).unwrap();
/// assert_eq!(analysis.rows.len(), 4);
/// assert_eq!(analysis.document.ranked.words()[0], "spice");
/// ```
pub fn analyze_document<S>(text: &str, config: &AnalysisConfig, scorer: &S) -> Result<Analysis>
where
    S: SentimentScorer + ?Sized,
{
    config.validate()?;
    let segmenter = Segmenter::new(&config.delimiter, config.excluded_segments.clone())?;
    let tokenizer = Tokenizer::new(config.stopwords.clone(), config.noise_words.clone());
    let (segments, raw_count) = segmenter.split_counted(text)?;

    let k = config.top_k;
    let per_segment: Vec<SegmentAnalysis> = if config.parallel {
        segments
            .par_iter()
            .map(|s| analyze_segment(s, &tokenizer, k, scorer))
            .collect::<Result<_>>()?
    } else {
        segments
            .iter()
            .map(|s| analyze_segment(s, &tokenizer, k, scorer))
            .collect::<Result<_>>()?
    };

    let rankings: Vec<RankedList> = per_segment.iter().map(|s| s.ranked.clone()).collect();
    let document = aggregate_document(&rankings, config.aggregate_top_x)?;

    let top: Vec<Vec<TopKEntry>> = per_segment.iter().map(|s| s.top_k.clone()).collect();
    let appearances = aggregate_top_k(&top)?;

    let sentiments: Vec<f64> = per_segment.iter().map(|s| s.sentiment).collect();
    let rows = build_dataset(&top, &sentiments)?;

    info!(
        "analyzed {} segments ({} excluded), {} distinct words, {} rows",
        per_segment.len(),
        raw_count - segments.len(),
        document.ranked.len(),
        rows.len()
    );

    Ok(Analysis {
        segments: per_segment,
        document,
        appearances,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn config(k: usize) -> AnalysisConfig {
        AnalysisConfig {
            delimiter: "###".to_string(),
            excluded_segments: BTreeSet::new(),
            stopwords: BTreeSet::from(["the".to_string()]),
            noise_words: BTreeSet::from(["said".to_string()]),
            top_k: k,
            aggregate_top_x: k,
            parallel: false,
        }
    }

    fn neutral(_: &str) -> f64 {
        0.0
    }

    #[test]
    fn test_small_document() {
        let text = "a a b said the###c c c a";
        let analysis = analyze_document(text, &config(2), &neutral).unwrap();
        assert_eq!(analysis.segments.len(), 2);
        assert_eq!(analysis.segments[0].tokens, vec!["a", "a", "b"]);
        assert_eq!(analysis.segments[1].tokens, vec!["c", "c", "c", "a"]);
        assert_eq!(analysis.segments[0].ranked.words(), vec!["a", "b"]);
        assert_eq!(analysis.segments[1].ranked.words(), vec!["c", "a"]);
        assert_eq!(analysis.document.ranked.words(), vec!["a", "c", "b"]);
        assert_eq!(analysis.document.unique_words, vec!["b".to_string()]);
        assert_eq!(analysis.appearances.ranked.words(), vec!["a", "b", "c"]);
        assert_eq!(analysis.appearances.once, vec!["b", "c"]);
        assert_eq!(analysis.rows.len(), 4);
    }

    #[test]
    fn test_segment_smaller_than_k_fails() {
        let text = "a a b c###d";
        let err = analyze_document(text, &config(2), &neutral).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("segment 2"));
    }

    #[test]
    fn test_segment_of_stopwords_fails() {
        let text = "a b###the said";
        let err = analyze_document(text, &config(1), &neutral).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("segment 2"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = "spice sand spice worm###paul jessica paul leto###baron feyd baron rabban";
        let sequential = analyze_document(text, &config(2), &neutral).unwrap();
        let mut parallel_config = config(2);
        parallel_config.parallel = true;
        let parallel = analyze_document(text, &parallel_config, &neutral).unwrap();
        assert_eq!(sequential.rows, parallel.rows);
        assert_eq!(sequential.document.ranked, parallel.document.ranked);
    }

    #[test]
    fn test_invalid_config() {
        assert!(
            analyze_document("a", &config(0), &neutral)
                .unwrap_err()
                .is_configuration()
        );
    }
}
