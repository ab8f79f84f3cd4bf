use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::topk::TopKEntry;

/// Column names of the exported dataset, in order.
pub const DATASET_COLUMNS: [&str; 5] = ["Segment", "Sentiment", "Rank", "Word", "Count"];

/// One row of the final dataset: a segment's top-K word joined with that
/// segment's sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    #[serde(rename = "Segment")]
    pub segment: usize,
    #[serde(rename = "Sentiment")]
    pub sentiment: f64,
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Word")]
    pub word: String,
    #[serde(rename = "Count")]
    pub count: u32,
}

///Joins each segment's top-K entries with its sentiment score.
///`top_k[i]` and `sentiments[i]` belong to the same segment, and every segment must carry the same number of entries.
///Rows come out segment-major, rank-minor, so the result has `segments × K` rows.
pub fn build_dataset(top_k: &[Vec<TopKEntry>], sentiments: &[f64]) -> Result<Vec<AnalysisRow>> {
    if top_k.is_empty() {
        return Err(AnalysisError::invalid_input("no segments to build rows from"));
    }
    if top_k.len() != sentiments.len() {
        return Err(AnalysisError::invalid_input(format!(
            "{} segments with top-K entries but {} sentiment scores",
            top_k.len(),
            sentiments.len()
        )));
    }
    let k = top_k[0].len();
    if k == 0 {
        return Err(AnalysisError::invalid_input("segment has no top-K entries"));
    }

    let mut rows = Vec::with_capacity(top_k.len() * k);
    for (entries, &sentiment) in top_k.iter().zip(sentiments) {
        if entries.len() != k {
            return Err(AnalysisError::invalid_input(format!(
                "expected {} top-K entries per segment, found {}",
                k,
                entries.len()
            )));
        }
        for entry in entries {
            rows.push(AnalysisRow {
                segment: entry.segment,
                sentiment,
                rank: entry.rank,
                word: entry.word.clone(),
                count: entry.count,
            });
        }
    }
    Ok(rows)
}
