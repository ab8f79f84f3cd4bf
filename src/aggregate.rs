//! Cross-segment aggregation.
//!
//! Two views of the whole document are built from per-segment results:
//! summed word counts ([`aggregate_document`]) and how many segments list a
//! word among their top-K ([`aggregate_top_k`]).

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::frequency::{FrequencyTable, RankedList, rank};
use crate::topk::{TopKEntry, top_k};

/// Sums several frequency tables. A word's first-seen position is where it
/// first occurs walking the tables in order.
pub fn merge_tables(tables: &[FrequencyTable]) -> Result<FrequencyTable> {
    if tables.is_empty() {
        return Err(AnalysisError::invalid_input(
            "no frequency tables to merge",
        ));
    }
    let mut total = FrequencyTable::new();
    for table in tables {
        for (word, count) in table.iter() {
            total.add(word, count);
        }
    }
    Ok(total)
}

/// Words used exactly once, in rank order.
pub fn unique_words(ranked: &RankedList) -> Vec<String> {
    ranked.words_with_count(1)
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentFrequency {
    #[serde(skip)]
    pub table: FrequencyTable,
    pub ranked: RankedList,
    pub top_x: Vec<TopKEntry>,
    pub unique_words: Vec<String>,
}

///Combines the ranked word counts of every segment into a document-wide ranking.
///Segments are merged in order, each in its own rank order, so document ties follow the earliest segment ranking.
///Also extracts the top `x` words (segment tag 0) and the words used exactly once.
/// # Example
/// ```
/// use chapter_analysis::{FrequencyTable, aggregate_document, rank};
/// let s1 = rank(&FrequencyTable::from_counts([("a", 3), ("b", 1)]).unwrap()).unwrap();
/// let s2 = rank(&FrequencyTable::from_counts([("a", 1), ("c", 2)]).unwrap()).unwrap();
/// let doc = aggregate_document(&[s1, s2], 3).unwrap();
/// assert_eq!(doc.ranked.words(), vec!["a", "c", "b"]);
/// assert_eq!(doc.table.get("a"), Some(4));
/// assert_eq!(doc.unique_words, vec!["b".to_string()]);
/// ```
pub fn aggregate_document(segments: &[RankedList], x: usize) -> Result<DocumentFrequency> {
    if segments.is_empty() {
        return Err(AnalysisError::invalid_input(
            "no segment rankings to aggregate",
        ));
    }
    let tables: Vec<FrequencyTable> = segments.iter().map(RankedList::to_table).collect();
    let table = merge_tables(&tables)?;
    let ranked = rank(&table)?;
    let top_x = top_k(&ranked, x, 0)?;
    let unique_words = unique_words(&ranked);
    debug!(
        "document: {} distinct words, {} used once",
        ranked.len(),
        unique_words.len()
    );
    Ok(DocumentFrequency {
        table,
        ranked,
        top_x,
        unique_words,
    })
}

/// How often each word reaches a segment's top-K.
#[derive(Debug, Clone, Serialize)]
pub struct TopKAppearances {
    pub ranked: RankedList,
    /// Words that reach the top-K of exactly one segment.
    pub once: Vec<String>,
}

///Counts, for every word, the number of distinct segments listing it among their top-K, then ranks those counts.
pub fn aggregate_top_k(per_segment: &[Vec<TopKEntry>]) -> Result<TopKAppearances> {
    if per_segment.is_empty() {
        return Err(AnalysisError::invalid_input(
            "no top-K entries to aggregate",
        ));
    }
    let mut appearances = FrequencyTable::new();
    for entries in per_segment {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in entries {
            if seen.insert(entry.word.as_str()) {
                appearances.add(&entry.word, 1);
            }
        }
    }
    if appearances.is_empty() {
        return Err(AnalysisError::invalid_input(
            "no top-K entries to aggregate",
        ));
    }
    let ranked = rank(&appearances)?;
    let once = ranked.words_with_count(1);
    Ok(TopKAppearances { ranked, once })
}
