use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::frequency::RankedList;

/// One of the K highest ranked words of a segment (or of the whole document,
/// in which case `segment` is 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopKEntry {
    pub segment: usize,
    pub rank: usize,
    pub word: String,
    pub count: u32,
}

///Takes the first `k` entries of a ranked list, tagging each with `segment` and its 1-based rank.
///Fails with a configuration error when `k` is zero or larger than the list.
/// # Example
/// ```
/// use chapter_analysis::{FrequencyTable, rank, top_k};
/// let table = FrequencyTable::from_counts([("spice", 4), ("sand", 2), ("water", 1)]).unwrap();
/// let top = top_k(&rank(&table).unwrap(), 2, 1).unwrap();
/// assert_eq!(top[0].word, "spice");
/// assert_eq!(top[1].rank, 2);
/// assert!(top_k(&rank(&table).unwrap(), 5, 1).is_err());
/// ```
pub fn top_k(ranked: &RankedList, k: usize, segment: usize) -> Result<Vec<TopKEntry>> {
    if k < 1 {
        return Err(AnalysisError::configuration(
            "x must be greater than 0",
        ));
    }
    if k > ranked.len() {
        return Err(AnalysisError::configuration(format!(
            "x too high: requested {} of {} ranked words",
            k,
            ranked.len()
        )));
    }
    Ok(ranked
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, (word, count))| TopKEntry {
            segment,
            rank: i + 1,
            word: word.to_string(),
            count,
        })
        .collect())
}
