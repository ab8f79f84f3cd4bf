use std::collections::BTreeSet;

use log::{debug, warn};
use regex::Regex;
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// One chapter of the document. `index` is 1-based and contiguous over the
/// segments that survived exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub text: String,
}

/// Splits a document at a structural delimiter and drops front matter,
/// titles and appendices by their zero-based position in the raw split.
#[derive(Debug, Clone)]
pub struct Segmenter {
    delimiter: Regex,
    excluded: BTreeSet<usize>,
}

impl Segmenter {
    /// `delimiter` is a regular expression. An empty or invalid pattern is a
    /// configuration error.
    pub fn new(delimiter: &str, excluded: BTreeSet<usize>) -> Result<Self> {
        if delimiter.is_empty() {
            return Err(AnalysisError::configuration(
                "segment delimiter cannot be empty",
            ));
        }
        let delimiter = Regex::new(delimiter).map_err(|e| {
            AnalysisError::configuration(format!("invalid segment delimiter: {e}"))
        })?;
        Ok(Segmenter {
            delimiter,
            excluded,
        })
    }

    ///Splits `text` into ordered segments, skipping excluded positions and re-indexing the rest 1..N.
    /// # Example
    /// ```
    /// use std::collections::BTreeSet;
    /// use chapter_analysis::Segmenter;
    /// let segmenter = Segmenter::new("###", BTreeSet::from([0])).unwrap();
    /// let segments = segmenter.split("Title###first###second").unwrap();
    /// assert_eq!(segments.len(), 2);
    /// assert_eq!(segments[0].index, 1);
    /// assert_eq!(segments[1].text, "second");
    /// ```
    pub fn split(&self, text: &str) -> Result<Vec<Segment>> {
        self.split_counted(text).map(|(segments, _)| segments)
    }

    /// Like [`split`](Self::split), also returning the number of raw segments
    /// before exclusion.
    pub(crate) fn split_counted(&self, text: &str) -> Result<(Vec<Segment>, usize)> {
        if text.is_empty() {
            return Err(AnalysisError::invalid_input("text cannot be empty"));
        }

        let mut segments = Vec::new();
        let mut raw_count = 0;
        for (position, raw) in self.delimiter.split(text).enumerate() {
            raw_count += 1;
            if self.excluded.contains(&position) {
                continue;
            }
            segments.push(Segment {
                index: segments.len() + 1,
                text: raw.to_string(),
            });
        }

        if let Some(last) = self.excluded.iter().next_back() {
            if *last >= raw_count {
                warn!(
                    "exclusion index {} is beyond the {} raw segments",
                    last, raw_count
                );
            }
        }
        debug!(
            "split into {} raw segments, kept {}",
            raw_count,
            segments.len()
        );

        if segments.is_empty() {
            return Err(AnalysisError::invalid_input(
                "every segment was excluded",
            ));
        }
        Ok((segments, raw_count))
    }
}
