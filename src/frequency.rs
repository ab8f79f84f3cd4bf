use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Word → count mapping that remembers the order in which words were first
/// seen. That order is the tie-break key used by [`rank`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable::default()
    }

    /// Builds a table from `(word, count)` pairs, summing repeated words.
    /// Zero counts are rejected.
    pub fn from_counts<I, S>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut table = FrequencyTable::new();
        for (word, count) in counts {
            if count == 0 {
                return Err(AnalysisError::invalid_input(format!(
                    "count for {:?} must be positive",
                    word.as_ref()
                )));
            }
            table.add(word.as_ref(), count);
        }
        Ok(table)
    }

    /// Adds `count` to `word`, appending it in first-seen position if new.
    pub(crate) fn add(&mut self, word: &str, count: u32) {
        match self.index.get(word) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(word.to_owned(), self.entries.len());
                self.entries.push((word.to_owned(), count));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.index.get(word).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Iterates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// Unordered view, handy for comparing tables regardless of insertion order.
    pub fn to_map(&self) -> HashMap<String, u32> {
        self.entries.iter().cloned().collect()
    }
}

///Takes a token sequence and counts the quantity of each word. An empty sequence is an error.
/// # Example
/// ```
/// use chapter_analysis::count_words;
/// let words = vec![
///     "one".to_string(),
///     "two".to_string(),
///     "two".to_string(),
/// ];
/// let counted = count_words(&words).unwrap();
/// assert_eq!(counted.get("one"), Some(1));
/// assert_eq!(counted.get("two"), Some(2));
/// assert_eq!(counted.total(), 3);
/// ```
pub fn count_words(words: &[String]) -> Result<FrequencyTable> {
    if words.is_empty() {
        return Err(AnalysisError::invalid_input("token list cannot be empty"));
    }
    let mut frequency = FrequencyTable::new();
    for word in words {
        frequency.add(word, 1);
    }
    Ok(frequency)
}

/// A frequency table ordered by descending count. Equal counts keep the
/// order in which the words were first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedList {
    entries: Vec<(String, u32)>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }

    pub fn words(&self) -> Vec<&str> {
        self.entries.iter().map(|(w, _)| w.as_str()).collect()
    }

    /// Words whose count is exactly `count`, in rank order.
    pub fn words_with_count(&self, count: u32) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, c)| *c == count)
            .map(|(w, _)| w.clone())
            .collect()
    }

    /// Back to a table whose first-seen order is this rank order.
    pub fn to_table(&self) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for (word, count) in &self.entries {
            table.add(word, *count);
        }
        table
    }
}

///Sorts a frequency table by descending count into a [`RankedList`].
///Ties are broken by the table's first-seen order, so an earlier word with the same count stays ahead.
/// # Example
/// ```
/// use chapter_analysis::{count_words, rank};
/// let tokens: Vec<String> = ["a", "a", "b", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let ranked = rank(&count_words(&tokens).unwrap()).unwrap();
/// assert_eq!(ranked.words(), vec!["a", "b", "c"]);
/// ```
pub fn rank(frequency: &FrequencyTable) -> Result<RankedList> {
    if frequency.is_empty() {
        return Err(AnalysisError::invalid_input(
            "frequency table cannot be empty",
        ));
    }
    let mut keyed: Vec<(usize, &(String, u32))> = frequency.entries.iter().enumerate().collect();
    keyed.sort_by_key(|(seq, (_, count))| (Reverse(*count), *seq));
    Ok(RankedList {
        entries: keyed.into_iter().map(|(_, entry)| entry.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    /// Word-at-a-time insertion: each word goes in front of the first entry
    /// with a strictly smaller count, otherwise at the end.
    fn insertion_rank(table: &FrequencyTable) -> Vec<(String, u32)> {
        let mut out: Vec<(String, u32)> = Vec::new();
        for (word, count) in table.iter() {
            match out.iter().position(|(_, c)| count > *c) {
                Some(pos) => out.insert(pos, (word.to_string(), count)),
                None => out.push((word.to_string(), count)),
            }
        }
        out
    }

    #[test]
    fn test_count() {
        let words = tokens(&["one", "two", "two", "three", "three", "three"]);
        let counted = count_words(&words).unwrap();
        let mut words_map = HashMap::new();
        words_map.insert("one".to_string(), 1_u32);
        words_map.insert("two".to_string(), 2_u32);
        words_map.insert("three".to_string(), 3_u32);
        assert_eq!(counted.to_map(), words_map);
        assert_eq!(counted.total(), words.len() as u64);
    }

    #[test]
    fn test_first_seen_order() {
        let counted = count_words(&tokens(&["b", "a", "b", "c", "a"])).unwrap();
        let order: Vec<&str> = counted.iter().map(|(w, _)| w).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_count_empty_rejected() {
        assert!(count_words(&[]).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let ranked = rank(&count_words(&tokens(&["a", "a", "b", "b", "c"])).unwrap()).unwrap();
        assert_eq!(
            ranked.entries(),
            &[
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_rank_later_higher_count_moves_up() {
        let table =
            FrequencyTable::from_counts([("x", 1), ("y", 3), ("z", 1), ("w", 3), ("v", 2)])
                .unwrap();
        let ranked = rank(&table).unwrap();
        assert_eq!(ranked.words(), vec!["y", "w", "v", "x", "z"]);
    }

    #[test]
    fn test_rank_matches_insertion_procedure() {
        let cases: Vec<Vec<(&str, u32)>> = vec![
            vec![("a", 1)],
            vec![("a", 1), ("b", 1)],
            vec![("a", 1), ("b", 2)],
            vec![("a", 5), ("b", 1), ("c", 5), ("d", 3), ("e", 3), ("f", 9), ("g", 1)],
            vec![("p", 2), ("q", 2), ("r", 2), ("s", 4), ("t", 2)],
        ];
        for case in cases {
            let table = FrequencyTable::from_counts(case).unwrap();
            let ranked = rank(&table).unwrap();
            assert_eq!(ranked.entries(), insertion_rank(&table).as_slice());
        }
    }

    #[test]
    fn test_rank_non_increasing_and_complete() {
        let words = tokens(&[
            "sand", "worm", "spice", "sand", "spice", "sand", "water", "worm", "fremen",
        ]);
        let table = count_words(&words).unwrap();
        let ranked = rank(&table).unwrap();
        assert_eq!(ranked.len(), table.len());
        assert!(ranked.entries().windows(2).all(|w| w[0].1 >= w[1].1));
        for (word, count) in table.iter() {
            assert_eq!(ranked.iter().filter(|(w, _)| *w == word).count(), 1);
            assert!(ranked.iter().any(|(w, c)| w == word && c == count));
        }
    }

    #[test]
    fn test_rank_empty_rejected() {
        assert!(rank(&FrequencyTable::new()).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_from_counts_sums_and_rejects_zero() {
        let table = FrequencyTable::from_counts([("a", 2), ("b", 1), ("a", 3)]).unwrap();
        assert_eq!(table.get("a"), Some(5));
        assert_eq!(table.len(), 2);
        assert!(
            FrequencyTable::from_counts([("a", 0)])
                .unwrap_err()
                .is_invalid_input()
        );
    }

    #[test]
    fn test_to_table_preserves_rank_order() {
        let table = FrequencyTable::from_counts([("a", 1), ("b", 4), ("c", 2)]).unwrap();
        let ranked = rank(&table).unwrap();
        let table = ranked.to_table();
        let order: Vec<&str> = table.iter().map(|(w, _)| w).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(ranked.words_with_count(1), vec!["a".to_string()]);
    }
}
