use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AnalysisError, Result};

/// Common English function words, the default stopword set.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
    "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
    "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
    "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("word pattern is valid"));

/// Owned copy of [`ENGLISH_STOPWORDS`].
pub fn english_stopwords() -> BTreeSet<String> {
    ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

/// Lowercases a segment and keeps the runs of letters and digits that are
/// neither stopwords nor noise words, in their original order.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: BTreeSet<String>,
    noise_words: BTreeSet<String>,
}

impl Tokenizer {
    pub fn new(stopwords: BTreeSet<String>, noise_words: BTreeSet<String>) -> Self {
        Tokenizer {
            stopwords: lowercase_all(stopwords),
            noise_words: lowercase_all(noise_words),
        }
    }

    fn is_filtered(&self, word: &str) -> bool {
        self.stopwords.contains(word) || self.noise_words.contains(word)
    }

    ///Splits a segment into lowercase tokens. Punctuation separates words, so "don't" yields "don" and "t".
    /// # Example
    /// ```
    /// use std::collections::BTreeSet;
    /// use chapter_analysis::Tokenizer;
    /// let stop = BTreeSet::from(["the".to_string()]);
    /// let noise = BTreeSet::from(["said".to_string()]);
    /// let tokenizer = Tokenizer::new(stop, noise);
    /// let tokens = tokenizer.tokenize("\"The spice,\" Paul said. The SPICE!").unwrap();
    /// assert_eq!(tokens, vec!["spice", "paul", "spice"]);
    /// ```
    pub fn tokenize(&self, segment: &str) -> Result<Vec<String>> {
        if segment.is_empty() {
            return Err(AnalysisError::invalid_input("segment cannot be empty"));
        }
        let lowered = segment.to_lowercase();
        let tokens = WORD
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| !self.is_filtered(w))
            .map(String::from)
            .collect();
        Ok(tokens)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(english_stopwords(), BTreeSet::new())
    }
}

fn lowercase_all(words: BTreeSet<String>) -> BTreeSet<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_lowercase_and_order() {
        let tokenizer = Tokenizer::new(BTreeSet::new(), BTreeSet::new());
        let tokens = tokenizer.tokenize("Arrakis DUNE desert 10191").unwrap();
        assert_eq!(tokens, vec!["arrakis", "dune", "desert", "10191"]);
    }

    #[test]
    fn test_punctuation_splits_words() {
        let tokenizer = Tokenizer::new(BTreeSet::new(), BTreeSet::new());
        let tokens = tokenizer.tokenize("(_test] {test2!= well-known").unwrap();
        assert_eq!(tokens, vec!["test", "test2", "well", "known"]);
    }

    #[test]
    fn test_stopwords_and_noise_removed() {
        let tokenizer = Tokenizer::new(set(&["the", "of"]), set(&["said"]));
        let tokens = tokenizer
            .tokenize("The Duke said: the power of the spice")
            .unwrap();
        assert_eq!(tokens, vec!["duke", "power", "spice"]);
    }

    #[test]
    fn test_filter_sets_are_case_insensitive() {
        let tokenizer = Tokenizer::new(set(&["The"]), set(&["SAID"]));
        let tokens = tokenizer.tokenize("the man said hello").unwrap();
        assert_eq!(tokens, vec!["man", "hello"]);
    }

    #[test]
    fn test_unicode_letters() {
        let tokenizer = Tokenizer::new(BTreeSet::new(), BTreeSet::new());
        let tokens = tokenizer.tokenize("Café naïve Ünïcode").unwrap();
        assert_eq!(tokens, vec!["café", "naïve", "ünïcode"]);
    }

    #[test]
    fn test_empty_input_rejected() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_only_stopwords_gives_empty_sequence() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("and the of it").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_default_stopwords() {
        let stop = english_stopwords();
        assert!(stop.contains("the"));
        assert!(stop.contains("wouldn"));
        assert!(!stop.contains("spice"));
    }
}
