//! Per-segment sentiment.
//!
//! The scoring model is supplied by the caller through [`SentimentScorer`].
//! [`score_segment`] is the adapter the pipeline calls once per segment; it
//! only checks that the model kept its side of the contract.
//!
//! [`LexiconScorer`] is a small valence-lexicon model bundled so the command
//! line tool works without any external model.

use std::collections::HashMap;
use std::path::Path;

use log::warn;

use crate::error::{AnalysisError, Result};

/// Anything that turns a span of text into a compound score in `[-1, 1]`.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Scores one segment, rejecting scores that are not finite or fall outside `[-1, 1]`.
pub fn score_segment<S>(scorer: &S, text: &str) -> Result<f64>
where
    S: SentimentScorer + ?Sized,
{
    let score = scorer.score(text);
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(AnalysisError::invalid_input(format!(
            "sentiment score {score} is outside [-1, 1]"
        )));
    }
    Ok(score)
}

/// Normalisation constant of the compound score, `s / sqrt(s² + ALPHA)`.
const ALPHA: f64 = 15.0;
/// A negated valence is flipped and damped by this factor.
const NEGATION_SCALAR: f64 = -0.74;
/// How many preceding tokens are searched for a negator.
const NEGATION_WINDOW: usize = 3;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nor", "cannot", "without", "neither", "nothing", "nobody", "none",
    "aint", "ain", "aren", "couldn", "didn", "doesn", "don", "hadn", "hasn", "haven", "isn",
    "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "wouldn",
];

const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("good", 1.9),
    ("great", 3.1),
    ("love", 3.2),
    ("loved", 2.9),
    ("happy", 2.7),
    ("joy", 2.8),
    ("hope", 1.9),
    ("peace", 2.5),
    ("beautiful", 2.9),
    ("strong", 2.3),
    ("safe", 1.9),
    ("trust", 2.3),
    ("friend", 2.2),
    ("smile", 1.5),
    ("laugh", 2.6),
    ("win", 2.8),
    ("victory", 2.9),
    ("kind", 2.4),
    ("gentle", 1.9),
    ("calm", 1.3),
    ("wise", 1.8),
    ("honor", 2.2),
    ("loyal", 2.1),
    ("glad", 2.0),
    ("warm", 0.9),
    ("free", 2.3),
    ("brave", 2.4),
    ("alive", 1.6),
    ("bad", -2.5),
    ("hate", -2.7),
    ("fear", -2.2),
    ("afraid", -2.0),
    ("death", -2.9),
    ("dead", -3.3),
    ("die", -2.9),
    ("kill", -3.7),
    ("killed", -3.5),
    ("pain", -2.3),
    ("hurt", -2.4),
    ("sad", -2.1),
    ("angry", -2.3),
    ("anger", -2.7),
    ("war", -2.9),
    ("enemy", -2.5),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("poison", -2.5),
    ("betray", -3.0),
    ("traitor", -2.8),
    ("terrible", -2.1),
    ("cruel", -2.8),
    ("weak", -1.9),
    ("cry", -2.1),
    ("lost", -1.3),
    ("attack", -2.1),
    ("trap", -1.3),
    ("threat", -2.4),
    ("worry", -1.9),
    ("despair", -3.0),
    ("violence", -3.1),
];

/// Sums word valences (with negation) and squashes the sum into `(-1, 1)`.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        LexiconScorer {
            lexicon: DEFAULT_LEXICON
                .iter()
                .map(|(w, v)| (w.to_string(), *v))
                .collect(),
        }
    }

    pub fn with_lexicon(lexicon: HashMap<String, f64>) -> Self {
        LexiconScorer {
            lexicon: lexicon
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        }
    }

    /// Loads a tab-separated lexicon whose first column is the word and second
    /// the mean valence (further columns are ignored). Unparseable lines are
    /// skipped with a warning.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => AnalysisError::io(path, source),
                kind => AnalysisError::invalid_input(format!("lexicon {path:?}: {kind:?}")),
            })?;

        let mut lexicon = HashMap::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let word = record.get(0).map(str::trim).unwrap_or_default();
            let valence = record.get(1).and_then(|v| v.trim().parse::<f64>().ok());
            match valence {
                Some(v) if !word.is_empty() && v.is_finite() => {
                    lexicon.insert(word.to_lowercase(), v);
                }
                _ => warn!("skipping lexicon line {} in {:?}", line + 1, path),
            }
        }
        if lexicon.is_empty() {
            return Err(AnalysisError::invalid_input(format!(
                "lexicon {path:?} has no usable entries"
            )));
        }
        Ok(LexiconScorer::with_lexicon(lexicon))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn valence_sum(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()));
            sum += if negated {
                valence * NEGATION_SCALAR
            } else {
                valence
            };
        }
        sum
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        LexiconScorer::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let sum = self.valence_sum(text);
        if sum == 0.0 {
            return 0.0;
        }
        sum / (sum * sum + ALPHA).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_polarity() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("What a great and beautiful day, full of joy") > 0.5);
        assert!(scorer.score("War, death and despair. The enemy will kill us.") < -0.5);
        assert_eq!(scorer.score("The ornithopter crossed the basin."), 0.0);
    }

    #[test]
    fn test_negation_flips_sign() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("This is good") > 0.0);
        assert!(scorer.score("This is not good") < 0.0);
        assert!(scorer.score("I didn't feel afraid") > 0.0);
        // Outside the window the negator has no effect.
        assert!(scorer.score("not one of the many good") > 0.0);
    }

    #[test]
    fn test_score_bounded() {
        let scorer = LexiconScorer::new();
        let very_positive = "love ".repeat(500);
        let very_negative = "kill ".repeat(500);
        let p = scorer.score(&very_positive);
        let n = scorer.score(&very_negative);
        assert!(p > 0.99 && p <= 1.0);
        assert!((-1.0..-0.99).contains(&n));
    }

    #[test]
    fn test_adapter_rejects_out_of_range() {
        assert_eq!(score_segment(&|_: &str| 0.25, "x").unwrap(), 0.25);
        assert!(score_segment(&|_: &str| 1.5, "x").unwrap_err().is_invalid_input());
        assert!(score_segment(&|_: &str| f64::NAN, "x").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_adapter_accepts_trait_object() {
        let scorer: Box<dyn SentimentScorer> = Box::new(LexiconScorer::new());
        let score = score_segment(scorer.as_ref(), "love").unwrap();
        assert!(score > 0.0);
    }

    #[test]
    fn test_lexicon_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Melange\t2.0\t0.5\t[2, 2, 2]").unwrap();
        writeln!(file, "harkonnen\t-3.0").unwrap();
        writeln!(file, "broken line without valence").unwrap();
        file.flush().unwrap();

        let scorer = LexiconScorer::from_file(file.path()).unwrap();
        assert_eq!(scorer.len(), 2);
        assert!(scorer.score("melange") > 0.0);
        assert!(scorer.score("Harkonnen") < 0.0);
    }

    #[test]
    fn test_lexicon_size() {
        let scorer = LexiconScorer::new();
        assert!(!scorer.is_empty());
        assert!(scorer.len() > 10);

        let empty = LexiconScorer::with_lexicon(HashMap::new());
        assert!(empty.is_empty());
        assert_eq!(empty.score("love"), 0.0);
    }

    #[test]
    fn test_lexicon_file_missing() {
        let err = LexiconScorer::from_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
