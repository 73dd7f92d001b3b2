//! Pluggable text polarity scoring
//!
//! The aggregation pipeline only needs `score(text) -> [-1, 1]`; anything
//! satisfying [`SentimentScorer`] can slot in (a model-backed scorer in
//! production, a stub in tests). [`LexiconScorer`] is the built-in
//! deterministic implementation: mean valence of a sports/betting word
//! list over all tokens in the text.

use std::collections::HashMap;

/// Scores a single text's polarity in [-1, 1]
pub trait SentimentScorer: Send {
    fn score(&self, text: &str) -> f64;
}

/// Word-valence scorer over a fixed sports/betting lexicon.
///
/// The text is lowercased, stripped of punctuation and whitespace-split;
/// the score is the sum of matched token valences divided by the total
/// token count, so longer neutral texts dilute toward zero. Texts with no
/// tokens score exactly 0.0.
pub struct LexiconScorer {
    valences: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        let entries: &[(&str, f64)] = &[
            // favorable
            ("amazing", 0.9),
            ("unstoppable", 0.9),
            ("great", 0.8),
            ("excellent", 0.8),
            ("dominant", 0.8),
            ("elite", 0.8),
            ("clutch", 0.7),
            ("beast", 0.7),
            ("fire", 0.7),
            ("win", 0.6),
            ("wins", 0.6),
            ("won", 0.6),
            ("winning", 0.6),
            ("strong", 0.6),
            ("hot", 0.5),
            ("healthy", 0.5),
            ("comeback", 0.5),
            ("confident", 0.5),
            ("streak", 0.4),
            // unfavorable
            ("terrible", -0.9),
            ("awful", -0.8),
            ("choke", -0.8),
            ("choked", -0.8),
            ("injury", -0.7),
            ("injured", -0.7),
            ("bust", -0.7),
            ("loss", -0.6),
            ("losses", -0.6),
            ("lost", -0.6),
            ("losing", -0.6),
            ("slump", -0.6),
            ("struggling", -0.6),
            ("benched", -0.5),
            ("weak", -0.5),
            ("doubtful", -0.5),
            ("cold", -0.4),
            ("questionable", -0.3),
        ];
        Self {
            valences: entries.iter().copied().collect(),
        }
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }
        let sum: f64 = tokens
            .iter()
            .filter_map(|t| self.valences.get(t.as_str()))
            .sum();
        sum / tokens.len() as f64
    }
}

/// Lowercase, strip punctuation, split on whitespace.
///
/// Shared by the scorer and key-phrase extraction so both see the same
/// token stream.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
