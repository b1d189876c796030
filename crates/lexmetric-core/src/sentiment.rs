//! Lexicon-based sentiment scoring.
//!
//! Polarity: `(pos - neg) / (pos + neg + ε)`, bounded in (-1, 1).
//! Subjectivity: `(pos + neg) / (non-stop tokens + ε)`, bounded in [0, 1).

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::text;

/// Keeps both ratios finite when no tokens or sentiment words are found.
pub const EPSILON: f64 = 1e-6;

/// Sentiment scores for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    /// Non-stop tokens found in the positive list.
    pub positive_score: usize,
    /// Non-stop tokens found in the negative list.
    pub negative_score: usize,
    /// Net sentiment in (-1, 1).
    pub polarity_score: f64,
    /// Share of non-stop tokens that carry sentiment.
    pub subjectivity_score: f64,
    /// Tokens left after stop-word removal.
    pub filtered_tokens: usize,
}

/// Score the sentiment of `text` against `lexicon`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn score(text: &str, lexicon: &Lexicon) -> SentimentScores {
    let lowered = text.to_lowercase();

    let mut filtered_tokens = 0;
    let mut positive_score = 0;
    let mut negative_score = 0;
    for token in text::word_tokens(&lowered) {
        if lexicon.stop_words().contains(token) {
            continue;
        }
        filtered_tokens += 1;
        if lexicon.positive().contains(token) {
            positive_score += 1;
        }
        if lexicon.negative().contains(token) {
            negative_score += 1;
        }
    }

    let pos = positive_score as f64;
    let neg = negative_score as f64;
    SentimentScores {
        positive_score,
        negative_score,
        polarity_score: (pos - neg) / (pos + neg + EPSILON),
        subjectivity_score: (pos + neg) / (filtered_tokens as f64 + EPSILON),
        filtered_tokens,
    }
}
