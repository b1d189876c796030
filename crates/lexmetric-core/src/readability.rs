//! Readability scoring using the Gunning fog index.
//!
//! Formula: `0.4 * (words/sentences + complex_words/words)`
//!
//! Words are the Penn Treebank tokens of each sentence, so punctuation marks
//! and clitics (`n't`, `'s`) count toward the word total. A word counts as
//! complex when it is longer than six characters. This is a length proxy, not
//! a syllable test, and is kept fixed so scores stay comparable across runs.

use serde::{Deserialize, Serialize};

use crate::text;

/// Words with at least this many characters are complex.
pub const COMPLEX_WORD_MIN_CHARS: usize = 7;

/// Readability scores for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScores {
    /// Gunning fog index.
    pub fog_index: f64,
    /// Mean words per sentence.
    pub avg_sentence_length: f64,
    /// Words of [`COMPLEX_WORD_MIN_CHARS`] characters or more.
    pub complex_words: usize,
    /// `complex_words / words` as a fraction.
    pub percentage_complex: f64,
    /// Number of sentences detected.
    pub sentences: usize,
    /// Number of word tokens detected, punctuation included.
    pub words: usize,
}

/// Score readability of `text`.
///
/// Empty or punctuation-only text scores zero everywhere.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn score(text: &str) -> ReadabilityScores {
    let sentence_list = text::split_sentences(text);
    let sentences = sentence_list.len();
    let word_list: Vec<String> = sentence_list
        .iter()
        .flat_map(|sentence| text::treebank_tokens(sentence))
        .collect();
    let words = word_list.len();
    let complex_words = word_list
        .iter()
        .filter(|w| w.chars().count() >= COMPLEX_WORD_MIN_CHARS)
        .count();

    let avg_sentence_length = if sentences > 0 {
        words as f64 / sentences as f64
    } else {
        0.0
    };
    let percentage_complex = if words > 0 {
        complex_words as f64 / words as f64
    } else {
        0.0
    };

    ReadabilityScores {
        fog_index: 0.4 * (avg_sentence_length + percentage_complex),
        avg_sentence_length,
        complex_words,
        percentage_complex,
        sentences,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_readability() {
        let s = score("The cat sat on the mat. The dog ran fast.");
        assert_eq!(s.sentences, 2);
        assert_eq!(s.words, 12);
        assert_eq!(s.complex_words, 0);
        assert!((s.avg_sentence_length - 6.0).abs() < f64::EPSILON);
        assert!((s.fog_index - 2.4).abs() < 1e-9);
    }

    #[test]
    fn punctuation_counts_as_words() {
        let s = score("I love this. This is great and wonderful.");
        assert_eq!(s.sentences, 2);
        assert_eq!(s.words, 10);
        assert_eq!(s.complex_words, 1);
        assert!((s.avg_sentence_length - 5.0).abs() < 1e-9);
        assert!((s.fog_index - 2.04).abs() < 1e-9);
    }

    #[test]
    fn contractions_split_into_two_words() {
        let s = score("I can't go. It's late.");
        assert_eq!(s.sentences, 2);
        // I ca n't go . / It 's late .
        assert_eq!(s.words, 9);
    }

    #[test]
    fn unpunctuated_paragraph_joins_the_next_sentence() {
        let s = score("First line without a period\nSecond line.");
        assert_eq!(s.sentences, 1);
        assert_eq!(s.words, 8);
        assert!((s.avg_sentence_length - 8.0).abs() < 1e-9);
    }

    #[test]
    fn complex_words_by_length() {
        // "wonderful" (9) and "amazing" (7) are complex; "simple" (6) is not.
        let s = score("A wonderful, amazing, simple day.");
        assert_eq!(s.words, 8);
        assert_eq!(s.complex_words, 2);
        assert!((s.percentage_complex - 0.25).abs() < 1e-9);
        assert!((s.fog_index - 0.4 * (8.0 + 0.25)).abs() < 1e-9);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(score(""), ReadabilityScores::default());
        assert_eq!(score("  \n\n  "), ReadabilityScores::default());
    }

    #[test]
    fn punctuation_only_scores_zero() {
        let s = score("... !!! ???");
        assert_eq!(s.words, 0);
        assert_eq!(s.sentences, 0);
        assert!(s.fog_index.abs() < f64::EPSILON);
    }

    #[test]
    fn longer_sentences_raise_the_index() {
        let short = score("We ran. We hid. We won.");
        let long = score(
            "The comprehensive organizational restructuring initiative necessitated \
             interdepartmental communication protocols throughout the enterprise.",
        );
        assert!(long.fog_index > short.fog_index);
    }
}
