//! Surface statistics: word count, syllables, pronouns, word length.
//!
//! Tokens are `\b\w+\b` runs with case preserved. Syllables are approximated
//! by counting lowercase vowels, and pronouns match exact lowercase forms.

use serde::{Deserialize, Serialize};

use crate::text;

/// Vowels counted toward the syllable estimate.
pub const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Personal pronouns counted by [`score`].
pub const PERSONAL_PRONOUNS: &[&str] = &["i", "we", "my", "ours", "us"];

/// Surface statistics for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceScores {
    /// Total token count.
    pub word_count: usize,
    /// Sum of vowel characters across all tokens.
    pub syllable_count: usize,
    /// Tokens equal to one of [`PERSONAL_PRONOUNS`].
    pub personal_pronouns: usize,
    /// Mean token length in characters.
    pub avg_word_length: f64,
}

/// Compute surface statistics for `text`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn score(text: &str) -> SurfaceScores {
    let mut word_count = 0;
    let mut syllable_count = 0;
    let mut personal_pronouns = 0;
    let mut total_chars = 0;

    for token in text::word_tokens(text) {
        word_count += 1;
        total_chars += token.chars().count();
        syllable_count += token.chars().filter(|c| VOWELS.contains(c)).count();
        if PERSONAL_PRONOUNS.contains(&token) {
            personal_pronouns += 1;
        }
    }

    let avg_word_length = if word_count > 0 {
        total_chars as f64 / word_count as f64
    } else {
        0.0
    };

    SurfaceScores {
        word_count,
        syllable_count,
        personal_pronouns,
        avg_word_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_and_vowels() {
        let s = score("Hello world, banana!");
        assert_eq!(s.word_count, 3);
        // hello: e,o  world: o  banana: a,a,a
        assert_eq!(s.syllable_count, 6);
        assert!((s.avg_word_length - 16.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn uppercase_vowels_are_not_counted() {
        assert_eq!(score("AEIOU aeiou").syllable_count, 5);
    }

    #[test]
    fn pronouns_match_exact_lowercase_forms() {
        let s = score("we told us that my plan and ours won; I agreed but i said so");
        // we, us, my, ours, i  ("I" is capitalized and does not match)
        assert_eq!(s.personal_pronouns, 5);
    }

    #[test]
    fn pronoun_lookalikes_are_ignored() {
        assert_eq!(score("US us use myself weekly").personal_pronouns, 1);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(score(""), SurfaceScores::default());
        assert_eq!(score("?!").word_count, 0);
    }
}
