//! Stop-word and sentiment word lists.
//!
//! A [`Lexicon`] is loaded once per session from a directory holding three
//! plain-text files, one word per line:
//!
//! - `StopWords.txt`
//! - `positive-words.txt`
//! - `negative-words.txt`
//!
//! The encoding of each file is detected from its bytes, so Latin-1 and
//! UTF-16 lists load as readily as UTF-8 ones. Entries are trimmed and
//! lowercased; blank lines and `;` comment lines are skipped. A missing file
//! loads as an empty set.

use std::collections::HashSet;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::error::{LexiconError, LexiconResult};

/// File name of the stop-word list.
pub const STOP_WORDS_FILE: &str = "StopWords.txt";
/// File name of the positive-word list.
pub const POSITIVE_WORDS_FILE: &str = "positive-words.txt";
/// File name of the negative-word list.
pub const NEGATIVE_WORDS_FILE: &str = "negative-words.txt";

/// The word lists that drive sentiment scoring.
///
/// Every member is lowercase, trimmed, and non-empty. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    stop_words: HashSet<String>,
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Lexicon {
    /// Load the three word lists from `dir`.
    ///
    /// Missing files yield empty sets. A file that exists but cannot be read
    /// is an error.
    #[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> LexiconResult<Self> {
        let dir = dir.as_ref();
        let lexicon = Self {
            stop_words: load_list(&dir.join(STOP_WORDS_FILE))?,
            positive: load_list(&dir.join(POSITIVE_WORDS_FILE))?,
            negative: load_list(&dir.join(NEGATIVE_WORDS_FILE))?,
        };
        info!(
            stop_words = lexicon.stop_words.len(),
            positive = lexicon.positive.len(),
            negative = lexicon.negative.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Build a lexicon from in-memory word lists, normalizing each entry the
    /// same way [`Lexicon::load`] does.
    pub fn from_words<S, P, N>(stop_words: S, positive: P, negative: N) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            stop_words: normalize(stop_words),
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    /// Words excluded from sentiment counting.
    pub const fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    /// Words counted toward the positive score.
    pub const fn positive(&self) -> &HashSet<String> {
        &self.positive
    }

    /// Words counted toward the negative score.
    pub const fn negative(&self) -> &HashSet<String> {
        &self.negative
    }

    /// `true` if all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty() && self.positive.is_empty() && self.negative.is_empty()
    }
}

fn normalize<I>(words: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .filter_map(|w| normalize_entry(w.as_ref()))
        .collect()
}

fn normalize_entry(line: &str) -> Option<String> {
    let word = line.trim();
    if word.is_empty() || word.starts_with(';') {
        None
    } else {
        Some(word.to_lowercase())
    }
}

fn load_list(path: &Path) -> LexiconResult<HashSet<String>> {
    if !path.is_file() {
        debug!(path = %path.display(), "word list not found, using empty set");
        return Ok(HashSet::new());
    }
    let bytes = std::fs::read(path).map_err(|source| LexiconError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) = decode(&bytes);
    debug!(path = %path.display(), encoding = encoding.name(), "word list decoded");
    Ok(normalize(text.lines()))
}

/// Decode bytes using a byte-order mark if present, else a detected encoding.
fn decode(bytes: &[u8]) -> (String, &'static Encoding) {
    let encoding = Encoding::for_bom(bytes).map_or_else(
        || {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        },
        |(encoding, _)| encoding,
    );
    let (text, actual, _had_errors) = encoding.decode(bytes);
    (text.into_owned(), actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_and_normalizes_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(STOP_WORDS_FILE), "The\n  AND \n\nof\n").unwrap();
        fs::write(tmp.path().join(POSITIVE_WORDS_FILE), "Love\nGREAT\n").unwrap();
        fs::write(tmp.path().join(NEGATIVE_WORDS_FILE), "bad\n").unwrap();

        let lexicon = Lexicon::load(tmp.path()).unwrap();
        assert_eq!(lexicon.stop_words().len(), 3);
        assert!(lexicon.stop_words().contains("and"));
        assert!(lexicon.positive().contains("love"));
        assert!(lexicon.positive().contains("great"));
        assert!(lexicon.negative().contains("bad"));
    }

    #[test]
    fn missing_negative_file_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(STOP_WORDS_FILE), "the\n").unwrap();
        fs::write(tmp.path().join(POSITIVE_WORDS_FILE), "good\n").unwrap();

        let lexicon = Lexicon::load(tmp.path()).unwrap();
        assert!(lexicon.negative().is_empty());
        assert_eq!(lexicon.positive().len(), 1);
    }

    #[test]
    fn missing_directory_is_empty_lexicon() {
        let tmp = TempDir::new().unwrap();
        let lexicon = Lexicon::load(tmp.path().join("nope")).unwrap();
        assert!(lexicon.is_empty());
    }

    #[test]
    fn skips_comment_lines() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(POSITIVE_WORDS_FILE),
            ";;; opinion lexicon\n;\n\na+\nabound\n",
        )
        .unwrap();

        let lexicon = Lexicon::load(tmp.path()).unwrap();
        let mut words: Vec<_> = lexicon.positive().iter().cloned().collect();
        words.sort();
        assert_eq!(words, vec!["a+", "abound"]);
    }

    #[test]
    fn decodes_latin1_file() {
        let tmp = TempDir::new().unwrap();
        // windows-1252 bytes; 0xE9 is "é"
        let bytes = b"caf\xe9\nr\xe9sum\xe9\nsoir\xe9e\nd\xe9j\xe0 vu\n";
        fs::write(tmp.path().join(POSITIVE_WORDS_FILE), bytes).unwrap();

        let lexicon = Lexicon::load(tmp.path()).unwrap();
        assert!(lexicon.positive().contains("café"));
        assert!(lexicon.positive().contains("résumé"));
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let tmp = TempDir::new().unwrap();
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Happy\r\nJoy\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(tmp.path().join(POSITIVE_WORDS_FILE), bytes).unwrap();

        let lexicon = Lexicon::load(tmp.path()).unwrap();
        assert!(lexicon.positive().contains("happy"));
        assert!(lexicon.positive().contains("joy"));
    }

    #[test]
    fn from_words_applies_normalization() {
        let lexicon = Lexicon::from_words(["  The "], ["GOOD", ""], Vec::<String>::new());
        assert!(lexicon.stop_words().contains("the"));
        assert_eq!(lexicon.positive().len(), 1);
        assert!(lexicon.negative().is_empty());
    }
}
