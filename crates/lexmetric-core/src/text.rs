//! Tokenization helpers shared by the scorers.
//!
//! Two word tokenizers live here on purpose:
//!
//! - [`word_tokens`] matches `\b\w+\b` runs and drives the sentiment and
//!   surface scorers.
//! - [`treebank_tokens`] splits one sentence Penn Treebank style: punctuation
//!   marks are tokens of their own and contractions are split (`do` + `n't`).
//!   The readability scorer counts these tokens as words.
//!
//! [`split_sentences`] is a punctuation-driven heuristic, not a parser.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Word-boundary token pattern.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Regex for decimal numbers (3.14, 2.5, etc.).
static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+$").expect("valid regex"));

/// Regex for URLs and email addresses at the end of a sentence fragment.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:https?://|www\.)\S+|\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+)\.?$")
        .expect("valid regex")
});

/// Regex for initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]\.)+[A-Z]?$").expect("valid regex"));

/// Abbreviations whose trailing period does not end a sentence.
static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "rev", "sr", "jr", "st", "gen", "col", "capt", "lt",
        "sgt", "gov", "sen", "rep", "pres", "etc", "vs", "e.g", "i.e", "cf", "al", "approx",
        "inc", "ltd", "co", "corp", "dept", "univ", "est", "no", "vol", "fig", "jan", "feb",
        "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "a.m", "p.m",
        "u.s", "u.k", "mt", "ave", "blvd", "rd",
    ]
    .into_iter()
    .collect()
});

/// Treebank rules applied to the raw sentence: quotes, punctuation, brackets.
static PUNCTUATION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_rules(&[
        (r#"^""#, "``"),
        (r"(``)", " $1 "),
        (r#"([ (\[{<])("|'')"#, "$1 `` "),
        (r"([:,])([^\d])", " $1 $2"),
        (r"([:,])$", " $1 "),
        (r"\.\.\.", " ... "),
        (r"[;@#$%&]", " $0 "),
        // Only the sentence-final period is split off.
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "$1 $2$3 "),
        (r"[?!]", " $0 "),
        (r"([^'])' ", "$1 ' "),
        (r"[\]\[(){}<>]", " $0 "),
        (r"--", " -- "),
    ])
});

/// Treebank rules applied after space padding: closing quotes and clitics.
static CLITIC_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_rules(&[
        (r#"""#, " '' "),
        (r"(\S)('')", "$1 $2 "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "$1 $2 "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "$1 $2 "),
        (r"(?i)\b(can)(not)\b", " $1 $2 "),
        (r"(?i)\b(d)('ye)\b", " $1 $2 "),
        (r"(?i)\b(gim)(me)\b", " $1 $2 "),
        (r"(?i)\b(gon)(na)\b", " $1 $2 "),
        (r"(?i)\b(got)(ta)\b", " $1 $2 "),
        (r"(?i)\b(lem)(me)\b", " $1 $2 "),
        (r"(?i)\b(more)('n)\b", " $1 $2 "),
        (r"(?i)\b(wan)(na)\s", " $1 $2 "),
        (r"(?i) ('t)(is)\b", " $1 $2 "),
        (r"(?i) ('t)(was)\b", " $1 $2 "),
    ])
});

fn compile_rules(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|&(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
        .collect()
}

/// Sentence fragments shorter than this (in bytes, trimmed) are dropped.
const MIN_SENTENCE_LEN: usize = 2;

/// Iterate over `\b\w+\b` tokens in `text`, case preserved.
pub fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Tokenize one sentence Penn Treebank style.
///
/// Commas, colons, brackets, `?`, `!`, `--`, `...` and the sentence-final
/// period become separate tokens; periods inside the sentence stay attached
/// (`Dr.`, `3.14`). Opening double quotes become ```` `` ```` and closing ones
/// `''`. Contractions are split into stem and clitic: `can't` gives `ca` and
/// `n't`, `it's` gives `it` and `'s`.
pub fn treebank_tokens(sentence: &str) -> Vec<String> {
    let mut text = sentence.to_string();
    for (pattern, replacement) in PUNCTUATION_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    text = format!(" {text} ");
    for (pattern, replacement) in CLITIC_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    text.split_whitespace().map(String::from).collect()
}

/// Split text into sentences.
///
/// `.`, `!` and `?` end a sentence unless the period belongs to an
/// abbreviation, an initial, a decimal number, an ellipsis, or a URL/email
/// address. Line breaks are ordinary whitespace: a paragraph without final
/// punctuation runs on into the next one.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);
        let ends = match ch {
            '.' | '!' | '?' => is_boundary(&chars, i, &current),
            c if is_closer(c) && i > 0 && is_terminator(chars[i - 1]) => {
                next_visible(&chars, i).is_none_or(|c| !c.is_lowercase())
            }
            _ => false,
        };
        if ends {
            push_sentence(&mut current, &mut sentences);
        }
    }
    push_sentence(&mut current, &mut sentences);
    sentences
}

fn push_sentence(current: &mut String, out: &mut Vec<String>) {
    let sentence = current.trim();
    if sentence.len() >= MIN_SENTENCE_LEN && sentence.chars().any(char::is_alphanumeric) {
        out.push(sentence.to_string());
    }
    current.clear();
}

const fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Closing quotes and brackets stay attached to the sentence they close.
const fn is_closer(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

/// First non-whitespace character after `pos`.
fn next_visible(chars: &[char], pos: usize) -> Option<char> {
    chars[pos + 1..].iter().find(|c| !c.is_whitespace()).copied()
}

fn is_boundary(chars: &[char], pos: usize, current: &str) -> bool {
    // Runs of terminators ("?!", "...") end at the last one; a closer
    // right after the terminator ends the sentence instead.
    if chars
        .get(pos + 1)
        .is_some_and(|&c| is_terminator(c) || is_closer(c))
    {
        return false;
    }

    let Some(next) = next_visible(chars, pos) else {
        return true;
    };

    if chars[pos] != '.' {
        return true;
    }

    if current.ends_with("...") {
        return false;
    }

    let before = word_before(chars, pos);
    if is_abbreviation(&before) || INITIALS_PATTERN.is_match(&before) {
        return false;
    }

    // "3.14": period between digits.
    if next.is_ascii_digit() && before.chars().last().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    if DECIMAL_PATTERN.is_match(current.trim_end_matches('.')) && next.is_ascii_digit() {
        return false;
    }

    // A period directly followed by a non-space is part of a token ("example.com").
    if chars.get(pos + 1).is_some_and(|c| !c.is_whitespace()) {
        return false;
    }

    if LINK_PATTERN.is_match(current) {
        return false;
    }

    !next.is_lowercase()
}

/// The word (letters, digits and inner periods) ending just before `pos`.
fn word_before(chars: &[char], pos: usize) -> String {
    let start = chars[..pos]
        .iter()
        .rposition(|c| !(c.is_alphanumeric() || *c == '.'))
        .map_or(0, |i| i + 1);
    chars[start..pos].iter().collect()
}

fn is_abbreviation(word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let lower = word.trim_end_matches('.').to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }
    // Single uppercase letter = initial.
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}
