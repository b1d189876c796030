//! The per-document metrics record.
//!
//! [`analyze_text`] runs the sentiment, readability, and surface scorers over
//! one text and merges their output into a [`MetricsRecord`]. Serialized
//! field names are the column headers used in result tables.

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::{readability, sentiment, surface};

/// All metrics for one successfully analyzed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Non-stop tokens found in the positive list.
    #[serde(rename = "Positive Score")]
    pub positive_score: usize,
    /// Non-stop tokens found in the negative list.
    #[serde(rename = "Negative Score")]
    pub negative_score: usize,
    /// Net sentiment in (-1, 1).
    #[serde(rename = "Polarity Score")]
    pub polarity_score: f64,
    /// Share of non-stop tokens that carry sentiment.
    #[serde(rename = "Subjectivity Score")]
    pub subjectivity_score: f64,
    /// Gunning fog index.
    #[serde(rename = "Fog Index")]
    pub fog_index: f64,
    /// Mean words per sentence.
    #[serde(rename = "Average Sentence Length")]
    pub avg_sentence_length: f64,
    /// Words longer than six characters.
    #[serde(rename = "Complex Word Count")]
    pub complex_words: usize,
    /// Word-boundary token count.
    #[serde(rename = "Word Count")]
    pub word_count: usize,
    /// Vowel-count syllable estimate.
    #[serde(rename = "Syllable Count")]
    pub syllable_count: usize,
    /// Personal pronoun count.
    #[serde(rename = "Personal Pronouns")]
    pub personal_pronouns: usize,
    /// Mean token length in characters.
    #[serde(rename = "Average Word Length")]
    pub avg_word_length: f64,
}

/// Column headers for a [`MetricsRecord`], in field order.
pub const COLUMNS: [&str; 11] = [
    "Positive Score",
    "Negative Score",
    "Polarity Score",
    "Subjectivity Score",
    "Fog Index",
    "Average Sentence Length",
    "Complex Word Count",
    "Word Count",
    "Syllable Count",
    "Personal Pronouns",
    "Average Word Length",
];

/// A single metric value, keeping counts and ratios apart for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// An integer count.
    Count(usize),
    /// A ratio or average.
    Ratio(f64),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Ratio(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
        }
    }
}

impl MetricsRecord {
    /// Merge the three scorer outputs into one record.
    pub const fn from_scores(
        sentiment: &sentiment::SentimentScores,
        readability: &readability::ReadabilityScores,
        surface: &surface::SurfaceScores,
    ) -> Self {
        Self {
            positive_score: sentiment.positive_score,
            negative_score: sentiment.negative_score,
            polarity_score: sentiment.polarity_score,
            subjectivity_score: sentiment.subjectivity_score,
            fog_index: readability.fog_index,
            avg_sentence_length: readability.avg_sentence_length,
            complex_words: readability.complex_words,
            word_count: surface.word_count,
            syllable_count: surface.syllable_count,
            personal_pronouns: surface.personal_pronouns,
            avg_word_length: surface.avg_word_length,
        }
    }

    /// `(column, value)` pairs in [`COLUMNS`] order.
    pub const fn fields(&self) -> [(&'static str, MetricValue); 11] {
        use MetricValue::{Count, Ratio};
        [
            (COLUMNS[0], Count(self.positive_score)),
            (COLUMNS[1], Count(self.negative_score)),
            (COLUMNS[2], Ratio(self.polarity_score)),
            (COLUMNS[3], Ratio(self.subjectivity_score)),
            (COLUMNS[4], Ratio(self.fog_index)),
            (COLUMNS[5], Ratio(self.avg_sentence_length)),
            (COLUMNS[6], Count(self.complex_words)),
            (COLUMNS[7], Count(self.word_count)),
            (COLUMNS[8], Count(self.syllable_count)),
            (COLUMNS[9], Count(self.personal_pronouns)),
            (COLUMNS[10], Ratio(self.avg_word_length)),
        ]
    }
}

/// Score `text` with every scorer and return the merged record.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn analyze_text(text: &str, lexicon: &Lexicon) -> MetricsRecord {
    let sentiment = sentiment::score(text, lexicon);
    let readability = readability::score(text);
    let surface = surface::score(text);
    tracing::debug!(
        filtered_tokens = sentiment.filtered_tokens,
        sentences = readability.sentences,
        words = surface.word_count,
        "text scored"
    );
    MetricsRecord::from_scores(&sentiment, &readability, &surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_all_zero() {
        let lexicon = Lexicon::from_words(["the"], ["good"], ["bad"]);
        assert_eq!(analyze_text("", &lexicon), MetricsRecord::default());
    }

    #[test]
    fn merges_all_scorers() {
        let lexicon = Lexicon::from_words(
            Vec::<&str>::new(),
            ["love", "great", "wonderful"],
            Vec::<&str>::new(),
        );
        let record = analyze_text("I love this. This is great and wonderful.", &lexicon);

        assert_eq!(record.positive_score, 3);
        assert_eq!(record.negative_score, 0);
        assert_eq!(record.word_count, 8);
        assert_eq!(record.complex_words, 1);
        assert_eq!(record.personal_pronouns, 0);
        assert!((record.avg_sentence_length - 5.0).abs() < 1e-9);
        assert!((record.fog_index - 2.04).abs() < 1e-9);
        assert!((record.subjectivity_score - 3.0 / (8.0 + sentiment::EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn serializes_with_column_names() {
        let json = serde_json::to_value(MetricsRecord::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), COLUMNS.len());
        for column in COLUMNS {
            assert!(object.contains_key(column), "missing {column}");
        }
    }

    #[test]
    fn fields_follow_column_order() {
        let record = MetricsRecord {
            word_count: 42,
            fog_index: 1.5,
            ..MetricsRecord::default()
        };
        let fields = record.fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, COLUMNS);
        assert_eq!(fields[7].1, MetricValue::Count(42));
        assert_eq!(format!("{:.2}", fields[4].1), "1.50");
    }
}
