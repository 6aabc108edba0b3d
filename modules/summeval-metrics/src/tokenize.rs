//! Word-level tokenization shared by the ROUGE and BLEU scorers.

use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Lower-casing word tokenizer.
///
/// Segments on Unicode word boundaries (UAX #29), then splits each segment
/// again on any character that is not alphanumeric, `_`, or a combining
/// mark. "don't" becomes `don`, `t` and "3.14" becomes `3`, `14`, while
/// words with diacritics ("người", "tiếng") stay whole in both composed and
/// decomposed form. Pieces without an alphanumeric character are dropped.
///
/// The tokenizer holds no state; copies are free and it is safe to share
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .unicode_words()
            .flat_map(|segment| segment.split(|c: char| !is_word_char(c)))
            .filter(|piece| piece.chars().any(char::is_alphanumeric))
            .map(str::to_string)
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || is_combining_mark(c)
}

/// Tokenize with the default [`WordTokenizer`].
pub fn tokenize(text: &str) -> Vec<String> {
    WordTokenizer.tokenize(text)
}
