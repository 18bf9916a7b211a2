//! Reading time estimate

use lazy_static::lazy_static;
use regex::Regex;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 180;

lazy_static! {
    // ASCII only: accented letters split words, "perché" counts as "perch"
    static ref WORD: Regex = Regex::new(r"[A-Za-z0-9_]+").unwrap();
}

/// Count word tokens (runs of ASCII alphanumerics and underscores)
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Rough reading time label for a body of text
///
/// Only three shapes are produced: "Less than 1 minute read",
/// "1 minute read" and "N minute read" (never pluralized).
pub fn estimate_read_time(text: &str) -> String {
    read_time_label(count_words(text))
}

/// Reading time label for a known word count
pub fn read_time_label(words: usize) -> String {
    if words < WORDS_PER_MINUTE {
        "Less than 1 minute read".to_string()
    } else if words < WORDS_PER_MINUTE * 2 {
        "1 minute read".to_string()
    } else {
        let minutes = (words as f64 / WORDS_PER_MINUTE as f64).round() as usize;
        format!("{} minute read", minutes)
    }
}
