//! Text statistics.
//!
//! Everything here is pure: the same input always yields the same
//! [`TextStatistics`].

use crate::models::TextStatistics;
use once_cell::sync::Lazy;
use regex::Regex;

/// Average adult silent reading speed used for `readingTimeMinutes`.
pub const WORDS_PER_MINUTE: f64 = 200.0;

static SENTENCE_TERMINATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence terminator pattern is valid"));

/// Computes statistics for `text`.
///
/// Callers reject empty input before getting here; whitespace-only input is
/// still analysed and simply has no words.
pub fn analyze(text: &str) -> TextStatistics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let character_count = text.chars().count();
    // Only the ASCII space is excluded; tabs and newlines still count.
    let character_count_no_spaces = text.chars().filter(|c| *c != ' ').count();

    let sentence_count = SENTENCE_TERMINATORS.find_iter(text).count().max(1);
    let paragraph_count = text
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .count();

    let average_word_length = if word_count > 0 {
        round1(character_count_no_spaces as f64 / word_count as f64)
    } else {
        0.0
    };

    TextStatistics {
        word_count: word_count as i64,
        character_count: character_count as i64,
        character_count_no_spaces: character_count_no_spaces as i64,
        sentence_count: sentence_count as i64,
        paragraph_count: paragraph_count as i64,
        average_word_length,
        longest_word: longest_word(&words).to_string(),
        reading_time_minutes: round1(word_count as f64 / WORDS_PER_MINUTE),
    }
}

/// First word with the greatest number of characters.
fn longest_word<'a>(words: &[&'a str]) -> &'a str {
    let mut longest = "";
    let mut longest_len = 0;
    for &word in words {
        let len = word.chars().count();
        if len > longest_len {
            longest = word;
            longest_len = len;
        }
    }
    longest
}

/// Nearest tenth of the exact float value, exact ties to even.
///
/// Decimal formatting already rounds this way, so `0.25` gives `0.2` and
/// `0.15` (stored just below .15) gives `0.1`.
fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
