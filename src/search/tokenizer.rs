use std::collections::HashSet;
use std::sync::LazyLock;

/// Funnelback noise words, dropped from queries unless written as an acronym.
pub const NOISE_WORDS: &[&str] = &[
    "a", "au", "all", "am", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by",
    "can", "cant", "co", "com", "de", "do", "eg", "else", "etc", "for", "from", "get", "go",
    "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hers", "him", "his", "how",
    "http", "https", "i", "ie", "if", "in", "is", "it", "its", "la", "me", "my", "nor", "not",
    "now", "of", "off", "on", "or", "our", "ours", "pm", "put", "re", "she", "so", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "thus",
    "to", "too", "uk", "un", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "when", "where", "which", "while", "who", "why", "www", "you", "your",
    "yours",
];

static NOISE_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NOISE_WORDS.iter().copied().collect());

pub fn is_noise_word(word: &str) -> bool {
    NOISE_WORD_SET.contains(word)
}

/// Word characters are ASCII letters, digits and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces everything that is neither a word character nor whitespace with a space.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_word_char(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// An all-caps word of two or more characters, e.g. "AI" or "IT".
fn is_acronym(word: &str) -> bool {
    word.chars().count() >= 2 && word == word.to_uppercase()
}

/// Splits a query into lowercase search terms.
///
/// Order is preserved and repeated words are kept, so "ai ai" scores the
/// term twice. Noise words are dropped unless written as an acronym, which
/// keeps "IT" in "IT security" while "it" in "what is it" disappears.
pub fn tokenize_query(query: &str) -> Vec<String> {
    strip_punctuation(query)
        .split_whitespace()
        .filter(|word| !is_noise_word(&word.to_lowercase()) || is_acronym(word))
        .map(str::to_lowercase)
        .collect()
}
