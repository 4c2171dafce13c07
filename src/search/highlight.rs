use html_escape::encode_text;
use regex::RegexBuilder;
use std::ops::Range;

/// Byte ranges of `text` matched by any term, case-insensitively.
///
/// Longer terms claim text first so "prompting" isn't split by "prompt";
/// a shorter term never marks text inside an earlier match. Ranges are
/// returned sorted by start.
pub fn match_ranges(text: &str, terms: &[String]) -> Vec<Range<usize>> {
    let mut sorted: Vec<&str> = terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();

    let mut ranges: Vec<Range<usize>> = Vec::new();
    for term in sorted {
        let Ok(pattern) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        for m in pattern.find_iter(text) {
            let overlaps = ranges
                .iter()
                .any(|r| m.start() < r.end && r.start < m.end());
            if !overlaps {
                ranges.push(m.range());
            }
        }
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Escapes `text` for HTML and wraps every matched term in `<mark>`.
pub fn highlight_matches(text: &str, terms: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for range in match_ranges(text, terms) {
        out.push_str(&encode_text(&text[cursor..range.start]));
        out.push_str("<mark>");
        out.push_str(&encode_text(&text[range.clone()]));
        out.push_str("</mark>");
        cursor = range.end;
    }
    out.push_str(&encode_text(&text[cursor..]));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_marks_case_insensitively() {
        assert_eq!(
            highlight_matches("Using AI for ai notes", &terms(&["ai"])),
            "Using <mark>AI</mark> for <mark>ai</mark> notes"
        );
    }

    #[test]
    fn test_longer_terms_win() {
        assert_eq!(
            highlight_matches("Prompting basics", &terms(&["prompt", "prompting"])),
            "<mark>Prompting</mark> basics"
        );
    }

    #[test]
    fn test_partial_matches_marked() {
        assert_eq!(
            highlight_matches("Chatbots", &terms(&["chat"])),
            "<mark>Chat</mark>bots"
        );
    }

    #[test]
    fn test_no_terms_only_escapes() {
        assert_eq!(highlight_matches("a < b & c", &[]), "a &lt; b &amp; c");
    }

    #[test]
    fn test_quotes_left_alone_in_text() {
        assert_eq!(
            highlight_matches("\"AI\" & 'ML'", &terms(&["ai"])),
            "\"<mark>AI</mark>\" &amp; 'ML'"
        );
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        assert_eq!(
            highlight_matches("<b>AI</b>", &terms(&["ai"])),
            "&lt;b&gt;<mark>AI</mark>&lt;/b&gt;"
        );
    }

    #[test]
    fn test_ranges_sorted_and_disjoint() {
        let ranges = match_ranges("ai tools and ai", &terms(&["ai", "tools"]));
        assert_eq!(ranges, vec![0..2, 3..8, 13..15]);
    }
}
