use regex::Regex;

use crate::models::{OfflineScore, SearchResult};
use crate::search::tokenizer::strip_punctuation;

/// Points per occurrence of a term, by field and match class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub title_full: f64,
    pub title_partial: f64,
    pub metadata_full: f64,
    pub metadata_partial: f64,
    pub summary_full: f64,
    pub summary_partial: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title_full: 5.0,
            title_partial: 2.0,
            metadata_full: 3.0,
            metadata_partial: 1.5,
            summary_full: 2.0,
            summary_partial: 1.0,
        }
    }
}

/// Occurrences of one term in one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermFrequency {
    /// Occurrences bounded by word boundaries
    pub full_word: usize,
    /// Occurrences inside a longer word
    pub partial: usize,
}

impl TermFrequency {
    pub fn total(&self) -> usize {
        self.full_word + self.partial
    }

    fn weighted(&self, full: f64, partial: f64) -> f64 {
        self.full_word as f64 * full + self.partial as f64 * partial
    }
}

/// Per-field breakdown of a single term's contribution to a result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermScore {
    pub title: TermFrequency,
    pub summary: TermFrequency,
    pub metadata: TermFrequency,
    pub title_score: f64,
    pub summary_score: f64,
    pub metadata_score: f64,
}

impl TermScore {
    pub fn total(&self) -> f64 {
        self.title_score + self.summary_score + self.metadata_score
    }

    pub fn has_match(&self) -> bool {
        self.total() > 0.0
    }
}

/// A query term with its word-boundary pattern compiled once per query.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    full_word: Option<Regex>,
}

impl TermMatcher {
    pub fn new(term: &str) -> Self {
        let term = term.to_lowercase();
        let full_word = if term.is_empty() {
            None
        } else {
            Regex::new(&format!(r"\b{}\b", regex::escape(&term))).ok()
        };
        Self { term, full_word }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Counts occurrences in text already passed through [`normalize_field`].
    pub fn count(&self, normalized: &str) -> TermFrequency {
        let Some(full_word) = &self.full_word else {
            return TermFrequency::default();
        };
        let all = normalized.matches(self.term.as_str()).count();
        let full = full_word.find_iter(normalized).count();
        TermFrequency {
            full_word: full,
            partial: all.saturating_sub(full),
        }
    }
}

/// Lowercases and replaces punctuation with spaces so that word boundaries
/// only fall between ASCII word characters and whitespace.
pub fn normalize_field(text: &str) -> String {
    strip_punctuation(&text.to_lowercase())
}

/// Counts full-word and partial occurrences of `term` in `text`.
pub fn count_term_frequency(text: &str, term: &str) -> TermFrequency {
    TermMatcher::new(term).count(&normalize_field(text))
}

/// The three scored fields of a result, normalized once.
struct ScoringFields {
    title: String,
    summary: String,
    metadata: String,
    doc_length: usize,
}

impl ScoringFields {
    fn of(result: &SearchResult) -> Self {
        let metadata = result.tags.metadata_text();
        let doc_length =
            result.title.chars().count() + result.summary.chars().count() + metadata.chars().count();
        Self {
            title: normalize_field(&result.title),
            summary: normalize_field(&result.summary),
            metadata: normalize_field(&metadata),
            doc_length,
        }
    }

    fn score(&self, matcher: &TermMatcher, weights: &FieldWeights) -> TermScore {
        let title = matcher.count(&self.title);
        let summary = matcher.count(&self.summary);
        let metadata = matcher.count(&self.metadata);
        TermScore {
            title,
            summary,
            metadata,
            title_score: title.weighted(weights.title_full, weights.title_partial),
            summary_score: summary.weighted(weights.summary_full, weights.summary_partial),
            metadata_score: metadata.weighted(weights.metadata_full, weights.metadata_partial),
        }
    }
}

/// Breakdown of one term's contribution to one result.
pub fn score_term(result: &SearchResult, term: &str, weights: &FieldWeights) -> TermScore {
    ScoringFields::of(result).score(&TermMatcher::new(term), weights)
}

fn score_with_matchers(
    result: &SearchResult,
    matchers: &[TermMatcher],
    weights: &FieldWeights,
) -> Option<OfflineScore> {
    let fields = ScoringFields::of(result);
    let mut raw_score = 0.0;
    let mut matched_terms = Vec::new();

    for matcher in matchers {
        let term_score = fields.score(matcher, weights);
        if term_score.has_match() {
            raw_score += term_score.total();
            matched_terms.push(matcher.term().to_string());
        }
    }

    if matched_terms.is_empty() {
        return None;
    }

    let offline_score = if fields.doc_length > 0 {
        raw_score / fields.doc_length as f64 * 1000.0
    } else {
        0.0
    };

    Some(OfflineScore {
        offline_score,
        raw_score,
        matched_terms,
        doc_length: fields.doc_length,
    })
}

/// Scores a single result, or `None` when no term matched.
pub fn score_result(
    result: &SearchResult,
    terms: &[String],
    weights: &FieldWeights,
) -> Option<OfflineScore> {
    let matchers: Vec<TermMatcher> = terms.iter().map(|t| TermMatcher::new(t)).collect();
    score_with_matchers(result, &matchers, weights)
}

/// Scores every result against the query terms.
///
/// Pipeline:
/// 1. Score each term in title, metadata and summary (full word and partial).
/// 2. Sum the contributions of matched terms into `raw_score`.
/// 3. Normalize per 1000 characters of document so long articles don't win on volume.
/// 4. Drop results with no matched term and sort by `offline_score`, highest first.
///
/// An empty term list matches nothing. The sort is stable, so equal scores
/// keep their input order.
pub fn score_results(
    results: &[SearchResult],
    terms: &[String],
    weights: &FieldWeights,
) -> Vec<SearchResult> {
    if terms.is_empty() || results.is_empty() {
        return Vec::new();
    }

    let matchers: Vec<TermMatcher> = terms.iter().map(|t| TermMatcher::new(t)).collect();

    let mut scored: Vec<SearchResult> = results
        .iter()
        .filter_map(|result| {
            score_with_matchers(result, &matchers, weights).map(|offline| SearchResult {
                offline: Some(offline),
                ..result.clone()
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.offline_score()
            .partial_cmp(&a.offline_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, result) in scored.iter().take(3).enumerate() {
        if let Some(offline) = &result.offline {
            tracing::debug!(
                "  {}. \"{}\" (score: {:.2}, raw: {}, terms: {:?})",
                i + 1,
                result.title,
                offline.offline_score,
                offline.raw_score,
                offline.matched_terms
            );
        }
    }

    scored
}
