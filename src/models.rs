use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::config::Environment;
use crate::search::applied::AppliedFilter;
use crate::search::highlight::highlight_matches;
use crate::search::pagination::PageItem;

/// Categorical tags attached to a knowledge-base article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    pub work_area: Vec<String>,
    pub roles: Vec<String>,
    pub benefits: Vec<String>,
}

impl Tags {
    /// All tag values joined with single spaces, in work area, roles, benefits order.
    pub fn metadata_text(&self) -> String {
        self.work_area
            .iter()
            .chain(self.roles.iter())
            .chain(self.benefits.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Annotation attached by the offline scorer for a single query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflineScore {
    /// `raw_score` per 1000 characters of document
    pub offline_score: f64,
    pub raw_score: f64,
    /// Query terms that matched, in query order
    pub matched_terms: Vec<String>,
    pub doc_length: usize,
}

/// A canonical knowledge-base result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub summary: String,
    pub live_url: String,
    /// Human readable "Month YYYY"
    pub date: String,
    /// Epoch milliseconds, 0 when unknown
    pub date_timestamp: i64,
    pub tags: Tags,
    pub submitted_by: String,
    pub rank: f64,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<OfflineScore>,
}

impl SearchResult {
    pub fn matched_terms(&self) -> &[String] {
        self.offline
            .as_ref()
            .map(|o| o.matched_terms.as_slice())
            .unwrap_or_default()
    }

    pub fn offline_score(&self) -> f64 {
        self.offline.as_ref().map(|o| o.offline_score).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Relevance,
    DateNewest,
    DateOldest,
    TitleAz,
    TitleZa,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Relevance,
        SortKey::DateNewest,
        SortKey::DateOldest,
        SortKey::TitleAz,
        SortKey::TitleZa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::DateNewest => "date-newest",
            SortKey::DateOldest => "date-oldest",
            SortKey::TitleAz => "title-az",
            SortKey::TitleZa => "title-za",
        }
    }

    /// Label shown in the sort dropdown
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::DateNewest => "Date (newest first)",
            SortKey::DateOldest => "Date (oldest first)",
            SortKey::TitleAz => "Title (A-Z)",
            SortKey::TitleZa => "Title (Z-A)",
        }
    }

    /// Parses a sort value, treating anything unknown as relevance.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| anyhow::anyhow!("Unknown sort key: {s}"))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current UI filter state, rebuilt by the caller for every pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub selected_work_areas: BTreeSet<String>,
    #[serde(default)]
    pub sort_key: SortKey,
}

impl FilterState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_work_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_work_areas = areas
            .into_iter()
            .map(Into::into)
            .filter(|a: &String| !a.trim().is_empty())
            .collect();
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn has_query(&self) -> bool {
        !self.search_query.trim().is_empty()
    }
}

/// Query parameters for GET /api/results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsQuery {
    #[serde(default)]
    pub query: String,
    /// Comma separated work areas
    #[serde(default)]
    pub work_areas: String,
    #[serde(default)]
    pub sort: String,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

impl ResultsQuery {
    pub fn filter_state(&self) -> FilterState {
        FilterState::new(self.query.clone())
            .with_work_areas(self.work_areas.split(',').map(str::trim))
            .with_sort(SortKey::parse_lenient(&self.sort))
    }
}

/// A result card ready for display, with matched terms wrapped in `<mark>`
#[derive(Debug, Clone, Serialize)]
pub struct ResultCard {
    pub title: String,
    pub summary: String,
    pub highlighted_title: String,
    pub highlighted_summary: String,
    pub live_url: String,
    pub date: String,
    pub tags: Tags,
    pub submitted_by: String,
    pub offline_score: Option<f64>,
    pub matched_terms: Vec<String>,
}

impl ResultCard {
    /// Builds a card, highlighting `terms` in the title and summary.
    pub fn new(result: &SearchResult, terms: &[String]) -> Self {
        Self {
            title: result.title.clone(),
            summary: result.summary.clone(),
            highlighted_title: highlight_matches(&result.title, terms),
            highlighted_summary: highlight_matches(&result.summary, terms),
            live_url: result.live_url.clone(),
            date: result.date.clone(),
            tags: result.tags.clone(),
            submitted_by: result.submitted_by.clone(),
            offline_score: result.offline.as_ref().map(|o| o.offline_score),
            matched_terms: result.matched_terms().to_vec(),
        }
    }
}

/// Response for GET /api/results
#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultCard>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub pages: Vec<PageItem>,
    pub applied_filters: Vec<AppliedFilter>,
    pub sort: SortKey,
    pub sort_label: &'static str,
}

/// Response for GET /api/status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub environment: Environment,
    pub primary_source: String,
    pub fallback_source: Option<String>,
    pub loaded_results: usize,
    pub load: serde_json::Value,
}
