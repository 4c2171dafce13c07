use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::{Config, DataSources};
use crate::fetch::{fetch_with_fallback, Fetcher, SourceKind};
use crate::models::{FilterState, SearchResult};
use crate::search::applied::{applied_filters, clear_all, remove_filter, AppliedFilter};
use crate::search::filter::{effective_selection, filter_by_work_area};
use crate::search::normalize::normalize_results;
use crate::search::pagination::{PageItem, Paginator};
use crate::search::scoring::{score_results, FieldWeights};
use crate::search::sort::sort_results;
use crate::search::tokenizer::tokenize_query;
use crate::search::vocabulary::work_area_options;

/// Message shown when no listing could be loaded.
pub const LOAD_ERROR_MESSAGE: &str =
    "Unable to load search results. Please check your connection and try again later.";

/// One page of results handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub results: Vec<SearchResult>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub pages: Vec<PageItem>,
    pub applied_filters: Vec<AppliedFilter>,
    /// Terms of the active query, for highlighting
    pub query_terms: Vec<String>,
}

impl RenderedPage {
    fn build(
        pager: &Paginator<SearchResult>,
        applied_filters: Vec<AppliedFilter>,
        query_terms: Vec<String>,
    ) -> Self {
        Self {
            results: pager.current_page_results().to_vec(),
            current_page: pager.current_page(),
            total_pages: pager.total_pages(),
            total_results: pager.total_items(),
            page_size: pager.page_size(),
            has_previous: pager.has_previous(),
            has_next: pager.has_next(),
            pages: pager.page_range(),
            applied_filters,
            query_terms,
        }
    }
}

/// Receives pages produced by the pipeline.
///
/// Renderers run while the pipeline is held: a run requested from inside
/// `render` is dropped. Getters and `Session::view` are safe to call.
pub trait Renderer: Send + Sync {
    fn render(&self, page: &RenderedPage);
    fn render_error(&self, message: &str);
}

/// Logs rendered pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn render(&self, page: &RenderedPage) {
        tracing::info!(
            "Rendering page {}/{} ({} results, {} on page)",
            page.current_page,
            page.total_pages,
            page.total_results,
            page.results.len()
        );
    }

    fn render_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LoadStatus {
    Pending,
    Loaded { source: SourceKind, count: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { source: SourceKind, count: usize },
    /// A newer load started while this one was in flight; its data was discarded.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Rendered { total_results: usize },
    /// Page request was out of range or already current
    Unchanged,
    /// Another run or a fetch commit was in progress
    Dropped,
    /// Nothing has been loaded yet
    NotLoaded,
}

struct SessionState {
    /// Last successful fetch, normalized and deduplicated
    loaded: Arc<Vec<SearchResult>>,
    /// `loaded`, or its search-scored subset while a query is active
    current: Arc<Vec<SearchResult>>,
    /// Set once any load succeeded; a later failed reload keeps the old listing
    has_listing: bool,
    active_query: String,
    query_terms: Vec<String>,
    filters: FilterState,
    pager: Paginator<SearchResult>,
    work_areas: Option<Vec<String>>,
    status: LoadStatus,
}

impl SessionState {
    fn work_area_options(&self) -> Vec<String> {
        work_area_options(self.work_areas.as_deref(), &self.loaded)
    }
}

/// Narrows the (possibly search-scored) set by work area, then sorts it.
///
/// A selection covering every option in `available` is no restriction, so
/// untagged articles stay in.
pub fn filter_and_sort(
    results: &[SearchResult],
    filters: &FilterState,
    available: &[String],
) -> Vec<SearchResult> {
    let unrestricted = BTreeSet::new();
    let selected = effective_selection(&filters.selected_work_areas, available)
        .unwrap_or(&unrestricted);
    let filtered = filter_by_work_area(results, selected);
    sort_results(&filtered, filters.sort_key)
}

/// Runs the full pipeline statelessly: search (if a query is given), filter, sort.
pub fn evaluate(
    loaded: &[SearchResult],
    filters: &FilterState,
    available: &[String],
    weights: &FieldWeights,
) -> (Vec<SearchResult>, Vec<String>) {
    if !filters.has_query() {
        return (filter_and_sort(loaded, filters, available), Vec::new());
    }
    let terms = tokenize_query(&filters.search_query);
    let scored = score_results(loaded, &terms, weights);
    (filter_and_sort(&scored, filters, available), terms)
}

/// The landing page's search session: one per page load.
///
/// Holds the loaded result set, the active search, pagination position and
/// the work-area list. Pipeline runs never wait: if the session is busy with
/// another run or a fetch commit, the run is dropped and the next user action
/// triggers a fresh one. Getters and `view` only take the state lock briefly
/// and never make a run count as busy.
pub struct Session {
    sources: DataSources,
    page_size: usize,
    weights: FieldWeights,
    renderer: Box<dyn Renderer>,
    /// Held for a whole run or fetch commit, rendering included
    pipeline: Mutex<()>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

impl Session {
    pub fn new(sources: DataSources, page_size: usize, renderer: impl Renderer + 'static) -> Self {
        Self {
            sources,
            page_size,
            weights: FieldWeights::default(),
            renderer: Box::new(renderer),
            pipeline: Mutex::new(()),
            state: Mutex::new(SessionState {
                loaded: Arc::new(Vec::new()),
                current: Arc::new(Vec::new()),
                has_listing: false,
                active_query: String::new(),
                query_terms: Vec::new(),
                filters: FilterState::default(),
                pager: Paginator::new(Vec::new(), page_size),
                work_areas: None,
                status: LoadStatus::Pending,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &Config, renderer: impl Renderer + 'static) -> Self {
        Self::new(config.data_sources(), config.page_size, renderer)
    }

    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    pub fn status(&self) -> LoadStatus {
        self.state.lock().status.clone()
    }

    /// True while a run or fetch commit is in progress.
    pub fn is_busy(&self) -> bool {
        self.pipeline.is_locked()
    }

    /// The full set from the last successful fetch.
    pub fn loaded_results(&self) -> Arc<Vec<SearchResult>> {
        self.state.lock().loaded.clone()
    }

    /// The set filters and sorts run against: search-scored while a query is active.
    pub fn current_results(&self) -> Arc<Vec<SearchResult>> {
        self.state.lock().current.clone()
    }

    pub fn current_page_results(&self) -> Vec<SearchResult> {
        self.state.lock().pager.current_page_results().to_vec()
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.lock().pager.total_pages()
    }

    pub fn work_area_options(&self) -> Vec<String> {
        self.state.lock().work_area_options()
    }

    pub fn applied_filters(&self, filters: &FilterState) -> Vec<AppliedFilter> {
        applied_filters(filters, &self.work_area_options())
    }

    /// Fetches the listing (primary, then one fallback attempt), replaces the
    /// store and renders page 1 with the current work-area and sort selection.
    ///
    /// The commit holds the pipeline, so it never interleaves with a run. A
    /// load overtaken by a newer one is discarded. A failed load renders the
    /// error but leaves any earlier listing in place.
    pub async fn load_results<F: Fetcher>(&self, fetcher: &F) -> Result<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Loading results from {}", self.sources.primary);

        let fetched =
            fetch_with_fallback(fetcher, &self.sources.primary, self.sources.fallback.as_ref())
                .await;

        let _pipeline = self.pipeline.lock();
        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding stale load (generation {generation})");
            return Ok(LoadOutcome::Stale);
        }

        let (data, source) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!("Failed to load results: {e:#}");
                state.status = LoadStatus::Failed {
                    error: format!("{e:#}"),
                };
                drop(state);
                self.renderer.render_error(LOAD_ERROR_MESSAGE);
                return Err(e);
            }
        };

        let results = normalize_results(&data);
        let count = results.len();
        tracing::info!("Loaded {count} results from {source:?} source");

        let loaded = Arc::new(results);
        state.loaded = loaded.clone();
        state.current = loaded;
        state.has_listing = true;
        state.active_query.clear();
        state.query_terms.clear();
        state.filters.search_query.clear();
        state.status = LoadStatus::Loaded { source, count };

        let filters = state.filters.clone();
        let page = self.apply(&mut state, &filters);
        drop(state);
        self.renderer.render(&page);

        Ok(LoadOutcome::Loaded { source, count })
    }

    /// Fetches the published work-area list. A failure is logged and leaves
    /// the options derived from the results.
    pub async fn load_work_areas<F: Fetcher>(&self, fetcher: &F) -> Option<Vec<String>> {
        let areas = match fetcher.fetch_json(&self.sources.work_areas).await {
            Ok(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect::<Vec<_>>(),
            Ok(_) => {
                tracing::warn!("Work-area list at {} is not an array", self.sources.work_areas);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to load work areas: {e:#}");
                return None;
            }
        };

        tracing::info!("Loaded {} work areas", areas.len());
        self.state.lock().work_areas = Some(areas.clone());
        Some(areas)
    }

    /// One pipeline run for the given UI state: search when the query
    /// changed, then filter, sort, reset to page 1 and render.
    ///
    /// An empty query restores the full loaded set rather than searching for
    /// nothing; the work-area selection and sort order still apply.
    pub fn run(&self, filters: &FilterState) -> RunOutcome {
        let Some(_pipeline) = self.pipeline.try_lock() else {
            tracing::debug!("Pipeline busy, dropping run");
            return RunOutcome::Dropped;
        };

        let page = {
            let mut state = self.state.lock();
            if state.has_listing {
                self.search(&mut state, filters);
                Some(self.apply(&mut state, filters))
            } else {
                None
            }
        };

        match page {
            Some(page) => {
                self.renderer.render(&page);
                RunOutcome::Rendered {
                    total_results: page.total_results,
                }
            }
            None => {
                self.renderer.render_error(LOAD_ERROR_MESSAGE);
                RunOutcome::NotLoaded
            }
        }
    }

    /// Removes one applied-filter pill and runs the pipeline with what is left.
    pub fn remove_applied_filter(
        &self,
        filters: &FilterState,
        pill: &AppliedFilter,
    ) -> (FilterState, RunOutcome) {
        let next = remove_filter(filters, pill);
        let outcome = self.run(&next);
        (next, outcome)
    }

    /// Clears the query and every work area, keeping the sort, and runs the pipeline.
    pub fn clear_all_filters(&self, filters: &FilterState) -> (FilterState, RunOutcome) {
        let next = clear_all(filters);
        let outcome = self.run(&next);
        (next, outcome)
    }

    /// Recomputes the current set when the query changed.
    fn search(&self, state: &mut SessionState, filters: &FilterState) {
        let query = filters.search_query.trim();
        if query == state.active_query {
            return;
        }

        if query.is_empty() {
            state.current = state.loaded.clone();
            state.query_terms.clear();
        } else {
            let terms = tokenize_query(query);
            let scored = score_results(&state.loaded, &terms, &self.weights);
            tracing::debug!(
                "Search \"{query}\" matched {} of {} results",
                scored.len(),
                state.loaded.len()
            );
            state.current = Arc::new(scored);
            state.query_terms = terms;
        }
        state.active_query = query.to_string();
    }

    /// Filters and sorts the current set and resets pagination.
    fn apply(&self, state: &mut SessionState, filters: &FilterState) -> RenderedPage {
        let options = state.work_area_options();
        let results = filter_and_sort(&state.current, filters, &options);
        tracing::debug!(
            "Applied {} work areas, sort {}: {} results",
            filters.selected_work_areas.len(),
            filters.sort_key,
            results.len()
        );

        state.filters = filters.clone();
        state.pager.replace(results);

        RenderedPage::build(
            &state.pager,
            applied_filters(filters, &options),
            state.query_terms.clone(),
        )
    }

    /// Moves to another page of the current results and renders it.
    pub fn go_to_page(&self, page: usize) -> RunOutcome {
        let Some(_pipeline) = self.pipeline.try_lock() else {
            return RunOutcome::Dropped;
        };

        let rendered = {
            let mut state = self.state.lock();
            if !state.pager.go_to_page(page) {
                return RunOutcome::Unchanged;
            }
            RenderedPage::build(
                &state.pager,
                applied_filters(&state.filters, &state.work_area_options()),
                state.query_terms.clone(),
            )
        };

        self.renderer.render(&rendered);
        RunOutcome::Rendered {
            total_results: rendered.total_results,
        }
    }

    /// Evaluates the pipeline for `filters` and returns `page` without
    /// touching the session's own search, pagination or renderer.
    /// Pages outside the range give page 1.
    pub fn view(&self, filters: &FilterState, page: usize) -> RenderedPage {
        let (loaded, options) = {
            let state = self.state.lock();
            (state.loaded.clone(), state.work_area_options())
        };

        let (results, terms) = evaluate(&loaded, filters, &options, &self.weights);
        let mut pager = Paginator::new(results, self.page_size);
        pager.go_to_page(page);

        RenderedPage::build(&pager, applied_filters(filters, &options), terms)
    }
}
