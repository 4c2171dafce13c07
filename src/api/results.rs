use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{ResultCard, ResultsQuery, ResultsResponse, StatusResponse};
use crate::session::LoadOutcome;
use crate::state::AppState;

/// GET /api/results - search, filter, sort and paginate the loaded listing.
pub async fn results(
    State(state): State<AppState>,
    Query(params): Query<ResultsQuery>,
) -> Json<ResultsResponse> {
    let filters = params.filter_state();
    let page = state.session.view(&filters, params.page);

    let results = page
        .results
        .iter()
        .map(|r| ResultCard::new(r, &page.query_terms))
        .collect();

    Json(ResultsResponse {
        results,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_results: page.total_results,
        page_size: page.page_size,
        has_previous: page.has_previous,
        has_next: page.has_next,
        pages: page.pages,
        applied_filters: page.applied_filters,
        sort: filters.sort_key,
        sort_label: filters.sort_key.label(),
    })
}

/// GET /api/work-areas
pub async fn work_areas(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.session.work_area_options())
}

/// GET /api/status
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let sources = state.session.sources();
    let load = serde_json::to_value(state.session.status())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(StatusResponse {
        environment: sources.environment,
        primary_source: sources.primary.to_string(),
        fallback_source: sources.fallback.as_ref().map(ToString::to_string),
        loaded_results: state.session.loaded_results().len(),
        load,
    }))
}

/// POST /api/reload - re-fetch the listing (primary, then fallback).
pub async fn reload(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    match state.session.load_results(&state.fetcher).await {
        Ok(LoadOutcome::Loaded { .. }) => {}
        Ok(LoadOutcome::Stale) => {
            tracing::debug!("Reload superseded by a newer load");
        }
        Err(e) => return Err((StatusCode::BAD_GATEWAY, format!("{e:#}"))),
    }
    status(State(state)).await
}
