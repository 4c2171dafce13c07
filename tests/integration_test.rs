//! Integration tests for the kb-search pipeline.
//!
//! These tests load listings from local JSON files (the development data
//! sources), so no network access is needed.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::json;
use std::path::Path;

use kb_search::api;
use kb_search::config::{Config, Environment};
use kb_search::models::{FilterState, ResultsQuery, SortKey};
use kb_search::search::pagination::PageItem;
use kb_search::session::{LoadStatus, RunOutcome};
use kb_search::state::AppState;

/// Helper: the three-record listing, one of which has no URL.
fn sample_listing() -> serde_json::Value {
    json!([
        {
            "title": "Using AI for meeting notes",
            "description": "Summarise meetings with Copilot.",
            "url": "https://kb/a",
            "work-area": ["HR"],
            "last-updated": "2024-01-01"
        },
        {
            "title": "Finance AI tools",
            "description": "Forecasting helpers for budget teams.",
            "url": "https://kb/b",
            "work-area": ["Finance"],
            "last-updated": "2025-06-01"
        },
        {
            "title": "Draft without a link",
            "description": "AI notes",
            "work-area": ["HR"]
        }
    ])
}

/// Helper: a larger listing spread over three work areas.
fn large_listing(count: usize) -> serde_json::Value {
    let areas = ["HR", "Finance", "Legal"];
    let records: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Article {i:02}"),
                "description": if i % 2 == 0 { "Prompting guide" } else { "Records policy" },
                "url": format!("https://kb/{i}"),
                "work-area": [areas[i % 3]],
                "last-updated": format!("2024-{:02}-01", i % 12 + 1)
            })
        })
        .collect();
    serde_json::Value::Array(records)
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn dev_config(dir: &Path, listing: &serde_json::Value) -> Config {
    Config {
        host: "localhost".to_string(),
        fallback_results_path: write_json(dir, "search.json", listing),
        local_work_areas_path: write_json(dir, "work-areas.json", &json!(["HR", "Finance", "Legal"])),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_end_to_end_search_filter_sort() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(dev_config(dir.path(), &sample_listing())).unwrap();
    assert_eq!(state.session.sources().environment, Environment::Development);

    state.load().await.unwrap();
    assert_eq!(state.session.loaded_results().len(), 2, "record without url is dropped");

    // Search
    let outcome = state.session.run(&FilterState::new("AI"));
    assert_eq!(outcome, RunOutcome::Rendered { total_results: 2 });
    let current = state.session.current_results();
    assert!(current.iter().all(|r| r.matched_terms() == ["ai"]));

    // Both score a full-word title hit (5) over 60 characters and tie, so
    // relevance keeps listing order.
    for result in current.iter() {
        let offline = result.offline.as_ref().unwrap();
        assert_eq!(offline.raw_score, 5.0);
        assert_eq!(offline.doc_length, 60);
        assert!((offline.offline_score - 5.0 / 60.0 * 1000.0).abs() < 1e-9);
    }
    let ranked: Vec<_> = state
        .session
        .current_page_results()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(ranked, vec!["Using AI for meeting notes", "Finance AI tools"]);

    // Filter within the search results
    let finance = FilterState::new("AI").with_work_areas(["Finance"]);
    state.session.run(&finance);
    let page = state.session.current_page_results();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Finance AI tools");

    // Sort
    let oldest = FilterState::new("AI").with_sort(SortKey::DateOldest);
    state.session.run(&oldest);
    let titles: Vec<_> = state
        .session
        .current_page_results()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Using AI for meeting notes", "Finance AI tools"]);
}

#[tokio::test]
async fn test_results_endpoint_pages_and_highlights() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        page_size: 5,
        ..dev_config(dir.path(), &large_listing(40))
    };
    let state = AppState::new(config).unwrap();
    state.load().await.unwrap();

    let params = ResultsQuery {
        query: "prompting".to_string(),
        work_areas: String::new(),
        sort: "title-az".to_string(),
        page: 2,
    };
    let resp = api::results::results(State(state.clone()), Query(params)).await.0;

    assert_eq!(resp.total_results, 20);
    assert_eq!(resp.total_pages, 4);
    assert_eq!(resp.current_page, 2);
    assert_eq!(resp.results.len(), 5);
    assert_eq!(resp.results[0].title, "Article 10");
    assert_eq!(resp.results[0].highlighted_summary, "<mark>Prompting</mark> guide");
    assert_eq!(resp.sort, SortKey::TitleAz);
    assert_eq!(
        resp.pages,
        vec![
            PageItem::Page(1),
            PageItem::Page(2),
            PageItem::Page(3),
            PageItem::Page(4)
        ]
    );
    assert_eq!(resp.applied_filters.len(), 1);

    // Out-of-range pages are served as page 1
    let params = ResultsQuery {
        page: 99,
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state.clone()), Query(params)).await.0;
    assert_eq!(resp.current_page, 1);
    assert_eq!(resp.total_results, 40);
    assert_eq!(resp.total_pages, 8);
    assert!(resp.results.iter().all(|c| c.offline_score.is_none()));
}

#[tokio::test]
async fn test_multi_select_work_areas_are_ored() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(dev_config(dir.path(), &large_listing(30))).unwrap();
    state.load().await.unwrap();

    let params = ResultsQuery {
        work_areas: "HR,Legal".to_string(),
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state.clone()), Query(params)).await.0;
    assert_eq!(resp.total_results, 20);
    assert!(resp
        .results
        .iter()
        .all(|c| c.tags.work_area[0] == "HR" || c.tags.work_area[0] == "Legal"));
    assert_eq!(resp.applied_filters.len(), 2);

    // Selecting every option shows no pills and restricts nothing
    let params = ResultsQuery {
        work_areas: "HR,Finance,Legal".to_string(),
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state.clone()), Query(params)).await.0;
    assert_eq!(resp.total_results, 30);
    assert!(resp.applied_filters.is_empty());

    let options = api::results::work_areas(State(state)).await.0;
    assert_eq!(options, vec!["Finance", "HR", "Legal"]);
}

#[tokio::test]
async fn test_missing_listing_fails_and_reload_reports_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        host: "localhost".to_string(),
        fallback_results_path: dir.path().join("missing.json"),
        local_work_areas_path: dir.path().join("missing-areas.json"),
        ..Config::default()
    };
    let state = AppState::new(config).unwrap();

    assert!(state.load().await.is_err());
    assert!(matches!(state.session.status(), LoadStatus::Failed { .. }));
    assert_eq!(state.session.run(&FilterState::new("ai")), RunOutcome::NotLoaded);

    let err = api::results::reload(State(state.clone())).await.unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_GATEWAY);

    // Data appears; reload recovers
    write_json(dir.path(), "missing.json", &sample_listing());
    let status = api::results::reload(State(state.clone())).await.unwrap().0;
    assert_eq!(status.loaded_results, 2);
    assert_eq!(status.load["state"], "loaded");
    assert_eq!(status.load["source"], "primary");
}

#[tokio::test]
async fn test_stop_words_only_query_returns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(dev_config(dir.path(), &sample_listing())).unwrap();
    state.load().await.unwrap();

    let params = ResultsQuery {
        query: "what is it".to_string(),
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state), Query(params)).await.0;
    assert_eq!(resp.total_results, 0);
    assert_eq!(resp.total_pages, 1);
    assert!(resp.results.is_empty());
}

#[tokio::test]
async fn test_selecting_every_work_area_keeps_untagged_articles() {
    let dir = tempfile::tempdir().unwrap();
    let listing = json!([
        { "title": "Payroll help", "description": "HR article", "url": "https://kb/hr", "work-area": ["HR"] },
        { "title": "Budget help", "description": "Finance article", "url": "https://kb/fin", "work-area": ["Finance"] },
        { "title": "Prompt library", "description": "For everyone", "url": "https://kb/all" }
    ]);
    let config = Config {
        host: "localhost".to_string(),
        fallback_results_path: write_json(dir.path(), "search.json", &listing),
        local_work_areas_path: write_json(dir.path(), "work-areas.json", &json!(["HR", "Finance"])),
        ..Config::default()
    };
    let state = AppState::new(config).unwrap();
    state.load().await.unwrap();

    let params = ResultsQuery {
        work_areas: "HR,Finance".to_string(),
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state.clone()), Query(params)).await.0;
    assert!(resp.applied_filters.is_empty());
    assert_eq!(resp.total_results, 3);

    let params = ResultsQuery {
        work_areas: "HR".to_string(),
        ..ResultsQuery::default()
    };
    let resp = api::results::results(State(state), Query(params)).await.0;
    assert_eq!(resp.applied_filters.len(), 1);
    assert_eq!(resp.total_results, 1);
}
