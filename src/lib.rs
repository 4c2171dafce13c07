//! # kb-search
//!
//! Client-side style search for a knowledge-base landing page: the whole
//! article listing is fetched once, then searched, filtered, sorted and
//! paginated in memory.
//!
//! ## Pipeline
//!
//! ```text
//!   fetch (primary ─► fallback)
//!            │
//!            ▼
//!   normalize + dedupe ──► loaded set
//!                               │
//!             query? ───────────┤
//!                               ▼
//!              tokenize ─► weighted TF score ─► matched only
//!                               │
//!                               ▼
//!              work-area filter (OR) ─► sort ─► paginate ─► render
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment detection and data-source selection
//! - [`models`] - Canonical results, filter state, response types
//! - [`fetch`] - `Fetcher` trait, HTTP/file fetching with one fallback attempt
//! - [`search::normalize`] - Raw record validation, field aliases, dedupe
//! - [`search::tokenizer`] - Query tokenizing with a noise-word list
//! - [`search::scoring`] - Weighted full-word/partial term-frequency scoring
//! - [`search::filter`] - Multi-select work-area filter
//! - [`search::sort`] - The five sort orders
//! - [`search::pagination`] - Paginator and page-range display
//! - [`session`] - The orchestrator tying it all together
//! - [`api`] - Axum JSON handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod fetch;
pub mod models;
pub mod search;
pub mod session;
pub mod state;
