//! Offline search pipeline.
//!
//! Everything here is synchronous and pure: functions take slices and return
//! new vectors, so the session can hand out snapshots without copying state
//! back and forth.
//!
//! - [`normalize`] - raw JSON records to [`SearchResult`](crate::models::SearchResult), with dedup
//! - [`tokenizer`] - query text to search terms (noise words, acronym exception)
//! - [`scoring`] - weighted term-frequency scoring with length normalization
//! - [`filter`] - work-area filtering (any selected tag matches)
//! - [`sort`] - the five sort orders, all stable
//! - [`pagination`] - page slicing and the compact page-button range
//! - [`highlight`] - `<mark>` wrapping of matched terms
//! - [`vocabulary`] - work-area options for the filter dropdown
//! - [`applied`] - active filter pills

pub mod applied;
pub mod filter;
pub mod highlight;
pub mod normalize;
pub mod pagination;
pub mod scoring;
pub mod sort;
pub mod tokenizer;
pub mod vocabulary;
