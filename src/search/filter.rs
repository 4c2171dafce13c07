use std::collections::{BTreeSet, HashSet};

use crate::models::SearchResult;
use crate::search::normalize::identity_key;

/// True when every available work area is selected, which reads as
/// "no restriction" both to the filter and to the applied-filter pills.
pub fn selects_all(selected: &BTreeSet<String>, available: &[String]) -> bool {
    !available.is_empty() && available.iter().all(|area| selected.contains(area))
}

/// The selection the filter should apply: `None` when it is empty or
/// covers every available option.
pub fn effective_selection<'a>(
    selected: &'a BTreeSet<String>,
    available: &[String],
) -> Option<&'a BTreeSet<String>> {
    if selected.is_empty() || selects_all(selected, available) {
        None
    } else {
        Some(selected)
    }
}

/// Narrows results to those tagged with at least one selected work area.
///
/// An empty selection is no restriction. Duplicates (by identity key) are
/// dropped on the way through, so unnormalized input can't leak repeats.
pub fn filter_by_work_area(
    results: &[SearchResult],
    selected: &BTreeSet<String>,
) -> Vec<SearchResult> {
    let mut seen = HashSet::new();

    results
        .iter()
        .enumerate()
        .filter(|(_, result)| {
            selected.is_empty()
                || result
                    .tags
                    .work_area
                    .iter()
                    .any(|area| selected.contains(area))
        })
        .filter(|(index, result)| seen.insert(identity_key(result, *index)))
        .map(|(_, result)| result.clone())
        .collect()
}
