use std::collections::BTreeSet;

use crate::models::SearchResult;
use crate::search::sort::locale_compare;

/// Distinct, trimmed work areas, sorted alphabetically.
fn sorted_unique<'a, I>(areas: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let unique: BTreeSet<&str> = areas
        .into_iter()
        .map(|area| area.trim())
        .filter(|area| !area.is_empty())
        .collect();
    let mut list: Vec<String> = unique.into_iter().map(str::to_string).collect();
    list.sort_by(|a, b| locale_compare(a, b));
    list
}

/// Work areas present on the given results.
pub fn extract_work_areas(results: &[SearchResult]) -> Vec<String> {
    sorted_unique(results.iter().flat_map(|r| r.tags.work_area.iter()))
}

/// Options for the work-area filter.
///
/// The published work-area list wins when it was fetched, so areas with no
/// current articles are still selectable. Otherwise the options are derived
/// from the loaded results.
pub fn work_area_options(published: Option<&[String]>, results: &[SearchResult]) -> Vec<String> {
    match published {
        Some(list) if !list.is_empty() => sorted_unique(list.iter()),
        _ => extract_work_areas(results),
    }
}
