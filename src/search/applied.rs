use serde::Serialize;

use crate::models::FilterState;
use crate::search::filter::selects_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Search,
    WorkArea,
}

/// A removable "pill" describing one active filter. Sort order never gets one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFilter {
    pub kind: FilterKind,
    pub label: &'static str,
    pub value: String,
}

/// Pills for the current filter state.
///
/// Work-area pills are hidden when every available option is selected; the
/// filter ignores such a selection too.
pub fn applied_filters(state: &FilterState, available_work_areas: &[String]) -> Vec<AppliedFilter> {
    let mut pills = Vec::new();

    let query = state.search_query.trim();
    if !query.is_empty() {
        pills.push(AppliedFilter {
            kind: FilterKind::Search,
            label: "Search",
            value: query.to_string(),
        });
    }

    if !selects_all(&state.selected_work_areas, available_work_areas) {
        pills.extend(state.selected_work_areas.iter().map(|area| AppliedFilter {
            kind: FilterKind::WorkArea,
            label: "Work area",
            value: area.clone(),
        }));
    }

    pills
}

/// The filter state with one pill removed.
pub fn remove_filter(state: &FilterState, pill: &AppliedFilter) -> FilterState {
    let mut next = state.clone();
    match pill.kind {
        FilterKind::Search => next.search_query.clear(),
        FilterKind::WorkArea => {
            next.selected_work_areas.remove(&pill.value);
        }
    }
    next
}

/// Clears the query and every work area; the sort order is kept.
pub fn clear_all(state: &FilterState) -> FilterState {
    FilterState {
        sort_key: state.sort_key,
        ..FilterState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKey;

    fn areas(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_search_and_work_area_pills() {
        let state = FilterState::new("  copilot ").with_work_areas(["HR"]);
        let pills = applied_filters(&state, &areas(&["HR", "Finance"]));
        assert_eq!(pills.len(), 2);
        assert_eq!(pills[0].kind, FilterKind::Search);
        assert_eq!(pills[0].value, "copilot");
        assert_eq!(pills[1].kind, FilterKind::WorkArea);
        assert_eq!(pills[1].value, "HR");
    }

    #[test]
    fn test_all_work_areas_selected_shows_no_pills() {
        let state = FilterState::default().with_work_areas(["HR", "Finance"]);
        assert!(applied_filters(&state, &areas(&["HR", "Finance"])).is_empty());
    }

    #[test]
    fn test_no_filters_no_pills() {
        assert!(applied_filters(&FilterState::default(), &areas(&["HR"])).is_empty());
    }

    #[test]
    fn test_remove_work_area_pill() {
        let state = FilterState::new("ai").with_work_areas(["HR", "Legal"]);
        let pills = applied_filters(&state, &[]);
        let next = remove_filter(&state, &pills[1]);
        assert_eq!(next.search_query, "ai");
        assert_eq!(next.selected_work_areas.len(), 1);
        assert!(next.selected_work_areas.contains("Legal"));

        let cleared = remove_filter(&next, &pills[0]);
        assert!(!cleared.has_query());
    }

    #[test]
    fn test_clear_all_keeps_sort() {
        let state = FilterState::new("ai")
            .with_work_areas(["HR"])
            .with_sort(SortKey::TitleZa);
        let cleared = clear_all(&state);
        assert!(!cleared.has_query());
        assert!(cleared.selected_work_areas.is_empty());
        assert_eq!(cleared.sort_key, SortKey::TitleZa);
    }
}
