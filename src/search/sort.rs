use std::cmp::Ordering;

use crate::models::{SearchResult, SortKey};

/// Approximates a locale-aware string comparison: case-insensitive first,
/// then lowercase before uppercase for words that differ only in case.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            })
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

fn compare_relevance(a: &SearchResult, b: &SearchResult) -> Ordering {
    if a.rank != 0.0 && b.rank != 0.0 {
        return a.rank.partial_cmp(&b.rank).unwrap_or(Ordering::Equal);
    }
    if a.score != 0.0 && b.score != 0.0 {
        return b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal);
    }
    Ordering::Equal
}

/// Stable bottom-up merge sort.
///
/// The relevance comparator is not a total order (unranked items compare
/// equal to everything), which `slice::sort_by` is allowed to panic on.
/// Merging only ever looks at adjacent runs, so any comparator is safe here.
fn merge_sort_by<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut runs: Vec<Vec<T>> = items.into_iter().map(|item| vec![item]).collect();

    while runs.len() > 1 {
        let mut merged = Vec::with_capacity(runs.len().div_ceil(2));
        let mut pending = runs.into_iter();
        while let Some(left) = pending.next() {
            match pending.next() {
                Some(right) => merged.push(merge_runs(left, right, &mut compare)),
                None => merged.push(left),
            }
        }
        runs = merged;
    }

    runs.pop().unwrap_or_default()
}

fn merge_runs<T, F>(left: Vec<T>, right: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        out.extend(next);
    }

    out
}

/// Returns a sorted copy of `results`.
///
/// The sort is stable: whatever order the input had (for instance offline
/// search score) survives among results that compare equal.
pub fn sort_results(results: &[SearchResult], key: SortKey) -> Vec<SearchResult> {
    let mut sorted = results.to_vec();

    match key {
        SortKey::Relevance => return merge_sort_by(sorted, compare_relevance),
        SortKey::DateNewest => sorted.sort_by(|a, b| b.date_timestamp.cmp(&a.date_timestamp)),
        SortKey::DateOldest => sorted.sort_by(|a, b| a.date_timestamp.cmp(&b.date_timestamp)),
        SortKey::TitleAz => sorted.sort_by(|a, b| locale_compare(&a.title, &b.title)),
        SortKey::TitleZa => sorted.sort_by(|a, b| locale_compare(&b.title, &a.title)),
    }

    sorted
}
