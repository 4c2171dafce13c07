use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{SearchResult, Tags};

type Record = Map<String, Value>;

// Aliases are tried in order; the first non-empty value wins.
const TITLE_FIELDS: &[&str] = &["title"];
const SUMMARY_FIELDS: &[&str] = &["description", "summary"];
const URL_FIELDS: &[&str] = &["url", "liveUrl"];
const WORK_AREA_FIELDS: &[&str] = &["work-area"];
const ROLE_FIELDS: &[&str] = &["roles"];
const BENEFIT_FIELDS: &[&str] = &["benefits"];
const DATE_FIELDS: &[&str] = &["last-updated"];
const SUBMITTED_BY_FIELDS: &[&str] = &["submitted-by"];
const RANK_FIELDS: &[&str] = &["rank"];
const SCORE_FIELDS: &[&str] = &["score"];

fn first_string(record: &Record, fields: &[&str]) -> String {
    fields
        .iter()
        .filter_map(|f| record.get(*f).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

fn first_string_list(record: &Record, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|f| record.get(*f).and_then(Value::as_array))
        .find(|values| !values.is_empty())
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn first_number(record: &Record, fields: &[&str]) -> f64 {
    fields
        .iter()
        .filter_map(|f| record.get(*f).and_then(Value::as_f64))
        .find(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Parses the date formats seen in the article listings. Values without an
/// offset are read as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Returns `(display date, epoch millis)` for a `last-updated` value.
fn resolve_date(raw: &str) -> (String, i64) {
    if raw.is_empty() {
        return (String::new(), 0);
    }
    match parse_date(raw) {
        Some(dt) => (dt.format("%B %Y").to_string(), dt.timestamp_millis()),
        None => (raw.to_string(), 0),
    }
}

/// Maps one raw record to the canonical shape. Returns `None` for non-objects
/// and for records missing a title, summary or URL.
pub fn normalize_record(raw: &Value) -> Option<SearchResult> {
    let record = raw.as_object()?;

    let title = first_string(record, TITLE_FIELDS);
    let summary = first_string(record, SUMMARY_FIELDS);
    let live_url = first_string(record, URL_FIELDS);
    if title.is_empty() || summary.is_empty() || live_url.is_empty() {
        return None;
    }

    let (date, date_timestamp) = resolve_date(&first_string(record, DATE_FIELDS));

    Some(SearchResult {
        title,
        summary,
        live_url,
        date,
        date_timestamp,
        tags: Tags {
            work_area: first_string_list(record, WORK_AREA_FIELDS),
            roles: first_string_list(record, ROLE_FIELDS),
            benefits: first_string_list(record, BENEFIT_FIELDS),
        },
        submitted_by: first_string(record, SUBMITTED_BY_FIELDS),
        rank: first_number(record, RANK_FIELDS),
        score: first_number(record, SCORE_FIELDS),
        offline: None,
    })
}

/// Identity used for deduplication: URL, then title, then the serialized
/// record suffixed with its position so every record has some key.
pub fn identity_key(result: &SearchResult, index: usize) -> String {
    if !result.live_url.is_empty() {
        return result.live_url.clone();
    }
    if !result.title.is_empty() {
        return result.title.clone();
    }
    let serialized = serde_json::to_string(result).unwrap_or_default();
    format!("{serialized}{index}")
}

/// Keeps the first result for each identity key, preserving input order.
pub fn dedupe<I>(results: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let mut seen = HashSet::new();
    results
        .into_iter()
        .enumerate()
        .filter(|(index, result)| seen.insert(identity_key(result, *index)))
        .map(|(_, result)| result)
        .collect()
}

/// Normalizes a fetched listing. Anything other than a JSON array is empty.
pub fn normalize_results(data: &Value) -> Vec<SearchResult> {
    let Some(records) = data.as_array() else {
        tracing::debug!("Result listing is not an array, treating as empty");
        return Vec::new();
    };

    let valid: Vec<SearchResult> = records.iter().filter_map(normalize_record).collect();
    let dropped = records.len() - valid.len();
    let results = dedupe(valid);

    tracing::debug!(
        "Normalized {} records: {} kept, {} malformed, {} duplicates",
        records.len(),
        results.len(),
        dropped,
        records.len() - dropped - results.len()
    );

    results
}
