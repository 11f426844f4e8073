//! Metadata normalizer: reconciles whatever optimization metadata the model
//! volunteered with the computed diff.
//!
//! Models answer in either camelCase or snake_case, sometimes omit metadata
//! entirely, and occasionally emit junk entries in `changes`. The output is one
//! canonical record; `improvementsCount` is always populated when there is
//! anything to report.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::diff::differ::ChangeRecord;

const DEFAULT_CHANGE_TYPE: &str = "modified";
const DEFAULT_CHANGE_SECTION: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDescription {
    #[serde(rename = "type")]
    pub kind: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords_matched: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<ChangeDescription>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-14T09:30:00.000Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Merges raw model metadata with the diff.
///
/// Returns `None` only when the model sent nothing usable AND the diff is empty.
pub fn merge(
    raw: Option<&Value>,
    diff_items: &[ChangeRecord],
    now: DateTime<Utc>,
) -> Option<OptimizationMetadata> {
    let Some(raw) = raw.and_then(Value::as_object) else {
        if diff_items.is_empty() {
            return None;
        }
        return Some(OptimizationMetadata {
            improvements_count: Some(diff_items.len() as u64),
            timestamp: Some(iso_timestamp(now)),
            ..Default::default()
        });
    };

    let improvements_count = read_field(raw, "improvementsCount", "improvements_count", Value::as_u64)
        .unwrap_or(diff_items.len() as u64);
    let word_count = read_field(raw, "wordCount", "word_count", Value::as_u64);
    let processing_time_seconds = read_field(
        raw,
        "processingTimeSeconds",
        "processing_time_seconds",
        Value::as_f64,
    );
    let keywords_matched = read_field(raw, "keywordsMatched", "keywords_matched", |v| {
        v.as_array().map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
    });
    let changes = read_field(raw, "changes", "changes", |v| {
        v.as_array()
            .map(|entries| entries.iter().filter_map(normalize_change).collect::<Vec<_>>())
    });
    let timestamp = read_field(raw, "timestamp", "timestamp", |v| {
        v.as_str().map(str::to_string)
    })
    .unwrap_or_else(|| iso_timestamp(now));

    Some(OptimizationMetadata {
        improvements_count: Some(improvements_count),
        keywords_matched,
        word_count,
        processing_time_seconds,
        changes,
        timestamp: Some(timestamp),
    })
}

/// Reads `camel` first, then `snake`; a key whose value has the wrong type
/// counts as absent.
fn read_field<T>(
    raw: &Map<String, Value>,
    camel: &str,
    snake: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    raw.get(camel)
        .and_then(&read)
        .or_else(|| raw.get(snake).and_then(&read))
}

fn normalize_change(entry: &Value) -> Option<ChangeDescription> {
    let entry = entry.as_object()?;
    let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);

    Some(ChangeDescription {
        kind: text("type").unwrap_or_else(|| DEFAULT_CHANGE_TYPE.to_string()),
        section: text("section").unwrap_or_else(|| DEFAULT_CHANGE_SECTION.to_string()),
        description: text("description"),
        before: text("before"),
        after: text("after"),
        reason: text("reason"),
    })
}
