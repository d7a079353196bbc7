//! Turns loosely typed JSON records into [`Entity`] values.
//!
//! Records follow the published dataset layout (`entity_name`,
//! `entity_type`, parallel `connected_entities` / `connection_types`
//! lists, and optional descriptive fields). Anything missing is defaulted;
//! only a top level that is not a list of objects is rejected.

use crate::entity::{
    Connection, Entity, KeyDates, UNKNOWN_CATEGORY, UNKNOWN_RELATIONSHIP,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("expected a list of entity records, found {found}")]
    NotAList { found: &'static str },
    #[error("entity record {index} is not an object (found {found})")]
    EntryNotObject { index: usize, found: &'static str },
}

type Record = Map<String, Value>;

pub fn normalize(raw: &Value) -> Result<Vec<Entity>, NormalizeError> {
    let records = raw.as_array().ok_or(NormalizeError::NotAList {
        found: json_kind(raw),
    })?;
    normalize_records(records)
}

pub fn normalize_records(
    records: &[Value],
) -> Result<Vec<Entity>, NormalizeError> {
    let mut entities = Vec::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        let record = value.as_object().ok_or(
            NormalizeError::EntryNotObject {
                index,
                found: json_kind(value),
            },
        )?;
        entities.push(normalize_record(index, record));
    }
    report_duplicate_names(&entities);
    debug!(count = entities.len(), "normalized entity records");
    Ok(entities)
}

fn normalize_record(index: usize, record: &Record) -> Entity {
    let text = |keys: &[&str]| first_text(index, record, keys);

    let name = text(&["entity_name", "name"]).unwrap_or_else(|| {
        warn!(index, "entity record has no name");
        String::new()
    });
    let category = text(&["entity_type", "category"])
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

    Entity {
        connections: connections(index, record),
        role: text(&["role"]),
        function: text(&["function"]),
        specialty: text(&["specialty"]),
        sentence: text(&["sentence", "sentence_description"]),
        dates: KeyDates {
            plea: text(&["plea_date"]),
            conviction: text(&["conviction_date"]),
            sentencing: text(&["sentence_date", "sentencing_date"]),
        },
        location: text(&["location"]),
        case_reference: text(&["case_number", "case_reference"]),
        scheme_amount: text(&["scheme_amount"]),
        case_label: text(&["case", "case_label"]),
        enforcement_source: text(&["enforcement_record_source"]),
        source_citation: text(&["source_citation"]),
        name,
        category,
    }
}

fn first_text(index: usize, record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = record.get(*key)?;
        let text = scalar_text(value);
        if text.is_none() && (value.is_array() || value.is_object()) {
            warn!(index, field = *key, "ignoring non-scalar field value");
        }
        text
    })
}

/// Trimmed text of a scalar; empty strings and nulls count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn connections(index: usize, record: &Record) -> Vec<Connection> {
    let mut out = Vec::new();

    match record.get("connected_entities") {
        Some(Value::Array(targets)) => {
            let labels: Vec<Option<String>> = match record
                .get("connection_types")
            {
                Some(Value::Array(labels)) => {
                    labels.iter().map(scalar_text).collect()
                }
                _ => Vec::new(),
            };
            for (k, target) in targets.iter().enumerate() {
                let Some(target) = scalar_text(target) else {
                    debug!(index, position = k, "skipping blank connection");
                    continue;
                };
                let label = labels
                    .get(k)
                    .cloned()
                    .flatten()
                    .or_else(|| labels.first().cloned().flatten())
                    .unwrap_or_else(|| UNKNOWN_RELATIONSHIP.to_string());
                out.push(Connection { target, label });
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            warn!(
                index,
                found = json_kind(other),
                "connected_entities is not a list"
            );
        }
    }

    if let Some(Value::Array(items)) = record.get("connections") {
        out.extend(items.iter().filter_map(structured_connection));
    }

    out
}

/// Accepts `{"target", "label"}` objects, `[target, label]` pairs, and bare
/// target names.
fn structured_connection(item: &Value) -> Option<Connection> {
    let (target, label) = match item {
        Value::Object(fields) => (
            fields
                .get("target")
                .or_else(|| fields.get("name"))
                .and_then(scalar_text),
            fields.get("label").and_then(scalar_text),
        ),
        Value::Array(pair) => (
            pair.first().and_then(scalar_text),
            pair.get(1).and_then(scalar_text),
        ),
        other => (scalar_text(other), None),
    };
    Some(Connection {
        target: target?,
        label: label.unwrap_or_else(|| UNKNOWN_RELATIONSHIP.to_string()),
    })
}

fn report_duplicate_names(entities: &[Entity]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entity in entities {
        *counts.entry(entity.name.as_str()).or_insert(0) += 1;
    }
    let mut duplicates: Vec<_> =
        counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (name, occurrences) in duplicates {
        warn!(
            entity = name,
            occurrences,
            "duplicate entity name; references resolve to the last one"
        );
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
