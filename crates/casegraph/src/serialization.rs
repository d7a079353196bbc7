use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::detail::EntityDetail;
use crate::entity::Entity;
use crate::graph_view::GraphView;
use crate::layout_force::PositionFrame;
use crate::layout_settings::EngineSettings;
use crate::normalize::{NormalizeError, json_kind, normalize_records};
use crate::ranking::RankedRow;
use crate::store::ViewState;
use crate::summary::CaseSummary;
use crate::timeline::TimelineGroup;

// ------------------------------------------------------------------
// Errors
// ------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

// ------------------------------------------------------------------
// Dataset
// ------------------------------------------------------------------

/// Descriptive header of a published dataset. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkMetadata {
    pub title: Option<String>,
    pub date_created: Option<String>,
    pub total_entities: Option<u64>,
    pub total_connections: Option<u64>,
    pub excluded_individuals: Option<u64>,
    pub business_entities: Option<u64>,
    pub primary_case: Option<String>,
    pub data_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub metadata: NetworkMetadata,
    pub entities: Vec<Entity>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            metadata: NetworkMetadata::default(),
            entities,
        }
    }
}

/// Accepts a bare list of records or `{ "network_metadata", "entities" }`.
pub fn dataset_from_value(value: &Value) -> Result<Dataset, DatasetError> {
    let (metadata, records) = match value {
        Value::Object(fields) if fields.contains_key("entities") => {
            let metadata = match fields.get("network_metadata") {
                Some(raw) => serde_json::from_value(raw.clone())
                    .unwrap_or_else(|e| {
                        warn!(
                            error = %e,
                            "ignoring malformed network_metadata"
                        );
                        NetworkMetadata::default()
                    }),
                None => NetworkMetadata::default(),
            };
            (metadata, &fields["entities"])
        }
        other => (NetworkMetadata::default(), other),
    };
    let records = records.as_array().ok_or(NormalizeError::NotAList {
        found: json_kind(records),
    })?;
    let entities = normalize_records(records)?;
    Ok(Dataset { metadata, entities })
}

pub fn dataset_from_str(json: &str) -> Result<Dataset, DatasetError> {
    let value: Value = serde_json::from_str(json)?;
    dataset_from_value(&value)
}

pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let json = std::fs::read_to_string(path).map_err(|source| {
        DatasetError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let dataset = dataset_from_str(&json)?;
    info!(
        path = %path.display(),
        entities = dataset.entities.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Write the dataset back in the published record layout.
pub fn save_dataset(
    dataset: &Dataset,
    path: &Path,
) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(&dataset_to_value(dataset))?;
    std::fs::write(path, json).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn dataset_to_value(dataset: &Dataset) -> Value {
    let entities: Vec<Value> =
        dataset.entities.iter().map(entity_to_record).collect();
    json!({
        "network_metadata": dataset.metadata,
        "entities": entities,
    })
}

fn entity_to_record(entity: &Entity) -> Value {
    let mut record = json!({
        "entity_name": entity.name,
        "entity_type": entity.category,
        "connected_entities": entity
            .connections
            .iter()
            .map(|c| c.target.as_str())
            .collect::<Vec<_>>(),
        "connection_types": entity
            .connections
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>(),
    });
    let optional = [
        ("role", &entity.role),
        ("function", &entity.function),
        ("specialty", &entity.specialty),
        ("sentence", &entity.sentence),
        ("plea_date", &entity.dates.plea),
        ("conviction_date", &entity.dates.conviction),
        ("sentence_date", &entity.dates.sentencing),
        ("location", &entity.location),
        ("case_number", &entity.case_reference),
        ("scheme_amount", &entity.scheme_amount),
        ("case", &entity.case_label),
        ("enforcement_record_source", &entity.enforcement_source),
        ("source_citation", &entity.source_citation),
    ];
    if let Value::Object(fields) = &mut record {
        for (key, value) in optional {
            if let Some(text) = value {
                fields.insert(key.to_string(), Value::String(text.clone()));
            }
        }
    }
    record
}

// ------------------------------------------------------------------
// Settings
// ------------------------------------------------------------------

pub fn load_settings(path: &Path) -> Result<EngineSettings, SettingsError> {
    let json = std::fs::read_to_string(path).map_err(|source| {
        SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let settings: EngineSettings = serde_json::from_str(&json)?;
    Ok(settings)
}

// ------------------------------------------------------------------
// Snapshot
// ------------------------------------------------------------------

/// Everything a renderer needs for one frame of the session.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub metadata: NetworkMetadata,
    pub summary: CaseSummary,
    pub graph: GraphView,
    pub positions: PositionFrame,
    pub table: Vec<RankedRow>,
    pub timeline: Vec<TimelineGroup>,
    pub view: ViewState,
    pub selected: Option<EntityDetail>,
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
