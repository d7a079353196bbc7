//! Table projection: derived sort keys, sorting and category filters.
//!
//! All functions here are pure; the entity list is never modified.

use crate::entity::Entity;
use casekeys::ChronoKey;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Category,
    #[default]
    Sentence,
    Date,
    Connections,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Category,
        SortField::Sentence,
        SortField::Date,
        SortField::Connections,
    ];
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Active sort column and direction. Defaults to longest sentence first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header click: the active column flips direction, another column
    /// becomes active sorted descending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Descending)
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityFilter {
    #[default]
    All,
    Individuals,
    Physicians,
    Businesses,
}

impl EntityFilter {
    pub const ALL: [EntityFilter; 4] = [
        EntityFilter::All,
        EntityFilter::Individuals,
        EntityFilter::Physicians,
        EntityFilter::Businesses,
    ];

    /// Lenient lookup: unrecognised names select everything.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "individuals" => EntityFilter::Individuals,
            "physicians" => EntityFilter::Physicians,
            "businesses" | "entities" => EntityFilter::Businesses,
            _ => EntityFilter::All,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityFilter::All => "all",
            EntityFilter::Individuals => "individuals",
            EntityFilter::Physicians => "physicians",
            EntityFilter::Businesses => "businesses",
        }
    }

    pub fn matches(self, category: &str) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Individuals => category.contains("Individual"),
            EntityFilter::Physicians => category.contains("Physician"),
            EntityFilter::Businesses => {
                category.contains("Business Entity") || category == "Hospital"
            }
        }
    }
}

/// An entity with its derived sort keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub index: usize,
    #[serde(flatten)]
    pub entity: Entity,
    pub category_label: String,
    pub display_date: Option<String>,
    pub sentence_months: f64,
    pub chrono_key: ChronoKey,
    pub connection_count: usize,
}

impl RankedRow {
    pub fn from_entity(index: usize, entity: &Entity) -> Self {
        Self {
            index,
            category_label: entity.short_label().to_string(),
            display_date: entity.dates.ranking_date().map(str::to_string),
            sentence_months: entity.sentence_months(),
            chrono_key: entity.chrono_key(),
            connection_count: entity.connections.len(),
            entity: entity.clone(),
        }
    }
}

pub fn rank(entities: &[Entity]) -> Vec<RankedRow> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| RankedRow::from_entity(index, entity))
        .collect()
}

pub fn filter_rows(
    rows: Vec<RankedRow>,
    filter: EntityFilter,
) -> Vec<RankedRow> {
    rows.into_iter()
        .filter(|row| filter.matches(&row.entity.category))
        .collect()
}

/// Compare two rows on one field only.
pub fn compare_field(
    a: &RankedRow,
    b: &RankedRow,
    field: SortField,
) -> Ordering {
    match field {
        SortField::Name => compare_text(&a.entity.name, &b.entity.name),
        SortField::Category => {
            compare_text(&a.category_label, &b.category_label)
        }
        SortField::Sentence => a.sentence_months.total_cmp(&b.sentence_months),
        SortField::Date => a.chrono_key.cmp(&b.chrono_key),
        SortField::Connections => a.connection_count.cmp(&b.connection_count),
    }
}

/// Sort in place. The comparator is the field key, then input index; the
/// direction flips the whole comparator, so a descending sort is exactly the
/// reverse of the ascending one.
pub fn sort_rows(rows: &mut [RankedRow], spec: SortSpec) {
    rows.sort_by(|a, b| {
        spec.direction.apply(
            compare_field(a, b, spec.field).then(a.index.cmp(&b.index)),
        )
    });
}

/// Rows for the table view under the given sort and filter.
pub fn table(
    entities: &[Entity],
    spec: SortSpec,
    filter: EntityFilter,
) -> Vec<RankedRow> {
    let mut rows = filter_rows(rank(entities), filter);
    sort_rows(&mut rows, spec);
    rows
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
