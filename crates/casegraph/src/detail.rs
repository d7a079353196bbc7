use crate::entity::Entity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailConnection {
    pub target: String,
    pub relationship: String,
}

/// Everything the detail panel shows about one selected entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDetail {
    pub index: usize,
    pub name: String,
    pub category_label: String,
    pub role: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub sentence: Option<String>,
    pub plea_date: Option<String>,
    pub conviction_date: Option<String>,
    pub sentencing_date: Option<String>,
    pub case_reference: Option<String>,
    pub scheme_amount: Option<String>,
    pub connections: Vec<DetailConnection>,
    pub enforcement_source: Option<String>,
    pub source_citation: Option<String>,
}

impl EntityDetail {
    pub fn new(index: usize, entity: &Entity) -> Self {
        Self {
            index,
            name: entity.name.clone(),
            category_label: entity.long_label().to_string(),
            role: entity.role_or_function().map(str::to_string),
            specialty: entity.specialty.clone(),
            location: entity.location.clone(),
            sentence: entity.sentence.clone(),
            plea_date: entity.dates.plea.clone(),
            conviction_date: entity.dates.conviction.clone(),
            sentencing_date: entity.dates.sentencing.clone(),
            case_reference: entity.case_reference.clone(),
            scheme_amount: entity.scheme_amount.clone(),
            connections: entity
                .connections
                .iter()
                .map(|c| DetailConnection {
                    target: c.target.clone(),
                    relationship: short_relationship_label(&c.label)
                        .to_string(),
                })
                .collect(),
            enforcement_source: entity.enforcement_source.clone(),
            source_citation: entity.source_citation.clone(),
        }
    }
}

/// "Shared Entity Ownership (via trust)" becomes "Shared Entity Ownership".
pub fn short_relationship_label(label: &str) -> &str {
    let head = match label.find('(') {
        Some(at) => &label[..at],
        None => label,
    };
    head.trim()
}
