use casekeys::{ChronoKey, sentence_months};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CATEGORY: &str = "Unknown";
pub const UNKNOWN_RELATIONSHIP: &str = "Unknown";

/// A one-directional reference from an entity to another entity's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub target: String,
    pub label: String,
}

impl Connection {
    pub fn new(target: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Procedural dates as written in the source records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conviction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentencing: Option<String>,
}

impl KeyDates {
    /// The date used to rank an entity: conviction, then plea, then
    /// sentencing.
    pub fn ranking_date(&self) -> Option<&str> {
        self.conviction
            .as_deref()
            .or(self.plea.as_deref())
            .or(self.sentencing.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.plea.is_none()
            && self.conviction.is_none()
            && self.sentencing.is_none()
    }
}

/// A person or organisation in an investigation dataset.
///
/// `name` is the only key other entities use to refer to this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default)]
    pub dates: KeyDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_citation: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            connections: Vec::new(),
            role: None,
            function: None,
            specialty: None,
            sentence: None,
            dates: KeyDates::default(),
            location: None,
            case_reference: None,
            scheme_amount: None,
            case_label: None,
            enforcement_source: None,
            source_citation: None,
        }
    }

    pub fn with_connection(
        mut self,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.connections.push(Connection::new(target, label));
        self
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    pub fn with_plea_date(mut self, date: impl Into<String>) -> Self {
        self.dates.plea = Some(date.into());
        self
    }

    pub fn with_conviction_date(mut self, date: impl Into<String>) -> Self {
        self.dates.conviction = Some(date.into());
        self
    }

    pub fn with_sentencing_date(mut self, date: impl Into<String>) -> Self {
        self.dates.sentencing = Some(date.into());
        self
    }

    pub fn with_case(mut self, case_label: impl Into<String>) -> Self {
        self.case_label = Some(case_label.into());
        self
    }

    pub fn sentence_months(&self) -> f64 {
        self.sentence.as_deref().map(sentence_months).unwrap_or(0.0)
    }

    pub fn chrono_key(&self) -> ChronoKey {
        ChronoKey::parse_opt(self.dates.ranking_date())
    }

    pub fn role_or_function(&self) -> Option<&str> {
        self.role.as_deref().or(self.function.as_deref())
    }

    /// Compact category label used in table cells.
    pub fn short_label(&self) -> &str {
        category_label(&self.category, "Healthcare Pro")
    }

    /// Category label used in the detail panel.
    pub fn long_label(&self) -> &str {
        category_label(&self.category, "Healthcare Professional")
    }
}

fn category_label<'a>(category: &'a str, healthcare: &'static str) -> &'a str {
    if category == "Hospital" {
        "Hospital"
    } else if category.contains("Physician") {
        "Physician"
    } else if category.contains("Business Owner") {
        "Business Owner"
    } else if category.contains("Licensed Healthcare") {
        healthcare
    } else if category.contains("Business Entity") {
        "Business Entity"
    } else {
        category
    }
}
