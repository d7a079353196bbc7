use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which sub-investigations of a dataset are analysed.
///
/// An entity is out of scope when its case label contains any excluded
/// substring. Entities without a case label are always in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseScope {
    pub excluded_cases: Vec<String>,
}

impl CaseScope {
    pub fn excluding<I, S>(cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_cases: cases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.excluded_cases.iter().all(|case| case.is_empty())
    }

    pub fn includes(&self, entity: &Entity) -> bool {
        let Some(label) = entity.case_label.as_deref() else {
            return true;
        };
        !self
            .excluded_cases
            .iter()
            .any(|case| !case.is_empty() && label.contains(case.as_str()))
    }

    /// The in-scope entities, in input order.
    pub fn apply(&self, entities: &[Entity]) -> Vec<Entity> {
        let scoped: Vec<Entity> = entities
            .iter()
            .filter(|entity| self.includes(entity))
            .cloned()
            .collect();
        if scoped.len() != entities.len() {
            debug!(
                kept = scoped.len(),
                excluded = entities.len() - scoped.len(),
                "applied case scope"
            );
        }
        scoped
    }
}
