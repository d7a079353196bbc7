use crate::entity::Entity;
use crate::graph::RelationshipGraph;
use casekeys::months_to_years;
use serde::Serialize;

/// Headline figures for a scoped dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub total_entities: usize,
    pub sentenced_count: usize,
    /// Sum of every sentence's full parse: a months figure when the text
    /// has one, otherwise years x 12. This differs from the published case
    /// total, which adds up months figures only and skips years-only
    /// sentences.
    pub total_prison_months: f64,
    /// Rounded to one decimal place.
    pub total_prison_years: f64,
    pub edge_count: usize,
    pub dropped_connections: usize,
    pub component_count: usize,
}

impl CaseSummary {
    pub fn compute(entities: &[Entity], graph: &RelationshipGraph) -> Self {
        let total_prison_months: f64 =
            entities.iter().map(Entity::sentence_months).sum();
        Self {
            total_entities: entities.len(),
            sentenced_count: entities
                .iter()
                .filter(|entity| entity.sentence.is_some())
                .count(),
            total_prison_months,
            total_prison_years: (months_to_years(total_prison_months) * 10.0)
                .round()
                / 10.0,
            edge_count: graph.edge_count(),
            dropped_connections: graph.dropped().len(),
            component_count: graph.component_count(),
        }
    }

    /// e.g. "12 entities, 7 sentenced, 61.5 years total".
    pub fn headline(&self) -> String {
        format!(
            "{} entities, {} sentenced, {:.1} years total",
            self.total_entities, self.sentenced_count, self.total_prison_years
        )
    }
}
