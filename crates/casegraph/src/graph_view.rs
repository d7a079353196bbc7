// Render-ready node and edge collections for the network view

use crate::entity::Entity;
use crate::graph::RelationshipGraph;
use crate::node_styles::{
    EdgeStyle, NodeStyle, display_label, edge_style, node_style,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: usize,
    pub label: String,
    /// Full name, shown on hover.
    pub title: String,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    pub style: EdgeStyle,
    pub tooltip_label: String,
}

/// Immutable snapshot of the network. Positions live in the layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    pub fn build(entities: &[Entity], graph: &RelationshipGraph) -> Self {
        let nodes = entities
            .iter()
            .enumerate()
            .map(|(id, entity)| NodeView {
                id,
                label: display_label(&entity.name),
                title: entity.name.clone(),
                style: node_style(&entity.category),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| EdgeView {
                id: edge.id,
                from: edge.from,
                to: edge.to,
                style: edge_style(&edge.label),
                tooltip_label: edge.label.clone(),
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn node(&self, id: usize) -> Option<&NodeView> {
        self.nodes.get(id)
    }

    /// Edges touching `node`, used to highlight a selection.
    pub fn incident_edges(
        &self,
        node: usize,
    ) -> impl Iterator<Item = &EdgeView> {
        self.edges
            .iter()
            .filter(move |edge| edge.from == node || edge.to == node)
    }
}
