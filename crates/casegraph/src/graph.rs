// Relationship graph - entities as nodes, deduplicated connections as edges

use crate::entity::Entity;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// An undirected edge between two entity indices, `from < to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    pub label: String,
}

/// A declared connection whose target name matched no entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedConnection {
    pub source: usize,
    pub target_name: String,
    pub label: String,
}

/// Node weight is the entity's input index; edge weight is the edge id.
pub type EntityGraph = UnGraph<usize, usize>;

#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    graph: EntityGraph,
    edges: Vec<GraphEdge>,
    dropped: Vec<DroppedConnection>,
}

/// Name to input index. When names repeat, the last entity wins.
pub fn name_lookup(entities: &[Entity]) -> HashMap<&str, usize> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| (entity.name.as_str(), index))
        .collect()
}

impl RelationshipGraph {
    /// Build the graph. Node `i` is `entities[i]`.
    ///
    /// A connection from entity `i` to entity `j` becomes an edge only when
    /// `i < j`, so a mutual pair yields one edge labelled from the earlier
    /// entity. Repeated declarations, self references and unresolved names
    /// produce no edge.
    pub fn build(entities: &[Entity]) -> Self {
        let lookup = name_lookup(entities);
        let mut graph =
            EntityGraph::with_capacity(entities.len(), entities.len());
        for index in 0..entities.len() {
            graph.add_node(index);
        }

        let mut edges = Vec::new();
        let mut dropped = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for (i, entity) in entities.iter().enumerate() {
            for connection in &entity.connections {
                let Some(&j) = lookup.get(connection.target.as_str()) else {
                    debug!(
                        source = %entity.name,
                        missing = %connection.target,
                        "dropping connection to unknown entity"
                    );
                    dropped.push(DroppedConnection {
                        source: i,
                        target_name: connection.target.clone(),
                        label: connection.label.clone(),
                    });
                    continue;
                };
                if i >= j || !seen.insert((i, j)) {
                    continue;
                }
                let id = edges.len();
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), id);
                edges.push(GraphEdge {
                    id,
                    from: i,
                    to: j,
                    label: connection.label.clone(),
                });
            }
        }

        if !dropped.is_empty() {
            info!(
                dropped = dropped.len(),
                "connections referenced entities missing from the dataset"
            );
        }

        Self {
            graph,
            edges,
            dropped,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn dropped(&self) -> &[DroppedConnection] {
        &self.dropped
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn degree(&self, node: usize) -> usize {
        if node >= self.node_count() {
            return 0;
        }
        self.graph.edges(NodeIndex::new(node)).count()
    }

    /// Neighbouring entity indices, ascending.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        if node >= self.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(node))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.node_count()
            && b < self.node_count()
            && self
                .graph
                .find_edge(NodeIndex::new(a), NodeIndex::new(b))
                .is_some()
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }
}
