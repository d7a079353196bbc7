//! Entity relationship analysis for investigation datasets.
//!
//! Raw records are normalized into [`Entity`] values once per dataset. From
//! them the crate derives a relationship graph, a force-directed layout, a
//! ranked and filterable table, and a reconstructed timeline. [`State`]
//! coordinates these for an interactive session.

pub mod actions;
pub mod cache;
pub mod case_scope;
pub mod detail;
pub mod effects;
pub mod entity;
pub mod graph;
pub mod graph_view;
pub mod layout_force;
pub mod layout_settings;
pub mod native;
pub mod node_styles;
pub mod normalize;
pub mod ranking;
pub mod serialization;
pub mod state;
pub mod store;
pub mod summary;
pub mod timeline;
pub mod versioned;

pub use actions::Action;
pub use case_scope::CaseScope;
pub use entity::{Connection, Entity, KeyDates};
pub use graph::RelationshipGraph;
pub use layout_force::{ForceLayout, Point, RunTicket, StepOutcome};
pub use layout_settings::{EngineSettings, ForceSettings};
pub use normalize::{NormalizeError, normalize};
pub use ranking::{EntityFilter, SortDirection, SortField, SortSpec};
pub use serialization::{Dataset, DatasetError, ViewSnapshot};
pub use state::State;
pub use store::{ActiveTab, Store, ViewState};
