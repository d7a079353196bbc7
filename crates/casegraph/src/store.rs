use crate::case_scope::CaseScope;
use crate::detail::EntityDetail;
use crate::entity::Entity;
use crate::graph::{RelationshipGraph, name_lookup};
use crate::graph_view::GraphView;
use crate::layout_settings::{EngineSettings, ForceSettings};
use crate::ranking::{
    self, EntityFilter, RankedRow, SortDirection, SortField, SortSpec,
};
use crate::serialization::{self, Dataset, DatasetError};
use crate::summary::CaseSummary;
use crate::timeline::{self, TimelineGroup};
use crate::versioned::Versioned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    #[default]
    Network,
    Timeline,
}

/// Interaction state shared by the network, table and timeline views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Index into the scoped entity list.
    pub selected: Option<usize>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub active_filter: EntityFilter,
    pub active_tab: ActiveTab,
}

impl ViewState {
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_field, self.sort_direction)
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.sort_field = spec.field;
        self.sort_direction = spec.direction;
    }
}

pub struct Store {
    /// The dataset as loaded, before scoping.
    pub source: Dataset,
    pub scope: CaseScope,
    /// In-scope entities; node ids and row indices refer to this list.
    pub entities: Versioned<Vec<Entity>>,
    /// Rebuilt whenever `entities` changes.
    pub graph: RelationshipGraph,
    pub view: ViewState,
    pub layout_settings: ForceSettings,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(settings: &EngineSettings) -> Self {
        let mut view = ViewState::default();
        view.set_sort(settings.table.sort);
        view.active_filter = settings.table.filter;
        Self {
            source: Dataset::default(),
            scope: settings.scope.clone(),
            entities: Versioned::new(Vec::new()),
            graph: RelationshipGraph::build(&[]),
            view,
            layout_settings: settings.layout.clamped(),
            error_message: None,
        }
    }

    pub fn with_dataset(settings: &EngineSettings, dataset: Dataset) -> Self {
        let mut store = Self::new(settings);
        store.set_dataset(dataset);
        store
    }

    /// Replace the dataset. The selection is cleared since indices change.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.source = dataset;
        self.rescope();
    }

    pub fn set_scope(&mut self, scope: CaseScope) {
        self.scope = scope;
        self.rescope();
    }

    fn rescope(&mut self) {
        let scoped = self.scope.apply(&self.source.entities);
        self.graph = RelationshipGraph::build(&scoped);
        self.entities.set(scoped);
        self.view.selected = None;
        debug!(
            entities = self.entities.get().len(),
            edges = self.graph.edge_count(),
            "dataset in scope rebuilt"
        );
    }

    /// Select by index; an index past the end clears the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.view.selected = match index {
            Some(i) if i < self.entities.get().len() => Some(i),
            Some(i) => {
                warn!(index = i, "selection out of range");
                None
            }
            None => None,
        };
    }

    pub fn select_by_name(&mut self, entity_name: &str) {
        let index = name_lookup(self.entities.get()).get(entity_name).copied();
        if index.is_none() {
            warn!(entity = entity_name, "no entity with that name to select");
        }
        self.view.selected = index;
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.view
            .selected
            .and_then(|index| self.entities.get().get(index))
    }

    pub fn selected_detail(&self) -> Option<EntityDetail> {
        let index = self.view.selected?;
        let entity = self.entities.get().get(index)?;
        Some(EntityDetail::new(index, entity))
    }

    pub fn load_dataset(&mut self, path: &Path) -> Result<(), DatasetError> {
        let dataset = serialization::load_dataset(path)?;
        self.set_dataset(dataset);
        Ok(())
    }

    pub fn save_dataset(&self, path: &Path) -> Result<(), DatasetError> {
        serialization::save_dataset(&self.source, path)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    pub fn graph_view_uncached(&self) -> GraphView {
        GraphView::build(self.entities.get(), &self.graph)
    }

    pub fn table_uncached(&self) -> Vec<RankedRow> {
        ranking::table(
            self.entities.get(),
            self.view.sort_spec(),
            self.view.active_filter,
        )
    }

    pub fn timeline_uncached(&self) -> Vec<TimelineGroup> {
        timeline::reconstruct(self.entities.get())
    }

    pub fn summary_uncached(&self) -> CaseSummary {
        CaseSummary::compute(self.entities.get(), &self.graph)
    }
}
