use crate::actions::{self, Action};
use crate::cache::Cache;
use crate::effects::{self, Effect};
use crate::graph_view::GraphView;
use crate::layout_force::{ForceLayout, Point, RunTicket, StepOutcome};
use crate::ranking::RankedRow;
use crate::serialization::ViewSnapshot;
use crate::store::Store;
use crate::summary::CaseSummary;
use crate::timeline::TimelineGroup;

/// A running analysis session: the store, its cached views and the layout
/// of the current entity set.
pub struct State {
    pub store: Store,
    pub cache: Cache,
    layout: ForceLayout,
    /// Entity version the layout was started for.
    layout_version: Option<u64>,
    ticket: Option<RunTicket>,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store) -> Self {
        let layout = ForceLayout::new(store.layout_settings);
        let mut state = Self {
            store,
            cache: Cache::new(),
            layout,
            layout_version: None,
            ticket: None,
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        };
        state.ensure_layout_fresh();
        state
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
        self.ensure_layout_fresh();
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            effects::run(&mut self.store, effect);
        }
        self.ensure_layout_fresh();
    }

    /// Dispatch, reduce and run effects in one go.
    pub fn apply(&mut self, action: Action) {
        self.dispatch(action);
        self.flush_actions();
        self.flush_effects();
    }

    /// Start a new layout run when the entity set changed. The previous
    /// run's ticket goes stale.
    fn ensure_layout_fresh(&mut self) {
        let version = self.store.entities.version();
        if self.layout_version != Some(version) {
            self.ticket = Some(self.layout.start(&self.store.graph));
            self.layout_version = Some(version);
        }
    }

    // ------------------------------------------------------------------
    // Layout scheduling
    // ------------------------------------------------------------------

    /// One cooperative layout step for the current run.
    pub fn tick(&mut self) -> StepOutcome {
        match self.ticket {
            Some(ticket) => self.layout.step(ticket),
            None => StepOutcome::Idle,
        }
    }

    pub fn run_layout(&mut self) -> StepOutcome {
        match self.ticket {
            Some(ticket) => self.layout.run_to_end(ticket),
            None => StepOutcome::Idle,
        }
    }

    pub fn ticket(&self) -> Option<RunTicket> {
        self.ticket
    }

    pub fn drag_node(&mut self, node: usize, to: Point) -> bool {
        self.layout.drag(node, to)
    }

    pub fn release_node(&mut self) {
        self.layout.release();
    }

    pub fn reset_layout(&mut self) -> RunTicket {
        let ticket = self.layout.reset();
        self.ticket = Some(ticket);
        ticket
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn graph_view(&mut self) -> &GraphView {
        self.cache.graph_view.get(&self.store)
    }

    pub fn table(&mut self) -> &[RankedRow] {
        self.cache.table.get(&self.store)
    }

    pub fn timeline(&mut self) -> &[TimelineGroup] {
        self.cache.timeline.get(&self.store)
    }

    pub fn summary(&mut self) -> &CaseSummary {
        self.cache.summary.get(&self.store)
    }

    pub fn snapshot(&mut self) -> ViewSnapshot {
        ViewSnapshot {
            metadata: self.store.source.metadata.clone(),
            summary: self.summary().clone(),
            graph: self.graph_view().clone(),
            positions: self.layout.frame(),
            table: self.table().to_vec(),
            timeline: self.timeline().to_vec(),
            view: self.store.view.clone(),
            selected: self.store.selected_detail(),
        }
    }
}
