use crate::graph_view::GraphView;
use crate::ranking::{EntityFilter, RankedRow, SortSpec};
use crate::store::Store;
use crate::summary::CaseSummary;
use crate::timeline::TimelineGroup;
use crate::versioned::Memoized;

/// Derived views, recomputed only when the entities or the parameters
/// they depend on change.
pub struct Cache {
    pub graph_view: Memoized<Store, u64, GraphView>,
    pub table: Memoized<Store, (u64, SortSpec, EntityFilter), Vec<RankedRow>>,
    pub timeline: Memoized<Store, u64, Vec<TimelineGroup>>,
    pub summary: Memoized<Store, u64, CaseSummary>,
}

impl Cache {
    pub fn new() -> Self {
        let graph_view = Memoized::new(
            |s: &Store| s.entities.version(),
            |s: &Store| s.graph_view_uncached(),
        );

        let table = Memoized::new(
            |s: &Store| {
                (
                    s.entities.version(),
                    s.view.sort_spec(),
                    s.view.active_filter,
                )
            },
            |s: &Store| s.table_uncached(),
        );

        let timeline = Memoized::new(
            |s: &Store| s.entities.version(),
            |s: &Store| s.timeline_uncached(),
        );

        let summary = Memoized::new(
            |s: &Store| s.entities.version(),
            |s: &Store| s.summary_uncached(),
        );

        Self {
            graph_view,
            table,
            timeline,
            summary,
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
