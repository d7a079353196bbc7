use crate::case_scope::CaseScope;
use crate::effects::Effect;
use crate::ranking::{EntityFilter, SortDirection, SortField, SortSpec};
use crate::serialization::Dataset;
use crate::store::{ActiveTab, Store};
use std::path::PathBuf;

/// Actions that can be dispatched to modify the session
#[derive(Debug, Clone)]
pub enum Action {
    // Data
    /// Swap in a new dataset; all views and the layout start over
    ReplaceDataset { dataset: Dataset },
    /// Change which sub-investigations are analysed
    SetCaseScope { scope: CaseScope },

    // Selection
    /// Select an entity by its index in the scoped list (node id / row index)
    SelectEntity { index: Option<usize> },
    /// Select an entity by name, as a timeline click does
    SelectEntityByName { name: String },
    ClearSelection,

    // Table
    /// Header click: toggle direction on the active field, else sort the
    /// new field descending
    SortBy { field: SortField },
    SetSort {
        field: SortField,
        direction: SortDirection,
    },
    SetFilter { filter: EntityFilter },

    SetActiveTab { tab: ActiveTab },

    // File Operations
    LoadDataset { path: PathBuf },
    SaveDataset { path: PathBuf },
    /// Clear any error message
    ClearErrorMessage,
}

/// Apply a single action to the store
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        Action::ReplaceDataset { dataset } => {
            store.set_dataset(dataset);
            vec![]
        }
        Action::SetCaseScope { scope } => {
            store.set_scope(scope);
            vec![]
        }
        Action::SelectEntity { index } => {
            store.select(index);
            vec![]
        }
        Action::SelectEntityByName { name } => {
            store.select_by_name(&name);
            vec![]
        }
        Action::ClearSelection => {
            store.view.selected = None;
            vec![]
        }
        Action::SortBy { field } => {
            let spec = store.view.sort_spec().toggled(field);
            store.view.set_sort(spec);
            vec![]
        }
        Action::SetSort { field, direction } => {
            store.view.set_sort(SortSpec::new(field, direction));
            vec![]
        }
        Action::SetFilter { filter } => {
            store.view.active_filter = filter;
            vec![]
        }
        Action::SetActiveTab { tab } => {
            store.view.active_tab = tab;
            vec![]
        }
        Action::LoadDataset { path } => {
            vec![Effect::LoadDataset { path }]
        }
        Action::SaveDataset { path } => {
            vec![Effect::SaveDataset { path }]
        }
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::layout_settings::EngineSettings;

    fn store() -> Store {
        Store::with_dataset(
            &EngineSettings::default(),
            Dataset::new(vec![
                Entity::new("A", "Hospital"),
                Entity::new("B", "Individual - Physician"),
            ]),
        )
    }

    #[test]
    fn header_clicks_toggle_sort() {
        let mut store = store();
        update(&mut store, Action::SortBy { field: SortField::Sentence });
        assert_eq!(store.view.sort_direction, SortDirection::Ascending);
        update(&mut store, Action::SortBy { field: SortField::Name });
        assert_eq!(
            store.view.sort_spec(),
            SortSpec::new(SortField::Name, SortDirection::Descending)
        );
    }

    #[test]
    fn file_actions_become_effects() {
        let mut store = store();
        let effects = update(
            &mut store,
            Action::LoadDataset {
                path: PathBuf::from("case.json"),
            },
        );
        assert!(matches!(effects.as_slice(), [Effect::LoadDataset { .. }]));
        assert_eq!(store.entities.get().len(), 2, "reducer does no IO");
    }

    #[test]
    fn selection_and_filters() {
        let mut store = store();
        update(&mut store, Action::SelectEntity { index: Some(1) });
        assert_eq!(store.view.selected, Some(1));
        let filter = EntityFilter::Businesses;
        update(&mut store, Action::SetFilter { filter });
        assert_eq!(store.view.selected, Some(1), "filters keep the selection");
        update(&mut store, Action::ClearSelection);
        assert_eq!(store.view.selected, None);

        store.error_message = Some("boom".into());
        update(&mut store, Action::ClearErrorMessage);
        assert!(store.error_message.is_none());
    }
}
