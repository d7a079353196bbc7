use casegraph::layout_force::LayoutPhase;
use casegraph::native::{self, CliError};
use casegraph::serialization::load_dataset;
use casegraph::timeline::EventKind;
use casegraph::{
    Action, ActiveTab, CaseScope, EngineSettings, EntityFilter, Point,
    SortField, State, StepOutcome, Store,
};
use clap::error::ErrorKind;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/sample_case.json")
}

fn scoped_session() -> State {
    let settings = EngineSettings {
        scope: CaseScope::excluding(["2024 National Health Care Fraud"]),
        ..EngineSettings::default()
    };
    let dataset = load_dataset(&fixture()).expect("fixture loads");
    State::new(Store::with_dataset(&settings, dataset))
}

#[test]
fn fixture_builds_expected_graph() {
    let dataset = load_dataset(&fixture()).unwrap();
    assert_eq!(
        dataset.metadata.title.as_deref(),
        Some("Lakeside Surgical Network")
    );
    assert_eq!(dataset.entities.len(), 7);

    let store = Store::with_dataset(&EngineSettings::default(), dataset);
    let mut state = State::new(store);
    let summary = state.summary().clone();
    assert_eq!(summary.total_entities, 7);
    assert_eq!(summary.edge_count, 5);
    assert_eq!(summary.dropped_connections, 1);
    assert_eq!(summary.component_count, 3);

    let graph = state.graph_view();
    let labels: Vec<_> =
        graph.edges.iter().map(|e| e.tooltip_label.as_str()).collect();
    assert_eq!(labels[3], "Shared Entity Ownership (via trust)");
    assert!(graph.edges.iter().all(|e| e.from < e.to));
    assert_eq!(graph.nodes[0].style.color, "#ef4444");
}

#[test]
fn scoped_session_views() {
    let mut state = scoped_session();
    assert_eq!(state.store.entities.get().len(), 6);

    let summary = state.summary().clone();
    assert_eq!(summary.sentenced_count, 3);
    assert_eq!(summary.total_prison_months, 117.0);
    assert_eq!(summary.total_prison_years, 9.8);
    assert_eq!(summary.component_count, 2);

    let order: Vec<_> = state.table().iter().map(|row| row.index).collect();
    assert_eq!(order, vec![1, 3, 5, 4, 2, 0]);

    let timeline = state.timeline().to_vec();
    let dates: Vec<_> = timeline.iter().map(|g| g.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["June 2, 2018", "March 14, 2019", "October 3, 2020"]
    );
    assert_eq!(timeline[1].events.len(), 2);
    assert!(timeline[1].events.iter().all(|e| e.kind == EventKind::Plea));
    assert_eq!(timeline[2].events[0].kind, EventKind::Sentencing);
}

#[test]
fn interactions_drive_shared_selection() {
    let mut state = scoped_session();

    state.apply(Action::SetFilter { filter: EntityFilter::Physicians });
    let rows = state.table().to_vec();
    assert_eq!(rows.len(), 1);

    // Clicking the row selects the same entity the network shows.
    state.apply(Action::SelectEntity { index: Some(rows[0].index) });
    let detail = state.store.selected_detail().expect("selected");
    assert_eq!(detail.name, "Dr. Alice Morgan");
    assert_eq!(detail.role.as_deref(), Some("Medical director"));
    assert_eq!(detail.connections[1].relationship, "Shared Entity Ownership");

    state.apply(Action::SelectEntityByName { name: "Carl Dunn".into() });
    assert_eq!(state.store.view.selected, Some(3));

    state.apply(Action::SortBy { field: SortField::Name });
    state.apply(Action::SetActiveTab { tab: ActiveTab::Timeline });
    let snapshot = state.snapshot();
    assert_eq!(snapshot.view.active_tab, ActiveTab::Timeline);
    assert_eq!(
        snapshot.selected.map(|d| d.name),
        Some("Carl Dunn".to_string())
    );
}

#[test]
fn layout_session() {
    let mut state = scoped_session();
    let first = state.ticket().expect("layout started");

    let mut steps = 0;
    loop {
        match state.tick() {
            StepOutcome::Running { .. } => steps += 1,
            outcome => {
                assert!(outcome.is_terminal(), "unexpected {outcome:?}");
                break;
            }
        }
        assert!(steps <= 150);
    }
    assert_eq!(state.layout().phase(), LayoutPhase::Frozen);

    // Drag while frozen moves just that node.
    let before = state.layout().positions();
    assert!(state.drag_node(2, Point::new(10.0, 10.0)));
    let after = state.layout().positions();
    assert_eq!(after[2], Point::new(10.0, 10.0));
    assert_eq!(after[0], before[0]);
    state.release_node();

    // Changing scope starts a fresh run and retires the old ticket.
    state.apply(Action::SetCaseScope { scope: CaseScope::default() });
    assert_ne!(state.ticket(), Some(first));
    assert_eq!(state.layout().positions().len(), 7);
    assert!(state.snapshot().positions.positions.len() == 7);
}

fn arg_error(args: &[&str]) -> ErrorKind {
    match native::run(args.iter().copied()) {
        Err(CliError::Args(e)) => e.kind(),
        other => panic!("expected an argument error, got {other:?}"),
    }
}

#[test]
fn cli_runs_on_fixture() {
    let dataset = fixture().display().to_string();
    native::run(["casegraph", dataset.as_str()]).expect("cli succeeds");
}

#[test]
fn cli_help_and_usage_come_from_the_parser() {
    // `--help` is never mistaken for a dataset path.
    assert_eq!(arg_error(&["casegraph", "--help"]), ErrorKind::DisplayHelp);
    assert_eq!(
        arg_error(&["casegraph", "--version"]),
        ErrorKind::DisplayVersion
    );
    assert_eq!(
        arg_error(&["casegraph"]),
        ErrorKind::MissingRequiredArgument
    );
    assert!(matches!(
        native::run(["casegraph", "a.json", "b.json", "c.json"]),
        Err(CliError::Args(_))
    ));
}

#[test]
fn cli_reports_missing_files() {
    assert!(matches!(
        native::run(["casegraph", "/nonexistent/casegraph.json"]),
        Err(CliError::Dataset(_))
    ));
    let dataset = fixture().display().to_string();
    assert!(matches!(
        native::run(["casegraph", dataset.as_str(), "/missing/settings.json"]),
        Err(CliError::Settings(_))
    ));
}
