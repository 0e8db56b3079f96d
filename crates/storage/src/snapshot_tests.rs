use super::*;
use exo_core::{ComponentId, ComponentRecord, WorkspaceId};
use tempfile::tempdir;

fn sample_state() -> MaterializedState {
    let mut state = MaterializedState::default();
    state.components.insert(
        "c1".to_string(),
        ComponentRecord {
            id: ComponentId::new("c1"),
            workspace_id: WorkspaceId::new("ws-1"),
            name: "web".to_string(),
            type_: "process".to_string(),
            spec: "{}".to_string(),
            state: "running".to_string(),
            created: "2026-01-01T00:00:00Z".to_string(),
            initialized: None,
            disposed: None,
        },
    );
    state
}

#[test]
fn load_of_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("missing.json"));
    assert!(snapshot.load().unwrap().is_none());
}

#[test]
fn write_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let snapshot = Snapshot::new(dir.path().join("nested").join("state.json"));
    let state = sample_state();

    snapshot.write(&state).unwrap();
    let loaded = snapshot.load().unwrap().unwrap();
    assert_eq!(loaded.components["c1"].state, "running");
}

#[test]
fn write_is_atomic_no_tmp_left_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let snapshot = Snapshot::new(&path);
    snapshot.write(&sample_state()).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}
