use super::*;

fn spec_json(command: &str, args: &[&str]) -> String {
    serde_json::json!({
        "command": command,
        "args": args,
    })
    .to_string()
}

#[tokio::test]
async fn start_spawns_and_records_pid() {
    let registry = new_registry();
    let mut controller = ProcessController::new(registry.clone());
    controller.init_resource("c1", &spec_json("sleep", &["30"]), "").unwrap();

    controller.start().await.unwrap();
    assert!(controller.state.pid.is_some());
    assert!(registry.lock().await.contains_key("c1"));

    controller.stop().await.unwrap();
    assert!(!registry.lock().await.contains_key("c1"));
    let state: serde_json::Value = serde_json::from_str(&controller.marshal_state()).unwrap();
    assert_eq!(state, serde_json::json!({"running": false, "pid": null}));
}

#[tokio::test]
async fn dispose_stops_a_running_process() {
    let registry = new_registry();
    let mut controller = ProcessController::new(registry.clone());
    controller.init_resource("c1", &spec_json("sleep", &["30"]), "").unwrap();
    controller.start().await.unwrap();

    controller.dispose().await.unwrap();
    assert!(!registry.lock().await.contains_key("c1"));
}

#[tokio::test]
async fn dependencies_reads_depends_on_from_spec() {
    let registry = new_registry();
    let controller = ProcessController::new(registry);
    let spec = serde_json::json!({
        "command": "true",
        "depends_on": ["db", "cache"],
    })
    .to_string();

    let deps = controller.dependencies(&spec).await.unwrap();
    assert_eq!(deps, vec!["db".to_string(), "cache".to_string()]);
}

#[tokio::test]
async fn start_of_unknown_command_surfaces_provider_error() {
    let registry = new_registry();
    let mut controller = ProcessController::new(registry);
    controller
        .init_resource("c1", &spec_json("definitely-not-a-real-binary", &[]), "")
        .unwrap();

    let err = controller.start().await.unwrap_err();
    assert_eq!(err.status(), 500);
}
