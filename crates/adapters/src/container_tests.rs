use super::*;

#[tokio::test]
async fn lifecycle_and_process_capability_round_trip() {
    let mut controller = ContainerController::new();
    controller
        .init_resource("c1", r#"{"image":"nginx","depends_on":["net"]}"#, "")
        .unwrap();

    let deps = controller.dependencies(r#"{"image":"nginx","depends_on":["net"]}"#).await.unwrap();
    assert_eq!(deps, vec!["net".to_string()]);

    controller.start().await.unwrap();
    let state: serde_json::Value = serde_json::from_str(&controller.marshal_state()).unwrap();
    assert_eq!(state, serde_json::json!({"running": true}));

    controller.stop().await.unwrap();
    let state: serde_json::Value = serde_json::from_str(&controller.marshal_state()).unwrap();
    assert_eq!(state, serde_json::json!({"running": false}));
}

#[test]
fn is_process_capable() {
    let mut controller = ContainerController::new();
    assert!(controller.as_process_mut().is_some());
}
