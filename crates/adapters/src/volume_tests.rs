use super::*;

#[tokio::test]
async fn initialize_marks_provisioned_and_dispose_clears_it() {
    let mut controller = VolumeController::new();
    controller.initialize("{}").await.unwrap();
    let state: serde_json::Value = serde_json::from_str(&controller.marshal_state()).unwrap();
    assert_eq!(state, serde_json::json!({"provisioned": true}));

    controller.dispose().await.unwrap();
    let state: serde_json::Value = serde_json::from_str(&controller.marshal_state()).unwrap();
    assert_eq!(state, serde_json::json!({"provisioned": false}));
}

#[test]
fn has_no_process_capability() {
    let mut controller = VolumeController::new();
    assert!(controller.as_process_mut().is_none());
}
