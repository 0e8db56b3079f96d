use super::*;

#[tokio::test]
async fn every_operation_fails_with_descriptive_error() {
    let mut controller = InvalidController::new("bogus");
    let err = controller.initialize("{}").await.unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("bogus"));

    assert!(controller.refresh("{}").await.is_err());
    assert!(controller.dispose().await.is_err());
    assert!(controller.dependencies("{}").await.is_err());
}

#[test]
fn resource_protocol_is_inert() {
    let mut controller = InvalidController::new("bogus");
    assert!(controller.init_resource("id", "{}", "").is_ok());
    assert_eq!(controller.marshal_state(), "");
}
