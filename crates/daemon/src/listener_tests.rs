use super::*;
use exo_controllers::new_process_registry;

fn test_ctx() -> (ListenCtx, tempfile::TempDir, tempfile::TempDir) {
    let (store, store_dir) = Store::open_temp();
    let (logs, logs_dir) = LogStore::open_temp();
    let ctx = ListenCtx { store: Arc::new(store), logs: Arc::new(logs), registry: new_process_registry(), tracker: Tracker::new() };
    (ctx, store_dir, logs_dir)
}

#[tokio::test]
async fn ping_responds_with_pong() {
    let (ctx, _sd, _ld) = test_ctx();
    assert_eq!(route(&ctx, Request::Ping).await, Response::Pong);
}

#[tokio::test]
async fn create_then_describe_components_round_trips() {
    let (ctx, _sd, _ld) = test_ctx();
    let root = "/tmp/ws-listener-a".to_string();

    let created = dispatch(
        &ctx,
        Request::CreateComponent { root: root.clone(), name: "net".to_string(), type_: "network".to_string(), spec: "{}".to_string() },
    )
    .await
    .unwrap();
    let id = match created {
        Response::Created { id } => id,
        other => panic!("expected Created, got {other:?}"),
    };

    let described = dispatch(&ctx, Request::DescribeComponents { root, ids: None, types: None, include_disposed: false }).await.unwrap();
    match described {
        Response::Components { components } => {
            assert_eq!(components.len(), 1);
            assert_eq!(components[0].id.as_str(), id);
        }
        other => panic!("expected Components, got {other:?}"),
    }
}

#[tokio::test]
async fn apply_without_source_or_path_is_a_validation_error() {
    let (ctx, _sd, _ld) = test_ctx();
    let err = dispatch(&ctx, Request::Apply { root: "/tmp/ws-listener-b".to_string(), format: None, path: None, source: None }).await.unwrap_err();
    assert!(matches!(err, ExoError::Validation(_)));
}

#[tokio::test]
async fn describe_components_rejects_unknown_type_tag() {
    let (ctx, _sd, _ld) = test_ctx();
    let err = dispatch(
        &ctx,
        Request::DescribeComponents { root: "/tmp/ws-listener-c".to_string(), ids: None, types: Some(vec!["spaceship".to_string()]), include_disposed: false },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ExoError::Validation(_)));
}

#[tokio::test]
async fn start_component_on_unknown_ref_surfaces_as_error_response() {
    let (ctx, _sd, _ld) = test_ctx();
    let response = route(&ctx, Request::StartComponent { root: "/tmp/ws-listener-d".to_string(), ref_: "nope".to_string() }).await;
    match response {
        Response::Error { status, .. } => assert_eq!(status, 400),
        other => panic!("expected Error, got {other:?}"),
    }
}
