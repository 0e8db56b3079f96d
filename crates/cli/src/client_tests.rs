use super::*;
use tokio::net::UnixListener;

async fn serve_once(socket_path: &std::path::Path, response: Response) {
    let listener = UnixListener::bind(socket_path).unwrap();
    let (stream, _) = listener.accept().await.unwrap();
    let (mut reader, mut writer) = stream.into_split();
    let _request = protocol_wire::read_request(&mut reader, protocol_wire::DEFAULT_TIMEOUT).await.unwrap();
    protocol_wire::write_response(&mut writer, &response, protocol_wire::DEFAULT_TIMEOUT).await.unwrap();
}

#[tokio::test]
async fn send_round_trips_a_ping() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("daemon.sock");
    let server = tokio::spawn({
        let socket_path = socket_path.clone();
        async move { serve_once(&socket_path, Response::Pong).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    let client = DaemonClient { socket_path };
    let response = client.send(&Request::Ping).await.unwrap();
    assert_eq!(response, Response::Pong);
    server.await.unwrap();
}

#[tokio::test]
async fn call_turns_an_error_response_into_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("daemon.sock");
    let server = tokio::spawn({
        let socket_path = socket_path.clone();
        async move { serve_once(&socket_path, Response::Error { status: 404, message: "no such component: web".to_string() }).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    let client = DaemonClient { socket_path };
    let err = client.call(&Request::Ping).await.unwrap_err();
    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("web"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    server.await.unwrap();
}

#[test]
#[serial_test::serial]
fn connect_without_a_socket_file_reports_daemon_not_running() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("EXO_STATE_DIR", dir.path());
    let err = DaemonClient::connect();
    std::env::remove_var("EXO_STATE_DIR");
    assert!(matches!(err, Err(ClientError::DaemonNotRunning)));
}
