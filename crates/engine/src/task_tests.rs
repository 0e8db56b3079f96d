use super::*;
use exo_core::ExoError;

#[tokio::test]
async fn start_task_is_immediately_running() {
    let tracker = Tracker::new();
    let root = tracker.start_task("apply");
    let record = tracker.task(root.as_str()).unwrap();
    assert_eq!(record.status, TaskStatus::Running);
    assert!(record.started.is_some());
    assert!(record.ended.is_none());
}

#[tokio::test]
async fn finish_succeeds_when_every_child_succeeds() {
    let tracker = Tracker::new();
    let root = tracker.start_task("refresh-all");
    tracker.go(&root, "refresh a", async { Ok(()) });
    tracker.go(&root, "refresh b", async { Ok(()) });

    tracker.finish(&root).await.unwrap();
    let record = tracker.task(root.as_str()).unwrap();
    assert_eq!(record.status, TaskStatus::Success);
    assert!(record.ended.is_some());
}

#[tokio::test]
async fn a_failed_child_does_not_cancel_siblings_but_fails_the_root() {
    let tracker = Tracker::new();
    let root = tracker.start_task("refresh-all");
    let ok_child = tracker.go(&root, "refresh a", async { Ok(()) });
    let failing_child = tracker.go(&root, "refresh b", async {
        Err(ExoError::Provider("boom".to_string()))
    });

    tracker.finish(&root).await.unwrap();

    assert_eq!(tracker.task(ok_child.as_str()).unwrap().status, TaskStatus::Success);
    let failed = tracker.task(failing_child.as_str()).unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("provider error: boom"));
    assert_eq!(tracker.task(root.as_str()).unwrap().status, TaskStatus::Failed);
}

#[tokio::test]
async fn finish_with_no_children_succeeds_trivially() {
    let tracker = Tracker::new();
    let root = tracker.start_task("noop");
    tracker.finish(&root).await.unwrap();
    assert_eq!(tracker.task(root.as_str()).unwrap().status, TaskStatus::Success);
}

#[tokio::test]
async fn finish_on_unknown_task_is_not_found() {
    let tracker = Tracker::new();
    let bogus = exo_core::JobId::new("nope");
    let err = tracker.finish(&bogus).await.unwrap_err();
    assert!(matches!(err, ExoError::NotFound(_)));
}
