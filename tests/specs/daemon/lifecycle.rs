//! Daemon start/stop/restart lifecycle and second-instance handling.

use crate::prelude::*;

#[test]
fn daemon_start_then_stop_round_trips() {
    let project = Project::empty();

    project.exo().args(&["daemon", "status"]).passes().stdout_has("not running");

    project.exo().args(&["daemon", "start"]).passes();
    let up = wait_for(SPEC_WAIT_MAX_MS, || project.exo().args(&["daemon", "status"]).passes().stdout().contains("exod is running"));
    assert!(up, "daemon never came up\ndaemon log: {}", project.daemon_log());

    project.exo().args(&["daemon", "stop"]).passes();
    let down = wait_for(SPEC_WAIT_MAX_MS, || !project.exo().args(&["daemon", "status"]).passes().stdout().contains("exod is running"));
    assert!(down, "daemon never stopped\ndaemon log: {}", project.daemon_log());
}

#[test]
fn a_second_daemon_start_reuses_the_running_instance() {
    let project = Project::empty();

    project.exo().args(&["daemon", "start"]).passes();
    let up = wait_for(SPEC_WAIT_MAX_MS, || project.exo().args(&["daemon", "status"]).passes().stdout().contains("exod is running"));
    assert!(up, "daemon never came up\ndaemon log: {}", project.daemon_log());

    // A workspace command should reuse the already-running daemon rather
    // than failing because the lock is held.
    project.file("Procfile", "t0: sleep 30\n");
    project.exo().args(&["apply", "Procfile"]).passes();
}

#[test]
fn commands_auto_start_the_daemon_on_first_use() {
    let project = Project::empty();
    project.file("Procfile", "t0: sleep 30\n");

    project.exo().args(&["apply", "Procfile"]).passes();
    project.exo().args(&["daemon", "status"]).passes().stdout_has("exod is running");
}
