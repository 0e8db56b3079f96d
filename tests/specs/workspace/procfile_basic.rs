//! Procfile basic: one process reaches `running` after `apply` + `start`.

use crate::prelude::*;

#[test]
fn procfile_process_reaches_running_after_start() {
    let project = Project::empty();
    project.file("Procfile", "t0: sleep 30\n");

    project.exo().args(&["apply", "Procfile"]).passes();
    project.exo().args(&["start"]).passes();

    let reached = wait_for(SPEC_WAIT_MAX_MS, || {
        let out = project.exo().args(&["processes"]).passes().stdout();
        out.contains("t0") && out.contains("running: true")
    });
    assert!(reached, "t0 never reported running\ndaemon log: {}", project.daemon_log());
}
