//! Container basic: same shape as the process scenario, using the
//! container controller's simulated running flag.

use crate::prelude::*;

const MANIFEST: &str = r#"
container "cache" {
  image = "redis:7"
}
"#;

#[test]
fn container_reaches_running_after_start() {
    let project = Project::empty();
    project.file("workspace.hcl", MANIFEST);

    project.exo().args(&["apply", "workspace.hcl"]).passes();
    project.exo().args(&["start"]).passes();

    let reached = wait_for(SPEC_WAIT_MAX_MS, || {
        let out = project.exo().args(&["processes"]).passes().stdout();
        out.contains("\"cache\"") && out.contains("running: true")
    });
    assert!(reached, "cache never reported running\ndaemon log: {}", project.daemon_log());
}
