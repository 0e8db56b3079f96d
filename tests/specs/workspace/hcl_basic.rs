//! HCL basic: same shape as the procfile scenario, native manifest format.

use crate::prelude::*;

const MANIFEST: &str = r#"
process "t0" {
  command = "sleep"
  args    = ["30"]
}
"#;

#[test]
fn hcl_process_reaches_running_after_start() {
    let project = Project::empty();
    project.file("workspace.hcl", MANIFEST);

    project.exo().args(&["apply", "workspace.hcl"]).passes();
    project.exo().args(&["start"]).passes();

    let reached = wait_for(SPEC_WAIT_MAX_MS, || {
        let out = project.exo().args(&["processes"]).passes().stdout();
        out.contains("\"t0\"") && out.contains("running: true")
    });
    assert!(reached, "t0 never reported running\ndaemon log: {}", project.daemon_log());
}
