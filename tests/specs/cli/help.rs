//! CLI help/version specs.

use crate::prelude::*;

#[test]
fn help_flag_lists_the_workspace_subcommands() {
    cli().args(&["--help"]).passes().stdout_has("Local workload orchestrator").stdout_has("compose2exo").stdout_has("daemon");
}

#[test]
fn version_flag_prints_a_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_subcommand_fails_with_a_usage_message() {
    cli().args(&["not-a-real-command"]).fails();
}
