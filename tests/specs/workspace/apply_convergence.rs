//! Apply convergence: re-applying a manifest disposes dropped components,
//! recreates changed ones under the same name, and creates new ones.

use crate::prelude::*;

#[test]
fn apply_converges_to_the_new_manifest_shape() {
    let project = Project::empty();

    project.file("first.hcl", "process \"a\" {\n  command = \"sleep\"\n  args = [\"30\"]\n}\nprocess \"b\" {\n  command = \"sleep\"\n  args = [\"30\"]\n}\n");
    project.exo().args(&["apply", "first.hcl"]).passes();

    let after_first = project.exo().args(&["ps"]).passes().stdout();
    assert!(after_first.contains("\ta\n"));
    assert!(after_first.contains("\tb\n"));

    project.file("second.hcl", "process \"b\" {\n  command = \"sleep\"\n  args = [\"60\"]\n}\nprocess \"c\" {\n  command = \"sleep\"\n  args = [\"30\"]\n}\n");
    project.exo().args(&["apply", "second.hcl"]).passes();

    let after_second = project.exo().args(&["ps"]).passes().stdout();
    assert!(!after_second.contains("\ta\n"), "disposed component a should no longer be listed\n{after_second}");
    assert!(after_second.contains("\tb\n"));
    assert!(after_second.contains("\tc\n"));
}
