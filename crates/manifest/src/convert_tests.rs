use super::*;

#[test]
fn renders_process_and_container_blocks() {
    let yaml = "
services:
  web:
    image: nginx:1
    depends_on:
      - db
  db:
    image: postgres:16
";
    let rendered = compose_to_exo(yaml).unwrap();
    assert!(rendered.contains("container \"web\""));
    assert!(rendered.contains("image = \"nginx:1\""));
    assert!(rendered.contains("depends_on = [\"db\"]"));
    assert!(rendered.contains("container \"db\""));
}

#[test]
fn round_trips_through_the_hcl_parser() {
    let yaml = "
services:
  web:
    image: nginx:1
";
    let rendered = compose_to_exo(yaml).unwrap();
    let reparsed = crate::hcl::parse(&rendered).unwrap();
    assert_eq!(reparsed.components.len(), 1);
    assert_eq!(reparsed.components["web"].type_, "container");
}

#[test]
fn unsupported_component_type_is_skipped_with_a_comment() {
    let mut manifest = Manifest::new();
    manifest.insert("logs".to_string(), "log", "{}");
    let rendered = render_hcl(&manifest).unwrap();
    assert!(rendered.contains("skipped component"));
}
