use super::*;

#[test]
fn infers_format_from_suffix() {
    assert_eq!(Format::from_path_suffix("app.hcl"), Some(Format::Exo));
    assert_eq!(Format::from_path_suffix("app.exo"), Some(Format::Exo));
    assert_eq!(Format::from_path_suffix("docker-compose.yaml"), Some(Format::Compose));
    assert_eq!(Format::from_path_suffix("docker-compose.yml"), Some(Format::Compose));
    assert_eq!(Format::from_path_suffix("Procfile"), Some(Format::Procfile));
    assert_eq!(Format::from_path_suffix("README.md"), None);
}

#[test]
fn format_tag_round_trips() {
    for format in [Format::Exo, Format::Compose, Format::Procfile] {
        assert_eq!(Format::from_tag(format.tag()), Some(format));
    }
}

#[test]
fn parse_dispatches_by_format() {
    let manifest = parse(Format::Procfile, "web: node server.js\n").unwrap();
    assert_eq!(manifest.components["web"].type_, "process");
}

#[test]
fn parse_file_infers_format_and_reads_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Procfile");
    std::fs::write(&path, "web: node server.js\n").unwrap();
    let manifest = parse_file(&path, None).unwrap();
    assert_eq!(manifest.components.len(), 1);
}

#[test]
fn parse_file_rejects_unknown_suffix_without_explicit_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whatever.txt");
    std::fs::write(&path, "web: node server.js\n").unwrap();
    let err = parse_file(&path, None).unwrap_err();
    assert!(matches!(err, ManifestError::UnknownFormat { .. }));
}

#[test]
fn parse_file_honors_explicit_format_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whatever.txt");
    std::fs::write(&path, "web: node server.js\n").unwrap();
    let manifest = parse_file(&path, Some(Format::Procfile)).unwrap();
    assert_eq!(manifest.components.len(), 1);
}
