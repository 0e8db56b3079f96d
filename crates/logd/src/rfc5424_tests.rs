use super::*;

fn packet(app_name: &str, msg_id: &str, message: &str) -> String {
    format!("<14>1 2026-01-01T00:00:00.123456Z host {app_name} 123 {msg_id} - {message}")
}

#[test]
fn parses_well_formed_record() {
    let record = parse(packet("c01abc", "out", "hello world").as_bytes()).unwrap();
    assert_eq!(record.app_name, "c01abc");
    assert_eq!(record.msg_id, "out");
    assert_eq!(record.timestamp, "2026-01-01T00:00:00.123456Z");
    assert_eq!(record.message, "hello world");
    assert_eq!(record.stream(), "c01abc:out");
}

#[test]
fn rejects_unexpected_msgid() {
    let err = parse(packet("c01abc", "debug", "hello").as_bytes()).unwrap_err();
    assert_eq!(err, ParseError::UnexpectedMsgId("debug".to_string()));
}

#[test]
fn rejects_nil_app_name() {
    let err = parse(packet("-", "out", "hello").as_bytes()).unwrap_err();
    assert_eq!(err, ParseError::MissingField("APP-NAME"));
}

#[test]
fn rejects_truncated_packet() {
    let err = parse(b"<14>1 2026-01-01T00:00:00Z host").unwrap_err();
    assert!(matches!(err, ParseError::MissingField(_)));
}

#[test]
fn rejects_invalid_utf8() {
    let err = parse(&[0xff, 0xfe, 0xfd]).unwrap_err();
    assert_eq!(err, ParseError::Malformed);
}
