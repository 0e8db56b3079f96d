use super::*;

#[test]
fn status_codes_match_taxonomy() {
    assert_eq!(ExoError::Validation("x".into()).status(), 400);
    assert_eq!(ExoError::NotFound("x".into()).status(), 404);
    assert_eq!(ExoError::Conflict("x".into()).status(), 409);
    assert_eq!(ExoError::Provider("x".into()).status(), 500);
    assert_eq!(ExoError::Transport("x".into()).status(), 500);
    assert_eq!(ExoError::Auth("x".into()).status(), 401);
}

#[test]
fn with_layer_prefixes_message_and_preserves_kind() {
    let err = ExoError::NotFound("no such component".into()).with_layer("store");
    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "not found: store: no such component");
}
