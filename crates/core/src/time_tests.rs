use super::*;

#[test]
fn now_nanos_round_trips_through_parse() {
    let ts = now_nanos();
    assert!(parse(&ts).is_ok());
}

#[test]
fn le_orders_timestamps_lexicographically_and_chronologically() {
    let a = "2024-01-01T00:00:00.000000000Z";
    let b = "2024-01-01T00:00:00.000000001Z";
    assert!(le(a, b));
    assert!(le(a, a));
    assert!(!le(b, a));
}
