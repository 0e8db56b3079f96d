use super::*;

#[test]
fn lookup_of_current_process_reports_running() {
    let metrics = lookup(std::process::id());
    assert!(metrics.running);
}

#[test]
fn lookup_of_gone_process_is_non_fatal() {
    // A pid extremely unlikely to be assigned on any test runner.
    let metrics = lookup(u32::MAX - 1);
    assert!(!metrics.running);
    assert_eq!(metrics.rss_bytes, 0);
}
