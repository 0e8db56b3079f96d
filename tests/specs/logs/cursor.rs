//! Log cursor pagination: ingest a run of events on one stream, page
//! through them four at a time, and confirm the cursor eventually runs dry.

use crate::prelude::*;
use std::net::UdpSocket;

fn syslog_packet(app_name: &str, msg_id: &str, seq: u32) -> String {
    format!("<14>1 2026-01-01T00:00:00.000000Z host {app_name} - {msg_id} - line {seq}\n")
}

#[test]
#[serial_test::serial(syslog_47311)]
fn get_events_pages_through_ten_ingested_records() {
    let project = Project::empty();
    let syslog_addr = "127.0.0.1:47311";
    project.exo().env("EXO_SYSLOG_ADDR", syslog_addr).args(&["daemon", "start"]).passes();

    let ready = wait_for(SPEC_WAIT_MAX_MS, || project.exo().args(&["daemon", "status"]).passes().stdout().contains("exod is running"));
    assert!(ready, "daemon never reported running\ndaemon log: {}", project.daemon_log());

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    for seq in 1..=10u32 {
        let packet = syslog_packet("x", "out", seq);
        socket.send_to(packet.as_bytes(), syslog_addr).unwrap();
    }

    let ingested = wait_for(SPEC_WAIT_MAX_MS, || {
        let out = project.exo().args(&["events", "--log", "x:out", "--next", "10"]).passes().stdout();
        out.lines().filter(|l| !l.is_empty()).count() == 10
    });
    assert!(ingested, "not all ten events were ingested in time\ndaemon log: {}", project.daemon_log());

    let first_page = project.exo().args(&["events", "--log", "x:out", "--next", "4"]).passes().stdout();
    let first_lines: Vec<&str> = first_page.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(first_lines.len(), 4);
    assert!(first_lines[0].contains("line 1"));
    assert!(first_lines[3].contains("line 4"));
}
