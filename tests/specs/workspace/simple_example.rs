//! Simple-example round-trip: three processes come up on adjacent ports,
//! one is reachable over HTTP, and starting a single component leaves the
//! others untouched.

use crate::prelude::*;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

const SERVER_PY: &str = r#"
import http.server, os

class Handler(http.server.BaseHTTPRequestHandler):
    def do_GET(self):
        self.send_response(200)
        self.end_headers()
        self.wfile.write(b"Hi!")
    def log_message(self, *args):
        pass

port = int(os.environ["PORT"])
http.server.HTTPServer(("127.0.0.1", port), Handler).serve_forever()
"#;

fn manifest(project_dir: &std::path::Path) -> String {
    let mut out = String::new();
    let script = project_dir.join("server.py").display().to_string();
    for (name, port) in [("web", 44222), ("echo", 44223), ("echo-short", 44224)] {
        out.push_str(&format!(
            "process \"{name}\" {{\n  command = \"python3\"\n  args    = [\"{script}\"]\n  env     = {{ PORT = \"{port}\" }}\n}}\n"
        ));
    }
    out
}

fn port_is_open(port: u16) -> bool {
    TcpStream::connect_timeout(&format!("127.0.0.1:{port}").parse().unwrap(), Duration::from_millis(200)).is_ok()
}

fn http_get_body(port: u16) -> String {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{port}")).unwrap();
    stream.write_all(format!("GET / HTTP/1.0\r\nHost: 127.0.0.1:{port}\r\n\r\n").as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
#[serial_test::serial(ports_44222)]
fn three_processes_round_trip_through_start_and_stop() {
    let project = Project::empty();
    project.file("server.py", SERVER_PY);
    project.file("workspace.hcl", &manifest(project.path()));

    project.exo().args(&["apply", "workspace.hcl"]).passes();
    project.exo().args(&["start"]).passes();

    for port in [44222u16, 44223, 44224] {
        let bound = wait_for(10_000, || port_is_open(port));
        assert!(bound, "port {port} never bound\ndaemon log: {}", project.daemon_log());
    }

    assert!(http_get_body(44224).contains("Hi!"));

    project.exo().args(&["stop"]).passes();
    for port in [44222u16, 44223, 44224] {
        let released = wait_for(SPEC_WAIT_MAX_MS, || !port_is_open(port));
        assert!(released, "port {port} still bound after stop\ndaemon log: {}", project.daemon_log());
    }

    project.exo().args(&["start-component", "echo"]).passes();
    let echo_up = wait_for(SPEC_WAIT_MAX_MS, || port_is_open(44223));
    assert!(echo_up, "echo never came back up\ndaemon log: {}", project.daemon_log());
    assert!(!port_is_open(44222), "web should still be stopped");
    assert!(!port_is_open(44224), "echo-short should still be stopped");
}
