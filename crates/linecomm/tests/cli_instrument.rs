#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/lccli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// A fake instrument behind a Unix socket.
///
/// Serves `connections` clients one after another. Each client first gets
/// `greeting`, then every terminated command is handed to the responder; a
/// `Some` answer is written back with the terminator appended.
struct Simulator {
    dir: PathBuf,
    path: PathBuf,
    handle: JoinHandle<Vec<String>>,
}

impl Simulator {
    fn start<F>(
        tag: &str,
        connections: usize,
        terminator: &'static str,
        greeting: &'static str,
        mut respond: F,
    ) -> Self
    where
        F: FnMut(&str) -> Option<String> + Send + 'static,
    {
        let dir = unique_temp_dir(tag);
        let path = dir.join("instrument.sock");
        let listener = UnixListener::bind(&path).expect("simulator should bind");

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..connections {
                let (mut stream, _) = listener.accept().expect("simulator should accept");
                stream
                    .write_all(greeting.as_bytes())
                    .expect("greeting should be written");
                while let Some(command) = read_command(&mut stream, terminator) {
                    if let Some(reply) = respond(&command) {
                        let wire = format!("{reply}{terminator}");
                        if stream.write_all(wire.as_bytes()).is_err() {
                            break;
                        }
                    }
                    received.push(command);
                }
            }
            received
        });

        Self { dir, path, handle }
    }

    fn path(&self) -> &str {
        self.path.to_str().expect("temp path should be UTF-8")
    }

    fn finish(self) -> Vec<String> {
        let received = self.handle.join().expect("simulator should not panic");
        let _ = std::fs::remove_dir_all(&self.dir);
        received
    }
}

fn read_command(stream: &mut UnixStream, terminator: &str) -> Option<String> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) | Err(_) => return None,
            Ok(_) => buf.push(byte[0]),
        }
        if buf.ends_with(terminator.as_bytes()) {
            buf.truncate(buf.len() - terminator.len());
            return Some(String::from_utf8_lossy(&buf).into_owned());
        }
    }
}

fn gaussmeter(command: &str) -> Option<String> {
    match command {
        "RDGFIELD?" => Some("+3.1415E+00".to_string()),
        "*IDN?" => Some("LSCI,MODEL475,0,1.0".to_string()),
        _ => None,
    }
}

fn linecomm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linecomm"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("linecomm should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be one JSON document")
}

#[test]
fn query_prints_reply_without_terminator() {
    let sim = Simulator::start("query", 1, "\r\n", "", gaussmeter);

    let output = linecomm(&["--format", "json", "query", "--socket", sim.path(), "*IDN?"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload = stdout_json(&output);
    assert_eq!(payload["kind"], "reply");
    assert_eq!(payload["command"], "*IDN?");
    assert_eq!(payload["reply"], "LSCI,MODEL475,0,1.0");
    assert_eq!(sim.finish(), vec!["*IDN?".to_string()]);
}

#[test]
fn query_honours_custom_terminator() {
    let sim = Simulator::start("term", 1, "END", "", |command| Some(command.to_lowercase()));

    let output = linecomm(&[
        "--format",
        "raw",
        "query",
        "--socket",
        sim.path(),
        "--terminator",
        "END",
        "PING",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ping\n");
    assert_eq!(sim.finish(), vec!["PING".to_string()]);
}

#[test]
fn field_parses_gaussmeter_reading() {
    let sim = Simulator::start("field", 1, "\r\n", "", gaussmeter);

    let output = linecomm(&["--format", "json", "field", "--socket", sim.path()]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let payload = stdout_json(&output);
    assert_eq!(payload["kind"], "field");
    assert_eq!(payload["field"], 3.1415);
    assert_eq!(sim.finish(), vec!["RDGFIELD?".to_string()]);
}

#[test]
fn field_rejects_garbage_reply_with_60() {
    let sim = Simulator::start("garbage", 1, "\r\n", "", |_| Some("OVERLOAD".to_string()));

    let output = linecomm(&["field", "--socket", sim.path()]);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("OVERLOAD"));
    sim.finish();
}

#[test]
fn units_sets_then_reads_back() {
    let mut units = String::from("G");
    let sim = Simulator::start("units", 2, "\r\n", "", move |command| {
        if let Some(new_units) = command.strip_prefix("UNITS ") {
            units = new_units.to_string();
            Some(String::new())
        } else if command == "UNITS?" {
            Some(units.clone())
        } else {
            None
        }
    });

    let output = linecomm(&["--format", "json", "units", "--socket", sim.path(), "T"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["reply"], "T");
    // Each device call opens and closes its own connection.
    assert_eq!(
        sim.finish(),
        vec!["UNITS T".to_string(), "UNITS?".to_string()]
    );
}

#[test]
fn write_sends_terminated_message() {
    let sim = Simulator::start("write", 1, "\r\n", "", |_| None);

    let output = linecomm(&["write", "--socket", sim.path(), "ZERO"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert_eq!(sim.finish(), vec!["ZERO".to_string()]);
}

#[test]
fn listen_stops_after_count() {
    let sim = Simulator::start("listen", 1, "\r\n", "1.0\r\n2.0\r\n3.0\r\n", |_| None);

    let output = linecomm(&[
        "--format",
        "raw",
        "listen",
        "--socket",
        sim.path(),
        "--count",
        "2",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1.0\n2.0\n");
    sim.finish();
}

#[test]
fn silent_instrument_times_out_with_124() {
    let sim = Simulator::start("silent", 1, "\r\n", "", |_| None);

    let output = linecomm(&[
        "query",
        "--socket",
        sim.path(),
        "--timeout",
        "200ms",
        "RDGFIELD?",
    ]);

    assert_eq!(output.status.code(), Some(124));
    assert_eq!(sim.finish(), vec!["RDGFIELD?".to_string()]);
}

#[test]
fn truncated_reply_exits_with_60() {
    let dir = unique_temp_dir("truncated");
    let path = dir.join("instrument.sock");
    let listener = UnixListener::bind(&path).expect("listener should bind");
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        read_command(&mut stream, "\r\n");
        stream.write_all(b"3.14").expect("partial reply");
        // Dropping the stream ends the reply before its terminator.
    });

    let output = linecomm(&[
        "query",
        "--socket",
        path.to_str().expect("utf-8 path"),
        "RDGFIELD?",
    ]);

    server.join().expect("server thread");
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("3.14"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_socket_exits_with_failure() {
    let dir = unique_temp_dir("missing");
    let path = dir.join("absent.sock");

    let output = linecomm(&["query", "--socket", path.to_str().expect("utf-8 path"), "*IDN?"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: query failed"));
    let _ = std::fs::remove_dir_all(&dir);
}
