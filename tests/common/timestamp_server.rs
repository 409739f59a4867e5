//! Minimal HTTP/1.1 server serving a `{"lastUpdate": N}` document for integration tests.
//!
//! The served timestamp can be changed while the server runs. A value of zero makes the
//! server answer 404, and `set_malformed` switches the body to invalid JSON.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct TimestampHandle {
    timestamp: Arc<AtomicU64>,
    malformed: Arc<AtomicBool>,
}

impl TimestampHandle {
    pub fn set(&self, value: u64) {
        self.timestamp.store(value, Ordering::SeqCst);
    }

    pub fn set_malformed(&self, malformed: bool) {
        self.malformed.store(malformed, Ordering::SeqCst);
    }
}

/// Starts a server in a background thread. Returns the resource URL and a handle to
/// change what it serves. The server runs until the process exits.
pub fn start(initial: u64) -> (String, TimestampHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let handle = TimestampHandle::default();
    handle.set(initial);

    let served = handle.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let served = served.clone();
            thread::spawn(move || respond(stream, &served));
        }
    });

    (format!("http://127.0.0.1:{}/last-update.json", port), handle)
}

fn respond(mut stream: std::net::TcpStream, served: &TimestampHandle) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    let timestamp = served.timestamp.load(Ordering::SeqCst);
    let response = if timestamp == 0 {
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
    } else {
        let body = if served.malformed.load(Ordering::SeqCst) {
            "{\"lastUpdate\":".to_string()
        } else {
            format!("{{\"lastUpdate\": {}}}", timestamp)
        };
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    };
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
