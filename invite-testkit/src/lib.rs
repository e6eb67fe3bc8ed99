//! Scripted local HTTP server for client and binary tests.
//!
//! [`ScriptedApi`] accepts one connection per scripted response, records the
//! request, then answers with the next `(status, body)` pair and closes.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

/// A request the server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Answers each incoming connection with the next scripted response.
pub struct ScriptedApi {
    pub base_url: String,
    rx: mpsc::Receiver<Recorded>,
}

impl ScriptedApi {
    pub fn start(script: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in script {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let Ok(recorded) = read_request(&stream) else {
                    return;
                };
                // Record before answering so the client never outruns the log.
                let _ = tx.send(recorded);
                let _ = respond(stream, status, &body);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            rx,
        }
    }

    /// One response, then the server stops.
    pub fn once(status: u16, body: &str) -> Self {
        Self::start(vec![(status, body.to_string())])
    }

    /// Requests received so far, in order.
    pub fn seen(&self) -> Vec<Recorded> {
        self.rx.try_iter().collect()
    }
}

fn read_request(stream: &TcpStream) -> io::Result<Recorded> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut raw = vec![0u8; length];
    reader.read_exact(&mut raw)?;

    Ok(Recorded {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&raw).into_owned(),
    })
}

fn respond(mut stream: TcpStream, status: u16, body: &str) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
