//! Minimal HTTP/1.1 server for integration tests.
//!
//! Pretends to host a media file of a given size (HEAD and `Range: bytes=0-0`
//! GET) and collects POSTed bodies on any path, answering with a fixed status.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct MediaServerOptions {
    /// If false, HEAD returns 405 (size only via ranged GET).
    pub head_allowed: bool,
    /// Status returned for POST requests.
    pub collect_status: u16,
}

impl Default for MediaServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            collect_status: 200,
        }
    }
}

pub struct MediaServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub base: String,
    posts: Arc<Mutex<Vec<String>>>,
}

impl MediaServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Bodies of every POST received so far, in arrival order.
    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(total_size: u64, opts: MediaServerOptions) -> MediaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let posts = Arc::new(Mutex::new(Vec::new()));
    let shared = Arc::clone(&posts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let posts = Arc::clone(&shared);
            thread::spawn(move || handle(stream, total_size, opts, &posts));
        }
    });
    MediaServer {
        base: format!("http://127.0.0.1:{}/", port),
        posts,
    }
}

struct Request {
    method: String,
    range: Option<(u64, u64)>,
    body: Vec<u8>,
}

fn handle(mut stream: TcpStream, total: u64, opts: MediaServerOptions, posts: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };

    let response = match req.method.as_str() {
        "HEAD" if !opts.head_allowed => {
            "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string()
        }
        "HEAD" => format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
            total
        ),
        "GET" => match req.range {
            Some((start, end)) if start < total => {
                let end = end.min(total - 1);
                let len = end - start + 1;
                let mut head = format!(
                    "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\nConnection: close\r\n\r\n",
                    len, start, end, total
                );
                // Only tiny probes are expected; send a zero-filled body.
                head.push_str(&"\0".repeat(len.min(4096) as usize));
                head
            }
            _ => "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        },
        "POST" => {
            posts
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&req.body).into_owned());
            format!(
                "HTTP/1.1 {} Collected\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                opts.collect_status
            )
        }
        _ => "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string(),
    };
    let _ = stream.write_all(response.as_bytes());
}

/// Reads headers, then `Content-Length` bytes of body.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let method = lines.next()?.split_whitespace().next()?.to_ascii_uppercase();
    let mut range = None;
    let mut content_length = 0usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().unwrap_or(0);
        } else if name.eq_ignore_ascii_case("range") {
            range = parse_range(value);
        }
    }

    while data.len() < header_end + content_length {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    let body_end = data.len().min(header_end + content_length);
    Some(Request {
        method,
        range,
        body: data[header_end..body_end].to_vec(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// `bytes=a-b` -> `(a, b)`; an open end becomes `u64::MAX`.
fn parse_range(value: &str) -> Option<(u64, u64)> {
    let bounds = value.strip_prefix("bytes=")?;
    let (a, b) = bounds.split_once('-')?;
    let start = a.trim().parse().ok()?;
    let end = match b.trim() {
        "" => u64::MAX,
        s => s.parse().ok()?,
    };
    Some((start, end))
}
