//! In-process HTTP stub standing in for the MangaDex API
//!
//! Serves canned responses keyed by request path from a background thread and
//! records every request target it sees.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A canned response for one path
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &str, body: &str) -> Self {
        Self::status(path, 200, body)
    }

    pub fn status(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Starts serving on an ephemeral localhost port
    ///
    /// Unknown paths get a 404. The serving thread lives until the test process exits.
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &routes, &seen);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request targets (path plus query) received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for a path, ignoring the query string
    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|target| target.split('?').next() == Some(path))
            .count()
    }
}

/// A base URL nothing is listening on
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}")
}

/// Answers one request, recording its target before the response is written
fn handle(stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) -> Option<()> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).ok()? == 0 || header == "\r\n" {
            break;
        }
    }

    let target = request_line.split_whitespace().nth(1)?.to_string();
    let path = target.split('?').next().unwrap_or_default().to_string();
    let (status, body) = routes
        .iter()
        .find(|route| route.path == path)
        .map(|route| (route.status, route.body.as_str()))
        .unwrap_or((404, r#"{"result":"error"}"#));

    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    seen.lock().ok()?.push(target);

    let mut stream = stream;
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()
}

pub const SERIES_ID: &str = "a96676e5-8ae2-425e-b549-7f15dd34a6d8";

pub fn series_body() -> String {
    format!(
        r#"{{
            "result": "ok",
            "response": "entity",
            "data": {{
                "id": "{SERIES_ID}",
                "type": "manga",
                "attributes": {{
                    "title": {{"en": "Komi Can't Communicate", "ja": "古見さんは、コミュ症です。"}},
                    "description": [],
                    "status": "completed",
                    "contentRating": "safe",
                    "year": 2016,
                    "latestUploadedChapter": "ch-2",
                    "tags": []
                }},
                "relationships": []
            }}
        }}"#
    )
}

pub fn feed_body() -> String {
    r#"{
        "result": "ok",
        "response": "collection",
        "data": [
            {"id": "ch-1", "type": "chapter", "attributes": {"volume": "1", "chapter": "1", "title": "A Normal Person", "pages": 18, "translatedLanguage": "en", "readableAt": "2018-11-23T00:00:00+00:00"}, "relationships": []},
            {"id": "ch-3", "type": "chapter", "attributes": {"volume": "1", "chapter": "Extra", "title": "Omake", "pages": 2, "translatedLanguage": "en", "readableAt": "2018-11-24T00:00:00+00:00"}, "relationships": []},
            {"id": "ch-2", "type": "chapter", "attributes": {"volume": "1", "chapter": "2", "title": "I Want to Talk", "pages": 20, "translatedLanguage": "en", "readableAt": "2018-11-30T08:15:00+00:00"}, "relationships": []}
        ],
        "limit": 300,
        "offset": 0,
        "total": 3
    }"#
    .to_string()
}

pub fn series_path() -> String {
    format!("/manga/{SERIES_ID}")
}

pub fn feed_path() -> String {
    format!("/manga/{SERIES_ID}/feed")
}
