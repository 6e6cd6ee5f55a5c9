//! Shared test utilities for the fetcher crate.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;
use zip::ZipWriter;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;

/// Write a zip archive at `path` holding `entries`.
///
/// Each entry is a `(name, contents)` pair. Names ending in `/` are added as
/// directories and their contents are ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> ZipResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(contents.as_bytes())?;
        }
    }
    writer.finish()?;
    Ok(())
}

/// Build a release-metadata response body listing `asset_urls` in order.
///
/// Asset names are taken from the last path segment of each URL.
#[must_use]
pub fn release_metadata_json(tag: &str, asset_urls: &[&str]) -> String {
    let assets: Vec<serde_json::Value> = asset_urls
        .iter()
        .map(|url| {
            let name = url.rsplit('/').next().unwrap_or(*url);
            serde_json::json!({
                "name": name,
                "browser_download_url": url,
            })
        })
        .collect();
    serde_json::json!({
        "tag_name": tag,
        "assets": assets,
    })
    .to_string()
}

/// A canned answer served by [`LoopbackServer`].
#[derive(Clone, Debug)]
pub struct CannedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// Pause after sending the first half of the body.
    pub stall: Option<Duration>,
}

impl CannedResponse {
    /// A `200 OK` response carrying `body`.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            stall: None,
        }
    }

    /// Pause for `stall` halfway through the body.
    #[must_use]
    pub const fn stalled(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }
}

/// Minimal HTTP/1.1 server on a loopback port.
///
/// Requests are answered one connection at a time from a fixed route table
/// keyed by request path. Unknown paths get `404 Not Found`. Every response
/// closes its connection.
pub struct LoopbackServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl LoopbackServer {
    /// Bind to an ephemeral loopback port.
    ///
    /// # Errors
    ///
    /// Returns an error if no port can be bound.
    pub fn bind() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Answer requests from `routes` on a background thread.
    pub fn serve(self, routes: Vec<(String, CannedResponse)>) {
        thread::spawn(move || {
            for stream in self.listener.incoming() {
                let Ok(stream) = stream else { continue };
                if let Err(err) = answer(stream, &routes) {
                    log::debug!("loopback exchange failed: {err}");
                }
            }
        });
    }
}

fn answer(mut stream: TcpStream, routes: &[(String, CannedResponse)]) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let not_found = CannedResponse {
        status: 404,
        body: b"Not Found".to_vec(),
        stall: None,
    };
    let response = routes
        .iter()
        .find(|(route, _)| route == path)
        .map_or(&not_found, |(_, response)| response);

    let reason = match response.status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.body.len()
    )?;
    let (head, tail) = response.body.split_at(response.body.len() / 2);
    stream.write_all(head)?;
    stream.flush()?;
    if let Some(stall) = response.stall {
        thread::sleep(stall);
    }
    stream.write_all(tail)?;
    stream.flush()
}
