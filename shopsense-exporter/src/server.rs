//! Scrape listener
//!
//! ## Threading
//!
//! The sampler owns the main thread and blocks in its pauses, so the
//! listener gets its own thread running a current-thread tokio runtime.
//! The two share nothing but the prometheus [`Registry`], which is
//! internally synchronised.
//!
//! ## Protocol
//!
//! Just enough HTTP/1.x for a scraper:
//!
//! | Request | Response |
//! |---------|----------|
//! | `GET` any path | `200`, text exposition |
//! | `HEAD` any path | `200`, headers only |
//! | other method | `405` with `Allow: GET, HEAD` |
//! | unparseable or oversized head | `400` |
//!
//! Every response closes the connection.

use std::io;
use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use prometheus::Registry;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::errors::ExporterError;
use crate::metrics;

/// Largest request head accepted
pub const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// A client gets this long to send its request head
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed accept (e.g. out of file descriptors)
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

const THREAD_NAME: &str = "metrics-http";

/// A fully formed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// Extra headers besides `Content-Length` and `Connection`
    pub headers: Vec<(&'static str, String)>,
    /// Body (already empty for `HEAD`)
    pub body: Vec<u8>,
    /// Length advertised in `Content-Length`
    pub content_length: usize,
}

impl Response {
    fn plain(status: u16, message: &str) -> Self {
        let body = format!("{message}\n").into_bytes();
        Self {
            status,
            headers: vec![("Content-Type", "text/plain; charset=utf-8".to_owned())],
            content_length: body.len(),
            body,
        }
    }

    /// Serialise status line, headers and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason(self.status));
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.content_length));
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

/// Build the reply for one request head
pub fn respond(head: &[u8], registry: &Registry) -> Response {
    let Some(method) = request_method(head) else {
        return Response::plain(400, "malformed request");
    };

    let head_only = match method {
        "GET" => false,
        "HEAD" => true,
        _ => {
            let mut response = Response::plain(405, "only GET and HEAD are supported");
            response.headers.push(("Allow", "GET, HEAD".to_owned()));
            return response;
        }
    };

    match metrics::render(registry) {
        Ok(body) => Response {
            status: 200,
            headers: vec![("Content-Type", metrics::content_type())],
            content_length: body.len(),
            body: if head_only { Vec::new() } else { body },
        },
        Err(err) => {
            log::error!("failed to encode metrics: {err}");
            Response::plain(500, "failed to encode metrics")
        }
    }
}

/// Method token of an HTTP/1.x request line
fn request_method(head: &[u8]) -> Option<&str> {
    let line_end = head.windows(2).position(|w| w == b"\r\n")?;
    let line = std::str::from_utf8(&head[..line_end]).ok()?;
    let mut parts = line.split(' ');
    let method = parts.next().filter(|m| !m.is_empty())?;
    let _target = parts.next().filter(|t| !t.is_empty())?;
    let version = parts.next()?;
    (version.starts_with("HTTP/1.") && parts.next().is_none()).then_some(method)
}

/// Bind the listener socket up front so a taken port fails start-up
pub fn bind(addr: SocketAddr) -> Result<std::net::TcpListener, ExporterError> {
    let listener =
        std::net::TcpListener::bind(addr).map_err(|source| ExporterError::Bind { addr, source })?;
    listener
        .set_nonblocking(true)
        .map_err(ExporterError::Listener)?;
    Ok(listener)
}

/// Serve `registry` from a dedicated thread
pub fn spawn(
    listener: std::net::TcpListener,
    registry: Registry,
) -> Result<thread::JoinHandle<()>, ExporterError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ExporterError::Listener)?;

    thread::Builder::new()
        .name(THREAD_NAME.to_owned())
        .spawn(move || {
            runtime.block_on(async move {
                match TcpListener::from_std(listener) {
                    Ok(listener) => serve(listener, registry).await,
                    Err(err) => log::error!("metrics listener unusable: {err}"),
                }
            })
        })
        .map_err(ExporterError::Listener)
}

/// Accept scrapes until the runtime shuts down
pub async fn serve(listener: TcpListener, registry: Registry) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let registry = registry.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle(stream, &registry).await {
                        log::debug!("scrape from {peer} failed: {err}");
                    }
                });
            }
            Err(err) => accept_failed(&err).await,
        }
    }
}

/// Log a failed accept and hold off before the next one
async fn accept_failed(err: &io::Error) {
    log::warn!("failed to accept scrape connection: {err}");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

async fn handle(mut stream: TcpStream, registry: &Registry) -> io::Result<()> {
    let head = match tokio::time::timeout(REQUEST_TIMEOUT, read_head(&mut stream)).await {
        Ok(head) => head?,
        Err(_) => return Err(io::Error::new(io::ErrorKind::TimedOut, "request head timed out")),
    };

    let response = match head {
        Some(head) => respond(&head, registry),
        None => Response::plain(400, "request head too large or incomplete"),
    };
    log::debug!("scrape answered with {}", response.status);

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Read up to the blank line ending the request head
///
/// `None` if the peer closed first or the head outgrew [`MAX_REQUEST_HEAD`].
async fn read_head(stream: &mut TcpStream) -> io::Result<Option<Vec<u8>>> {
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            return Ok(Some(head));
        }
        if head.len() > MAX_REQUEST_HEAD {
            return Ok(None);
        }
    }
}
