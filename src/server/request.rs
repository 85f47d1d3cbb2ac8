//! Inbound HTTP/1.x request parsing.
//!
//! Best-effort by design: malformed header lines are skipped rather than
//! failing the whole parse, and absent fields become empty strings. Headers
//! are read line by line and the body is read as exactly `Content-Length`
//! bytes, however many reads that takes.

use std::collections::HashMap;
use std::io::BufRead;
use tracing::debug;

/// Bodies above this are skipped; chunked and multi-megabyte uploads are out
/// of scope for this server.
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// One parsed inbound request. Built once per connection, never mutated
/// after parsing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, ...)
    pub method: String,
    /// Request path as received
    pub path: String,
    /// Header keys as received; last write wins on duplicates
    pub headers: HashMap<String, String>,
    /// Raw body bytes (empty unless `Content-Length` was present)
    pub body: Vec<u8>,
}

/// Parse one request from the reader.
///
/// An immediate EOF yields a request with an empty method, which callers
/// treat as "the peer never sent anything". I/O errors mid-request are
/// propagated.
pub fn parse_request<R: BufRead>(reader: &mut R) -> std::io::Result<HttpRequest> {
    let mut req = HttpRequest::default();

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(req);
    }
    let mut parts = line.split_whitespace();
    req.method = parts.next().unwrap_or("").to_string();
    req.path = parts.next().unwrap_or("").to_string();
    // request version, if any, is ignored

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                req.headers
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
            None => {
                debug!(line, "skipping malformed header line");
            }
        }
    }

    if let Some(len) = req
        .headers
        .get("Content-Length")
        .and_then(|v| v.parse::<usize>().ok())
    {
        if len > MAX_BODY_BYTES {
            debug!(content_length = len, "request body exceeds cap, skipping");
        } else if len > 0 {
            let mut body = vec![0u8; len];
            reader.read_exact(&mut body)?;
            req.body = body;
        }
    }

    Ok(req)
}
