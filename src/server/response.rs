//! Outbound HTTP/1.x response serialization.

use serde_json::Value;
use std::collections::HashMap;

/// One outbound response. `Content-Length` is always recomputed from the
/// body at serialization time, overriding any caller-set value.
#[derive(Debug, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn not_found() -> Self {
        Self::new(404)
            .header("Content-Type", "text/plain")
            .body("404 Not Found")
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status)
            .header("Content-Type", "application/json")
            .body(value.to_string())
    }
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Serialize status line, headers, a computed `Content-Length`, a blank
/// line, then the body.
pub fn serialize_response(res: &HttpResponse) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {} {}\r\n", res.status, status_reason(res.status)).into_bytes();
    for (name, value) in &res.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", res.body.len()).as_bytes());
    out.extend_from_slice(&res.body);
    out
}
