//! Per-connection request lifecycle: read, parse, route, respond, close.

use crate::router::Router;
use crate::server::{request, response, HttpResponse};
use serde_json::json;
use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Executes one full request lifecycle on an exclusively-owned stream.
/// Cloned into every task; the router behind the `Arc` is shared read-only.
#[derive(Clone)]
pub struct AppService {
    router: Arc<Router>,
}

impl AppService {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Handle one connection to completion. The stream is closed on return.
    pub fn handle(&self, stream: TcpStream) {
        let peer = stream.peer_addr().ok();
        let mut reader = BufReader::new(stream);

        let req = match request::parse_request(&mut reader) {
            Ok(req) => req,
            Err(err) => {
                debug!(?peer, %err, "failed to read request");
                return;
            }
        };
        // The peer connected without sending anything (e.g. a readiness
        // probe); nothing to respond to.
        if req.method.is_empty() {
            return;
        }

        // A panicking handler must cost this request a 500, not the worker.
        let res = catch_unwind(AssertUnwindSafe(|| self.router.route(&req)))
            .unwrap_or_else(|_| HttpResponse::json(500, &json!({ "error": "internal server error" })));

        info!(
            method = %req.method,
            path = %req.path,
            status = res.status,
            "request handled"
        );

        let mut stream = reader.into_inner();
        if let Err(err) = stream.write_all(&response::serialize_response(&res)) {
            warn!(?peer, %err, "failed to write response");
        }
    }
}
