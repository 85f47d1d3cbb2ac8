//! Deterministic (method, path) routing table.

use crate::chat::ChatHandler;
use crate::server::{HttpRequest, HttpResponse};
use crate::static_files::StaticFiles;

pub struct Router {
    static_files: StaticFiles,
    chat: ChatHandler,
}

impl Router {
    pub fn new(static_files: StaticFiles, chat: ChatHandler) -> Self {
        Self { static_files, chat }
    }

    /// Map the request to its handler; anything off the table is a plain
    /// 404.
    pub fn route(&self, req: &HttpRequest) -> HttpResponse {
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/") | ("GET", "/index.html") => self.serve("index.html", "text/html"),
            ("GET", "/styles.css") => self.serve("styles.css", "text/css"),
            ("GET", "/script.js") => self.serve("script.js", "text/javascript"),
            ("GET", "/legal.html") => self.serve("legal.html", "text/html"),
            ("POST", "/api/chat") => self.chat.handle(req),
            _ => HttpResponse::not_found(),
        }
    }

    fn serve(&self, name: &str, content_type: &str) -> HttpResponse {
        match self.static_files.load(name) {
            Ok(bytes) => HttpResponse::new(200)
                .header("Content-Type", content_type)
                .body(bytes),
            Err(_) => HttpResponse::not_found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CerebrasClient;
    use crate::postprocess::Noop;
    use std::time::Duration;

    fn router(base: &std::path::Path) -> Router {
        let client = CerebrasClient::new("test-key", Duration::from_secs(1)).unwrap();
        Router::new(
            StaticFiles::new(base),
            ChatHandler::new(client, Box::new(Noop)),
        )
    }

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: "GET".into(),
            path: path.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let res = router(dir.path()).route(&get("/does-not-exist"));
        assert_eq!(res.status, 404);
        assert_eq!(res.body, b"404 Not Found");
        assert_eq!(res.headers.get("Content-Type").unwrap(), "text/plain");
    }

    #[test]
    fn test_root_serves_index_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let r = router(dir.path());
        for path in ["/", "/index.html"] {
            let res = r.route(&get(path));
            assert_eq!(res.status, 200);
            assert_eq!(res.headers.get("Content-Type").unwrap(), "text/html");
            assert_eq!(res.body, b"<html></html>");
        }
    }

    #[test]
    fn test_missing_stylesheet_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let res = router(dir.path()).route(&get("/styles.css"));
        assert_eq!(res.status, 404);
    }

    #[test]
    fn test_stylesheet_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("styles.css"), "body{}").unwrap();
        let res = router(dir.path()).route(&get("/styles.css"));
        assert_eq!(res.status, 200);
        assert_eq!(res.headers.get("Content-Type").unwrap(), "text/css");
    }

    #[test]
    fn test_post_to_static_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "x").unwrap();
        let mut req = get("/index.html");
        req.method = "POST".into();
        assert_eq!(router(dir.path()).route(&req).status, 404);
    }
}
