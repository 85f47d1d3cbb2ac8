mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, HttpRequest, MAX_BODY_BYTES};
pub use response::{serialize_response, HttpResponse};
pub use service::AppService;
