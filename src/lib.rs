//! # clie
//!
//! A small threaded HTTP proxy in front of the Cerebras chat-completions
//! API, plus terminal clients for the same endpoint.
//!
//! ## Architecture
//!
//! - **[`queue`]** - thread-safe FIFO between the listener and the workers
//! - **[`worker_pool`]** - fixed set of OS threads draining the queue
//! - **[`server`]** - listener lifecycle and the HTTP/1.x codec
//! - **[`router`]** / **[`static_files`]** - (method, path) dispatch and
//!   static asset serving
//! - **[`chat`]** - the `POST /api/chat` proxy handler
//! - **[`client`]** - blocking upstream client, buffered and streaming
//! - **[`sse`]** - decoder for the streaming event body
//! - **[`postprocess`]** - pluggable cleanup of assistant content
//!
//! Control flow: listener → queue → worker → parse → route → {static file |
//! upstream call} → serialize → close. The queue is the only synchronized
//! structure; everything else is either immutable or owned by exactly one
//! worker for the connection's lifetime.

pub mod chat;
pub mod client;
pub mod config;
pub mod env_file;
pub mod postprocess;
pub mod queue;
pub mod router;
pub mod server;
pub mod sse;
pub mod static_files;
pub mod worker_pool;

pub use chat::ChatHandler;
pub use client::{CerebrasClient, ChatMessage, SamplingParams, DEFAULT_MODEL};
pub use router::Router;
pub use server::{AppService, HttpRequest, HttpResponse, HttpServer, ServerHandle};
pub use static_files::StaticFiles;
