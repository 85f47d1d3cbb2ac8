//! TCP listener and server lifecycle.
//!
//! One accept-loop thread feeds the worker pool's queue; [`ServerHandle`]
//! owns both and is the single place the `Stopped → Running → Stopping →
//! Stopped` transitions happen.

use crate::queue::TaskQueue;
use crate::server::service::AppService;
use crate::worker_pool::{Task, WorkerPool, WorkerPoolConfig};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCEPT_BACKLOG: i32 = 10;

pub struct HttpServer {
    service: AppService,
    pool_config: WorkerPoolConfig,
}

impl HttpServer {
    pub fn new(service: AppService) -> Self {
        Self {
            service,
            pool_config: WorkerPoolConfig::from_env(),
        }
    }

    pub fn with_pool_config(mut self, pool_config: WorkerPoolConfig) -> Self {
        self.pool_config = pool_config;
        self
    }

    /// Bind, spawn the worker pool and the accept loop, and return a handle
    /// to the running server. Port 0 binds to an ephemeral port; the chosen
    /// address is on the handle.
    pub fn start(self, addr: SocketAddr) -> io::Result<ServerHandle> {
        let listener = bind_listener(addr)?;
        let addr = listener.local_addr()?;

        let running = Arc::new(AtomicBool::new(true));
        let pool = WorkerPool::new(self.pool_config);
        let queue = pool.queue();

        let service = self.service;
        let accept_running = running.clone();
        let accept_thread =
            thread::spawn(move || accept_loop(listener, queue, service, accept_running));

        info!(%addr, workers = pool.worker_count(), "server listening");

        Ok(ServerHandle {
            addr,
            running,
            accept_thread: Some(accept_thread),
            pool: Some(pool),
        })
    }
}

fn bind_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(ACCEPT_BACKLOG)?;
    Ok(socket.into())
}

fn accept_loop(
    listener: TcpListener,
    queue: Arc<TaskQueue<Task>>,
    service: AppService,
    running: Arc<AtomicBool>,
) {
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let service = service.clone();
                queue.push(Box::new(move || service.handle(stream)));
            }
            Err(err) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                warn!(%err, "accept failed");
            }
        }
    }
    debug!("accept loop exiting");
}

/// Handle to a running server. Dropping it stops the server.
pub struct ServerHandle {
    addr: SocketAddr,
    running: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
    pool: Option<WorkerPool>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listening address until a connection succeeds. Useful in
    /// tests to ensure the server is up before sending requests.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop intake, serve everything already queued, and join all threads.
    /// Idempotent.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        // Poke the listener so the blocked accept returns; the throwaway
        // connection is observed after the flag is cleared and never
        // enqueued.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
        info!("server stopped");
    }

    /// Stop the server and consume the handle.
    pub fn join(mut self) {
        self.stop();
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
