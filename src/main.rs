use anyhow::Result;
use clap::Parser;
use clie::postprocess::ReasoningStripper;
use clie::{
    config, env_file, AppService, CerebrasClient, ChatHandler, HttpServer, Router, StaticFiles,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clie-server")]
#[command(about = "HTTP proxy server for the Cerebras chat API", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Directory the static assets are served from
    #[arg(long, default_value = ".")]
    static_dir: PathBuf,
}

fn main() -> Result<()> {
    env_file::load_env_file(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    // Degraded but running: every upstream call will fail with an auth
    // error until the key is provided.
    let api_key = config::api_key().unwrap_or_else(|| {
        warn!("{} is not set; upstream calls will fail", config::API_KEY_ENV);
        String::new()
    });

    let client = CerebrasClient::new(api_key, config::upstream_timeout())?;
    let handler = ChatHandler::new(client, Box::new(ReasoningStripper));
    let router = Router::new(StaticFiles::new(args.static_dir), handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let mut handle = HttpServer::new(AppService::new(router)).start(addr)?;

    println!("Server listening on port {}", handle.local_addr().port());
    println!("Press Enter to stop the server...");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    handle.stop();
    Ok(())
}
