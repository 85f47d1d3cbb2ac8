//! One-shot streaming completion: prints content fragments as the upstream
//! emits them.

use anyhow::{Context, Result};
use clap::Parser;
use clie::{config, env_file, CerebrasClient, ChatMessage, SamplingParams, DEFAULT_MODEL};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clie-stream")]
#[command(about = "Stream a completion from the Cerebras API", long_about = None)]
struct Args {
    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// System prompt to send
    #[arg(long, default_value = "")]
    system_prompt: String,
}

fn main() -> Result<()> {
    env_file::load_env_file(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let api_key = config::api_key()
        .with_context(|| format!("{} environment variable not set", config::API_KEY_ENV))?;
    let client = CerebrasClient::new(api_key, config::upstream_timeout())?;

    client.stream_chat_completions(
        &args.model,
        vec![ChatMessage::system(&args.system_prompt)],
        &SamplingParams::default(),
        |fragment| {
            print!("{fragment}");
            let _ = io::stdout().flush();
        },
    )?;
    println!();

    Ok(())
}
