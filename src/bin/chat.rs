//! Interactive terminal chat against the Cerebras API.

use anyhow::{Context, Result};
use clap::Parser;
use clie::{config, env_file, CerebrasClient, ChatMessage, SamplingParams, DEFAULT_MODEL};
use colored::Colorize;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clie")]
#[command(about = "Interactive chat with the Cerebras API", long_about = None)]
struct Args {
    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

fn main() -> Result<()> {
    env_file::load_env_file(".env");
    // Keep the chat UI clean unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let api_key = config::api_key()
        .with_context(|| format!("{} environment variable not set", config::API_KEY_ENV))?;
    let client = CerebrasClient::new(api_key, config::upstream_timeout())?;

    println!(
        "{}",
        "\n╔════════════════════════════════════════╗\n\
         ║         Welcome to Clie Chat!          ║\n\
         ╚════════════════════════════════════════╝"
            .magenta()
    );
    println!("{}", "Type 'exit' to quit".yellow());

    let stdin = io::stdin();
    loop {
        print!("{}", "\nYou: ".cyan());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match ask(&client, &args.model, input) {
            Ok(reply) => println!("\n{} {}", "Clie:".green(), reply),
            Err(err) => eprintln!("\n{}", format!("Error: {err:#}").red()),
        }
    }

    Ok(())
}

fn ask(client: &CerebrasClient, model: &str, question: &str) -> Result<String> {
    let raw = client.chat_completions(
        model,
        vec![ChatMessage::user(question)],
        &SamplingParams::default(),
    )?;
    let response: Value = serde_json::from_str(&raw).context("could not parse upstream response")?;
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("upstream response had no content")
}
