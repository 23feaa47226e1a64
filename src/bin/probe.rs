use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "hello-probe")]
#[command(about = "Probe a running Hello Service instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// API prefix used for the greeting route
    #[arg(long, default_value = "/api/v1")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// Readiness probe; fails unless every check is healthy
    Ready,
    /// Fetch the greeting
    Hello,
    /// Service metadata
    Root,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let require_ready = matches!(cli.command, Commands::Ready);
    let path = match cli.command {
        Commands::Health => "/health".to_string(),
        Commands::Ready => "/health/ready".to_string(),
        Commands::Hello => format!("{}/hello/world", cli.prefix),
        Commands::Root => "/".to_string(),
    };

    let res = client.get(format!("{base}{path}")).send().await?;
    let ok = print_response(res, require_ready).await?;

    if !ok {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the body and report whether the probe passed.
async fn print_response(
    res: reqwest::Response,
    require_ready: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    if let Some(id) = request_id {
        eprintln!("request id: {id}");
    }

    // Readiness reports failure in the body, not the status code
    if require_ready {
        return Ok(json.get("status").and_then(Value::as_str) == Some("ready"));
    }
    Ok(true)
}
