//! Offline companion to the server.
//!
//! `check` compiles a rule set and prints a summary of it; `eval` runs one
//! synthetic request through the rules and prints the answer, or reports
//! that the request would go downstream.

use std::path::PathBuf;

use axum::http::{Method, Request, Version};
use clap::{Parser, Subcommand};
use serde_json::json;

use inline_response::config::load_config;
use inline_response::rules::RuleSet;

#[derive(Parser)]
#[command(name = "rules-cli")]
#[command(about = "Validate and exercise inline response rules", long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, default_value = "inline-response.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the rule set and summarize it
    Check,
    /// Run one request through the rule set
    Eval {
        /// Request URL, absolute or path-only
        url: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Extra header, as `name: value`
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let rules = RuleSet::compile(&config.rules)?;

    match cli.command {
        Commands::Check => {
            let matchers: Vec<_> = rules
                .matchers()
                .iter()
                .map(|m| {
                    json!({
                        "path": m.path.mode(),
                        "status": m.responder.status.as_u16(),
                        "body": m.responder.renderer.kind(),
                    })
                })
                .collect();
            let fallback = rules.fallback().map(|f| {
                json!({
                    "status": f.status.as_u16(),
                    "body": f.renderer.kind(),
                })
            });
            let summary = json!({ "matchers": matchers, "fallback": fallback });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Eval { url, method, headers } => {
            let mut req = Request::builder()
                .method(Method::from_bytes(method.as_bytes())?)
                .uri(url)
                .version(Version::HTTP_11);
            for header in &headers {
                let (name, value) = header
                    .split_once(':')
                    .ok_or_else(|| format!("invalid header {:?}, expected `name: value`", header))?;
                req = req.header(name.trim(), value.trim());
            }
            let req = req.body(())?;

            match rules.respond(&req) {
                Some(response) => {
                    let status = response.status();
                    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
                    println!("{}", status);
                    println!("{}", String::from_utf8_lossy(&body));
                }
                None => println!("no rule matched, request would be forwarded downstream"),
            }
        }
    }

    Ok(())
}
