//! testforged - line-delimited JSON service for component test generation.
//!
//! Reads one request object per stdin line, handles it sequentially, and
//! writes one response object per stdout line. Logs go to stderr so the
//! response stream stays parseable.

mod protocol;
mod tools;

use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn, Level};

use protocol::{Request, Response, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};
use tools::{ToolContext, ToolError};

#[derive(Parser)]
#[command(name = "testforged")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Self-repairing component test generation service", long_about = None)]
struct Cli {
    /// Project root that relative component paths resolve against
    #[arg(long, default_value = ".", env = "TESTFORGE_PROJECT_ROOT")]
    project_root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    testforge_core::init_tracing(cli.json, level);

    info!(
        version = testforge_core::VERSION,
        project_root = %cli.project_root.display(),
        "testforged started"
    );

    let ctx = ToolContext::new(&cli.project_root);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    // one request at a time; a request owns the loop until it resolves
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        // a malformed line is logged and skipped; responses stay in
        // one-to-one order with well-formed requests
        let request = match serde_json::from_str::<Request>(&line) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "malformed request line; skipping");
                continue;
            }
        };
        let response = handle(&ctx, request).await;

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed; shutting down");
    Ok(())
}

async fn handle(ctx: &ToolContext, request: Request) -> Response {
    let id = request.id.clone();
    match request.method.as_str() {
        "tools/list" => Response::success(id, tools::catalog()),
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return Response::failure(id, INVALID_PARAMS, "tool name is required");
            };
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(Value::Null);

            match tools::dispatch(ctx, name, &arguments).await {
                Ok(result) => Response::success(id, result),
                Err(ToolError::UnknownTool(tool)) => {
                    Response::failure(id, METHOD_NOT_FOUND, format!("unknown tool: {tool}"))
                }
                Err(ToolError::InvalidParams(message)) => {
                    Response::failure(id, INVALID_PARAMS, message)
                }
                Err(ToolError::Internal(message)) => {
                    warn!(tool = name, error = %message, "tool call failed internally");
                    Response::failure(id, INTERNAL_ERROR, message)
                }
            }
        }
        other => Response::failure(id, METHOD_NOT_FOUND, format!("unknown method: {other}")),
    }
}
