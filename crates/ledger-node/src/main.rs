//! # Gov-Ledger Node
//!
//! Runs one ledger operation per invocation and prints the result as JSON.
//! Logs go to stderr so stdout stays machine readable.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use ledger_node::{execute, Cli, LedgerNode, NodeConfig};
use ledger_telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = NodeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if cli.in_memory {
        config.storage.in_memory = true;
    }

    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;
    info!(
        version = ledger_node::VERSION,
        channels = config.channels.len(),
        "[node] Starting Gov-Ledger node"
    );

    let node = LedgerNode::new(config);
    let operation = cli.command.operation();

    match execute(&node, cli.command).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(operation, code = %err.code(), error = %err, "[node] Operation failed");
            println!("{}", serde_json::to_string_pretty(&err.to_response(operation))?);
            Ok(ExitCode::FAILURE)
        }
    }
}
