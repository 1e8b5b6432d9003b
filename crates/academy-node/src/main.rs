//! # Academy Node
//!
//! ```text
//! academy-node --credential alice.json StudentRegisterClass alice CL1
//! ```
//!
//! Prints the query payload (if any) to stdout. Failures are printed as a
//! JSON `ErrorPayload` and exit with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use academy_node::{run_once, NodeConfig};

/// Invoke one academic-records operation.
#[derive(Parser, Debug)]
#[command(name = "academy-node")]
#[command(about = "Run an academic-records operation against a local record store")]
struct Args {
    /// JSON credential document: {"mspId": "...", "attrs": {"username": "..."}}
    #[arg(short, long)]
    credential: PathBuf,

    /// Data directory (overrides ACADEMY_DATA_PATH)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Operation name, e.g. CreateCourse
    function: String,

    /// Positional operation arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries the payload.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = NodeConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    config.validate()?;

    let credential = std::fs::read(&args.credential)
        .with_context(|| format!("reading credential {}", args.credential.display()))?;

    info!("Invoking {} with {} argument(s)", args.function, args.args.len());
    match run_once(&config, &credential, &args.function, &args.args)? {
        Ok(Some(payload)) => {
            println!("{}", String::from_utf8_lossy(&payload));
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(failure) => {
            println!("{}", serde_json::to_string(&failure)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
