//! model_checker - probe which Anthropic model ids the local API key can use.
//!
//! Usage:
//!
//! ```text
//! # put ANTHROPIC_API_KEY=... in .env.local next to the binary
//! cargo run --bin model_checker
//! ```
//!
//! The report goes to stdout. Set RUST_LOG=model_checker=debug for
//! per-request diagnostics on stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use model_checker::credential::default_env_path;
use model_checker::{run, CheckError, ProbeClient, Reporter, CANDIDATE_MODELS, DEFAULT_LOG_FILTER};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn check() -> Result<()> {
    let env_path = default_env_path().context("Failed to locate the executable's directory")?;
    run(&env_path, ProbeClient::builder(), &CANDIDATE_MODELS, io::stdout()).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match check().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CheckError>() {
                Some(err) => {
                    if !err.is_credential_error() {
                        tracing::error!(error = %err, "checker aborted");
                    }
                    if Reporter::new(io::stdout()).error(err).is_err() {
                        eprintln!("❌ {}", err);
                    }
                }
                None => {
                    if writeln!(io::stdout(), "❌ {:#}", e).is_err() {
                        eprintln!("❌ {:#}", e);
                    }
                }
            }
            ExitCode::FAILURE
        }
    }
}
