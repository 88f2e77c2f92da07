//! Main entry point for the GoldenDict OpenAI Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use goldendict_openai_translator::cli::commands::{self, Args, RunStatus};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Stdout belongs to the host dictionary, so logs go to stderr
    let log_level = if args.verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match commands::run(args, &mut out).await? {
        RunStatus::Completed => Ok(ExitCode::SUCCESS),
        RunStatus::Aborted => Ok(ExitCode::FAILURE),
    }
}
