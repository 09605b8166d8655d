use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use pgcrud::config::{go_style_args, Cli};
use pgcrud::db::Database;
use pgcrud::driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "pgcrud=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse_from(go_style_args(std::env::args_os()));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let descriptor = cli.connection.descriptor()?;
    let db = Database::connect(&descriptor).await?;
    driver::run_then_close(db, &cli.operations)
        .await
        .context("run operations")?;
    Ok(())
}
