//! Tally - timer and activity accounting
//!
//! Entry point of the `tally` binary. Prints each command's result as JSON on
//! stdout; failures are printed as a JSON error object on stderr.

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tally_api::cli::{dispatch, Cli};
use tally_api::AppContext;
use tally_domain::{Config, UserId};
use tally_infra::config;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env before reading any TALLY_* variables
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = load_config(&cli).context("failed to load configuration")?;
    if let Some(db) = &cli.db {
        config.database.path.clone_from(db);
    }

    tally_infra::init_tracing(&config.logging);
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::new(config).context("failed to initialise application context")?;
    let user = UserId::from(cli.user);

    match dispatch(&ctx, &user, cli.command).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let body = serde_json::json!({ "error": err });
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Explicit `--config` file, else environment or a probed file, else defaults.
fn load_config(cli: &Cli) -> tally_domain::Result<Config> {
    if let Some(path) = &cli.config {
        return config::load_from_file(Some(path.clone()));
    }
    if std::env::var_os("TALLY_DB_PATH").is_some() || config::probe_config_paths().is_some() {
        return config::load();
    }
    Ok(Config::default())
}
