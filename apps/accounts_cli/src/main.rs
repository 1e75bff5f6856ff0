use std::{io, process::ExitCode, sync::Arc};

use clap::Parser;
use client_core::{
    config::{load_settings, prepare_api_base_url},
    surface::report_unhandled,
    AccountStore, HttpAccountsApi,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod shell;

use cli::{Cli, Command};
use shell::{PromptConfirmation, Shell};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            if report_unhandled(&err) {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut settings = load_settings();
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    let base_url = prepare_api_base_url(&settings.api_base_url)?;
    info!(%base_url, "using accounts api");

    let store = Arc::new(AccountStore::new(Arc::new(HttpAccountsApi::new(base_url))));
    let mut shell = Shell::new(store);

    let confirmation = PromptConfirmation {
        assume_yes: matches!(cli.command, Command::Delete { yes: true, .. }),
    };
    let mut stdout = io::stdout();
    Ok(shell.run(&cli.command, &confirmation, &mut stdout).await?)
}
