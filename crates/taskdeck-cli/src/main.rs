//! taskdeck CLI - Manage your TaskMaster tasks from the terminal
//!
//! Signs in against the hosted task API, keeps the session token in the
//! OS keyring, and exposes the task board as subcommands.

mod cli;
mod commands;
mod config;
mod error;
mod session;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taskdeck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().map_err(CliError::Config)?;
    let api_url = config.resolve_api_url(cli.api_url.as_deref());

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth_cmd::run_login(&api_url, &username, &password).await?;
        }
        Commands::Signup {
            username,
            password,
            confirm_password,
        } => {
            commands::auth_cmd::run_signup(&api_url, &username, &password, &confirm_password)
                .await?;
        }
        Commands::Logout => commands::auth_cmd::run_logout()?,
        Commands::Status => commands::auth_cmd::run_status()?,
        Commands::List {
            status,
            priority,
            search,
            json,
        } => {
            let filter = cli::build_filter(status, priority, search.as_deref());
            commands::tasks::run_list(&api_url, &filter, json).await?;
        }
        Commands::Add { text, priority } => {
            commands::tasks::run_add(&api_url, &text, priority.into()).await?;
        }
        Commands::Toggle { id } => commands::tasks::run_toggle(&api_url, &id).await?,
        Commands::Priority { id, level } => {
            commands::tasks::run_priority(&api_url, &id, level.into()).await?;
        }
        Commands::Delete { id } => commands::tasks::run_delete(&api_url, &id).await?,
        Commands::Config { set_api_url } => {
            commands::config_cmd::run_config(&config, set_api_url.as_deref())?;
        }
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
