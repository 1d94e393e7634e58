//! git-bn - Git Branch Notes
//!
//! Annotate branches and keep the notes consistent as branches come and go.

use anyhow::Result;
use clap::Parser;
use git_bn_core::BranchScope;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("git_bn=info".parse()?)
                .add_directive("git_bn_core=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("git-bn {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = config::Config::load()?;
    let manager = commands::manager(&cli.repo, &config)?;

    // Execute command
    match cli.command {
        Commands::Init { scope, yes } => {
            commands::init::execute(&manager, scope.scope_or(BranchScope::Remote), yes).await
        }
        Commands::List { filter, all } => {
            commands::list::execute(&manager, filter.scope(), all).await
        }
        Commands::Set { note, branch, sync } => {
            commands::set::execute(&manager, &config, &note, branch.as_deref(), sync).await
        }
        Commands::Get { branch } => commands::get::execute(&manager, branch.as_deref()).await,
        Commands::Push { message } => {
            commands::push::execute(&manager, &config, message.as_deref()).await
        }
        Commands::Pull => commands::pull::execute(&manager).await,
        Commands::Mapping { all } => commands::mapping::execute(&manager, all).await,
        Commands::Sync { remote } => {
            let remote = remote.unwrap_or_else(|| config.git.remote.clone());
            commands::sync::execute(&manager, &remote).await
        }
        Commands::NotesMapping => commands::notes_mapping::execute(&manager).await,
        Commands::Version => Ok(()),
    }
}
