//! # chatburak
//!
//! Terminal chat client: a dashboard of chats backed by Supabase (or local files),
//! replies from a remote completion endpoint, and a markdown normalizer that
//! cleans those replies before they are rendered.
//!
//! ## Modes
//! - Interactive dashboard (default)
//! - Single message with `-p`
//! - Subcommands for normalization, account, chats, models and config

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, ChatsSubcommand, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = Args::parse();
    run::init_logger(&args);

    if let Some(command) = &args.command {
        match command {
            Commands::Normalize { file, html, steps } => {
                core::cli::run_normalize(file.as_deref(), *html, *steps)
            }
            Commands::Login { email } => core::cli::run_login(email.clone()).await,
            Commands::Register { email } => core::cli::run_register(email.clone()).await,
            Commands::Logout => core::cli::run_logout().await,
            Commands::Whoami => core::cli::run_whoami().await,
            Commands::Chats { subcommand } => match subcommand {
                ChatsSubcommand::List { limit } => core::cli::run_chats_list(*limit).await,
                ChatsSubcommand::Show { id, raw } => core::cli::run_chats_show(id, *raw).await,
            },
            Commands::Models { query } => core::cli::run_models(query.as_deref()),
            Commands::Config => core::cli::run_config(),
            Commands::Completions { shell } => {
                let mut cmd = Args::command();
                cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
            }
        }
        return Ok(());
    }

    // Print a user-friendly message; exit uses Display, not Debug
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = if args.prompt.is_some() {
        run::run_single_prompt(&args, &config).await
    } else {
        run::launch_tui(config).await
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
