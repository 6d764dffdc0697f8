//! Application run modes: logger init, single prompt, TUI launch.

use std::io;

use tokio_util::sync::CancellationToken;

use crate::cli::Args;
use crate::core;
use crate::core::chat::{self, ReplyOutcome};
use crate::core::config::{Config, ConfigError};
use crate::core::store::{MessageRecord, Sender};

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.launches_tui()
        && let Some(dir) = core::paths::cache_dir()
        && std::fs::create_dir_all(&dir).is_ok()
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}.log", core::app::NAME)))
    {
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = logger.try_init();
    log::info!("{} {}", core::app::NAME, core::app::VERSION);
}

/// Run single prompt mode: send one message to a new chat, print the reply.
pub async fn run_single_prompt(
    args: &Args,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(prompt_arg) = args.prompt.as_deref() else {
        return Ok(());
    };
    let prompt = if prompt_arg == "-" {
        io::read_to_string(io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Error: empty prompt");
        std::process::exit(1);
    }

    let model = args.model.as_deref().unwrap_or(&config.model_id);
    if core::models::find(model).is_none() {
        return Err(ConfigError::UnknownModel(model.to_string()).into());
    }

    let ctx = chat::connect(config).await?;
    let existing = ctx.store.list_chats(&ctx.user_id).await.map(|c| c.len());
    let existing = existing.unwrap_or_else(|e| {
        log::warn!("Could not count existing chats: {e}");
        0
    });
    let record = chat::create_chat(&ctx, existing).await;
    log::info!("Sending to {} with {}", record.chat_id, model);

    let user = MessageRecord::new(&record.chat_id, &ctx.user_id, Sender::User, prompt);
    match chat::exchange(&ctx, &user, model, &CancellationToken::new()).await {
        ReplyOutcome::Reply(bot) => {
            if args.raw {
                println!("{}", bot.content);
            } else {
                println!("{}", core::normalize::normalize(&bot.content));
            }
            Ok(())
        }
        ReplyOutcome::Failed(_, reason) => Err(io::Error::other(reason).into()),
        ReplyOutcome::Cancelled => Ok(()),
    }
}

/// Connect, load the user's chats, then run the TUI in a blocking thread.
pub async fn launch_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = chat::connect(&config).await?;
    let history = match chat::load_history(&ctx).await {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to load chats: {e}");
            Default::default()
        }
    };

    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config, ctx, history)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
