//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  chatburak                           Launch the chat dashboard
  chatburak -p \"Merhaba\"              Send one message, print the reply
  chatburak -p - -m o1                Read the message from stdin, use the O1 preset
  chatburak normalize reply.txt       Normalize a raw reply to markdown
  chatburak normalize --html < r.txt  Render a raw reply as HTML
  chatburak login --email me@x.com    Sign in (Supabase backend)
  chatburak chats list --limit 5      List the five newest chats
  chatburak models                    List model presets
  chatburak completions zsh           Generate zsh completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version = crate::core::app::VERSION,
    about = "Terminal chat client with markdown-normalized replies",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single message to a new chat then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Send one message and print the reply (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Override the model preset for single prompt mode
    #[arg(short = 'm', long, help = "Model preset id (e.g. claude3-sonnet)")]
    pub model: Option<String>,

    /// Print the reply exactly as the API returned it
    #[arg(long, requires = "prompt")]
    pub raw: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a raw reply (file or stdin) and print it
    Normalize {
        /// Input file; stdin when omitted or '-'
        file: Option<PathBuf>,
        /// Render HTML instead of markdown
        #[arg(long, conflicts_with = "steps")]
        html: bool,
        /// Show the text after every pass that changed it
        #[arg(long)]
        steps: bool,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse stored chats
    Chats {
        #[command(subcommand)]
        subcommand: ChatsSubcommand,
    },
    /// List model presets
    Models {
        /// Filter presets by id or name
        #[arg(long)]
        query: Option<String>,
    },
    /// Show config paths, endpoint, model, and backend
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ChatsSubcommand {
    /// List chats, newest first
    List {
        /// Maximum number of chats to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the messages of one chat
    Show {
        /// Chat id (see `chats list`)
        id: String,
        /// Print bot replies without normalization
        #[arg(long)]
        raw: bool,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when no subcommand and no prompt were given, i.e. the TUI will run.
    pub fn launches_tui(&self) -> bool {
        self.command.is_none() && self.prompt.is_none()
    }
}
