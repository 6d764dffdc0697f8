//! CLI-only commands: config info, model presets, normalization, account and chat
//! listing.
//!
//! These run without opening the TUI and produce plain text output. Failures print
//! `Error: ...` to stderr and exit with status 1.

use std::env;
use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::core::auth::{self, AuthClient, SignUpOutcome};
use crate::core::chat;
use crate::core::config::{self, Config};
use crate::core::models;
use crate::core::normalize;
use crate::core::paths;
use crate::core::persistence;
use crate::core::render;
use crate::core::store::Sender;

fn fail(e: impl Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn load_config() -> Config {
    config::load().unwrap_or_else(|e| fail(e))
}

/// Run the `config` command: display paths, endpoint, model, backend and session.
pub fn run_config() {
    let show = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "—".to_string())
    };
    let config = load_config();

    println!("Config:      {}", show(paths::config_dir()));
    println!("Cache:       {}", show(paths::cache_dir()));
    println!("Chats:       {}", show(paths::data_dir()));
    println!("API:         {}", config.api_url);
    println!(
        "Model:       {} — {} ({})",
        config.model_id,
        models::display_name(&config.model_id),
        model_source()
    );
    match &config.supabase {
        Some(s) => {
            println!("Backend:     supabase ({})", s.url);
            let session = auth::load_session()
                .map(|s| format!("signed in as {}", s.email()))
                .unwrap_or_else(|| "not signed in".to_string());
            println!("Session:     {}", session);
        }
        None => println!("Backend:     local"),
    }
    println!(
        "Timestamps:  {}",
        if config.show_timestamps { "on" } else { "off" }
    );
}

fn model_source() -> &'static str {
    if env::var("CHATBURAK_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .is_some()
    {
        "from CHATBURAK_MODEL"
    } else if persistence::load_last_model().is_some() {
        "from last_model"
    } else {
        "default"
    }
}

/// Run the `models` command: list the presets, marking the selected one.
pub fn run_models(query: Option<&str>) {
    let current = config::load()
        .map(|c| c.model_id)
        .unwrap_or_else(|_| models::default_preset().id.clone());
    let presets = models::filter_presets(models::presets(), query.unwrap_or(""));
    if presets.is_empty() {
        println!("No models found.");
        return;
    }

    let id_w = presets.iter().map(|m| m.id.len()).max().unwrap_or(12).max(12);
    let name_w = presets
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(20)
        .max(20);

    println!("  {:<id_w$}  {:<name_w$}  Description", "ID", "Name");
    println!("  {}  {}  -----------", "-".repeat(id_w), "-".repeat(name_w));
    for m in &presets {
        let mark = if m.id == current { '*' } else { ' ' };
        println!(
            "{} {:<id_w$}  {:<name_w$}  {}",
            mark, m.id, m.name, m.description
        );
    }
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Run the `normalize` command: normalize a reply from a file or stdin.
///
/// `steps` prints the text after each pass that changed it.
pub fn run_normalize(file: Option<&Path>, html: bool, steps: bool) {
    let raw = read_input(file).unwrap_or_else(|e| fail(e));
    if steps {
        for (name, text) in normalize::normalize_steps(&raw) {
            println!("== {} ==", name);
            println!("{}", text);
        }
        return;
    }
    if html {
        print!("{}", render::render_message(&raw));
    } else {
        println!("{}", normalize::normalize(&raw));
    }
}

fn prompt_line(label: &str) -> io::Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read a password without echo. Piped stdin is read as one line.
fn prompt_password(label: &str) -> io::Result<String> {
    if !io::stdin().is_terminal() {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    eprint!("{}", label);
    io::stderr().flush()?;
    terminal::enable_raw_mode()?;
    let result = read_hidden_line();
    terminal::disable_raw_mode()?;
    eprintln!();
    result
}

fn read_hidden_line() -> io::Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => return Ok(password),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                KeyCode::Char(c) => password.push(c),
                KeyCode::Esc => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                _ => {}
            }
        }
    }
}

fn credentials(email: Option<String>) -> (String, String) {
    let email = match email.filter(|e| !e.trim().is_empty()) {
        Some(e) => e.trim().to_string(),
        None => prompt_line("Email: ").unwrap_or_else(|e| fail(e)),
    };
    if email.is_empty() {
        fail("no email provided");
    }
    let password = prompt_password("Password: ").unwrap_or_else(|e| fail(e));
    if password.is_empty() {
        fail("no password provided");
    }
    (email, password)
}

fn auth_client(config: &Config) -> AuthClient {
    AuthClient::from_config(config.supabase.as_ref()).unwrap_or_else(|e| fail(e))
}

/// Run the `login` command.
pub async fn run_login(email: Option<String>) {
    let config = load_config();
    let client = auth_client(&config);
    let (email, password) = credentials(email);
    match auth::login(&client, &email, &password).await {
        Ok(session) => println!("Signed in as {}", session.email()),
        Err(e) => fail(e),
    }
}

/// Run the `register` command.
pub async fn run_register(email: Option<String>) {
    let config = load_config();
    let client = auth_client(&config);
    let (email, password) = credentials(email);
    match auth::register(&client, &email, &password).await {
        Ok(SignUpOutcome::SignedIn(session)) => {
            println!("Account created; signed in as {}", session.email())
        }
        Ok(SignUpOutcome::ConfirmationRequired { email }) => println!(
            "Account created. Confirm the address sent to {}, then run `chatburak login`.",
            email
        ),
        Err(e) => fail(e),
    }
}

/// Run the `logout` command.
pub async fn run_logout() {
    let config = load_config();
    let client = auth_client(&config);
    match auth::logout(&client).await {
        Ok(()) => println!("Signed out"),
        Err(e) => fail(e),
    }
}

/// Run the `whoami` command.
pub async fn run_whoami() {
    let config = load_config();
    let client = auth_client(&config);
    match auth::get_session(&client).await {
        Ok(Some(session)) => println!("{}\t{}", session.user.id, session.email()),
        Ok(None) => fail(auth::AuthError::NotSignedIn),
        Err(e) => fail(e),
    }
}

/// Run the `chats list` command: newest first, like the sidebar.
pub async fn run_chats_list(limit: Option<usize>) {
    let config = load_config();
    let ctx = chat::connect(&config).await.unwrap_or_else(|e| fail(e));
    let (chats, messages) = chat::load_history(&ctx).await.unwrap_or_else(|e| fail(e));
    let take = limit.unwrap_or(chats.len());
    for c in chats.iter().rev().take(take) {
        let count = messages.get(&c.chat_id).map(Vec::len).unwrap_or(0);
        println!(
            "{}\t{}\t{}\t{} message(s)",
            c.chat_id,
            c.label(),
            c.created_at.format("%Y-%m-%d %H:%M"),
            count
        );
    }
}

/// Run the `chats show` command: print a chat transcript.
pub async fn run_chats_show(chat_id: &str, raw: bool) {
    let config = load_config();
    let ctx = chat::connect(&config).await.unwrap_or_else(|e| fail(e));
    let (chats, mut messages) = chat::load_history(&ctx).await.unwrap_or_else(|e| fail(e));
    let Some(record) = chats.iter().find(|c| c.chat_id == chat_id) else {
        fail(format!("no chat with id '{}'", chat_id));
    };
    println!("# {}", record.label());
    for m in messages.remove(chat_id).unwrap_or_default() {
        let who = match m.sender {
            Sender::User => "You",
            Sender::Bot => "Bot",
        };
        let time = m.created_at.with_timezone(&chrono::Local).format("%H:%M");
        let body = if raw || m.sender == Sender::User {
            m.content
        } else {
            normalize::normalize(&m.content)
        };
        println!("\n[{}] {}:\n{}", time, who, body);
    }
}
