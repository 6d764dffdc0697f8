//! TUI (Text User Interface): the chat dashboard with sidebar, chat window and input.

mod app;
mod constants;
mod draw;
mod handlers;
mod shortcuts;
mod syntax;
mod text;

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use tokio::runtime::Handle;

use crate::core::chat::{ChatContext, ReplyOutcome};
use crate::core::config::Config;
use crate::core::models;
use crate::core::store::{ChatRecord, MessageRecord};

use app::App;
use draw::draw;
use handlers::{HandleResult, PendingChat};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(io::stdout(), crossterm::event::PopKeyboardEnhancementFlags);
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), crossterm::event::DisableMouseCapture);
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Apply the outcome of a finished request to the chat it belongs to.
fn apply_outcome(app: &mut App, outcome: ReplyOutcome) {
    match outcome {
        ReplyOutcome::Reply(bot) => app.push_message(bot),
        ReplyOutcome::Failed(bot, reason) => {
            app.push_message(bot);
            app.show_toast(format!("Hata: {}", reason), true);
        }
        ReplyOutcome::Cancelled => app.show_toast("İstek iptal edildi", false),
    }
}

/// Read one key, draining the Option+key half of an Esc sequence when needed.
/// Terminals (Ghostty, etc.) send Esc+key; the second byte may arrive with delay.
fn read_key_after_esc(
    key: event::KeyEvent,
    app: &mut App,
    pending_chat: &Option<PendingChat>,
) -> io::Result<event::KeyEvent> {
    if !handlers::would_esc_start_meta_sequence(&key, app, pending_chat) {
        return Ok(key);
    }
    let step_ms = 25u64;
    let mut elapsed = 0u64;
    while elapsed < constants::ESC_SEQUENCE_DRAIN_MS {
        if event::poll(Duration::from_millis(step_ms))? {
            match event::read()? {
                Event::Key(next) => {
                    app.escape_pending = true;
                    return Ok(next);
                }
                Event::Mouse(m) => {
                    let _ = handlers::handle_mouse(m, app);
                    break;
                }
                _ => {}
            }
        }
        elapsed += step_ms;
    }
    Ok(key)
}

/// Run the dashboard loop. Must be called from a blocking thread of a Tokio
/// runtime (`spawn_blocking`); requests are spawned on that runtime.
pub fn run(
    config: Config,
    ctx: ChatContext,
    history: (Vec<ChatRecord>, HashMap<String, Vec<MessageRecord>>),
) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let rt = Handle::try_current()
        .map_err(|e| io::Error::other(format!("No async runtime: {}", e)))?;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        config.model_id.clone(),
        models::display_name(&config.model_id),
        ctx.email.clone(),
        ctx.store.backend_name(),
        config.show_timestamps,
    );
    let (chats, messages) = history;
    log::info!("Dashboard opened with {} chats", chats.len());
    app.set_history(chats, messages);

    let ctx = Arc::new(ctx);
    let mut pending_chat: Option<PendingChat> = None;

    // Mouse: wheel scroll and sidebar clicks
    execute!(io::stdout(), crossterm::event::EnableMouseCapture)?;

    // Kitty keyboard protocol: Alt+key as single event with modifier (Ghostty, WezTerm, kitty, etc.)
    let _ = execute!(
        io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | crossterm::event::KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    );

    loop {
        if let Some(chat) = pending_chat.as_ref() {
            match chat.result_rx.try_recv() {
                Ok(outcome) => {
                    app.waiting_chat = None;
                    apply_outcome(&mut app, outcome);
                    pending_chat = None;
                }
                Err(TryRecvError::Disconnected) => {
                    log::error!("Chat task ended without a result");
                    app.waiting_chat = None;
                    pending_chat = None;
                }
                Err(TryRecvError::Empty) => {}
            }
        }

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Mouse(mouse) => {
                    let _ = handlers::handle_mouse(mouse, &mut app);
                }
                Event::Key(key) => {
                    let key = read_key_after_esc(key, &mut app, &pending_chat)?;
                    let result = handlers::handle_key(
                        key,
                        handlers::HandleKeyContext {
                            app: &mut app,
                            ctx: &ctx,
                            pending_chat: &mut pending_chat,
                            rt: &rt,
                        },
                    );
                    if result == HandleResult::Break {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(pc) = pending_chat {
        pc.cancel_token.cancel();
    }
    terminal.show_cursor()?;
    Ok(())
}
