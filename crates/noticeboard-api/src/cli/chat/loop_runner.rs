//! Console chat loop.
//!
//! Lines typed at the prompt become inbound events on an `mpsc` queue drained
//! by the board's event loop; replies come back through the console
//! transport, printed above the prompt.

use std::io::Write;
use std::sync::Arc;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use noticeboard_core::dispatch::EventLoop;
use noticeboard_types::chat::{ActorId, ChatId};
use noticeboard_types::event::InboundEvent;

use crate::state::AppState;

use super::terminal::ConsoleTransport;
use super::input::{ChatInput, ConsoleLine, InputEvent};

/// Run an interactive session as `actor` in `chat` until Ctrl+D or `/quit`.
pub async fn run_chat_loop(state: &AppState, chat: ChatId, actor: ActorId) -> anyhow::Result<()> {
    let prompt = format!("  {} ", style("›").green().bold());
    let (mut input, mut out) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let transport = Arc::new(ConsoleTransport::new(out.clone()));
    let dispatcher = Arc::new(state.dispatcher(transport.clone()));
    let (tx, rx) = mpsc::channel(state.config.event_buffer.max(1));
    let event_loop = tokio::spawn(EventLoop::new(dispatcher, CancellationToken::new()).run(rx));

    let privileged = state.config.admins.contains(&actor.0);
    print_banner(&mut out, chat, actor, privileged)?;
    info!(chat_id = %chat, actor_id = %actor, "console chat started");

    tx.send(InboundEvent::text(chat, actor, "/start")).await?;

    loop {
        let event = match input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                writeln!(out, "  {}", style("Press Ctrl+D or type /quit to exit.").dim())?;
                continue;
            }
            InputEvent::Line(line) => match line {
                ConsoleLine::Empty => continue,
                ConsoleLine::Quit => break,
                ConsoleLine::Help => {
                    print_help(&mut out)?;
                    continue;
                }
                ConsoleLine::Press(n) => match transport.press(n) {
                    Ok((origin, action)) => InboundEvent::action(chat, actor, action).from_message(origin),
                    Err(hint) => {
                        writeln!(out, "  {} {hint}", style("?").yellow().bold())?;
                        continue;
                    }
                },
                ConsoleLine::Text(text) => InboundEvent::text(chat, actor, text),
            },
        };

        if tx.send(event).await.is_err() {
            warn!("event loop stopped, ending console chat");
            break;
        }
    }

    drop(tx);
    match event_loop.await {
        Ok(accepted) => info!(accepted, "console chat ended"),
        Err(e) => warn!(error = %e, "event loop task failed"),
    }
    writeln!(out, "\n  {}", style("Session ended.").dim())?;
    input.flush();
    Ok(())
}

fn print_banner(
    out: &mut SharedWriter,
    chat: ChatId,
    actor: ActorId,
    privileged: bool,
) -> std::io::Result<()> {
    let role = if privileged {
        style("admin").yellow()
    } else {
        style("visitor").dim()
    };
    writeln!(out)?;
    writeln!(out, "  {} {}", style("📋").bold(), style("Noticeboard").cyan().bold())?;
    writeln!(out, "  {}  chat {chat}, actor {actor} ({role})", style("Session:").bold())?;
    writeln!(out)?;
    writeln!(out, "  {}", style("Type /help for console keys, Ctrl+D to exit").dim())?;
    writeln!(out, "  {}", style("---").dim())?;
    Ok(())
}

fn print_help(out: &mut SharedWriter) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Console").bold())?;
    writeln!(out, "  #N           press control N of the latest message")?;
    writeln!(out, "  <label>      type a menu label to open that section")?;
    writeln!(out, "  /quit        leave the chat")?;
    writeln!(out)?;
    writeln!(out, "  {}", style("Board").bold())?;
    writeln!(out, "  /start       main menu, clears any open list")?;
    writeln!(out, "  /menu        same as /start")?;
    writeln!(out, "  /admin       admin panel (admins only)")?;
    writeln!(out, "  /cancel      abandon a pending admin step")?;
    writeln!(out)?;
    Ok(())
}
