//! Terminal transport for the console chat.
//!
//! Every outbound message gets a console-local id and is printed with it;
//! edits reprint the message marked as edited. Inline controls are numbered
//! in reading order so the user can press them with `#N`.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use console::style;
use dashmap::DashMap;

use noticeboard_core::transport::Transport;
use noticeboard_types::chat::{ChatId, MessageId};
use noticeboard_types::error::TransportError;
use noticeboard_types::view::{Action, Markup, View};

/// Transport that prints to a terminal writer.
///
/// Generic over the writer so the chat loop can pass the readline
/// `SharedWriter` and tests can pass a byte buffer.
pub struct ConsoleTransport<W> {
    out: Mutex<W>,
    next_id: AtomicI64,
    messages: DashMap<MessageId, View>,
    latest: Mutex<Option<MessageId>>,
}

impl<W: Write + Send> ConsoleTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            next_id: AtomicI64::new(1),
            messages: DashMap::new(),
            latest: Mutex::new(None),
        }
    }

    /// Resolve `#n` against the most recently sent or edited message.
    ///
    /// Returns the message the control belongs to (the event origin) and the
    /// control's action.
    pub fn press(&self, n: usize) -> Result<(MessageId, Action), String> {
        let latest = *self
            .latest
            .lock()
            .map_err(|_| "console state poisoned".to_string())?;
        let latest = latest.ok_or_else(|| "No message to press a control on yet.".to_string())?;
        let view = self
            .messages
            .get(&latest)
            .ok_or_else(|| format!("Message #{latest} is gone."))?;

        let controls = view.controls();
        let control = n
            .checked_sub(1)
            .and_then(|i| controls.get(i))
            .ok_or_else(|| format!("Message #{latest} has {} control(s).", controls.len()))?;
        if !control.enabled {
            return Err(format!("\"{}\" is not available here.", control.label));
        }
        Ok((latest, control.action))
    }

    fn write(&self, text: &str) -> Result<(), TransportError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| TransportError::Delivery("console writer poisoned".to_string()))?;
        writeln!(out, "{text}").map_err(|e| TransportError::Delivery(e.to_string()))
    }

    fn touch(&self, message: MessageId) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(message);
        }
    }
}

impl<W: Write + Send> Transport for ConsoleTransport<W> {
    async fn send(&self, _chat: ChatId, view: &View) -> Result<MessageId, TransportError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write(&render(id, view, false))?;
        self.messages.insert(id, view.clone());
        self.touch(id);
        Ok(id)
    }

    async fn edit(
        &self,
        _chat: ChatId,
        message: MessageId,
        view: &View,
    ) -> Result<(), TransportError> {
        if !self.messages.contains_key(&message) {
            return Err(TransportError::MessageNotFound(message));
        }
        self.write(&render(message, view, true))?;
        self.messages.insert(message, view.clone());
        self.touch(message);
        Ok(())
    }

    async fn delete(&self, _chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        if self.messages.remove(&message).is_none() {
            return Err(TransportError::MessageNotFound(message));
        }
        self.write(&format!("  {}", style(format!("[#{message} deleted]")).dim()))
    }

    async fn notify(&self, _chat: ChatId, text: &str) -> Result<(), TransportError> {
        self.write(&format!("  {} {}", style("!").yellow().bold(), text))
    }
}

/// Format a message for the terminal.
fn render(id: MessageId, view: &View, edited: bool) -> String {
    let tag = if edited {
        format!("[#{id} edited]")
    } else {
        format!("[#{id}]")
    };

    let mut lines = vec![String::new()];
    let mut body = view.text.lines();
    lines.push(format!(
        "  {} {}",
        style(tag).cyan().bold(),
        body.next().unwrap_or_default()
    ));
    lines.extend(body.map(|line| format!("       {line}")));

    match &view.markup {
        Markup::None => {}
        Markup::Inline(rows) => {
            let mut n = 0;
            for row in rows {
                let cells: Vec<String> = row
                    .iter()
                    .map(|control| {
                        n += 1;
                        let cell = format!("[{n}] {}", control.label);
                        if control.enabled {
                            style(cell).green().to_string()
                        } else {
                            style(cell).dim().to_string()
                        }
                    })
                    .collect();
                lines.push(format!("       {}", cells.join("  ")));
            }
        }
        Markup::Menu(rows) => {
            for row in rows {
                let cells: Vec<String> = row
                    .iter()
                    .map(|label| style(format!("‹{label}›")).magenta().to_string())
                    .collect();
                lines.push(format!("       {}", cells.join("  ")));
            }
        }
    }
    lines.join("\n")
}
