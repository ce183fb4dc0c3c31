//! Async readline input for the console chat.
//!
//! Wraps `rustyline_async::Readline` and classifies each submitted line.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    Line(ConsoleLine),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// A submitted line, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleLine {
    Empty,
    /// `#N`: press the N-th control of the latest message (1-based).
    Press(usize),
    /// Console-local help.
    Help,
    /// `/quit` or `/exit`.
    Quit,
    /// Anything else goes to the board as a text event, commands included.
    Text(String),
}

pub fn parse_line(line: &str) -> ConsoleLine {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleLine::Empty;
    }
    if let Some(raw) = line.strip_prefix('#')
        && let Ok(n) = raw.trim().parse::<usize>()
    {
        return ConsoleLine::Press(n);
    }
    match line {
        "/quit" | "/exit" => ConsoleLine::Quit,
        "/help" | "/?" => ConsoleLine::Help,
        _ => ConsoleLine::Text(line.to_string()),
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and a `SharedWriter` for printing without
    /// clobbering the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, out) = Readline::new(prompt)?;
        Ok((Self { rl }, out))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let parsed = parse_line(&line);
                if !matches!(parsed, ConsoleLine::Empty) {
                    self.rl.add_history_entry(line.trim().to_string());
                }
                InputEvent::Line(parsed)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(_) => InputEvent::Eof,
        }
    }

    /// Flush pending output before the prompt goes away.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
