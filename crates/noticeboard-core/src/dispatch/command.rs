//! Slash commands recognized in plain-text events.

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start over: clear everything and show the main menu.
    Start,
    /// Back to the main menu; same effect as `Start`.
    Menu,
    /// Open the admin panel.
    Admin,
    /// Abandon a pending admin operation.
    Cancel,
    Unknown(String),
}

impl Command {
    /// Parse `text` as a command. Returns `None` for anything that does not
    /// start with `/`.
    ///
    /// A `@botname` suffix and trailing arguments are ignored, so
    /// `/start@board_bot now` is `Start`.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or_default();
        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "menu" => Command::Menu,
            "admin" => Command::Admin,
            "cancel" => Command::Cancel,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}
