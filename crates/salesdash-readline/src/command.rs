//! Parsing of REPL input lines.

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/health", "/refresh", "/details", "/open", "/close", "/expand", "/reps", "/stats",
    "/reset", "/logs", "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Health,
    Refresh,
    Details,
    Open,
    Close,
    Expand,
    /// Rep roster, optionally filtered to one region.
    Reps(Option<String>),
    Stats,
    Reset,
    /// Recent log events; defaults to [`DEFAULT_LOG_LINES`].
    Logs(usize),
    Help,
    Quit,
    /// Free text for the assistant.
    Ask(String),
    Empty,
    Unknown(String),
}

pub const DEFAULT_LOG_LINES: usize = 20;

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if line == "quit" || line == "exit" {
            return Self::Quit;
        }
        if !line.starts_with('/') {
            return Self::Ask(line.to_string());
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match name {
            "/health" => Self::Health,
            "/refresh" => Self::Refresh,
            "/details" => Self::Details,
            "/open" => Self::Open,
            "/close" => Self::Close,
            "/expand" => Self::Expand,
            "/reps" => Self::Reps(argument),
            "/stats" => Self::Stats,
            "/reset" => Self::Reset,
            "/logs" => Self::Logs(
                argument
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_LOG_LINES),
            ),
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        }
    }

    /// Whether the command targets the health details popover. Anything else
    /// counts as an interaction outside it.
    pub fn targets_details(&self) -> bool {
        matches!(self, Self::Details | Self::Expand | Self::Health | Self::Empty)
    }
}
