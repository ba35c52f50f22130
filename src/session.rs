use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_json::Value;

/// Display verbosity for the rendered history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Brief,
    Verbose,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Brief
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(Mode::Brief),
            "verbose" => Ok(Mode::Verbose),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Brief => f.write_str("brief"),
            Mode::Verbose => f.write_str("verbose"),
        }
    }
}

/// Outcome of one dispatched command, stored alongside its entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    /// A plain message, success or failure, rendered verbatim.
    Message(String),
    /// Ordered rows of ordered cell strings, rendered as a grid.
    Table(Vec<Vec<String>>),
    /// Anything else, rendered as its JSON text.
    Raw(Value),
}

impl CommandResult {
    pub fn message(s: impl Into<String>) -> Self {
        CommandResult::Message(s.into())
    }
}

/// One submitted command together with its result.
///
/// The id is a monotonically increasing sequence number, so repeated
/// submissions of the same text stay distinct entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub command: String,
    pub result: CommandResult,
}

/// All session-wide REPL state: display mode, loaded dataset, the ordered
/// command history, and the submission counter. Mutated only through the
/// methods below, from the single event-handling thread.
#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    loaded: Option<String>,
    entries: Vec<HistoryEntry>,
    next_id: u64,
    submissions: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    pub fn set_loaded(&mut self, name: impl Into<String>) {
        self.loaded = Some(name.into());
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn count_submission(&mut self) {
        self.submissions += 1;
    }

    /// Append a new entry for `command` with its result. The entry and the
    /// result are created together; there is no path that adds one without
    /// the other.
    pub fn record(&mut self, command: impl Into<String>, result: CommandResult) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(HistoryEntry {
            id,
            command: command.into(),
            result,
        });
        id
    }
}
