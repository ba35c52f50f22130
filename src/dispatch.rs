//! Command parsing and dispatch.
//!
//! Raw input is classified into one of three outcomes: a blocking rejection
//! (surfaced as a modal notice, no state change), a mode change, or a
//! sub-command dispatch that always records exactly one history entry.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    data,
    session::{CommandResult, Mode, Session},
};

// Keyword is case-insensitive, the argument is validated separately.
static MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^mode\s+(.+)$").unwrap());

/// A submission rejected before dispatch. These block with an alert instead
/// of being recorded in the history; the display strings are the exact
/// user-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reject {
    #[error("Command cannot be empty")]
    Empty,
    #[error("Missing mode type")]
    MissingModeArg,
    #[error("Invalid mode: {0}. Use brief or verbose")]
    InvalidMode(String),
}

impl Reject {
    /// Whether the input box should be cleared despite the rejection.
    /// Empty and bare-mode submissions never reach dispatch and keep their
    /// text; an invalid mode value does reach it and clears.
    pub fn clears_input(&self) -> bool {
        matches!(self, Reject::InvalidMode(_))
    }
}

/// Process one submitted line against the session.
///
/// On `Ok` the session gained exactly one history entry (and, for mode
/// changes, a new mode). On `Err` the session is untouched.
pub fn submit(session: &mut Session, raw: &str) -> Result<(), Reject> {
    let trimmed = raw.trim();
    debug!(command = trimmed, "dispatching command");

    if trimmed.is_empty() {
        warn!("rejected empty command");
        return Err(Reject::Empty);
    }
    if trimmed == "mode" {
        warn!("rejected mode command without argument");
        return Err(Reject::MissingModeArg);
    }

    if let Some(captures) = MODE_RE.captures(trimmed) {
        let wanted = captures[1].trim();
        return match wanted.parse::<Mode>() {
            Ok(mode) => {
                session.set_mode(mode);
                session.record(trimmed, CommandResult::message(format!("Mode changed to {mode}")));
                info!(%mode, "display mode changed");
                Ok(())
            }
            Err(()) => {
                warn!(wanted, "rejected invalid mode");
                Err(Reject::InvalidMode(wanted.to_string()))
            }
        };
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let result = match tokens[0] {
        "load_file" => {
            let mut loaded = None;
            let result = data::load(&tokens, |name| loaded = Some(name.to_string()));
            if let Some(name) = loaded {
                info!(dataset = %name, "dataset loaded");
                session.set_loaded(name);
            }
            result
        }
        "view" => data::view(session.loaded()),
        "search" => data::search(trimmed, session.loaded()),
        _ => CommandResult::message(format!("Invalid command: {trimmed}")),
    };

    session.record(trimmed, result);
    session.count_submission();
    Ok(())
}
