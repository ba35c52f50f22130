//! Stateless projection of the command history into terminal lines. Nothing
//! here mutates the session; mode only changes how existing entries are
//! shown.

use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

use crate::session::{CommandResult, HistoryEntry, Mode};

const GUTTER: &str = "  ";

/// Render the full history as owned lines, oldest first, with a header.
pub fn transcript(entries: &[HistoryEntry], mode: Mode) -> Vec<Spans<'static>> {
    let mut lines = vec![Spans::from(Span::styled(
        "COMMAND HISTORY",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for entry in entries {
        match mode {
            Mode::Brief => lines.extend(result_lines(&entry.result)),
            Mode::Verbose => {
                lines.push(Spans::from(vec![
                    Span::styled("Command: ", Style::default().fg(Color::Cyan)),
                    Span::raw(entry.command.clone()),
                ]));
                let label = Span::styled("Output: ", Style::default().fg(Color::Cyan));
                match &entry.result {
                    CommandResult::Table(_) => {
                        lines.push(Spans::from(label));
                        lines.extend(result_lines(&entry.result));
                    }
                    result => {
                        let mut rendered = result_lines(result);
                        // Message and Raw always render as a single line.
                        let mut spans = vec![label];
                        spans.extend(rendered.remove(0).0);
                        lines.push(Spans::from(spans));
                    }
                }
            }
        }
    }

    lines
}

/// Render one result on its own: a grid for tables, the text verbatim for
/// messages, JSON text for anything else.
pub fn result_lines(result: &CommandResult) -> Vec<Spans<'static>> {
    match result {
        CommandResult::Message(text) => vec![Spans::from(text.clone())],
        CommandResult::Table(rows) => grid(rows),
        CommandResult::Raw(value) => vec![Spans::from(value.to_string())],
    }
}

/// Pad every cell to its column's widest entry, one terminal line per row.
fn grid(rows: &[Vec<String>]) -> Vec<Spans<'static>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (cell, width) in row.iter().zip(widths.iter_mut()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (idx, cell) in row.iter().enumerate() {
                if idx > 0 {
                    line.push_str(GUTTER);
                }
                line.push_str(cell);
                // No trailing padding on the last cell of the row.
                if idx + 1 < row.len() {
                    for _ in cell.chars().count()..widths[idx] {
                        line.push(' ');
                    }
                }
            }
            Spans::from(line)
        })
        .collect()
}

/// Keep only the last `max_height` lines so the newest output stays in view.
pub fn tail_window(lines: Vec<Spans<'static>>, max_height: usize) -> Vec<Spans<'static>> {
    let skip = lines.len().saturating_sub(max_height);
    lines.into_iter().skip(skip).collect()
}
