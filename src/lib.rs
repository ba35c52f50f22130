pub mod data;

pub mod dispatch;

pub mod recall;

pub mod render;

pub mod session;

use std::{
    fmt::{self, Debug, Formatter},
    io,
    ops::ControlFlow,
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Paragraph, Widget},
    Terminal,
};

use dispatch::Reject;
use recall::RecallRing;
use session::Session;

// TODO add manual scrolling support for long transcripts

/// The REPL widget: one input line under a transcript of every submitted
/// command and its result. All session state lives in [Session]; the widget
/// adds line editing, input recall, and the pending modal notice.
#[derive(Default)]
pub struct Repl<const RECALL_SIZE: usize> {
    current_input: Vec<char>,
    /// Cursor offset counted back from the end of the input line.
    cursor_pos: u16,
    recall: RecallRing<RECALL_SIZE>,
    session: Session,
    notice: Option<Reject>,
}

impl Repl<32> {
    pub fn new() -> Self {
        Self::new_with_session(Session::new())
    }
}

impl<const RECALL_SIZE: usize> Repl<RECALL_SIZE> {
    pub fn new_with_session(session: Session) -> Self {
        Self {
            current_input: Default::default(),
            cursor_pos: 0,
            recall: RecallRing::new(),
            session,
            notice: None,
        }
    }

    pub fn run_fullscreen(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_on_terminal(&mut terminal);

        // restore terminal even when the event loop failed
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    pub fn run_on_terminal<B: Backend>(&mut self, term: &mut Terminal<B>) -> io::Result<()> {
        loop {
            term.draw(|f| {
                let size = f.size();
                let (cursor_x, cursor_y) = self.cursor_pos_in(size);
                f.set_cursor(cursor_x, cursor_y);
                f.render_widget(&*self, size);
            })?;

            if let Event::Key(key) = event::read()? {
                if let ControlFlow::Break(_) = self.feed_key_event(key) {
                    return Ok(());
                }
            }
        }
    }

    pub fn feed_key_event(&mut self, key: KeyEvent) -> ControlFlow<()> {
        if let KeyEvent {
            code: KeyCode::Char('d' | 'q' | 'x'),
            modifiers: KeyModifiers::CONTROL,
        } = key
        {
            return ControlFlow::Break(());
        }

        // A pending notice is modal: the next key only dismisses it.
        if self.notice.take().is_some() {
            return ControlFlow::Continue(());
        }

        match key {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            } => {
                self.current_input.clear();
                self.cursor_pos = 0;
            }
            KeyEvent {
                code: code @ (KeyCode::Up | KeyCode::Down),
                modifiers: KeyModifiers::NONE,
            } => {
                self.current_input = (if code == KeyCode::Up {
                    self.recall.prev()
                } else {
                    self.recall.next()
                })
                .unwrap_or("")
                .chars()
                .collect();
                self.set_cursor_pos(self.cursor_pos);
            }
            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::NONE,
            } => self.set_cursor_pos(self.cursor_pos.saturating_sub(1)),
            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::NONE,
            } => self.set_cursor_pos(self.cursor_pos.saturating_add(1)),
            KeyEvent {
                code: KeyCode::Home,
                modifiers: _,
            } => {
                self.set_cursor_pos(self.current_input.len() as u16);
            }
            KeyEvent {
                code: KeyCode::End,
                modifiers: _,
            } => {
                self.set_cursor_pos(0);
            }
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
            } => self
                .current_input
                .insert(self.current_input.len() - self.cursor_pos as usize, c),
            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::SHIFT,
            } => {
                let at = self.current_input.len() - self.cursor_pos as usize;
                for (offset, c) in c.to_uppercase().enumerate() {
                    self.current_input.insert(at + offset, c);
                }
            }
            KeyEvent {
                code: KeyCode::Backspace,
                modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            } => {
                self.set_cursor_pos(self.cursor_pos);
                let rm_idx = self.current_input.len() - self.cursor_pos as usize;
                if rm_idx != 0 {
                    self.current_input.remove(rm_idx - 1);
                }
            }
            KeyEvent {
                code: KeyCode::Delete,
                modifiers: KeyModifiers::NONE,
            } => {
                self.set_cursor_pos(self.cursor_pos);
                if self.cursor_pos != 0 {
                    self.current_input
                        .remove(self.current_input.len() - self.cursor_pos as usize);
                    self.cursor_pos = self.cursor_pos.saturating_sub(1);
                }
            }
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            } => self.submit(),
            _ => (),
        }

        ControlFlow::Continue(())
    }

    /// Submit the current input line to the dispatcher. Rejections become
    /// the pending notice; everything else lands in the session history.
    pub fn submit(&mut self) {
        let raw: String = self.current_input.iter().collect();
        self.recall.push(raw.clone());

        match dispatch::submit(&mut self.session, &raw) {
            Ok(()) => self.clear_input(),
            Err(reject) => {
                if reject.clears_input() {
                    self.clear_input();
                }
                self.notice = Some(reject);
            }
        }
    }

    fn clear_input(&mut self) {
        self.current_input.clear();
        self.cursor_pos = 0;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn recall(&self) -> &RecallRing<RECALL_SIZE> {
        &self.recall
    }

    pub fn current_input(&self) -> &[char] {
        &self.current_input
    }

    pub fn notice(&self) -> Option<&Reject> {
        self.notice.as_ref()
    }

    fn prompt(&self) -> String {
        format!("[{}]> ", self.session.submissions())
    }

    pub fn cursor_pos_in(&self, rect: Rect) -> (u16, u16) {
        let transcript = render::transcript(self.session.entries(), self.session.mode()).len();
        let notice = usize::from(self.notice.is_some());
        let total = transcript + 1 + notice;
        let visible = total.min(rect.height.max(1) as usize);
        let prompt_row = visible.saturating_sub(1 + notice);

        let x = (self.prompt().chars().count() + self.current_input.len())
            .saturating_sub(self.cursor_pos as usize);
        (x as u16, prompt_row as u16)
    }

    pub fn set_cursor_pos(&mut self, pos: u16) {
        self.cursor_pos = pos.clamp(0, self.current_input.len() as u16)
    }
}

impl<const RECALL_SIZE: usize> Debug for Repl<RECALL_SIZE> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_struct("Repl")
            .field("current_input", &self.current_input)
            .field("cursor_pos", &self.cursor_pos)
            .field("recall", &self.recall)
            .field("session", &self.session)
            .field("notice", &self.notice)
            .finish()
    }
}

impl<const RECALL_SIZE: usize> Widget for &Repl<RECALL_SIZE> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = render::transcript(self.session.entries(), self.session.mode());

        let input: String = self.current_input.iter().collect();
        lines.push(Spans::from(vec![
            Span::styled(self.prompt(), Style::default().fg(Color::Green)),
            Span::raw(input),
        ]));

        if let Some(notice) = &self.notice {
            lines.push(Spans::from(Span::styled(
                notice.to_string(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        let visible = render::tail_window(lines, area.height as usize);
        Paragraph::new(Text::from(visible)).render(area, buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::session::{CommandResult, Mode};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(repl: &mut Repl<32>, line: &str) {
        for c in line.chars() {
            repl.feed_key_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_submitting_records_an_entry() {
        let mut repl = Repl::new();
        type_line(&mut repl, "xyz abc");
        repl.feed_key_event(key(KeyCode::Enter));
        assert!(repl.current_input().is_empty());
        assert_eq!(repl.session().entries().len(), 1);
        assert_eq!(
            repl.session().entries()[0].result,
            CommandResult::message("Invalid command: xyz abc")
        );
    }

    #[test]
    fn empty_submit_raises_notice_without_entries() {
        let mut repl = Repl::new();
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(repl.notice(), Some(&Reject::Empty));
        assert!(repl.session().entries().is_empty());
    }

    #[test]
    fn notice_swallows_exactly_one_key() {
        let mut repl = Repl::new();
        repl.feed_key_event(key(KeyCode::Enter));
        assert!(repl.notice().is_some());

        // First key only dismisses the notice.
        repl.feed_key_event(key(KeyCode::Char('v')));
        assert!(repl.notice().is_none());
        assert!(repl.current_input().is_empty());

        repl.feed_key_event(key(KeyCode::Char('v')));
        assert_eq!(repl.current_input(), ['v']);
    }

    #[test]
    fn bare_mode_keeps_the_input_line() {
        let mut repl = Repl::new();
        type_line(&mut repl, "mode");
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(repl.notice(), Some(&Reject::MissingModeArg));
        assert_eq!(repl.current_input().iter().collect::<String>(), "mode");
    }

    #[test]
    fn invalid_mode_clears_the_input_line() {
        let mut repl = Repl::new();
        type_line(&mut repl, "mode foo");
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(repl.notice(), Some(&Reject::InvalidMode("foo".into())));
        assert!(repl.current_input().is_empty());
        assert_eq!(repl.session().mode(), Mode::Brief);
    }

    #[test]
    fn ctrl_keys_quit() {
        let mut repl = Repl::new();
        assert_eq!(
            repl.feed_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            ControlFlow::Break(())
        );
    }

    #[test]
    fn quit_works_while_a_notice_is_pending() {
        let mut repl = Repl::new();
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(
            repl.feed_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            ControlFlow::Break(())
        );
    }

    #[test]
    fn recall_restores_previous_line() {
        let mut repl = Repl::new();
        type_line(&mut repl, "view");
        repl.feed_key_event(key(KeyCode::Enter));
        assert!(repl.current_input().is_empty());
        repl.feed_key_event(key(KeyCode::Up));
        assert_eq!(repl.current_input().iter().collect::<String>(), "view");
        repl.feed_key_event(key(KeyCode::Down));
        assert!(repl.current_input().is_empty());
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut repl = Repl::new();
        type_line(&mut repl, "viw");
        repl.feed_key_event(key(KeyCode::Left));
        repl.feed_key_event(key(KeyCode::Backspace));
        assert_eq!(repl.current_input().iter().collect::<String>(), "vw");
    }

    #[test]
    fn ctrl_c_discards_the_current_line() {
        let mut repl = Repl::new();
        type_line(&mut repl, "half a comm");
        repl.feed_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(repl.current_input().is_empty());
        assert!(repl.session().entries().is_empty());
    }

    #[test]
    fn prompt_counts_submissions() {
        let mut repl = Repl::new();
        assert_eq!(repl.prompt(), "[0]> ");
        type_line(&mut repl, "view");
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(repl.prompt(), "[1]> ");
        type_line(&mut repl, "mode verbose");
        repl.feed_key_event(key(KeyCode::Enter));
        assert_eq!(repl.prompt(), "[1]> ");
    }
}
