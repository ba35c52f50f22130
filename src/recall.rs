use std::mem;

/// A bounded ring of previously submitted lines, navigated with Up/Down
/// from the input box. Distinct from the command history shown in the
/// transcript; this only feeds line recall.
#[derive(Debug, PartialEq, Eq)]
pub struct RecallRing<const N: usize> {
    len: usize,
    /// Offset of the recalled line counted back from the newest entry,
    /// none while editing a fresh line.
    cur: Option<usize>,
    stored: [String; N],
}

impl<const N: usize> RecallRing<N> {
    /// The capacity of this ring
    pub const CAPACITY: usize = N;

    /// Create an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a line to the end of the ring, dropping the oldest line once
    /// the capacity is reached. Blank lines are skipped.
    ///
    /// This resets navigation, so the next [Self::prev] returns the newest
    /// line again.
    pub fn push(&mut self, line: String) {
        if line.trim().is_empty() {
            return;
        }

        self.cur = None;
        if self.len == N {
            self.stored.rotate_left(1);
            self.stored[N - 1] = line;
        } else {
            self.stored[self.len] = line;
            self.len += 1;
        }
    }

    /// Pop the newest line of the ring
    pub fn pop(&mut self) -> Option<String> {
        self.cur = None;
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(mem::take(&mut self.stored[self.len]))
        }
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        if idx >= self.len {
            None
        } else {
            self.stored.get(idx).map(String::as_str)
        }
    }

    /// The line navigation currently points at
    pub fn current(&self) -> Option<&str> {
        let cur = self.cur?;
        self.get(self.len.checked_sub(cur + 1)?)
    }

    /// Move navigation one line back and return it
    pub fn prev(&mut self) -> Option<&str> {
        match self.cur.as_mut() {
            Some(cur) => {
                if *cur + 1 < self.len {
                    *cur += 1;
                }
            }
            None => self.cur = Some(0),
        }

        self.current()
    }

    /// Move navigation one line forward and return it; stepping past the
    /// newest line returns to a fresh empty line.
    pub fn next(&mut self) -> Option<&str> {
        if let Some(0) = self.cur {
            self.cur = None;
            return None;
        }

        if let Some(cur) = self.cur.as_mut() {
            *cur -= 1;
            self.current()
        } else {
            Some("")
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stored.iter().map(String::as_str).take(self.len)
    }
}

impl<const N: usize> Default for RecallRing<N> {
    fn default() -> Self {
        Self {
            cur: None,
            len: 0,
            stored: [(); N].map(|_| String::new()),
        }
    }
}
