//! Multi-line edit buffer backing every panel input.
//!
//! Cursor columns are char indices, never byte offsets.

/// A single editing operation, independent of any key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Lines of text plus a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl TextBuffer {
    /// Create a buffer holding `text`, cursor at the end.
    pub fn new(text: &str) -> Self {
        let mut buf = Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        };
        buf.set_text(text);
        buf
    }

    /// Replace the whole content and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
    }

    /// Full content, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, char column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// True when the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Apply one edit. Returns true if the content changed.
    pub fn apply(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Insert(c) => {
                let at = byte_index(&self.lines[self.row], self.col);
                self.lines[self.row].insert(at, c);
                self.col += 1;
                true
            }
            EditOp::Newline => {
                let at = byte_index(&self.lines[self.row], self.col);
                let rest = self.lines[self.row].split_off(at);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
                true
            }
            EditOp::Backspace => {
                if self.col > 0 {
                    let at = byte_index(&self.lines[self.row], self.col - 1);
                    self.lines[self.row].remove(at);
                    self.col -= 1;
                    true
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = char_len(&self.lines[self.row]);
                    self.lines[self.row].push_str(&line);
                    true
                } else {
                    false
                }
            }
            EditOp::Delete => {
                if self.col < char_len(&self.lines[self.row]) {
                    let at = byte_index(&self.lines[self.row], self.col);
                    self.lines[self.row].remove(at);
                    true
                } else if self.row + 1 < self.lines.len() {
                    let next = self.lines.remove(self.row + 1);
                    self.lines[self.row].push_str(&next);
                    true
                } else {
                    false
                }
            }
            EditOp::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = char_len(&self.lines[self.row]);
                }
                false
            }
            EditOp::Right => {
                if self.col < char_len(&self.lines[self.row]) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                false
            }
            EditOp::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(char_len(&self.lines[self.row]));
                }
                false
            }
            EditOp::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(char_len(&self.lines[self.row]));
                }
                false
            }
            EditOp::Home => {
                self.col = 0;
                false
            }
            EditOp::End => {
                self.col = char_len(&self.lines[self.row]);
                false
            }
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `col`-th char (or the end of the string).
fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}
