//! Single-line text buffer for parameter inputs.

/// Text plus a cursor counted in chars, so multi-byte input edits cleanly.
#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    input: String,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position in chars from the start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.input[..self.byte_offset(self.cursor)]
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.cursor = self.input.chars().count();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.input.remove(at);
        self.cursor -= 1;
    }

    /// One `*` per char, for secret inputs.
    pub fn masked(&self) -> String {
        "*".repeat(self.input.chars().count())
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input.char_indices().nth(chars).map_or(self.input.len(), |(offset, _)| offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_around_multibyte_chars() {
        let mut state = TextInputState::new();
        state.set_input("h\u{1F642}llo");
        assert_eq!(state.cursor(), 5);
        for _ in 0..4 {
            state.move_left();
        }
        state.insert_char('e');
        assert_eq!(state.input(), "he\u{1F642}llo");
        assert_eq!(state.before_cursor(), "he");
        state.move_right();
        state.backspace();
        assert_eq!(state.input(), "hello");
        assert_eq!(state.masked(), "*****");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = TextInputState::new();
        state.backspace();
        state.move_left();
        state.move_right();
        assert_eq!(state.cursor(), 0);
        state.insert_char('a');
        state.move_right();
        assert_eq!(state.cursor(), 1);
    }
}
