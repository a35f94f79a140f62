use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// The text changed.
    Edited,
    /// Only the cursor moved.
    Moved,
    NotHandled,
}

/// Single-line text buffer with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor_pos: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor_pos = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Display columns between the start of the text and the cursor.
    pub fn cursor_offset(&self) -> usize {
        self.value
            .chars()
            .take(self.cursor_pos)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => edited(self.delete_word_left()),
            KeyCode::Char(_)
                if ctrl
                    || key.modifiers.contains(KeyModifiers::ALT)
                    || key.modifiers.contains(KeyModifiers::SUPER) =>
            {
                KeyResult::NotHandled
            }
            KeyCode::Char(ch) => {
                self.insert_char(ch);
                KeyResult::Edited
            }
            KeyCode::Backspace if ctrl => edited(self.delete_word_left()),
            KeyCode::Backspace => edited(self.delete_left()),
            KeyCode::Delete if ctrl => edited(self.delete_word_right()),
            KeyCode::Delete => edited(self.delete_right()),
            KeyCode::Left if ctrl => moved(self.move_word_left()),
            KeyCode::Left => moved(self.move_left()),
            KeyCode::Right if ctrl => moved(self.move_word_right()),
            KeyCode::Right => moved(self.move_right()),
            KeyCode::Home => moved(self.move_to(0)),
            KeyCode::End => moved(self.move_to(self.value.chars().count())),
            _ => KeyResult::NotHandled,
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn insert_char(&mut self, ch: char) {
        let byte_pos = self.byte_index(self.cursor_pos);
        self.value.insert(byte_pos, ch);
        self.cursor_pos += 1;
    }

    fn delete_left(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let byte_pos = self.byte_index(self.cursor_pos - 1);
        self.value.remove(byte_pos);
        self.cursor_pos -= 1;
        true
    }

    fn delete_right(&mut self) -> bool {
        if self.cursor_pos >= self.value.chars().count() {
            return false;
        }
        let byte_pos = self.byte_index(self.cursor_pos);
        self.value.remove(byte_pos);
        true
    }

    fn is_separator(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '.' | '/' | ',' | '-' | '@')
    }

    fn word_start_before(&self, pos: usize) -> usize {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = pos;
        while pos > 0 && Self::is_separator(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && !Self::is_separator(chars[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    fn word_end_after(&self, pos: usize) -> usize {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = pos;
        while pos < chars.len() && Self::is_separator(chars[pos]) {
            pos += 1;
        }
        while pos < chars.len() && !Self::is_separator(chars[pos]) {
            pos += 1;
        }
        pos
    }

    fn delete_word_left(&mut self) -> bool {
        let start = self.word_start_before(self.cursor_pos);
        if start == self.cursor_pos {
            return false;
        }
        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor_pos);
        self.value.replace_range(from..to, "");
        self.cursor_pos = start;
        true
    }

    fn delete_word_right(&mut self) -> bool {
        let end = self.word_end_after(self.cursor_pos);
        if end == self.cursor_pos {
            return false;
        }
        let from = self.byte_index(self.cursor_pos);
        let to = self.byte_index(end);
        self.value.replace_range(from..to, "");
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        self.cursor_pos -= 1;
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor_pos >= self.value.chars().count() {
            return false;
        }
        self.cursor_pos += 1;
        true
    }

    fn move_word_left(&mut self) -> bool {
        let pos = self.word_start_before(self.cursor_pos);
        self.move_to(pos)
    }

    fn move_word_right(&mut self) -> bool {
        let pos = self.word_end_after(self.cursor_pos);
        self.move_to(pos)
    }

    fn move_to(&mut self, pos: usize) -> bool {
        if pos == self.cursor_pos {
            return false;
        }
        self.cursor_pos = pos;
        true
    }
}

fn edited(changed: bool) -> KeyResult {
    if changed {
        KeyResult::Edited
    } else {
        KeyResult::NotHandled
    }
}

fn moved(changed: bool) -> KeyResult {
    if changed {
        KeyResult::Moved
    } else {
        KeyResult::NotHandled
    }
}
