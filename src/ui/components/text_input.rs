use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editable text with an emacs-style cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Apply an editing key; returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char('b') if ctrl => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char('f') if ctrl => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Char('h') if ctrl => self.backspace(),
            KeyCode::Char('k') if ctrl => {
                let at = self.byte_index(self.cursor);
                self.value.truncate(at);
            }
            KeyCode::Char('u') if ctrl => {
                let at = self.byte_index(self.cursor);
                self.value.drain(..at);
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl && (' '..='~').contains(&c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => return false,
        }
        true
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Text split around the cursor for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::default();
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("desk");
        assert_eq!(input.value(), "desk");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "des");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = typed("dsk");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('e')));
        assert_eq!(input.value(), "desk");
        assert_eq!(input.split_at_cursor(), ("de", "sk"));
    }

    #[test]
    fn test_kill_line_shortcuts() {
        let mut input = typed("home office");
        input.handle_key(ctrl('a'));
        for _ in 0..4 {
            input.handle_key(key(KeyCode::Right));
        }
        input.handle_key(ctrl('k'));
        assert_eq!(input.value(), "home");

        let mut input = typed("home office");
        for _ in 0..6 {
            input.handle_key(key(KeyCode::Left));
        }
        input.handle_key(ctrl('u'));
        assert_eq!(input.value(), "office");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut input = typed("ab");
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "ab");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn test_non_ascii_value_edits_by_char() {
        let mut input = TextInput::with_value("büro");
        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "br");
    }

    #[test]
    fn test_ignores_control_and_unicode_chars() {
        let mut input = TextInput::default();
        assert!(!input.handle_key(key(KeyCode::Char('é'))));
        assert!(!input.handle_key(key(KeyCode::Tab)));
        assert!(input.value().is_empty());
    }
}
