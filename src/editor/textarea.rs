//! Rope-backed text-input widget and the in-memory mount point that hosts it.

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ropey::Rope;

use super::{Container, InputWidget};

/// Caret position in the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Byte offset within the line.
    pub col: usize,
}

impl Position {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Mount point that counts the widgets currently attached to it.
#[derive(Debug, Clone, Default)]
pub struct Pane {
    mounted: Rc<Cell<usize>>,
}

impl Pane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.get()
    }
}

impl Container for Pane {
    type Widget = TextArea;

    fn mount(&mut self, class_name: &str, initial: &str) -> TextArea {
        self.mounted.set(self.mounted.get() + 1);
        let mut widget = TextArea::from_text(initial);
        widget.class_name = class_name.to_string();
        widget.mount = Some(Rc::clone(&self.mounted));
        widget
    }
}

/// Line breaks recognized by the rope. A line ends in at most one, or a CRLF pair.
const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// A multi-line text field with a caret and an optional selection.
///
/// Columns are byte offsets; the caret always sits on a char boundary.
pub struct TextArea {
    rope: Rope,
    caret: Position,
    /// Remembered column for vertical movement.
    sticky_col: usize,
    /// Other end of the selection, if one is active.
    anchor: Option<Position>,
    class_name: String,
    mount: Option<Rc<Cell<usize>>>,
}

impl TextArea {
    /// A detached widget holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: Position::default(),
            sticky_col: 0,
            anchor: None,
            class_name: String::new(),
            mount: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub const fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub const fn caret(&self) -> Position {
        self.caret
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line ending.
    ///
    /// Every break the rope splits lines on counts, not just `\n`.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(is_line_break).to_string())
    }

    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// Select a byte range of the text. The caret lands on `range.end`.
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.position_at(range.start);
        let end = self.position_at(range.end);
        self.anchor = (start != end).then_some(start);
        self.set_caret(end);
    }

    pub fn select_all(&mut self) {
        self.select(0..self.rope.len_bytes());
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Insert at the caret, replacing the selection.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        if s.is_empty() {
            return;
        }
        let at = self.offset(self.caret);
        self.rope.insert(self.rope.byte_to_char(at), s);
        self.set_caret(self.position_at(at + s.len()));
    }

    /// Delete the selection, or the char before the caret.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.offset(self.caret);
        if at == 0 {
            return false;
        }
        let char_idx = self.rope.byte_to_char(at);
        let prev = self.rope.char_to_byte(char_idx - 1);
        // Remove a CRLF pair as one line break.
        let start = if self.rope.char(char_idx - 1) == '\n'
            && char_idx >= 2
            && self.rope.char(char_idx - 2) == '\r'
        {
            char_idx - 2
        } else {
            char_idx - 1
        };
        self.rope.remove(start..char_idx);
        let prev = if start + 1 < char_idx { prev - 1 } else { prev };
        self.set_caret(self.position_at(prev));
        true
    }

    /// Delete the selection, or the char after the caret.
    pub fn delete(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let char_idx = self.rope.byte_to_char(self.offset(self.caret));
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        let end = if self.rope.char(char_idx) == '\r'
            && self.rope.get_char(char_idx + 1) == Some('\n')
        {
            char_idx + 2
        } else {
            char_idx + 1
        };
        self.rope.remove(char_idx..end);
        true
    }

    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = self.floor_boundary(line, col.min(self.line_len(line)));
        self.set_caret(Position::at(line, col));
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.set_caret(Position::at(last, self.line_len(last)));
    }

    fn move_left(&mut self) {
        if self.caret.col > 0 {
            let line = self.line_at(self.caret.line).unwrap_or_default();
            let width = line[..self.caret.col]
                .chars()
                .next_back()
                .map_or(1, char::len_utf8);
            self.set_caret(Position::at(self.caret.line, self.caret.col - width));
        } else if self.caret.line > 0 {
            let line = self.caret.line - 1;
            self.set_caret(Position::at(line, self.line_len(line)));
        }
    }

    fn move_right(&mut self) {
        let line = self.line_at(self.caret.line).unwrap_or_default();
        if self.caret.col < line.len() {
            let width = line[self.caret.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.set_caret(Position::at(self.caret.line, self.caret.col + width));
        } else if self.caret.line + 1 < self.line_count() {
            self.set_caret(Position::at(self.caret.line + 1, 0));
        }
    }

    fn move_vertical(&mut self, down: bool) {
        let target = if down {
            self.caret.line + 1
        } else {
            match self.caret.line.checked_sub(1) {
                Some(line) => line,
                None => return,
            }
        };
        if target >= self.line_count() {
            return;
        }
        let col = self.floor_boundary(target, self.sticky_col.min(self.line_len(target)));
        self.caret = Position::at(target, col);
    }

    fn move_word(&mut self, forward: bool) {
        let line = self.line_at(self.caret.line).unwrap_or_default();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        if forward {
            if self.caret.col >= line.len() {
                self.move_right();
                return;
            }
            let after = &line[self.caret.col..];
            let word_end = after.find(|c: char| !is_word(c)).unwrap_or(after.len());
            let gap = after[word_end..].find(is_word).unwrap_or(after.len() - word_end);
            self.set_caret(Position::at(self.caret.line, self.caret.col + word_end + gap));
        } else {
            if self.caret.col == 0 {
                self.move_left();
                return;
            }
            let before = line[..self.caret.col].trim_end();
            let start = before
                .rfind(|c: char| !is_word(c))
                .map_or(0, |i| i + before[i..].chars().next().map_or(1, char::len_utf8));
            self.set_caret(Position::at(self.caret.line, start));
        }
    }

    /// Remove the selected text. Returns `true` if anything was selected.
    fn delete_selection(&mut self) -> bool {
        let Some(anchor) = self.anchor.take() else {
            return false;
        };
        let (start, end) = if anchor <= self.caret {
            (anchor, self.caret)
        } else {
            (self.caret, anchor)
        };
        let start_byte = self.offset(start);
        let range = self.rope.byte_to_char(start_byte)..self.rope.byte_to_char(self.offset(end));
        self.rope.remove(range);
        self.set_caret(start);
        true
    }

    fn offset(&self, pos: Position) -> usize {
        self.rope.line_to_byte(pos.line) + pos.col
    }

    fn position_at(&self, byte: usize) -> Position {
        let byte = byte.min(self.rope.len_bytes());
        let char_idx = self.rope.byte_to_char(byte);
        let line = self.rope.char_to_line(char_idx);
        let col = self.rope.char_to_byte(char_idx) - self.rope.line_to_byte(line);
        Position::at(line, col.min(self.line_len(line)))
    }

    fn floor_boundary(&self, line: usize, col: usize) -> usize {
        let text = self.line_at(line).unwrap_or_default();
        let mut col = col.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        col
    }

    const fn set_caret(&mut self, pos: Position) {
        self.caret = pos;
        self.sticky_col = pos.col;
    }

    /// Move the caret, extending the selection when `extend` is set.
    fn navigate(&mut self, extend: bool, step: impl FnOnce(&mut Self)) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.caret);
            }
        } else {
            self.anchor = None;
        }
        step(self);
        if self.anchor == Some(self.caret) {
            self.anchor = None;
        }
    }
}

impl InputWidget for TextArea {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        let caret = self.offset(self.caret);
        self.rope = Rope::from_str(text);
        self.anchor = None;
        self.set_caret(self.position_at(caret));
    }

    fn apply_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('a') if ctrl => {
                self.select_all();
                false
            }
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut buf = [0u8; 4];
                self.insert_str(ch.encode_utf8(&mut buf));
                true
            }
            KeyCode::Esc => {
                self.clear_selection();
                false
            }
            KeyCode::Enter => {
                self.insert_str("\n");
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left if ctrl => {
                self.navigate(shift, |t| t.move_word(false));
                false
            }
            KeyCode::Right if ctrl => {
                self.navigate(shift, |t| t.move_word(true));
                false
            }
            KeyCode::Left => {
                self.navigate(shift, Self::move_left);
                false
            }
            KeyCode::Right => {
                self.navigate(shift, Self::move_right);
                false
            }
            KeyCode::Up => {
                self.navigate(shift, |t| t.move_vertical(false));
                false
            }
            KeyCode::Down => {
                self.navigate(shift, |t| t.move_vertical(true));
                false
            }
            KeyCode::Home if ctrl => {
                self.navigate(shift, |t| t.set_caret(Position::default()));
                false
            }
            KeyCode::End if ctrl => {
                self.navigate(shift, Self::move_to_end);
                false
            }
            KeyCode::Home => {
                self.navigate(shift, |t| t.set_caret(Position::at(t.caret.line, 0)));
                false
            }
            KeyCode::End => {
                self.navigate(shift, |t| {
                    t.set_caret(Position::at(t.caret.line, t.line_len(t.caret.line)));
                });
                false
            }
            _ => false,
        }
    }

    fn selection(&self) -> Range<usize> {
        let caret = self.offset(self.caret);
        match self.anchor {
            Some(anchor) => {
                let anchor = self.offset(anchor);
                anchor.min(caret)..anchor.max(caret)
            }
            None => caret..caret,
        }
    }

    fn remove(&mut self) {
        if let Some(mounted) = self.mount.take() {
            mounted.set(mounted.get().saturating_sub(1));
        }
    }
}

impl std::fmt::Debug for TextArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextArea")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("caret", &self.caret)
            .field("anchor", &self.anchor)
            .field("class_name", &self.class_name)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(area: &mut TextArea, code: KeyCode) -> bool {
        area.apply_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press_with(area: &mut TextArea, code: KeyCode, modifiers: KeyModifiers) -> bool {
        area.apply_key(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_empty_area_has_one_line() {
        let area = TextArea::from_text("");
        assert_eq!(area.line_count(), 1);
        assert_eq!(area.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_line_at_strips_line_endings() {
        let area = TextArea::from_text("hello\r\nworld");
        assert_eq!(area.line_at(0), Some("hello".to_string()));
        assert_eq!(area.line_at(1), Some("world".to_string()));
        assert_eq!(area.line_at(2), None);
    }

    #[test]
    fn test_unicode_line_separators_end_lines() {
        let mut area = TextArea::from_text("a\u{2028}b\u{85}c");
        assert_eq!(area.line_count(), 3);
        assert_eq!(area.line_at(0), Some("a".to_string()));
        assert_eq!(area.line_at(1), Some("b".to_string()));

        press(&mut area, KeyCode::End);
        assert_eq!(area.caret(), Position::at(0, 1));
        press(&mut area, KeyCode::Char('x'));
        assert_eq!(area.text(), "ax\u{2028}b\u{85}c");
        assert_eq!(area.caret(), Position::at(0, 2));
    }

    #[test]
    fn test_right_arrow_steps_over_line_separator() {
        let mut area = TextArea::from_text("a\u{2029}b");
        area.move_to(0, 1);
        press(&mut area, KeyCode::Right);
        assert_eq!(area.caret(), Position::at(1, 0));
    }

    #[test]
    fn test_typing_inserts_at_caret() {
        let mut area = TextArea::from_text("hllo");
        press(&mut area, KeyCode::Right);
        assert!(press(&mut area, KeyCode::Char('e')));
        assert_eq!(area.text(), "hello");
        assert_eq!(area.caret(), Position::at(0, 2));
    }

    #[test]
    fn test_enter_splits_line() {
        let mut area = TextArea::from_text("helloworld");
        area.move_to(0, 5);
        assert!(press(&mut area, KeyCode::Enter));
        assert_eq!(area.line_at(0), Some("hello".to_string()));
        assert_eq!(area.line_at(1), Some("world".to_string()));
        assert_eq!(area.caret(), Position::at(1, 0));
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut area = TextArea::from_text("hello");
        assert!(!press(&mut area, KeyCode::Backspace));
        assert_eq!(area.text(), "hello");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut area = TextArea::from_text("hello\nworld");
        area.move_to(1, 0);
        assert!(press(&mut area, KeyCode::Backspace));
        assert_eq!(area.text(), "helloworld");
        assert_eq!(area.caret(), Position::at(0, 5));
    }

    #[test]
    fn test_backspace_removes_crlf_pair() {
        let mut area = TextArea::from_text("ab\r\ncd");
        area.move_to(1, 0);
        assert!(press(&mut area, KeyCode::Backspace));
        assert_eq!(area.text(), "abcd");
        assert_eq!(area.caret(), Position::at(0, 2));
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut area = TextArea::from_text("café");
        area.move_to_end();
        assert_eq!(area.caret().col, 5);
        press(&mut area, KeyCode::Backspace);
        assert_eq!(area.text(), "caf");
        assert_eq!(area.caret().col, 3);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut area = TextArea::from_text("hello");
        area.move_to_end();
        assert!(!press(&mut area, KeyCode::Delete));
    }

    #[test]
    fn test_delete_joins_lines() {
        let mut area = TextArea::from_text("hello\nworld");
        area.move_to(0, 5);
        assert!(press(&mut area, KeyCode::Delete));
        assert_eq!(area.text(), "helloworld");
    }

    #[test]
    fn test_vertical_movement_keeps_sticky_column() {
        let mut area = TextArea::from_text("hello\nhi\nworld");
        area.move_to(0, 4);
        press(&mut area, KeyCode::Down);
        assert_eq!(area.caret(), Position::at(1, 2));
        press(&mut area, KeyCode::Down);
        assert_eq!(area.caret(), Position::at(2, 4));
    }

    #[test]
    fn test_word_movement() {
        let mut area = TextArea::from_text("hello world");
        press_with(&mut area, KeyCode::Right, KeyModifiers::CONTROL);
        assert_eq!(area.caret().col, 6);
        area.move_to(0, 8);
        press_with(&mut area, KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(area.caret().col, 6);
    }

    #[test]
    fn test_shift_arrows_extend_selection() {
        let mut area = TextArea::from_text("hello");
        press_with(&mut area, KeyCode::Right, KeyModifiers::SHIFT);
        press_with(&mut area, KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(area.selection(), 0..2);

        press(&mut area, KeyCode::Right);
        assert_eq!(area.selection(), 3..3);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut area = TextArea::from_text("hello world");
        area.select(6..11);
        press(&mut area, KeyCode::Char('x'));
        assert_eq!(area.text(), "hello x");
    }

    #[test]
    fn test_select_all_then_backspace_clears() {
        let mut area = TextArea::from_text("a\nb");
        press_with(&mut area, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(area.selection(), 0..3);
        assert!(press(&mut area, KeyCode::Backspace));
        assert_eq!(area.text(), "");
    }

    #[test]
    fn test_escape_drops_selection() {
        let mut area = TextArea::from_text("hello");
        area.select_all();
        assert!(!press(&mut area, KeyCode::Esc));
        assert_eq!(area.selection(), 5..5);
        press(&mut area, KeyCode::Char('!'));
        assert_eq!(area.text(), "hello!");
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut area = TextArea::from_text("");
        assert!(!press_with(&mut area, KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(area.text(), "");
    }

    #[test]
    fn test_set_text_clamps_caret() {
        let mut area = TextArea::from_text("hello world");
        area.move_to_end();
        area.set_text("hi");
        assert_eq!(area.caret(), Position::at(0, 2));
    }

    #[test]
    fn test_pane_tracks_mounts() {
        let mut pane = Pane::new();
        let mut area = pane.mount("leaf-editor", "x");
        assert!(area.is_mounted());
        assert_eq!(pane.mounted_count(), 1);
        area.remove();
        area.remove();
        assert!(!area.is_mounted());
        assert_eq!(pane.mounted_count(), 0);
    }
}
