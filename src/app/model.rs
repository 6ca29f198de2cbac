use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::{
    Editor, EditorEvent, EditorOptions, KEYDOWN, Pane, TextArea, create_editor,
};
use crate::events::Listener;
use crate::parser::MarkdownParser;
use crate::preview::Preview;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete editor-host state.
pub struct Model {
    pub file_path: PathBuf,
    pub editor: Editor<TextArea>,
    pub preview: Preview,
    /// Text as last loaded or saved.
    saved_value: String,
    /// Last key seen by the keydown listener.
    last_key: Rc<RefCell<Option<String>>>,
    toast: Option<Toast>,
    quit_armed: bool,
    pub should_quit: bool,
}

impl Model {
    pub fn new(file_path: PathBuf, source: String, theme: Option<String>) -> Self {
        let mut options = EditorOptions::default().with_initial_value(source.clone());
        options.theme = theme;
        let mut editor = create_editor(Pane::new(), options);
        let preview = Preview::attach(&mut editor, MarkdownParser::new());

        let last_key = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_key);
        editor.on(
            KEYDOWN,
            Listener::infallible(move |event: &EditorEvent| {
                if let Some(key) = event.key() {
                    *sink.borrow_mut() = Some(describe_key(key));
                }
            }),
        );

        Self {
            file_path,
            editor,
            preview,
            saved_value: source,
            last_key,
            toast: None,
            quit_armed: false,
            should_quit: false,
        }
    }

    /// Whether the text differs from the file on disk.
    pub fn is_dirty(&self) -> bool {
        self.editor.get_value() != self.saved_value
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string())
    }

    pub fn last_key(&self) -> Option<String> {
        self.last_key.borrow().clone()
    }

    pub fn theme(&self) -> Option<&str> {
        self.editor.theme()
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_LIFETIME,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.expires_at) {
            self.toast = None;
        }
    }

    pub(super) fn save(&mut self) -> Result<()> {
        write_source(&self.file_path, self.editor.get_value())?;
        self.saved_value = self.editor.get_value().to_string();
        tracing::info!(path = %self.file_path.display(), "saved");
        Ok(())
    }

    /// First quit request with unsaved changes only arms the second.
    pub(super) fn request_quit(&mut self) {
        if self.is_dirty() && !self.quit_armed {
            self.quit_armed = true;
            self.show_toast(
                ToastLevel::Warning,
                "Unsaved changes: press Ctrl-Q again to quit",
            );
            return;
        }
        self.should_quit = true;
    }

    pub(super) const fn disarm_quit(&mut self) {
        self.quit_armed = false;
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("editor", &self.editor)
            .field("preview", &self.preview)
            .field("dirty", &self.is_dirty())
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

fn write_source(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Short human-readable name for a key, e.g. `Ctrl+S`.
pub fn describe_key(key: &KeyEvent) -> String {
    let base = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        _ => "?".to_string(),
    };
    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
        name.push_str("Shift+");
    }
    name.push_str(&base);
    name
}
