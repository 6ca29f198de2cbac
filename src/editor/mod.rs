//! The editable text surface.
//!
//! An [`Editor`] owns the current markdown source and a mounted input
//! widget, keeps the two in sync, and raises `"change"` and `"keydown"`
//! notifications. The host toolkit is reached only through the
//! [`Container`] and [`InputWidget`] traits; [`textarea`] provides an
//! in-memory implementation used by the terminal host and the tests.

pub mod textarea;

use std::ops::Range;

use crossterm::event::KeyEvent;

use crate::events::{Delivery, Listener, Notifier};
use crate::toolbar::Command;

pub use textarea::{Pane, Position, TextArea};

/// Event raised on every user edit and every [`Editor::set_value`].
pub const CHANGE: &str = "change";
/// Event raised on every key press in the widget.
pub const KEYDOWN: &str = "keydown";

/// CSS-style class given to the mounted widget.
pub const WIDGET_CLASS: &str = "leaf-editor";

/// Payload delivered to editor listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Full text after the change.
    Change(String),
    /// Raw key event, uninterpreted.
    KeyDown(KeyEvent),
}

impl EditorEvent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Change(text) => Some(text),
            Self::KeyDown(_) => None,
        }
    }

    pub const fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Change(_) => None,
            Self::KeyDown(key) => Some(key),
        }
    }
}

/// A text-input widget provided by the host toolkit.
pub trait InputWidget {
    /// Text currently displayed.
    fn text(&self) -> String;

    /// Replace the displayed text without raising an input event.
    fn set_text(&mut self, text: &str);

    /// Let the widget handle a key natively.
    ///
    /// Returns `true` when the displayed text changed.
    fn apply_key(&mut self, key: &KeyEvent) -> bool;

    /// Selected byte range of [`InputWidget::text`]; empty at the caret.
    fn selection(&self) -> Range<usize>;

    /// Detach the widget from its container.
    fn remove(&mut self);
}

/// A mount point able to host one input widget per editor.
pub trait Container {
    type Widget: InputWidget;

    fn mount(&mut self, class_name: &str, initial: &str) -> Self::Widget;
}

/// Construction options for [`Editor::new`].
#[derive(Debug, Clone)]
pub struct EditorConfig<C> {
    pub container: C,
    pub initial_value: String,
    /// Styling hook, carried but not interpreted.
    pub theme: Option<String>,
}

impl<C> EditorConfig<C> {
    pub fn new(container: C) -> Self {
        Self {
            container,
            initial_value: String::new(),
            theme: None,
        }
    }
}

/// Options accepted by [`create_editor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    pub initial_value: Option<String>,
    pub theme: Option<String>,
}

impl EditorOptions {
    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// Build an editor mounted in `container`.
pub fn create_editor<C: Container>(container: C, options: EditorOptions) -> Editor<C::Widget> {
    let mut config = EditorConfig::new(container);
    config.initial_value = options.initial_value.unwrap_or_default();
    config.theme = options.theme;
    Editor::new(config)
}

/// Markdown source bound to an input widget.
pub struct Editor<W: InputWidget> {
    widget: W,
    value: String,
    theme: Option<String>,
    notifier: Notifier<EditorEvent>,
}

impl<W: InputWidget> Editor<W> {
    /// Mount a widget in the configured container, seeded with the initial value.
    pub fn new<C>(config: EditorConfig<C>) -> Self
    where
        C: Container<Widget = W>,
    {
        let EditorConfig {
            mut container,
            initial_value,
            theme,
        } = config;
        let widget = container.mount(WIDGET_CLASS, &initial_value);
        tracing::debug!(len = initial_value.len(), ?theme, "editor mounted");
        Self {
            widget,
            value: initial_value,
            theme,
            notifier: Notifier::new(),
        }
    }

    /// The current text.
    pub fn get_value(&self) -> &str {
        &self.value
    }

    /// Replace the text in both the editor and the widget.
    pub fn set_value(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.widget.set_text(&text);
        self.value.clone_from(&text);
        self.emit(CHANGE, &EditorEvent::Change(text));
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub const fn widget(&self) -> &W {
        &self.widget
    }

    /// Subscribe to [`CHANGE`] or [`KEYDOWN`].
    pub fn on(&mut self, event: impl Into<String>, listener: Listener<EditorEvent>) {
        self.notifier.subscribe(event, listener);
    }

    pub fn off(&mut self, event: &str, listener: &Listener<EditorEvent>) {
        self.notifier.unsubscribe(event, listener);
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.notifier.listener_count(event)
    }

    /// The widget's text changed: copy it in and notify.
    pub fn input(&mut self) {
        self.value = self.widget.text();
        self.emit(CHANGE, &EditorEvent::Change(self.value.clone()));
    }

    /// A key was pressed in the widget.
    ///
    /// Listeners see the key before the widget applies it. Returns `true`
    /// when the key edited the text.
    pub fn key_down(&mut self, key: KeyEvent) -> bool {
        self.emit(KEYDOWN, &EditorEvent::KeyDown(key));
        let edited = self.widget.apply_key(&key);
        if edited {
            self.input();
        }
        edited
    }

    /// Let the widget move its caret or selection without editing.
    pub fn widget_mut(&mut self) -> WidgetGuard<'_, W> {
        WidgetGuard { editor: self }
    }

    /// Apply a toolbar command to the widget's selection.
    pub fn apply_command(&mut self, command: Command) {
        let selection = self.widget.selection();
        let text = command.apply(&self.value, selection);
        tracing::debug!(?command, "toolbar command applied");
        self.set_value(text);
    }

    /// Detach the widget and drop every listener.
    pub fn destroy(mut self) {
        self.widget.remove();
        self.notifier.clear_all();
        tracing::debug!("editor destroyed");
    }

    fn emit(&self, event: &str, payload: &EditorEvent) -> Delivery {
        let delivery = self.notifier.notify(event, payload);
        if delivery.failed > 0 {
            crate::perf::log_event(
                crate::perf::DebugEvent::NotifyFailure,
                format!(
                    "event={event} delivered={} failed={}",
                    delivery.delivered, delivery.failed
                ),
            );
        }
        delivery
    }
}

/// Mutable widget access that re-syncs the editor if the text changed.
pub struct WidgetGuard<'a, W: InputWidget> {
    editor: &'a mut Editor<W>,
}

impl<W: InputWidget> std::ops::Deref for WidgetGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.editor.widget
    }
}

impl<W: InputWidget> std::ops::DerefMut for WidgetGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.editor.widget
    }
}

impl<W: InputWidget> Drop for WidgetGuard<'_, W> {
    fn drop(&mut self) {
        if self.editor.widget.text() != self.editor.value {
            self.editor.input();
        }
    }
}

impl<W: InputWidget + std::fmt::Debug> std::fmt::Debug for Editor<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("widget", &self.widget)
            .field("value_len", &self.value.len())
            .field("theme", &self.theme)
            .field("notifier", &self.notifier)
            .finish()
    }
}
