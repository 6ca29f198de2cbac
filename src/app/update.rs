use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::app::Model;
use crate::app::model::ToastLevel;
use crate::toolbar::Command;

/// Everything that can happen to the editor host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key for the text widget.
    Key(KeyEvent),
    /// Bracketed paste.
    Paste(String),
    /// Toolbar button.
    Toolbar(Command),
    /// Write the text back to the file.
    Save,
    Quit,
    /// Periodic wake-up with no input.
    Tick,
}

/// Apply one message to the model.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit | Message::Tick) {
        model.disarm_quit();
    }
    match msg {
        Message::Key(key) => {
            model.editor.key_down(key);
        }
        Message::Paste(text) => {
            // Terminals send CR for line breaks inside pastes.
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            model.editor.widget_mut().insert_str(&text);
        }
        Message::Toolbar(command) => {
            model.editor.apply_command(command);
        }
        Message::Save => match model.save() {
            Ok(()) => {
                let name = model.file_name();
                model.show_toast(ToastLevel::Info, format!("Saved {name}"));
            }
            Err(err) => {
                tracing::error!(error = %err, "save failed");
                model.show_toast(ToastLevel::Error, format!("{err:#}"));
            }
        },
        Message::Quit => model.request_quit(),
        Message::Tick => model.expire_toast(Instant::now()),
    }
    model
}
