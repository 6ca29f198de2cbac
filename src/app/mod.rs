//! Terminal editor host with live HTML preview.
//!
//! Follows The Elm Architecture (TEA):
//! - [`Model`]: editor, preview and host state
//! - [`Message`]: input and actions
//! - [`update`]: state transitions
//! - [`App::run`]: event loop and rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use input::{message_for_event, message_for_key};
pub use model::{Model, ToastLevel, describe_key};
pub use update::{Message, update};

use std::path::PathBuf;

/// Owns the launch settings and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    file_path: PathBuf,
    theme: Option<String>,
}

impl App {
    /// Create an app editing `file_path`. The file need not exist yet.
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            theme: None,
        }
    }

    /// Theme name passed through to the editor.
    pub fn with_theme(mut self, theme: Option<&str>) -> Self {
        self.theme = theme.map(ToOwned::to_owned);
        self
    }
}
