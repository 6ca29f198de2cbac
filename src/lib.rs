// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorEvent)
    clippy::module_name_repetitions
)]

//! # Leaf
//!
//! A minimal markdown editor with a live HTML preview.
//!
//! Leaf is made of three small pieces:
//! - A [`Notifier`](events::Notifier) for synchronous publish/subscribe
//! - A text surface ([`Editor`](editor::Editor)) bound to an input widget
//! - A rule-based markdown to HTML converter ([`MarkdownParser`](parser::MarkdownParser))
//!
//! The editor and the converter do not know about each other; the
//! [`preview`] glue subscribes to editor changes and feeds the converter.
//!
//! ## Modules
//!
//! - [`events`]: Subscription registry and fan-out
//! - [`editor`]: Text surface, widget traits and the rope-backed text area
//! - [`parser`]: Markdown conversion
//! - [`toolbar`]: Formatting commands for the current selection
//! - [`preview`]: Live preview and standalone HTML pages
//! - [`app`]: Terminal editor host
//! - [`ui`]: Terminal rendering
//! - [`config`]: Saved defaults
//! - [`watcher`]: File watching
//! - [`perf`]: Timing and debug log

pub mod app;
pub mod config;
pub mod editor;
pub mod events;
pub mod parser;
pub mod perf;
pub mod preview;
pub mod toolbar;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{
        CHANGE, Container, Editor, EditorConfig, EditorEvent, EditorOptions, InputWidget, KEYDOWN,
        Pane, TextArea, create_editor,
    };
    pub use crate::events::{Delivery, Listener, Notifier};
    pub use crate::parser::{MarkdownParser, parse};
    pub use crate::preview::Preview;
    pub use crate::toolbar::Command;
}
