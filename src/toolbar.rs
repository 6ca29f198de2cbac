//! Formatting commands applied to the current selection.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a command name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown toolbar command: {0}")]
pub struct ParseCommandError(pub String);

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bold,
    Italic,
    Heading,
    Link,
    List,
}

impl Command {
    pub const ALL: [Self; 5] = [Self::Bold, Self::Italic, Self::Heading, Self::Link, Self::List];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Heading => "heading",
            Self::Link => "link",
            Self::List => "list",
        }
    }

    /// Rewrite `text` with the selected bytes wrapped in this command's markup.
    ///
    /// The range is clamped to the text and widened to char boundaries.
    pub fn apply(self, text: &str, selection: Range<usize>) -> String {
        let start = floor_char_boundary(text, selection.start.min(text.len()));
        let end = ceil_char_boundary(text, selection.end.clamp(start, text.len()));
        let selected = &text[start..end];
        let wrapped = match self {
            Self::Bold => format!("**{selected}**"),
            Self::Italic => format!("*{selected}*"),
            Self::Heading => format!("### {selected}"),
            Self::Link => format!("[{selected}](url)"),
            Self::List => format!("- {selected}"),
        };
        let mut out = String::with_capacity(text.len() + wrapped.len() - selected.len());
        out.push_str(&text[..start]);
        out.push_str(&wrapped);
        out.push_str(&text[end..]);
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
