//! Terminal UI: markdown source on the left, HTML preview on the right,
//! status bar along the bottom.

mod render;
mod status;

pub use render::{caret_screen_position, render, split_panes};

pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;
