use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::render::Palette;

const KEY_HINTS: &str = "F2 bold  F3 italic  F4 heading  F5 link  F6 list  ^S save  ^Q quit";

pub(super) fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, palette: Palette) {
    if let Some((message, level)) = model.active_toast() {
        let bg = match level {
            ToastLevel::Info => Color::Green,
            ToastLevel::Warning => Color::Yellow,
            ToastLevel::Error => Color::Red,
        };
        let toast = Paragraph::new(format!(" {message}"))
            .style(Style::default().bg(bg).fg(Color::Black));
        frame.render_widget(toast, area);
        return;
    }

    let caret = model.editor.widget().caret();
    let key = model
        .last_key()
        .map(|key| format!("  key: {key}"))
        .unwrap_or_default();
    let text = format!(
        " Ln {}, Col {}{key}  |  {KEY_HINTS}",
        caret.line + 1,
        caret.col + 1
    );
    let bar =
        Paragraph::new(text).style(Style::default().bg(palette.status_bg).fg(palette.status_fg));
    frame.render_widget(bar, area);
}
