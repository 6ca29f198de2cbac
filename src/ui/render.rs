use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;

use super::{EDITOR_WIDTH_PERCENT, PREVIEW_WIDTH_PERCENT, status};

/// Colors derived from the editor theme.
#[derive(Debug, Clone, Copy)]
pub(super) struct Palette {
    pub border: Color,
    pub title: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Palette {
    pub(super) fn for_theme(theme: Option<&str>) -> Self {
        match theme {
            Some("light") => Self {
                border: Color::Blue,
                title: Color::Black,
                status_bg: Color::Gray,
                status_fg: Color::Black,
            },
            _ => Self {
                border: Color::Cyan,
                title: Color::White,
                status_bg: Color::DarkGray,
                status_fg: Color::White,
            },
        }
    }
}

/// Split the main area into the editor and preview panes.
pub fn split_panes(area: Rect) -> [Rect; 2] {
    Layout::horizontal([
        Constraint::Percentage(EDITOR_WIDTH_PERCENT),
        Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
    ])
    .areas(area)
}

/// First visible source line so the caret stays on screen.
fn editor_scroll(model: &Model, height: u16) -> usize {
    let caret = model.editor.widget().caret();
    caret.line.saturating_sub(usize::from(height.saturating_sub(1)))
}

/// Where the terminal cursor goes for the caret inside `inner`.
pub fn caret_screen_position(model: &Model, inner: Rect) -> Option<Position> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let widget = model.editor.widget();
    let caret = widget.caret();
    let line = widget.line_at(caret.line).unwrap_or_default();
    let col = caret.col.min(line.len());
    let x = line.get(..col).map_or(0, UnicodeWidthStr::width);
    let row = caret.line - editor_scroll(model, inner.height);
    let x = u16::try_from(x).unwrap_or(u16::MAX).min(inner.width - 1);
    let y = u16::try_from(row).unwrap_or(u16::MAX).min(inner.height - 1);
    Some(Position::new(inner.x + x, inner.y + y))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let palette = Palette::for_theme(model.theme());
    let [main, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let [editor_area, preview_area] = split_panes(main);

    render_editor(model, frame, editor_area, palette);
    render_preview(model, frame, preview_area, palette);
    status::render_status_bar(model, frame, status_area, palette);
}

fn pane_block(title: String, palette: Palette) -> Block<'static> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(palette.border))
        .title_style(Style::default().fg(palette.title).add_modifier(Modifier::BOLD))
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect, palette: Palette) {
    let dirty = if model.is_dirty() { " [+]" } else { "" };
    let block = pane_block(format!(" {}{dirty} ", model.file_name()), palette);
    let inner = block.inner(area);
    let scroll = editor_scroll(model, inner.height);
    // Rows come from the widget so they line up with the caret's line model.
    let widget = model.editor.widget();
    let lines = (0..widget.line_count())
        .map(|idx| Line::raw(widget.line_at(idx).unwrap_or_default()))
        .collect::<Vec<_>>();
    let source = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(source, area);

    if let Some(position) = caret_screen_position(model, inner) {
        frame.set_cursor_position(position);
    }
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect, palette: Palette) {
    let html = model.preview.html().clone();
    let preview = Paragraph::new(html)
        .block(pane_block(" html preview ".to_string(), palette))
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, area);
}
