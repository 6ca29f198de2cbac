//! Live preview: keeps an HTML rendering in step with an editor.

use std::cell::{Cell, Ref, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

use crate::editor::{CHANGE, Editor, EditorEvent, InputWidget};
use crate::events::Listener;
use crate::parser::MarkdownParser;

/// HTML rendering of an editor's text, refreshed on every change.
pub struct Preview {
    html: Rc<RefCell<String>>,
    renders: Rc<Cell<usize>>,
    listener: Listener<EditorEvent>,
}

impl Preview {
    /// Render the editor's current text now and on every later change.
    pub fn attach<W: InputWidget>(editor: &mut Editor<W>, parser: MarkdownParser) -> Self {
        let html = Rc::new(RefCell::new(parser.parse(editor.get_value())));
        let renders = Rc::new(Cell::new(1));

        let sink = Rc::clone(&html);
        let counter = Rc::clone(&renders);
        let listener = Listener::infallible(move |event: &EditorEvent| {
            if let Some(text) = event.text() {
                *sink.borrow_mut() = parser.parse(text);
                counter.set(counter.get() + 1);
            }
        });
        editor.on(CHANGE, listener.clone());

        Self {
            html,
            renders,
            listener,
        }
    }

    /// The latest rendering.
    pub fn html(&self) -> Ref<'_, String> {
        self.html.borrow()
    }

    /// How many times the text has been rendered, including the first.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Stop following `editor`. The last rendering is kept.
    pub fn detach<W: InputWidget>(&self, editor: &mut Editor<W>) {
        editor.off(CHANGE, &self.listener);
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("html_len", &self.html.borrow().len())
            .field("renders", &self.renders.get())
            .finish_non_exhaustive()
    }
}

const PAGE_STYLE: &str = "\
body { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; font-family: sans-serif; line-height: 1.6; }
blockquote { margin: 0; padding-left: 1rem; border-left: 4px solid #ccc; color: #666; }
code { padding: 0.1em 0.3em; border-radius: 3px; background: rgba(127, 127, 127, 0.15); }
body.leaf-theme-dark { background: #1e1e1e; color: #ddd; }
body.leaf-theme-dark a { color: #8ab4f8; }
";

/// Wrap an HTML fragment in a complete page.
pub fn standalone_page(body: &str, title: &str, theme: Option<&str>) -> String {
    let mut page = String::with_capacity(body.len() + PAGE_STYLE.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", escape_html(title));
    let _ = writeln!(page, "<style>\n{PAGE_STYLE}</style>\n</head>");
    match theme {
        Some(theme) => {
            let _ = writeln!(page, "<body class=\"leaf-theme-{}\">", escape_html(theme));
        }
        None => page.push_str("<body>\n"),
    }
    page.push_str(body);
    page.push_str("\n</body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorOptions, Pane, create_editor};

    #[test]
    fn test_preview_renders_initial_value() {
        let mut editor = create_editor(
            Pane::new(),
            EditorOptions::default().with_initial_value("# Hello"),
        );
        let preview = Preview::attach(&mut editor, MarkdownParser::new());
        assert_eq!(*preview.html(), "<h1>Hello</h1>");
        assert_eq!(preview.render_count(), 1);
    }

    #[test]
    fn test_preview_follows_changes_until_detached() {
        let mut editor = create_editor(Pane::new(), EditorOptions::default());
        let preview = Preview::attach(&mut editor, MarkdownParser::new());

        editor.set_value("plain text");
        assert_eq!(*preview.html(), "<p>plain text</p>");
        assert_eq!(preview.render_count(), 2);

        preview.detach(&mut editor);
        editor.set_value("# ignored");
        assert_eq!(*preview.html(), "<p>plain text</p>");
    }

    #[test]
    fn test_standalone_page_escapes_title_and_sets_theme() {
        let page = standalone_page("<p>x</p>", "a <b> & c", Some("dark"));
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>a &lt;b&gt; &amp; c</title>"));
        assert!(page.contains("<body class=\"leaf-theme-dark\">\n<p>x</p>\n</body>"));
    }

    #[test]
    fn test_standalone_page_escapes_quotes_in_title() {
        let page = standalone_page("", "it's \"done\"", None);
        assert!(page.contains("<title>it&#x27;s &quot;done&quot;</title>"), "{page}");
    }

    #[test]
    fn test_standalone_page_without_theme() {
        let page = standalone_page("", "t", None);
        assert!(page.contains("<body>\n"));
    }
}
