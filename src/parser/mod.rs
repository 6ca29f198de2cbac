//! Markdown to HTML conversion for live preview.
//!
//! This is a small ordered-pattern transform, not a `CommonMark` parser:
//! - Rules run in a fixed order as global substitutions over the
//!   accumulated output (see [`rules`])
//! - Consecutive list items are then grouped into `<ul>` / `<ol>` blocks
//!
//! There are no nested emphasis rules, code fences, tables or escapes.
//! Conversion never fails.

mod rules;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use rules::Rule;

static UNORDERED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<li class="unordered">.*?</li>\n?)+"#).expect("unordered run pattern is valid")
});

static ORDERED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<li class="ordered">.*?</li>\n?)+"#).expect("ordered run pattern is valid")
});

static SHARED: LazyLock<MarkdownParser> = LazyLock::new(MarkdownParser::new);

/// Convert markdown to HTML with a process-wide parser.
///
/// # Example
///
/// ```
/// assert_eq!(leaf::parser::parse("plain text"), "<p>plain text</p>");
/// ```
pub fn parse(text: &str) -> String {
    SHARED.parse(text)
}

/// Stateless markdown converter holding the compiled rule table.
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    rules: Vec<Rule>,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self {
            rules: rules::default_rules(),
        }
    }

    /// Rule names in application order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(Rule::name)
    }

    /// Convert `text` to an HTML fragment.
    ///
    /// Output depends only on `text`; the same input always yields the
    /// same HTML.
    pub fn parse(&self, text: &str) -> String {
        let _scope = crate::perf::scope("parser.parse");
        let mut html = normalize(text);
        for rule in &self.rules {
            let replaced = match rule.apply(&html) {
                Cow::Borrowed(_) => None,
                Cow::Owned(next) => Some(next),
            };
            if let Some(next) = replaced {
                tracing::trace!(rule = rule.name(), len = next.len(), "rule applied");
                html = next;
            }
        }
        let html = group_list_items(&html);
        crate::perf::log_event(
            crate::perf::DebugEvent::Parse,
            format!("input_len={} output_len={}", text.len(), html.len()),
        );
        html
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim the input and turn every line ending into `\n`.
///
/// The trim set is Unicode whitespace plus the BOM, minus NEL (U+0085),
/// which stays part of the text.
fn normalize(text: &str) -> String {
    let trimmed =
        text.trim_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}');
    if trimmed.contains('\r') {
        trimmed.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        trimmed.to_string()
    }
}

/// Wrap each maximal run of list items in its list block.
///
/// Ordered items lose their marker class and render as bare `<li>`.
fn group_list_items(html: &str) -> String {
    let html = UNORDERED_RUN.replace_all(html, |caps: &Captures<'_>| {
        format!("<ul>\n{}</ul>", &caps[0])
    });
    ORDERED_RUN
        .replace_all(&html, |caps: &Captures<'_>| {
            let items = caps[0].replace(r#"<li class="ordered">"#, "<li>");
            format!("<ol>\n{items}</ol>")
        })
        .into_owned()
}
