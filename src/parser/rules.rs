//! The ordered substitution table.
//!
//! Each rule rewrites every match over the whole current text. Later rules
//! see the output of earlier ones, and the paragraph rule relies on the tags
//! inserted before it, so the order of [`default_rules`] is load-bearing.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Builds the replacement for one match. The second argument is the whole
/// text the rule is running over.
pub type Substitution = fn(&Captures<'_>, &str) -> String;

/// An HTML tag opening at the start of the remaining text.
static OPENING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[^>]+>").expect("opening tag pattern is valid"));

/// A (pattern, substitution) pair.
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    substitute: Substitution,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, substitute: Substitution) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("built-in rule pattern is valid"),
            substitute,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Replace every non-overlapping match in `text`.
    ///
    /// Borrows when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| (self.substitute)(caps, text))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn wrap(tag: &str, inner: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}

fn h1(caps: &Captures<'_>, _: &str) -> String {
    wrap("h1", &caps[1])
}

fn h2(caps: &Captures<'_>, _: &str) -> String {
    wrap("h2", &caps[1])
}

fn h3(caps: &Captures<'_>, _: &str) -> String {
    wrap("h3", &caps[1])
}

fn h4(caps: &Captures<'_>, _: &str) -> String {
    wrap("h4", &caps[1])
}

fn h5(caps: &Captures<'_>, _: &str) -> String {
    wrap("h5", &caps[1])
}

fn h6(caps: &Captures<'_>, _: &str) -> String {
    wrap("h6", &caps[1])
}

fn blockquote(caps: &Captures<'_>, _: &str) -> String {
    wrap("blockquote", &caps[1])
}

fn strong(caps: &Captures<'_>, _: &str) -> String {
    wrap("strong", &caps[1])
}

fn em(caps: &Captures<'_>, _: &str) -> String {
    wrap("em", &caps[1])
}

fn code(caps: &Captures<'_>, _: &str) -> String {
    wrap("code", &caps[1])
}

fn link(caps: &Captures<'_>, _: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, &caps[2], &caps[1])
}

fn unordered_item(caps: &Captures<'_>, _: &str) -> String {
    format!(r#"<li class="unordered">{}</li>"#, &caps[1])
}

fn ordered_item(caps: &Captures<'_>, _: &str) -> String {
    format!(r#"<li class="ordered">{}</li>"#, &caps[1])
}

/// Wrap a line in `<p>` unless an HTML tag opens at its start.
///
/// The tag may run past the end of the line.
fn paragraph(caps: &Captures<'_>, text: &str) -> String {
    let line = caps.get(0).map_or("", |m| m.as_str());
    let start = caps.get(0).map_or(0, |m| m.start());
    if OPENING_TAG.is_match(&text[start..]) {
        line.to_string()
    } else {
        wrap("p", &caps[1])
    }
}

/// The conversion rules in application order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("h1", r"(?m)^# (.+)$", h1),
        Rule::new("h2", r"(?m)^## (.+)$", h2),
        Rule::new("h3", r"(?m)^### (.+)$", h3),
        Rule::new("h4", r"(?m)^#### (.+)$", h4),
        Rule::new("h5", r"(?m)^##### (.+)$", h5),
        Rule::new("h6", r"(?m)^###### (.+)$", h6),
        Rule::new("blockquote", r"(?m)^> (.+)$", blockquote),
        Rule::new("bold", r"\*\*(.+?)\*\*", strong),
        Rule::new("italic", r"\*(.+?)\*", em),
        Rule::new("code", r"`(.+?)`", code),
        Rule::new("link", r"\[(.+?)\]\((.+?)\)", link),
        Rule::new("unordered_item", r"(?m)^- (.+)$", unordered_item),
        Rule::new("ordered_item", r"(?m)^[0-9]+\. (.+)$", ordered_item),
        Rule::new("paragraph", r"(?m)^(.+)$", paragraph),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> Rule {
        default_rules()
            .into_iter()
            .find(|rule| rule.name() == name)
            .unwrap()
    }

    #[test]
    fn test_rule_order_ends_with_paragraph() {
        let names: Vec<_> = default_rules().iter().map(Rule::name).collect();
        assert_eq!(names.first(), Some(&"h1"));
        assert_eq!(names.last(), Some(&"paragraph"));
        let bold = names.iter().position(|n| *n == "bold").unwrap();
        let italic = names.iter().position(|n| *n == "italic").unwrap();
        assert!(bold < italic, "bold must run before italic");
    }

    #[test]
    fn test_heading_requires_space_after_hashes() {
        let h1 = rule("h1");
        assert_eq!(h1.apply("# Title"), "<h1>Title</h1>");
        assert_eq!(h1.apply("#Title"), "#Title");
        assert_eq!(h1.apply("## Title"), "## Title");
    }

    #[test]
    fn test_heading_matches_every_line() {
        assert_eq!(rule("h2").apply("## a\ntext\n## b"), "<h2>a</h2>\ntext\n<h2>b</h2>");
    }

    #[test]
    fn test_apply_borrows_when_nothing_matches() {
        assert!(matches!(rule("bold").apply("no markup"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(
            rule("bold").apply("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn test_link_captures_label_and_url() {
        assert_eq!(
            rule("link").apply("see [a](x) and [b](y)"),
            r#"see <a href="x">a</a> and <a href="y">b</a>"#
        );
    }

    #[test]
    fn test_replacement_text_is_literal() {
        assert_eq!(rule("code").apply("`$1`"), "<code>$1</code>");
    }

    #[test]
    fn test_ordered_item_accepts_multi_digit_numbers() {
        assert_eq!(
            rule("ordered_item").apply("10. ten"),
            r#"<li class="ordered">ten</li>"#
        );
        assert_eq!(rule("ordered_item").apply("1.no"), "1.no");
    }

    #[test]
    fn test_paragraph_skips_lines_opening_with_a_tag() {
        let paragraph = rule("paragraph");
        assert_eq!(paragraph.apply("<h1>x</h1>\nplain"), "<h1>x</h1>\n<p>plain</p>");
        assert_eq!(paragraph.apply("a <b>"), "<p>a <b></p>");
        assert_eq!(paragraph.apply("<>"), "<p><></p>");
    }

    #[test]
    fn test_paragraph_tag_may_span_lines() {
        assert_eq!(rule("paragraph").apply("<div\nclass>"), "<div\n<p>class></p>");
    }
}
