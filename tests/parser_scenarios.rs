use leaf::parser::{MarkdownParser, parse};

fn convert(markdown: &str) -> String {
    MarkdownParser::new().parse(markdown)
}

#[test]
fn test_heading() {
    assert_eq!(convert("# Hello"), "<h1>Hello</h1>");
    assert_eq!(convert("###### Deep"), "<h6>Deep</h6>");
}

#[test]
fn test_strong_and_emphasis_with_paragraph() {
    assert_eq!(
        convert("This is *italic* and **bold**"),
        "<p>This is <em>italic</em> and <strong>bold</strong></p>"
    );
}

#[test]
fn test_line_starting_with_tag_is_not_wrapped() {
    assert_eq!(convert("**b** rest"), "<strong>b</strong> rest");
}

#[test]
fn test_unordered_list() {
    assert_eq!(
        convert("- one\n- two"),
        "<ul>\n<li class=\"unordered\">one</li>\n<li class=\"unordered\">two</li></ul>"
    );
}

#[test]
fn test_ordered_list_items_lose_class() {
    assert_eq!(
        convert("1. first\n2. second"),
        "<ol>\n<li>first</li>\n<li>second</li></ol>"
    );
}

#[test]
fn test_inline_code_and_link() {
    assert_eq!(
        convert("Use `cargo` and [docs](https://docs.rs)"),
        "<p>Use <code>cargo</code> and <a href=\"https://docs.rs\">docs</a></p>"
    );
}

#[test]
fn test_blockquote() {
    assert_eq!(convert("> quoted"), "<blockquote>quoted</blockquote>");
}

#[test]
fn test_whitespace_only_input_is_empty() {
    assert_eq!(convert(""), "");
    assert_eq!(convert("  \n\t\n "), "");
}

#[test]
fn test_rules_run_in_declared_order() {
    let names = MarkdownParser::new().rule_names().collect::<Vec<_>>();
    assert_eq!(names.first(), Some(&"h1"));
    assert_eq!(names.last(), Some(&"paragraph"));
}

#[test]
fn test_shared_parser_matches_new_instance() {
    let fixture = include_str!("fixtures/simple.md");
    assert_eq!(parse(fixture), convert(fixture));
}

#[test]
fn test_fixture_document() {
    let html = convert(include_str!("fixtures/simple.md"));
    assert!(html.starts_with("<h1>Leaf</h1>"));
    assert!(html.contains("<h2>Lists</h2>"));
    assert!(html.contains("<ul>\n<li class=\"unordered\">fast</li>"));
    assert!(html.contains("<ol>\n<li>write</li>\n<li>preview</li>\n<li>save</li>\n</ol>"));
    assert!(html.contains("<blockquote>Small is beautiful.</blockquote>"));
    assert!(!html.contains('\r'));
}
