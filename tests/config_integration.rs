use std::path::PathBuf;

use leaf::config::{
    ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens, save_config_flags,
};
use leaf::parser::MarkdownParser;
use leaf::preview::standalone_page;

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

fn write_leafrc(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(".leafrc");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_leafrc_accepts_short_watch_and_inline_debug_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_leafrc(&dir, "# watch while exporting\n-w --render-debug-log=logs/leaf.log\n");

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(
        flags,
        ConfigFlags {
            watch: true,
            render_debug_log: Some(PathBuf::from("logs/leaf.log")),
            ..ConfigFlags::default()
        }
    );
}

#[test]
fn test_leafrc_and_cli_union_drive_standalone_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_leafrc(&dir, "--standalone\n--theme dark\n");

    let file_flags = load_config_flags(&path).unwrap();
    let cli_flags = parse_flag_tokens(&args(&["leaf", "--html", "--theme=light", "notes.md"]));
    let effective = file_flags.union(&cli_flags);
    assert!(effective.standalone, "the file turns on full pages");

    let body = MarkdownParser::new().parse("# Notes");
    let theme = effective.theme.and_then(ThemeMode::theme_name);
    let page = standalone_page(&body, "notes", theme);
    assert!(page.contains("<body class=\"leaf-theme-light\">\n<h1>Notes</h1>"));
}

#[test]
fn test_auto_theme_leaves_page_unstyled() {
    let flags = parse_flag_tokens(&args(&["leaf", "--theme", "auto"]));
    assert_eq!(flags.theme, Some(ThemeMode::Auto));

    let page = standalone_page("<p>x</p>", "x", flags.theme.and_then(ThemeMode::theme_name));
    assert!(page.contains("<body>\n<p>x</p>"));
}

#[test]
fn test_bad_cli_theme_keeps_saved_theme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaf").join("config");
    let saved = parse_flag_tokens(&args(&["leaf", "--theme", "dark", "--perf", "--save"]));
    save_config_flags(&path, &saved).unwrap();

    let cli_flags = parse_flag_tokens(&args(&["leaf", "--theme=sepia", "--theme"]));
    let effective = load_config_flags(&path).unwrap().union(&cli_flags);
    assert_eq!(effective.theme, Some(ThemeMode::Dark));
    assert!(effective.perf);
}
