//! Leaf - a minimal markdown editor with live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! leaf notes.md
//! leaf --html notes.md
//! leaf --html --standalone --watch -o notes.html notes.md
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use leaf::app::App;
use leaf::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use leaf::parser::MarkdownParser;
use leaf::perf;
use leaf::preview::standalone_page;
use leaf::watcher::{DEFAULT_DEBOUNCE, FileWatcher};

/// A minimal markdown editor with live HTML preview
#[derive(Parser, Debug)]
#[command(name = "leaf", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (created on first save) or convert
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the converted HTML instead of opening the editor
    #[arg(long)]
    html: bool,

    /// Write the HTML to a file instead of stdout (implies --html)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Wrap the HTML in a complete page
    #[arg(long)]
    standalone: bool,

    /// Convert again whenever the file changes (with --html)
    #[arg(short, long)]
    watch: bool,

    /// Editor and page theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Enable performance timing on stderr
    #[arg(long)]
    perf: bool,

    /// Write detailed parse/notify/watch events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

struct HtmlJob<'a> {
    parser: MarkdownParser,
    source: &'a Path,
    output: Option<&'a Path>,
    standalone: bool,
    theme: Option<&'static str>,
}

impl HtmlJob<'_> {
    fn convert(&self) -> Result<String> {
        let markdown = std::fs::read_to_string(self.source)
            .with_context(|| format!("Failed to read {}", self.source.display()))?;
        let body = self.parser.parse(&markdown);
        if !self.standalone {
            return Ok(body);
        }
        let title = self
            .source
            .file_stem()
            .map_or_else(|| "leaf".to_string(), |s| s.to_string_lossy().to_string());
        Ok(standalone_page(&body, &title, self.theme))
    }

    fn emit(&self) -> Result<()> {
        let html = self.convert()?;
        match self.output {
            Some(path) => std::fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => {
                let mut out = std::io::stdout().lock();
                out.write_all(html.as_bytes())?;
                if !html.ends_with('\n') {
                    writeln!(out)?;
                }
                out.flush()?;
                Ok(())
            }
        }
    }

    fn watch(&self) -> Result<()> {
        let mut watcher = FileWatcher::new(self.source, DEFAULT_DEBOUNCE)
            .with_context(|| format!("Failed to watch {}", self.source.display()))?;
        tracing::info!(path = %watcher.target_path().display(), "watching for changes");
        loop {
            if watcher.take_change_ready() {
                if let Err(err) = self.emit() {
                    tracing::warn!(error = %format!("{err:#}"), "conversion failed");
                }
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(error = %err, "failed to open render debug log");
    }

    let theme = effective.theme.and_then(ThemeMode::theme_name);

    if cli.html || cli.output.is_some() {
        let job = HtmlJob {
            parser: MarkdownParser::new(),
            source: &cli.file,
            output: cli.output.as_deref(),
            standalone: effective.standalone,
            theme,
        };
        job.emit()?;
        if effective.watch {
            job.watch()?;
        }
        return Ok(());
    }

    if cli.file.is_dir() {
        anyhow::bail!("Not a file: {}", cli.file.display());
    }

    App::new(cli.file)
        .with_theme(theme)
        .run()
        .context("Application error")
}
