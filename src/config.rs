//! Saved defaults.
//!
//! Defaults are stored as CLI flag tokens, one or more per line, in a global
//! config file and an optional local `.leafrc`. Flags given on the command
//! line are merged over the file flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const LOCAL_FILE: &str = ".leafrc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Theme name handed to the editor; `Auto` leaves it unset.
    pub const fn theme_name(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Light => Some("light"),
            Self::Dark => Some("dark"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub standalone: bool,
    pub perf: bool,
    pub theme: Option<ThemeMode>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are or-ed, options prefer `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            standalone: self.standalone || other.standalone,
            perf: self.perf || other.perf,
            theme: other.theme.or(self.theme),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }

    fn to_lines(&self) -> Vec<String> {
        let mut lines = vec!["# leaf defaults (saved with --save)".to_string()];
        if self.watch {
            lines.push("--watch".to_string());
        }
        if self.standalone {
            lines.push("--standalone".to_string());
        }
        if self.perf {
            lines.push("--perf".to_string());
        }
        if let Some(theme) = self.theme {
            lines.push(format!("--theme {}", theme.as_str()));
        }
        if let Some(path) = &self.render_debug_log {
            lines.push(format!("--render-debug-log {}", path.display()));
        }
        lines
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("leaf").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("leaf")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("leaf").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("leaf").join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Read flags from `path`; a missing file yields the defaults.
///
/// Blank lines and `#` comments are skipped.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    tracing::debug!(path = %path.display(), tokens = tokens.len(), "loaded config");
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", flags.to_lines().join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the persistable flags out of raw argument tokens.
///
/// Unknown tokens (including the program name and file) are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "--watch" | "-w" => flags.watch = true,
            "--standalone" => flags.standalone = true,
            "--perf" => flags.perf = true,
            "--theme" => {
                if let Some(next) = iter.next() {
                    flags.theme = parse_theme(next);
                }
            }
            "--render-debug-log" => {
                if let Some(next) = iter.next() {
                    flags.render_debug_log = Some(PathBuf::from(next));
                }
            }
            other => {
                if let Some(value) = other.strip_prefix("--theme=") {
                    flags.theme = parse_theme(value);
                } else if let Some(value) = other.strip_prefix("--render-debug-log=") {
                    flags.render_debug_log = Some(PathBuf::from(value));
                }
            }
        }
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
