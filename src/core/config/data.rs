use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Built-in color themes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub const ALL: [ThemeName; 2] = [ThemeName::Dark, ThemeName::Light];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(ThemeName::Dark),
            "light" => Some(ThemeName::Light),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeName::Dark => write!(f, "dark"),
            ThemeName::Light => write!(f, "light"),
        }
    }
}

/// How an example is shown in the example pane.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The example text itself.
    #[default]
    Plain,
    /// Treat the example as a path and preview the file it names.
    File,
}

impl DisplayMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Some(DisplayMode::Plain),
            "file" => Some(DisplayMode::File),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Plain => write!(f, "plain"),
            DisplayMode::File => write!(f, "file"),
        }
    }
}

/// Persisted user defaults. Every field is optional so an absent key falls
/// back to the built-in default and `unset` can remove it again.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Shuffle examples before annotating
    pub shuffle: Option<bool>,
    /// Offer a skip control in single-task mode
    pub include_skip: Option<bool>,
    /// Label count above which classification uses a dropdown
    pub dropdown_threshold: Option<usize>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<ThemeName>,
    /// Example pane renderer ("plain" or "file")
    pub display: Option<DisplayMode>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/perch/config.toml` → `~/.config/perch/config.toml`
/// - Windows: `C:\\Users\\user\\AppData\\Roaming\\perch` is returned unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
