use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A personality as written in TOML, either embedded or in the user config.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PersonalityConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub prompt: String,
    pub avatar: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Personality selected when a session starts (e.g., "pirate")
    pub default_personality: Option<String>,
    /// Model identifier sent with every completion request
    pub model: Option<String>,
    /// Base URL of the OpenAI-compatible completion service
    pub base_url: Option<String>,
    /// Render assistant replies as markdown in the chat area
    pub markdown: Option<bool>,
    /// Extra personalities; an entry with a built-in key replaces that built-in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personalities: Vec<PersonalityConfig>,
}

impl Config {
    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
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
