//! `set` and `unset` for persisted configuration values.
//!
//! Both operate on an in-memory [`Config`]; the caller saves it afterwards.

use std::fmt;

use crate::core::config::Config;
use crate::core::personality::PersonalityRegistry;

pub const SETTING_KEYS: &[&str] = &["default-personality", "model", "markdown"];

#[derive(Debug)]
pub enum SettingError {
    UnknownKey(String),
    UnknownPersonality { input: String, available: Vec<String> },
    InvalidBoolean(String),
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
}

impl SettingError {
    /// Prints the error to stderr with a follow-up hint where there is one.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {}", SETTING_KEYS.join(", "));
            }
            SettingError::UnknownPersonality { input, available } => {
                eprintln!("❌ Personality '{input}' not found.");
                eprintln!("   Available personalities: {}", available.join(", "));
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::UnknownPersonality { input, .. } => {
                write!(f, "Personality '{input}' not found")
            }
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
        }
    }
}

impl std::error::Error for SettingError {}

/// Applies `set <key> <value...>` and returns the confirmation line.
pub fn apply_set(
    config: &mut Config,
    registry: &PersonalityRegistry,
    key: &str,
    value: &[String],
) -> Result<String, SettingError> {
    let value = value.join(" ");
    let value = value.trim();

    match key {
        "default-personality" => {
            if value.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "Specify the personality to start with.",
                    example: "masquerade set default-personality cat",
                });
            }
            let personality =
                registry
                    .lookup(value)
                    .map_err(|err| SettingError::UnknownPersonality {
                        input: err.requested,
                        available: err.available,
                    })?;
            config.default_personality = Some(personality.id.clone());
            Ok(format!(
                "✅ Set default-personality to: {} {}",
                personality.avatar, personality.id
            ))
        }
        "model" => {
            if value.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "Specify the model identifier.",
                    example: "masquerade set model llama-3.3-70b-versatile",
                });
            }
            config.model = Some(value.to_string());
            Ok(format!("✅ Set model to: {value}"))
        }
        "markdown" => {
            let enabled = parse_bool(value)?;
            config.markdown = Some(enabled);
            Ok(format!(
                "✅ Set markdown to: {}",
                if enabled { "on" } else { "off" }
            ))
        }
        _ => Err(SettingError::UnknownKey(key.to_string())),
    }
}

/// Applies `unset <key>` and returns the confirmation line.
pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        "default-personality" => config.default_personality = None,
        "model" => config.model = None,
        "markdown" => config.markdown = None,
        _ => return Err(SettingError::UnknownKey(key.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}

fn parse_bool(value: &str) -> Result<bool, SettingError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SettingError::InvalidBoolean(value.to_string())),
    }
}
