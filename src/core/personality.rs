use crate::core::config::{ConfigError, PersonalityConfig};
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// Key used when neither the command line nor the config names a personality.
pub const FALLBACK_PERSONALITY: &str = "pirate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personality {
    pub id: String,
    pub display_name: String,
    pub system_prompt: String,
    pub avatar: String,
}

impl Personality {
    fn from_config(entry: PersonalityConfig) -> Result<Self, ConfigError> {
        let id = entry.id.trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::InvalidPersonality {
                id: entry.id,
                reason: "id must not be empty",
            });
        }
        if entry.prompt.trim().is_empty() {
            return Err(ConfigError::InvalidPersonality {
                id,
                reason: "prompt must not be empty",
            });
        }
        if entry.avatar.trim().is_empty() {
            return Err(ConfigError::InvalidPersonality {
                id,
                reason: "avatar must not be empty",
            });
        }

        let display_name = entry
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| title_case(&id));

        Ok(Self {
            id,
            display_name,
            system_prompt: entry.prompt,
            avatar: entry.avatar,
        })
    }
}

/// Raised when a key does not name a registered personality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPersonality {
    pub requested: String,
    pub available: Vec<String>,
}

impl fmt::Display for UnknownPersonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Personality '{}' not found. Available personalities: {}",
            self.requested,
            self.available.join(", ")
        )
    }
}

impl Error for UnknownPersonality {}

#[derive(Debug, Deserialize)]
struct BuiltinPersonalityConfig {
    personalities: Vec<PersonalityConfig>,
}

/// Read-only table of personalities, fixed once the session starts.
#[derive(Debug, Clone)]
pub struct PersonalityRegistry {
    personalities: Vec<Personality>,
}

impl PersonalityRegistry {
    /// Personalities embedded in the binary.
    pub fn builtin() -> Self {
        const CONFIG_CONTENT: &str = include_str!("../builtins/personalities.toml");
        let config: BuiltinPersonalityConfig = toml::from_str(CONFIG_CONTENT)
            .expect("Failed to parse builtins/personalities.toml");
        let personalities = config
            .personalities
            .into_iter()
            .map(Personality::from_config)
            .collect::<Result<Vec<_>, _>>()
            .expect("builtins/personalities.toml contains an invalid personality");
        Self { personalities }
    }

    /// Built-ins merged with user-defined entries. A user entry whose key
    /// matches a built-in replaces it in place; the rest are appended.
    pub fn with_overrides(custom: &[PersonalityConfig]) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        for entry in custom {
            let mut entry = entry.clone();
            match registry.position(entry.id.trim()) {
                Some(index) => {
                    // Keep the registered spelling of the key.
                    entry.id = registry.personalities[index].id.clone();
                    registry.personalities[index] = Personality::from_config(entry)?;
                }
                None => registry
                    .personalities
                    .push(Personality::from_config(entry)?),
            }
        }
        Ok(registry)
    }

    #[cfg(test)]
    pub(crate) fn from_personalities(personalities: Vec<Personality>) -> Self {
        Self { personalities }
    }

    /// Case-insensitive lookup by key.
    pub fn lookup(&self, key: &str) -> Result<&Personality, UnknownPersonality> {
        let key = key.trim();
        self.personalities
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownPersonality {
                requested: key.to_string(),
                available: self.keys(),
            })
    }

    pub fn keys(&self) -> Vec<String> {
        self.personalities.iter().map(|p| p.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Personality> {
        self.personalities.iter()
    }

    /// Position of `key` in registry order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.personalities
            .iter()
            .position(|p| p.id.eq_ignore_ascii_case(key))
    }

    /// Resolves the starting personality: the explicit request wins, then the
    /// configured default, then the fallback. Explicit keys that are not
    /// registered are an error rather than a silent fallback.
    pub fn resolve_initial(
        &self,
        requested: Option<&str>,
        configured: Option<&str>,
    ) -> Result<&Personality, UnknownPersonality> {
        let key = requested
            .filter(|key| !key.trim().is_empty())
            .or(configured.filter(|key| !key.trim().is_empty()))
            .unwrap_or(FALLBACK_PERSONALITY);
        self.lookup(key)
    }
}

fn title_case(id: &str) -> String {
    id.split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
