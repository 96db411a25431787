use crate::core::config::Config;
use crate::core::personality::{PersonalityRegistry, FALLBACK_PERSONALITY};

/// One line per personality; `*` marks the one a new session starts with.
pub fn format_personalities(registry: &PersonalityRegistry, config: &Config) -> Vec<String> {
    let default_key = config
        .default_personality
        .as_deref()
        .and_then(|key| registry.lookup(key).ok())
        .map(|personality| personality.id.as_str())
        .unwrap_or(FALLBACK_PERSONALITY);

    registry
        .iter()
        .map(|personality| {
            let marker = if personality.id == default_key { "*" } else { " " };
            format!(
                "{marker} {} {:<14} {}",
                personality.avatar, personality.id, personality.display_name
            )
        })
        .collect()
}

pub fn list_personalities(registry: &PersonalityRegistry, config: &Config) {
    println!("Available personalities:\n");
    for line in format_personalities(registry, config) {
        println!("  {line}");
    }
    println!("\n💡 Start with one using:");
    println!("   masquerade -P <key>");
    println!("   masquerade set default-personality <key>");
}
