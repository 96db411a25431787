use super::data::{Config, PersonalityConfig};
use super::io::ConfigError;
use crate::core::personality::PersonalityRegistry;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert!(config.markdown_enabled());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_personality: Some("cat".to_string()),
        model: Some("llama-3.1-8b-instant".to_string()),
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded.default_personality.as_deref(), Some("cat"));
    assert_eq!(loaded.model.as_deref(), Some("llama-3.1-8b-instant"));

    config.default_personality = None;
    config.save_to_path(&config_path).expect("second save failed");
    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.default_personality, None);
    assert_eq!(reloaded.model.as_deref(), Some("llama-3.1-8b-instant"));
}

#[test]
fn test_custom_personalities_parse_and_merge() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
default_personality = "noir"
markdown = false

[[personalities]]
id = "noir"
display_name = "Noir Detective"
avatar = "🕵️"
prompt = "You are a hard-boiled detective narrating the user's problems."
"#,
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("load failed");
    assert!(!config.markdown_enabled());
    assert_eq!(
        config.personalities,
        vec![PersonalityConfig {
            id: "noir".to_string(),
            display_name: Some("Noir Detective".to_string()),
            prompt: "You are a hard-boiled detective narrating the user's problems.".to_string(),
            avatar: "🕵️".to_string(),
        }]
    );

    let registry = PersonalityRegistry::with_overrides(&config.personalities).expect("registry");
    let initial = registry
        .resolve_initial(None, config.default_personality.as_deref())
        .expect("configured default resolves");
    assert_eq!(initial.display_name, "Noir Detective");
    assert_eq!(registry.keys().len(), 5);
}

#[test]
fn test_parse_error_mentions_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "default_personality = [").expect("write config");

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_personality_missing_avatar_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[[personalities]]\nid = \"mime\"\nprompt = \"Say nothing.\"\n",
    )
    .expect("write config");

    assert!(matches!(
        Config::load_from_path(&config_path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_empty_personalities_are_not_serialized() {
    let config = Config {
        default_personality: Some("gym".to_string()),
        ..Default::default()
    };
    let rendered = toml::to_string_pretty(&config).expect("serialize");
    assert!(rendered.contains("default_personality = \"gym\""));
    assert!(!rendered.contains("personalities"));
}
