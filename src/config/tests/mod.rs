//! Unit tests for config module
//!
//! Tests configuration types, defaults, serialization and loading from
//! temporary files.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

use crate::{
    CmdTreeError,
    config::{Config, ConfigPaths, LogFormat, LogLevel, schema_json},
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.general.log_format, LogFormat::Pretty);
    assert_eq!(config.commands.prefix, "/");
    assert_eq!(config.commands.default_locale, "en_US");
    assert_eq!(config.confirm.timeout_secs, 30);
    assert!(config.aliases.is_empty());
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[commands]"));
    assert!(toml_str.contains("[confirm]"));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"
        log_format = "json"

        [commands]
        prefix = "!"

        [confirm]
        timeout_secs = 5

        [aliases]
        gm = "gamemode"
        padd = "perm add"
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.general.log_format, LogFormat::Json);
    assert_eq!(config.commands.prefix, "!");
    assert_eq!(config.commands.default_locale, "en_US");
    assert_eq!(config.confirm.timeout().as_secs(), 5);
    assert_eq!(config.aliases.get("padd").map(String::as_str), Some("perm add"));
}

#[test]
fn config_serialize_roundtrip() {
    let mut original = Config::default();
    original.aliases.insert("gm".to_string(), "gamemode".to_string());

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_invalid_toml() {
    let invalid_toml = r#"
        [general
        invalid syntax here
    "#;

    let result = Config::from_toml(invalid_toml);
    assert!(matches!(result, Err(CmdTreeError::TomlParseError { .. })));
}

#[test]
fn config_unknown_fields() {
    let toml_with_unknown = r#"
        [general]
        log_level = "info"
        unknown_field = "should be ignored"

        [unknown_section]
        some_field = "ignored"
    "#;

    let config: Config = toml::from_str(toml_with_unknown).unwrap();
    assert_eq!(config.general.log_level, LogLevel::Info);
}

#[test]
fn load_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config::load(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# cmdtree configuration file"));
}

#[test]
fn load_reads_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[confirm]\ntimeout_secs = 12\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.confirm.timeout_secs, 12);
}

#[test]
fn load_reports_parse_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[commands\n").unwrap();

    match Config::load(&path) {
        Err(CmdTreeError::TomlParseError { location, .. }) => {
            assert!(location.ends_with("config.toml"));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn config_paths_valid() {
    if std::env::var("HOME").is_ok() || std::env::var("XDG_CONFIG_HOME").is_ok() {
        let main_path = ConfigPaths::main_config().unwrap();
        assert!(main_path.to_string_lossy().ends_with("cmdtree/config.toml"));
    }
}

#[test]
fn schema_lists_sections() {
    let schema = schema_json().unwrap();

    assert!(schema.contains("\"general\""));
    assert!(schema.contains("\"commands\""));
    assert!(schema.contains("\"timeout_secs\""));
    assert!(schema.contains("\"aliases\""));
}
