//! Configuration file lookup and parsing

use anyhow::Result;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use uiforge::config::{Config, FailurePolicy, CONFIG_ENV_VAR};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_has_defaults() -> Result<()> {
    let config = Config::default();

    assert!(!config.llm.provider.is_empty());
    assert!(!config.llm.model.is_empty());
    assert!(config.sessions.ttl_secs > 0);
    assert!(config.sessions.max_entries > 0);
    assert_eq!(config.server.bind, "127.0.0.1:5000");

    Ok(())
}

#[test]
fn test_load_explicit_path() -> Result<()> {
    let file = write_config(
        r#"
[server]
bind = "0.0.0.0:8080"
output_dir = "/srv/uis"

[llm]
provider = "openai"
model = "gpt-4o"
max_tokens = 4096

[sessions]
ttl_secs = 60
"#,
    );

    let config = Config::load_with_path(Some(file.path().display().to_string()))?;
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.server.output_dir, PathBuf::from("/srv/uis"));
    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.get_max_tokens(), 4096);
    assert_eq!(config.sessions.ttl_secs, 60);
    assert_eq!(config.sessions.max_entries, 10_000);
    assert_eq!(config.generation.failure_policy, FailurePolicy::Fallback);

    Ok(())
}

#[test]
fn test_missing_explicit_path_is_error() {
    let result = Config::load_with_path(Some("/nonexistent/uiforge.toml".to_string()));
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config file"));
}

#[test]
fn test_invalid_toml_is_error() {
    let file = write_config("[llm\nprovider = ");
    let result = Config::load_with_path(Some(file.path().display().to_string()));
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config file"));
}

#[test]
#[serial]
fn test_env_var_points_at_config() -> Result<()> {
    let file = write_config("[generation]\nfailure_policy = \"surface\"\nenhance_by_default = false\n");

    std::env::set_var(CONFIG_ENV_VAR, file.path());
    let loaded = Config::load_with_path(None);
    std::env::remove_var(CONFIG_ENV_VAR);

    let config = loaded?;
    assert_eq!(config.generation.failure_policy, FailurePolicy::Surface);
    assert!(!config.generation.enhance_by_default);

    Ok(())
}

#[test]
#[serial]
fn test_explicit_path_beats_env_var() -> Result<()> {
    let from_env = write_config("[llm]\nmodel = \"from-env\"\n");
    let explicit = write_config("[llm]\nmodel = \"explicit\"\n");

    std::env::set_var(CONFIG_ENV_VAR, from_env.path());
    let loaded = Config::load_with_path(Some(explicit.path().display().to_string()));
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(loaded?.llm.model, "explicit");

    Ok(())
}
