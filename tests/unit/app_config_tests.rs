/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use postlingo::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.content_source.endpoint, "https://gql.hashnode.com");
    assert_eq!(config.content_source.timeout_secs, 30);
    assert_eq!(config.engine.batch_size, 25);
    assert_eq!(config.engine.ideal_batch_item_size, 250);
    assert!(config.engine.fast_title);
    assert!(!config.concurrent_detection);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.supported_languages.iter().any(|l| l == "pt-BR"));
}

/// A missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.engine.batch_size, 25);

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.supported_languages, config.supported_languages);
    Ok(())
}

/// An existing file is read, and omitted fields fall back to defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "content_source": { "api_token": "t" },
            "engine": { "api_key": "k", "batch_size": 5 },
            "supported_languages": ["es", "fr"],
            "concurrent_detection": true,
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.engine.batch_size, 5);
    assert_eq!(config.engine.timeout_secs, 60);
    assert_eq!(config.supported_languages, vec!["es", "fr"]);
    assert!(config.concurrent_detection);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// A malformed file is an error, not a silent default
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    let error = Config::load_or_create(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
    Ok(())
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::configured_config("https://gql.example", "https://engine.example");
    assert!(config.validate().is_ok());

    config.engine.batch_size = 0;
    assert!(config.validate().is_err());
    config.engine.batch_size = 25;

    config.content_source.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.content_source.timeout_secs = 30;

    config.supported_languages.clear();
    assert!(config.validate().is_err());
    config.supported_languages.push("es".to_string());

    config.content_source.api_token = "  ".to_string();
    assert!(config.validate().is_err());
}
