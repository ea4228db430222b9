/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use subclean::app_config::{Config, LogLevel, TextCleaningConfig};
use subclean::cleaner::DelimiterPair;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();
    let cleaning = &config.text_cleaning;

    assert!(!cleaning.remove_sdh);
    assert!(!cleaning.remove_formatting_tags);
    assert!(!cleaning.merge_identical_cues);
    assert!(cleaning.preserve_italic_tags);
    assert!(cleaning.preserve_bold_tags);
    assert!(cleaning.preserve_font_tags);
    assert!(cleaning.custom_chars_to_remove.is_empty());
    for pair in DelimiterPair::ALL {
        assert!(!cleaning.removes_delimited(pair));
    }

    assert_eq!(config.output.suffix, "clean");
    assert!(!config.output.write_diff_report);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a partial file fills in defaults
#[test]
fn test_from_json_str_withPartialConfig_shouldUseDefaults() -> Result<()> {
    let config = Config::from_json_str(
        r#"{ "text_cleaning": { "remove_sdh": true, "preserve_bold_tags": false }, "log_level": "debug" }"#,
    )?;

    assert!(config.text_cleaning.remove_sdh);
    assert!(!config.text_cleaning.preserve_bold_tags);
    assert!(config.text_cleaning.preserve_italic_tags);
    assert_eq!(config.output.suffix, "clean");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test both accepted forms of the custom character list
#[test]
fn test_custom_chars_withArrayAndStringForms_shouldParse() -> Result<()> {
    let from_array = Config::from_json_str(r#"{ "text_cleaning": { "custom_chars_to_remove": ["@", "j\""] } }"#)?;
    assert_eq!(from_array.text_cleaning.custom_chars_to_remove, vec!["@", "j\""]);

    let from_string = Config::from_json_str(r#"{ "text_cleaning": { "custom_chars_to_remove": "[\"@\"]" } }"#)?;
    assert_eq!(from_string.text_cleaning.custom_chars_to_remove, vec!["@"]);
    Ok(())
}

/// Test that a broken custom character list degrades to empty
#[test]
fn test_custom_chars_withInvalidJsonString_shouldBeEmpty() -> Result<()> {
    common::init_test_logging();
    let config = Config::from_json_str(r#"{ "text_cleaning": { "custom_chars_to_remove": "[not json" } }"#)?;
    assert!(config.text_cleaning.custom_chars_to_remove.is_empty());

    let config = Config::from_json_str(r#"{ "text_cleaning": { "custom_chars_to_remove": 5 } }"#)?;
    assert!(config.text_cleaning.custom_chars_to_remove.is_empty());
    Ok(())
}

#[test]
fn test_parse_custom_chars_withExamples_shouldMatchJsonArrays() {
    assert!(TextCleaningConfig::parse_custom_chars("[]").is_empty());
    assert_eq!(TextCleaningConfig::parse_custom_chars(r#"["j\""]"#), vec!["j\""]);
    assert!(TextCleaningConfig::parse_custom_chars("@,#").is_empty());
}

/// Test configuration validation
#[test]
fn test_config_validation_withBadSuffix_shouldFail() {
    let mut config = Config::default();

    config.output.suffix = "  ".to_string();
    assert!(config.validate().is_err());

    config.output.suffix = "a/b".to_string();
    assert!(config.validate().is_err());

    config.output.suffix = "cleaned".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_json_str_withMalformedJson_shouldFail() {
    assert!(Config::from_json_str("{ not json").is_err());
}

/// Test that a missing file is created with the defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let reloaded = Config::load(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_load_or_create_withExistingFile_shouldLoadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "text_cleaning": { "remove_music_notes": true }, "output": { "suffix": "noisefree" } }"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert!(config.text_cleaning.remove_music_notes);
    assert_eq!(config.output.suffix, "noisefree");
    Ok(())
}

#[test]
fn test_log_level_withEachValue_shouldMapToFilter() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
