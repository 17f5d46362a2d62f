use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::context::ContextOptions;
use crate::focus::ControllerOptions;
use crate::keyboard::Key;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_enter_key")]
    pub enter_key: Key,
    #[serde(default = "default_exit_key")]
    pub exit_key: Key,
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
    #[serde(default = "default_input_settle_ms")]
    pub input_settle_ms: u64,
    #[serde(default = "default_article_scroll_step")]
    pub article_scroll_step: i32,
    #[serde(default = "default_page_jump")]
    pub page_jump: usize,
    #[serde(default = "default_legacy_key_codes")]
    pub legacy_key_codes: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_enter_key() -> Key {
    Key::Char('i')
}
fn default_exit_key() -> Key {
    Key::Char('q')
}
fn default_notification_ms() -> u64 {
    2000
}
fn default_input_settle_ms() -> u64 {
    100
}
fn default_article_scroll_step() -> i32 {
    200
}
fn default_page_jump() -> usize {
    10
}
fn default_legacy_key_codes() -> bool {
    true
}
fn default_theme() -> String {
    "terminal-default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enter_key: default_enter_key(),
            exit_key: default_exit_key(),
            notification_ms: default_notification_ms(),
            input_settle_ms: default_input_settle_ms(),
            article_scroll_step: default_article_scroll_step(),
            page_jump: default_page_jump(),
            legacy_key_codes: default_legacy_key_codes(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keynav")
            .join("config.toml")
    }

    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            controller: ControllerOptions {
                page_jump: self.page_jump.max(1),
                input_settle: Duration::from_millis(self.input_settle_ms),
            },
            notification_ttl: Duration::from_millis(self.notification_ms),
            scroll_step: self.article_scroll_step,
            legacy_key_codes: self.legacy_key_codes,
            enter_key: self.enter_key.clone(),
            exit_key: self.exit_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.notification_ms, 2000);
        assert_eq!(config.input_settle_ms, 100);
        assert!(config.legacy_key_codes);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
enter_key = "f"
legacy_key_codes = false
theme = "monokai"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.enter_key, Key::Char('f'));
        assert_eq!(config.exit_key, Key::Char('q'));
        assert!(!config.legacy_key_codes);
        assert_eq!(config.theme, "monokai");
        assert_eq!(config.page_jump, 10);
    }

    #[test]
    fn test_config_rejects_unknown_key_name() {
        assert!(toml::from_str::<Config>(r#"exit_key = "Hyper""#).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.exit_key = Key::Escape;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_context_options() {
        let mut config = Config::default();
        config.page_jump = 0;
        config.input_settle_ms = 250;
        let options = config.context_options();
        assert_eq!(options.controller.page_jump, 1);
        assert_eq!(options.controller.input_settle, Duration::from_millis(250));
        assert_eq!(options.notification_ttl, Duration::from_millis(2000));
    }
}
