use crate::error::{Result, SearchboxError};
use crate::runtime::key_bindings::KeyBinding;
use crate::state::ComboboxOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIN_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
    /// Logging stays off without a file: the terminal belongs to the widget.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub debounce_ms: u64,
    pub max_results: usize,
    pub hotkeys: Vec<String>,
    pub placeholder: String,
    pub search_target_prefix: String,
    pub width: u16,
    pub candidates: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            max_results: 5,
            hotkeys: vec!["ctrl+k".to_string(), "cmd+k".to_string()],
            placeholder: "Search...".to_string(),
            search_target_prefix: "/search?q=".to_string(),
            width: 48,
            candidates: None,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Reads a JSON file when the extension says so, YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SearchboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str::<Self>(&text).map_err(|err| err.to_string())
        } else {
            serde_yaml::from_str::<Self>(&text).map_err(|err| err.to_string())
        };

        let config = parsed.map_err(|message| SearchboxError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(SearchboxError::InvalidConfig(
                "max_results must be at least 1".to_string(),
            ));
        }
        if self.width < MIN_WIDTH {
            return Err(SearchboxError::InvalidConfig(format!(
                "width must be at least {MIN_WIDTH}"
            )));
        }
        self.key_bindings()?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn key_bindings(&self) -> Result<Vec<KeyBinding>> {
        self.hotkeys
            .iter()
            .map(|hotkey| KeyBinding::parse(hotkey).map_err(SearchboxError::from))
            .collect()
    }

    pub fn combobox_options(&self) -> ComboboxOptions {
        ComboboxOptions {
            debounce: self.debounce(),
            max_results: self.max_results,
            search_target_prefix: self.search_target_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, LogFormat};
    use crate::error::SearchboxError;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(body.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_match_widget_contract() {
        let config = Config::default();
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.max_results, 5);
        assert_eq!(config.key_bindings().expect("defaults parse").len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let file = write_config(
            ".yaml",
            "debounce_ms: 100\nlog:\n  level: debug\n  format: json\n",
        );
        let config = Config::load(file.path()).expect("load yaml");
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn json_is_selected_by_extension() {
        let file = write_config(".json", r#"{"max_results": 3, "hotkeys": ["alt+s"]}"#);
        let config = Config::load(file.path()).expect("load json");
        assert_eq!(config.max_results, 3);
        assert_eq!(config.hotkeys, vec!["alt+s".to_string()]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_config(".yaml", "debounce: 100\n");
        let err = Config::load(file.path()).expect_err("unknown field");
        assert!(matches!(err, SearchboxError::ConfigParse { .. }));
    }

    #[test]
    fn zero_results_is_invalid() {
        let config = Config {
            max_results: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchboxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bad_hotkey_is_invalid() {
        let config = Config {
            hotkeys: vec!["ctrl+".to_string()],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(SearchboxError::Hotkey(_))));
    }
}
