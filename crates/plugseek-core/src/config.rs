//! Plugin loading configuration.
//!
//! Loaded from TOML, optionally overridden from the environment, and then
//! turned into a [`SearchConfig`] for discovery and a [`ChannelFilterList`]
//! for logging:
//!
//! ```toml
//! search_paths = ["plugins", "${HOME}/.plugseek/plugins"]
//! search_recursive = false
//! loaded = ["carb.*"]
//! excluded = ["carb.broken.*"]
//! reloadable = ["carb.dev.*"]
//!
//! [log.channels]
//! "plugseek.*" = "warn"
//! "plugseek.discovery" = "verbose"
//! ```
//!
//! Channel filters keep the order they are written in.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::channel_filter::ChannelFilterList;
use crate::discovery::{EnvLookup, FilenamePolicy, ProcessEnv, SearchConfig};
use crate::error::{Error, Result};

/// Environment variable overriding `search_paths`, in the OS path-list
/// format (`:` separated on Unix, `;` on Windows).
pub const ENV_PLUGIN_PATHS: &str = "PLUGSEEK_PLUGIN_PATHS";

/// Environment variable overriding `search_recursive`.
pub const ENV_SEARCH_RECURSIVE: &str = "PLUGSEEK_SEARCH_RECURSIVE";

/// How plugins are found and which log channels are enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginLoadingConfig {
    /// Directories to search. Absent or empty means the application
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_paths: Option<Vec<String>>,
    pub search_recursive: bool,
    /// Patterns selecting modules to load. Absent or empty means all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded: Option<Vec<String>>,
    pub excluded: Vec<String>,
    pub reloadable: Vec<String>,
    pub log: LogConfig,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Channel pattern to level name, in file order.
    pub channels: toml::Table,
}

impl PluginLoadingConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(
            category = "config",
            path = %path.display(),
            "Loaded plugin configuration"
        );
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(&ProcessEnv)
    }

    /// Apply overrides from `env`.
    ///
    /// An empty [`ENV_PLUGIN_PATHS`] is ignored. [`ENV_SEARCH_RECURSIVE`]
    /// accepts `1`, `true`, `0` and `false`.
    pub fn apply_env_overrides_from(&mut self, env: &dyn EnvLookup) -> Result<()> {
        if let Some(paths) = env.var(ENV_PLUGIN_PATHS).filter(|v| !v.is_empty()) {
            let paths: Vec<String> = std::env::split_paths(&paths)
                .map(|p| p.to_string_lossy().into_owned())
                .filter(|p| !p.is_empty())
                .collect();
            info!(category = "config", count = paths.len(), "Plugin search paths from {}", ENV_PLUGIN_PATHS);
            self.search_paths = Some(paths);
        }

        if let Some(value) = env.var(ENV_SEARCH_RECURSIVE) {
            self.search_recursive = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "{ENV_SEARCH_RECURSIVE} must be 1, true, 0 or false, got '{value}'"
                    )))
                }
            };
        }

        Ok(())
    }

    /// Discovery configuration using the platform's filename conventions.
    pub fn to_search_config(&self) -> SearchConfig {
        self.to_search_config_with(FilenamePolicy::native())
    }

    pub fn to_search_config_with(&self, policy: FilenamePolicy) -> SearchConfig {
        SearchConfig {
            search_paths: non_empty(&self.search_paths),
            recursive: self.search_recursive,
            load_patterns: non_empty(&self.loaded),
            reloadable_patterns: self.reloadable.clone(),
            exclude_patterns: self.excluded.clone(),
            policy,
        }
    }

    /// Build log channel filters from `[log.channels]`. Entries whose value
    /// is not a string are logged and skipped.
    pub fn channel_filters(&self) -> ChannelFilterList {
        let entries = self
            .log
            .channels
            .iter()
            .filter_map(|(pattern, level)| match level.as_str() {
                Some(level) => Some((pattern.as_str(), level)),
                None => {
                    warn!(category = "config", pattern = %pattern, "Log channel level must be a string");
                    None
                }
            });
        ChannelFilterList::from_entries(entries)
    }
}

fn non_empty(list: &Option<Vec<String>>) -> Option<Vec<String>> {
    list.as_ref().filter(|l| !l.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_filter::ChannelLevel;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
search_paths = ["plugins", "${HOME}/.plugseek/plugins"]
search_recursive = true
loaded = ["carb.*"]
excluded = ["carb.broken.*"]
reloadable = ["carb.dev.*"]

[log.channels]
"plugseek.*" = "warn"
"plugseek.discovery" = "verbose"
"#;

    #[test]
    fn test_parse_full() {
        let config = PluginLoadingConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            config.search_paths,
            Some(vec![
                "plugins".to_string(),
                "${HOME}/.plugseek/plugins".to_string()
            ])
        );
        assert!(config.search_recursive);
        assert_eq!(config.loaded, Some(vec!["carb.*".to_string()]));
        assert_eq!(config.excluded, vec!["carb.broken.*"]);
        assert_eq!(config.reloadable, vec!["carb.dev.*"]);
        assert_eq!(config.log.channels.len(), 2);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = PluginLoadingConfig::from_toml_str("").unwrap();
        assert_eq!(config, PluginLoadingConfig::default());

        let search = config.to_search_config();
        assert_eq!(search.search_paths, None);
        assert_eq!(search.load_patterns, None);
        assert!(search.validate().is_ok());
    }

    #[test]
    fn test_empty_lists_treated_as_absent() {
        let config =
            PluginLoadingConfig::from_toml_str("search_paths = []\nloaded = []\n").unwrap();
        let search = config.to_search_config();
        assert_eq!(search.search_paths, None);
        assert_eq!(search.load_patterns, None);
        assert!(search.validate().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = PluginLoadingConfig::from_toml_str("search_recursive = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_to_search_config() {
        let config = PluginLoadingConfig::from_toml_str(SAMPLE).unwrap();
        let search = config.to_search_config_with(FilenamePolicy::posix());
        assert!(search.recursive);
        assert_eq!(search.exclude_patterns, vec!["carb.broken.*"]);
        assert_eq!(search.reloadable_patterns, vec!["carb.dev.*"]);
        assert_eq!(search.policy, FilenamePolicy::posix());
    }

    #[test]
    fn test_channel_filters_keep_file_order() {
        let config = PluginLoadingConfig::from_toml_str(SAMPLE).unwrap();
        let filters = config.channel_filters();
        let patterns: Vec<_> = filters.iter().map(|f| f.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["plugseek.*", "plugseek.discovery"]);
        assert_eq!(
            filters.resolve("plugseek.discovery").level,
            Some(ChannelLevel::Verbose)
        );
    }

    #[test]
    fn test_channel_filters_skip_non_strings() {
        let config =
            PluginLoadingConfig::from_toml_str("[log.channels]\n\"a\" = 3\n\"b\" = \"info\"\n")
                .unwrap();
        assert_eq!(config.channel_filters().len(), 1);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PluginLoadingConfig::from_toml_str(SAMPLE).unwrap();
        let joined = std::env::join_paths(["/opt/a", "/opt/b"]).unwrap();
        let env = HashMap::from([
            (
                ENV_PLUGIN_PATHS.to_string(),
                joined.to_string_lossy().into_owned(),
            ),
            (ENV_SEARCH_RECURSIVE.to_string(), "0".to_string()),
        ]);

        config.apply_env_overrides_from(&env).unwrap();
        assert_eq!(
            config.search_paths,
            Some(vec!["/opt/a".to_string(), "/opt/b".to_string()])
        );
        assert!(!config.search_recursive);
    }

    #[test]
    fn test_env_overrides_ignore_empty_paths() {
        let mut config = PluginLoadingConfig::from_toml_str(SAMPLE).unwrap();
        let env = HashMap::from([(ENV_PLUGIN_PATHS.to_string(), String::new())]);
        config.apply_env_overrides_from(&env).unwrap();
        assert_eq!(config.search_paths.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_env_override_rejects_bad_bool() {
        let mut config = PluginLoadingConfig::default();
        let env = HashMap::from([(ENV_SEARCH_RECURSIVE.to_string(), "maybe".to_string())]);
        assert!(matches!(
            config.apply_env_overrides_from(&env),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = PluginLoadingConfig::load(&path).unwrap();
        assert!(config.search_recursive);

        assert!(matches!(
            PluginLoadingConfig::load(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }
}
