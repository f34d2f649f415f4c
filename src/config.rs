// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Run reference validation after parsing
    #[serde(default = "default_validate")]
    pub validate: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            validate: default_validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Wall-clock cadence of worker progress messages, in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
        }
    }
}

impl TreeConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

fn default_validate() -> bool {
    true
}

fn default_progress_interval_ms() -> u64 {
    500
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .edictscope.toml (current directory)
        // 2. <user config dir>/edictscope/config.toml

        let cwd = std::env::current_dir().ok()?;
        let mut paths = vec![cwd.join(".edictscope.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("edictscope").join("config.toml"));
        }

        for path in &paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}
