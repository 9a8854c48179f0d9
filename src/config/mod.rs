//! Console configuration: backend address and panel defaults.
//!
//! User-level config: `~/.unified-console/config.yaml`
//! Project-level config: `.unified-console/config.yaml` (overrides user)
//!
//! Resolution: defaults → user file → project file (or an explicit
//! `--config` file instead of both) → `UNIFIED_CONSOLE_BACKEND_URL` →
//! command-line flags.

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "UNIFIED_CONSOLE_BACKEND_URL";

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Initial content of each panel's input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PanelDefaults {
    pub query: String,
    pub prompt: String,
    pub python: String,
}

impl Default for PanelDefaults {
    fn default() -> Self {
        Self {
            query: "SELECT * FROM demo;".into(),
            prompt: String::new(),
            python: "print(\"Hello from Python IDE\")".into(),
        }
    }
}

/// Fully resolved console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub backend_url: String,
    /// Per-request timeout. None waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub defaults: PanelDefaults,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            request_timeout_secs: None,
            defaults: PanelDefaults::default(),
        }
    }
}

/// On-disk shape. Every field is optional so files can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
    defaults: Option<PanelDefaults>,
}

/// Path to `~/.unified-console/`.
pub fn user_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".unified-console"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".unified-console"))
    }
}

/// Path to the project-level config file.
fn project_config_path() -> PathBuf {
    PathBuf::from(".unified-console").join("config.yaml")
}

impl ConsoleConfig {
    /// Load from the standard locations (or `explicit` alone when given),
    /// then apply the environment override. Validates the result.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let paths: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => user_dir()
                .map(|d| d.join("config.yaml"))
                .into_iter()
                .chain(std::iter::once(project_config_path()))
                .collect(),
        };
        // An explicit file must exist; standard locations are optional.
        let mut config = Self::load_from(&paths, explicit.is_some())?;
        config.apply_env_override(std::env::var(BACKEND_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Layer the given files over the defaults, later files winning.
    pub fn load_from(paths: &[PathBuf], required: bool) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for path in paths {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => continue,
                Err(source) => {
                    return Err(ConfigError::Read {
                        path: path.clone(),
                        source,
                    })
                }
            };
            let file = parse_file(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            config.merge(file);
        }
        Ok(config)
    }

    /// Parse a single YAML document over the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let mut config = Self::default();
        config.merge(parse_file(yaml)?);
        Ok(config)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(url) = file.backend_url {
            self.backend_url = url;
        }
        if file.request_timeout_secs.is_some() {
            self.request_timeout_secs = file.request_timeout_secs;
        }
        if let Some(defaults) = file.defaults {
            self.defaults = defaults;
        }
    }

    /// Apply the environment override (blank values are ignored).
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
    }

    /// Check the backend URL and normalize it (no trailing slash).
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.backend_url.trim().trim_end_matches('/').to_string();
        let url = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.backend_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        self.backend_url = trimmed;
        Ok(())
    }
}

fn parse_file(content: &str) -> Result<ConfigFile, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(content)
}
