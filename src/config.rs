//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.icebreaker/config.toml` (user)
//! 3. `/etc/icebreaker/config.toml` (system)
//! 4. Built-in defaults
//!
//! `ICEBREAKER_MODEL_DIR` overrides the model location from any of these.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{BundleFiles, Device, ModelSource};
use crate::tokenizer::SpecialTokenNames;
use crate::types::{DEFAULT_MAX_LENGTH, validate_max_length};
use crate::{IcebreakerError, Result};

/// Environment variable overriding `model.path`.
pub const MODEL_DIR_ENV: &str = "ICEBREAKER_MODEL_DIR";

/// Environment variable overriding `model.cache_dir`.
pub const CACHE_DIR_ENV: &str = "ICEBREAKER_CACHE_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Model bundle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Local bundle directory. Takes precedence over `repo_id`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// HuggingFace Hub repository holding the bundle.
    #[serde(default)]
    pub repo_id: Option<String>,
    /// Pinned Hub revision.
    #[serde(default)]
    pub revision: Option<String>,
    /// Directory for Hub downloads.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Fixed sequence length in tokens (default: 128).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Device to use: "cpu" or "cuda[:id]" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Name of the encoder's pooled output (default: "pooler_output").
    #[serde(default = "default_pooled_output")]
    pub pooled_output: String,
    /// Whether the encoder graph takes `token_type_ids` (default: true).
    #[serde(default = "default_true")]
    pub token_type_ids: bool,
    #[serde(default)]
    pub files: BundleFiles,
    #[serde(default)]
    pub tokens: SpecialTokenNames,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            repo_id: None,
            revision: None,
            cache_dir: None,
            max_length: default_max_length(),
            device: default_device(),
            pooled_output: default_pooled_output(),
            token_type_ids: true,
            files: BundleFiles::default(),
            tokens: SpecialTokenNames::default(),
        }
    }
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_pooled_output() -> String {
    "pooler_output".to_string()
}

fn default_true() -> bool {
    true
}

impl ModelConfig {
    /// Where to load the bundle from.
    pub fn source(&self) -> Result<ModelSource> {
        match (&self.path, &self.repo_id) {
            (Some(path), _) => Ok(ModelSource::local(path)),
            (None, Some(repo_id)) => Ok(match &self.revision {
                Some(rev) => ModelSource::huggingface_revision(repo_id, rev),
                None => ModelSource::huggingface(repo_id),
            }),
            (None, None) => Err(IcebreakerError::Configuration(format!(
                "No model configured. Set model.path or model.repo_id, or export {MODEL_DIR_ENV}"
            ))),
        }
    }

    /// Parsed compute device.
    pub fn device(&self) -> Result<Device> {
        self.device.parse()
    }

    /// Check settings that do not need the bundle itself.
    pub fn validate(&self) -> Result<()> {
        validate_max_length(self.max_length)?;
        self.device()?;
        self.source()?;
        Ok(())
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Per-request classification timeout in milliseconds (default: 3000).
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    3000
}

impl LimitsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.icebreaker/config.toml`
    /// 3. `/etc/icebreaker/config.toml`
    /// 4. Defaults
    ///
    /// Environment overrides are applied last.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Config::default(),
        };
        config.apply_overrides(
            std::env::var_os(MODEL_DIR_ENV).map(PathBuf::from),
            std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from),
        );
        Ok(config)
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            IcebreakerError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Apply model location overrides (normally from the environment).
    pub fn apply_overrides(&mut self, model_dir: Option<PathBuf>, cache_dir: Option<PathBuf>) {
        if let Some(dir) = model_dir {
            self.model.path = Some(dir);
        }
        if let Some(dir) = cache_dir {
            self.model.cache_dir = Some(dir);
        }
    }

    /// Resolve the config file path. `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(IcebreakerError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".icebreaker").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/icebreaker/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
