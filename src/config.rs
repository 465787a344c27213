//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/xmlnode/xmlnode.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `XMLNODE_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::XmlWriter;

/// Unified configuration for xmlnode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Spaces per nesting level (default: 2)
    pub indent_width: usize,
    /// Prepend `<?xml ...?>` to written documents (default: false)
    pub declaration: bool,
    /// Escape `& < > "` in values (default: false, values are written verbatim)
    pub escape: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let writer = XmlWriter::default();
        Self {
            indent_width: writer.indent_width,
            declaration: writer.declaration,
            escape: writer.escape,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub indent_width: Option<usize>,
    pub declaration: Option<bool>,
    pub escape: Option<bool>,
}

/// Get the XDG config directory for xmlnode.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "xmlnode").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("xmlnode.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Formatting options derived from these settings.
    pub fn writer(&self) -> XmlWriter {
        XmlWriter {
            indent_width: self.indent_width,
            declaration: self.declaration,
            escape: self.escape,
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            declaration: overlay.declaration.unwrap_or(self.declaration),
            escape: overlay.escape.unwrap_or(self.escape),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::from_layers(
            global.as_deref(),
            explicit,
            Environment::with_prefix("XMLNODE")
                .prefix_separator("_")
                .separator("__"),
        )
    }

    /// Merge defaults, the optional global and explicit files, and `env`.
    pub fn from_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            debug!("global config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Explicit config
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("explicit config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current.apply_env_overrides(env)
    }

    fn apply_env_overrides(mut self, env: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("indent_width") {
            self.indent_width = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("indent_width must not be negative: {}", val),
            })?;
        }
        if let Ok(val) = config.get_bool("declaration") {
            self.declaration = val;
        }
        if let Ok(val) = config.get_bool("escape") {
            self.escape = val;
        }
        Ok(self)
    }
}
