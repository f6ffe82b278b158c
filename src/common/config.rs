//! User configuration, read from `config.toml` in the app config directory.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command line flags are applied on top with [`Config::apply_overrides`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::ui::OutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fail when a looked-up key is missing
    pub fail_key: bool,
    pub output: OutputFormat,
    pub color: bool,
    /// Explicit getent binary, skips the search path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub getent_path: Option<PathBuf>,
    /// Directories searched for getent instead of `$PATH`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<Vec<PathBuf>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_key: true,
            output: OutputFormat::Text,
            color: true,
            getent_path: None,
            search_path: None,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub fail_key: Option<bool>,
    pub output: Option<OutputFormat>,
    pub color: Option<bool>,
    pub getent_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(fail_key) = overrides.fail_key {
            self.fail_key = fail_key;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        if overrides.getent_path.is_some() {
            self.getent_path = overrides.getent_path;
        }
        self
    }

    /// `search_path` joined the way `$PATH` is, if configured.
    pub fn joined_search_path(&self) -> Result<Option<std::ffi::OsString>> {
        match &self.search_path {
            None => Ok(None),
            Some(dirs) => std::env::join_paths(dirs)
                .map(Some)
                .context("joining configured search_path"),
        }
    }
}
