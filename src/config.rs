// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Client configuration.
//!
//! Sources, later ones winning: built-in defaults, the TOML config file, the `THICKET_API_URL`
//! environment variable, then command-line flags (applied by the binary).

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::{Direction, LayoutConfig};
use crate::render::RenderConfig;

pub const APP_DIR: &str = "thicket";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "thicket.log";
pub const API_URL_ENV: &str = "THICKET_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the research-tree service.
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub direction: Direction,
    /// Where the TUI writes its log. Defaults to the user cache directory.
    pub log_file: Option<PathBuf>,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/".to_owned(),
            request_timeout_secs: 60,
            direction: Direction::default(),
            log_file: None,
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl From<ClientConfig> for LoadedConfig {
    fn from(config: ClientConfig) -> Self {
        Self { config, file: None, ignored: None, api_url_from_env: false }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

pub fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE_NAME))
}

/// A configuration plus what happened while loading it.
///
/// Loading runs before logging is set up, so diagnostics are kept here and reported by
/// [`LoadedConfig::report`] once a subscriber exists.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    /// File the values were read from.
    pub file: Option<PathBuf>,
    /// A per-user config file that failed to load and was replaced by defaults.
    pub ignored: Option<ConfigError>,
    pub api_url_from_env: bool,
}

impl LoadedConfig {
    pub fn report(&self) {
        if let Some(file) = &self.file {
            tracing::info!("loaded config from {}", file.display());
        }
        if let Some(err) = &self.ignored {
            let cause = std::error::Error::source(err).map(ToString::to_string).unwrap_or_default();
            tracing::warn!("{err}: {cause}. Using defaults.");
        }
        if self.api_url_from_env {
            tracing::info!("using api url from {API_URL_ENV}");
        }
    }
}

impl ClientConfig {
    /// Loads the configuration for this process.
    ///
    /// An explicit `path` must exist and parse. Without one, the per-user config file is used when
    /// present; a broken per-user file is recorded in [`LoadedConfig::ignored`] and skipped.
    /// Values are not validated here: callers apply flag overrides first, then [`Self::validate`].
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        Self::load_with(path, default_config_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// [`ClientConfig::load`] with the default file location and environment lookup injected.
    pub fn load_with(
        path: Option<&Path>,
        default_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut loaded = match (path, default_path) {
            (Some(path), _) => LoadedConfig {
                config: Self::from_file(path)?,
                file: Some(path.to_path_buf()),
                ignored: None,
                api_url_from_env: false,
            },
            (None, Some(default_path)) => Self::from_default_location(default_path),
            (None, None) => LoadedConfig::from(Self::default()),
        };

        if let Some(api_url) = env(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            loaded.config.api_url = api_url;
            loaded.api_url_from_env = true;
        }
        Ok(loaded)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    fn from_default_location(path: &Path) -> LoadedConfig {
        if !path.exists() {
            return LoadedConfig::from(Self::default());
        }
        match Self::from_file(path) {
            Ok(config) => LoadedConfig {
                config,
                file: Some(path.to_path_buf()),
                ignored: None,
                api_url_from_env: false,
            },
            Err(err) => LoadedConfig { ignored: Some(err), ..LoadedConfig::from(Self::default()) },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must start with http:// or https:// (got '{}')",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            let reason = "request_timeout_secs must be at least 1".to_owned();
            return Err(ConfigError::Invalid(reason));
        }
        self.layout
            .validate()
            .map_err(|reason| ConfigError::Invalid(format!("layout: {reason}")))?;
        self.render
            .validate()
            .map_err(|reason| ConfigError::Invalid(format!("render: {reason}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured log file, or the default location in the cache directory.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_file)
    }
}
