//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::modes::Gamemode;
use crate::error::{Error, Result};

/// Default osu! API v2 base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://osu.ppy.sh/api/v2/";

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";

/// Default beatmapset download mirror.
pub const DEFAULT_MIRROR_URL: &str = "https://api.chimu.moe/v1/download/";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// OAuth client credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// OAuth application client ID.
    #[serde(default)]
    pub client_id: u64,

    /// OAuth application client secret.
    #[serde(default)]
    pub client_secret: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory beatmapsets are written to. Must already exist when set.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Ruleset used for top-score and first-place listings.
    #[serde(default)]
    pub gamemode: Gamemode,

    /// Stop paging a category at the first empty page.
    #[serde(default)]
    pub stop_on_empty_page: bool,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_mirror_url")]
    pub mirror_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            gamemode: Gamemode::default(),
            stop_on_empty_page: false,
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            mirror_url: default_mirror_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Cached values configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Last OAuth access token obtained.
    pub access_token: Option<String>,

    /// When the cached token stops being valid.
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_mirror_url() -> String {
    DEFAULT_MIRROR_URL.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Config {
    /// Default config file location in the platform config directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "osu-beatmap-downloader")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one with `generate-config`",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Update the token cache and save to file if a path is provided.
    pub fn update_cache(
        &mut self,
        access_token: String,
        expires_at: DateTime<Utc>,
        path: Option<&Path>,
    ) -> Result<()> {
        self.cache.access_token = Some(access_token);
        self.cache.expires_at = Some(expires_at);

        if let Some(path) = path {
            self.save(path)?;
        }

        Ok(())
    }
}
