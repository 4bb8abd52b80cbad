use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

/// Placeholder substituted with the revision token in catalog URL templates.
pub const REVISION_PLACEHOLDER: &str = "{rev}";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Where the zone catalog and popularity data come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Endpoint returning a JSON array whose first element names the latest revision.
    #[serde(default = "default_revision_url")]
    pub revision_url: String,
    /// Field of the first revision entry holding the token.
    #[serde(default = "default_revision_field")]
    pub revision_field: String,
    /// Zone list, addressed by `{rev}`.
    #[serde(default = "default_zones_url")]
    pub zones_url: String,
    /// Popularity map, addressed by `{rev}`.
    #[serde(default = "default_popularity_url")]
    pub popularity_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Open the system browser when a zone is opened and no page is attached.
    #[serde(default = "default_launch_browser")]
    pub launch_browser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Keep the unlock in the session file. When false it lasts for this run only.
    #[serde(default = "default_remember_unlock")]
    pub remember_unlock: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            revision_url: default_revision_url(),
            revision_field: default_revision_field(),
            zones_url: default_zones_url(),
            popularity_url: default_popularity_url(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            launch_browser: default_launch_browser(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            remember_unlock: default_remember_unlock(),
        }
    }
}

fn default_revision_url() -> String {
    "https://api.github.com/repos/zonedeck/catalog/commits?per_page=1".to_string()
}

fn default_revision_field() -> String {
    "sha".to_string()
}

fn default_zones_url() -> String {
    "https://cdn.jsdelivr.net/gh/zonedeck/catalog@{rev}/zones.json".to_string()
}

fn default_popularity_url() -> String {
    "https://cdn.jsdelivr.net/gh/zonedeck/catalog@{rev}/popularity.json".to_string()
}

fn default_user_agent() -> String {
    concat!("zonedeck/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

fn default_launch_browser() -> bool {
    true
}

fn default_remember_unlock() -> bool {
    true
}

impl CatalogConfig {
    pub fn zones_url_at(&self, rev: &str) -> String {
        self.zones_url.replace(REVISION_PLACEHOLDER, rev)
    }

    pub fn popularity_url_at(&self, rev: &str) -> String {
        self.popularity_url.replace(REVISION_PLACEHOLDER, rev)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
