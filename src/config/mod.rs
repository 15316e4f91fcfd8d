use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::units::CooldownUnit;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "SoundPoint";
const APP_NAME: &str = "soundadmin";

pub const DEFAULT_BASE_URL: &str = "http://localhost:9999";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let mut default_cfg = AppConfig::default();
            default_cfg.post_load();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var("SOUNDADMIN_CONFIG").ok().map(PathBuf::from);
        let override_data = env::var("SOUNDADMIN_DATA").ok().map(PathBuf::from);

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_dir = override_config
            .clone()
            .map(|p| {
                if p.is_dir() {
                    p
                } else {
                    p.parent().map(Path::to_path_buf).unwrap_or(p)
                }
            })
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        let data_root = override_data.unwrap_or_else(|| project_dirs.data_dir().to_path_buf());
        let state_dir = project_dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_root.join("state"));

        Ok(Self::from_roots(config_dir, config_file, data_root, state_dir))
    }

    pub fn from_roots(
        config_dir: PathBuf,
        config_file: PathBuf,
        data_dir: PathBuf,
        state_dir: PathBuf,
    ) -> Self {
        let log_dir = state_dir.join("logs");
        Self {
            config_dir,
            config_file,
            data_dir,
            log_dir,
            state_dir,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.config_dir,
            &self.data_dir,
            &self.log_dir,
            &self.state_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating application directory {}", dir.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub notifications: NotificationConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    fn post_load(&mut self) {
        if let Err(err) = Url::parse(&self.api.base_url) {
            tracing::warn!(
                base_url = %self.api.base_url,
                %err,
                "invalid api base url in config, falling back to {DEFAULT_BASE_URL}"
            );
            self.api.base_url = DEFAULT_BASE_URL.to_string();
        }
        if self.ui.tick_rate_ms == 0 {
            tracing::warn!("ui.tick_rate_ms must be positive, using default");
            self.ui.tick_rate_ms = UiConfig::default().tick_rate_ms;
        }
    }

    /// Replaces the API base URL, e.g. from a command-line flag.
    pub fn override_base_url(&mut self, base_url: &str) -> Result<()> {
        Url::parse(base_url).with_context(|| format!("parsing base url {base_url}"))?;
        self.api.base_url = base_url.to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("parsing base url {}", self.base_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a toast stays on screen
    pub display_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { display_ms: 3_000 }
    }
}

impl NotificationConfig {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub default_cooldown_unit: CooldownUnit,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            default_cooldown_unit: CooldownUnit::Second,
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
