//! # Asciify Configuration
//!
//! Process-wide defaults for rendering and font handling.
//!
//! Configuration sources (in priority order):
//! 1. Call-site overrides (CLI flags, API arguments)
//! 2. Element attribute overrides
//! 3. Environment variables (`ASCIIFY_` prefix)
//! 4. User config (~/.config/asciify/config.toml)
//! 5. Built-in defaults
//!
//! Only the last three live here; the first two are merged per call in
//! `asciify-core`.

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use asciify_core::{Ramp, RenderOptions, Resolution, TagMap};

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "asciify", "asciify")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config/asciify"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering defaults
    pub render: RenderConfig,
    /// Font handling
    pub fonts: FontsConfig,
}

/// Default rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Named ramp preset used when no ramp override is given
    pub ramp: String,
    /// Display scale multiplier
    pub scale: f64,
    /// Sampling resolution
    pub resolution: Resolution,
    /// Emit color spans by default
    pub color: bool,
    /// Factor alpha into brightness by default
    pub alpha: bool,
    /// Paint glyph backgrounds in color mode
    pub block: bool,
    /// Reflect the brightness mapping
    pub invert: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ramp: "variant1".to_string(),
            scale: 1.0,
            resolution: Resolution::Medium,
            color: false,
            alpha: false,
            block: false,
            invert: false,
        }
    }
}

impl RenderConfig {
    /// Materialize into validated core render options
    pub fn to_options(&self) -> anyhow::Result<RenderOptions> {
        let ramp = Ramp::preset(&self.ramp)
            .ok_or_else(|| anyhow::anyhow!("unknown ramp preset '{}'", self.ramp))?;
        let options = RenderOptions {
            scale: self.scale,
            resolution: self.resolution,
            ramp,
            color: self.color,
            alpha: self.alpha,
            block: self.block,
            invert: self.invert,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Font loading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Directory holding `<name>.flf` font files
    pub dir: PathBuf,
    /// Deadline for a single font fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Tag name to font name routing for banner conversion
    pub mapped_tags: HashMap<String, String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("fonts"),
            fetch_timeout_secs: 10,
            mapped_tags: HashMap::new(),
        }
    }
}

impl FontsConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// The mapped tags as a core `TagMap`
    pub fn tag_map(&self) -> TagMap {
        self.mapped_tags
            .iter()
            .map(|(tag, font)| (tag.clone(), font.clone()))
            .collect()
    }
}

impl Config {
    /// Load from the user config file and environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    /// Load from an explicit file path, merged with the environment
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ASCIIFY_"));
        let config: Config = figment.extract()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_dir().join("config.toml"))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
