use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use log::info;

use crate::bow::DEFAULT_ARM_DELAY;

const CONFIG_VERSION: u32 = 3;

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_arm_delay_secs() -> f32 {
    DEFAULT_ARM_DELAY
}

fn default_warn_unknown_bits() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Toggles for third-party mods that change what the engine reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatConfig {
    // Immersive First Person View: first person while the engine says third person
    #[serde(default)]
    pub ifpv: bool,
    // Archery Gameplay Overhaul: one-frame dropout at full bow draw
    #[serde(default)]
    pub ago: bool,
    // Improved Camera: same idea as IFPV, different face node bit
    #[serde(default)]
    pub improved_camera: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BowConfig {
    #[serde(default = "default_arm_delay_secs")]
    pub arm_delay_secs: f32,
}

impl Default for BowConfig {
    fn default() -> Self {
        Self { arm_delay_secs: default_arm_delay_secs() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    // Log flag bits nobody has put a name to yet
    #[serde(default = "default_warn_unknown_bits")]
    pub warn_unknown_bits: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { warn_unknown_bits: default_warn_unknown_bits() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub compat: CompatConfig,
    #[serde(default)]
    pub bow: BowConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            compat: CompatConfig::default(),
            bow: BowConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path)?;
        Ok(toml::from_str::<Config>(&content)?)
    }

    /// Loads the config, falling back to defaults on any error. A missing
    /// file is created with the defaults.
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            match Self::load(config_path) {
                Ok(config) => {
                    info!("[CONFIG] ✓ Loaded configuration from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    info!("[CONFIG] ✗ Failed to load config: {}", e);
                    return Config::default();
                }
            }
        }

        let config = Config::default();
        if let Err(e) = config.save(config_path) {
            info!("[CONFIG] ✗ Failed to save default config: {}", e);
        } else {
            info!("[CONFIG] ✓ Created default configuration at {}", config_path.display());
        }
        config
    }

    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(config_path, toml_string)?;
        Ok(())
    }
}
