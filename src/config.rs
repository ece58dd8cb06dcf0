//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority
//! (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SATBOX_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scene selection
    #[serde(default)]
    pub scene: SceneConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSettings,
    /// Harness run configuration
    #[serde(default)]
    pub harness: HarnessConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SATBOX_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SATBOX_SCENE__NAME=drop_test -> scene.name = "drop_test"
        figment = figment.merge(Env::prefixed("SATBOX_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Scene selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Name of the test scene to build
    pub name: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "drop_test".to_string(),
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    /// Fixed timestep in seconds
    pub timestep: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
        }
    }
}

impl PhysicsSettings {
    /// Convert to the physics engine's config type
    pub fn to_physics_config(&self) -> satbox_physics::PhysicsConfig {
        satbox_physics::PhysicsConfig::new(self.timestep)
    }
}

/// Harness run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of ticks to run
    pub steps: u32,
    /// Start with the simulation paused
    pub start_paused: bool,
    /// Log each tick's contact manifolds
    pub log_contacts: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            steps: 240,
            start_paused: false,
            log_contacts: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
