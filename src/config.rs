use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::declination::{DeclinationModel, DipoleModel, NoDeclination, WorldMagneticModel};
use crate::render::Viewport;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid display: {0}")]
    Display(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub gps: GpsConfig,
    #[serde(default)]
    pub declination: DeclinationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_side")]
    pub width: u32,
    #[serde(default = "default_side")]
    pub height: u32,
    #[serde(default = "default_text_size")]
    pub text_size: f64,
}

fn default_side() -> u32 {
    454
}

fn default_text_size() -> f64 {
    24.0
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_side(),
            height: default_side(),
            text_size: default_text_size(),
        }
    }
}

impl DisplayConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GpsMode {
    #[default]
    Interactive,
    /// Always-on dimmed screen; location updates are requested less often.
    Ambient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GpsConfig {
    #[serde(default)]
    pub mode: GpsMode,
    #[serde(
        default = "default_interactive_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub interactive_interval: Duration,
    #[serde(
        default = "default_ambient_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub ambient_interval: Duration,
}

fn default_interactive_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_ambient_interval() -> Duration {
    Duration::from_secs(20)
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            mode: GpsMode::default(),
            interactive_interval: default_interactive_interval(),
            ambient_interval: default_ambient_interval(),
        }
    }
}

impl GpsConfig {
    /// Location update interval to request from the receiver in `mode`.
    pub fn update_interval(&self, mode: GpsMode) -> Duration {
        match mode {
            GpsMode::Interactive => self.interactive_interval,
            GpsMode::Ambient => self.ambient_interval,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclinationKind {
    /// World Magnetic Model, dipole outside its epoch.
    #[default]
    Wmm,
    Dipole,
    None,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclinationConfig {
    #[serde(default)]
    pub model: DeclinationKind,
}

impl DeclinationConfig {
    pub fn build(&self) -> Box<dyn DeclinationModel> {
        match self.model {
            DeclinationKind::Wmm => Box::new(WorldMagneticModel::new()),
            DeclinationKind::Dipole => Box::new(DipoleModel),
            DeclinationKind::None => Box::new(NoDeclination),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Display("width and height must be non-zero".into()));
        }
        if !(d.text_size.is_finite() && d.text_size > 0.0) {
            return Err(ConfigError::Display(format!(
                "text_size must be positive, got {}",
                d.text_size
            )));
        }
        Ok(())
    }
}
