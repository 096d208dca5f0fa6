//! World configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level simulation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandWorldConfig {
  /// Grid width in cells.
  pub width: u32,
  /// Grid height in cells.
  pub height: u32,
  /// RNG seed. `None` seeds from the OS.
  pub seed: Option<u64>,
  /// Per-tick chance that a spout emits.
  pub spout_chance: f32,
  /// Hour of day (0.0 - 24.0) the world starts at.
  pub start_hour: f32,
  /// Record per-phase tick timings.
  pub timing: bool,
  pub person: PersonConfig,
}

impl Default for SandWorldConfig {
  fn default() -> Self {
    Self {
      width: 300,
      height: 300,
      seed: None,
      spout_chance: 0.05,
      start_hour: 9.0,
      timing: false,
      person: PersonConfig::default(),
    }
  }
}

/// Actor body and jump constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonConfig {
  /// Ticks a full jump lasts.
  pub jump: u32,
  /// Final ticks of a jump spent hanging at the apex.
  pub jump_hang: u32,
  pub width: i32,
  pub height: i32,
}

impl Default for PersonConfig {
  fn default() -> Self {
    Self {
      jump: 25,
      jump_hang: 5,
      width: 1,
      height: 3,
    }
  }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
  Io(std::io::Error),
  Parse(toml::de::Error),
  Invalid(String),
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io(e) => write!(f, "failed to read config: {}", e),
      Self::Parse(e) => write!(f, "failed to parse config: {}", e),
      Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Invalid(_) => None,
    }
  }
}

impl From<std::io::Error> for ConfigError {
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e)
  }
}

impl SandWorldConfig {
  /// Parses and validates a TOML document.
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    Self::from_toml(&source)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.width == 0 || self.height == 0 {
      return Err(ConfigError::Invalid(format!(
        "grid must be non-empty, got {}x{}",
        self.width, self.height
      )));
    }
    if !(0.0..=1.0).contains(&self.spout_chance) {
      return Err(ConfigError::Invalid(format!(
        "spout_chance must be within 0..=1, got {}",
        self.spout_chance
      )));
    }
    if self.person.width < 1 || self.person.height < 1 {
      return Err(ConfigError::Invalid("person must be at least 1x1".into()));
    }
    if self.person.jump_hang > self.person.jump {
      return Err(ConfigError::Invalid(format!(
        "jump_hang ({}) exceeds jump ({})",
        self.person.jump_hang, self.person.jump
      )));
    }
    Ok(())
  }
}
