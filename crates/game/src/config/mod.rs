mod plugin;

use std::path::{Path, PathBuf};

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use sand_world::{ConfigError, SandWorldConfig};
use serde::{Deserialize, Deserializer, de};

/// Bundled copy of `assets/config/game.config.toml`.
pub const BUNDLED_CONFIG: &str = include_str!("../../assets/config/game.config.toml");

/// Asset path of the hot-reloaded config.
pub const CONFIG_ASSET_PATH: &str = "config/game.config.toml";

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub simulation: SimulationConfig,
  #[serde(default)]
  pub world: SandWorldConfig,
  pub brush: BrushConfig,
  pub levels: LevelsConfig,
  pub day_cycle: DayCycleConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimulationConfig {
  pub tick_hz: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BrushConfig {
  pub radius: i32,
  pub min_radius: i32,
  pub max_radius: i32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LevelsConfig {
  pub dir: PathBuf,
  /// Level name used by the quick save and quick load keys.
  pub quicksave: String,
  pub compress: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DayCycleConfig {
  pub seconds_per_hour: f32,
  pub sky_colors: Vec<SkyKeyframe>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SkyKeyframe {
  pub hour: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 characters"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

impl GameConfig {
  pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    Self::from_toml(&std::fs::read_to_string(path)?)
  }

  pub fn bundled() -> Result<Self, ConfigError> {
    Self::from_toml(BUNDLED_CONFIG)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    self.world.validate()?;
    if self.simulation.tick_hz <= 0.0 {
      return Err(ConfigError::Invalid(format!(
        "tick_hz must be positive, got {}",
        self.simulation.tick_hz
      )));
    }
    if self.day_cycle.seconds_per_hour <= 0.0 {
      return Err(ConfigError::Invalid(format!(
        "seconds_per_hour must be positive, got {}",
        self.day_cycle.seconds_per_hour
      )));
    }
    let brush = &self.brush;
    if brush.min_radius < 0 || brush.min_radius > brush.max_radius {
      return Err(ConfigError::Invalid(format!(
        "brush radius range {}..={} is empty",
        brush.min_radius, brush.max_radius
      )));
    }
    Ok(())
  }
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

/// The active config. Replaced wholesale on hot reload.
#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub simulation: SimulationConfig,
  pub world: SandWorldConfig,
  pub brush: BrushConfig,
  pub levels: LevelsConfig,
  pub day_cycle: DayCycleConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      simulation: config.simulation,
      world: config.world,
      brush: config.brush,
      levels: config.levels,
      day_cycle: config.day_cycle,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_config_parses() {
    let config = GameConfig::bundled().unwrap();
    assert_eq!(config.world.width, 300);
    assert_eq!(config.simulation.tick_hz, 30.0);
    assert!(!config.day_cycle.sky_colors.is_empty());
  }

  #[test]
  fn hex_colors_are_normalized() {
    let config = GameConfig::bundled().unwrap();
    let midnight = &config.day_cycle.sky_colors[0];
    assert_eq!(midnight.hour, 0.0);
    assert!((midnight.color[0] - 11.0 / 255.0).abs() < 1e-6);
  }

  #[test]
  fn bad_hex_color_is_rejected() {
    let source = BUNDLED_CONFIG.replace("#0b1026", "#0b10");
    assert!(matches!(
      GameConfig::from_toml(&source),
      Err(ConfigError::Parse(_))
    ));
  }

  #[test]
  fn invalid_world_is_rejected() {
    let source = BUNDLED_CONFIG.replace("width = 300", "width = 0");
    assert!(matches!(
      GameConfig::from_toml(&source),
      Err(ConfigError::Invalid(_))
    ));
  }
}
