//! Sandbox frontend: window, world texture, input and level files around
//! the `sand_world` simulation.

pub mod ambiance;
pub mod config;
pub mod input;
pub mod level;
pub mod render;
pub mod time_of_day;

use std::path::PathBuf;

use bevy::prelude::*;
use sand_world::SandWorldPlugin;

use crate::config::ConfigLoaded;

/// Everything except the window and render plugins.
pub struct GamePlugin {
  pub config: ConfigLoaded,
  pub hot_reload: bool,
  pub startup_level: Option<String>,
  pub level_dir: Option<PathBuf>,
}

impl Plugin for GamePlugin {
  fn build(&self, app: &mut App) {
    app
      .insert_resource(self.config.clone())
      .insert_resource(Time::<Fixed>::from_hz(self.config.simulation.tick_hz))
      .add_plugins(SandWorldPlugin::new(self.config.world.clone()))
      .add_plugins(config::ConfigPlugin {
        hot_reload: self.hot_reload,
      })
      .add_plugins(level::LevelPlugin {
        startup_level: self.startup_level.clone(),
        dir: self.level_dir.clone(),
      })
      .add_plugins(time_of_day::TimeOfDayPlugin)
      .add_plugins(input::InputPlugin)
      .add_plugins(render::WorldRenderPlugin)
      .add_plugins(ambiance::Ambiance2DPlugin)
      .add_systems(Startup, spawn_player);
  }
}

fn spawn_player(mut world: ResMut<sand_world::SandWorld>) {
  if world.persons().is_empty() {
    world.spawn_person();
  }
}
