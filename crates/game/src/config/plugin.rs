use bevy::{asset::AssetEvent, ecs::message::MessageReader, prelude::*, window::PrimaryWindow};
use bevy_common_assets::toml::TomlAssetPlugin;
use sand_world::SandWorld;

use super::{CONFIG_ASSET_PATH, ConfigHandle, ConfigLoaded, GameConfig};

/// Applies [`ConfigLoaded`] changes to the window, tick rate and world.
///
/// With `hot_reload` set, `assets/config/game.config.toml` is watched and
/// replaces [`ConfigLoaded`] whenever it changes on disk.
pub struct ConfigPlugin {
  pub hot_reload: bool,
}

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    if self.hot_reload {
      app
        .add_plugins(TomlAssetPlugin::<GameConfig>::new(&["config.toml"]))
        .add_systems(PreStartup, watch_config_file)
        .add_systems(Update, watch_config_changes);
    }

    app.add_systems(
      Update,
      (
        update_window_on_config_change,
        update_tick_rate_on_config_change,
        update_world_on_config_change,
      ),
    );
  }
}

fn watch_config_file(mut commands: Commands, asset_server: Res<AssetServer>) {
  let handle: Handle<GameConfig> = asset_server.load(CONFIG_ASSET_PATH);
  commands.insert_resource(ConfigHandle(handle));
}

fn watch_config_changes(
  mut commands: Commands,
  config_handle: Res<ConfigHandle>,
  mut messages: MessageReader<AssetEvent<GameConfig>>,
  configs: Res<Assets<GameConfig>>,
) {
  for event in messages.read() {
    if let AssetEvent::Modified { id } = event {
      if config_handle.0.id() != *id {
        continue;
      }
      let Some(config) = configs.get(&config_handle.0) else {
        continue;
      };
      match config.validate() {
        Ok(()) => {
          info!("Config reloaded!");
          commands.insert_resource(ConfigLoaded::from(config.clone()));
        }
        Err(err) => warn!("Ignoring config reload: {}", err),
      }
    }
  }
}

fn update_window_on_config_change(
  config: Res<ConfigLoaded>,
  mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
  if config.is_changed() {
    if let Ok(mut window) = windows.single_mut() {
      window
        .resolution
        .set(config.window.width as f32, config.window.height as f32);
      window.title.clone_from(&config.window.title);
    }
  }
}

fn update_tick_rate_on_config_change(config: Res<ConfigLoaded>, mut time: ResMut<Time<Fixed>>) {
  if config.is_changed() {
    time.set_timestep_hz(config.simulation.tick_hz);
  }
}

/// Only the timing switch applies live; a new grid size needs a restart.
fn update_world_on_config_change(config: Res<ConfigLoaded>, mut world: ResMut<SandWorld>) {
  if !config.is_changed() {
    return;
  }
  world.timer_mut().set_enabled(config.world.timing);
  let built = world.config();
  if (config.world.width, config.world.height) != (built.width, built.height) {
    warn!(
      "Grid size {}x{} takes effect on restart",
      config.world.width, config.world.height
    );
  }
}
