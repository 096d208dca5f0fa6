pub mod sky;

use bevy::prelude::*;

pub struct Ambiance2DPlugin;

impl Plugin for Ambiance2DPlugin {
  fn build(&self, app: &mut App) {
    app.add_plugins(sky::SkyPlugin);
  }
}
