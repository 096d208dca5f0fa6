//! Level files: quick save/load keys, the startup level and portal travel.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use sand_world::{Materials, PersistenceError, SandWorld, SandWorldSet};

use crate::config::ConfigLoaded;
use crate::time_of_day::TimeOfDay;

/// Where levels live. Portal targets name files in this directory.
#[derive(Resource, Debug, Clone)]
pub struct LevelDirectory {
  pub dir: PathBuf,
  pub quicksave: String,
  pub compress: bool,
}

impl LevelDirectory {
  pub fn from_config(config: &ConfigLoaded) -> Self {
    Self {
      dir: config.levels.dir.clone(),
      quicksave: config.levels.quicksave.clone(),
      compress: config.levels.compress,
    }
  }
}

#[derive(Default)]
pub struct LevelPlugin {
  /// Level loaded before the first tick.
  pub startup_level: Option<String>,
  /// Overrides the configured level directory.
  pub dir: Option<PathBuf>,
}

#[derive(Resource)]
struct StartupLevel(String);

impl Plugin for LevelPlugin {
  fn build(&self, app: &mut App) {
    if let Some(name) = &self.startup_level {
      app.insert_resource(StartupLevel(name.clone()));
    }
    let dir = self.dir.clone();
    let init_levels = move |mut commands: Commands, config: Res<ConfigLoaded>| {
      let mut levels = LevelDirectory::from_config(&config);
      if let Some(dir) = &dir {
        levels.dir.clone_from(dir);
      }
      commands.insert_resource(levels);
    };
    // The clock reads the world hour in Startup, after the level is in.
    app
      .add_systems(PreStartup, (init_levels, load_startup_level).chain())
      .add_systems(Update, quick_save_keys)
      .add_systems(FixedUpdate, travel_through_portal.after(SandWorldSet::Tick));
  }
}

/// Loads the level a person walked into, or unfreezes the world when the
/// target can't be read. Returns the target that was attempted.
pub fn follow_portal(world: &mut SandWorld, materials: &Materials, dir: &Path) -> Option<String> {
  let target = world.portal_activated()?.to_string();
  match world.load_from_dir(dir, &target, materials) {
    Ok(()) => info!("Entered level '{}'", target),
    Err(err) => {
      warn!("Portal target '{}' unavailable: {}", target, err);
      world.complete_portal_load();
    }
  }
  Some(target)
}

fn load_level(
  world: &mut SandWorld,
  materials: &Materials,
  levels: &LevelDirectory,
  name: &str,
) -> Result<(), PersistenceError> {
  world.load_from_dir(&levels.dir, name, materials)
}

fn sync_clock(world: &SandWorld, time_of_day: Option<ResMut<TimeOfDay>>) {
  if let Some(mut time_of_day) = time_of_day {
    time_of_day.hour = world.hour();
  }
}

fn load_startup_level(
  startup: Option<Res<StartupLevel>>,
  levels: Res<LevelDirectory>,
  materials: Res<Materials>,
  mut world: ResMut<SandWorld>,
) {
  let Some(startup) = startup else {
    return;
  };
  match load_level(&mut world, &materials, &levels, &startup.0) {
    Ok(()) => info!("Loaded level '{}'", startup.0),
    Err(err) => warn!("Starting with an empty world, '{}' failed: {}", startup.0, err),
  }
}

/// F5 saves the quick save level, F9 loads it back.
fn quick_save_keys(
  keys: Res<ButtonInput<KeyCode>>,
  levels: Res<LevelDirectory>,
  materials: Res<Materials>,
  mut world: ResMut<SandWorld>,
  time_of_day: Option<ResMut<TimeOfDay>>,
) {
  if keys.just_pressed(KeyCode::F5) {
    if let Err(err) = world.save_to_dir(&levels.dir, &levels.quicksave, &materials, levels.compress)
    {
      warn!("Quick save failed: {}", err);
    }
  }
  if keys.just_pressed(KeyCode::F9) {
    match load_level(&mut world, &materials, &levels, &levels.quicksave) {
      Ok(()) => sync_clock(&world, time_of_day),
      Err(err) => warn!("Quick load failed: {}", err),
    }
  }
}

fn travel_through_portal(
  levels: Res<LevelDirectory>,
  materials: Res<Materials>,
  mut world: ResMut<SandWorld>,
  time_of_day: Option<ResMut<TimeOfDay>>,
) {
  if world.portal_activated().is_none() {
    return;
  }
  if follow_portal(&mut world, &materials, &levels.dir).is_some() {
    sync_clock(&world, time_of_day);
  }
}
