use std::path::PathBuf;

use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};
use clap::Parser;
use game::GamePlugin;
use game::config::{ConfigLoaded, GameConfig};

#[derive(Parser, Debug)]
#[command(name = "sandbox", about = "Falling-sand sandbox")]
struct Args {
  /// Config file to use instead of assets/config/game.config.toml
  #[arg(short = 'c', long = "config")]
  config: Option<PathBuf>,

  /// Level to load on startup
  #[arg(short = 'l', long = "level")]
  level: Option<String>,

  /// Directory holding level files
  #[arg(long = "level-dir")]
  level_dir: Option<PathBuf>,

  /// Seed for a reproducible run
  #[arg(long = "seed")]
  seed: Option<u64>,

  /// Log per-phase tick timings
  #[arg(long = "timing")]
  timing: bool,
}

fn main() -> AppExit {
  let args = Args::parse();

  // A custom config file lives outside the asset folder, so it is not watched.
  let hot_reload = args.config.is_none();
  let loaded = match &args.config {
    Some(path) => GameConfig::load(path),
    None => GameConfig::bundled(),
  };
  let mut config = match loaded {
    Ok(config) => config,
    Err(err) => {
      eprintln!("sandbox: {err}");
      return AppExit::error();
    }
  };
  if args.seed.is_some() {
    config.world.seed = args.seed;
  }
  config.world.timing |= args.timing;

  let mut app = App::new();
  app.add_plugins(
    DefaultPlugins
      .set(ImagePlugin::default_nearest())
      .set(WindowPlugin {
        primary_window: Some(Window {
          resolution: WindowResolution::new(config.window.width, config.window.height),
          title: config.window.title.clone(),
          present_mode: PresentMode::AutoVsync,
          ..default()
        }),
        ..default()
      })
      .disable::<bevy::pbr::PbrPlugin>(),
  );
  app.add_plugins(GamePlugin {
    config: ConfigLoaded::from(config),
    hot_reload,
    startup_level: args.level,
    level_dir: args.level_dir,
  });
  app.add_systems(Update, log_tick_timings);

  app.run()
}

/// Once a second while timing is on.
fn log_tick_timings(
  world: Res<sand_world::SandWorld>,
  time: Res<Time>,
  mut since: Local<f32>,
) {
  if !world.timer().is_enabled() {
    return;
  }
  *since += time.delta_secs();
  if *since < 1.0 {
    return;
  }
  *since = 0.0;
  let phases: Vec<String> = world
    .timer()
    .averages()
    .iter()
    .map(|(phase, ms)| format!("{phase} {ms:.2}ms"))
    .collect();
  info!("tick {:.2}ms: {}", world.timer().total(), phases.join(", "));
}
