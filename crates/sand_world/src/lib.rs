//! Sand World - a bounded falling-sand simulation plugin for Bevy.
//!
//! Every cell of a fixed-size grid holds one material. Each tick the cells
//! are visited in a shuffled order and fall, float, flow, burn or decay
//! according to the material registry. Persons walk and jump through the
//! grid by displacing what they touch, weather drops material from above
//! and a sunlight mask gates light-dependent growth.

use bevy::prelude::*;

pub mod config;
pub mod coords;
pub mod diagnostics;
pub mod material;
pub mod person;
pub mod persistence;
pub mod portal;
pub mod primitives;
pub mod render;
pub mod simulation;
pub mod weather;
pub mod world;

pub use config::{ConfigError, PersonConfig, SandWorldConfig};
pub use coords::{CellPos, Direction};
pub use diagnostics::TickTimer;
pub use material::{
  DEFAULT_DENSITY, Gravity, LightGate, Material, MaterialFlags, MaterialId, Materials,
  MaterialsConfig,
};
pub use person::{Person, PersonKeys, PersonRecord, PersonState};
pub use persistence::{LevelRecord, PersistenceError};
pub use portal::{Portal, PortalError, PortalRecord};
pub use primitives::Surface;
pub use render::{Rgba, materialize, pack_rgba, rgb, unpack_rgba};
pub use simulation::{MoveOutcome, simulate_tick};
pub use weather::{Weather, WeatherKind, WeatherRecord};
pub use world::{Grid, SandWorld, SimulationState};

/// System set containing the tick. Input should run before it and texture
/// upload after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SandWorldSet {
  Tick,
}

/// Plugin running the simulation in `FixedUpdate`.
///
/// Inserts [`Materials`] (unless already present), [`SimulationState`] and
/// a [`SandWorld`] built from `config`.
#[derive(Default)]
pub struct SandWorldPlugin {
  pub config: SandWorldConfig,
}

impl SandWorldPlugin {
  pub fn new(config: SandWorldConfig) -> Self {
    Self { config }
  }
}

impl Plugin for SandWorldPlugin {
  fn build(&self, app: &mut App) {
    // Users can override the registry by inserting it before the plugin.
    app.init_resource::<Materials>();
    app.init_resource::<SimulationState>();

    let materials = app.world().resource::<Materials>().clone();
    let mut world = SandWorld::new(&self.config);
    world.relight(&materials);
    app.insert_resource(world);

    app.add_systems(FixedUpdate, step_world.in_set(SandWorldSet::Tick));
  }
}

/// Runs one tick unless the simulation is paused.
pub fn step_world(
  mut state: ResMut<SimulationState>,
  mut world: ResMut<SandWorld>,
  materials: Res<Materials>,
) {
  if !state.take_tick() {
    return;
  }
  simulate_tick(&mut world, &materials);
}
