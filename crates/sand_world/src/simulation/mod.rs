//! Tick scheduler.
//!
//! One tick runs, in order: weather, the shuffled per-cell physics pass,
//! persons (with the portal check), a footprint re-imprint and the light
//! pass. A tick always runs to completion.

pub mod light;
pub mod movement;
mod physics;
pub mod push;

pub use movement::{Buoyancy, MoveOutcome, Resolution, resolve, try_move};
pub use push::{pull, push};

use crate::material::Materials;
use crate::weather::step_weathers;
use crate::world::SandWorld;

/// Runs one tick. Returns `false` without touching the world while a portal
/// load is pending.
///
/// Person footprints stay imprinted while the cells are stepped, so material
/// treats them as ordinary Skin and Clothes cells. Each person then steps and
/// every footprint is imprinted again on top of the updated grid.
pub fn simulate_tick(world: &mut SandWorld, materials: &Materials) -> bool {
  if world.portal_activated.is_some() {
    return false;
  }

  let SandWorld {
    grid,
    persons,
    weathers,
    rng,
    order,
    timer,
    hour,
    config,
    ..
  } = world;

  timer.start();

  step_weathers(weathers, grid, rng);
  timer.mark("weather");

  physics::step_cells(grid, materials, rng, order, config.spout_chance);
  timer.mark("physics");

  for person in persons.iter_mut() {
    person.step(grid, materials);
  }
  for person in persons.iter() {
    person.imprint(grid);
  }
  timer.mark("persons");

  let mask = light::compute_light(grid.cells(), materials, *hour);
  grid.set_light(mask);
  timer.mark("light");

  world.check_portals();
  world.tick += 1;
  log::trace!("tick {} done", world.tick);
  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SandWorldConfig;
  use crate::coords::CellPos;
  use crate::material::MaterialId;
  use crate::portal::Portal;

  fn world(width: u32, height: u32) -> SandWorld {
    SandWorld::new(&SandWorldConfig {
      width,
      height,
      seed: Some(11),
      ..Default::default()
    })
  }

  #[test]
  fn tick_counter_advances() {
    let materials = Materials::new();
    let mut world = world(4, 4);
    assert!(simulate_tick(&mut world, &materials));
    assert!(simulate_tick(&mut world, &materials));
    assert_eq!(world.tick(), 2);
  }

  #[test]
  fn pending_portal_freezes_world() {
    let materials = Materials::new();
    let mut world = world(6, 6);
    world.set(CellPos::new(2, 0), MaterialId::Sand);
    world.spawn_person();
    world.add_portal(Portal::new(0, 0, 6, 6, "next").unwrap());
    assert!(simulate_tick(&mut world, &materials));
    assert_eq!(world.portal_activated(), Some("next"));

    let before = world.grid().cells().clone();
    assert!(!simulate_tick(&mut world, &materials));
    assert_eq!(world.grid().cells(), &before);
    assert_eq!(world.tick(), 1);

    world.complete_portal_load();
    world.clear_portals();
    assert!(simulate_tick(&mut world, &materials));
  }

  #[test]
  fn timer_collects_phases_when_enabled() {
    let materials = Materials::new();
    let mut world = world(4, 4);
    world.timer_mut().set_enabled(true);
    simulate_tick(&mut world, &materials);
    assert_eq!(world.timer().averages().len(), 4);
  }
}
