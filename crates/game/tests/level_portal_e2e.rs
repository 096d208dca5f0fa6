//! Portal travel between level files.

use game::level::follow_portal;
use sand_world::{
  CellPos, MaterialId, Materials, Portal, SandWorld, SandWorldConfig, simulate_tick,
};
use tempfile::TempDir;

fn config(width: u32, height: u32) -> SandWorldConfig {
  SandWorldConfig {
    width,
    height,
    seed: Some(11),
    ..Default::default()
  }
}

/// A person standing inside a portal to `target`.
fn world_at_portal(target: &str) -> SandWorld {
  let mut world = SandWorld::new(&config(20, 10));
  world.spawn_person();
  assert_eq!(world.persons()[0].pos(), CellPos::new(10, 9));
  world.add_portal(Portal::new(8, 5, 4, 5, target).expect("valid portal"));
  world
}

#[test]
fn portal_loads_its_target_level() {
  let materials = Materials::new();
  let temp_dir = TempDir::new().expect("Failed to create temp dir");

  let mut upper = SandWorld::new(&config(16, 12));
  upper.paint(CellPos::new(4, 11), 2, MaterialId::Stone, false);
  upper
    .save_to_dir(temp_dir.path(), "upper", &materials, true)
    .expect("Failed to save level");

  let mut world = world_at_portal("upper");
  assert!(simulate_tick(&mut world, &materials));
  assert_eq!(world.portal_activated(), Some("upper"));

  // Frozen until the load completes.
  let tick = world.tick();
  assert!(!simulate_tick(&mut world, &materials));
  assert_eq!(world.tick(), tick);

  assert_eq!(
    follow_portal(&mut world, &materials, temp_dir.path()).as_deref(),
    Some("upper")
  );
  assert_eq!(world.portal_activated(), None);
  assert_eq!((world.width(), world.height()), (16, 12));
  assert_eq!(world.grid().cells(), upper.grid().cells());
  assert!(simulate_tick(&mut world, &materials));
}

#[test]
fn missing_target_unfreezes_the_world() {
  let materials = Materials::new();
  let temp_dir = TempDir::new().expect("Failed to create temp dir");

  let mut world = world_at_portal("nowhere");
  simulate_tick(&mut world, &materials);
  assert_eq!(world.portal_activated(), Some("nowhere"));

  assert_eq!(
    follow_portal(&mut world, &materials, temp_dir.path()).as_deref(),
    Some("nowhere")
  );
  assert_eq!(world.portal_activated(), None);
  assert_eq!((world.width(), world.height()), (20, 10));
}

#[test]
fn nothing_to_follow_without_a_portal() {
  let materials = Materials::new();
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let mut world = SandWorld::new(&config(8, 8));
  assert_eq!(follow_portal(&mut world, &materials, temp_dir.path()), None);
}
