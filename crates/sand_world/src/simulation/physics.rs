//! Per-cell physics stages.
//!
//! A visited cell runs decay, flow, gravity, fluid jitter and spout in that
//! order. Each stage only runs while the cell has not acted yet this tick.

use rand::Rng;
use rand::seq::SliceRandom;

use super::movement::{Buoyancy, try_move};
use super::push::push;
use crate::coords::{CellPos, Direction};
use crate::material::{Gravity, MaterialFlags, MaterialId, Materials};
use crate::world::Grid;

/// Visits every cell once in a freshly shuffled order.
///
/// `order` is a scratch buffer reused across ticks.
pub(crate) fn step_cells<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  order: &mut Vec<usize>,
  spout_chance: f32,
) {
  grid.begin_tick();
  order.clear();
  order.extend(0..grid.len());
  order.shuffle(rng);

  for &index in order.iter() {
    if grid.is_touched(index) {
      continue;
    }
    let pos = grid.pos_of(index);
    step_cell(grid, materials, rng, pos, spout_chance);
  }
}

/// Runs the stages for a single cell.
fn step_cell<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  pos: CellPos,
  spout_chance: f32,
) {
  let material = grid.get(pos);
  if material.is_nothing() {
    return;
  }

  let mut moved = decay(grid, materials, rng, pos, material);
  if !moved {
    moved = flow(grid, materials, pos, material);
  }
  if !moved {
    moved = gravity(grid, materials, rng, pos, material);
  }
  if !moved {
    moved = jitter(grid, materials, rng, pos, material);
  }
  if !moved {
    spout(grid, materials, rng, pos, material, spout_chance);
  }
}

fn decay<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  pos: CellPos,
  material: MaterialId,
) -> bool {
  let Some(rule) = materials.get(material).decay else {
    return false;
  };
  if !rule.gate.allows(grid.is_lit(pos)) || rng.random::<f32>() >= rule.chance {
    return false;
  }
  grid.set(pos, rule.into);
  true
}

/// Wind and rain: clear the way, advance, or settle when blocked.
fn flow(grid: &mut Grid, materials: &Materials, pos: CellPos, material: MaterialId) -> bool {
  let Some(rule) = materials.get(material).flow else {
    return false;
  };
  let target = pos.step(rule.direction);
  // A failed push leaves the target in place; the move below decides.
  let _ = push(grid, materials, target, rule.direction);
  let outcome = try_move(grid, materials, pos, target, true, Buoyancy::Sinks);
  if outcome.is_blocked() {
    grid.set(pos, rule.blocked_into);
  }
  true
}

/// True if `material` at `pos` is held in place: both lateral neighbours
/// support it, or either diagonal neighbour on the side opposite to its
/// motion does.
fn is_supported(grid: &Grid, materials: &Materials, pos: CellPos, material: MaterialId, sign: i32) -> bool {
  let supports = |dx, dy| materials.supports(material, grid.get(pos.offset(dx, dy)));
  (supports(-1, 0) && supports(1, 0)) || supports(-1, -sign) || supports(1, -sign)
}

fn gravity<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  pos: CellPos,
  material: MaterialId,
) -> bool {
  let sign = match materials.gravity(material) {
    Gravity::Static => return false,
    Gravity::Falls => 1,
    Gravity::Floats => -1,
    Gravity::Wafts => {
      if rng.random_bool(0.5) {
        -1
      } else {
        return false;
      }
    }
  };
  if is_supported(grid, materials, pos, material, sign) {
    return false;
  }

  let buoyancy = Buoyancy::of(materials.gravity(material));
  let straight = pos.step(Direction::vertical(sign));
  if !try_move(grid, materials, pos, straight, false, buoyancy).is_blocked() {
    return true;
  }
  if materials.flags(material).contains(MaterialFlags::FALLS_STRAIGHT) {
    return false;
  }
  let dx = if rng.random_bool(0.5) { -1 } else { 1 };
  let diagonal = pos.offset(dx, sign);
  !try_move(grid, materials, pos, diagonal, false, buoyancy).is_blocked()
}

fn jitter<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  pos: CellPos,
  material: MaterialId,
) -> bool {
  if !materials.is_fluid(material) {
    return false;
  }
  let dx = if rng.random_bool(0.5) { -1 } else { 1 };
  let buoyancy = Buoyancy::of(materials.gravity(material));
  !try_move(grid, materials, pos, pos.offset(dx, 0), false, buoyancy).is_blocked()
}

/// Emits into the least dense of the three cells below. Ties prefer
/// straight down, then left.
fn spout<R: Rng + ?Sized>(
  grid: &mut Grid,
  materials: &Materials,
  rng: &mut R,
  pos: CellPos,
  material: MaterialId,
  chance: f32,
) {
  let Some(emitted) = materials.get(material).spout else {
    return;
  };
  if rng.random::<f32>() >= chance {
    return;
  }
  let target = [pos.offset(0, 1), pos.offset(-1, 1), pos.offset(1, 1)]
    .into_iter()
    .min_by_key(|&p| materials.density(grid.get(p)));
  if let Some(target) = target {
    if materials.is_vacant(grid.get(target)) {
      grid.set(target, emitted);
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::SmallRng;

  use super::*;
  use MaterialId::*;

  fn grid_with(width: u32, height: u32, cells: &[(i32, i32, MaterialId)]) -> Grid {
    let mut grid = Grid::new(width, height);
    for &(x, y, m) in cells {
      grid.set(CellPos::new(x, y), m);
    }
    grid
  }

  #[test]
  fn wood_bridge_is_supported() {
    let m = Materials::new();
    let grid = grid_with(3, 3, &[(0, 1, Wood), (1, 1, Wood), (2, 1, Wood)]);
    assert!(is_supported(&grid, &m, CellPos::new(1, 1), Wood, 1));
    // Edge wood only has one lateral neighbour and nothing diagonal above.
    assert!(!is_supported(&grid, &m, CellPos::new(0, 1), Wood, 1));
  }

  #[test]
  fn wood_hangs_from_diagonal() {
    let m = Materials::new();
    let grid = grid_with(3, 3, &[(0, 0, Wood), (1, 1, Wood)]);
    assert!(is_supported(&grid, &m, CellPos::new(1, 1), Wood, 1));
  }

  #[test]
  fn wood_falls_straight_only() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut grid = grid_with(3, 2, &[(1, 0, Wood), (1, 1, Stone)]);
    assert!(!gravity(&mut grid, &m, &mut rng, CellPos::new(1, 0), Wood));
    assert_eq!(grid.get(CellPos::new(1, 0)), Wood);
  }

  #[test]
  fn sand_slides_diagonally() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut grid = grid_with(3, 2, &[(1, 0, Sand), (1, 1, Stone)]);
    assert!(gravity(&mut grid, &m, &mut rng, CellPos::new(1, 0), Sand));
    assert_eq!(grid.count(Sand), 1);
    assert_eq!(grid.get(CellPos::new(1, 0)), Nothing);
    assert_ne!(grid.get(CellPos::new(0, 1)), grid.get(CellPos::new(2, 1)));
  }

  #[test]
  fn blocked_wind_dissipates() {
    let m = Materials::new();
    let mut grid = grid_with(2, 1, &[(0, 0, Wind), (1, 0, Stone)]);
    assert!(flow(&mut grid, &m, CellPos::new(0, 0), Wind));
    assert_eq!(grid.get(CellPos::new(0, 0)), Nothing);
  }

  #[test]
  fn wind_pushes_sand() {
    let m = Materials::new();
    let mut grid = grid_with(3, 1, &[(0, 0, Wind), (1, 0, Sand)]);
    assert!(flow(&mut grid, &m, CellPos::new(0, 0), Wind));
    assert_eq!(grid.cells().as_slice(), &[Nothing, Wind, Sand]);
  }

  #[test]
  fn wind_blocked_behind_stone_run_dissipates() {
    let m = Materials::new();
    let mut grid = grid_with(3, 1, &[(0, 0, Wind), (1, 0, Sand), (2, 0, Stone)]);
    assert!(flow(&mut grid, &m, CellPos::new(0, 0), Wind));
    assert_eq!(grid.cells().as_slice(), &[Nothing, Sand, Stone]);
  }

  #[test]
  fn rain_settles_as_water() {
    let m = Materials::new();
    let mut grid = grid_with(1, 2, &[(0, 0, Rain), (0, 1, Stone)]);
    flow(&mut grid, &m, CellPos::new(0, 0), Rain);
    assert_eq!(grid.get(CellPos::new(0, 0)), Water);
  }

  #[test]
  fn spout_prefers_straight_down() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut grid = grid_with(3, 2, &[(1, 0, WaterSpout)]);
    spout(&mut grid, &m, &mut rng, CellPos::new(1, 0), WaterSpout, 1.0);
    assert_eq!(grid.get(CellPos::new(1, 1)), Water);
    assert_eq!(grid.count(Water), 1);
  }

  #[test]
  fn spout_picks_least_dense() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut grid = grid_with(3, 2, &[(1, 0, SandSpout), (1, 1, Water), (0, 1, Smoke)]);
    spout(&mut grid, &m, &mut rng, CellPos::new(1, 0), SandSpout, 1.0);
    assert_eq!(grid.get(CellPos::new(0, 1)), Sand);
  }

  #[test]
  fn spout_never_overwrites() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut grid = grid_with(
      3,
      2,
      &[(1, 0, OilSpout), (0, 1, Stone), (1, 1, Stone), (2, 1, Stone)],
    );
    spout(&mut grid, &m, &mut rng, CellPos::new(1, 0), OilSpout, 1.0);
    assert_eq!(grid.count(Oil), 0);
  }

  #[test]
  fn stone_is_inert() {
    let m = Materials::new();
    let mut rng = SmallRng::seed_from_u64(9);
    let mut grid = grid_with(3, 3, &[(1, 1, Stone)]);
    let mut order = Vec::new();
    for _ in 0..10 {
      step_cells(&mut grid, &m, &mut rng, &mut order, 0.05);
    }
    assert_eq!(grid.get(CellPos::new(1, 1)), Stone);
    assert_eq!(grid.count(Stone), 1);
  }
}
