//! Resolution of a single cell moving into a neighbour.
//!
//! [`resolve`] is pure: it decides what happens from the two materials
//! alone. [`try_move`] applies the decision to the grid.

use crate::coords::CellPos;
use crate::material::{Gravity, MaterialId, Materials};
use crate::world::Grid;

/// What happened when a cell tried to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
  /// The two cells swapped.
  Moved,
  /// A transform rule rewrote the target.
  Transformed,
  /// The target ate the mover, which vanished.
  Consumed,
  Blocked,
}

impl MoveOutcome {
  #[inline]
  pub fn is_blocked(self) -> bool {
    self == Self::Blocked
  }
}

/// Which way density resolves a swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Buoyancy {
  /// Moves into lighter materials.
  #[default]
  Sinks,
  /// Moves into denser, mobile materials.
  Rises,
}

impl Buoyancy {
  pub fn of(gravity: Gravity) -> Self {
    match gravity {
      Gravity::Floats | Gravity::Wafts => Self::Rises,
      Gravity::Static | Gravity::Falls => Self::Sinks,
    }
  }
}

/// A decided move: the outcome plus the materials left in the source and
/// destination cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
  pub outcome: MoveOutcome,
  pub src: MaterialId,
  pub dst: MaterialId,
}

impl Resolution {
  fn blocked(src: MaterialId, dst: MaterialId) -> Self {
    Self {
      outcome: MoveOutcome::Blocked,
      src,
      dst,
    }
  }
}

/// Decides the result of `src` moving into `dst`.
///
/// Transform rules are checked first (subject to their light gate at the
/// destination), then whether the destination eats the source, then the
/// density comparison.
pub fn resolve(
  materials: &Materials,
  src: MaterialId,
  dst: MaterialId,
  dst_lit: bool,
  allow_equal: bool,
  buoyancy: Buoyancy,
) -> Resolution {
  if let Some(rule) = materials.transform(src, dst) {
    if rule.gate.allows(dst_lit) {
      return Resolution {
        outcome: MoveOutcome::Transformed,
        src: if rule.remain { src } else { MaterialId::Nothing },
        dst: rule.result,
      };
    }
  }

  if materials.eats(dst, src) {
    return Resolution {
      outcome: MoveOutcome::Consumed,
      src: MaterialId::Nothing,
      dst,
    };
  }

  let swaps = match buoyancy {
    Buoyancy::Sinks => {
      if allow_equal {
        materials.is_denser_or_equal(src, dst)
      } else {
        materials.is_denser(src, dst)
      }
    }
    Buoyancy::Rises => {
      let denser = if allow_equal {
        materials.is_denser_or_equal(dst, src)
      } else {
        materials.is_denser(dst, src)
      };
      denser && (materials.is_vacant(dst) || materials.gravity(dst) != Gravity::Static)
    }
  };

  if swaps {
    Resolution {
      outcome: MoveOutcome::Moved,
      src: dst,
      dst: src,
    }
  } else {
    Resolution::blocked(src, dst)
  }
}

/// Moves the material at `from` into `to`, applying the resolved outcome.
///
/// Moves into the boundary are always blocked.
pub fn try_move(
  grid: &mut Grid,
  materials: &Materials,
  from: CellPos,
  to: CellPos,
  allow_equal: bool,
  buoyancy: Buoyancy,
) -> MoveOutcome {
  if !grid.contains(from) || !grid.contains(to) {
    return MoveOutcome::Blocked;
  }
  let src = grid.get(from);
  let dst = grid.get(to);
  let resolution = resolve(materials, src, dst, grid.is_lit(to), allow_equal, buoyancy);

  match resolution.outcome {
    MoveOutcome::Blocked => {}
    MoveOutcome::Moved => {
      grid.swap(from, to);
    }
    MoveOutcome::Transformed | MoveOutcome::Consumed => {
      if resolution.dst != dst {
        grid.set(to, resolution.dst);
      }
      if resolution.src != src {
        grid.set(from, resolution.src);
      }
    }
  }

  resolution.outcome
}

#[cfg(test)]
mod tests {
  use super::*;
  use MaterialId::*;

  fn sink(materials: &Materials, src: MaterialId, dst: MaterialId) -> Resolution {
    resolve(materials, src, dst, true, false, Buoyancy::Sinks)
  }

  #[test]
  fn sand_sinks_through_water() {
    let m = Materials::new();
    let r = sink(&m, Sand, Water);
    assert_eq!(r.outcome, MoveOutcome::Moved);
    assert_eq!((r.src, r.dst), (Water, Sand));
    assert!(sink(&m, Water, Sand).outcome.is_blocked());
    assert!(sink(&m, Sand, Sand).outcome.is_blocked());
  }

  #[test]
  fn allow_equal_swaps_same_density() {
    let m = Materials::new();
    let r = resolve(&m, Sand, Sand, true, true, Buoyancy::Sinks);
    assert_eq!(r.outcome, MoveOutcome::Moved);
  }

  #[test]
  fn fire_ignites_oil_and_remains() {
    let m = Materials::new();
    let r = sink(&m, Fire, Oil);
    assert_eq!(r.outcome, MoveOutcome::Transformed);
    assert_eq!((r.src, r.dst), (Fire, Fire));
  }

  #[test]
  fn fire_into_water_is_consumed_as_steam() {
    let m = Materials::new();
    let r = sink(&m, Fire, Water);
    assert_eq!(r.outcome, MoveOutcome::Transformed);
    assert_eq!((r.src, r.dst), (Nothing, Steam));
  }

  #[test]
  fn gated_transform_falls_through_to_density() {
    let m = Materials::new();
    let lit = resolve(&m, Water, Seed, true, false, Buoyancy::Sinks);
    assert_eq!(lit.dst, Plant);
    let dark = resolve(&m, Water, Seed, false, false, Buoyancy::Sinks);
    assert!(dark.outcome.is_blocked());
    let dark_spore = resolve(&m, Water, Spore, false, false, Buoyancy::Sinks);
    assert_eq!(dark_spore.dst, Mushroom);
  }

  #[test]
  fn hole_consumes_food() {
    let m = Materials::new();
    let r = sink(&m, Water, Hole);
    assert_eq!(r.outcome, MoveOutcome::Consumed);
    assert_eq!((r.src, r.dst), (Nothing, Hole));
    // Hole moving onto food is an ordinary density check.
    assert!(sink(&m, Hole, Sand).outcome.is_blocked());
  }

  #[test]
  fn rising_needs_denser_mobile_target() {
    let m = Materials::new();
    let rise = |src, dst| resolve(&m, src, dst, false, false, Buoyancy::Rises);
    assert_eq!(rise(Smoke, Nothing).outcome, MoveOutcome::Moved);
    assert_eq!(rise(Smoke, Water).outcome, MoveOutcome::Moved);
    assert!(rise(Smoke, Stone).outcome.is_blocked());
    assert!(rise(Smoke, Plant).outcome.is_blocked());
    assert!(rise(Smoke, Fire).outcome.is_blocked());
    assert_eq!(rise(Steam, Smoke).outcome, MoveOutcome::Moved);
  }

  #[test]
  fn try_move_applies_outcome() {
    let m = Materials::new();
    let mut grid = Grid::new(1, 2);
    let (a, b) = (CellPos::new(0, 0), CellPos::new(0, 1));
    grid.set(a, Sand);
    grid.set(b, Hole);
    assert_eq!(try_move(&mut grid, &m, a, b, false, Buoyancy::Sinks), MoveOutcome::Consumed);
    assert_eq!(grid.count(Sand), 0);
    assert_eq!(grid.count(Hole), 1);
    assert_eq!(grid.get(b), Hole);
  }

  #[test]
  fn hole_into_hole_keeps_one() {
    let m = Materials::new();
    let mut grid = Grid::new(1, 2);
    let (a, b) = (CellPos::new(0, 0), CellPos::new(0, 1));
    grid.set(a, Hole);
    grid.set(b, Hole);
    assert_eq!(try_move(&mut grid, &m, a, b, false, Buoyancy::Sinks), MoveOutcome::Consumed);
    assert_eq!(grid.count(Hole), 1);
    assert_eq!(grid.get(a), Nothing);
  }

  #[test]
  fn boundary_blocks() {
    let m = Materials::new();
    let mut grid = Grid::new(1, 1);
    let a = CellPos::new(0, 0);
    grid.set(a, Steam);
    let out = try_move(&mut grid, &m, a, CellPos::new(0, -1), false, Buoyancy::Rises);
    assert!(out.is_blocked());
    assert_eq!(grid.get(a), Steam);
  }
}
