//! Disc brush used by the painting input.

use super::SandWorld;
use crate::coords::CellPos;
use crate::material::MaterialId;

impl SandWorld {
  /// Paints a disc of `material` centred on `center`.
  ///
  /// Occupied cells are only replaced when `overwrite` is set or when
  /// painting Nothing (erasing). Cells outside the grid or under a person
  /// are skipped.
  /// Returns the number of cells written.
  pub fn paint(
    &mut self,
    center: CellPos,
    radius: i32,
    material: MaterialId,
    overwrite: bool,
  ) -> usize {
    let r = radius.max(0);
    let mut painted = 0;

    for dy in -r..=r {
      for dx in -r..=r {
        if dx * dx + dy * dy > r * r {
          continue;
        }
        let pos = center.offset(dx, dy);
        if !self.grid.contains(pos) || self.persons.iter().any(|p| p.occupies(pos)) {
          continue;
        }
        let current = self.grid.get(pos);
        if current.is_nothing() || overwrite || material.is_nothing() {
          self.grid.set(pos, material);
          painted += 1;
        }
      }
    }

    painted
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SandWorldConfig;

  fn world() -> SandWorld {
    SandWorld::new(&SandWorldConfig {
      width: 16,
      height: 16,
      seed: Some(1),
      ..Default::default()
    })
  }

  #[test]
  fn radius_zero_paints_one_cell() {
    let mut world = world();
    let n = world.paint(CellPos::new(4, 4), 0, MaterialId::Sand, false);
    assert_eq!(n, 1);
    assert_eq!(world.get(CellPos::new(4, 4)), MaterialId::Sand);
  }

  #[test]
  fn disc_shape() {
    let mut world = world();
    let n = world.paint(CellPos::new(8, 8), 1, MaterialId::Water, false);
    assert_eq!(n, 5);
    assert_eq!(world.get(CellPos::new(9, 9)), MaterialId::Nothing);
  }

  #[test]
  fn occupied_cells_need_overwrite() {
    let mut world = world();
    world.paint(CellPos::new(2, 2), 0, MaterialId::Stone, false);
    assert_eq!(world.paint(CellPos::new(2, 2), 0, MaterialId::Sand, false), 0);
    assert_eq!(world.get(CellPos::new(2, 2)), MaterialId::Stone);
    assert_eq!(world.paint(CellPos::new(2, 2), 0, MaterialId::Sand, true), 1);
    assert_eq!(world.get(CellPos::new(2, 2)), MaterialId::Sand);
  }

  #[test]
  fn erasing_ignores_overwrite() {
    let mut world = world();
    world.paint(CellPos::new(2, 2), 0, MaterialId::Stone, false);
    world.paint(CellPos::new(2, 2), 0, MaterialId::Nothing, false);
    assert_eq!(world.get(CellPos::new(2, 2)), MaterialId::Nothing);
  }

  #[test]
  fn persons_are_not_painted_over() {
    let mut world = world();
    world.spawn_person();
    let feet = world.persons()[0].pos();
    world.paint(feet, 3, MaterialId::Nothing, true);
    assert_eq!(world.get(feet), MaterialId::Clothes);
    assert_eq!(world.get(CellPos::new(feet.x, feet.y - 2)), MaterialId::Skin);
    assert_eq!(world.get(CellPos::new(feet.x - 1, feet.y)), MaterialId::Nothing);
  }

  #[test]
  fn clipped_at_edges() {
    let mut world = world();
    let n = world.paint(CellPos::new(0, 0), 1, MaterialId::Sand, false);
    assert_eq!(n, 3);
  }
}
