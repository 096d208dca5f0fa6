//! Relaying displacement through runs of contiguous cells.

use crate::coords::{CellPos, Direction};
use crate::material::{MaterialId, Materials};
use crate::world::Grid;

/// Scans from `origin` along `dir` while `relays(prev, cell)` holds for
/// non-vacant cells. Returns the first vacant cell, or `None` if the run
/// hits a cell that refuses to relay or the grid edge.
fn scan<F>(grid: &Grid, materials: &Materials, origin: CellPos, dir: Direction, relays: F) -> Option<CellPos>
where
  F: Fn(MaterialId, MaterialId) -> bool,
{
  let mut prev = MaterialId::Nothing;
  let mut pos = origin;
  loop {
    if !grid.contains(pos) {
      return None;
    }
    let cell = grid.get(pos);
    if materials.is_vacant(cell) {
      return Some(pos);
    }
    if !relays(prev, cell) {
      return None;
    }
    prev = cell;
    pos = pos.step(dir);
  }
}

/// Shifts the run `origin..end` one step along `dir`, swapping from the far
/// end back to the origin.
fn shift(grid: &mut Grid, origin: CellPos, end: CellPos, dir: Direction) {
  let back = dir.reversed();
  let mut pos = end;
  while pos != origin {
    let behind = pos.step(back);
    grid.swap(pos, behind);
    pos = behind;
  }
}

/// Pushes the run starting at `origin` one step along `dir`.
///
/// A cell relays the push if it is pushable, or if the cell before it is at
/// least as dense. The run must end in a vacant cell; otherwise nothing
/// moves. An empty origin succeeds without moving anything.
pub fn push(grid: &mut Grid, materials: &Materials, origin: CellPos, dir: Direction) -> bool {
  let end = scan(grid, materials, origin, dir, |prev, cell| {
    materials.is_pushable(cell) || materials.is_denser_or_equal(prev, cell)
  });
  match end {
    Some(end) => {
      shift(grid, origin, end, dir);
      true
    }
    None => false,
  }
}

/// Pushes the column starting at `origin` one step along `dir`, the way a
/// rising actor shifts the cells overhead. Stricter than [`push`]: every
/// relayed cell must be pushable and at least as dense as the cell it
/// follows.
pub fn pull(grid: &mut Grid, materials: &Materials, origin: CellPos, dir: Direction) -> bool {
  let end = scan(grid, materials, origin, dir, |prev, cell| {
    materials.is_pushable(cell) && materials.is_denser_or_equal(cell, prev)
  });
  match end {
    Some(end) => {
      shift(grid, origin, end, dir);
      true
    }
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use MaterialId::*;

  fn row(materials: &[MaterialId]) -> Grid {
    let mut grid = Grid::new(materials.len() as u32, 1);
    for (x, &m) in materials.iter().enumerate() {
      grid.set(CellPos::new(x as i32, 0), m);
    }
    grid
  }

  fn cells(grid: &Grid) -> Vec<MaterialId> {
    grid.cells().as_slice().to_vec()
  }

  #[test]
  fn push_shifts_run_into_gap() {
    let m = Materials::new();
    let mut grid = row(&[Sand, Sand, Nothing, Stone]);
    assert!(push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), vec![Nothing, Sand, Sand, Stone]);
  }

  #[test]
  fn push_blocked_by_stone_leaves_grid() {
    let m = Materials::new();
    let before = [Sand, Sand, Sand, Stone];
    let mut grid = row(&before);
    assert!(!push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), before.to_vec());
  }

  #[test]
  fn push_fails_at_edge() {
    let m = Materials::new();
    let mut grid = row(&[Sand, Sand]);
    assert!(!push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), vec![Sand, Sand]);
  }

  #[test]
  fn push_through_gas() {
    let m = Materials::new();
    let mut grid = row(&[Sand, Smoke, Stone]);
    assert!(push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), vec![Smoke, Sand, Stone]);
  }

  #[test]
  fn denser_leader_relays_unpushable_lighter_cell() {
    let m = Materials::new();
    // Water is not pushable but sand ahead of it is denser.
    let mut grid = row(&[Sand, Water, Nothing]);
    assert!(push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), vec![Nothing, Sand, Water]);
    // A lone non-pushable cell does not move.
    let mut grid = row(&[Water, Nothing]);
    assert!(!push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
  }

  #[test]
  fn empty_origin_is_trivial_success() {
    let m = Materials::new();
    let mut grid = row(&[Nothing, Sand]);
    assert!(push(&mut grid, &m, CellPos::new(0, 0), Direction::RIGHT));
    assert_eq!(cells(&grid), vec![Nothing, Sand]);
  }

  #[test]
  fn pull_lifts_pushable_column() {
    let m = Materials::new();
    let mut grid = Grid::new(1, 3);
    grid.set(CellPos::new(0, 2), Sand);
    grid.set(CellPos::new(0, 1), Sand);
    assert!(pull(&mut grid, &m, CellPos::new(0, 2), Direction::UP));
    assert_eq!(cells(&grid), vec![Sand, Sand, Nothing]);
  }

  #[test]
  fn pull_refuses_lighter_follower() {
    let m = Materials::new();
    let mut grid = Grid::new(1, 3);
    grid.set(CellPos::new(0, 2), Sand);
    grid.set(CellPos::new(0, 1), Spore);
    assert!(!pull(&mut grid, &m, CellPos::new(0, 2), Direction::UP));
    assert_eq!(grid.get(CellPos::new(0, 2)), Sand);
  }
}
