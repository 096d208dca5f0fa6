//! Walking, jumping and falling.

use super::{Person, PersonState};
use crate::coords::{CellPos, Direction};
use crate::material::Materials;
use crate::simulation::push::{pull, push};
use crate::world::Grid;

impl Person {
  /// Advances one tick using the held keys.
  pub fn step(&mut self, grid: &mut Grid, materials: &Materials) -> PersonState {
    let on_ground = self.collide(grid, materials, 0, 1);

    if self.keys.left && !self.keys.right {
      self.move_x(grid, materials, -1);
    }
    if self.keys.right && !self.keys.left {
      self.move_x(grid, materials, 1);
    }

    if self.keys.jump {
      if self.jump > 0 {
        if self.jump > self.jump_hang {
          self.move_y(grid, materials, -1);
        }
        self.jump -= 1;
      } else if on_ground && self.jump_released {
        self.jump = self.jump_duration;
        self.jump_released = false;
        self.move_y(grid, materials, -1);
      } else {
        self.move_y(grid, materials, 1);
      }
    } else {
      self.jump_released = true;
      if self.jump > self.jump_hang {
        self.jump = self.jump_hang;
      } else if self.jump > 0 {
        self.jump -= 1;
      } else {
        self.move_y(grid, materials, 1);
      }
    }

    self.state(grid, materials)
  }

  /// Current vertical phase.
  pub fn state(&self, grid: &Grid, materials: &Materials) -> PersonState {
    if self.jump > self.jump_hang {
      PersonState::Rising
    } else if self.jump > 0 {
      PersonState::Hanging
    } else if self.collide(grid, materials, 0, 1) {
      PersonState::Grounded
    } else {
      PersonState::Falling
    }
  }

  /// Whether the footprint shifted by `(dx, dy)` would overlap the grid
  /// edge or a solid cell. Cells the person already occupies are ignored.
  pub fn collide(&self, grid: &Grid, materials: &Materials, dx: i32, dy: i32) -> bool {
    self.footprint().map(|pos| pos.offset(dx, dy)).any(|pos| {
      if self.occupies(pos) {
        return false;
      }
      !grid.contains(pos) || materials.is_solid(grid.get(pos))
    })
  }

  /// Walks one cell sideways, stepping up inclines lower than the body.
  /// Pushes what is in front when no step fits.
  pub fn move_x(&mut self, grid: &mut Grid, materials: &Materials, dx: i32) -> bool {
    let max_climb = if self.keys.duck { 0 } else { self.height - 1 };
    for climb in 0..=max_climb {
      let dy = -climb;
      if self.collide(grid, materials, dx, dy) {
        continue;
      }
      self.shift(grid, dx, dy);
      return true;
    }

    let dir = Direction::horizontal(dx);
    let front = if dx > 0 { self.x + self.width } else { self.x - 1 };
    for y in (self.head_y()..=self.y).rev() {
      push(grid, materials, CellPos::new(front, y), dir);
    }
    false
  }

  /// Moves one cell vertically. Rising first pulls the column above the
  /// head out of the way.
  pub fn move_y(&mut self, grid: &mut Grid, materials: &Materials, dy: i32) -> bool {
    if dy < 0 {
      let above = self.head_y() - 1;
      for x in self.x..self.x + self.width {
        pull(grid, materials, CellPos::new(x, above), Direction::UP);
      }
    }
    if self.collide(grid, materials, 0, dy) {
      return false;
    }
    self.shift(grid, 0, dy);
    true
  }

  /// Swaps every footprint cell with its destination, leading edge first,
  /// so no body cell is overwritten before it moves.
  fn shift(&mut self, grid: &mut Grid, dx: i32, dy: i32) {
    let rows: Vec<i32> = if dy > 0 {
      (self.head_y()..=self.y).rev().collect()
    } else {
      (self.head_y()..=self.y).collect()
    };
    let columns: Vec<i32> = if dx > 0 {
      (self.x..self.x + self.width).rev().collect()
    } else {
      (self.x..self.x + self.width).collect()
    };
    for &y in &rows {
      for &x in &columns {
        let from = CellPos::new(x, y);
        grid.swap(from, from.offset(dx, dy));
      }
    }
    self.x += dx;
    self.y += dy;
  }
}
