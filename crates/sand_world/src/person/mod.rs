//! Player-controlled actors.
//!
//! A person is a rigid `width x height` rectangle whose bottom row sits at
//! `(x, y)`. Its footprint is imprinted into the grid (a Skin head row over
//! Clothes) and moves by swapping cells with whatever it displaces.

mod movement;

use serde::{Deserialize, Serialize};

use crate::config::PersonConfig;
use crate::coords::CellPos;
use crate::material::MaterialId;
use crate::world::Grid;

/// Held-key state consumed each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersonKeys {
  pub left: bool,
  pub right: bool,
  /// Disables step-up while walking.
  pub duck: bool,
  pub jump: bool,
}

/// Vertical phase of a person.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonState {
  Grounded,
  Rising,
  /// Holding at the top of a jump.
  Hanging,
  Falling,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
  x: i32,
  y: i32,
  width: i32,
  height: i32,
  /// Remaining jump ticks; above `jump_hang` the person rises.
  jump: u32,
  jump_released: bool,
  jump_duration: u32,
  jump_hang: u32,
  pub keys: PersonKeys,
}

impl Person {
  /// Creates a person standing with its feet at `(x, y)`.
  pub fn new(config: &PersonConfig, x: i32, y: i32) -> Self {
    Self {
      x,
      y,
      width: config.width.max(1),
      height: config.height.max(1),
      jump: 0,
      jump_released: true,
      jump_duration: config.jump,
      jump_hang: config.jump_hang.min(config.jump),
      keys: PersonKeys::default(),
    }
  }

  /// A person standing at the bottom centre of `grid`.
  pub fn spawn(config: &PersonConfig, grid: &Grid) -> Self {
    let x = (grid.width() as f32 / 2.0).round() as i32;
    let y = grid.height() as i32 - 1;
    Self::new(config, x, y)
  }

  /// Feet position (bottom-left of the footprint).
  #[inline]
  pub fn pos(&self) -> CellPos {
    CellPos::new(self.x, self.y)
  }

  #[inline]
  pub fn width(&self) -> i32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> i32 {
    self.height
  }

  #[inline]
  pub fn jump(&self) -> u32 {
    self.jump
  }

  /// Top row of the footprint.
  #[inline]
  pub fn head_y(&self) -> i32 {
    self.y - (self.height - 1)
  }

  /// Footprint as `(x, y, width, height)` with `y` the top row.
  #[inline]
  pub fn rect(&self) -> (i32, i32, i32, i32) {
    (self.x, self.head_y(), self.width, self.height)
  }

  /// Whether `pos` lies inside the current footprint.
  #[inline]
  pub fn occupies(&self, pos: CellPos) -> bool {
    pos.x >= self.x
      && pos.x < self.x + self.width
      && pos.y >= self.head_y()
      && pos.y <= self.y
  }

  /// Footprint cells, top row first.
  pub fn footprint(&self) -> impl Iterator<Item = CellPos> + '_ {
    (self.head_y()..=self.y)
      .flat_map(move |y| (self.x..self.x + self.width).map(move |x| CellPos::new(x, y)))
  }

  /// Writes the body into the grid. Cells outside the grid are skipped.
  pub fn imprint(&self, grid: &mut Grid) {
    let head = self.head_y();
    for pos in self.footprint() {
      let material = if pos.y == head {
        MaterialId::Skin
      } else {
        MaterialId::Clothes
      };
      grid.set(pos, material);
    }
  }

  /// Clears the footprint to Nothing.
  pub fn erase(&self, grid: &mut Grid) {
    for pos in self.footprint() {
      grid.set(pos, MaterialId::Nothing);
    }
  }

  /// Moves the body to new feet coordinates, bypassing collision.
  pub fn teleport(&mut self, grid: &mut Grid, x: i32, y: i32) {
    self.erase(grid);
    self.x = x;
    self.y = y;
    self.imprint(grid);
  }

  pub fn record(&self) -> PersonRecord {
    PersonRecord {
      x: Some(self.x),
      y: Some(self.y),
      jump: Some(self.jump),
      width: Some(self.width),
      height: Some(self.height),
    }
  }

  /// Copies the fields present in `record` onto this person.
  pub fn apply_record(&mut self, record: &PersonRecord) {
    if let Some(x) = record.x {
      self.x = x;
    }
    if let Some(y) = record.y {
      self.y = y;
    }
    if let Some(jump) = record.jump {
      self.jump = jump.min(self.jump_duration);
    }
    if let Some(width) = record.width {
      self.width = width.max(1);
    }
    if let Some(height) = record.height {
      self.height = height.max(1);
    }
  }
}

/// Persisted person fields. Only these survive a save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub x: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub y: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jump: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub width: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub height: Option<i32>,
}
