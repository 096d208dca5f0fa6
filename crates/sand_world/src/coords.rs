//! Grid coordinates.
//!
//! The grid is addressed with signed coordinates so neighbour lookups never
//! underflow; anything outside `[0, width) x [0, height)` is boundary.
//!
//! # Coordinate System
//!
//! - **X+** is to the right
//! - **Y+** is downward (gravity direction)
//! - **(0, 0)** is the top-left corner, where sunlight enters

use serde::{Deserialize, Serialize};

/// A cell position on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
  pub x: i32,
  pub y: i32,
}

impl CellPos {
  #[inline]
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Returns the position shifted by `dir`.
  #[inline]
  pub const fn step(self, dir: Direction) -> Self {
    Self {
      x: self.x + dir.dx,
      y: self.y + dir.dy,
    }
  }

  /// Returns the position shifted by `(dx, dy)`.
  #[inline]
  pub const fn offset(self, dx: i32, dy: i32) -> Self {
    Self {
      x: self.x + dx,
      y: self.y + dy,
    }
  }
}

/// A unit step on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
  pub dx: i32,
  pub dy: i32,
}

impl Direction {
  pub const UP: Self = Self::new(0, -1);
  pub const DOWN: Self = Self::new(0, 1);
  pub const LEFT: Self = Self::new(-1, 0);
  pub const RIGHT: Self = Self::new(1, 0);

  #[inline]
  pub const fn new(dx: i32, dy: i32) -> Self {
    Self { dx, dy }
  }

  /// Returns the opposite direction.
  #[inline]
  pub const fn reversed(self) -> Self {
    Self {
      dx: -self.dx,
      dy: -self.dy,
    }
  }

  /// Vertical direction for the given sign (`+1` down, `-1` up).
  #[inline]
  pub const fn vertical(sign: i32) -> Self {
    Self { dx: 0, dy: sign }
  }

  /// Horizontal direction for the given sign (`+1` right, `-1` left).
  #[inline]
  pub const fn horizontal(sign: i32) -> Self {
    Self { dx: sign, dy: 0 }
  }
}
