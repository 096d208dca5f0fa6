//! Material grid with its light mask and per-tick touch stamps.

use crate::coords::CellPos;
use crate::material::MaterialId;
use crate::primitives::Surface;

/// The cell store.
///
/// Reads outside the grid return [`MaterialId::BOUNDARY`]; writes outside
/// the grid are ignored. Every write stamps the cell with the current tick
/// epoch so the scheduler can skip cells that already acted this tick.
#[derive(Clone, Debug)]
pub struct Grid {
  cells: Surface<MaterialId>,
  light: Surface<bool>,
  stamps: Surface<u32>,
  epoch: u32,
}

impl Grid {
  /// Creates an empty grid (all Nothing, all lit).
  pub fn new(width: u32, height: u32) -> Self {
    Self::from_cells(Surface::new(width, height))
  }

  /// Wraps an existing cell surface.
  pub fn from_cells(cells: Surface<MaterialId>) -> Self {
    let (width, height) = (cells.width(), cells.height());
    Self {
      cells,
      light: Surface::filled(width, height, true),
      stamps: Surface::new(width, height),
      epoch: 1,
    }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.cells.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.cells.height()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  #[inline]
  pub fn contains(&self, pos: CellPos) -> bool {
    self.cells.index_of(pos.x, pos.y).is_some()
  }

  #[inline]
  pub fn index_of(&self, pos: CellPos) -> Option<usize> {
    self.cells.index_of(pos.x, pos.y)
  }

  #[inline]
  pub fn pos_of(&self, index: usize) -> CellPos {
    let (x, y) = self.cells.coords_of(index);
    CellPos::new(x, y)
  }

  /// Material at `pos`, or the boundary material outside the grid.
  #[inline]
  pub fn get(&self, pos: CellPos) -> MaterialId {
    self
      .cells
      .get(pos.x, pos.y)
      .copied()
      .unwrap_or(MaterialId::BOUNDARY)
  }

  /// Writes `material` at `pos`. Returns `false` outside the grid.
  #[inline]
  pub fn set(&mut self, pos: CellPos, material: MaterialId) -> bool {
    match self.index_of(pos) {
      Some(i) => {
        self.cells[i] = material;
        self.stamps[i] = self.epoch;
        true
      }
      None => false,
    }
  }

  /// Exchanges two cells. Does nothing unless both are inside the grid.
  pub fn swap(&mut self, a: CellPos, b: CellPos) -> bool {
    let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
      return false;
    };
    self.cells.swap(ia, ib);
    self.stamps[ia] = self.epoch;
    self.stamps[ib] = self.epoch;
    true
  }

  /// Whether sunlight reaches `pos`. Outside the grid is dark.
  #[inline]
  pub fn is_lit(&self, pos: CellPos) -> bool {
    self.light.get(pos.x, pos.y).copied().unwrap_or(false)
  }

  #[inline]
  pub fn cells(&self) -> &Surface<MaterialId> {
    &self.cells
  }

  #[inline]
  pub fn light(&self) -> &Surface<bool> {
    &self.light
  }

  /// Replaces the light mask.
  ///
  /// Masks of the wrong size are rejected.
  pub fn set_light(&mut self, light: Surface<bool>) -> bool {
    if light.width() != self.width() || light.height() != self.height() {
      return false;
    }
    self.light = light;
    true
  }

  /// Starts a new tick epoch. Cells written before this call count as
  /// untouched.
  pub fn begin_tick(&mut self) {
    self.epoch = self.epoch.wrapping_add(1);
    if self.epoch == 0 {
      self.stamps.fill(0);
      self.epoch = 1;
    }
  }

  /// Whether the cell at `index` was written during the current epoch.
  #[inline]
  pub fn is_touched(&self, index: usize) -> bool {
    self.stamps[index] == self.epoch
  }

  /// Number of cells holding `material`.
  pub fn count(&self, material: MaterialId) -> usize {
    self
      .cells
      .as_slice()
      .iter()
      .filter(|&&m| m == material)
      .count()
  }

  /// Resets every cell to Nothing.
  pub fn clear(&mut self) {
    self.cells.fill(MaterialId::Nothing);
    self.light.fill(true);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn boundary_reads_and_ignored_writes() {
    let mut grid = Grid::new(3, 3);
    assert_eq!(grid.get(CellPos::new(-1, 0)), MaterialId::BOUNDARY);
    assert_eq!(grid.get(CellPos::new(0, 3)), MaterialId::BOUNDARY);
    assert!(!grid.set(CellPos::new(3, 3), MaterialId::Sand));
    assert_eq!(grid.count(MaterialId::Nothing), 9);
    assert!(!grid.swap(CellPos::new(0, 0), CellPos::new(0, -1)));
  }

  #[test]
  fn writes_mark_touched_until_next_epoch() {
    let mut grid = Grid::new(2, 2);
    grid.begin_tick();
    grid.set(CellPos::new(1, 0), MaterialId::Sand);
    let i = grid.index_of(CellPos::new(1, 0)).unwrap();
    assert!(grid.is_touched(i));
    assert!(!grid.is_touched(0));
    grid.begin_tick();
    assert!(!grid.is_touched(i));
  }

  #[test]
  fn swap_moves_material() {
    let mut grid = Grid::new(1, 2);
    grid.set(CellPos::new(0, 0), MaterialId::Sand);
    assert!(grid.swap(CellPos::new(0, 0), CellPos::new(0, 1)));
    assert_eq!(grid.get(CellPos::new(0, 1)), MaterialId::Sand);
    assert_eq!(grid.get(CellPos::new(0, 0)), MaterialId::Nothing);
  }

  #[test]
  fn light_mask_size_checked() {
    let mut grid = Grid::new(2, 2);
    assert!(!grid.set_light(Surface::new(3, 2)));
    assert!(grid.set_light(Surface::new(2, 2)));
    assert!(!grid.is_lit(CellPos::new(0, 0)));
  }
}
