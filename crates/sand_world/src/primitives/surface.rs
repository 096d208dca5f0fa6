//! Row-major 2D buffer.
//!
//! A [`Surface`] backs the material grid, the light mask and the per-tick
//! touch stamps. Coordinates are signed; anything outside the surface
//! reports `None` and ignores writes.

use std::ops::{Index, IndexMut};

/// A 2D buffer of elements.
///
/// Data is stored in row-major order (y * width + x).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface<T> {
  data: Box<[T]>,
  width: u32,
  height: u32,
}

impl<T: Clone + Default> Surface<T> {
  /// Creates a new surface filled with the default value.
  pub fn new(width: u32, height: u32) -> Self {
    Self::filled(width, height, T::default())
  }
}

impl<T: Clone> Surface<T> {
  /// Creates a new surface filled with the given value.
  pub fn filled(width: u32, height: u32, value: T) -> Self {
    let len = (width as usize) * (height as usize);
    Self {
      data: vec![value; len].into_boxed_slice(),
      width,
      height,
    }
  }

  /// Fills the entire surface with the given value.
  #[inline]
  pub fn fill(&mut self, value: T) {
    self.data.fill(value);
  }
}

impl<T> Surface<T> {
  /// Wraps existing row-major data. Returns `None` on a length mismatch.
  pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Option<Self> {
    if data.len() != (width as usize) * (height as usize) {
      return None;
    }
    Some(Self {
      data: data.into_boxed_slice(),
      width,
      height,
    })
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Number of elements.
  #[inline]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Converts (x, y) to a linear index, or `None` if out of bounds.
  #[inline]
  pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
    if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
      Some((y as usize) * (self.width as usize) + (x as usize))
    } else {
      None
    }
  }

  /// Converts a linear index back to (x, y).
  #[inline]
  pub fn coords_of(&self, index: usize) -> (i32, i32) {
    let w = self.width as usize;
    ((index % w) as i32, (index / w) as i32)
  }

  /// Returns a reference to the element at (x, y), or `None` if out of bounds.
  #[inline]
  pub fn get(&self, x: i32, y: i32) -> Option<&T> {
    self.index_of(x, y).map(|i| &self.data[i])
  }

  /// Returns a mutable reference to the element at (x, y), or `None` if out
  /// of bounds.
  #[inline]
  pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
    self.index_of(x, y).map(|i| &mut self.data[i])
  }

  /// Sets the element at (x, y). Returns `true` if successful, `false` if out
  /// of bounds.
  #[inline]
  pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
    if let Some(i) = self.index_of(x, y) {
      self.data[i] = value;
      true
    } else {
      false
    }
  }

  #[inline]
  pub fn swap(&mut self, a: usize, b: usize) {
    self.data.swap(a, b);
  }

  #[inline]
  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  #[inline]
  pub fn as_slice_mut(&mut self) -> &mut [T] {
    &mut self.data
  }
}

impl<T> Index<usize> for Surface<T> {
  type Output = T;

  #[inline]
  fn index(&self, index: usize) -> &Self::Output {
    &self.data[index]
  }
}

impl<T> IndexMut<usize> for Surface<T> {
  #[inline]
  fn index_mut(&mut self, index: usize) -> &mut Self::Output {
    &mut self.data[index]
  }
}
