//! Sunlight mask.
//!
//! Each column casts one ray from the top row downward, drifting sideways
//! by a slope that depends on the hour. The ray wraps horizontally. A cell
//! is lit if the ray reached it without crossing an opaque cell above it;
//! the opaque cell itself is lit.
//!
//! Columns are independent, so they are computed in parallel and then
//! scattered into the mask.

use rayon::prelude::*;

use crate::material::{MaterialId, Materials};
use crate::primitives::Surface;

/// Largest horizontal drift per row.
pub const MAX_SLOPE: f32 = 2.0;

/// Horizontal drift per row for `hour`: zero at noon, negative in the
/// morning, positive in the afternoon.
pub fn sun_slope(hour: f32) -> f32 {
  ((hour.rem_euclid(24.0) - 12.0) / 6.0).clamp(-MAX_SLOPE, MAX_SLOPE)
}

/// Recomputes the full light mask for `cells`.
pub fn compute_light(cells: &Surface<MaterialId>, materials: &Materials, hour: f32) -> Surface<bool> {
  let (width, height) = (cells.width(), cells.height());
  if cells.is_empty() {
    return Surface::filled(width, height, true);
  }

  let w = width as i64;
  let slope = sun_slope(hour) as f64;
  // Whole-cell drift per row shared by every column, which keeps the
  // column-to-cell mapping a bijection within each row.
  let offsets: Vec<i64> = (0..height as i64)
    .map(|y| (0.5 + slope * y as f64).floor() as i64)
    .collect();
  let cells = cells.as_slice();

  let columns: Vec<Vec<bool>> = (0..w)
    .into_par_iter()
    .map(|c| {
      let mut lit = true;
      offsets
        .iter()
        .enumerate()
        .map(|(y, &offset)| {
          let x = (c + offset).rem_euclid(w);
          let here = lit;
          if lit && !materials.is_transparent(cells[y * width as usize + x as usize]) {
            lit = false;
          }
          here
        })
        .collect()
    })
    .collect();

  let mut mask = Surface::filled(width, height, false);
  for (c, column) in columns.iter().enumerate() {
    for (y, (&lit, &offset)) in column.iter().zip(&offsets).enumerate() {
      let x = (c as i64 + offset).rem_euclid(w) as usize;
      mask[y * width as usize + x] = lit;
    }
  }
  mask
}
