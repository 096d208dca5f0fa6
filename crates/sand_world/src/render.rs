//! Color types and grid-to-RGBA conversion.
//!
//! The renderer itself lives outside this crate; it receives a finished
//! grid once per tick and turns it into an RGBA8 buffer here.

use crate::material::Materials;
use crate::world::SandWorld;

/// RGBA pixel with 8 bits per channel, using sRGB color space.
///
/// Re-exported from the `palette` crate for color handling.
pub type Rgba = palette::Srgba<u8>;

/// Creates an opaque RGB color (alpha = 255).
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
  Rgba::new(r, g, b, 255)
}

/// Sunlight overlay blended over lit cells.
pub const SUN: Rgba = Rgba::new(255, 255, 255, 40);

/// Packs a color as a little-endian `u32` (bytes `r, g, b, a`).
#[inline]
pub fn pack_rgba(color: Rgba) -> u32 {
  u32::from_le_bytes([color.red, color.green, color.blue, color.alpha])
}

/// Inverse of [`pack_rgba`].
#[inline]
pub fn unpack_rgba(packed: u32) -> Rgba {
  let [r, g, b, a] = packed.to_le_bytes();
  Rgba::new(r, g, b, a)
}

#[inline]
fn blend_channel(base: u8, over: u8, alpha: u8) -> u8 {
  let a = alpha as u32;
  ((base as u32 * (255 - a) + over as u32 * a) / 255) as u8
}

/// Blends the sun overlay onto a cell color.
#[inline]
pub fn sunlit(color: Rgba) -> Rgba {
  Rgba::new(
    blend_channel(color.red, SUN.red, SUN.alpha),
    blend_channel(color.green, SUN.green, SUN.alpha),
    blend_channel(color.blue, SUN.blue, SUN.alpha),
    color.alpha.max(SUN.alpha),
  )
}

/// Converts the grid and its light mask into RGBA8 bytes (row-major, top row
/// first).
///
/// `output` must hold `width * height * 4` bytes; extra bytes are left
/// untouched.
pub fn materialize(world: &SandWorld, materials: &Materials, output: &mut [u8]) {
  let grid = world.grid();
  let cells = grid.cells().as_slice();
  let light = grid.light().as_slice();

  for ((chunk, &cell), &lit) in output.chunks_exact_mut(4).zip(cells).zip(light) {
    let base = materials.get(cell).color;
    let color = if lit { sunlit(base) } else { base };
    chunk.copy_from_slice(&[color.red, color.green, color.blue, color.alpha]);
  }
}
