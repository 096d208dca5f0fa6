//! Raw grid blob.
//!
//! One little-endian `u32` per cell holding the material's packed RGBA
//! color, row-major, with no header. The reader must know the grid size.

use crate::material::{MaterialId, Materials};
use crate::primitives::Surface;

/// Bytes per cell in the blob.
pub const CELL_SIZE: usize = 4;

/// Errors from loading or saving a level.
#[derive(Debug)]
pub enum PersistenceError {
  /// The blob does not hold exactly `width * height` cells.
  SizeMismatch { expected: usize, actual: usize },
  /// A cell color matches no registered material.
  UnknownColor { index: usize, packed: u32 },
  Decompress(lz4_flex::block::DecompressError),
  Io(std::io::Error),
  Parse(toml::de::Error),
  Serialize(toml::ser::Error),
  Portal(crate::portal::PortalError),
}

impl std::fmt::Display for PersistenceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::SizeMismatch { expected, actual } => {
        write!(f, "blob size mismatch: expected {} bytes, got {}", expected, actual)
      }
      Self::UnknownColor { index, packed } => {
        write!(f, "unknown material color {:#010x} at cell {}", packed, index)
      }
      Self::Decompress(e) => write!(f, "decompression failed: {}", e),
      Self::Io(e) => write!(f, "I/O error: {}", e),
      Self::Parse(e) => write!(f, "invalid level file: {}", e),
      Self::Serialize(e) => write!(f, "failed to serialize level: {}", e),
      Self::Portal(e) => write!(f, "invalid portal: {}", e),
    }
  }
}

impl std::error::Error for PersistenceError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Decompress(e) => Some(e),
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Serialize(e) => Some(e),
      Self::Portal(e) => Some(e),
      Self::SizeMismatch { .. } | Self::UnknownColor { .. } => None,
    }
  }
}

impl From<std::io::Error> for PersistenceError {
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<toml::de::Error> for PersistenceError {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e)
  }
}

impl From<toml::ser::Error> for PersistenceError {
  fn from(e: toml::ser::Error) -> Self {
    Self::Serialize(e)
  }
}

impl From<lz4_flex::block::DecompressError> for PersistenceError {
  fn from(e: lz4_flex::block::DecompressError) -> Self {
    Self::Decompress(e)
  }
}

impl From<crate::portal::PortalError> for PersistenceError {
  fn from(e: crate::portal::PortalError) -> Self {
    Self::Portal(e)
  }
}

/// Encodes every cell as its packed color.
pub fn encode_cells(cells: &Surface<MaterialId>, materials: &Materials) -> Vec<u8> {
  let mut out = Vec::with_capacity(cells.len() * CELL_SIZE);
  for &cell in cells.as_slice() {
    out.extend_from_slice(&materials.get(cell).packed().to_le_bytes());
  }
  out
}

/// Decodes a blob of exactly `width * height` cells.
pub fn decode_cells(
  bytes: &[u8],
  width: u32,
  height: u32,
  materials: &Materials,
) -> Result<Surface<MaterialId>, PersistenceError> {
  let count = (width as usize) * (height as usize);
  let expected = count * CELL_SIZE;
  if bytes.len() != expected {
    return Err(PersistenceError::SizeMismatch {
      expected,
      actual: bytes.len(),
    });
  }

  let cells = bytes
    .chunks_exact(CELL_SIZE)
    .enumerate()
    .map(|(index, chunk)| {
      let packed = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
      materials
        .from_packed(packed)
        .ok_or(PersistenceError::UnknownColor { index, packed })
    })
    .collect::<Result<Vec<_>, _>>()?;

  Surface::from_vec(width, height, cells).ok_or(PersistenceError::SizeMismatch {
    expected,
    actual: bytes.len(),
  })
}
