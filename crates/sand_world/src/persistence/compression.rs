//! LZ4 wrapper for stored grid blobs.
//!
//! The compressed form carries the uncompressed size as a prefix; the blob
//! inside is unchanged.

/// Compresses a grid blob.
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
  lz4_flex::compress_prepend_size(data)
}

/// Decompresses data produced by [`compress_lz4`].
pub fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>, lz4_flex::block::DecompressError> {
  lz4_flex::decompress_size_prepended(data)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mostly_empty_grid_shrinks() {
    let mut blob = vec![0u8; 4 * 300 * 300];
    blob[1000..1004].copy_from_slice(&[170, 130, 70, 255]);
    let packed = compress_lz4(&blob);
    assert!(packed.len() < blob.len() / 20);
    assert_eq!(decompress_lz4(&packed).unwrap(), blob);
  }

  #[test]
  fn garbage_fails() {
    // Size prefix of 10, then a literal run whose length byte is missing.
    assert!(decompress_lz4(&[10, 0, 0, 0, 0xf0]).is_err());
  }
}
