//! Level persistence.
//!
//! A level is stored as two files: a raw grid blob (optionally LZ4
//! compressed) and a TOML record of persons, weather and portals.

pub mod compression;
pub mod format;
pub mod records;

pub use compression::{compress_lz4, decompress_lz4};
pub use format::{CELL_SIZE, PersistenceError, decode_cells, encode_cells};
pub use records::{LevelPaths, LevelRecord};
