//! Level files: a TOML description plus a grid blob.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::compression::{compress_lz4, decompress_lz4};
use super::format::{PersistenceError, decode_cells, encode_cells};
use crate::material::Materials;
use crate::person::{Person, PersonRecord};
use crate::portal::{Portal, PortalRecord};
use crate::weather::{Weather, WeatherRecord};
use crate::world::SandWorld;

/// Everything about a level except its cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
  pub width: u32,
  pub height: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hour: Option<f32>,
  /// The blob next to this file is LZ4-compressed.
  #[serde(default)]
  pub compressed: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub persons: Vec<PersonRecord>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub weathers: Vec<WeatherRecord>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub portals: Vec<PortalRecord>,
}

impl LevelRecord {
  pub fn to_toml(&self) -> Result<String, PersistenceError> {
    Ok(toml::to_string_pretty(self)?)
  }

  pub fn from_toml(source: &str) -> Result<Self, PersistenceError> {
    Ok(toml::from_str(source)?)
  }
}

/// Paths of the two files making up a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelPaths {
  pub record: PathBuf,
  pub cells: PathBuf,
}

impl LevelPaths {
  /// `<dir>/<name>.toml` and `<dir>/<name>.cells`.
  pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
    let dir = dir.as_ref();
    Self {
      record: dir.join(format!("{name}.toml")),
      cells: dir.join(format!("{name}.cells")),
    }
  }
}

impl SandWorld {
  /// Captures persons, weather and portals. Cells are stored separately.
  pub fn record(&self) -> LevelRecord {
    LevelRecord {
      width: self.width(),
      height: self.height(),
      hour: Some(self.hour),
      compressed: false,
      persons: self.persons.iter().map(Person::record).collect(),
      weathers: self.weathers.iter().map(Weather::record).collect(),
      portals: self.portals.iter().map(Portal::record).collect(),
    }
  }

  /// Grid blob with person footprints cleared.
  pub fn encode_cells(&self, materials: &Materials) -> Vec<u8> {
    encode_cells(&self.cells_without_persons(), materials)
  }

  /// Replaces the level with `record` and the cells in `blob`.
  ///
  /// Everything is validated before the world is touched, so a failed load
  /// leaves the current level in place. Existing persons keep their held
  /// keys; extra persons are dropped and missing ones are spawned.
  pub fn load_level(
    &mut self,
    record: &LevelRecord,
    blob: &[u8],
    materials: &Materials,
  ) -> Result<(), PersistenceError> {
    let raw;
    let bytes = if record.compressed {
      raw = decompress_lz4(blob)?;
      raw.as_slice()
    } else {
      blob
    };
    let cells = decode_cells(bytes, record.width, record.height, materials)?;
    let portals = record
      .portals
      .iter()
      .map(Portal::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    let mut persons = std::mem::take(&mut self.persons);
    persons.truncate(record.persons.len());
    let template = self.config.person;
    for (i, person_record) in record.persons.iter().enumerate() {
      if i >= persons.len() {
        persons.push(Person::new(&template, 0, 0));
      }
      persons[i].apply_record(person_record);
    }
    self.persons = persons;

    self.weathers = record.weathers.iter().map(Weather::from_record).collect();
    self.portals = portals;
    self.portal_activated = None;
    if let Some(hour) = record.hour {
      self.set_hour(hour);
    }
    self.replace_cells(cells, materials);

    log::info!(
      "level loaded: {}x{}, {} persons, {} portals",
      record.width,
      record.height,
      self.persons.len(),
      self.portals.len()
    );
    Ok(())
  }

  /// Writes `<name>.toml` and `<name>.cells` into `dir`.
  pub fn save_to_dir(
    &self,
    dir: impl AsRef<Path>,
    name: &str,
    materials: &Materials,
    compress: bool,
  ) -> Result<LevelPaths, PersistenceError> {
    let paths = LevelPaths::new(&dir, name);
    std::fs::create_dir_all(dir.as_ref())?;

    let mut record = self.record();
    record.compressed = compress;
    let blob = self.encode_cells(materials);
    let blob = if compress { compress_lz4(&blob) } else { blob };

    std::fs::write(&paths.cells, blob)?;
    std::fs::write(&paths.record, record.to_toml()?)?;
    log::info!("level saved to {}", paths.record.display());
    Ok(paths)
  }

  /// Reads a level written by [`SandWorld::save_to_dir`].
  pub fn load_from_dir(
    &mut self,
    dir: impl AsRef<Path>,
    name: &str,
    materials: &Materials,
  ) -> Result<(), PersistenceError> {
    let paths = LevelPaths::new(dir, name);
    let record = LevelRecord::from_toml(&std::fs::read_to_string(&paths.record)?)?;
    let blob = std::fs::read(&paths.cells)?;
    self.load_level(&record, &blob, materials)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SandWorldConfig;
  use crate::coords::CellPos;
  use crate::material::MaterialId;
  use crate::portal::PortalError;
  use crate::weather::WeatherKind;

  fn world() -> SandWorld {
    SandWorld::new(&SandWorldConfig {
      width: 8,
      height: 6,
      seed: Some(2),
      ..Default::default()
    })
  }

  #[test]
  fn blob_excludes_persons() {
    let materials = Materials::new();
    let mut world = world();
    world.spawn_person();
    world.set(CellPos::new(0, 0), MaterialId::Sand);
    let blob = world.encode_cells(&materials);
    let cells = decode_cells(&blob, 8, 6, &materials).unwrap();
    assert_eq!(cells.get(0, 0), Some(&MaterialId::Sand));
    assert!(!cells.as_slice().contains(&MaterialId::Skin));
  }

  #[test]
  fn record_toml_roundtrip() {
    let mut world = world();
    world.spawn_person();
    world.start_weather(WeatherKind::Rain);
    world.add_portal(Portal::new(1, 1, 2, 2, "cave").unwrap());
    let record = world.record();
    let back = LevelRecord::from_toml(&record.to_toml().unwrap()).unwrap();
    assert_eq!(back, record);
  }

  #[test]
  fn load_restores_level() {
    let materials = Materials::new();
    let mut source = world();
    source.spawn_person();
    source.set(CellPos::new(2, 2), MaterialId::Wood);
    source.start_weather(WeatherKind::Gale);
    let mut record = source.record();
    record.compressed = true;
    let blob = compress_lz4(&source.encode_cells(&materials));

    let mut target = world();
    target.load_level(&record, &blob, &materials).unwrap();
    assert_eq!(target.get(CellPos::new(2, 2)), MaterialId::Wood);
    assert_eq!(target.persons().len(), 1);
    assert_eq!(target.persons()[0].pos(), source.persons()[0].pos());
    assert_eq!(target.get(source.persons()[0].pos()), MaterialId::Clothes);
    assert_eq!(target.weathers().len(), 1);
  }

  #[test]
  fn bad_portal_leaves_world_untouched() {
    let materials = Materials::new();
    let mut world = world();
    world.set(CellPos::new(0, 0), MaterialId::Stone);
    let mut record = world.record();
    record.portals.push(PortalRecord {
      x: Some(0),
      y: None,
      width: Some(1),
      height: Some(1),
      target: "x".into(),
    });
    let blob = vec![0u8; 8 * 6 * 4];
    let err = world.load_level(&record, &blob, &materials).unwrap_err();
    assert!(matches!(
      err,
      PersistenceError::Portal(PortalError::MissingGeometry("y"))
    ));
    assert_eq!(world.get(CellPos::new(0, 0)), MaterialId::Stone);
  }
}
