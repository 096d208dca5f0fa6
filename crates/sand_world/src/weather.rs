//! Weather generators.
//!
//! A weather instance drops its material into random empty cells each tick,
//! ramping up linearly with age until it expires.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::coords::CellPos;
use crate::material::MaterialId;
use crate::world::Grid;

/// Ticks a weather instance lives by default.
pub const DEFAULT_MAX_AGE: u32 = 300;
/// Drops per tick reached at the end of a weather's life.
pub const DEFAULT_DROPS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
  Rain,
  SandStorm,
  Gale,
}

impl WeatherKind {
  pub const ALL: [WeatherKind; 3] = [Self::Rain, Self::SandStorm, Self::Gale];

  /// Material dropped by this kind of weather.
  pub fn material(self) -> MaterialId {
    match self {
      Self::Rain => MaterialId::Rain,
      Self::SandStorm => MaterialId::Sand,
      Self::Gale => MaterialId::Wind,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Weather {
  kind: WeatherKind,
  age: u32,
  max_age: u32,
  drops: u32,
}

impl Weather {
  pub fn new(kind: WeatherKind) -> Self {
    Self {
      kind,
      age: 0,
      max_age: DEFAULT_MAX_AGE,
      drops: DEFAULT_DROPS,
    }
  }

  pub fn with_max_age(mut self, max_age: u32) -> Self {
    self.max_age = max_age;
    self
  }

  pub fn with_drops(mut self, drops: u32) -> Self {
    self.drops = drops;
    self
  }

  #[inline]
  pub fn kind(&self) -> WeatherKind {
    self.kind
  }

  /// Number of steps taken so far.
  #[inline]
  pub fn age(&self) -> u32 {
    self.age
  }

  #[inline]
  pub fn max_age(&self) -> u32 {
    self.max_age
  }

  #[inline]
  pub fn done(&self) -> bool {
    self.age >= self.max_age
  }

  /// Drop attempts made on the next step.
  pub fn attempts(&self) -> u32 {
    if self.max_age == 0 {
      return 1;
    }
    let ramp = (self.drops as u64 * self.age as u64 / self.max_age as u64) as u32;
    ramp + 1
  }

  /// Tries to place drops at random cells, writing only into Nothing.
  /// Returns the number of cells written. Does not advance the age.
  pub fn step<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> usize {
    if grid.is_empty() {
      return 0;
    }
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let material = self.kind.material();
    let mut placed = 0;

    for _ in 0..self.attempts() {
      let pos = CellPos::new(rng.random_range(0..w), rng.random_range(0..h));
      if grid.get(pos).is_nothing() {
        grid.set(pos, material);
        placed += 1;
      }
    }

    placed
  }

  pub fn record(&self) -> WeatherRecord {
    WeatherRecord {
      kind: self.kind,
      age: self.age,
      max_age: self.max_age,
      drops: self.drops,
    }
  }

  pub fn from_record(record: &WeatherRecord) -> Self {
    Self {
      kind: record.kind,
      age: record.age,
      max_age: record.max_age,
      drops: record.drops,
    }
  }
}

/// Runs one tick of every active weather.
///
/// Expired instances are removed without stepping; an instance is also
/// removed right after the step that brings it to its maximum age.
pub(crate) fn step_weathers<R: Rng + ?Sized>(
  weathers: &mut Vec<Weather>,
  grid: &mut Grid,
  rng: &mut R,
) {
  weathers.retain_mut(|weather| {
    if weather.done() {
      return false;
    }
    weather.step(grid, rng);
    weather.age += 1;
    if weather.done() {
      log::debug!("{:?} weather ended after {} ticks", weather.kind, weather.age);
      return false;
    }
    true
  });
}

/// Serializable weather state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
  pub kind: WeatherKind,
  #[serde(default)]
  pub age: u32,
  #[serde(default = "default_max_age")]
  pub max_age: u32,
  #[serde(default = "default_drops")]
  pub drops: u32,
}

fn default_max_age() -> u32 {
  DEFAULT_MAX_AGE
}

fn default_drops() -> u32 {
  DEFAULT_DROPS
}
