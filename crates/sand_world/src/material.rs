//! Material definitions and registry.
//!
//! Every cell of the grid holds a [`MaterialId`]. All behaviour is looked up
//! by id in [`Materials`], which is built once at startup and never mutated.

use bevy::prelude::Resource;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::coords::Direction;
use crate::render::{Rgba, pack_rgba, rgb};

/// Density reported for materials without an explicit entry.
pub const DEFAULT_DENSITY: i32 = 10;

/// Dense material identifier, used as an index into the registry tables.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialId {
  #[default]
  Nothing = 0,
  Sand,
  Water,
  Stone,
  Oil,
  Wood,
  Seed,
  Spore,
  Fire,
  Plant,
  Mushroom,
  Smoke,
  Steam,
  Glass,
  Hole,
  SandSpout,
  WaterSpout,
  OilSpout,
  Wind,
  Rain,
  Skin,
  Clothes,
}

impl MaterialId {
  /// Number of built-in materials.
  pub const COUNT: usize = 22;

  /// All materials in id order.
  pub const ALL: [MaterialId; Self::COUNT] = [
    Self::Nothing,
    Self::Sand,
    Self::Water,
    Self::Stone,
    Self::Oil,
    Self::Wood,
    Self::Seed,
    Self::Spore,
    Self::Fire,
    Self::Plant,
    Self::Mushroom,
    Self::Smoke,
    Self::Steam,
    Self::Glass,
    Self::Hole,
    Self::SandSpout,
    Self::WaterSpout,
    Self::OilSpout,
    Self::Wind,
    Self::Rain,
    Self::Skin,
    Self::Clothes,
  ];

  /// Material returned for reads outside the grid.
  pub const BOUNDARY: MaterialId = MaterialId::Stone;

  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  /// Returns the material with the given index, if any.
  #[inline]
  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }

  /// Returns true for the empty material.
  #[inline]
  pub fn is_nothing(self) -> bool {
    self == Self::Nothing
  }
}

bitflags! {
  /// Boolean material properties.
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
  #[serde(transparent)]
  pub struct MaterialFlags: u8 {
    /// Blocks actor movement.
    const SOLID = 0b0000_0001;
    /// Jiggles sideways when it cannot fall.
    const FLUID = 0b0000_0010;
    /// Lets sunlight through.
    const TRANSPARENT = 0b0000_0100;
    /// Can be relayed by a push chain.
    const PUSHABLE = 0b0000_1000;
    /// Never slides diagonally.
    const FALLS_STRAIGHT = 0b0001_0000;
  }
}

/// How a material responds to gravity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
  /// Does not move on its own.
  #[default]
  Static,
  /// Sinks through lighter materials.
  Falls,
  /// Rises through denser mobile materials.
  Floats,
  /// Floats on roughly half of the ticks.
  Wafts,
}

/// Light condition required by a rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightGate {
  #[default]
  Any,
  /// Only in sunlit cells.
  Light,
  /// Only in shadowed cells.
  Dark,
}

impl LightGate {
  #[inline]
  pub fn allows(self, lit: bool) -> bool {
    match self {
      Self::Any => true,
      Self::Light => lit,
      Self::Dark => !lit,
    }
  }
}

/// Spontaneous conversion into another material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decay {
  /// Per-tick probability.
  pub chance: f32,
  pub into: MaterialId,
  #[serde(default)]
  pub gate: LightGate,
}

/// Directional flow (wind, rain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
  pub direction: Direction,
  /// Material left in place when the flow is blocked.
  pub blocked_into: MaterialId,
}

/// Result of a mover interacting with a target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
  /// New material of the target cell.
  pub result: MaterialId,
  #[serde(default)]
  pub gate: LightGate,
  /// The mover keeps its material instead of becoming Nothing.
  #[serde(default)]
  pub remain: bool,
}

/// Material properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
  pub name: String,
  pub color: Rgba,
  /// `None` falls back to [`DEFAULT_DENSITY`].
  pub density: Option<i32>,
  pub flags: MaterialFlags,
  pub gravity: Gravity,
  /// Material emitted below this one (spouts).
  pub spout: Option<MaterialId>,
  pub decay: Option<Decay>,
  pub flow: Option<Flow>,
}

impl Material {
  /// Color packed as little-endian RGBA, the persistence identity.
  #[inline]
  pub fn packed(&self) -> u32 {
    pack_rgba(self.color)
  }
}

type Table<T> = [[T; MaterialId::COUNT]; MaterialId::COUNT];

/// Material registry with built-in definitions.
#[derive(Resource, Clone, Debug)]
pub struct Materials {
  entries: Vec<Material>,
  transforms: Table<Option<TransformRule>>,
  eats: Table<bool>,
  supports: Table<bool>,
}

impl Materials {
  pub fn new() -> Self {
    Self::from(MaterialsConfig::builtin())
  }

  #[inline]
  pub fn get(&self, id: MaterialId) -> &Material {
    &self.entries[id.index()]
  }

  /// Returns the number of registered materials.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns true if no materials are registered.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[inline]
  pub fn density(&self, id: MaterialId) -> i32 {
    self.get(id).density.unwrap_or(DEFAULT_DENSITY)
  }

  #[inline]
  pub fn is_denser(&self, a: MaterialId, b: MaterialId) -> bool {
    self.density(a) > self.density(b)
  }

  #[inline]
  pub fn is_denser_or_equal(&self, a: MaterialId, b: MaterialId) -> bool {
    self.density(a) >= self.density(b)
  }

  /// Vacant cells can be entered by a push chain: Nothing and the gases.
  #[inline]
  pub fn is_vacant(&self, id: MaterialId) -> bool {
    self.density(id) <= 0
  }

  /// Rule applied when `mover` moves into `target`.
  #[inline]
  pub fn transform(&self, mover: MaterialId, target: MaterialId) -> Option<TransformRule> {
    self.transforms[mover.index()][target.index()]
  }

  /// Returns true if `eater` consumes `food` when `food` moves into it.
  #[inline]
  pub fn eats(&self, eater: MaterialId, food: MaterialId) -> bool {
    self.eats[eater.index()][food.index()]
  }

  /// Returns true if `support` holds `material` in place.
  #[inline]
  pub fn supports(&self, material: MaterialId, support: MaterialId) -> bool {
    self.supports[material.index()][support.index()]
  }

  #[inline]
  pub fn flags(&self, id: MaterialId) -> MaterialFlags {
    self.get(id).flags
  }

  #[inline]
  pub fn is_solid(&self, id: MaterialId) -> bool {
    self.flags(id).contains(MaterialFlags::SOLID)
  }

  #[inline]
  pub fn is_fluid(&self, id: MaterialId) -> bool {
    self.flags(id).contains(MaterialFlags::FLUID)
  }

  #[inline]
  pub fn is_transparent(&self, id: MaterialId) -> bool {
    self.flags(id).contains(MaterialFlags::TRANSPARENT)
  }

  #[inline]
  pub fn is_pushable(&self, id: MaterialId) -> bool {
    self.flags(id).contains(MaterialFlags::PUSHABLE)
  }

  #[inline]
  pub fn gravity(&self, id: MaterialId) -> Gravity {
    self.get(id).gravity
  }

  /// Looks a material up by its packed color.
  pub fn from_packed(&self, packed: u32) -> Option<MaterialId> {
    self
      .entries
      .iter()
      .position(|m| m.packed() == packed)
      .and_then(MaterialId::from_index)
  }

  /// Looks a material up by display name (case-insensitive).
  pub fn by_name(&self, name: &str) -> Option<MaterialId> {
    self
      .entries
      .iter()
      .position(|m| m.name.eq_ignore_ascii_case(name))
      .and_then(MaterialId::from_index)
  }
}

impl Default for Materials {
  fn default() -> Self {
    Self::new()
  }
}

/// Serializable description of one material row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
  pub id: MaterialId,
  pub name: String,
  /// RGBA.
  pub color: [u8; 4],
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub density: Option<i32>,
  #[serde(default)]
  pub flags: MaterialFlags,
  #[serde(default)]
  pub gravity: Gravity,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub supported_by: Vec<MaterialId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub spout: Option<MaterialId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub decay: Option<Decay>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub flow: Option<Flow>,
}

/// Serializable transform table entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformDef {
  pub mover: MaterialId,
  pub target: MaterialId,
  #[serde(flatten)]
  pub rule: TransformRule,
}

/// Serializable eat table entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EatDef {
  pub eater: MaterialId,
  pub food: Vec<MaterialId>,
}

/// Material table as loaded from TOML.
///
/// Rows missing from `materials` keep their built-in definition; the
/// transform and eat tables are taken as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialsConfig {
  #[serde(default)]
  pub materials: Vec<MaterialDef>,
  #[serde(default)]
  pub transforms: Vec<TransformDef>,
  #[serde(default)]
  pub eats: Vec<EatDef>,
}

impl From<MaterialDef> for Material {
  fn from(def: MaterialDef) -> Self {
    let [r, g, b, a] = def.color;
    Self {
      name: def.name,
      color: Rgba::new(r, g, b, a),
      density: def.density,
      flags: def.flags,
      gravity: def.gravity,
      spout: def.spout,
      decay: def.decay,
      flow: def.flow,
    }
  }
}

impl From<MaterialsConfig> for Materials {
  fn from(config: MaterialsConfig) -> Self {
    let builtin = MaterialsConfig::builtin();
    let mut rows: Vec<MaterialDef> = builtin.materials;
    let mut supports = [[false; MaterialId::COUNT]; MaterialId::COUNT];

    for def in config.materials {
      let index = def.id.index();
      rows[index] = def;
    }
    for def in &rows {
      for support in &def.supported_by {
        supports[def.id.index()][support.index()] = true;
      }
    }

    let mut transforms = [[None; MaterialId::COUNT]; MaterialId::COUNT];
    for def in config.transforms {
      transforms[def.mover.index()][def.target.index()] = Some(def.rule);
    }

    let mut eats = [[false; MaterialId::COUNT]; MaterialId::COUNT];
    for def in config.eats {
      for food in def.food {
        eats[def.eater.index()][food.index()] = true;
      }
    }

    log::debug!(
      "material registry built: {} materials, {} transform rules",
      rows.len(),
      transforms.iter().flatten().filter(|r| r.is_some()).count()
    );

    Self {
      entries: rows.into_iter().map(Material::from).collect(),
      transforms,
      eats,
      supports,
    }
  }
}

struct Row {
  id: MaterialId,
  name: &'static str,
  color: Rgba,
  density: Option<i32>,
  flags: MaterialFlags,
  gravity: Gravity,
}

impl Row {
  fn def(self) -> MaterialDef {
    MaterialDef {
      id: self.id,
      name: self.name.to_string(),
      color: [
        self.color.red,
        self.color.green,
        self.color.blue,
        self.color.alpha,
      ],
      density: self.density,
      flags: self.flags,
      gravity: self.gravity,
      supported_by: Vec::new(),
      spout: None,
      decay: None,
      flow: None,
    }
  }
}

impl MaterialsConfig {
  /// The built-in material table.
  pub fn builtin() -> Self {
    use Gravity::*;
    use MaterialId::*;

    const SOLID: MaterialFlags = MaterialFlags::SOLID;
    const FLUID: MaterialFlags = MaterialFlags::FLUID;
    const TRANSPARENT: MaterialFlags = MaterialFlags::TRANSPARENT;
    const PUSHABLE: MaterialFlags = MaterialFlags::PUSHABLE;
    const FALLS_STRAIGHT: MaterialFlags = MaterialFlags::FALLS_STRAIGHT;

    let row = |id, name, color, density, flags, gravity| {
      Row {
        id,
        name,
        color,
        density,
        flags,
        gravity,
      }
      .def()
    };

    let mut materials = vec![
      row(Nothing, "Nothing", Rgba::new(0, 0, 0, 0), Some(0), TRANSPARENT, Static),
      row(Sand, "Sand", rgb(170, 130, 70), Some(3), SOLID.union(PUSHABLE), Falls),
      row(Water, "Water", rgb(20, 80, 255), Some(2), FLUID.union(TRANSPARENT), Falls),
      row(Stone, "Stone", rgb(120, 120, 120), Some(99), SOLID, Static),
      row(Oil, "Oil", rgb(20, 180, 200), Some(1), FLUID, Falls),
      row(
        Wood,
        "Wood",
        rgb(255, 125, 125),
        Some(3),
        SOLID.union(PUSHABLE).union(FALLS_STRAIGHT),
        Falls,
      ),
      row(Seed, "Seed", rgb(150, 120, 30), Some(3), SOLID.union(PUSHABLE), Falls),
      row(Spore, "Spore", rgb(200, 180, 220), Some(2), SOLID.union(PUSHABLE), Falls),
      row(Fire, "Fire", rgb(255, 100, 0), Some(-1), FLUID, Floats),
      row(Plant, "Plant", rgb(40, 200, 40), None, SOLID, Static),
      row(Mushroom, "Mushroom", rgb(200, 60, 60), None, SOLID, Static),
      row(Smoke, "Smoke", Rgba::new(70, 70, 70, 200), Some(-1), FLUID, Wafts),
      row(
        Steam,
        "Steam",
        Rgba::new(200, 200, 230, 150),
        Some(-2),
        FLUID.union(TRANSPARENT),
        Wafts,
      ),
      row(
        Glass,
        "Glass",
        Rgba::new(180, 180, 225, 130),
        Some(99),
        SOLID.union(TRANSPARENT),
        Static,
      ),
      row(Hole, "Hole", rgb(60, 60, 60), Some(3), SOLID.union(TRANSPARENT), Falls),
      row(SandSpout, "Sand spout", rgb(120, 80, 20), Some(99), SOLID, Static),
      row(WaterSpout, "Water spout", rgb(0, 30, 205), Some(99), SOLID, Static),
      row(OilSpout, "Oil spout", rgb(0, 130, 150), Some(99), SOLID, Static),
      row(Wind, "Wind", Rgba::new(220, 240, 255, 60), Some(0), TRANSPARENT, Static),
      row(Rain, "Rain", Rgba::new(60, 120, 255, 200), Some(2), TRANSPARENT, Static),
      row(Skin, "Skin", rgb(255, 150, 180), None, SOLID, Static),
      row(Clothes, "Clothes", rgb(120, 80, 40), None, SOLID, Static),
    ];

    let decay = |chance, into, gate| {
      Some(Decay {
        chance,
        into,
        gate,
      })
    };
    materials[Wood.index()].supported_by = vec![Wood];
    materials[SandSpout.index()].spout = Some(Sand);
    materials[WaterSpout.index()].spout = Some(Water);
    materials[OilSpout.index()].spout = Some(Oil);
    materials[Fire.index()].decay = decay(0.1, Smoke, LightGate::Any);
    materials[Smoke.index()].decay = decay(0.02, Nothing, LightGate::Any);
    materials[Steam.index()].decay = decay(0.005, Water, LightGate::Any);
    materials[Seed.index()].decay = decay(0.01, Plant, LightGate::Light);
    materials[Spore.index()].decay = decay(0.01, Mushroom, LightGate::Dark);
    materials[Wind.index()].decay = decay(0.02, Nothing, LightGate::Any);
    materials[Wind.index()].flow = Some(Flow {
      direction: Direction::RIGHT,
      blocked_into: Nothing,
    });
    materials[Rain.index()].flow = Some(Flow {
      direction: Direction::DOWN,
      blocked_into: Water,
    });

    let rule = |mover, target, result, gate, remain| TransformDef {
      mover,
      target,
      rule: TransformRule {
        result,
        gate,
        remain,
      },
    };
    let mut transforms = Vec::new();
    for fuel in [Oil, Wood, Plant, Seed, Spore, Mushroom] {
      transforms.push(rule(Fire, fuel, Fire, LightGate::Any, true));
    }
    transforms.push(rule(Fire, Water, Steam, LightGate::Any, false));
    transforms.push(rule(Water, Seed, Plant, LightGate::Light, false));
    transforms.push(rule(Water, Spore, Mushroom, LightGate::Dark, false));
    transforms.push(rule(Steam, Stone, Water, LightGate::Any, false));
    transforms.push(rule(Steam, Glass, Water, LightGate::Any, false));

    let eats = vec![EatDef {
      eater: Hole,
      food: vec![Sand, Water, Oil, Hole],
    }];

    Self {
      materials,
      transforms,
      eats,
    }
  }
}
