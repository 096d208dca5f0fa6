//! The simulated world: grid, actors, weather and portals.

mod brush;
pub mod control;
mod grid;

use bevy::prelude::Resource;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub use control::SimulationState;
pub use grid::Grid;

use crate::config::SandWorldConfig;
use crate::coords::CellPos;
use crate::diagnostics::TickTimer;
use crate::material::{MaterialId, Materials};
use crate::person::Person;
use crate::portal::Portal;
use crate::primitives::Surface;
use crate::simulation::light::compute_light;
use crate::weather::{Weather, WeatherKind};

/// All mutable simulation state.
///
/// Owned exclusively by the tick while it runs; renderers read it between
/// ticks.
#[derive(Resource)]
pub struct SandWorld {
  pub(crate) grid: Grid,
  pub(crate) persons: Vec<Person>,
  pub(crate) weathers: Vec<Weather>,
  pub(crate) portals: Vec<Portal>,
  pub(crate) portal_activated: Option<String>,
  pub(crate) rng: SmallRng,
  pub(crate) order: Vec<usize>,
  pub(crate) timer: TickTimer,
  pub(crate) hour: f32,
  pub(crate) tick: u64,
  pub(crate) config: SandWorldConfig,
}

impl SandWorld {
  /// Creates an empty world sized by `config`, with no persons.
  pub fn new(config: &SandWorldConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_os_rng(),
    };
    let grid = Grid::new(config.width, config.height);
    log::info!(
      "sand world {}x{} created (seed: {:?})",
      config.width,
      config.height,
      config.seed
    );
    Self {
      order: Vec::with_capacity(grid.len()),
      grid,
      persons: Vec::new(),
      weathers: Vec::new(),
      portals: Vec::new(),
      portal_activated: None,
      rng,
      timer: TickTimer::new(config.timing),
      hour: config.start_hour.rem_euclid(24.0),
      tick: 0,
      config: config.clone(),
    }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.grid.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.grid.height()
  }

  #[inline]
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  #[inline]
  pub fn config(&self) -> &SandWorldConfig {
    &self.config
  }

  /// Material at `pos`; the boundary material outside the grid.
  #[inline]
  pub fn get(&self, pos: CellPos) -> MaterialId {
    self.grid.get(pos)
  }

  /// Writes a single cell, bypassing physics.
  #[inline]
  pub fn set(&mut self, pos: CellPos, material: MaterialId) -> bool {
    self.grid.set(pos, material)
  }

  #[inline]
  pub fn swap(&mut self, a: CellPos, b: CellPos) -> bool {
    self.grid.swap(a, b)
  }

  #[inline]
  pub fn is_lit(&self, pos: CellPos) -> bool {
    self.grid.is_lit(pos)
  }

  /// Ticks completed so far.
  #[inline]
  pub fn tick(&self) -> u64 {
    self.tick
  }

  #[inline]
  pub fn hour(&self) -> f32 {
    self.hour
  }

  /// Sets the time of day used by the next light pass.
  pub fn set_hour(&mut self, hour: f32) {
    self.hour = hour.rem_euclid(24.0);
  }

  pub fn timer(&self) -> &TickTimer {
    &self.timer
  }

  pub fn timer_mut(&mut self) -> &mut TickTimer {
    &mut self.timer
  }

  /// Replaces every cell, keeping actors and weather. The light mask is
  /// recomputed immediately.
  pub fn replace_cells(&mut self, cells: Surface<MaterialId>, materials: &Materials) {
    self.grid = Grid::from_cells(cells);
    self.order = Vec::with_capacity(self.grid.len());
    for person in &self.persons {
      person.imprint(&mut self.grid);
    }
    self.relight(materials);
  }

  /// Clears the grid to Nothing, keeping actors.
  pub fn clear(&mut self) {
    self.grid.clear();
    for person in &self.persons {
      person.imprint(&mut self.grid);
    }
  }

  /// Recomputes the light mask from the current grid and hour.
  pub fn relight(&mut self, materials: &Materials) {
    let mask = compute_light(self.grid.cells(), materials, self.hour);
    self.grid.set_light(mask);
  }

  // Persons

  pub fn persons(&self) -> &[Person] {
    &self.persons
  }

  pub fn person_mut(&mut self, index: usize) -> Option<&mut Person> {
    self.persons.get_mut(index)
  }

  /// Adds a person at its own position and imprints it. Returns its index.
  pub fn add_person(&mut self, person: Person) -> usize {
    person.imprint(&mut self.grid);
    self.persons.push(person);
    self.persons.len() - 1
  }

  /// Adds a person at the bottom centre of the grid.
  pub fn spawn_person(&mut self) -> usize {
    let person = Person::spawn(&self.config.person, &self.grid);
    self.add_person(person)
  }

  /// Removes a person and clears its footprint.
  pub fn remove_person(&mut self, index: usize) -> Option<Person> {
    if index >= self.persons.len() {
      return None;
    }
    let person = self.persons.remove(index);
    person.erase(&mut self.grid);
    Some(person)
  }

  /// Moves a person to new feet coordinates.
  pub fn teleport_person(&mut self, index: usize, x: i32, y: i32) -> bool {
    let Some(person) = self.persons.get_mut(index) else {
      return false;
    };
    person.teleport(&mut self.grid, x, y);
    true
  }

  // Weather

  pub fn weathers(&self) -> &[Weather] {
    &self.weathers
  }

  pub fn add_weather(&mut self, weather: Weather) {
    log::info!("{:?} weather started", weather.kind());
    self.weathers.push(weather);
  }

  /// Starts a default-length weather of `kind`.
  pub fn start_weather(&mut self, kind: WeatherKind) {
    self.add_weather(Weather::new(kind));
  }

  // Portals

  pub fn portals(&self) -> &[Portal] {
    &self.portals
  }

  pub fn add_portal(&mut self, portal: Portal) {
    self.portals.push(portal);
  }

  pub fn clear_portals(&mut self) {
    self.portals.clear();
  }

  /// Target of the portal a person entered. Ticks are skipped while set.
  pub fn portal_activated(&self) -> Option<&str> {
    self.portal_activated.as_deref()
  }

  /// Resumes ticking after the requested level has been loaded.
  pub fn complete_portal_load(&mut self) -> Option<String> {
    self.portal_activated.take()
  }

  /// Checks every person against every portal and records the first hit.
  pub(crate) fn check_portals(&mut self) {
    if self.portal_activated.is_some() {
      return;
    }
    for person in &self.persons {
      let (x, y, w, h) = person.rect();
      if let Some(portal) = self.portals.iter().find(|p| p.overlaps(x, y, w, h)) {
        log::info!("portal to '{}' activated", portal.target());
        self.portal_activated = Some(portal.target().to_string());
        return;
      }
    }
  }

  /// Copy of the cells with every person's footprint cleared.
  pub fn cells_without_persons(&self) -> Surface<MaterialId> {
    let mut grid = self.grid.clone();
    for person in &self.persons {
      person.erase(&mut grid);
    }
    grid.cells().clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> SandWorldConfig {
    SandWorldConfig {
      width: 10,
      height: 10,
      seed: Some(42),
      ..Default::default()
    }
  }

  #[test]
  fn spawned_person_is_imprinted() {
    let mut world = SandWorld::new(&config());
    world.spawn_person();
    assert_eq!(world.get(CellPos::new(5, 7)), MaterialId::Skin);
    assert_eq!(world.get(CellPos::new(5, 9)), MaterialId::Clothes);
    let clean = world.cells_without_persons();
    assert!(clean.as_slice().iter().all(|m| m.is_nothing()));
  }

  #[test]
  fn remove_person_erases() {
    let mut world = SandWorld::new(&config());
    world.spawn_person();
    assert!(world.remove_person(0).is_some());
    assert_eq!(world.grid().count(MaterialId::Nothing), 100);
    assert!(world.remove_person(0).is_none());
  }

  #[test]
  fn portal_activation_and_completion() {
    let mut world = SandWorld::new(&config());
    world.spawn_person();
    world.add_portal(Portal::new(0, 0, 2, 2, "cave").unwrap());
    world.check_portals();
    assert_eq!(world.portal_activated(), None);
    world.add_portal(Portal::new(4, 8, 1, 1, "mine").unwrap());
    world.check_portals();
    assert_eq!(world.portal_activated(), Some("mine"));
    assert_eq!(world.complete_portal_load().as_deref(), Some("mine"));
    assert_eq!(world.portal_activated(), None);
  }

  #[test]
  fn hour_wraps() {
    let mut world = SandWorld::new(&config());
    world.set_hour(25.5);
    assert_eq!(world.hour(), 1.5);
    world.set_hour(-1.0);
    assert_eq!(world.hour(), 23.0);
  }
}
