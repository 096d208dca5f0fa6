//! Keyboard and mouse shims over the simulation.
//!
//! Arrows walk and duck, Space or Up jumps. Number and top-row letter keys
//! pick the brush material, the left mouse button paints it and the right
//! one erases. Holding Shift lets the brush overwrite occupied cells.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use sand_world::{CellPos, MaterialId, PersonKeys, SandWorld, SimulationState, WeatherKind};

use crate::config::ConfigLoaded;
use crate::render::{GameCamera, point_to_cell};

pub struct InputPlugin;

impl Plugin for InputPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Startup, init_brush).add_systems(
      Update,
      (
        select_brush_material,
        brush_input,
        paint_system.after(brush_input).after(select_brush_material),
        person_keys,
        simulation_keys,
      ),
    );
  }
}

#[derive(Resource, Debug, Clone)]
pub struct BrushState {
  pub radius: i32,
  pub material: MaterialId,
  pub overwrite: bool,
  pub painting: bool,
  pub erasing: bool,
  pub cell: Option<CellPos>,
}

fn init_brush(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.insert_resource(BrushState {
    radius: config.brush.radius,
    material: MaterialId::Sand,
    overwrite: false,
    painting: false,
    erasing: false,
    cell: None,
  });
}

/// Brush material bound to `key`.
pub fn select_material(key: KeyCode) -> Option<MaterialId> {
  let material = match key {
    KeyCode::Digit0 => MaterialId::Nothing,
    KeyCode::Digit1 => MaterialId::Sand,
    KeyCode::Digit2 => MaterialId::Water,
    KeyCode::Digit3 => MaterialId::Stone,
    KeyCode::Digit4 => MaterialId::Oil,
    KeyCode::Digit5 => MaterialId::Wood,
    KeyCode::Digit6 => MaterialId::Seed,
    KeyCode::Digit7 => MaterialId::Spore,
    KeyCode::Digit8 => MaterialId::Fire,
    KeyCode::KeyQ => MaterialId::SandSpout,
    KeyCode::KeyW => MaterialId::WaterSpout,
    KeyCode::KeyE => MaterialId::Hole,
    KeyCode::KeyR => MaterialId::OilSpout,
    KeyCode::KeyT => MaterialId::Glass,
    KeyCode::KeyY => MaterialId::Plant,
    KeyCode::KeyU => MaterialId::Mushroom,
    KeyCode::KeyI => MaterialId::Smoke,
    KeyCode::KeyO => MaterialId::Steam,
    _ => return None,
  };
  Some(material)
}

/// Weather started by `key`.
pub fn weather_key(key: KeyCode) -> Option<WeatherKind> {
  match key {
    KeyCode::F1 => Some(WeatherKind::Rain),
    KeyCode::F2 => Some(WeatherKind::SandStorm),
    KeyCode::F3 => Some(WeatherKind::Gale),
    _ => None,
  }
}

fn select_brush_material(keys: Res<ButtonInput<KeyCode>>, mut brush: ResMut<BrushState>) {
  if let Some(material) = keys.get_just_pressed().find_map(|&key| select_material(key)) {
    brush.material = material;
    info!("Brush material: {:?}", material);
  }
}

fn brush_input(
  mut brush: ResMut<BrushState>,
  config: Res<ConfigLoaded>,
  mouse_buttons: Res<ButtonInput<MouseButton>>,
  keys: Res<ButtonInput<KeyCode>>,
  mut scroll_events: MessageReader<MouseWheel>,
  world: Res<SandWorld>,
  window_query: Query<&Window, With<PrimaryWindow>>,
  camera_query: Query<(&Camera, &GlobalTransform), With<GameCamera>>,
) {
  brush.painting = mouse_buttons.pressed(MouseButton::Left);
  brush.erasing = mouse_buttons.pressed(MouseButton::Right);
  brush.overwrite = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

  for event in scroll_events.read() {
    let delta = match event.unit {
      MouseScrollUnit::Line => event.y as i32,
      MouseScrollUnit::Pixel => (event.y / 10.0) as i32,
    };
    brush.radius = (brush.radius + delta).clamp(config.brush.min_radius, config.brush.max_radius);
  }

  let Ok(window) = window_query.single() else {
    return;
  };
  let Ok((camera, camera_transform)) = camera_query.single() else {
    return;
  };

  brush.cell = window
    .cursor_position()
    .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
    .map(|point| point_to_cell(point, world.width(), world.height()));
}

fn paint_system(brush: Res<BrushState>, mut world: ResMut<SandWorld>) {
  if !brush.painting && !brush.erasing {
    return;
  }
  let Some(center) = brush.cell else {
    return;
  };

  let material = if brush.erasing {
    MaterialId::Nothing
  } else {
    brush.material
  };
  world.paint(center, brush.radius, material, brush.overwrite);
}

/// Held-key state of the first person.
pub fn person_keys_from(keys: &ButtonInput<KeyCode>) -> PersonKeys {
  PersonKeys {
    left: keys.pressed(KeyCode::ArrowLeft),
    right: keys.pressed(KeyCode::ArrowRight),
    duck: keys.pressed(KeyCode::ArrowDown),
    jump: keys.any_pressed([KeyCode::Space, KeyCode::ArrowUp]),
  }
}

fn person_keys(keys: Res<ButtonInput<KeyCode>>, mut world: ResMut<SandWorld>) {
  let held = person_keys_from(&keys);
  if let Some(person) = world.person_mut(0) {
    if person.keys != held {
      person.keys = held;
    }
  }
}

/// Escape pauses, Period steps once while paused, F1-F3 start weather and
/// P spawns a person.
fn simulation_keys(
  keys: Res<ButtonInput<KeyCode>>,
  mut state: ResMut<SimulationState>,
  mut world: ResMut<SandWorld>,
) {
  if keys.just_pressed(KeyCode::Escape) {
    state.toggle();
    info!("Simulation {}", if state.is_paused() { "paused" } else { "resumed" });
  }
  if keys.just_pressed(KeyCode::Period) {
    state.request_step();
  }
  for kind in keys.get_just_pressed().filter_map(|&key| weather_key(key)) {
    world.start_weather(kind);
    info!("Weather started: {:?}", kind);
  }
  if keys.just_pressed(KeyCode::KeyP) {
    let index = world.spawn_person();
    info!("Person {} spawned", index);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selection_table_covers_the_keymap() {
    let digits = [
      KeyCode::Digit0,
      KeyCode::Digit1,
      KeyCode::Digit2,
      KeyCode::Digit3,
      KeyCode::Digit4,
      KeyCode::Digit5,
      KeyCode::Digit6,
      KeyCode::Digit7,
      KeyCode::Digit8,
    ];
    let letters = [
      KeyCode::KeyQ,
      KeyCode::KeyW,
      KeyCode::KeyE,
      KeyCode::KeyR,
      KeyCode::KeyT,
      KeyCode::KeyY,
      KeyCode::KeyU,
      KeyCode::KeyI,
      KeyCode::KeyO,
    ];
    assert!(digits.iter().chain(&letters).all(|&k| select_material(k).is_some()));
    assert_eq!(select_material(KeyCode::Digit0), Some(MaterialId::Nothing));
    assert_eq!(select_material(KeyCode::KeyE), Some(MaterialId::Hole));
    assert_eq!(select_material(KeyCode::Digit9), None);
    assert_eq!(select_material(KeyCode::KeyP), None);
  }

  #[test]
  fn arrows_drive_the_person() {
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::ArrowLeft);
    keys.press(KeyCode::Space);
    let held = person_keys_from(&keys);
    assert!(held.left && held.jump);
    assert!(!held.right && !held.duck);
  }

  #[test]
  fn function_keys_start_weather() {
    assert_eq!(weather_key(KeyCode::F1), Some(WeatherKind::Rain));
    assert_eq!(weather_key(KeyCode::F3), Some(WeatherKind::Gale));
    assert_eq!(weather_key(KeyCode::F4), None);
  }
}
