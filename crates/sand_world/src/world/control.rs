//! Pause, resume and single-step control of the tick scheduler.

use bevy::prelude::*;

/// Controls whether the simulation advances.
///
/// While paused the grid is still rendered and painting still works; only
/// ticks stop. [`SimulationState::request_step`] lets exactly one tick
/// through while paused.
///
/// # Example
/// ```ignore
/// fn pause_key(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<SimulationState>) {
///   if keys.just_pressed(KeyCode::Escape) {
///     state.toggle();
///   }
/// }
/// ```
#[derive(Resource, Debug, Default)]
pub struct SimulationState {
  paused: bool,
  pending_step: bool,
}

impl SimulationState {
  /// Running state.
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts paused.
  pub fn paused() -> Self {
    Self {
      paused: true,
      pending_step: false,
    }
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn is_running(&self) -> bool {
    !self.paused
  }

  pub fn pause(&mut self) {
    self.paused = true;
  }

  pub fn resume(&mut self) {
    self.paused = false;
    self.pending_step = false;
  }

  pub fn toggle(&mut self) {
    if self.paused {
      self.resume();
    } else {
      self.pause();
    }
  }

  /// Queues one tick to run while paused. Ignored while running.
  pub fn request_step(&mut self) {
    if self.paused {
      self.pending_step = true;
    }
  }

  /// Returns true if a tick should run now, consuming a queued step.
  pub fn take_tick(&mut self) -> bool {
    if !self.paused {
      return true;
    }
    std::mem::take(&mut self.pending_step)
  }
}
