use bevy::prelude::*;
use sand_world::{SandWorld, SandWorldSet, SimulationState};

use crate::config::ConfigLoaded;

/// Current time of day in the simulation.
#[derive(Resource, Debug, Clone)]
pub struct TimeOfDay {
  /// Current hour (0.0 - 24.0)
  pub hour: f32,
  /// Whether time progression is paused
  pub paused: bool,
}

impl TimeOfDay {
  pub fn advance(&mut self, seconds: f32, seconds_per_hour: f32) {
    if self.paused {
      return;
    }
    self.hour = (self.hour + seconds / seconds_per_hour).rem_euclid(24.0);
  }
}

pub struct TimeOfDayPlugin;

impl Plugin for TimeOfDayPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, init_time_of_day)
      .add_systems(FixedUpdate, advance_time.before(SandWorldSet::Tick));
  }
}

fn init_time_of_day(mut commands: Commands, world: Res<SandWorld>) {
  commands.insert_resource(TimeOfDay {
    hour: world.hour(),
    paused: false,
  });
}

/// The clock stands still with the simulation.
fn advance_time(
  mut time_of_day: ResMut<TimeOfDay>,
  mut world: ResMut<SandWorld>,
  state: Res<SimulationState>,
  config: Res<ConfigLoaded>,
  time: Res<Time>,
) {
  if state.is_running() {
    time_of_day.advance(time.delta_secs(), config.day_cycle.seconds_per_hour);
  }
  world.set_hour(time_of_day.hour);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hours_wrap_at_midnight() {
    let mut time = TimeOfDay {
      hour: 23.5,
      paused: false,
    };
    time.advance(20.0, 20.0);
    assert!((time.hour - 0.5).abs() < 1e-5);
  }

  #[test]
  fn paused_clock_holds() {
    let mut time = TimeOfDay {
      hour: 6.0,
      paused: true,
    };
    time.advance(100.0, 1.0);
    assert_eq!(time.hour, 6.0);
  }
}
