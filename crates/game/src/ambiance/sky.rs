use bevy::prelude::*;

use crate::config::{ConfigLoaded, SkyKeyframe};
use crate::time_of_day::TimeOfDay;

/// Tints the clear color behind the world texture by hour.
///
/// Nothing cells are transparent in the texture, so the sky shows through
/// every empty cell.
pub struct SkyPlugin;

impl Plugin for SkyPlugin {
  fn build(&self, app: &mut App) {
    app
      .insert_resource(ClearColor(Color::BLACK))
      .add_systems(Update, update_sky_color);
  }
}

fn update_sky_color(
  time_of_day: Option<Res<TimeOfDay>>,
  config: Res<ConfigLoaded>,
  mut clear_color: ResMut<ClearColor>,
) {
  let Some(time_of_day) = time_of_day else {
    return;
  };
  if !time_of_day.is_changed() && !config.is_changed() {
    return;
  }

  let [r, g, b] = sky_color(time_of_day.hour, &config.day_cycle.sky_colors);
  clear_color.0 = Color::srgb(r, g, b);
}

/// Linear blend between the keyframes around `hour`, wrapping past
/// midnight. Keyframes must be sorted by hour.
pub fn sky_color(hour: f32, keyframes: &[SkyKeyframe]) -> [f32; 3] {
  let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
    return [0.0, 0.0, 0.0];
  };

  let next = keyframes.iter().position(|kf| kf.hour > hour);
  let (prev, next, span, offset) = match next {
    Some(0) | None => {
      // Between the last keyframe and the first one of the next day.
      let span = first.hour + 24.0 - last.hour;
      let offset = (hour - last.hour).rem_euclid(24.0);
      (last, first, span, offset)
    }
    Some(i) => {
      let prev = &keyframes[i - 1];
      let next = &keyframes[i];
      (prev, next, next.hour - prev.hour, hour - prev.hour)
    }
  };

  let t = if span > 0.0 {
    (offset / span).clamp(0.0, 1.0)
  } else {
    0.0
  };
  std::array::from_fn(|c| prev.color[c] + t * (next.color[c] - prev.color[c]))
}
