//! Rolling per-phase tick timings.

use std::collections::VecDeque;

use web_time::Instant;

/// Number of ticks averaged by [`TickTimer`].
pub const TIMER_WINDOW: usize = 10;

/// Tick phases, in execution order.
pub const PHASES: [&str; 4] = ["weather", "physics", "persons", "light"];

/// A ring buffer of samples in milliseconds.
#[derive(Clone, Debug)]
struct Window {
  samples: VecDeque<f32>,
  capacity: usize,
}

impl Window {
  fn new(capacity: usize) -> Self {
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  fn push(&mut self, value: f32) {
    if self.samples.len() >= self.capacity {
      self.samples.pop_front();
    }
    self.samples.push_back(value);
  }

  fn avg(&self) -> f32 {
    if self.samples.is_empty() {
      0.0
    } else {
      self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }
  }
}

/// Measures how long each phase of a tick takes.
///
/// Call [`TickTimer::start`] at the top of a tick and [`TickTimer::mark`]
/// after each phase. Disabled timers record nothing.
#[derive(Clone, Debug)]
pub struct TickTimer {
  enabled: bool,
  last: Option<Instant>,
  phases: Vec<(&'static str, Window)>,
}

impl TickTimer {
  pub fn new(enabled: bool) -> Self {
    Self {
      enabled,
      last: None,
      phases: PHASES
        .iter()
        .map(|&name| (name, Window::new(TIMER_WINDOW)))
        .collect(),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
    self.last = None;
  }

  pub fn start(&mut self) {
    if self.enabled {
      self.last = Some(Instant::now());
    }
  }

  /// Records the time since the previous mark under `phase`.
  pub fn mark(&mut self, phase: &'static str) {
    let Some(last) = self.last else {
      return;
    };
    let now = Instant::now();
    let ms = now.duration_since(last).as_secs_f32() * 1000.0;
    self.last = Some(now);

    match self.phases.iter_mut().find(|(name, _)| *name == phase) {
      Some((_, window)) => window.push(ms),
      None => {
        let mut window = Window::new(TIMER_WINDOW);
        window.push(ms);
        self.phases.push((phase, window));
      }
    }
  }

  /// Average milliseconds per phase over the window.
  pub fn averages(&self) -> Vec<(&'static str, f32)> {
    self
      .phases
      .iter()
      .map(|(name, window)| (*name, window.avg()))
      .collect()
  }

  /// Sum of the phase averages.
  pub fn total(&self) -> f32 {
    self.phases.iter().map(|(_, w)| w.avg()).sum()
  }
}

impl Default for TickTimer {
  fn default() -> Self {
    Self::new(false)
  }
}
