//! Time-scale multiplier with eased transitions.
//!
//! The driver scales each frame's `delta` by [`SpeedControl::current_speed`]
//! before handing it to the simulation.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 2.0;
pub const DEFAULT_SPEED: f32 = 1.0;
/// Seconds to ease from one speed to another
pub const TRANSITION_DURATION: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    VerySlow,
    Slow,
    Normal,
    Fast,
    VeryFast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 5] = [
        SpeedPreset::VerySlow,
        SpeedPreset::Slow,
        SpeedPreset::Normal,
        SpeedPreset::Fast,
        SpeedPreset::VeryFast,
    ];

    pub fn multiplier(self) -> f32 {
        match self {
            SpeedPreset::VerySlow => 0.25,
            SpeedPreset::Slow => 0.5,
            SpeedPreset::Normal => 1.0,
            SpeedPreset::Fast => 1.5,
            SpeedPreset::VeryFast => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpeedPreset::VerySlow => "very_slow",
            SpeedPreset::Slow => "slow",
            SpeedPreset::Normal => "normal",
            SpeedPreset::Fast => "fast",
            SpeedPreset::VeryFast => "very_fast",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct SpeedControl {
    current: f32,
    target: f32,
    start: f32,
    /// Seconds into the running transition, `None` when settled
    elapsed: Option<f32>,
    duration: f32,
}

impl SpeedControl {
    pub fn new() -> Self {
        Self::with_duration(TRANSITION_DURATION)
    }

    pub fn with_duration(duration: f32) -> Self {
        Self {
            current: DEFAULT_SPEED,
            target: DEFAULT_SPEED,
            start: DEFAULT_SPEED,
            elapsed: None,
            duration: duration.max(0.0),
        }
    }

    /// Start easing toward `speed`, clamped to [`MIN_SPEED`, `MAX_SPEED`].
    /// Setting the current target again is a no-op.
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            warn!("Ignoring non-finite speed {}", speed);
            return;
        }
        let clamped = speed.clamp(MIN_SPEED, MAX_SPEED);
        if clamped == self.target {
            return;
        }

        debug!("Speed changing: {:.2}x -> {:.2}x", self.current, clamped);
        self.start = self.current;
        self.target = clamped;
        self.elapsed = Some(0.0);
    }

    pub fn set_preset(&mut self, preset: SpeedPreset) {
        self.set_speed(preset.multiplier());
    }

    /// Advance the transition by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        let Some(elapsed) = self.elapsed else {
            return;
        };
        let elapsed = elapsed + delta.max(0.0);

        let t = if self.duration > 0.0 {
            (elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.current = self.start + (self.target - self.start) * ease_in_out(t);

        if t >= 1.0 {
            self.current = self.target;
            self.elapsed = None;
            debug!("Speed transition complete: {:.2}x", self.current);
        } else {
            self.elapsed = Some(elapsed);
        }
    }

    pub fn current_speed(&self) -> f32 {
        self.current
    }

    pub fn target_speed(&self) -> f32 {
        self.target
    }

    pub fn is_transitioning(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Ease back to [`DEFAULT_SPEED`].
    pub fn reset(&mut self) {
        self.set_speed(DEFAULT_SPEED);
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Quadratic ease-in-out on `t ∈ [0, 1]`.
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
