//! Frame-rate monitoring and adaptive quality.
//!
//! The monitor turns frame timestamps into a windowed FPS estimate. Every
//! `check_interval` frames the controller asks whether the average fell
//! below `min_fps`; if so it shrinks the active particle count. Quality is
//! only ever reduced, never restored.

use crate::constants::{
    DEFAULT_CHECK_INTERVAL, DEFAULT_MIN_FPS, DEFAULT_MIN_PARTICLES, DEFAULT_REDUCTION_RATE,
    DEFAULT_TARGET_FPS,
};
use crate::environment::PerformanceConfig;
use crate::system::ParticleSystem;
use log::{debug, info};
use std::collections::VecDeque;

/// Fixed-capacity window of recent samples.
#[derive(Clone, Debug)]
pub struct RollingAverage {
    values: VecDeque<f32>,
    capacity: usize,
}

impl RollingAverage {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Mean of the window, `None` when empty.
    pub fn average(&self) -> Option<f32> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f32>() / self.values.len() as f32)
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Windowed FPS estimator fed with frame timestamps in milliseconds.
#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    target_fps: f32,
    min_fps: f32,
    check_interval: usize,
    samples: RollingAverage,
    frame_count: usize,
    last_timestamp: Option<f64>,
}

impl PerformanceMonitor {
    pub fn new(target_fps: f32, min_fps: f32) -> Self {
        Self::with_interval(target_fps, min_fps, DEFAULT_CHECK_INTERVAL)
    }

    pub fn with_interval(target_fps: f32, min_fps: f32, check_interval: usize) -> Self {
        let check_interval = check_interval.max(1);
        Self {
            target_fps,
            min_fps,
            check_interval,
            samples: RollingAverage::new(check_interval),
            frame_count: 0,
            last_timestamp: None,
        }
    }

    /// Record a frame. The first call only sets the reference timestamp;
    /// later calls add `1000 / Δ` as an FPS sample. Non-increasing
    /// timestamps count as a frame but add no sample.
    pub fn record_frame(&mut self, timestamp_ms: f64) {
        if let Some(last) = self.last_timestamp {
            let delta = timestamp_ms - last;
            if delta > 0.0 {
                self.samples.push((1000.0 / delta) as f32);
            }
        }
        self.last_timestamp = Some(timestamp_ms);
        self.frame_count += 1;
    }

    /// True once `check_interval` frames were recorded since the last reset.
    pub fn should_check(&self) -> bool {
        self.frame_count >= self.check_interval
    }

    /// Mean FPS over the window; `target_fps` before any sample exists.
    pub fn average_fps(&self) -> f32 {
        self.samples.average().unwrap_or(self.target_fps)
    }

    pub fn should_reduce_quality(&self) -> bool {
        self.average_fps() < self.min_fps
    }

    /// Clear samples and the frame counter. The last timestamp is kept so
    /// the next frame still yields a sample.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.frame_count = 0;
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    pub fn min_fps(&self) -> f32 {
        self.min_fps
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS, DEFAULT_MIN_FPS)
    }
}

/// How hard to cut when frames are slow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityPolicy {
    /// Fraction of active particles dropped per reduction
    pub reduction_rate: f64,
    /// Floor for the active count
    pub min_count: usize,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            reduction_rate: DEFAULT_REDUCTION_RATE,
            min_count: DEFAULT_MIN_PARTICLES,
        }
    }
}

/// Drives [`ParticleSystem::reduce_particle_count`] from frame timings.
#[derive(Clone, Debug)]
pub struct AdaptiveQualityController {
    monitor: PerformanceMonitor,
    policy: QualityPolicy,
    enabled: bool,
}

impl AdaptiveQualityController {
    pub fn new(monitor: PerformanceMonitor, policy: QualityPolicy, enabled: bool) -> Self {
        Self {
            monitor,
            policy,
            enabled,
        }
    }

    /// Controller for an environment's performance section, default policy.
    pub fn from_performance(config: &PerformanceConfig) -> Self {
        Self::new(
            PerformanceMonitor::new(config.target_fps, config.min_fps),
            QualityPolicy::default(),
            config.adaptive_quality,
        )
    }

    /// Record a frame and, on a check boundary, reduce quality if needed.
    ///
    /// Returns the new active count when a reduction was applied.
    pub fn on_frame(&mut self, timestamp_ms: f64, system: Option<&mut ParticleSystem>) -> Option<usize> {
        self.monitor.record_frame(timestamp_ms);
        if !self.monitor.should_check() {
            return None;
        }

        let fps = self.monitor.average_fps();
        let mut reduced = None;
        if self.enabled && self.monitor.should_reduce_quality() {
            if let Some(system) = system {
                let before = system.active_count();
                let after = system.reduce_particle_count(self.policy.reduction_rate, self.policy.min_count);
                if after < before {
                    info!(
                        "Average {:.1} fps below {:.1}, particles {} -> {}",
                        fps,
                        self.monitor.min_fps(),
                        before,
                        after
                    );
                    reduced = Some(after);
                }
            }
        } else {
            debug!("Performance check: {:.1} fps", fps);
        }

        self.monitor.reset();
        reduced
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn policy(&self) -> &QualityPolicy {
        &self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
