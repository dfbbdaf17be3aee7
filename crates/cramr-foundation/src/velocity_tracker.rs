//! Release velocity estimation for drags whose host only reports positions.
//!
//! Uses the impulse strategy from Jetpack Compose's VelocityTracker1D: the
//! velocity is recovered from the kinetic energy the recent pointer motion
//! would have imparted to a unit mass.

use smallvec::SmallVec;
use std::collections::VecDeque;

/// Number of samples kept.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms contribute.
const HORIZON_MS: i64 = 100;

/// A gap longer than this between two samples means the pointer stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// 1D velocity tracker over absolute positions.
///
/// # Usage
/// ```
/// use cramr_foundation::VelocityTracker1D;
///
/// let mut tracker = VelocityTracker1D::new();
/// tracker.add_data_point(0, 0.0);
/// tracker.add_data_point(10, -50.0);
/// tracker.add_data_point(20, -100.0);
/// assert!(tracker.calculate_velocity() < 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker1D {
    samples: VecDeque<Sample>,
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    /// Records `position` observed at `time_ms`.
    ///
    /// Samples older than the newest one are dropped.
    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        if !position.is_finite() {
            return;
        }
        if let Some(newest) = self.samples.back() {
            if time_ms < newest.time_ms {
                log::debug!(
                    "dropping out-of-order velocity sample at {time_ms}ms (newest {}ms)",
                    newest.time_ms
                );
                return;
            }
        }
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time_ms, position });
    }

    /// Velocity in units/second, 0.0 with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let recent = self.recent_samples();
        if recent.len() < 2 {
            return 0.0;
        }
        impulse_velocity(&recent) * 1000.0
    }

    /// Velocity in units/second, clamped to `±max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }

        let velocity = self.calculate_velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }

        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Samples inside the horizon with no stop gap, oldest first.
    fn recent_samples(&self) -> SmallVec<[Sample; HISTORY_SIZE]> {
        let Some(newest) = self.samples.back().copied() else {
            return SmallVec::new();
        };

        let mut recent: SmallVec<[Sample; HISTORY_SIZE]> = SmallVec::new();
        let mut newer = newest;
        for sample in self.samples.iter().rev() {
            let age = newest.time_ms - sample.time_ms;
            let gap = newer.time_ms - sample.time_ms;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            recent.push(*sample);
            newer = *sample;
        }
        recent.reverse();
        recent
    }
}

/// Units per millisecond from samples ordered oldest first.
fn impulse_velocity(samples: &[Sample]) -> f32 {
    let mut work = 0.0f32;
    for (index, pair) in samples.windows(2).enumerate() {
        let (older, newer) = (pair[0], pair[1]);
        let dt = (newer.time_ms - older.time_ms) as f32;
        if dt == 0.0 {
            continue;
        }

        let v_curr = (newer.position - older.position) / dt;
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if index == 0 {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// E = 0.5 * m * v^2 with m = 1.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}
