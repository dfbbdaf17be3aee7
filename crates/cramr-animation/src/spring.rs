//! Damped spring animation driven by explicit frame ticks.

/// Largest integration step in seconds. Frames are split into steps of at
/// most this length; semi-implicit Euler diverges for a critically damped
/// 3000-stiffness spring at 16 ms steps.
const MAX_TIMESTEP: f32 = 0.004;

/// Frames longer than this (a stalled host loop) are simulated as this long.
const MAX_FRAME_DT: f32 = 1.0;

/// Spring animation configuration.
///
/// Thresholds are expressed in the animated unit (pixels for the sheet).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values = faster animation.
    pub stiffness: f32,
    /// Velocity threshold (units/sec) below which the spring may settle.
    pub velocity_threshold: f32,
    /// Distance from the target below which the spring may settle.
    pub position_threshold: f32,
}

impl SpringSpec {
    /// Critically damped spring with no overshoot.
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 5.0,
            position_threshold: 0.5,
        }
    }

    /// Create a bouncy spring.
    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    /// Create a stiff spring (fast, no bounce).
    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }

    /// Slightly under-damped spring used by the bottom sheet.
    ///
    /// A release with no velocity settles without visible bounce, a flick
    /// carries its momentum past the anchor and springs back.
    pub fn sheet() -> Self {
        Self {
            damping_ratio: 0.8,
            stiffness: 400.0,
            ..Self::default_spring()
        }
    }

    fn damping_coefficient(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Snapshot returned by every [`SpringAnimation::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringFrame {
    pub value: f32,
    pub velocity: f32,
    pub is_settled: bool,
}

/// A single spring run from a start value towards a fixed target.
#[derive(Debug, Clone)]
pub struct SpringAnimation {
    spec: SpringSpec,
    value: f32,
    velocity: f32,
    target: f32,
    settled: bool,
}

impl SpringAnimation {
    /// Starts a spring at `start` moving with `initial_velocity` (units/sec).
    pub fn new(start: f32, target: f32, initial_velocity: f32, spec: SpringSpec) -> Self {
        let mut animation = Self {
            spec,
            value: start,
            velocity: if initial_velocity.is_finite() {
                initial_velocity
            } else {
                0.0
            },
            target,
            settled: false,
        };
        animation.settle_if_at_rest();
        animation
    }

    pub fn spec(&self) -> SpringSpec {
        self.spec
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Once settled the value is pinned to the target and further ticks are
    /// no-ops.
    pub fn tick(&mut self, dt: f32) -> SpringFrame {
        if !self.settled && dt > 0.0 && dt.is_finite() {
            let stiffness = self.spec.stiffness;
            let damping = self.spec.damping_coefficient();
            let dt = dt.min(MAX_FRAME_DT);

            let mut elapsed = 0.0f32;
            while elapsed < dt {
                let step = MAX_TIMESTEP.min(dt - elapsed);

                // F = -k * x - c * v, unit mass
                let displacement = self.value - self.target;
                let force = -stiffness * displacement - damping * self.velocity;
                self.velocity += force * step;
                self.value += self.velocity * step;

                elapsed += step;
            }

            self.settle_if_at_rest();
            log::trace!(
                "spring tick dt={dt:.4} value={:.2} velocity={:.2} settled={}",
                self.value,
                self.velocity,
                self.settled
            );
        }
        self.frame()
    }

    fn frame(&self) -> SpringFrame {
        SpringFrame {
            value: self.value,
            velocity: self.velocity,
            is_settled: self.settled,
        }
    }

    fn settle_if_at_rest(&mut self) {
        let at_rest = self.velocity.abs() < self.spec.velocity_threshold;
        let near_target = (self.value - self.target).abs() < self.spec.position_threshold;
        if at_rest && near_target {
            self.value = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
    }
}

#[cfg(test)]
#[path = "tests/spring_tests.rs"]
mod tests;
