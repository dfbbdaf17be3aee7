//! Drag tracking for the sheet.
//!
//! The tracker turns start/move/end callbacks into a clamped offset. It does
//! not own the offset itself; the caller passes the live value in and writes
//! back whatever the tracker returns.

use crate::gesture_constants::{MAX_FLING_VELOCITY, TOP_EPSILON};
use crate::velocity_tracker::VelocityTracker1D;

/// Legal range of the offset while a finger is down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRange {
    /// Top anchor; the sheet never travels above it.
    pub min: f32,
    /// Bottom anchor plus overscroll.
    pub max: f32,
}

impl DragRange {
    pub fn new(top_offset: f32, bottom_offset: f32, overscroll: f32) -> Self {
        Self {
            min: top_offset,
            max: bottom_offset + overscroll.max(0.0),
        }
    }

    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.min, self.max)
    }

    fn is_at_top(&self, offset: f32) -> bool {
        (offset - self.min).abs() <= TOP_EPSILON
    }
}

/// State of one drag, from finger down to finger up.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pub start_offset: f32,
    /// Delta since drag start, as last reported by the host.
    pub cumulative_delta: f32,
    velocity_tracker: VelocityTracker1D,
}

impl GestureSession {
    fn new(start_offset: f32) -> Self {
        Self {
            start_offset,
            cumulative_delta: 0.0,
            velocity_tracker: VelocityTracker1D::new(),
        }
    }
}

/// What the classifier needs once the finger lifts. `velocity` is the
/// release velocity of the closed session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub offset: f32,
    pub velocity: f32,
    /// False when the end arrived without a matching start.
    pub had_session: bool,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    range: DragRange,
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new(range: DragRange) -> Self {
        Self {
            range,
            session: None,
        }
    }

    pub fn range(&self) -> DragRange {
        self.range
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Opens a session at `current_offset`. Returns false and keeps the open
    /// session if one already exists.
    pub fn start(&mut self, current_offset: f32) -> bool {
        if let Some(session) = &self.session {
            log::debug!(
                "ignoring duplicate drag start; session started at {:.1}",
                session.start_offset
            );
            return false;
        }
        self.session = Some(GestureSession::new(current_offset));
        true
    }

    /// Applies the cumulative `delta_y` since drag start.
    ///
    /// Returns the new offset, or `None` when there is no session, the delta
    /// is not finite, or the sheet is pinned at the top and the finger keeps
    /// moving up. A pinned sheet left just above the top by a settle is pulled
    /// back onto it.
    pub fn drag_to(&mut self, current_offset: f32, delta_y: f32) -> Option<f32> {
        let range = self.range;
        let session = self.session.as_mut()?;
        if !delta_y.is_finite() {
            log::warn!("ignoring non-finite drag delta {delta_y}");
            return None;
        }

        let moving_up = delta_y < session.cumulative_delta;
        session.cumulative_delta = delta_y;
        if moving_up && range.is_at_top(current_offset) {
            let pinned = range.clamp(current_offset);
            return (pinned != current_offset).then_some(pinned);
        }

        Some(range.clamp(session.start_offset + delta_y))
    }

    /// Like [`drag_to`](Self::drag_to), also feeding the velocity tracker
    /// with the unclamped finger position at `time_ms`.
    pub fn drag_to_at(&mut self, current_offset: f32, delta_y: f32, time_ms: i64) -> Option<f32> {
        if let Some(session) = self.session.as_mut() {
            session
                .velocity_tracker
                .add_data_point(time_ms, session.start_offset + delta_y);
        }
        self.drag_to(current_offset, delta_y)
    }

    /// Release velocity estimated from timestamped moves, in px/s.
    pub fn tracked_velocity(&self) -> f32 {
        self.session
            .as_ref()
            .map(|session| {
                session
                    .velocity_tracker
                    .calculate_velocity_with_max(MAX_FLING_VELOCITY)
            })
            .unwrap_or(0.0)
    }

    /// Closes the session. Without an open session the release is treated as
    /// motionless.
    pub fn end(&mut self, current_offset: f32, velocity_y: f32) -> DragRelease {
        let Some(session) = self.session.take() else {
            return DragRelease {
                offset: current_offset,
                velocity: 0.0,
                had_session: false,
            };
        };

        let velocity = if velocity_y.is_finite() {
            velocity_y
        } else {
            log::warn!("treating non-finite release velocity {velocity_y} as zero");
            0.0
        };
        log::trace!(
            "drag released: start {:.1} delta {:.1} velocity {:.1}",
            session.start_offset,
            session.cumulative_delta,
            velocity
        );

        DragRelease {
            offset: current_offset,
            velocity,
            had_session: true,
        }
    }

    /// Drops any open session without classifying it.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture_constants::DEFAULT_OVERSCROLL;

    fn tracker() -> GestureTracker {
        GestureTracker::new(DragRange::new(-330.0, 290.0, DEFAULT_OVERSCROLL))
    }

    #[test]
    fn move_follows_start_offset_plus_delta() {
        let mut tracker = tracker();
        assert!(tracker.start(50.0));
        assert_eq!(tracker.drag_to(50.0, 70.0), Some(120.0));
        assert_eq!(tracker.drag_to(120.0, -30.0), Some(20.0));
    }

    #[test]
    fn offset_is_clamped_to_range() {
        let mut tracker = tracker();
        tracker.start(50.0);
        assert_eq!(tracker.drag_to(50.0, -1_000.0), Some(-330.0));
        tracker.cancel();

        tracker.start(50.0);
        assert_eq!(tracker.drag_to(50.0, 5_000.0), Some(690.0));
    }

    #[test]
    fn clamping_holds_for_any_delta() {
        let mut tracker = tracker();
        tracker.start(50.0);
        let mut current = 50.0;
        let mut delta = -2_000.0f32;
        while delta <= 2_000.0 {
            if let Some(next) = tracker.drag_to(current, delta) {
                current = next;
            }
            assert!((-330.0..=690.0).contains(&current), "delta {delta} -> {current}");
            delta += 37.0;
        }
    }

    #[test]
    fn upward_drag_is_suppressed_at_top() {
        let mut tracker = tracker();
        tracker.start(-330.0);
        assert_eq!(tracker.drag_to(-330.0, -10.0), None);
        assert_eq!(tracker.drag_to(-330.0, -40.0), None);
        // Reversing direction moves the sheet again.
        assert_eq!(tracker.drag_to(-330.0, 20.0), Some(-310.0));
    }

    #[test]
    fn upward_drag_just_above_top_is_pulled_onto_top() {
        let mut tracker = tracker();
        tracker.start(-330.3);
        assert_eq!(tracker.drag_to(-330.3, -5.0), Some(-330.0));
        assert_eq!(tracker.drag_to(-330.0, -20.0), None);
    }

    #[test]
    fn duplicate_start_keeps_first_session() {
        let mut tracker = tracker();
        assert!(tracker.start(50.0));
        assert!(!tracker.start(200.0));
        assert_eq!(tracker.session().map(|s| s.start_offset), Some(50.0));
    }

    #[test]
    fn move_without_session_is_ignored() {
        let mut tracker = tracker();
        assert_eq!(tracker.drag_to(50.0, 100.0), None);
    }

    #[test]
    fn end_without_start_uses_zero_velocity() {
        let mut tracker = tracker();
        let release = tracker.end(120.0, 900.0);
        assert_eq!(
            release,
            DragRelease {
                offset: 120.0,
                velocity: 0.0,
                had_session: false
            }
        );
    }

    #[test]
    fn end_discards_session() {
        let mut tracker = tracker();
        tracker.start(50.0);
        let release = tracker.end(120.0, -450.0);
        assert!(release.had_session);
        assert_eq!(release.velocity, -450.0);
        assert!(!tracker.is_dragging());
        assert!(!tracker.end(120.0, -450.0).had_session);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut tracker = tracker();
        tracker.start(50.0);
        assert_eq!(tracker.drag_to(50.0, f32::NAN), None);
        assert_eq!(tracker.end(50.0, f32::INFINITY).velocity, 0.0);
    }

    #[test]
    fn timestamped_moves_produce_velocity() {
        let mut tracker = tracker();
        tracker.start(290.0);
        for step in 0..6 {
            let delta = -40.0 * step as f32;
            tracker.drag_to_at(290.0 + delta, delta, step * 10);
        }
        let velocity = tracker.tracked_velocity();
        assert!((velocity + 4_000.0).abs() < 200.0, "got {velocity}");
    }
}
