//! The sheet state machine.
//!
//! Phases are `Idle`, `Dragging` and `Settling`. Exactly one of the gesture
//! tracker (while dragging) and the spring (while settling) writes the
//! offset; `on_drag_start` and spring completion are the only hand-over
//! points. A drag start during a settle stops the spring and the new drag
//! begins from wherever the spring left the offset.

use cramr_animation::SpringAnimation;
use cramr_foundation::{
    classify_with_threshold, DragRange, GestureSession, GestureTracker, SheetBounds, SnapPosition,
};

use crate::config::SheetConfig;
use crate::error::SheetError;
use crate::event::SheetEvent;
use crate::offset::{shared_offset, OffsetReader, OffsetWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPhase {
    Idle,
    Dragging,
    Settling,
}

/// Snapshot of the sheet: the anchor it rests at or is heading to, what it
/// is doing, and where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetState {
    pub position: SnapPosition,
    pub phase: SheetPhase,
    pub offset: f32,
}

/// Result of advancing the spring by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub offset: f32,
    /// Set on the frame the spring came to rest.
    pub settled: Option<SnapPosition>,
    /// Whether the host should schedule another frame.
    pub needs_frame: bool,
}

pub struct DraggableSheet {
    config: SheetConfig,
    bounds: SheetBounds,
    offset: OffsetWriter,
    tracker: GestureTracker,
    spring: Option<SpringAnimation>,
    position: SnapPosition,
    last_frame_nanos: Option<u64>,
}

impl DraggableSheet {
    /// Builds a sheet resting at `config.initial_position`.
    pub fn new(config: SheetConfig) -> Result<Self, SheetError> {
        config.validate()?;
        let bounds = config.bounds();
        let position = config.initial_position;
        let (offset, _) = shared_offset(bounds.offset_of(position));
        let tracker = GestureTracker::new(DragRange::new(
            bounds.top_offset,
            bounds.bottom_offset,
            config.overscroll,
        ));

        log::debug!(
            "sheet created: top {} middle {} bottom {} resting at {position}",
            bounds.top_offset,
            bounds.middle_offset,
            bounds.bottom_offset
        );

        Ok(Self {
            config,
            bounds,
            offset,
            tracker,
            spring: None,
            position,
            last_frame_nanos: None,
        })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn bounds(&self) -> SheetBounds {
        self.bounds
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    /// A handle the renderer can poll from any thread.
    pub fn reader(&self) -> OffsetReader {
        self.offset.reader()
    }

    /// Anchor the sheet rests at, or is settling towards.
    pub fn position(&self) -> SnapPosition {
        self.position
    }

    pub fn phase(&self) -> SheetPhase {
        if self.tracker.is_dragging() {
            SheetPhase::Dragging
        } else if self.spring.is_some() {
            SheetPhase::Settling
        } else {
            SheetPhase::Idle
        }
    }

    pub fn state(&self) -> SheetState {
        SheetState {
            position: self.position,
            phase: self.phase(),
            offset: self.offset(),
        }
    }

    pub fn gesture_session(&self) -> Option<&GestureSession> {
        self.tracker.session()
    }

    /// Takes over the offset for a new drag, interrupting any settle.
    pub fn on_drag_start(&mut self) {
        if self.tracker.is_dragging() {
            log::debug!("drag start ignored: already dragging");
            return;
        }
        if let Some(spring) = self.spring.take() {
            log::debug!(
                "drag interrupts settle towards {} at offset {:.1}",
                self.position,
                spring.value()
            );
        }
        self.last_frame_nanos = None;
        self.tracker.start(self.offset.get());
    }

    /// `delta_y` is the total vertical movement since the drag started.
    pub fn on_drag_move(&mut self, delta_y: f32) {
        if let Some(next) = self.tracker.drag_to(self.offset.get(), delta_y) {
            self.offset.set(next);
        }
    }

    /// Like [`on_drag_move`](Self::on_drag_move), recording the sample for
    /// [`on_drag_end_tracked`](Self::on_drag_end_tracked).
    pub fn on_drag_move_at(&mut self, delta_y: f32, time_ms: i64) {
        if let Some(next) = self.tracker.drag_to_at(self.offset.get(), delta_y, time_ms) {
            self.offset.set(next);
        }
    }

    /// Ends the drag and starts settling. Returns the chosen anchor.
    ///
    /// Without an open drag the current offset is classified as a motionless
    /// release; if a settle is already running it is left alone.
    pub fn on_drag_end(&mut self, velocity_y: f32) -> SnapPosition {
        if !self.tracker.is_dragging() && self.spring.is_some() {
            log::debug!("drag end ignored: no drag in progress");
            return self.position;
        }

        let release = self.tracker.end(self.offset.get(), velocity_y);
        if !release.had_session {
            log::debug!("drag end without drag start at offset {:.1}", release.offset);
        }
        let target = classify_with_threshold(
            release.offset,
            release.velocity,
            &self.bounds,
            self.config.flick_velocity,
        );
        log::debug!(
            "released at {:.1} with velocity {:.1}: {} -> {target}",
            release.offset,
            release.velocity,
            self.bounds.current_zone(release.offset)
        );
        self.settle_to(target, release.velocity);
        target
    }

    /// Ends the drag using the velocity estimated from
    /// [`on_drag_move_at`](Self::on_drag_move_at) samples.
    pub fn on_drag_end_tracked(&mut self) -> SnapPosition {
        let velocity = self.tracker.tracked_velocity();
        self.on_drag_end(velocity)
    }

    /// Jumps to `position` with no animation, cancelling any drag or settle.
    pub fn snap_to(&mut self, position: SnapPosition) {
        self.tracker.cancel();
        self.spring = None;
        self.last_frame_nanos = None;
        self.position = position;
        self.offset.set(self.bounds.offset_of(position));
        log::debug!("snapped to {position}");
    }

    /// Springs to `position`, keeping the velocity of a running settle.
    /// Returns false (and does nothing) while a drag owns the offset.
    pub fn animate_to(&mut self, position: SnapPosition) -> bool {
        if self.tracker.is_dragging() {
            log::warn!("animate_to({position}) ignored while dragging");
            return false;
        }
        let velocity = self.spring.as_ref().map_or(0.0, SpringAnimation::velocity);
        self.settle_to(position, velocity);
        true
    }

    /// Advances the settle animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> FrameOutcome {
        let Some(spring) = self.spring.as_mut() else {
            return self.idle_outcome();
        };

        let frame = spring.tick(dt);
        self.offset.set(frame.value);
        if !frame.is_settled {
            return FrameOutcome {
                offset: frame.value,
                settled: None,
                needs_frame: true,
            };
        }

        self.spring = None;
        self.last_frame_nanos = None;
        let rest = self.bounds.offset_of(self.position);
        self.offset.set(rest);
        log::debug!("settled at {} ({rest})", self.position);
        FrameOutcome {
            offset: rest,
            settled: Some(self.position),
            needs_frame: false,
        }
    }

    /// Advances the settle animation to `frame_time_nanos` on the host's
    /// monotonic frame clock. The first frame of a settle only records the
    /// time.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> FrameOutcome {
        if self.spring.is_none() {
            return self.idle_outcome();
        }
        let dt = match self.last_frame_nanos {
            Some(previous) => frame_time_nanos.saturating_sub(previous) as f32 / 1_000_000_000.0,
            None => 0.0,
        };
        self.last_frame_nanos = Some(frame_time_nanos);
        let outcome = self.tick(dt);
        log::trace!("frame at {frame_time_nanos}ns: offset {:.2}", outcome.offset);
        outcome
    }

    /// Applies one event and reports the resulting state.
    pub fn handle_event(&mut self, event: SheetEvent) -> SheetState {
        match event {
            SheetEvent::DragStart => self.on_drag_start(),
            SheetEvent::DragMove {
                delta_y,
                time_ms: Some(time_ms),
            } => self.on_drag_move_at(delta_y, time_ms),
            SheetEvent::DragMove {
                delta_y,
                time_ms: None,
            } => self.on_drag_move(delta_y),
            SheetEvent::DragEnd {
                velocity_y: Some(velocity_y),
            } => {
                self.on_drag_end(velocity_y);
            }
            SheetEvent::DragEnd { velocity_y: None } => {
                self.on_drag_end_tracked();
            }
            SheetEvent::Frame { time_nanos } => {
                self.on_frame(time_nanos);
            }
            SheetEvent::SnapTo(position) => self.snap_to(position),
            SheetEvent::AnimateTo(position) => {
                self.animate_to(position);
            }
        }
        self.state()
    }

    fn settle_to(&mut self, target: SnapPosition, velocity: f32) {
        self.position = target;
        self.last_frame_nanos = None;
        let rest = self.bounds.offset_of(target);
        let spring = SpringAnimation::new(self.offset.get(), rest, velocity, self.config.spring);
        if spring.is_settled() {
            self.offset.set(rest);
            self.spring = None;
        } else {
            self.spring = Some(spring);
        }
    }

    fn idle_outcome(&self) -> FrameOutcome {
        FrameOutcome {
            offset: self.offset.get(),
            settled: None,
            needs_frame: false,
        }
    }
}
