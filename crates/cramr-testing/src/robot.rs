//! Robot-style driver for sheet tests.
//!
//! The robot owns a [`DraggableSheet`] and a fake frame clock. Gestures are
//! scripted as lists of cumulative deltas and time only moves when the test
//! advances it, so every run produces the same frames.
//!
//! # Example
//!
//! ```
//! use cramr_sheet::{SheetConfig, SnapPosition};
//! use cramr_testing::SheetRobot;
//!
//! let mut robot = SheetRobot::new(SheetConfig::new(-330.0, 50.0, 290.0)).unwrap();
//! let target = robot.drag(&[-20.0, -60.0, -120.0], -450.0);
//! assert_eq!(target, SnapPosition::Top);
//! robot.wait_for_idle().expect("sheet settles");
//! assert_eq!(robot.offset(), -330.0);
//! ```

use cramr_sheet::{
    DraggableSheet, FrameOutcome, SheetConfig, SheetError, SheetEvent, SheetState, SnapPosition,
};

/// One frame at 60 FPS.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frames `wait_for_idle` pumps before giving up (10 seconds at 60 FPS).
pub const MAX_IDLE_FRAMES: usize = 600;

pub struct SheetRobot {
    sheet: DraggableSheet,
    frame_time_nanos: u64,
    offsets: Vec<f32>,
}

impl SheetRobot {
    pub fn new(config: SheetConfig) -> Result<Self, SheetError> {
        Ok(Self::from_sheet(DraggableSheet::new(config)?))
    }

    pub fn from_sheet(sheet: DraggableSheet) -> Self {
        Self {
            sheet,
            frame_time_nanos: 0,
            offsets: Vec::new(),
        }
    }

    pub fn sheet(&self) -> &DraggableSheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut DraggableSheet {
        &mut self.sheet
    }

    pub fn state(&self) -> SheetState {
        self.sheet.state()
    }

    pub fn offset(&self) -> f32 {
        self.sheet.offset()
    }

    /// Current fake clock reading.
    pub fn now_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    fn now_millis(&self) -> i64 {
        (self.frame_time_nanos / 1_000_000) as i64
    }

    /// Offsets observed after every frame and every move since the last
    /// [`clear_recording`](Self::clear_recording).
    pub fn recorded_offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn clear_recording(&mut self) {
        self.offsets.clear();
    }

    pub fn press(&mut self) {
        self.sheet.on_drag_start();
    }

    /// Moves to `delta_y` from the press point, one frame after the previous
    /// input.
    pub fn move_to(&mut self, delta_y: f32) {
        self.frame_time_nanos += FRAME_NANOS;
        let time_ms = self.now_millis();
        self.sheet.on_drag_move_at(delta_y, time_ms);
        self.offsets.push(self.sheet.offset());
    }

    pub fn release(&mut self, velocity_y: f32) -> SnapPosition {
        self.sheet.on_drag_end(velocity_y)
    }

    /// Releases with the velocity the sheet measured from the moves.
    pub fn release_tracked(&mut self) -> SnapPosition {
        self.sheet.on_drag_end_tracked()
    }

    /// Full gesture: press, move through `deltas`, release at `velocity_y`.
    pub fn drag(&mut self, deltas: &[f32], velocity_y: f32) -> SnapPosition {
        self.press();
        for &delta in deltas {
            self.move_to(delta);
        }
        self.release(velocity_y)
    }

    /// Full gesture released with the tracked velocity.
    pub fn fling(&mut self, deltas: &[f32]) -> SnapPosition {
        self.press();
        for &delta in deltas {
            self.move_to(delta);
        }
        self.release_tracked()
    }

    pub fn send(&mut self, event: SheetEvent) -> SheetState {
        self.sheet.handle_event(event)
    }

    pub fn advance_frame(&mut self) -> FrameOutcome {
        self.frame_time_nanos += FRAME_NANOS;
        let outcome = self.sheet.on_frame(self.frame_time_nanos);
        self.offsets.push(outcome.offset);
        outcome
    }

    pub fn advance_frames(&mut self, count: usize) -> FrameOutcome {
        let mut outcome = self.advance_frame();
        for _ in 1..count {
            outcome = self.advance_frame();
        }
        outcome
    }

    /// Pumps frames for at least `millis` of fake time.
    pub fn advance_time_millis(&mut self, millis: u64) -> FrameOutcome {
        let frames = (millis * 1_000_000).div_ceil(FRAME_NANOS).max(1);
        self.advance_frames(frames as usize)
    }

    /// Pumps frames until the sheet stops asking for them. Returns the number
    /// of frames pumped, or `None` if it was still animating after
    /// [`MAX_IDLE_FRAMES`].
    pub fn wait_for_idle(&mut self) -> Option<usize> {
        for frame in 0..MAX_IDLE_FRAMES {
            if !self.advance_frame().needs_frame {
                return Some(frame + 1);
            }
        }
        log::warn!(
            "sheet still animating after {MAX_IDLE_FRAMES} frames at {:.2}",
            self.sheet.offset()
        );
        None
    }
}
