//! Assertions over robot runs.

use cramr_sheet::{SheetPhase, SnapPosition};

use crate::robot::SheetRobot;

/// Panics unless the sheet is idle exactly on `position`'s offset.
pub fn assert_resting_at(robot: &SheetRobot, position: SnapPosition) {
    let state = robot.state();
    let expected = robot.sheet().bounds().offset_of(position);
    assert_eq!(
        state.phase,
        SheetPhase::Idle,
        "sheet should be idle, state {state:?}"
    );
    assert_eq!(state.position, position, "sheet rests at the wrong anchor");
    assert_eq!(
        state.offset, expected,
        "sheet should sit exactly on the {position} offset"
    );
}

/// Panics if any recorded offset left the draggable range.
pub fn assert_recording_within_drag_range(robot: &SheetRobot) {
    let config = robot.sheet().config();
    let min = config.top_offset;
    let max = config.bottom_offset + config.overscroll;
    for (index, offset) in robot.recorded_offsets().iter().enumerate() {
        assert!(
            (min..=max).contains(offset),
            "recorded offset #{index} = {offset} outside [{min}, {max}]"
        );
    }
}

/// Panics if two consecutive recorded offsets differ by more than
/// `max_step` pixels.
pub fn assert_no_jumps(robot: &SheetRobot, max_step: f32) {
    for (index, pair) in robot.recorded_offsets().windows(2).enumerate() {
        let step = (pair[1] - pair[0]).abs();
        assert!(
            step <= max_step,
            "offset jumped {step}px between samples {index} and {}",
            index + 1
        );
    }
}
