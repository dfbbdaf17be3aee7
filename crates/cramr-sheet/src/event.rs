use cramr_foundation::SnapPosition;

/// One input to a sheet, for hosts that funnel every mutation through a
/// single loop (for example by draining a channel on the UI thread).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetEvent {
    DragStart,
    /// Cumulative delta since drag start; `time_ms` feeds velocity tracking.
    DragMove { delta_y: f32, time_ms: Option<i64> },
    /// `None` uses the velocity estimated from timestamped moves.
    DragEnd { velocity_y: Option<f32> },
    Frame { time_nanos: u64 },
    SnapTo(SnapPosition),
    AnimateTo(SnapPosition),
}
