//! Gesture and snap primitives shared by the Cramr sheet.

pub mod drag;
pub mod gesture_constants;
pub mod snap;
pub mod velocity_tracker;

pub use drag::{DragRange, DragRelease, GestureSession, GestureTracker};
pub use gesture_constants::*;
pub use snap::{classify, classify_with_threshold, AnchorError, SheetBounds, SnapAnchors, SnapPosition};
pub use velocity_tracker::VelocityTracker1D;
