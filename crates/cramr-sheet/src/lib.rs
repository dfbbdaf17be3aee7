//! Draggable bottom sheet for the Cramr map screen.
//!
//! A [`DraggableSheet`] rests at one of three offsets (top, middle, bottom),
//! follows the finger while dragged, and on release springs to the anchor
//! chosen by the snap classifier. The host feeds it gesture callbacks (or
//! [`SheetEvent`]s) and frame ticks, and renders by reading the offset through
//! an [`OffsetReader`].
//!
//! ```
//! use cramr_sheet::{DraggableSheet, SheetConfig, SnapPosition};
//!
//! let mut sheet = DraggableSheet::new(SheetConfig::new(-330.0, 50.0, 290.0))?;
//! sheet.on_drag_start();
//! sheet.on_drag_move(240.0);
//! assert_eq!(sheet.on_drag_end(0.0), SnapPosition::Bottom);
//! while sheet.tick(1.0 / 60.0).needs_frame {}
//! assert_eq!(sheet.offset(), 290.0);
//! # Ok::<(), cramr_sheet::SheetError>(())
//! ```

mod config;
mod error;
mod event;
mod offset;
mod sheet;

pub use config::SheetConfig;
pub use error::SheetError;
pub use event::SheetEvent;
pub use offset::{shared_offset, OffsetReader, OffsetWriter};
pub use sheet::{DraggableSheet, FrameOutcome, SheetPhase, SheetState};

pub use cramr_animation::SpringSpec;
pub use cramr_foundation::{AnchorError, SheetBounds, SnapPosition};
