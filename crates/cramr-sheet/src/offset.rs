//! The live sheet offset, shared between its single writer and any number of
//! readers.
//!
//! The `f32` is stored as its bit pattern in one atomic word, so a reader on a
//! render thread always observes a whole value.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates the writer/reader pair for an offset starting at `initial`.
pub fn shared_offset(initial: f32) -> (OffsetWriter, OffsetReader) {
    let cell = Arc::new(AtomicU32::new(initial.to_bits()));
    (
        OffsetWriter {
            cell: Arc::clone(&cell),
        },
        OffsetReader { cell },
    )
}

/// Write side of the offset. Deliberately not `Clone`.
#[derive(Debug)]
pub struct OffsetWriter {
    cell: Arc<AtomicU32>,
}

impl OffsetWriter {
    pub fn set(&self, value: f32) {
        self.cell.store(value.to_bits(), Ordering::Release);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.cell.load(Ordering::Acquire))
    }

    pub fn reader(&self) -> OffsetReader {
        OffsetReader {
            cell: Arc::clone(&self.cell),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OffsetReader {
    cell: Arc<AtomicU32>,
}

impl OffsetReader {
    pub fn get(&self) -> f32 {
        f32::from_bits(self.cell.load(Ordering::Acquire))
    }
}
