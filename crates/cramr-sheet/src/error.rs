use std::fmt;

use cramr_foundation::AnchorError;

/// Configuration rejected by [`DraggableSheet::new`](crate::DraggableSheet::new).
#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    /// The three offsets are not finite and strictly ascending.
    Anchors(AnchorError),
    NonFinite { field: &'static str, value: f32 },
    NegativeOverscroll(f32),
    NegativeThreshold(f32),
    InvalidSpring { field: &'static str, value: f32 },
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::Anchors(err) => write!(f, "invalid sheet offsets: {err}"),
            SheetError::NonFinite { field, value } => {
                write!(f, "sheet config field `{field}` is not finite: {value}")
            }
            SheetError::NegativeOverscroll(value) => {
                write!(f, "overscroll must not be negative, got {value}")
            }
            SheetError::NegativeThreshold(value) => {
                write!(f, "flick velocity threshold must not be negative, got {value}")
            }
            SheetError::InvalidSpring { field, value } => {
                write!(f, "spring `{field}` must be positive and finite, got {value}")
            }
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetError::Anchors(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnchorError> for SheetError {
    fn from(err: AnchorError) -> Self {
        SheetError::Anchors(err)
    }
}
