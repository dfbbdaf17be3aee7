//! Shared gesture constants for the sheet.
//!
//! These values are in logical pixels and are defaults only; every one of
//! them can be overridden through the sheet configuration.

/// Minimum release speed, in pixels per second, for a drag to count as a
/// flick and move the sheet one anchor regardless of where it was released.
pub const FLICK_VELOCITY_THRESHOLD: f32 = 300.0;

/// Extra travel allowed past the bottom anchor while a finger is down.
pub const DEFAULT_OVERSCROLL: f32 = 400.0;

/// Distance from the top anchor within which the sheet counts as pinned to
/// the top for upward-drag suppression.
pub const TOP_EPSILON: f32 = 0.5;

/// Maximum fling velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on a
/// baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
