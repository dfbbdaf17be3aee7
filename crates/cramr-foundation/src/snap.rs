//! Snap classification: which anchor a released sheet should settle at.
//!
//! The classifier is a pure function of the release offset, the release
//! velocity and the anchor offsets. A slow release rounds to the nearest
//! anchor; a flick faster than the threshold moves exactly one anchor in the
//! flick direction from the zone the release happened in. A single release
//! never moves more than one anchor away from that zone.
//!
//! Offsets are screen-space pixels, so the first anchor is the topmost one and
//! a negative velocity is an upward flick.

use std::fmt;

use smallvec::SmallVec;

use crate::gesture_constants::FLICK_VELOCITY_THRESHOLD;

/// The three rest positions of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SnapPosition {
    Top,
    Middle,
    Bottom,
}

impl SnapPosition {
    pub const ALL: [SnapPosition; 3] = [SnapPosition::Top, SnapPosition::Middle, SnapPosition::Bottom];

    /// Index into [`SnapPosition::ALL`]; `Top` is 0.
    pub fn index(self) -> usize {
        match self {
            SnapPosition::Top => 0,
            SnapPosition::Middle => 1,
            SnapPosition::Bottom => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// One step towards `Top`, saturating.
    pub fn step_up(self) -> Self {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(SnapPosition::Top)
    }

    /// One step towards `Bottom`, saturating.
    pub fn step_down(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(SnapPosition::Bottom)
    }
}

impl fmt::Display for SnapPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnapPosition::Top => "top",
            SnapPosition::Middle => "middle",
            SnapPosition::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Rejected anchor configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorError {
    TooFewAnchors { count: usize },
    NonFinite { index: usize, value: f32 },
    Unordered { index: usize, previous: f32, next: f32 },
}

impl fmt::Display for AnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorError::TooFewAnchors { count } => {
                write!(f, "at least two snap anchors are required, got {count}")
            }
            AnchorError::NonFinite { index, value } => {
                write!(f, "snap anchor {index} is not finite: {value}")
            }
            AnchorError::Unordered {
                index,
                previous,
                next,
            } => write!(
                f,
                "snap anchors must be strictly ascending: anchor {index} ({next}) does not follow {previous}"
            ),
        }
    }
}

impl std::error::Error for AnchorError {}

/// A validated, strictly ascending list of rest offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapAnchors {
    offsets: SmallVec<[f32; 4]>,
}

impl SnapAnchors {
    pub fn new(offsets: impl IntoIterator<Item = f32>) -> Result<Self, AnchorError> {
        let offsets: SmallVec<[f32; 4]> = offsets.into_iter().collect();
        if offsets.len() < 2 {
            return Err(AnchorError::TooFewAnchors {
                count: offsets.len(),
            });
        }
        for (index, value) in offsets.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(AnchorError::NonFinite { index, value });
            }
        }
        for (index, pair) in offsets.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(AnchorError::Unordered {
                    index: index + 1,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { offsets })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; construction requires two anchors.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.offsets.get(index).copied()
    }

    /// Midpoints between neighbouring anchors.
    pub fn zone_boundaries(&self) -> impl Iterator<Item = f32> + '_ {
        self.offsets.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0)
    }

    /// Index of the anchor nearest to `offset`.
    ///
    /// An offset exactly on a boundary belongs to the upper zone.
    pub fn nearest(&self, offset: f32) -> usize {
        self.zone_boundaries()
            .filter(|&boundary| offset > boundary)
            .count()
    }

    /// Index of the anchor a release at `offset` with `velocity` settles at.
    pub fn classify(&self, offset: f32, velocity: f32, threshold: f32) -> usize {
        let zone = self.nearest(offset);
        if velocity < -threshold {
            zone.saturating_sub(1)
        } else if velocity > threshold {
            (zone + 1).min(self.len() - 1)
        } else {
            zone
        }
    }
}

/// Offsets of the three rest positions, `top < middle < bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetBounds {
    pub top_offset: f32,
    pub middle_offset: f32,
    pub bottom_offset: f32,
}

impl SheetBounds {
    pub fn new(top_offset: f32, middle_offset: f32, bottom_offset: f32) -> Result<Self, AnchorError> {
        let bounds = Self {
            top_offset,
            middle_offset,
            bottom_offset,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), AnchorError> {
        self.anchors().map(|_| ())
    }

    pub fn anchors(&self) -> Result<SnapAnchors, AnchorError> {
        SnapAnchors::new([self.top_offset, self.middle_offset, self.bottom_offset])
    }

    pub fn offset_of(&self, position: SnapPosition) -> f32 {
        match position {
            SnapPosition::Top => self.top_offset,
            SnapPosition::Middle => self.middle_offset,
            SnapPosition::Bottom => self.bottom_offset,
        }
    }

    /// Top/Middle and Middle/Bottom midpoints.
    pub fn zone_boundaries(&self) -> [f32; 2] {
        [
            (self.top_offset + self.middle_offset) / 2.0,
            (self.middle_offset + self.bottom_offset) / 2.0,
        ]
    }

    /// Nearest rest position to `offset`; boundary ties go to the upper zone.
    pub fn current_zone(&self, offset: f32) -> SnapPosition {
        let [upper, lower] = self.zone_boundaries();
        if offset <= upper {
            SnapPosition::Top
        } else if offset <= lower {
            SnapPosition::Middle
        } else {
            SnapPosition::Bottom
        }
    }
}

/// Classifies a release using the default flick threshold.
pub fn classify(offset: f32, velocity: f32, bounds: &SheetBounds) -> SnapPosition {
    classify_with_threshold(offset, velocity, bounds, FLICK_VELOCITY_THRESHOLD)
}

pub fn classify_with_threshold(
    offset: f32,
    velocity: f32,
    bounds: &SheetBounds,
    threshold: f32,
) -> SnapPosition {
    let zone = bounds.current_zone(offset);
    if velocity < -threshold {
        zone.step_up()
    } else if velocity > threshold {
        zone.step_down()
    } else {
        zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SheetBounds {
        SheetBounds::new(-330.0, 50.0, 290.0).expect("valid bounds")
    }

    #[test]
    fn slow_release_rounds_to_nearest() {
        assert_eq!(classify(120.0, 0.0, &bounds()), SnapPosition::Middle);
        assert_eq!(classify(200.0, 0.0, &bounds()), SnapPosition::Bottom);
        assert_eq!(classify(-200.0, 0.0, &bounds()), SnapPosition::Top);
    }

    #[test]
    fn upward_flick_from_bottom_moves_one_step() {
        assert_eq!(classify(290.0, -450.0, &bounds()), SnapPosition::Middle);
    }

    #[test]
    fn downward_flick_from_top_moves_one_step() {
        assert_eq!(classify(-330.0, 450.0, &bounds()), SnapPosition::Middle);
    }

    #[test]
    fn boundary_tie_goes_to_upper_zone() {
        assert_eq!(classify(-140.0, 0.0, &bounds()), SnapPosition::Top);
        assert_eq!(classify(170.0, 0.0, &bounds()), SnapPosition::Middle);
    }

    #[test]
    fn flicks_saturate_at_the_ends() {
        assert_eq!(classify(-330.0, -5_000.0, &bounds()), SnapPosition::Top);
        assert_eq!(classify(600.0, 5_000.0, &bounds()), SnapPosition::Bottom);
    }

    #[test]
    fn threshold_itself_is_a_slow_release() {
        assert_eq!(classify(50.0, 300.0, &bounds()), SnapPosition::Middle);
        assert_eq!(classify(50.0, -300.0, &bounds()), SnapPosition::Middle);
        assert_eq!(classify(50.0, 300.5, &bounds()), SnapPosition::Bottom);
    }

    #[test]
    fn nan_velocity_is_a_slow_release() {
        assert_eq!(classify(120.0, f32::NAN, &bounds()), SnapPosition::Middle);
    }

    #[test]
    fn never_skips_more_than_one_zone() {
        let bounds = bounds();
        let mut offset = -400.0f32;
        while offset <= 700.0 {
            let zone = bounds.current_zone(offset).index() as i32;
            for velocity in [-10_000.0, -301.0, -300.0, -1.0, 0.0, 1.0, 300.0, 301.0, 10_000.0] {
                let target = classify(offset, velocity, &bounds).index() as i32;
                assert!(
                    (target - zone).abs() <= 1,
                    "offset {offset} velocity {velocity}: zone {zone} -> {target}"
                );
            }
            offset += 7.5;
        }
    }

    #[test]
    fn anchors_agree_with_three_stop_classifier() {
        let bounds = bounds();
        let anchors = bounds.anchors().expect("valid anchors");
        for offset in [-500.0, -330.0, -140.0, -139.9, 50.0, 170.0, 170.1, 290.0, 690.0] {
            for velocity in [-450.0, 0.0, 450.0] {
                assert_eq!(
                    anchors.classify(offset, velocity, FLICK_VELOCITY_THRESHOLD),
                    classify(offset, velocity, &bounds).index(),
                    "offset {offset} velocity {velocity}"
                );
            }
        }
    }

    #[test]
    fn anchors_generalise_to_more_stops() {
        let anchors = SnapAnchors::new([-400.0, -100.0, 0.0, 200.0, 500.0]).expect("valid anchors");
        assert_eq!(anchors.nearest(-240.0), 1);
        assert_eq!(anchors.nearest(-250.0), 0);
        assert_eq!(anchors.classify(210.0, -1_000.0, 300.0), 2);
        assert_eq!(anchors.classify(210.0, 1_000.0, 300.0), 4);
        assert_eq!(anchors.classify(900.0, 1_000.0, 300.0), 4);
    }

    #[test]
    fn unordered_bounds_are_rejected() {
        let err = SheetBounds::new(50.0, -330.0, 290.0).unwrap_err();
        assert_eq!(
            err,
            AnchorError::Unordered {
                index: 1,
                previous: 50.0,
                next: -330.0
            }
        );
        assert!(SheetBounds::new(0.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn non_finite_and_short_anchor_lists_are_rejected() {
        assert!(matches!(
            SnapAnchors::new([0.0, f32::NAN]),
            Err(AnchorError::NonFinite { index: 1, .. })
        ));
        assert_eq!(
            SnapAnchors::new([1.0]).unwrap_err(),
            AnchorError::TooFewAnchors { count: 1 }
        );
    }

    #[test]
    fn snap_position_steps() {
        assert_eq!(SnapPosition::Bottom.step_up(), SnapPosition::Middle);
        assert_eq!(SnapPosition::Top.step_up(), SnapPosition::Top);
        assert_eq!(SnapPosition::Top.step_down(), SnapPosition::Middle);
        assert_eq!(SnapPosition::Bottom.step_down(), SnapPosition::Bottom);
        assert_eq!(SnapPosition::from_index(3), None);
    }
}
