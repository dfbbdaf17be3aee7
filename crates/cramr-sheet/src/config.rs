use cramr_animation::SpringSpec;
use cramr_foundation::{SheetBounds, SnapPosition, DEFAULT_OVERSCROLL, FLICK_VELOCITY_THRESHOLD};

use crate::error::SheetError;

/// Mount-time configuration of a sheet.
///
/// Offsets are screen-space pixels (larger is lower on screen) and are fixed
/// for the lifetime of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    pub top_offset: f32,
    pub middle_offset: f32,
    pub bottom_offset: f32,
    /// Extra travel allowed below `bottom_offset` during a drag.
    pub overscroll: f32,
    /// Release speed (px/s) above which a release counts as a flick.
    pub flick_velocity: f32,
    pub initial_position: SnapPosition,
    pub spring: SpringSpec,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new(-330.0, 50.0, 290.0)
    }
}

impl SheetConfig {
    pub fn new(top_offset: f32, middle_offset: f32, bottom_offset: f32) -> Self {
        Self {
            top_offset,
            middle_offset,
            bottom_offset,
            overscroll: DEFAULT_OVERSCROLL,
            flick_velocity: FLICK_VELOCITY_THRESHOLD,
            initial_position: SnapPosition::Middle,
            spring: SpringSpec::sheet(),
        }
    }

    pub fn with_overscroll(mut self, overscroll: f32) -> Self {
        self.overscroll = overscroll;
        self
    }

    pub fn with_flick_velocity(mut self, flick_velocity: f32) -> Self {
        self.flick_velocity = flick_velocity;
        self
    }

    pub fn with_initial_position(mut self, position: SnapPosition) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_spring(mut self, spring: SpringSpec) -> Self {
        self.spring = spring;
        self
    }

    pub fn bounds(&self) -> SheetBounds {
        SheetBounds {
            top_offset: self.top_offset,
            middle_offset: self.middle_offset,
            bottom_offset: self.bottom_offset,
        }
    }

    pub fn validate(&self) -> Result<(), SheetError> {
        self.bounds().validate()?;

        for (field, value) in [
            ("overscroll", self.overscroll),
            ("flick_velocity", self.flick_velocity),
        ] {
            if !value.is_finite() {
                return Err(SheetError::NonFinite { field, value });
            }
        }
        if self.overscroll < 0.0 {
            return Err(SheetError::NegativeOverscroll(self.overscroll));
        }
        if self.flick_velocity < 0.0 {
            return Err(SheetError::NegativeThreshold(self.flick_velocity));
        }

        let spring = self.spring;
        for (field, value) in [
            ("damping_ratio", spring.damping_ratio),
            ("stiffness", spring.stiffness),
            ("velocity_threshold", spring.velocity_threshold),
            ("position_threshold", spring.position_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SheetError::InvalidSpring { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cramr_foundation::AnchorError;

    #[test]
    fn default_config_is_valid() {
        let config = SheetConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.initial_position, SnapPosition::Middle);
        assert_eq!(config.overscroll, 400.0);
        assert_eq!(config.flick_velocity, 300.0);
    }

    #[test]
    fn unordered_offsets_are_rejected() {
        let err = SheetConfig::new(50.0, -330.0, 290.0).validate().unwrap_err();
        assert!(matches!(
            err,
            SheetError::Anchors(AnchorError::Unordered { index: 1, .. })
        ));
        assert!(SheetConfig::new(-330.0, 290.0, 290.0).validate().is_err());
    }

    #[test]
    fn non_finite_offsets_are_rejected() {
        let err = SheetConfig::new(f32::NEG_INFINITY, 50.0, 290.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            SheetError::Anchors(AnchorError::NonFinite { index: 0, .. })
        ));
    }

    #[test]
    fn negative_overscroll_and_threshold_are_rejected() {
        assert_eq!(
            SheetConfig::default().with_overscroll(-1.0).validate(),
            Err(SheetError::NegativeOverscroll(-1.0))
        );
        assert_eq!(
            SheetConfig::default().with_flick_velocity(-5.0).validate(),
            Err(SheetError::NegativeThreshold(-5.0))
        );
        assert!(matches!(
            SheetConfig::default().with_overscroll(f32::NAN).validate(),
            Err(SheetError::NonFinite {
                field: "overscroll",
                ..
            })
        ));
    }

    #[test]
    fn degenerate_spring_is_rejected() {
        let spring = SpringSpec {
            stiffness: 0.0,
            ..SpringSpec::sheet()
        };
        assert_eq!(
            SheetConfig::default().with_spring(spring).validate(),
            Err(SheetError::InvalidSpring {
                field: "stiffness",
                value: 0.0
            })
        );
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = SheetConfig::new(50.0, -330.0, 290.0).validate().unwrap_err();
        assert!(err.to_string().starts_with("invalid sheet offsets"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
