//! Gesture scripts and their replay.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cramr_sheet::{DraggableSheet, SheetConfig, SheetEvent, SheetPhase, SnapPosition};
use serde::Deserialize;
use web_time::Instant;

/// Frames pumped per step before the replay gives up on a settle.
const MAX_SETTLE_FRAMES: u32 = 1_200;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
    /// Press, move through the cumulative `deltas` one frame apart, release.
    /// Without `velocity` the release uses the measured velocity.
    Drag {
        deltas: Vec<f32>,
        #[serde(default)]
        velocity: Option<f32>,
    },
    Wait {
        millis: u64,
    },
    Snap {
        position: SnapPosition,
    },
    Animate {
        position: SnapPosition,
    },
}

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid gesture script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Used when no script is given.
    pub fn builtin() -> Self {
        Self {
            sheet: SheetConfig::default(),
            steps: vec![
                Step::Drag {
                    deltas: vec![20.0, 45.0, 70.0],
                    velocity: Some(0.0),
                },
                Step::Drag {
                    deltas: vec![15.0, 40.0],
                    velocity: Some(450.0),
                },
                Step::Drag {
                    deltas: vec![-10.0, -30.0],
                    velocity: Some(-450.0),
                },
                Step::Drag {
                    deltas: vec![-100.0, -190.0],
                    velocity: Some(0.0),
                },
                Step::Wait { millis: 200 },
                Step::Snap {
                    position: SnapPosition::Bottom,
                },
                Step::Animate {
                    position: SnapPosition::Middle,
                },
            ],
        }
    }
}

/// Where the frame timestamps come from.
pub enum Clock {
    /// Fake time advanced by exactly one frame per tick.
    Simulated { now_nanos: u64 },
    /// Wall-clock time; each tick sleeps for one frame.
    Wall { start: Instant },
}

impl Clock {
    fn tick(&mut self, frame: Duration) -> u64 {
        match self {
            Clock::Simulated { now_nanos } => {
                *now_nanos += frame.as_nanos() as u64;
                *now_nanos
            }
            Clock::Wall { start } => {
                std::thread::sleep(frame);
                start.elapsed().as_nanos() as u64
            }
        }
    }
}

/// What one step did to the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub target: SnapPosition,
    pub frames: u32,
    pub offset: f32,
}

pub struct Player {
    sheet: DraggableSheet,
    clock: Clock,
    frame: Duration,
}

impl Player {
    pub fn new(config: SheetConfig, clock: Clock, frames_per_second: u32) -> Result<Self> {
        let sheet = DraggableSheet::new(config).context("invalid sheet configuration")?;
        let frame = Duration::from_secs_f64(1.0 / f64::from(frames_per_second.max(1)));
        Ok(Self {
            sheet,
            clock,
            frame,
        })
    }

    #[cfg(test)]
    pub fn sheet(&self) -> &DraggableSheet {
        &self.sheet
    }

    pub fn run(&mut self, steps: &[Step]) -> Vec<StepReport> {
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.play(index, step))
            .collect()
    }

    fn play(&mut self, index: usize, step: &Step) -> StepReport {
        let mut frames = 0;
        match step {
            Step::Drag { deltas, velocity } => {
                self.sheet.handle_event(SheetEvent::DragStart);
                for &delta_y in deltas {
                    let now = self.clock.tick(self.frame);
                    frames += 1;
                    self.sheet.handle_event(SheetEvent::DragMove {
                        delta_y,
                        time_ms: Some((now / 1_000_000) as i64),
                    });
                    log::debug!("move {delta_y:+.1} -> offset {:.1}", self.sheet.offset());
                }
                self.sheet.handle_event(SheetEvent::DragEnd {
                    velocity_y: *velocity,
                });
                frames += self.pump_until_idle();
            }
            Step::Wait { millis } => {
                let wanted = Duration::from_millis(*millis);
                let mut waited = Duration::ZERO;
                while waited < wanted {
                    let now = self.clock.tick(self.frame);
                    self.sheet.handle_event(SheetEvent::Frame { time_nanos: now });
                    waited += self.frame;
                    frames += 1;
                }
            }
            Step::Snap { position } => {
                self.sheet.handle_event(SheetEvent::SnapTo(*position));
            }
            Step::Animate { position } => {
                self.sheet.handle_event(SheetEvent::AnimateTo(*position));
                frames += self.pump_until_idle();
            }
        }

        let state = self.sheet.state();
        log::info!(
            "step {}: {:?} -> {} after {frames} frames (offset {:.1})",
            index + 1,
            step,
            state.position,
            state.offset
        );
        StepReport {
            index,
            step: step.clone(),
            target: state.position,
            frames,
            offset: state.offset,
        }
    }

    fn pump_until_idle(&mut self) -> u32 {
        let mut frames = 0;
        while self.sheet.phase() == SheetPhase::Settling && frames < MAX_SETTLE_FRAMES {
            let now = self.clock.tick(self.frame);
            let state = self.sheet.handle_event(SheetEvent::Frame { time_nanos: now });
            log::trace!("frame {frames}: offset {:.2}", state.offset);
            frames += 1;
        }
        if self.sheet.phase() == SheetPhase::Settling {
            log::warn!("sheet still settling after {MAX_SETTLE_FRAMES} frames");
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated() -> Clock {
        Clock::Simulated { now_nanos: 0 }
    }

    #[test]
    fn parses_steps_and_partial_sheet_config() {
        let script = Script::parse(
            r#"
            [sheet]
            top_offset = -400.0
            middle_offset = 0.0
            bottom_offset = 300.0
            initial_position = "bottom"

            [[step]]
            kind = "drag"
            deltas = [-10.0, -40.0]
            velocity = -900.0

            [[step]]
            kind = "drag"
            deltas = [5.0]

            [[step]]
            kind = "wait"
            millis = 100

            [[step]]
            kind = "snap"
            position = "top"
            "#,
        )
        .expect("script parses");

        assert_eq!(script.sheet.top_offset, -400.0);
        assert_eq!(script.sheet.initial_position, SnapPosition::Bottom);
        assert_eq!(script.sheet.overscroll, 400.0, "unset fields keep defaults");
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0],
            Step::Drag {
                deltas: vec![-10.0, -40.0],
                velocity: Some(-900.0)
            }
        );
        assert_eq!(
            script.steps[1],
            Step::Drag {
                deltas: vec![5.0],
                velocity: None
            }
        );
        assert_eq!(
            script.steps[3],
            Step::Snap {
                position: SnapPosition::Top
            }
        );
    }

    #[test]
    fn unknown_step_kind_is_an_error() {
        let err = Script::parse(
            r#"
            [[step]]
            kind = "teleport"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid gesture script"));
    }

    #[test]
    fn builtin_script_walks_through_every_anchor() {
        let script = Script::builtin();
        let mut player = Player::new(script.sheet, simulated(), 60).expect("valid config");
        let targets: Vec<_> = player
            .run(&script.steps)
            .into_iter()
            .map(|report| report.target)
            .collect();

        assert_eq!(
            targets,
            vec![
                SnapPosition::Middle,
                SnapPosition::Bottom,
                SnapPosition::Middle,
                SnapPosition::Top,
                SnapPosition::Top,
                SnapPosition::Bottom,
                SnapPosition::Middle,
            ]
        );
        assert_eq!(player.sheet().offset(), 50.0);
        assert_eq!(player.sheet().phase(), SheetPhase::Idle);
    }

    #[test]
    fn invalid_sheet_in_script_is_rejected() {
        let config = SheetConfig::new(10.0, 0.0, 300.0);
        assert!(Player::new(config, simulated(), 60).is_err());
    }
}
