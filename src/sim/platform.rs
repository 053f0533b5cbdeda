//! Platforms (roster cells the player bounces on)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounded};
use super::state::EntityId;
use crate::consts::*;

/// Night platform decay. Transitions only run forward:
/// `Intact -> Breaking -> Broken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightDecay {
    Intact,
    /// Frames elapsed since the platform was landed on
    Breaking { frames: u32 },
    Broken,
}

impl NightDecay {
    /// Landing starts the countdown; no-op once started
    pub fn start_breaking(self) -> Self {
        match self {
            NightDecay::Intact => NightDecay::Breaking { frames: 0 },
            other => other,
        }
    }

    /// Advance one frame
    pub fn advance(self) -> Self {
        match self {
            NightDecay::Breaking { frames } if frames + 1 >= NIGHT_BREAK_FRAMES => {
                NightDecay::Broken
            }
            NightDecay::Breaking { frames } => NightDecay::Breaking { frames: frames + 1 },
            other => other,
        }
    }

    /// 0.0 when intact, rising to 1.0 when broken
    pub fn progress(&self) -> f32 {
        match self {
            NightDecay::Intact => 0.0,
            NightDecay::Breaking { frames } => *frames as f32 / NIGHT_BREAK_FRAMES as f32,
            NightDecay::Broken => 1.0,
        }
    }
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Safe, static
    Normal,
    /// Breaks shortly after being landed on
    Night { decay: NightDecay },
    /// Slides horizontally between the grid gutter and the right edge
    Moving {
        direction: f32,
        speed: f32,
        origin_x: f32,
    },
}

impl PlatformKind {
    pub fn night() -> Self {
        PlatformKind::Night {
            decay: NightDecay::Intact,
        }
    }

    pub fn moving(origin_x: f32) -> Self {
        PlatformKind::Moving {
            direction: 1.0,
            speed: MOVING_PLATFORM_SPEED,
            origin_x,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Normal => "normal",
            PlatformKind::Night { .. } => "night",
            PlatformKind::Moving { .. } => "moving",
        }
    }
}

/// A labelled roster cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub label: String,
    pub kind: PlatformKind,
    /// Label matches a recognised shift code (fixed at construction)
    pub is_valid_shift: bool,
}

/// Whether a label is a recognised roster shift code
pub fn is_valid_shift(label: &str) -> bool {
    label.contains("7-15") || label.contains("RN-")
}

/// Whether a label marks a night shift
pub fn is_night_shift(label: &str) -> bool {
    label.contains("Night")
}

impl Platform {
    pub fn new(id: EntityId, x: f32, y: f32, label: String, kind: PlatformKind) -> Self {
        let is_valid_shift = is_valid_shift(&label);
        Self {
            id,
            pos: Vec2::new(x, y),
            label,
            kind,
            is_valid_shift,
        }
    }

    pub fn is_broken(&self) -> bool {
        matches!(
            self.kind,
            PlatformKind::Night {
                decay: NightDecay::Broken
            }
        )
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.kind, PlatformKind::Moving { .. })
    }

    /// Begin breaking (night platforms only, idempotent)
    pub fn start_breaking(&mut self) {
        if let PlatformKind::Night { decay } = &mut self.kind {
            *decay = decay.start_breaking();
        }
    }

    /// Advance one frame: slide moving platforms, decay night platforms
    pub fn update(&mut self) {
        match &mut self.kind {
            PlatformKind::Normal => {}
            PlatformKind::Night { decay } => {
                *decay = decay.advance();
            }
            PlatformKind::Moving {
                direction, speed, ..
            } => {
                self.pos.x += *speed * *direction;
                if self.pos.x <= GUTTER_WIDTH {
                    *direction = 1.0;
                } else if self.pos.x + PLATFORM_WIDTH >= SCREEN_WIDTH {
                    *direction = -1.0;
                }
            }
        }
    }

    /// Horizontal center, used by attached power-ups
    pub fn center_x(&self) -> f32 {
        self.pos.x + PLATFORM_WIDTH / 2.0
    }
}

impl Bounded for Platform {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT))
    }
}
