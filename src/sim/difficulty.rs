//! Difficulty curve
//!
//! Pure functions of the current score. Cheap enough to call every frame.

use serde::{Deserialize, Serialize};

use super::hazards::ObstacleKind;

/// Spawn-rate and danger parameters for a given score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Chance that a generated platform row gets an obstacle
    pub monster_chance: f64,
    /// Chance that a generated platform row gets a free-floating power-up
    pub power_up_chance: f64,
    /// Frames between enemy shots
    pub shoot_interval: f32,
    /// Obstacle kinds that may be generated
    pub monster_types: &'static [ObstacleKind],
}

const EASY_TYPES: &[ObstacleKind] = &[ObstacleKind::Hole];
const MEDIUM_TYPES: &[ObstacleKind] = &[ObstacleKind::Hole, ObstacleKind::Fatigue];
const HARD_TYPES: &[ObstacleKind] =
    &[ObstacleKind::Hole, ObstacleKind::Fatigue, ObstacleKind::Double];
const EXTREME_TYPES: &[ObstacleKind] = &[
    ObstacleKind::Hole,
    ObstacleKind::Fatigue,
    ObstacleKind::Double,
    ObstacleKind::Budget,
];

/// Compute the difficulty parameters for a score
pub fn difficulty(score: u64) -> Difficulty {
    let s = score as f64;
    Difficulty {
        monster_chance: (0.05 + s / 1000.0 * 0.15).min(0.20),
        power_up_chance: (0.08 - s / 1000.0 * 0.05).max(0.03),
        shoot_interval: (180.0 - (s / 500.0 * 120.0) as f32).max(60.0),
        monster_types: DifficultyTier::for_score(score).monster_types(),
    }
}

/// Per-frame chance of a flying monster spawning (0.5% rising to 1.5%)
pub fn flying_monster_chance(score: u64) -> f64 {
    (0.005 + score as f64 / 10000.0 * 0.01).min(0.015)
}

/// Coarse difficulty band, shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl DifficultyTier {
    pub fn for_score(score: u64) -> Self {
        match score {
            0..50 => DifficultyTier::Easy,
            50..100 => DifficultyTier::Medium,
            100..200 => DifficultyTier::Hard,
            _ => DifficultyTier::Extreme,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
            DifficultyTier::Extreme => "Extreme",
        }
    }

    /// HUD color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            DifficultyTier::Easy => 0x4CAF50,
            DifficultyTier::Medium => 0xFFC107,
            DifficultyTier::Hard => 0xFF9800,
            DifficultyTier::Extreme => 0xFF0000,
        }
    }

    /// Obstacle kinds unlocked at this tier (cumulative)
    pub fn monster_types(&self) -> &'static [ObstacleKind] {
        match self {
            DifficultyTier::Easy => EASY_TYPES,
            DifficultyTier::Medium => MEDIUM_TYPES,
            DifficultyTier::Hard => HARD_TYPES,
            DifficultyTier::Extreme => EXTREME_TYPES,
        }
    }
}
