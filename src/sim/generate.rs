//! Procedural level generation
//!
//! Platforms are generated one row at a time above the current frontier.
//! Each row may also carry an obstacle and/or a free-floating power-up,
//! gated by the difficulty curve.

use rand::Rng;

use super::difficulty::difficulty;
use super::hazards::{FlyingMonster, Obstacle};
use super::platform::{Platform, PlatformKind, is_night_shift};
use super::power_up::{PowerUp, PowerUpKind};
use super::state::World;
use crate::consts::*;

impl World {
    /// Label for the next platform
    pub fn random_label(&mut self) -> String {
        self.roster.random_label(&mut self.rng)
    }

    /// Generate one platform row at height `y`
    pub fn generate_platform(&mut self, y: f32) {
        let x = self.rng.random_range(0.0..SCREEN_WIDTH - PLATFORM_WIDTH);
        let label = self.random_label();
        let kind = self.platform_kind_for(&label, x);

        let id = self.next_entity_id();
        let platform = Platform::new(id, x, y, label, kind);

        // Moving platforms may carry a power-up; such rows get nothing else
        if platform.is_moving() && self.rng.random_bool(MOVING_POWER_UP_CHANCE) {
            let kind = PowerUpKind::roll(&mut self.rng);
            self.power_ups.push(PowerUp::attached(&platform, kind));
            self.platforms.push(platform);
            return;
        }
        self.platforms.push(platform);

        let difficulty = difficulty(self.ledger.score);
        let in_opening = y >= SAFE_OPENING_Y;

        if self.rng.random_bool(difficulty.monster_chance) && !in_opening {
            let types = difficulty.monster_types;
            let kind = types[self.rng.random_range(0..types.len())];
            let x = self.rng.random_range(0.0..SCREEN_WIDTH - OBSTACLE_SIZE);
            self.obstacles
                .push(Obstacle::new(x, y - OBSTACLE_Y_OFFSET, kind));
        }

        if self.rng.random_bool(difficulty.power_up_chance) && !in_opening {
            let kind = PowerUpKind::roll(&mut self.rng);
            let x = self.rng.random_range(0.0..SCREEN_WIDTH - POWER_UP_SIZE);
            self.power_ups
                .push(PowerUp::new(x, y - FREE_POWER_UP_Y_OFFSET, kind));
        }
    }

    /// Night labels force night platforms; otherwise moving platforms become
    /// possible once the score passes a threshold
    fn platform_kind_for(&mut self, label: &str, x: f32) -> PlatformKind {
        let roll: f64 = self.rng.random();
        if is_night_shift(label) {
            PlatformKind::night()
        } else if roll < MOVING_PLATFORM_CHANCE && self.ledger.score > MOVING_PLATFORM_MIN_SCORE {
            PlatformKind::moving(x)
        } else {
            PlatformKind::Normal
        }
    }

    /// Keep the frontier at least `GENERATION_MARGIN` above max height,
    /// generating at most `MAX_PLATFORMS_PER_FRAME` rows per call
    pub fn maintain_frontier(&mut self) -> usize {
        let mut generated = 0;
        while generated < MAX_PLATFORMS_PER_FRAME {
            let frontier = self.frontier().unwrap_or(self.ledger.max_height + PLATFORM_GAP);
            if frontier <= self.ledger.max_height - GENERATION_MARGIN {
                break;
            }
            self.generate_platform(frontier - PLATFORM_GAP);
            generated += 1;
        }
        if generated > 0 {
            log::debug!(
                "Generated {} platform rows (frontier {:?})",
                generated,
                self.frontier()
            );
        }
        generated
    }

    /// Maybe spawn a flying monster above the visible band
    pub fn roll_flying_monster(&mut self) {
        let chance = super::difficulty::flying_monster_chance(self.ledger.score);
        if !self.rng.random_bool(chance) || self.flying_monsters.len() >= MAX_FLYING_MONSTERS {
            return;
        }
        let x = self.rng.random_range(0.0..SCREEN_WIDTH - MONSTER_SIZE);
        let y = self.ledger.camera_y - MONSTER_SPAWN_ABOVE;
        let monster = FlyingMonster::spawn(&mut self.rng, x, y);
        self.flying_monsters.push(monster);
    }
}
