//! The player character
//!
//! Owns the per-frame rule that reads the control signal, integrates physics
//! and resolves contacts with platforms, obstacles and power-ups.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounded, landing};
use super::hazards::{Obstacle, ObstacleKind, PlayerBullet};
use super::platform::Platform;
use super::power_up::PowerUp;
use super::state::{Cue, EndReason, Ledger};
use super::tick::ControlSignal;
use crate::consts::*;

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    /// Frames until the next shot is allowed
    pub shoot_cooldown: u32,
    /// Boost velocity ramping back to zero (negative while active)
    pub boost_velocity: f32,
    /// Animation frame (0 or 1)
    pub frame: u8,
    anim_timer: u32,
}

/// Slices of the world the player interacts with during its update
pub struct PlayerSurroundings<'a> {
    pub platforms: &'a mut [Platform],
    pub obstacles: &'a mut [Obstacle],
    pub power_ups: &'a mut Vec<PowerUp>,
    pub bullets: &'a mut Vec<PlayerBullet>,
    pub ledger: &'a mut Ledger,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            facing: 1.0,
            shoot_cooldown: 0,
            boost_velocity: 0.0,
            frame: 0,
            anim_timer: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + PLAYER_HEIGHT
    }

    /// Start a smooth upward launch
    pub fn boost(&mut self, velocity: f32) {
        self.boost_velocity = velocity;
    }

    /// Advance one frame
    pub fn update(&mut self, input: &ControlSignal, world: PlayerSurroundings<'_>) {
        let PlayerSurroundings {
            platforms,
            obstacles,
            power_ups,
            bullets,
            ledger,
        } = world;

        self.apply_gravity_and_boost();
        self.apply_control(input);

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
        if input.fire && self.shoot_cooldown == 0 {
            self.shoot(bullets, ledger);
            self.shoot_cooldown = SHOOT_COOLDOWN_FRAMES;
        }

        self.pos += self.vel;
        self.wrap_horizontal();

        self.land_on_platforms(platforms, ledger);

        if !self.touch_obstacles(obstacles) {
            ledger.end_session(EndReason::Obstacle);
            return;
        }

        self.collect_power_ups(power_ups, ledger);

        // Camera keeps the player CAMERA_OFFSET below its top edge
        ledger.follow(self.pos.y - CAMERA_OFFSET);

        if self.pos.y < ledger.max_height {
            ledger.max_height = self.pos.y;
            let height_score = ((SCORE_BASELINE - ledger.max_height) / HEIGHT_PER_POINT)
                .floor()
                .max(0.0) as u64;
            ledger.propose_score(height_score);
        }

        if self.bottom() > ledger.camera_bottom() {
            ledger.end_session(EndReason::Fell);
        }

        self.anim_timer += 1;
        if self.anim_timer > ANIM_TICKS {
            self.anim_timer = 0;
            self.frame = (self.frame + 1) % 2;
        }
    }

    /// Fire a bullet straight up from the top-center. Dropped at the cap.
    pub fn shoot(&self, bullets: &mut Vec<PlayerBullet>, ledger: &mut Ledger) {
        if bullets.len() >= MAX_PLAYER_BULLETS {
            log::trace!("Player bullet cap reached, shot dropped");
            return;
        }
        bullets.push(PlayerBullet::new(
            self.pos.x + PLAYER_WIDTH / 2.0 - BULLET_WIDTH / 2.0,
            self.pos.y - BULLET_HEIGHT,
        ));
        ledger.cue(Cue::Shoot);
    }

    fn apply_gravity_and_boost(&mut self) {
        self.vel.y += GRAVITY;
        if self.boost_velocity < 0.0 {
            self.vel.y = self.boost_velocity;
            self.boost_velocity += BOOST_RAMP;
            if self.boost_velocity >= 0.0 {
                self.boost_velocity = 0.0;
            }
        }
    }

    fn apply_control(&mut self, input: &ControlSignal) {
        let intent = input.horizontal.clamp(-1.0, 1.0);
        if intent.abs() >= CONTROL_DEAD_ZONE {
            self.vel.x = intent * MOVE_SPEED;
            self.facing = intent.signum();
        } else {
            self.vel.x *= FRICTION;
        }
    }

    fn wrap_horizontal(&mut self) {
        if self.pos.x < -PLAYER_WIDTH {
            self.pos.x = SCREEN_WIDTH;
        } else if self.pos.x > SCREEN_WIDTH {
            self.pos.x = -PLAYER_WIDTH;
        }
    }

    /// Bounce off the first platform crossed from above this frame
    fn land_on_platforms(&mut self, platforms: &mut [Platform], ledger: &mut Ledger) {
        if self.vel.y <= 0.0 {
            return;
        }
        let body = self.bounds();
        for platform in platforms.iter_mut() {
            if platform.is_broken() {
                continue;
            }
            let Some(hit) = landing(&body, self.vel.y, &platform.bounds()) else {
                continue;
            };

            self.pos.y = hit.surface_y - PLAYER_HEIGHT;
            self.vel.y = AUTO_BOUNCE_VELOCITY;
            platform.start_breaking();
            if platform.is_valid_shift {
                ledger.award(VALID_SHIFT_BONUS);
            }
            ledger.cue(Cue::Jump);
            break;
        }
    }

    /// Returns false if a deadly obstacle was touched
    fn touch_obstacles(&mut self, obstacles: &mut [Obstacle]) -> bool {
        for obstacle in obstacles.iter_mut() {
            if obstacle.is_spent() || !self.overlaps(&*obstacle) {
                continue;
            }
            if obstacle.kind == ObstacleKind::Hole {
                self.vel.y = HOLE_FALL_VELOCITY;
                obstacle.spend();
            } else {
                return false;
            }
        }
        true
    }

    fn collect_power_ups(&mut self, power_ups: &mut Vec<PowerUp>, ledger: &mut Ledger) {
        let body = self.bounds();
        power_ups.retain(|power_up| {
            if !body.overlaps(&power_up.bounds()) {
                return true;
            }
            self.boost(power_up.kind.boost_velocity());
            ledger.award(power_up.kind.bonus());
            ledger.cue(Cue::PowerUp);
            false
        });
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }
}
