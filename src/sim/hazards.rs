//! Hostile and transient entities: grounded obstacles, enemy projectiles,
//! player bullets and flying monsters

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounded};
use super::player::Player;
use super::state::{Cue, EndReason, Ledger};
use crate::consts::*;

/// Grounded obstacle kinds, in the order they unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Broken cell; drops the player through
    Hole,
    /// "Fatigue Rule" monster
    Fatigue,
    /// "Double Shift" monster
    Double,
    /// "Over Budget" monster
    Budget,
}

impl ObstacleKind {
    pub fn is_monster(&self) -> bool {
        *self != ObstacleKind::Hole
    }

    /// Caption drawn under the monster
    pub fn caption(&self) -> &'static str {
        match self {
            ObstacleKind::Hole => "",
            ObstacleKind::Fatigue => "Fatigue Rule",
            ObstacleKind::Double => "Double Shift",
            ObstacleKind::Budget => "Over Budget",
        }
    }
}

/// Obstacle state. `Spent` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    Live,
    Spent,
}

/// A grounded obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub kind: ObstacleKind,
    pub state: ObstacleState,
    /// Frames since the last shot
    pub shoot_timer: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, kind: ObstacleKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
            state: ObstacleState::Live,
            shoot_timer: 0.0,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.state == ObstacleState::Spent
    }

    /// Mark as spent; it no longer interacts with anything
    pub fn spend(&mut self) {
        self.state = ObstacleState::Spent;
    }

    /// Count toward the next shot and fire at `target` when due
    pub fn update(
        &mut self,
        target: Option<Vec2>,
        shoot_interval: f32,
        projectiles: &mut Vec<Projectile>,
    ) {
        if !self.kind.is_monster() || self.is_spent() {
            return;
        }
        self.shoot_timer += 1.0;
        if self.shoot_timer >= shoot_interval {
            self.shoot_timer = 0.0;
            if let Some(target) = target {
                self.shoot(target, projectiles);
            }
        }
    }

    /// Fire a projectile at `target` if it is in range and under the cap
    pub fn shoot(&self, target: Vec2, projectiles: &mut Vec<Projectile>) {
        if projectiles.len() >= MAX_PROJECTILES {
            log::trace!("Projectile cap reached, shot dropped");
            return;
        }
        let origin = self.bounds().center();
        let delta = target - origin;
        let distance = delta.length();
        if distance > 0.0 && distance < OBSTACLE_RANGE {
            let half = Vec2::splat(PROJECTILE_SIZE / 2.0);
            projectiles.push(Projectile::new(
                origin - half,
                delta / distance * PROJECTILE_SPEED,
            ));
        }
    }
}

impl Bounded for Obstacle {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(OBSTACLE_SIZE))
    }
}

/// Whether a transient entity has drifted out of the camera band
fn far_offscreen(bounds: &Aabb, ledger: &Ledger) -> bool {
    bounds.left() < -OFFSCREEN_MARGIN
        || bounds.left() > SCREEN_WIDTH + OFFSCREEN_MARGIN
        || !ledger.in_band(bounds.top(), OFFSCREEN_MARGIN, OFFSCREEN_MARGIN)
}

/// Enemy-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            active: true,
        }
    }

    pub fn update(&mut self, player: Option<&Player>, ledger: &mut Ledger) {
        self.pos += self.vel;

        if player.is_some_and(|p| self.overlaps(p)) {
            ledger.end_session(EndReason::Projectile);
            self.active = false;
        }

        if far_offscreen(&self.bounds(), ledger) {
            self.active = false;
        }
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }
}

/// Bullet fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl PlayerBullet {
    /// Bullet travelling straight up from `(x, y)`
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, -BULLET_SPEED),
            active: true,
        }
    }

    pub fn update(&mut self, obstacles: &mut [Obstacle], ledger: &mut Ledger) {
        self.pos += self.vel;

        let bounds = self.bounds();
        if let Some(obstacle) = obstacles
            .iter_mut()
            .find(|o| o.kind.is_monster() && !o.is_spent() && bounds.overlaps(&o.bounds()))
        {
            obstacle.spend();
            self.active = false;
            ledger.award(OBSTACLE_KILL_BONUS);
        }

        if far_offscreen(&bounds, ledger) {
            self.active = false;
        }
    }
}

impl Bounded for PlayerBullet {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// Monster patrolling horizontally above the platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyingMonster {
    pub pos: Vec2,
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub active: bool,
    /// Animation frame (0 or 1)
    pub frame: u8,
    anim_timer: u32,
}

impl FlyingMonster {
    pub fn new(x: f32, y: f32, speed: f32, direction: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            speed,
            direction,
            active: true,
            frame: 0,
            anim_timer: 0,
        }
    }

    /// Monster with a random speed and heading
    pub fn spawn<R: Rng>(rng: &mut R, x: f32, y: f32) -> Self {
        let speed = rng.random_range(MONSTER_MIN_SPEED..MONSTER_MAX_SPEED);
        let direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        Self::new(x, y, speed, direction)
    }

    pub fn update(
        &mut self,
        player: Option<&Player>,
        bullets: &mut [PlayerBullet],
        ledger: &mut Ledger,
    ) {
        self.pos.x += self.speed * self.direction;
        if self.pos.x <= 0.0 {
            self.direction = 1.0;
        } else if self.pos.x + MONSTER_SIZE >= SCREEN_WIDTH {
            self.direction = -1.0;
        }

        if !ledger.in_band(self.pos.y, MONSTER_DESPAWN_ABOVE, MONSTER_DESPAWN_BELOW) {
            self.active = false;
        }

        // Touching the player is fatal; the monster stays
        if player.is_some_and(|p| self.overlaps(p)) {
            ledger.end_session(EndReason::FlyingMonster);
        }

        let bounds = self.bounds();
        if let Some(bullet) = bullets
            .iter_mut()
            .find(|b| b.active && bounds.overlaps(&b.bounds()))
        {
            self.active = false;
            bullet.active = false;
            ledger.award(MONSTER_KILL_BONUS);
            ledger.cue(Cue::Hit);
        }

        self.anim_timer += 1;
        if self.anim_timer > ANIM_TICKS {
            self.anim_timer = 0;
            self.frame = (self.frame + 1) % 2;
        }
    }
}

impl Bounded for FlyingMonster {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(MONSTER_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, SimEvent};

    fn running() -> Ledger {
        Ledger {
            phase: GamePhase::Running,
            ..Default::default()
        }
    }

    #[test]
    fn test_hole_never_shoots() {
        let mut hole = Obstacle::new(100.0, 100.0, ObstacleKind::Hole);
        let mut projectiles = Vec::new();
        for _ in 0..500 {
            hole.update(Some(Vec2::new(130.0, 300.0)), 60.0, &mut projectiles);
        }
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_monster_shoots_on_interval() {
        let mut monster = Obstacle::new(100.0, 100.0, ObstacleKind::Fatigue);
        let mut projectiles = Vec::new();
        let target = Vec2::new(130.0, 330.0);
        for _ in 0..59 {
            monster.update(Some(target), 60.0, &mut projectiles);
        }
        assert!(projectiles.is_empty());
        monster.update(Some(target), 60.0, &mut projectiles);
        assert_eq!(projectiles.len(), 1);

        // Aimed straight down at PROJECTILE_SPEED
        let p = &projectiles[0];
        assert!(p.vel.x.abs() < 1e-5);
        assert!((p.vel.y - PROJECTILE_SPEED).abs() < 1e-5);
        assert_eq!(p.pos, Vec2::new(125.0, 125.0));
    }

    #[test]
    fn test_spent_monster_stops_shooting() {
        let mut monster = Obstacle::new(100.0, 100.0, ObstacleKind::Budget);
        monster.spend();
        let mut projectiles = Vec::new();
        for _ in 0..300 {
            monster.update(Some(Vec2::new(130.0, 300.0)), 60.0, &mut projectiles);
        }
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_out_of_range_target_is_ignored() {
        let monster = Obstacle::new(100.0, 100.0, ObstacleKind::Double);
        let mut projectiles = Vec::new();
        monster.shoot(Vec2::new(130.0, 130.0 + OBSTACLE_RANGE), &mut projectiles);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_projectile_cap() {
        let monster = Obstacle::new(100.0, 100.0, ObstacleKind::Double);
        let mut projectiles = Vec::new();
        for _ in 0..(MAX_PROJECTILES + 10) {
            monster.shoot(Vec2::new(130.0, 300.0), &mut projectiles);
        }
        assert_eq!(projectiles.len(), MAX_PROJECTILES);
    }

    #[test]
    fn test_projectile_hits_player() {
        let mut ledger = running();
        let player = Player::new(100.0, 300.0);
        let mut projectile = Projectile::new(Vec2::new(120.0, 290.0), Vec2::new(0.0, 3.0));
        projectile.update(Some(&player), &mut ledger);
        assert!(!projectile.active);
        assert_eq!(ledger.end_reason, Some(EndReason::Projectile));
    }

    #[test]
    fn test_projectile_leaves_band() {
        let mut ledger = running();
        let mut projectile = Projectile::new(
            Vec2::new(10.0, SCREEN_HEIGHT + OFFSCREEN_MARGIN),
            Vec2::new(0.0, 3.0),
        );
        projectile.update(None, &mut ledger);
        assert!(!projectile.active);
        assert!(ledger.is_running());
    }

    #[test]
    fn test_bullet_kills_first_monster_only() {
        let mut ledger = running();
        let mut obstacles = vec![
            Obstacle::new(100.0, 100.0, ObstacleKind::Hole),
            Obstacle::new(100.0, 100.0, ObstacleKind::Fatigue),
            Obstacle::new(100.0, 100.0, ObstacleKind::Double),
        ];
        let mut bullet = PlayerBullet::new(120.0, 150.0);
        bullet.update(&mut obstacles, &mut ledger);

        assert!(!bullet.active);
        assert!(!obstacles[0].is_spent(), "holes are not targets");
        assert!(obstacles[1].is_spent());
        assert!(!obstacles[2].is_spent());
        assert_eq!(ledger.score, OBSTACLE_KILL_BONUS);
    }

    #[test]
    fn test_bullet_expires_above_camera() {
        let mut ledger = running();
        let mut bullet = PlayerBullet::new(100.0, -OFFSCREEN_MARGIN);
        bullet.update(&mut [], &mut ledger);
        assert!(!bullet.active);
    }

    #[test]
    fn test_flying_monster_reflects() {
        let mut ledger = running();
        let mut monster = FlyingMonster::new(SCREEN_WIDTH - MONSTER_SIZE - 1.0, 100.0, 2.0, 1.0);
        monster.update(None, &mut [], &mut ledger);
        assert_eq!(monster.direction, -1.0);
        monster.update(None, &mut [], &mut ledger);
        assert!(monster.pos.x < SCREEN_WIDTH - MONSTER_SIZE);
    }

    #[test]
    fn test_flying_monster_contact_is_fatal() {
        let mut ledger = running();
        let player = Player::new(100.0, 100.0);
        let mut monster = FlyingMonster::new(110.0, 110.0, 1.5, 1.0);
        monster.update(Some(&player), &mut [], &mut ledger);
        assert_eq!(ledger.end_reason, Some(EndReason::FlyingMonster));
        assert!(monster.active);
    }

    #[test]
    fn test_flying_monster_shot_down() {
        let mut ledger = running();
        let mut bullets = vec![PlayerBullet::new(300.0, 300.0), PlayerBullet::new(130.0, 120.0)];
        let mut monster = FlyingMonster::new(100.0, 100.0, 1.5, 1.0);
        monster.update(None, &mut bullets, &mut ledger);

        assert!(!monster.active);
        assert!(bullets[0].active);
        assert!(!bullets[1].active);
        assert_eq!(ledger.score, MONSTER_KILL_BONUS);
        assert!(ledger.events.contains(&SimEvent::Cue(Cue::Hit)));
    }

    #[test]
    fn test_flying_monster_despawns_far_above() {
        let mut ledger = running();
        let mut monster = FlyingMonster::new(100.0, -MONSTER_DESPAWN_ABOVE - 1.0, 1.5, 1.0);
        monster.update(None, &mut [], &mut ledger);
        assert!(!monster.active);
    }
}
