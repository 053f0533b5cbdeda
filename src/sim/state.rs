//! World state and session bookkeeping
//!
//! The [`World`] is the single aggregate that owns every live entity. It is
//! created once per host and reset by [`World::start_session`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hazards::{FlyingMonster, Obstacle, PlayerBullet, Projectile};
use super::platform::{Platform, PlatformKind};
use super::player::Player;
use super::power_up::PowerUp;
use crate::consts::*;
use crate::roster::RosterData;

/// Stable identifier for entities that are referenced by others
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session started yet
    Idle,
    /// Active gameplay
    Running,
    /// Session ended; frames are no longer simulated
    Ended,
}

/// What ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Touched a grounded obstacle that is not a hole
    Obstacle,
    /// Struck by an enemy projectile
    Projectile,
    /// Touched a flying monster
    FlyingMonster,
    /// Fell below the camera
    Fell,
}

/// Named audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Jump,
    PowerUp,
    Hit,
    Shoot,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::PowerUp => "powerup",
            Cue::Hit => "hit",
            Cue::Shoot => "shoot",
        }
    }
}

/// Something collaborators need to hear about, drained after each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Cue(Cue),
    ScoreChanged(u64),
    SessionEnded { final_score: u64, reason: EndReason },
}

/// Score, camera and phase bookkeeping shared by all entity update rules
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Score (never decreases within a session)
    pub score: u64,
    /// Camera top edge in world space (never increases)
    pub camera_y: f32,
    /// Smallest y the player has reached
    pub max_height: f32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    /// Events raised this frame
    pub events: Vec<SimEvent>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            score: 0,
            camera_y: 0.0,
            max_height: SCREEN_HEIGHT,
            phase: GamePhase::Idle,
            end_reason: None,
            events: Vec::new(),
        }
    }
}

impl Ledger {
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Add a bonus to the score. Ignored once the session is over.
    pub fn award(&mut self, points: u64) {
        if points == 0 || !self.is_running() {
            return;
        }
        self.score += points;
        self.events.push(SimEvent::ScoreChanged(self.score));
    }

    /// Merge a proposed score, keeping the larger value. Ignored once the
    /// session is over.
    pub fn propose_score(&mut self, proposed: u64) {
        if self.is_running() && proposed > self.score {
            self.score = proposed;
            self.events.push(SimEvent::ScoreChanged(self.score));
        }
    }

    pub fn cue(&mut self, cue: Cue) {
        self.events.push(SimEvent::Cue(cue));
    }

    /// Move the camera up to follow `target`; never moves down
    pub fn follow(&mut self, target: f32) {
        if target < self.camera_y {
            self.camera_y = target;
        }
    }

    /// End the running session. Later calls are no-ops.
    pub fn end_session(&mut self, reason: EndReason) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Ended;
        self.end_reason = Some(reason);
        self.events.push(SimEvent::SessionEnded {
            final_score: self.score,
            reason,
        });
        self.cue(Cue::Hit);
        log::info!("Session ended ({:?}) with score {}", reason, self.score);
    }

    /// Bottom edge of the visible band
    pub fn camera_bottom(&self) -> f32 {
        self.camera_y + SCREEN_HEIGHT
    }

    /// Whether `y` lies within the visible band widened by `above`/`below`
    pub fn in_band(&self, y: f32, above: f32, below: f32) -> bool {
        y >= self.camera_y - above && y <= self.camera_bottom() + below
    }
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct World {
    /// Seed of the current RNG stream
    pub seed: u64,
    pub player: Option<Player>,
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub projectiles: Vec<Projectile>,
    pub player_bullets: Vec<PlayerBullet>,
    pub flying_monsters: Vec<FlyingMonster>,
    pub ledger: Ledger,
    /// Label source for generated platforms
    pub roster: RosterData,
    /// Frames simulated this session
    pub time_frames: u64,
    pub(crate) rng: Pcg32,
    next_id: EntityId,
}

impl World {
    /// Create an idle world with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            player: None,
            platforms: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            projectiles: Vec::new(),
            player_bullets: Vec::new(),
            flying_monsters: Vec::new(),
            ledger: Ledger::default(),
            roster: RosterData::default(),
            time_frames: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear everything and lay out the opening of a new session
    pub fn start_session(&mut self, roster: RosterData) {
        let seed = self.seed;
        *self = World::new(seed);
        self.roster = roster;
        self.player = Some(Player::new(PLAYER_START_X, PLAYER_START_Y));
        self.ledger.phase = GamePhase::Running;

        for i in 0..INITIAL_PLATFORMS {
            self.generate_platform(SCREEN_HEIGHT - i as f32 * PLATFORM_GAP);
        }

        // Safe platform directly under the player
        let id = self.next_entity_id();
        self.platforms.push(Platform::new(
            id,
            SCREEN_WIDTH / 2.0 - 30.0,
            SCREEN_HEIGHT - 60.0,
            "START".to_string(),
            PlatformKind::Normal,
        ));

        log::info!(
            "Session started (seed {}, {} roster rows, {} platforms)",
            self.seed,
            self.roster.rows().len(),
            self.platforms.len()
        );
    }

    /// Reseed the RNG stream used by the next session
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn is_running(&self) -> bool {
        self.ledger.is_running()
    }

    pub fn score(&self) -> u64 {
        self.ledger.score
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.ledger.events)
    }

    /// Y of the highest generated platform
    pub fn frontier(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.pos.y).reduce(f32::min)
    }
}
