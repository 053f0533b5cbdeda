//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each collection)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod generate;
pub mod hazards;
pub mod platform;
pub mod player;
pub mod power_up;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Bounded, Landing};
pub use difficulty::{Difficulty, DifficultyTier, difficulty, flying_monster_chance};
pub use hazards::{FlyingMonster, Obstacle, ObstacleKind, ObstacleState, PlayerBullet, Projectile};
pub use platform::{NightDecay, Platform, PlatformKind};
pub use player::{Player, PlayerSurroundings};
pub use power_up::{PowerUp, PowerUpKind};
pub use state::{Cue, EndReason, EntityId, GamePhase, Ledger, SimEvent, World};
pub use tick::{ControlSignal, step, tick};
