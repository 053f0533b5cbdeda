//! Roster Jump - a vertical platformer climbing a nurse roster spreadsheet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, collisions, world state)
//! - `session`: Session lifecycle and the fixed-timestep driver
//! - `render`: Drawable snapshot handed to the rendering collaborator
//! - `input`: Device input normalized into control signals
//! - `audio`: Named cues and cue players
//! - `roster`: Roster table that supplies platform labels
//! - `settings`: Player-facing preferences

pub mod audio;
pub mod input;
pub mod render;
pub mod roster;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use roster::RosterData;
pub use session::{Collaborators, Session, SessionObserver};
pub use settings::{InputMode, Settings, SettingsError};

/// Game configuration constants
///
/// All rates are per simulation frame. The simulation runs at `FRAME_RATE`.
pub mod consts {
    /// Fixed simulation rate (frames per second)
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum frames simulated per host callback to prevent spiral of death
    pub const MAX_FRAMES_PER_CALLBACK: u32 = 4;

    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 450.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;
    /// Width of the row-number gutter on the left of the grid
    pub const GUTTER_WIDTH: f32 = 40.0;

    /// Player physics
    pub const GRAVITY: f32 = 0.4;
    /// Velocity applied when landing on a platform (negative = up)
    pub const AUTO_BOUNCE_VELOCITY: f32 = -13.0;
    pub const MOVE_SPEED: f32 = 3.0;
    /// Horizontal damping applied while there is no control intent
    pub const FRICTION: f32 = 0.8;
    /// Intent magnitude below which the player coasts under friction
    pub const CONTROL_DEAD_ZONE: f32 = 0.05;
    /// Per-frame increment that ramps a boost back toward zero
    pub const BOOST_RAMP: f32 = 0.5;
    /// Downward velocity after dropping through a hole
    pub const HOLE_FALL_VELOCITY: f32 = 5.0;
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_START_X: f32 = SCREEN_WIDTH / 2.0 - 30.0;
    pub const PLAYER_START_Y: f32 = SCREEN_HEIGHT - 140.0;
    /// Frames between player shots
    pub const SHOOT_COOLDOWN_FRAMES: u32 = 12;
    /// Frames per animation step
    pub const ANIM_TICKS: u32 = 10;

    /// Camera keeps the player this far below its top edge
    pub const CAMERA_OFFSET: f32 = 350.0;

    /// Score from height: floor((baseline - max_height) / HEIGHT_PER_POINT)
    pub const SCORE_BASELINE: f32 = 600.0;
    pub const HEIGHT_PER_POINT: f32 = 50.0;
    /// Bonus for landing on a recognised shift label
    pub const VALID_SHIFT_BONUS: u64 = 5;
    /// Bonus for shooting a grounded obstacle
    pub const OBSTACLE_KILL_BONUS: u64 = 10;
    /// Bonus for shooting a flying monster
    pub const MONSTER_KILL_BONUS: u64 = 15;

    /// Platforms
    pub const PLATFORM_WIDTH: f32 = 60.0;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PLATFORM_GAP: f32 = 65.0;
    pub const MOVING_PLATFORM_SPEED: f32 = 1.5;
    /// Frames a night platform survives after being landed on
    pub const NIGHT_BREAK_FRAMES: u32 = 60;
    /// Score a session must exceed before moving platforms appear
    pub const MOVING_PLATFORM_MIN_SCORE: u64 = 30;
    pub const MOVING_PLATFORM_CHANCE: f64 = 0.15;
    pub const MOVING_POWER_UP_CHANCE: f64 = 0.2;
    /// Share of power-ups that are the minor kind
    pub const MINOR_POWER_UP_SHARE: f64 = 0.7;
    pub const INITIAL_PLATFORMS: usize = 15;
    /// Obstacles and free power-ups are suppressed below this y
    pub const SAFE_OPENING_Y: f32 = SCREEN_HEIGHT - 200.0;
    /// Generation keeps the frontier at least this far above max height
    pub const GENERATION_MARGIN: f32 = 400.0;
    pub const MAX_PLATFORMS_PER_FRAME: usize = 5;

    /// Obstacles
    pub const OBSTACLE_SIZE: f32 = 60.0;
    pub const OBSTACLE_Y_OFFSET: f32 = 70.0;
    pub const OBSTACLE_RANGE: f32 = 500.0;

    /// Projectiles (enemy fire)
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 3.0;
    pub const MAX_PROJECTILES: usize = 50;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 12.0;
    pub const MAX_PLAYER_BULLETS: usize = 20;

    /// Transient entities deactivate this far outside the camera band
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Flying monsters
    pub const MONSTER_SIZE: f32 = 70.0;
    pub const MONSTER_MIN_SPEED: f32 = 1.5;
    pub const MONSTER_MAX_SPEED: f32 = 3.0;
    pub const MONSTER_SPAWN_ABOVE: f32 = 50.0;
    pub const MONSTER_DESPAWN_ABOVE: f32 = 200.0;
    pub const MONSTER_DESPAWN_BELOW: f32 = 100.0;
    pub const MAX_FLYING_MONSTERS: usize = 3;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 40.0;
    pub const ATTACHED_POWER_UP_Y_OFFSET: f32 = 45.0;
    pub const FREE_POWER_UP_Y_OFFSET: f32 = 50.0;

    /// Entities further than this below the camera's bottom edge are culled
    pub const CULL_MARGIN: f32 = 100.0;
}
