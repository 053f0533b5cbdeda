//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world one frame in a fixed order:
//! player, platforms, power-ups, obstacles, projectiles, player bullets,
//! flying monsters, monster spawn, frontier generation, cull.

use serde::{Deserialize, Serialize};

use super::difficulty::difficulty;
use super::player::PlayerSurroundings;
use super::state::World;
use crate::consts::*;

/// Normalized control signal for a single frame (device-agnostic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSignal {
    /// Horizontal intent in [-1, 1]; magnitudes below the dead zone coast
    pub horizontal: f32,
    /// Fire requested this frame
    pub fire: bool,
}

/// Advance the world by one fixed frame
pub fn tick(world: &mut World, input: &ControlSignal) {
    if !world.is_running() {
        return;
    }
    world.time_frames += 1;

    let World {
        player,
        platforms,
        obstacles,
        power_ups,
        projectiles,
        player_bullets,
        flying_monsters,
        ledger,
        ..
    } = world;

    if let Some(player) = player.as_mut() {
        player.update(
            input,
            PlayerSurroundings {
                platforms: platforms.as_mut_slice(),
                obstacles: obstacles.as_mut_slice(),
                power_ups: &mut *power_ups,
                bullets: &mut *player_bullets,
                ledger: &mut *ledger,
            },
        );
    }

    for platform in platforms.iter_mut() {
        platform.update();
    }

    for power_up in power_ups.iter_mut() {
        power_up.update(platforms);
    }

    // Monsters only shoot while the session is live
    if ledger.is_running() {
        let interval = difficulty(ledger.score).shoot_interval;
        let target = player.as_ref().map(|p| p.center());
        for obstacle in obstacles.iter_mut() {
            obstacle.update(target, interval, projectiles);
        }
    }

    for projectile in projectiles.iter_mut() {
        projectile.update(player.as_ref(), ledger);
    }
    projectiles.retain(|p| p.active);

    for bullet in player_bullets.iter_mut() {
        bullet.update(obstacles, ledger);
    }
    player_bullets.retain(|b| b.active);

    for monster in flying_monsters.iter_mut() {
        monster.update(player.as_ref(), player_bullets, ledger);
    }
    flying_monsters.retain(|m| m.active);
    // Bullets spent on monsters go in the same frame
    player_bullets.retain(|b| b.active);

    world.roll_flying_monster();
    world.maintain_frontier();
    cull(world);
}

/// Advance up to `frames` frames, stopping early once the session ends.
/// Returns the number of frames simulated.
pub fn step(world: &mut World, input: &ControlSignal, frames: u32) -> u32 {
    let mut simulated = 0;
    while simulated < frames && world.is_running() {
        tick(world, input);
        simulated += 1;
    }
    simulated
}

/// Drop everything that fell behind the camera, plus spent transients
fn cull(world: &mut World) {
    let limit = world.ledger.camera_bottom() + CULL_MARGIN;
    world.platforms.retain(|p| p.pos.y < limit);
    world.obstacles.retain(|o| o.pos.y < limit);
    world.power_ups.retain(|p| p.pos.y < limit);
    world.projectiles.retain(|p| p.active && p.pos.y < limit);
    world.player_bullets.retain(|b| b.active && b.pos.y < limit);
    world.flying_monsters.retain(|m| m.active && m.pos.y < limit);
}
