//! Power-ups (boost pickups)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounded};
use super::platform::Platform;
use super::state::EntityId;
use crate::consts::*;

/// Power-up magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// MOVAC: moderate boost
    Minor,
    /// RosterLab: strong boost
    Major,
}

impl PowerUpKind {
    /// 70% minor, 30% major
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(MINOR_POWER_UP_SHARE) {
            PowerUpKind::Minor
        } else {
            PowerUpKind::Major
        }
    }

    /// Boost velocity handed to the player's boost ramp
    pub fn boost_velocity(&self) -> f32 {
        match self {
            PowerUpKind::Minor => -15.0,
            PowerUpKind::Major => -25.0,
        }
    }

    pub fn bonus(&self) -> u64 {
        match self {
            PowerUpKind::Minor => 10,
            PowerUpKind::Major => 20,
        }
    }

    /// Placeholder glyph while the icon loads
    pub fn glyph(&self) -> &'static str {
        match self {
            PowerUpKind::Minor => "M",
            PowerUpKind::Major => "RL",
        }
    }
}

/// A boost pickup, optionally riding a moving platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    /// Platform this power-up rides on (non-owning)
    pub attached_to: Option<EntityId>,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
            attached_to: None,
        }
    }

    /// Power-up centered on top of `platform` and following it
    pub fn attached(platform: &Platform, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(
                platform.center_x() - POWER_UP_SIZE / 2.0,
                platform.pos.y - ATTACHED_POWER_UP_Y_OFFSET,
            ),
            kind,
            attached_to: Some(platform.id),
        }
    }

    /// Follow the attached platform's center. Detaches if it is gone.
    pub fn update(&mut self, platforms: &[Platform]) {
        let Some(id) = self.attached_to else {
            return;
        };
        match platforms.iter().find(|p| p.id == id) {
            Some(platform) => self.pos.x = platform.center_x() - POWER_UP_SIZE / 2.0,
            None => self.attached_to = None,
        }
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(POWER_UP_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::platform::PlatformKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_follows_platform() {
        let mut platforms = vec![Platform::new(
            4,
            100.0,
            300.0,
            "".into(),
            PlatformKind::moving(100.0),
        )];
        let mut power_up = PowerUp::attached(&platforms[0], PowerUpKind::Minor);
        assert_eq!(power_up.pos, Vec2::new(110.0, 255.0));

        for _ in 0..10 {
            platforms[0].update();
        }
        power_up.update(&platforms);
        assert_eq!(power_up.pos.x, platforms[0].center_x() - POWER_UP_SIZE / 2.0);
        assert_eq!(power_up.pos.y, 255.0);
    }

    #[test]
    fn test_detaches_when_platform_culled() {
        let platforms = vec![Platform::new(4, 100.0, 300.0, "".into(), PlatformKind::moving(100.0))];
        let mut power_up = PowerUp::attached(&platforms[0], PowerUpKind::Major);
        let x = power_up.pos.x;
        power_up.update(&[]);
        assert_eq!(power_up.attached_to, None);
        assert_eq!(power_up.pos.x, x);
    }

    #[test]
    fn test_roll_split() {
        let mut rng = Pcg32::seed_from_u64(3);
        let minors = (0..10_000)
            .filter(|_| PowerUpKind::roll(&mut rng) == PowerUpKind::Minor)
            .count();
        assert!((6_500..7_500).contains(&minors), "minors = {minors}");
    }

    #[test]
    fn test_magnitudes() {
        assert!(PowerUpKind::Major.boost_velocity() < PowerUpKind::Minor.boost_velocity());
        assert!(PowerUpKind::Major.bonus() > PowerUpKind::Minor.bonus());
    }
}
