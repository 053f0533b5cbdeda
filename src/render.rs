//! Rendering adapter contract
//!
//! Each frame the world is flattened into a [`DrawList`]: world-space sprites
//! in back-to-front order plus HUD data. A [`RenderAdapter`] turns that into
//! pixels. Asset loading lives entirely on the adapter side; until an image
//! is ready (or after it failed) the sprite's placeholder color is used.
//! Nothing here feeds back into the simulation.

use std::collections::HashMap;

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{DifficultyTier, ObstacleKind, PlatformKind, PowerUpKind, World};

/// RGBA color, 0.0 - 1.0 per channel
pub type Color = [f32; 4];

fn hex(rgb: u32) -> Color {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// Image assets an adapter may load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKey {
    Player,
    Obstacle,
    FlyingMonster,
    Movac,
    RosterLab,
}

impl AssetKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetKey::Player => "player.png",
            AssetKey::Obstacle => "monster.png",
            AssetKey::FlyingMonster => "flying-monster.png",
            AssetKey::Movac => "movac.png",
            AssetKey::RosterLab => "rosterlab.png",
        }
    }
}

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpriteKind {
    Platform {
        variant: &'static str,
        /// 0.0 intact .. 1.0 broken (night platforms redden as they break)
        break_progress: f32,
    },
    Obstacle {
        kind: ObstacleKind,
        spent: bool,
    },
    PowerUp {
        kind: PowerUpKind,
    },
    Projectile,
    Bullet,
    FlyingMonster,
    Player,
}

/// One drawable entity, in world space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// -1 mirrors the image horizontally
    pub facing: f32,
    pub frame: u8,
    /// Text drawn with the sprite (platform label, obstacle caption, glyph)
    pub label: Option<String>,
    /// Image to draw when ready
    pub asset: Option<AssetKey>,
    /// Fill used while the asset is unavailable
    pub placeholder: Color,
}

impl Sprite {
    fn new(kind: SpriteKind, pos: Vec2, size: Vec2, placeholder: Color) -> Self {
        Self {
            kind,
            pos,
            size,
            facing: 1.0,
            frame: 0,
            label: None,
            asset: None,
            placeholder,
        }
    }

    fn with_asset(mut self, asset: AssetKey) -> Self {
        self.asset = Some(asset);
        self
    }

    fn with_label(mut self, label: &str) -> Self {
        if !label.is_empty() {
            self.label = Some(label.to_string());
        }
        self
    }
}

/// Heads-up display data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub tier: DifficultyTier,
    pub tier_label: &'static str,
    /// 0xRRGGBB
    pub tier_color: u32,
    pub controls_hint: Option<&'static str>,
}

/// Score below which the controls hint stays up
pub const CONTROLS_HINT_MAX_SCORE: u64 = 10;

impl Hud {
    pub fn capture(score: u64, settings: &Settings) -> Self {
        let tier = DifficultyTier::for_score(score);
        let controls_hint = (settings.show_controls_hint && score < CONTROLS_HINT_MAX_SCORE)
            .then(|| settings.input_mode.controls_hint());
        Self {
            score,
            tier,
            tier_label: tier.as_str(),
            tier_color: tier.color(),
            controls_hint,
        }
    }
}

/// Everything an adapter needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawList {
    /// Top of the visible band in world space
    pub camera_y: f32,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

impl DrawList {
    /// Snapshot the world. Broken platforms are left out.
    pub fn capture(world: &World, settings: &Settings) -> Self {
        let mut sprites = Vec::with_capacity(
            world.platforms.len()
                + world.obstacles.len()
                + world.power_ups.len()
                + world.projectiles.len()
                + world.player_bullets.len()
                + world.flying_monsters.len()
                + 1,
        );

        for platform in world.platforms.iter().filter(|p| !p.is_broken()) {
            let (placeholder, progress) = match platform.kind {
                PlatformKind::Normal => (hex(0x2E7D32), 0.0),
                PlatformKind::Night { decay } => {
                    let progress = decay.progress();
                    ([progress, 0.0, 0.0, 1.0], progress)
                }
                PlatformKind::Moving { .. } => (hex(0x1976D2), 0.0),
            };
            let kind = SpriteKind::Platform {
                variant: platform.kind.as_str(),
                break_progress: progress,
            };
            let size = Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT);
            sprites.push(Sprite::new(kind, platform.pos, size, placeholder).with_label(&platform.label));
        }

        for obstacle in &world.obstacles {
            let kind = SpriteKind::Obstacle {
                kind: obstacle.kind,
                spent: obstacle.is_spent(),
            };
            let size = Vec2::splat(OBSTACLE_SIZE);
            let sprite = if obstacle.kind.is_monster() {
                Sprite::new(kind, obstacle.pos, size, hex(0xFF4444)).with_asset(AssetKey::Obstacle)
            } else {
                Sprite::new(kind, obstacle.pos, size, hex(0x666666))
            };
            sprites.push(sprite.with_label(obstacle.kind.caption()));
        }

        for power_up in &world.power_ups {
            let (asset, placeholder) = match power_up.kind {
                PowerUpKind::Minor => (AssetKey::Movac, hex(0xFF9800)),
                PowerUpKind::Major => (AssetKey::RosterLab, hex(0x2196F3)),
            };
            let kind = SpriteKind::PowerUp {
                kind: power_up.kind,
            };
            sprites.push(
                Sprite::new(kind, power_up.pos, Vec2::splat(POWER_UP_SIZE), placeholder)
                    .with_asset(asset)
                    .with_label(power_up.kind.glyph()),
            );
        }

        for projectile in &world.projectiles {
            sprites.push(Sprite::new(
                SpriteKind::Projectile,
                projectile.pos,
                Vec2::splat(PROJECTILE_SIZE),
                hex(0xFF0000),
            ));
        }

        for bullet in &world.player_bullets {
            sprites.push(Sprite::new(
                SpriteKind::Bullet,
                bullet.pos,
                Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
                hex(0x00FF00),
            ));
        }

        for monster in &world.flying_monsters {
            let mut sprite = Sprite::new(
                SpriteKind::FlyingMonster,
                monster.pos,
                Vec2::splat(MONSTER_SIZE),
                hex(0x8E24AA),
            )
            .with_asset(AssetKey::FlyingMonster);
            sprite.facing = monster.direction.signum();
            sprite.frame = monster.frame;
            sprites.push(sprite);
        }

        if let Some(player) = &world.player {
            let mut sprite = Sprite::new(
                SpriteKind::Player,
                player.pos,
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                hex(0x4A90E2),
            )
            .with_asset(AssetKey::Player);
            sprite.facing = player.facing;
            sprite.frame = player.frame;
            sprites.push(sprite);
        }

        Self {
            camera_y: world.ledger.camera_y,
            sprites,
            hud: Hud::capture(world.score(), settings),
        }
    }
}

/// Opaque image handle owned by the adapter
pub trait DrawableHandle {
    /// Whether the image finished loading
    fn is_ready(&self) -> bool;
}

/// Load status of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AssetSlot {
    #[default]
    Loading,
    Ready,
    /// Terminal; the placeholder stays
    Failed,
}

/// Per-asset load status tracked by an adapter
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    slots: HashMap<AssetKey, AssetSlot>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, key: AssetKey) -> AssetSlot {
        self.slots.get(&key).copied().unwrap_or_default()
    }

    /// Poll a handle; a loading slot becomes ready once the handle is
    pub fn poll(&mut self, key: AssetKey, handle: &dyn DrawableHandle) -> AssetSlot {
        let slot = self.slots.entry(key).or_default();
        if *slot == AssetSlot::Loading && handle.is_ready() {
            *slot = AssetSlot::Ready;
            log::debug!("Asset {} ready", key.file_name());
        }
        *slot
    }

    /// Record a load failure. The sprite keeps drawing its placeholder.
    pub fn mark_failed(&mut self, key: AssetKey, reason: &str) {
        log::warn!("Failed to load {}: {}", key.file_name(), reason);
        self.slots.insert(key, AssetSlot::Failed);
    }

    /// Whether `sprite` must be drawn with its placeholder
    pub fn uses_placeholder(&self, sprite: &Sprite) -> bool {
        match sprite.asset {
            Some(key) => self.slot(key) != AssetSlot::Ready,
            None => true,
        }
    }
}

/// Consumes one draw list per frame
pub trait RenderAdapter {
    fn draw(&mut self, frame: &DrawList);
}

/// Adapter for headless runs: keeps the last frame's summary
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    pub frames_drawn: u64,
    pub last_sprite_count: usize,
    pub last_hud: Option<Hud>,
}

impl RenderAdapter for HeadlessRenderer {
    fn draw(&mut self, frame: &DrawList) {
        self.frames_drawn += 1;
        self.last_sprite_count = frame.sprites.len();
        self.last_hud = Some(frame.hud.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterData;
    use crate::sim::{NightDecay, Platform, PowerUp};
    use std::cell::Cell;

    fn started() -> World {
        let mut world = World::new(11);
        world.start_session(RosterData::demo());
        world
    }

    #[test]
    fn test_player_drawn_last() {
        let world = started();
        let list = DrawList::capture(&world, &Settings::default());
        let visible = world.platforms.iter().filter(|p| !p.is_broken()).count()
            + world.obstacles.len()
            + world.power_ups.len()
            + 1;
        assert_eq!(list.sprites.len(), visible);
        let last = list.sprites.last().unwrap();
        assert_eq!(last.kind, SpriteKind::Player);
        assert_eq!(last.asset, Some(AssetKey::Player));
        assert_eq!(list.camera_y, 0.0);
    }

    #[test]
    fn test_broken_platforms_are_not_drawn() {
        let mut world = World::new(1);
        world.platforms.push(Platform::new(
            1,
            0.0,
            0.0,
            "RN-Night".into(),
            PlatformKind::Night {
                decay: NightDecay::Broken,
            },
        ));
        world.platforms.push(Platform::new(
            2,
            0.0,
            -65.0,
            "RN-Night".into(),
            PlatformKind::Night {
                decay: NightDecay::Breaking { frames: 30 },
            },
        ));
        let list = DrawList::capture(&world, &Settings::default());
        assert_eq!(list.sprites.len(), 1);
        let sprite = &list.sprites[0];
        assert_eq!(
            sprite.kind,
            SpriteKind::Platform {
                variant: "night",
                break_progress: 0.5
            }
        );
        assert_eq!(sprite.placeholder, [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(sprite.label.as_deref(), Some("RN-Night"));
    }

    #[test]
    fn test_power_up_glyph_and_asset() {
        let mut world = World::new(1);
        world
            .power_ups
            .push(PowerUp::new(10.0, 10.0, PowerUpKind::Major));
        let list = DrawList::capture(&world, &Settings::default());
        assert_eq!(list.sprites[0].label.as_deref(), Some("RL"));
        assert_eq!(list.sprites[0].asset, Some(AssetKey::RosterLab));
    }

    #[test]
    fn test_controls_hint_while_score_low() {
        let settings = Settings::default();
        assert!(Hud::capture(9, &settings).controls_hint.is_some());
        assert!(Hud::capture(10, &settings).controls_hint.is_none());

        let hidden = Settings {
            show_controls_hint: false,
            ..Settings::default()
        };
        assert!(Hud::capture(0, &hidden).controls_hint.is_none());
    }

    #[test]
    fn test_hud_tier() {
        let hud = Hud::capture(150, &Settings::default());
        assert_eq!(hud.tier, DifficultyTier::Hard);
        assert_eq!(hud.tier_label, "Hard");
        assert_eq!(hud.tier_color, 0xFF9800);
    }

    struct FakeImage(Cell<bool>);

    impl DrawableHandle for FakeImage {
        fn is_ready(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_asset_slots() {
        let mut catalog = AssetCatalog::new();
        let image = FakeImage(Cell::new(false));
        assert_eq!(catalog.poll(AssetKey::Player, &image), AssetSlot::Loading);
        image.0.set(true);
        assert_eq!(catalog.poll(AssetKey::Player, &image), AssetSlot::Ready);

        catalog.mark_failed(AssetKey::Movac, "404");
        assert_eq!(catalog.poll(AssetKey::Movac, &image), AssetSlot::Failed);
    }

    #[test]
    fn test_placeholder_until_ready() {
        let world = started();
        let list = DrawList::capture(&world, &Settings::default());
        let player = list.sprites.last().unwrap();
        let platform = &list.sprites[0];

        let mut catalog = AssetCatalog::new();
        assert!(catalog.uses_placeholder(player));
        catalog.poll(AssetKey::Player, &FakeImage(Cell::new(true)));
        assert!(!catalog.uses_placeholder(player));
        // Platforms are always drawn as filled cells
        assert!(catalog.uses_placeholder(platform));
    }

    #[test]
    fn test_draw_list_serializes() {
        let world = started();
        let list = DrawList::capture(&world, &Settings::default());
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains(r#""type":"player""#));
        assert!(json.contains("START"));
    }

    #[test]
    fn test_headless_renderer_tracks_frames() {
        let world = started();
        let mut renderer = HeadlessRenderer::default();
        let list = DrawList::capture(&world, &Settings::default());
        renderer.draw(&list);
        renderer.draw(&list);
        assert_eq!(renderer.frames_drawn, 2);
        assert_eq!(renderer.last_sprite_count, list.sprites.len());
        assert_eq!(renderer.last_hud.unwrap().score, 0);
    }
}
