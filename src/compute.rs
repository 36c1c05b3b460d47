/// Pure game rules.
///
/// Nothing here owns state: collision geometry, entity factories, cooldown
/// rolls and input steering all take what they need and return a value.
/// Randomness comes in through an injected `Rng` so callers control
/// determinism.

use glam::Vec2;
use rand::Rng;

use crate::config::{GameConfig, ShotConfig};
use crate::entities::{Assets, Craft, Projectile, Rect, VerticalIntent};

// ── Collision ────────────────────────────────────────────────────────────────

/// Anything with an axis-aligned bounding box.
pub trait Hitbox {
    fn hitbox(&self) -> Rect;
}

impl Hitbox for Craft {
    fn hitbox(&self) -> Rect {
        self.bounds()
    }
}

impl Hitbox for Projectile {
    fn hitbox(&self) -> Rect {
        self.bounds()
    }
}

impl Hitbox for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}

/// Strict AABB overlap.  Symmetric; touching edges do not collide.
pub fn has_collided(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    a.hitbox().overlaps(&b.hitbox())
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// The player craft at its configured starting point.
pub fn init_player(config: &GameConfig, assets: &Assets) -> Craft {
    Craft::new(
        "Player 1",
        config.player_start,
        assets.player,
        config.player_width,
        config.player_max_hp,
    )
}

/// A fresh enemy entering from the right edge at height `y`.
pub fn new_enemy(config: &GameConfig, assets: &Assets, y: f32) -> Craft {
    Craft::new(
        "enemy",
        Vec2::new(config.playfield_width, y),
        assets.enemy,
        config.enemy_width,
        config.enemy_max_hp,
    )
    .with_velocity(config.enemy_velocity)
}

/// Random enemy spawn height inside the configured margins.
pub fn roll_spawn_y(config: &GameConfig, rng: &mut impl Rng) -> f32 {
    let margin = config.enemy_spawn_margin;
    rng.gen_range(margin..config.playfield_height - margin)
}

fn shot(cfg: &ShotConfig, position: Vec2) -> Projectile {
    Projectile {
        position,
        velocity: Vec2::new(cfg.speed, 0.0),
        width: cfg.width,
        height: cfg.height,
        color: cfg.color,
        ap: cfg.damage,
    }
}

/// Player shot leaving the right edge of the craft at mid-height.
pub fn player_shot(config: &GameConfig, player: &Craft) -> Projectile {
    let origin = Vec2::new(
        player.position.x + player.width(),
        player.position.y + player.height() / 2.0,
    );
    shot(&config.player_shot, origin)
}

/// Enemy shot leaving the enemy's nose (its left edge) at mid-height.
pub fn enemy_shot(config: &GameConfig, enemy: &Craft) -> Projectile {
    let origin = Vec2::new(enemy.position.x, enemy.position.y + enemy.height() / 2.0);
    shot(&config.enemy_shot, origin)
}

// ── Per-tick rules ───────────────────────────────────────────────────────────

/// Next enemy shoot cooldown, uniform in `[min, max)`.
pub fn roll_cooldown(config: &GameConfig, rng: &mut impl Rng) -> u32 {
    rng.gen_range(config.enemy_shoot_cooldown_min..config.enemy_shoot_cooldown_max)
}

/// Vertical velocity for this frame.  Recomputed from scratch each frame;
/// a held direction is ignored once the player reaches that margin.
pub fn steer_player(config: &GameConfig, player: &Craft, intent: VerticalIntent) -> f32 {
    let margin = config.player_vertical_margin;
    match intent {
        VerticalIntent::Down
            if player.position.y + player.height() < config.playfield_height - margin =>
        {
            config.player_climb_speed
        }
        VerticalIntent::Up if player.position.y > margin => -config.player_climb_speed,
        _ => 0.0,
    }
}

/// Drop every item whose flag in `marked` is set.  Items past the end of
/// `marked` are kept.
pub fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !marked.get(idx).copied().unwrap_or(false);
        idx += 1;
        keep
    });
}
