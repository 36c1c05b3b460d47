/// Gameplay tuning.  Defaults reproduce the original 1024x768 encounter.
///
/// Everything here is validated once, when the world is built; the frame loop
/// trusts these numbers afterwards.

use std::time::Duration;

use glam::Vec2;

use crate::entities::{Assets, Rgb, Sprite};
use crate::error::GameError;

/// Size, speed, damage and colour of one kind of shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotConfig {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in pixels per tick; the sign encodes allegiance.
    pub speed: f32,
    pub damage: i32,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub background: Rgb,
    pub score_color: Rgb,
    pub score_position: Vec2,

    pub enemy_spawn_interval: Duration,
    pub max_enemies: usize,
    /// Enemies spawn with `y` in `[margin, playfield_height - margin)`.
    pub enemy_spawn_margin: f32,
    pub enemy_width: f32,
    pub enemy_max_hp: i32,
    pub enemy_velocity: Vec2,
    pub enemy_fall_speed: f32,
    /// Cooldown after an enemy shot is drawn from `min..max`.
    pub enemy_shoot_cooldown_min: u32,
    pub enemy_shoot_cooldown_max: u32,

    pub player_start: Vec2,
    pub player_width: f32,
    pub player_max_hp: i32,
    pub player_climb_speed: f32,
    /// Distance the player keeps from the top and bottom edges.
    pub player_vertical_margin: f32,

    pub player_shot: ShotConfig,
    pub enemy_shot: ShotConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 1024.0,
            playfield_height: 768.0,
            background: Rgb::hex(0x81D4FA),
            score_color: Rgb::WHITE,
            score_position: Vec2::new(10.0, 50.0),

            enemy_spawn_interval: Duration::from_millis(2000),
            max_enemies: 5,
            enemy_spawn_margin: 50.0,
            enemy_width: 120.0,
            enemy_max_hp: 30,
            enemy_velocity: Vec2::new(-3.0, 0.0),
            enemy_fall_speed: 10.0,
            enemy_shoot_cooldown_min: 50,
            enemy_shoot_cooldown_max: 200,

            player_start: Vec2::new(80.0, 600.0),
            player_width: 120.0,
            player_max_hp: 100,
            player_climb_speed: 15.0,
            player_vertical_margin: 20.0,

            player_shot: ShotConfig {
                width: 15.0,
                height: 2.0,
                speed: 10.0,
                damage: 10,
                color: Rgb::hex(0xFF5722),
            },
            enemy_shot: ShotConfig {
                width: 15.0,
                height: 2.0,
                speed: -10.0,
                damage: 5,
                color: Rgb::hex(0xFF23FF),
            },
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(GameError::config("playfield", "width and height must be positive"));
        }
        if self.enemy_spawn_interval.is_zero() {
            return Err(GameError::config("enemy_spawn_interval", "must be non-zero"));
        }
        if self.enemy_spawn_margin < 0.0 || self.enemy_spawn_margin * 2.0 >= self.playfield_height {
            return Err(GameError::config(
                "enemy_spawn_margin",
                format!(
                    "{} leaves no spawn band inside a playfield {} high",
                    self.enemy_spawn_margin, self.playfield_height
                ),
            ));
        }
        if self.enemy_shoot_cooldown_min >= self.enemy_shoot_cooldown_max {
            return Err(GameError::config(
                "enemy_shoot_cooldown",
                format!(
                    "range {}..{} is empty",
                    self.enemy_shoot_cooldown_min, self.enemy_shoot_cooldown_max
                ),
            ));
        }
        if self.enemy_width <= 0.0 || self.player_width <= 0.0 {
            return Err(GameError::config("craft width", "must be positive"));
        }
        if self.enemy_max_hp <= 0 || self.player_max_hp <= 0 {
            return Err(GameError::config("max hp", "must be positive"));
        }
        if self.enemy_velocity.x >= 0.0 {
            return Err(GameError::config("enemy_velocity", "enemies must fly left"));
        }
        validate_shot("player_shot", &self.player_shot, 1.0)?;
        validate_shot("enemy_shot", &self.enemy_shot, -1.0)?;
        Ok(())
    }
}

/// Every sprite needs a non-zero size: craft heights are derived from the
/// sprite's aspect ratio.
pub fn validate_assets(assets: &Assets) -> Result<(), GameError> {
    let sprites = [&assets.player, &assets.enemy, &assets.enemy_destroyed];
    match sprites.into_iter().find(|s| s.width == 0 || s.height == 0) {
        Some(Sprite { kind, width, height }) => Err(GameError::config(
            "assets",
            format!("{kind:?} sprite is {width}x{height}"),
        )),
        None => Ok(()),
    }
}

fn validate_shot(field: &'static str, shot: &ShotConfig, direction: f32) -> Result<(), GameError> {
    if shot.width <= 0.0 || shot.height <= 0.0 {
        return Err(GameError::config(field, "size must be positive"));
    }
    if shot.speed * direction <= 0.0 {
        let side = if direction > 0.0 { "right" } else { "left" };
        return Err(GameError::config(field, format!("must travel {side}")));
    }
    if shot.damage < 0 {
        return Err(GameError::config(field, "damage must not be negative"));
    }
    Ok(())
}
