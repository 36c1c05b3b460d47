use std::time::Duration;

use flight_shooter::config::{validate_assets, GameConfig};
use flight_shooter::entities::{Assets, Sprite, SpriteKind};
use flight_shooter::error::GameError;

use glam::Vec2;

fn rejected_field(config: GameConfig) -> &'static str {
    match config.validate() {
        Err(GameError::InvalidConfig { field, .. }) => field,
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn defaults_are_valid() {
    assert_eq!(GameConfig::default().validate(), Ok(()));
}

#[test]
fn defaults_match_original_encounter() {
    let c = GameConfig::default();
    assert_eq!((c.playfield_width, c.playfield_height), (1024.0, 768.0));
    assert_eq!(c.enemy_spawn_interval, Duration::from_millis(2000));
    assert_eq!(c.max_enemies, 5);
    assert_eq!((c.enemy_shoot_cooldown_min, c.enemy_shoot_cooldown_max), (50, 200));
    assert_eq!(c.player_shot.damage, 10);
    assert_eq!(c.enemy_shot.damage, 5);
}

#[test]
fn empty_cooldown_range_rejected() {
    let config = GameConfig {
        enemy_shoot_cooldown_min: 100,
        enemy_shoot_cooldown_max: 100,
        ..GameConfig::default()
    };
    assert_eq!(rejected_field(config), "enemy_shoot_cooldown");
}

#[test]
fn oversized_spawn_margin_rejected() {
    let config = GameConfig {
        enemy_spawn_margin: 384.0,
        ..GameConfig::default()
    };
    assert_eq!(rejected_field(config), "enemy_spawn_margin");
}

#[test]
fn zero_spawn_interval_rejected() {
    let config = GameConfig {
        enemy_spawn_interval: Duration::ZERO,
        ..GameConfig::default()
    };
    assert_eq!(rejected_field(config), "enemy_spawn_interval");
}

#[test]
fn shots_must_fly_toward_the_other_side() {
    let mut config = GameConfig::default();
    config.enemy_shot.speed = 10.0;
    assert_eq!(rejected_field(config), "enemy_shot");

    let mut config = GameConfig::default();
    config.player_shot.speed = -10.0;
    assert_eq!(rejected_field(config), "player_shot");
}

#[test]
fn enemies_must_fly_left() {
    let config = GameConfig {
        enemy_velocity: Vec2::new(3.0, 0.0),
        ..GameConfig::default()
    };
    assert_eq!(rejected_field(config), "enemy_velocity");
}

#[test]
fn error_message_names_the_field() {
    let config = GameConfig {
        enemy_shoot_cooldown_min: 9,
        enemy_shoot_cooldown_max: 3,
        ..GameConfig::default()
    };
    let msg = config.validate().unwrap_err().to_string();
    assert!(msg.contains("enemy_shoot_cooldown"), "{msg}");
    assert!(msg.contains("9..3"), "{msg}");
}

fn sprites() -> Assets {
    Assets {
        player: Sprite::new(SpriteKind::Player, 240, 120),
        enemy: Sprite::new(SpriteKind::Enemy, 200, 100),
        enemy_destroyed: Sprite::new(SpriteKind::EnemyDestroyed, 200, 100),
    }
}

#[test]
fn sized_sprites_accepted() {
    assert_eq!(validate_assets(&sprites()), Ok(()));
}

#[test]
fn zero_sized_sprite_rejected() {
    let mut assets = sprites();
    assets.enemy_destroyed = Sprite::new(SpriteKind::EnemyDestroyed, 200, 0);
    match validate_assets(&assets) {
        Err(GameError::InvalidConfig { field, reason }) => {
            assert_eq!(field, "assets");
            assert!(reason.contains("EnemyDestroyed"), "{reason}");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }

    let mut assets = sprites();
    assets.player = Sprite::new(SpriteKind::Player, 0, 120);
    assert!(validate_assets(&assets).is_err());
}
