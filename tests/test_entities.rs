use flight_shooter::entities::*;
use flight_shooter::surface::{DrawCall, RecordingSurface};

use glam::Vec2;

fn plane(kind: SpriteKind) -> Sprite {
    // 2:1 sprite → a 120-wide craft is 60 tall
    Sprite::new(kind, 240, 120)
}

fn make_craft() -> Craft {
    Craft::new("test", Vec2::new(100.0, 200.0), plane(SpriteKind::Enemy), 120.0, 30)
}

// ── Craft ─────────────────────────────────────────────────────────────────────

#[test]
fn craft_height_locked_to_sprite_aspect() {
    let c = make_craft();
    assert_eq!(c.width(), 120.0);
    assert_eq!(c.height(), 60.0);

    let tall = Craft::new("tall", Vec2::ZERO, Sprite::new(SpriteKind::Player, 100, 300), 50.0, 10);
    assert_eq!(tall.height(), 150.0);
}

#[test]
fn craft_height_survives_sprite_swap() {
    let mut c = make_craft();
    c.sprite = Sprite::new(SpriteKind::EnemyDestroyed, 100, 100);
    assert_eq!(c.height(), 60.0);
}

#[test]
fn craft_starts_at_full_health() {
    let c = make_craft();
    assert_eq!(c.hp, 30);
    assert_eq!(c.max_hp, 30);
    assert_eq!(c.shoot_cooldown, 0);
    assert!(!c.scored);
    assert_eq!(c.velocity, Vec2::ZERO);
}

#[test]
fn craft_advance_adds_velocity() {
    let mut c = make_craft().with_velocity(Vec2::new(-3.0, 2.0));
    c.advance(1);
    assert_eq!(c.position, Vec2::new(97.0, 202.0));
    c.advance(2);
    assert_eq!(c.position, Vec2::new(91.0, 206.0));
}

#[test]
fn craft_health_may_go_negative() {
    let mut c = make_craft();
    c.hp -= 35;
    assert_eq!(c.hp, -5);
    assert!(c.is_defeated());

    c.hp = 0;
    assert!(c.is_defeated());
    c.hp = 1;
    assert!(!c.is_defeated());
}

#[test]
fn craft_render_draws_health_bar_then_sprite() {
    let mut c = make_craft();
    c.hp = 15;
    let mut s = RecordingSurface::new();
    c.render(&mut s);

    assert_eq!(
        s.calls,
        vec![
            DrawCall::Rect { rect: Rect::new(100.0, 180.0, 120.0, 5.0), color: Rgb::RED },
            DrawCall::Rect { rect: Rect::new(100.0, 180.0, 60.0, 5.0), color: Rgb::GREEN },
            DrawCall::Image { kind: SpriteKind::Enemy, dest: Rect::new(100.0, 200.0, 120.0, 60.0) },
        ]
    );
}

#[test]
fn craft_render_skips_green_bar_when_defeated() {
    let mut c = make_craft();
    c.hp = -10;
    let mut s = RecordingSurface::new();
    c.render(&mut s);

    let greens = s
        .calls
        .iter()
        .filter(|call| matches!(call, DrawCall::Rect { color, .. } if *color == Rgb::GREEN))
        .count();
    assert_eq!(greens, 0);
    assert_eq!(s.images(SpriteKind::Enemy).count(), 1);
}

// ── Projectile ────────────────────────────────────────────────────────────────

fn make_shot(vx: f32) -> Projectile {
    Projectile {
        position: Vec2::new(50.0, 80.0),
        velocity: Vec2::new(vx, 7.0),
        width: 15.0,
        height: 2.0,
        color: Rgb::hex(0xFF5722),
        ap: 10,
    }
}

#[test]
fn projectile_moves_horizontally_only() {
    let mut p = make_shot(10.0);
    p.advance(1);
    assert_eq!(p.position, Vec2::new(60.0, 80.0));
}

#[test]
fn projectile_glow_leads_rightward_shot() {
    let p = make_shot(10.0);
    let mut s = RecordingSurface::new();
    p.render(&mut s);

    assert_eq!(s.calls.len(), 2);
    match &s.calls[0] {
        DrawCall::Circle { center, radius, alpha, color } => {
            assert_eq!(*radius, 5.0);
            assert_eq!(*center, Vec2::new(50.0 + 15.0 + 2.5, 81.0));
            assert_eq!(*alpha, 0.75);
            assert_eq!(*color, p.color);
        }
        other => panic!("expected glow first, got {other:?}"),
    }
    assert_eq!(s.calls[1], DrawCall::Rect { rect: p.bounds(), color: p.color });
}

#[test]
fn projectile_glow_leads_leftward_shot() {
    let p = make_shot(-10.0);
    let mut s = RecordingSurface::new();
    p.render(&mut s);

    match &s.calls[0] {
        DrawCall::Circle { center, .. } => assert_eq!(center.x, 50.0 - 2.5),
        other => panic!("expected glow first, got {other:?}"),
    }
}

// ── Geometry & colour ─────────────────────────────────────────────────────────

#[test]
fn rect_edges() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.left(), 10.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.top(), 20.0);
    assert_eq!(r.bottom(), 60.0);
}

#[test]
fn rgb_hex_and_blend() {
    let c = Rgb::hex(0x81D4FA);
    assert_eq!((c.r, c.g, c.b), (0x81, 0xD4, 0xFA));

    let black = Rgb::hex(0x000000);
    assert_eq!(Rgb::WHITE.blend_over(black, 1.0), Rgb::WHITE);
    assert_eq!(Rgb::WHITE.blend_over(black, 0.0), black);
    assert_eq!(Rgb::WHITE.blend_over(black, 0.5), Rgb::hex(0x808080));
}

#[test]
fn vertical_intent_defaults_to_none() {
    assert_eq!(VerticalIntent::default(), VerticalIntent::None);
    assert_ne!(GameStatus::Running, GameStatus::GameOver);
}
