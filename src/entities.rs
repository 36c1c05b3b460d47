/// All game entity types and the small amount of behaviour each entity owns:
/// advancing itself by one tick and drawing itself onto a `Surface`.
///
/// Entities never reference the world or each other.  Everything that
/// involves more than one entity lives in `compute` and `world`.

use glam::Vec2;

use crate::surface::Surface;

// ── Colours & geometry ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);
    pub const RED: Rgb = Rgb::hex(0xFF0000);
    pub const GREEN: Rgb = Rgb::hex(0x008000);

    /// Build a colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// Alpha-composite `self` over `below`.
    pub fn blend_over(self, below: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| (top as f32 * a + bottom as f32 * (1.0 - a)).round() as u8;
        Rgb {
            r: mix(self.r, below.r),
            g: mix(self.g, below.g),
            b: mix(self.b, below.b),
        }
    }
}

/// Axis-aligned box with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ── Sprites ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Enemy,
    EnemyDestroyed,
}

/// A pre-loaded visual asset.  Only its pixel dimensions matter to the
/// simulation; the surface decides what the pixels look like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub fn new(kind: SpriteKind, width: u32, height: u32) -> Self {
        Self { kind, width, height }
    }

    /// `height / width`, used to lock a craft's height to its sprite.
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assets {
    pub player: Sprite,
    pub enemy: Sprite,
    pub enemy_destroyed: Sprite,
}

// ── Craft ────────────────────────────────────────────────────────────────────

const HEALTH_BAR_OFFSET: f32 = 20.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;

/// Any flying entity with health and a sprite: the player or an enemy.
#[derive(Clone, Debug)]
pub struct Craft {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub sprite: Sprite,
    /// May go negative; treat `hp <= 0` as defeated.
    pub hp: i32,
    pub max_hp: i32,
    /// Ticks until the next enemy shot.  Driven by the world, not the craft.
    pub shoot_cooldown: u32,
    /// Set once the kill has been counted.
    pub scored: bool,
    width: f32,
    height: f32,
}

impl Craft {
    /// Height is derived from `width` and the sprite's aspect ratio here and
    /// never recomputed, even when the sprite is later swapped.
    pub fn new(name: impl Into<String>, position: Vec2, sprite: Sprite, width: f32, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec2::ZERO,
            sprite,
            hp: max_hp,
            max_hp,
            shoot_cooldown: 0,
            scored: false,
            width,
            height: width * sprite.aspect(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            origin: self.position,
            size: Vec2::new(self.width, self.height),
        }
    }

    /// Euler step: `ticks` whole frames of the current velocity.
    pub fn advance(&mut self, ticks: u32) {
        self.position += self.velocity * ticks as f32;
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let bar_y = self.position.y - HEALTH_BAR_OFFSET;
        surface.fill_rect(
            Rect::new(self.position.x, bar_y, self.width, HEALTH_BAR_HEIGHT),
            Rgb::RED,
        );

        let remaining = self.hp as f32 / self.max_hp as f32;
        if remaining > 0.0 {
            surface.fill_rect(
                Rect::new(self.position.x, bar_y, self.width * remaining, HEALTH_BAR_HEIGHT),
                Rgb::GREEN,
            );
        }

        surface.draw_image(&self.sprite, self.bounds());
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

const GLOW_ALPHA: f32 = 0.75;

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec2,
    /// Only `x` is integrated; shots fly strictly horizontally.
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    /// Armour-piercing value, i.e. damage dealt on hit.
    pub ap: i32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn advance(&mut self, ticks: u32) {
        self.position.x += self.velocity.x * ticks as f32;
    }

    /// A translucent glow ahead of the body, then the body itself.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let radius = self.width / 3.0;
        let glow_x = if self.velocity.x > 0.0 {
            self.position.x + self.width + radius / 2.0
        } else {
            self.position.x - radius / 2.0
        };

        surface.fill_circle(
            Vec2::new(glow_x, self.position.y + self.height / 2.0),
            radius,
            self.color,
            GLOW_ALPHA,
        );
        surface.fill_rect(self.bounds(), self.color);
    }
}

// ── World-level enums ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Current held vertical input, reported continuously by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalIntent {
    Up,
    Down,
    #[default]
    None,
}
