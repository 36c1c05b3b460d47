/// The simulation loop.
///
/// `World` owns every live entity.  An external scheduler calls
/// `advance_frame` once per display refresh and, independently, polls the
/// spawner.  Both run on the same thread, so appends from the spawner can
/// never interleave with a frame's iterate-and-prune passes.
///
/// Removals inside a pass are deferred: entities are flagged while the pass
/// iterates and the collection is rebuilt once at the end of that pass.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::compute::{
    enemy_shot, has_collided, new_enemy, player_shot, retain_unmarked, roll_cooldown,
    roll_spawn_y, steer_player,
};
use crate::config::{validate_assets, GameConfig};
use crate::entities::{Assets, Craft, GameStatus, Projectile, Rect, VerticalIntent};
use crate::error::GameError;
use crate::surface::Surface;

// ── Spawn timer ──────────────────────────────────────────────────────────────

/// Wall-clock periodic timer, independent of the frame rate.
#[derive(Clone, Debug)]
pub struct SpawnTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl SpawnTimer {
    /// A stopped timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True when a firing is due.  Reports at most one firing per call; a
    /// driver that stalled for several intervals does not get a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}

// ── World ────────────────────────────────────────────────────────────────────

type GameOverHook = Box<dyn FnMut(u32)>;

pub struct World {
    config: GameConfig,
    assets: Assets,
    rng: StdRng,
    player: Option<Craft>,
    enemies: Vec<Craft>,
    player_projectiles: Vec<Projectile>,
    enemy_projectiles: Vec<Projectile>,
    score: u32,
    status: GameStatus,
    intent: VerticalIntent,
    spawner: SpawnTimer,
    frame: u64,
    on_game_over: Option<GameOverHook>,
    /// Reused per pass to flag entities for removal.
    marked: Vec<bool>,
}

impl World {
    /// Validates `config` and `assets` once; the frame loop trusts them afterwards.
    pub fn new(config: GameConfig, assets: Assets, rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;
        validate_assets(&assets)?;
        let spawner = SpawnTimer::new(config.enemy_spawn_interval);
        Ok(Self {
            config,
            assets,
            rng,
            player: None,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            score: 0,
            status: GameStatus::Running,
            intent: VerticalIntent::None,
            spawner,
            frame: 0,
            on_game_over: None,
            marked: Vec::new(),
        })
    }

    pub fn with_seed(config: GameConfig, assets: Assets, seed: u64) -> Result<Self, GameError> {
        Self::new(config, assets, StdRng::seed_from_u64(seed))
    }

    // ── External interface ───────────────────────────────────────────────────

    pub fn set_player(&mut self, player: Craft) {
        debug!(name = %player.name, hp = player.hp, "player bound");
        self.player = Some(player);
    }

    /// Called exactly once, with the final score, when the player is destroyed.
    pub fn on_game_over(&mut self, hook: impl FnMut(u32) + 'static) {
        self.on_game_over = Some(Box::new(hook));
    }

    pub fn set_vertical_intent(&mut self, intent: VerticalIntent) {
        self.intent = intent;
    }

    /// One new player shot per call.  Ignored once the game is over.
    pub fn handle_fire_input(&mut self) -> Result<(), GameError> {
        let player = self.player.as_ref().ok_or(GameError::NoPlayer)?;
        if self.status == GameStatus::GameOver {
            return Ok(());
        }
        let shot = player_shot(&self.config, player);
        debug!(x = shot.position.x, y = shot.position.y, "player fired");
        self.player_projectiles.push(shot);
        Ok(())
    }

    /// Run one tick: steer, update every entity, resolve hits, prune, and
    /// check for the terminal state.  A no-op after game over.
    pub fn advance_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<GameStatus, GameError> {
        if self.status == GameStatus::GameOver {
            return Ok(GameStatus::GameOver);
        }

        let Self {
            config,
            assets,
            rng,
            player,
            enemies,
            player_projectiles,
            enemy_projectiles,
            score,
            intent,
            frame,
            marked,
            ..
        } = self;
        let player = player.as_mut().ok_or(GameError::NoPlayer)?;

        // ── 1. Background, score, player ─────────────────────────────────────
        player.velocity.y = steer_player(config, player, *intent);

        surface.fill_rect(
            Rect::new(0.0, 0.0, config.playfield_width, config.playfield_height),
            config.background,
        );
        surface.fill_text(&format!("Score: {score}"), config.score_position, config.score_color);

        player.advance(1);
        player.render(surface);

        // ── 2. Player shots vs enemies ───────────────────────────────────────
        reset_marks(marked, player_projectiles.len());
        for (idx, shot) in player_projectiles.iter_mut().enumerate() {
            if shot.position.x > config.playfield_width {
                marked[idx] = true;
            }

            // Falling wrecks still soak up shots; `scored` keeps the kill counted once.
            if let Some(enemy) = enemies.iter_mut().find(|e| has_collided(&*shot, &**e))
            {
                enemy.hp -= shot.ap;
                marked[idx] = true;
                debug!(hp = enemy.hp, damage = shot.ap, "enemy hit");
            }

            shot.advance(1);
            shot.render(surface);
        }
        retain_unmarked(player_projectiles, marked);

        // ── 3. Enemy shots vs player ─────────────────────────────────────────
        reset_marks(marked, enemy_projectiles.len());
        for (idx, shot) in enemy_projectiles.iter_mut().enumerate() {
            if shot.position.x < 0.0 {
                marked[idx] = true;
            }

            if has_collided(&*shot, &*player) {
                player.hp -= shot.ap;
                marked[idx] = true;
                debug!(hp = player.hp, damage = shot.ap, "player hit");
            }

            shot.advance(1);
            shot.render(surface);
        }
        retain_unmarked(enemy_projectiles, marked);

        // ── 4. Enemies: wreckage, scoring, return fire ───────────────────────
        reset_marks(marked, enemies.len());
        for (idx, enemy) in enemies.iter_mut().enumerate() {
            if enemy.position.x + enemy.width() < 0.0 || enemy.position.y > config.playfield_height {
                marked[idx] = true;
            }

            if enemy.is_defeated() {
                enemy.sprite = assets.enemy_destroyed;
                enemy.velocity.y = config.enemy_fall_speed;

                if !enemy.scored {
                    enemy.scored = true;
                    *score += 1;
                    debug!(score = *score, "enemy destroyed");
                }
            } else if enemy.shoot_cooldown == 0 {
                enemy_projectiles.push(enemy_shot(config, enemy));
                enemy.shoot_cooldown = roll_cooldown(config, rng);
            } else {
                enemy.shoot_cooldown -= 1;
            }

            enemy.advance(1);
            enemy.render(surface);
        }
        retain_unmarked(enemies, marked);

        *frame += 1;

        if player.is_defeated() {
            self.finish();
        }
        Ok(self.status)
    }

    // ── Spawner ──────────────────────────────────────────────────────────────

    pub fn start_spawner(&mut self, now: Instant) {
        self.spawner.start(now);
    }

    /// Fire the spawner if its interval has elapsed.  Returns whether an
    /// enemy was created.
    pub fn poll_spawner(&mut self, now: Instant) -> bool {
        self.spawner.poll(now) && self.spawn_enemy()
    }

    /// Spawn at a random height, unless the live enemy cap is reached.
    pub fn spawn_enemy(&mut self) -> bool {
        if !self.can_spawn() {
            return false;
        }
        let y = roll_spawn_y(&self.config, &mut self.rng);
        self.spawn_enemy_at(y)
    }

    pub fn spawn_enemy_at(&mut self, y: f32) -> bool {
        if !self.can_spawn() {
            return false;
        }
        self.enemies.push(new_enemy(&self.config, &self.assets, y));
        debug!(y, live = self.enemies.len(), "enemy spawned");
        true
    }

    fn can_spawn(&self) -> bool {
        self.status == GameStatus::Running && self.enemies.len() < self.config.max_enemies
    }

    // ── Terminal transition ──────────────────────────────────────────────────

    fn finish(&mut self) {
        self.status = GameStatus::GameOver;
        self.spawner.stop();
        info!(score = self.score, frame = self.frame, "game over");
        if let Some(mut hook) = self.on_game_over.take() {
            hook(self.score);
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn player(&self) -> Option<&Craft> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Craft> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> &[Craft] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Craft] {
        &mut self.enemies
    }

    pub fn player_projectiles(&self) -> &[Projectile] {
        &self.player_projectiles
    }

    pub fn enemy_projectiles(&self) -> &[Projectile] {
        &self.enemy_projectiles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn vertical_intent(&self) -> VerticalIntent {
        self.intent
    }

    /// Completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_spawner_running(&self) -> bool {
        self.spawner.is_running()
    }
}

fn reset_marks(marked: &mut Vec<bool>, len: usize) {
    marked.clear();
    marked.resize(len, false);
}
