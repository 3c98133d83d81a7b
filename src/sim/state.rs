//! Game state and core simulation types
//!
//! The tick loop is the only writer of everything in here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::checkpoint::CheckpointTracker;
use super::collision::Rect;
use super::event::GameEvent;
use super::fx::Effects;
use crate::consts::TICK_MS;
use crate::roster::CharacterStats;
use crate::tuning::Tuning;

/// Current status of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scene transition work in flight; the loop idles
    Cutscene,
    /// Active gameplay
    Playing,
    /// Active gameplay after the boss has noticed the player
    BossFight,
    /// Game is paused
    Paused,
    /// Player hp reached zero
    GameOver,
    /// Boss defeated
    Victory,
}

impl GamePhase {
    /// Whether ticks advance the simulation
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::BossFight)
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub grounded: bool,
    /// Sim time of the last registered attack
    pub last_attack_ms: Option<f64>,
    /// Remaining ticks of the current swing
    pub attack_ticks: u32,
    /// Remaining ticks of post-hit immunity
    pub invulnerable_ticks: u32,
    pub hp: i32,
    pub max_hp: i32,
}

impl Player {
    pub fn new(pos: Vec2, width: f32, height: f32, hp: i32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            width,
            height,
            facing: 1.0,
            grounded: false,
            last_attack_ms: None,
            attack_ticks: 0,
            invulnerable_ticks: 0,
            hp,
            max_hp: hp,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_ticks > 0
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks up to the player and strikes at close range
    Melee,
    /// Keeps walking toward the player and fires aimed shots
    Ranged,
    /// Chapter boss: volley attack, stands its ground at close range
    Boss,
}

/// Enemy behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Patrol,
    Aggro,
    Attack,
    Dead,
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Knockback velocity (walking is applied directly from `speed`)
    pub vel: Vec2,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub state: EnemyState,
    pub facing: f32,
    pub last_attack_ms: Option<f64>,
    pub attack_cooldown_ms: f64,
    pub patrol_origin: f32,
    pub patrol_range: f32,
    pub hit_flash_ticks: u32,
    /// Remaining ticks of the attack animation
    pub attack_ticks: u32,
    /// Remaining ticks before a dead enemy leaves the active set
    pub corpse_ticks: u32,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Whether the attack cooldown has elapsed at `now_ms`
    pub fn attack_ready(&self, now_ms: f64) -> bool {
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms - last > self.attack_cooldown_ms,
        }
    }

    /// Fraction of hp remaining (for hp bars)
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A ranged attack in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub owner: Owner,
    pub color: [f32; 4],
}

/// A static, axis-aligned platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Complete simulation state for one chapter run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Effective character stats (upgrades applied)
    pub stats: CharacterStats,
    pub chapter: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub platforms: Vec<Platform>,
    /// Particles and damage numbers (never read by gameplay)
    pub fx: Effects,
    pub checkpoint: CheckpointTracker,
    /// Outbound signals produced this frame, drained by the host
    pub events: Vec<GameEvent>,
    pub victory_signaled: bool,
    pub game_over_signaled: bool,
    pub boss_encountered: bool,
    next_id: u32,
}

impl GameState {
    /// Create a new chapter run. The level is built immediately; the phase
    /// starts in `Cutscene` until the host calls [`GameState::start`].
    pub fn new(seed: u64, stats: CharacterStats, chapter: u32, tuning: Tuning) -> Self {
        let player = Player::new(
            Vec2::new(tuning.spawn_x, tuning.spawn_y),
            tuning.player_width,
            tuning.player_height,
            stats.hp,
        );
        let checkpoint = CheckpointTracker::new(tuning.checkpoint_bucket);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            stats,
            chapter,
            phase: GamePhase::Cutscene,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            platforms: Vec::new(),
            fx: Effects::default(),
            checkpoint,
            events: Vec::new(),
            victory_signaled: false,
            game_over_signaled: false,
            boss_encountered: false,
            next_id: 1,
        };

        super::level::build_level(&mut state);

        state
    }

    /// Place the player at a saved checkpoint and treat its bucket as already saved
    pub fn resume_at_checkpoint(&mut self, x: f32) {
        let x = x.max(0.0);
        self.player.pos.x = x;
        self.checkpoint = CheckpointTracker::resume(self.tuning.checkpoint_bucket, x);
    }

    /// Begin active play (after scene transition work has settled)
    pub fn start(&mut self) {
        if self.phase == GamePhase::Cutscene {
            self.phase = if self.boss_encountered {
                GamePhase::BossFight
            } else {
                GamePhase::Playing
            };
            self.emit(GameEvent::PlayerHpChanged { hp: self.player.hp });
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * TICK_MS
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending outbound events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The chapter boss, if still in the active set
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
