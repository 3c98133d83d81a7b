//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod checkpoint;
pub mod collision;
pub mod combat;
pub mod event;
pub mod fx;
pub mod level;
pub mod physics;
pub mod projectile;
pub mod state;
pub mod tick;

pub use checkpoint::CheckpointTracker;
pub use collision::{Rect, resolve_platforms};
pub use event::GameEvent;
pub use fx::{DamageText, Effects, Particle};
pub use state::{Enemy, EnemyKind, EnemyState, GamePhase, GameState, Owner, Platform, Player, Projectile};
pub use tick::{Intents, tick};
