//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is
//! one 1/60 s step; every tuning value is expressed per tick.

use super::ai::update_enemies;
use super::collision::resolve_platforms;
use super::combat::resolve_player_attack;
use super::event::GameEvent;
use super::physics::integrate_player;
use super::projectile::update_projectiles;
use super::state::GameState;

/// Abstract control intents for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub attack: bool,
}

impl Intents {
    /// Logical OR of two snapshots
    pub fn merge(self, other: Intents) -> Intents {
        Intents {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            jump: self.jump || other.jump,
            attack: self.attack || other.attack,
        }
    }

    pub fn any(&self) -> bool {
        self.move_left || self.move_right || self.jump || self.attack
    }
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing unless the phase is `Playing` or `BossFight`.
pub fn tick(state: &mut GameState, intents: &Intents) {
    if !state.phase.is_active() {
        return;
    }

    state.time_ticks += 1;

    // Player movement
    integrate_player(&mut state.player, intents, &state.stats, &state.tuning);
    resolve_platforms(&mut state.player, &state.platforms);

    // Melee
    resolve_player_attack(state, intents.attack);

    update_projectiles(state);
    update_enemies(state);

    let tuning = &state.tuning;
    state.fx.update(tuning.particle_decay, tuning.damage_text_rise, tuning.damage_text_decay);

    if let Some(bucket) = state.checkpoint.observe(state.player.pos.x) {
        state.emit(GameEvent::CheckpointReached { x: bucket });
        log::debug!("Checkpoint bucket {bucket}");
    }

    state.player.invulnerable_ticks = state.player.invulnerable_ticks.saturating_sub(1);

    state.normalize_order();
}
