//! Melee combat and player damage
//!
//! The player's attack is resolved at the moment it registers: one hitbox
//! test against every living enemy, then the cooldown gate closes until
//! `attack_cooldown_ms` has passed.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::event::GameEvent;
use super::fx::{BLOOD_COLOR, DEATH_COLOR, SPARK_COLOR};
use super::state::{EnemyState, GamePhase, GameState, Player};
use crate::tuning::Tuning;

/// Outcome of one registered attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackReport {
    pub hits: u32,
    pub kills: u32,
    pub damage_dealt: i32,
}

/// The melee hitbox: a fixed-width box beside the player on the facing side,
/// padded vertically above and below the body.
pub fn hitbox(player: &Player, tuning: &Tuning) -> Rect {
    let x = if player.facing >= 0.0 {
        player.pos.x + player.width
    } else {
        player.pos.x - tuning.hitbox_width
    };
    Rect::new(
        x,
        player.pos.y - tuning.hitbox_vertical_pad,
        tuning.hitbox_width,
        player.height + tuning.hitbox_vertical_pad * 2.0,
    )
}

/// Whether the player's attack cooldown has elapsed at `now_ms`
pub fn attack_ready(player: &Player, tuning: &Tuning, now_ms: f64) -> bool {
    match player.last_attack_ms {
        None => true,
        Some(last) => now_ms - last > tuning.attack_cooldown_ms,
    }
}

/// Combat step: count down the current swing, then register a new attack
/// if requested and off cooldown. Returns a report when an attack registered.
pub fn resolve_player_attack(state: &mut GameState, attack: bool) -> Option<AttackReport> {
    state.player.attack_ticks = state.player.attack_ticks.saturating_sub(1);

    let now = state.now_ms();
    if !attack || !attack_ready(&state.player, &state.tuning, now) {
        return None;
    }

    state.player.last_attack_ms = Some(now);
    state.player.attack_ticks = state.tuning.attack_window_ticks();

    let area = hitbox(&state.player, &state.tuning);
    let facing = state.player.facing;
    let mut report = AttackReport::default();

    for idx in 0..state.enemies.len() {
        let enemy = &state.enemies[idx];
        if enemy.is_dead() || !area.overlaps(&enemy.bounds()) {
            continue;
        }
        let bonus = if state.tuning.attack_bonus_max > 0 {
            state.rng.random_range(0..=state.tuning.attack_bonus_max)
        } else {
            0
        };
        let damage = (state.stats.attack + bonus).max(0);
        report.hits += 1;
        report.damage_dealt += damage;
        if strike_enemy(state, idx, damage, facing) {
            report.kills += 1;
        }
    }

    Some(report)
}

/// Apply one hit to an enemy. Returns true if this hit killed it.
fn strike_enemy(state: &mut GameState, idx: usize, damage: i32, facing: f32) -> bool {
    let tuning = &state.tuning;
    let knockback = tuning.knockback;
    let boss_scale = tuning.boss_knockback_scale;
    let flash = tuning.hit_flash_ticks;
    let corpse = tuning.corpse_ticks;
    let burst_count = tuning.burst_count;
    let burst_speed = tuning.particle_speed;
    let reward = (tuning.enemy_reward, tuning.boss_reward);

    let enemy = &mut state.enemies[idx];
    enemy.hp = (enemy.hp - damage).max(0);
    enemy.hit_flash_ticks = flash;
    let scale = if enemy.is_boss() { boss_scale } else { 1.0 };
    enemy.vel.x = facing * knockback * scale;

    let center = enemy.center();
    let top = enemy.pos.y;
    let is_boss = enemy.is_boss();
    let killed = enemy.hp <= 0;
    if killed {
        enemy.state = EnemyState::Dead;
        enemy.vel = Vec2::ZERO;
        enemy.attack_ticks = 0;
        enemy.corpse_ticks = corpse;
    }

    state.fx.burst(&mut state.rng, center, SPARK_COLOR, burst_count + 4, burst_speed);
    state.fx.callout(Vec2::new(center.x, top), damage.to_string(), SPARK_COLOR);

    if killed {
        state.fx.burst(&mut state.rng, center, DEATH_COLOR, burst_count * 2, burst_speed);
        if is_boss {
            state.emit(GameEvent::CurrencyCollected { amount: reward.1 });
            if !state.victory_signaled {
                state.victory_signaled = true;
                state.phase = GamePhase::Victory;
                state.emit(GameEvent::Victory);
                log::info!("Boss defeated at tick {}", state.time_ticks);
            }
        } else {
            state.emit(GameEvent::CurrencyCollected { amount: reward.0 });
        }
    }

    killed
}

/// Deal damage to the player unless the invulnerability window is open.
/// Returns true if damage was applied.
pub fn hurt_player(state: &mut GameState, amount: i32) -> bool {
    if !state.phase.is_active() || state.player.invulnerable_ticks > 0 || state.player.hp <= 0 {
        return false;
    }

    let amount = amount.max(0);
    state.player.hp = (state.player.hp - amount).max(0);
    state.player.invulnerable_ticks = state.tuning.invulnerability_ticks;

    let center = state.player.center();
    let count = state.tuning.burst_count + 2;
    let speed = state.tuning.particle_speed;
    state.fx.burst(&mut state.rng, center, BLOOD_COLOR, count, speed);
    state.fx.callout(
        Vec2::new(center.x, state.player.pos.y),
        format!("-{amount}"),
        BLOOD_COLOR,
    );

    let hp = state.player.hp;
    state.emit(GameEvent::PlayerHpChanged { hp });

    if hp == 0 && !state.game_over_signaled {
        state.game_over_signaled = true;
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver);
        log::info!("Player fell at tick {}", state.time_ticks);
    }

    true
}
