//! Enemy behavior state machine
//!
//! Each living enemy is evaluated independently per tick:
//!
//! ```text
//! Patrol --(player in aggro radius & band)--> Aggro
//! Aggro  --(in attack range & cooldown ready)--> Attack
//! Attack --(attack window elapsed)--> Aggro
//! any    --(hp <= 0)--> Dead   (terminal)
//! ```
//!
//! Regular enemies also drop back to Patrol when the player leaves the leash
//! radius. Decisions are collected first and applied afterwards so enemy
//! iteration never aliases player or projectile state.

use glam::Vec2;

use super::combat::hurt_player;
use super::event::GameEvent;
use super::projectile::{BOSS_COLOR, RANGED_COLOR, spawn_projectile};
use super::state::{Enemy, EnemyKind, EnemyState, GamePhase, GameState, Owner};
use crate::tuning::Tuning;

/// What an enemy decided to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    /// Melee strike on entering Attack
    Strike { damage: i32 },
    /// Body contact with the player
    Contact { damage: i32 },
    /// Single aimed shot
    Fire { pos: Vec2, vel: Vec2, radius: f32 },
    /// Boss spread shot
    Volley { origin: Vec2, facing: f32 },
    /// Boss saw the player for the first time
    BossNoticed,
}

/// Player data the enemies react to
#[derive(Debug, Clone, Copy)]
struct Senses {
    player_pos: Vec2,
    player_center: Vec2,
    player_body: super::collision::Rect,
    now_ms: f64,
}

/// AI step: update every living enemy, apply their actions, then reap
/// corpses whose linger time ran out.
pub fn update_enemies(state: &mut GameState) {
    let senses = Senses {
        player_pos: state.player.pos,
        player_center: state.player.center(),
        player_body: state.player.bounds(),
        now_ms: state.now_ms(),
    };

    let mut actions: Vec<EnemyAction> = Vec::new();
    let tuning = &state.tuning;
    for enemy in state.enemies.iter_mut().filter(|e| !e.is_dead()) {
        if enemy.hp <= 0 {
            enemy.hp = 0;
            enemy.state = EnemyState::Dead;
            enemy.corpse_ticks = tuning.corpse_ticks;
            continue;
        }

        enemy.hit_flash_ticks = enemy.hit_flash_ticks.saturating_sub(1);
        apply_knockback(enemy, tuning);

        match enemy.kind {
            EnemyKind::Boss => think_boss(enemy, &senses, tuning, &mut actions),
            EnemyKind::Melee | EnemyKind::Ranged => think_regular(enemy, &senses, tuning, &mut actions),
        }
    }

    for action in actions {
        apply_action(state, action);
    }

    reap_dead(state);
}

fn apply_knockback(enemy: &mut Enemy, tuning: &Tuning) {
    if enemy.vel.x != 0.0 {
        enemy.pos.x += enemy.vel.x;
        enemy.vel.x *= tuning.friction;
        if enemy.vel.x.abs() < tuning.stop_threshold {
            enemy.vel.x = 0.0;
        }
    }
}

/// Walk between `origin - range` and `origin + range`, turning at each bound
fn patrol_walk(enemy: &mut Enemy) {
    if enemy.patrol_range <= 0.0 {
        return;
    }
    let left = enemy.patrol_origin - enemy.patrol_range;
    let right = enemy.patrol_origin + enemy.patrol_range;
    enemy.pos.x += enemy.facing * enemy.speed;
    if enemy.pos.x <= left {
        enemy.pos.x = left;
        enemy.facing = 1.0;
    } else if enemy.pos.x >= right {
        enemy.pos.x = right;
        enemy.facing = -1.0;
    }
}

fn face_toward(enemy: &mut Enemy, dx: f32) {
    if dx < 0.0 {
        enemy.facing = -1.0;
    } else if dx > 0.0 {
        enemy.facing = 1.0;
    }
}

fn begin_attack(enemy: &mut Enemy, tuning: &Tuning, now_ms: f64) {
    enemy.state = EnemyState::Attack;
    enemy.attack_ticks = tuning.enemy_attack_ticks;
    enemy.last_attack_ms = Some(now_ms);
}

/// Count down the attack animation; back to Aggro when it ends
fn finish_attack(enemy: &mut Enemy) {
    enemy.attack_ticks = enemy.attack_ticks.saturating_sub(1);
    if enemy.attack_ticks == 0 {
        enemy.state = EnemyState::Aggro;
    }
}

fn in_contact(dx: f32, dy: f32, tuning: &Tuning) -> bool {
    dx.abs() < tuning.contact_range_x && dy.abs() < tuning.contact_range_y
}

fn think_regular(enemy: &mut Enemy, senses: &Senses, tuning: &Tuning, out: &mut Vec<EnemyAction>) {
    let center = enemy.center();
    let dx = senses.player_center.x - center.x;
    let dy = senses.player_center.y - center.y;

    match enemy.state {
        EnemyState::Patrol => {
            patrol_walk(enemy);
            if dx.abs() < tuning.aggro_radius && dy.abs() < tuning.aggro_band {
                enemy.state = EnemyState::Aggro;
            }
        }
        EnemyState::Aggro => {
            if dx.abs() > tuning.leash_radius {
                enemy.state = EnemyState::Patrol;
                enemy.patrol_origin = enemy.pos.x;
                return;
            }
            face_toward(enemy, dx);

            let close = dx.abs() <= tuning.melee_strike_range;
            let in_range = match enemy.kind {
                EnemyKind::Melee => close && dy.abs() < tuning.contact_range_y,
                _ => dx.abs() < tuning.aggro_radius,
            };

            if in_range && enemy.attack_ready(senses.now_ms) {
                begin_attack(enemy, tuning, senses.now_ms);
                if enemy.kind == EnemyKind::Melee {
                    if in_contact(dx, dy, tuning) {
                        out.push(EnemyAction::Strike {
                            damage: tuning.melee_strike_damage,
                        });
                    }
                } else {
                    let vy = if tuning.ranged_aim_divisor != 0.0 {
                        (senses.player_pos.y - enemy.pos.y) / tuning.ranged_aim_divisor
                    } else {
                        0.0
                    };
                    out.push(EnemyAction::Fire {
                        pos: Vec2::new(center.x, enemy.pos.y + 10.0),
                        vel: Vec2::new(enemy.facing * tuning.ranged_projectile_speed, vy),
                        radius: tuning.ranged_projectile_radius,
                    });
                }
            } else if !(enemy.kind == EnemyKind::Melee && close) {
                enemy.pos.x += enemy.facing * enemy.speed;
            }
        }
        EnemyState::Attack => finish_attack(enemy),
        EnemyState::Dead => return,
    }

    if enemy.kind == EnemyKind::Melee && in_contact(dx, dy, tuning) {
        out.push(EnemyAction::Contact {
            damage: tuning.contact_damage,
        });
    }
}

fn think_boss(enemy: &mut Enemy, senses: &Senses, tuning: &Tuning, out: &mut Vec<EnemyAction>) {
    let center = enemy.center();
    let dx = senses.player_center.x - center.x;
    let dy = senses.player_center.y - center.y;

    match enemy.state {
        EnemyState::Patrol => {
            patrol_walk(enemy);
            if dx.abs() < tuning.boss_aggro_radius && dy.abs() < tuning.boss_aggro_band {
                enemy.state = EnemyState::Aggro;
                out.push(EnemyAction::BossNoticed);
            }
        }
        EnemyState::Aggro => {
            face_toward(enemy, dx);
            // Stand and shoot once close enough
            if dx.abs() > tuning.boss_min_approach {
                enemy.pos.x += enemy.facing * enemy.speed;
            }
            if enemy.attack_ready(senses.now_ms) {
                begin_attack(enemy, tuning, senses.now_ms);
                out.push(EnemyAction::Volley {
                    origin: enemy.center(),
                    facing: enemy.facing,
                });
            }
        }
        EnemyState::Attack => {
            face_toward(enemy, dx);
            finish_attack(enemy);
        }
        EnemyState::Dead => return,
    }

    if enemy.bounds().overlaps(&senses.player_body) {
        out.push(EnemyAction::Contact {
            damage: tuning.boss_contact_damage,
        });
    }
}

fn apply_action(state: &mut GameState, action: EnemyAction) {
    match action {
        EnemyAction::Strike { damage } | EnemyAction::Contact { damage } => {
            hurt_player(state, damage);
        }
        EnemyAction::Fire { pos, vel, radius } => {
            spawn_projectile(state, pos, vel, radius, Owner::Enemy, RANGED_COLOR);
        }
        EnemyAction::Volley { origin, facing } => {
            let count = state.tuning.boss_volley_count;
            let speed = state.tuning.boss_projectile_speed;
            let spread = state.tuning.boss_volley_spread;
            let radius = state.tuning.boss_projectile_radius;
            let mid = count.saturating_sub(1) as f32 / 2.0;
            for i in 0..count {
                let vel = Vec2::new(facing * speed, (i as f32 - mid) * spread);
                spawn_projectile(state, origin, vel, radius, Owner::Enemy, BOSS_COLOR);
            }
        }
        EnemyAction::BossNoticed => {
            if !state.boss_encountered {
                state.boss_encountered = true;
                if state.phase == GamePhase::Playing {
                    state.phase = GamePhase::BossFight;
                }
                state.emit(GameEvent::BossEncountered);
                log::info!("Boss encountered at x={:.0}", state.player.pos.x);
            }
        }
    }
}

/// Drop dead enemies whose corpse linger has run out
fn reap_dead(state: &mut GameState) {
    state.enemies.retain_mut(|e| {
        if !e.is_dead() {
            return true;
        }
        if e.corpse_ticks == 0 {
            return false;
        }
        e.corpse_ticks -= 1;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Character, CharacterId};
    use proptest::prelude::*;

    fn arena() -> GameState {
        let mut state = GameState::new(3, Character::get(CharacterId::Aziel).stats, 0, Tuning::default());
        state.enemies.clear();
        state.player.pos = Vec2::new(1000.0, 490.0);
        state.start();
        state.drain_events();
        state
    }

    fn spawn(state: &mut GameState, kind: EnemyKind, x: f32) -> usize {
        let id = state.next_entity_id();
        let (w, h, hp, speed, cooldown) = match kind {
            EnemyKind::Boss => (140.0, 200.0, 1200, 2.5, 1500.0),
            _ => (45.0, 55.0, 80, 2.0, 1200.0),
        };
        state.enemies.push(Enemy {
            id,
            kind,
            pos: Vec2::new(x, 490.0),
            vel: Vec2::ZERO,
            speed,
            width: w,
            height: h,
            hp,
            max_hp: hp,
            state: EnemyState::Patrol,
            facing: -1.0,
            last_attack_ms: None,
            attack_cooldown_ms: cooldown,
            patrol_origin: x,
            patrol_range: if kind == EnemyKind::Boss { 0.0 } else { 150.0 },
            hit_flash_ticks: 0,
            attack_ticks: 0,
            corpse_ticks: 0,
        });
        state.enemies.len() - 1
    }

    #[test]
    fn test_patrol_reverses_at_bounds() {
        let mut state = arena();
        state.player.pos.x = 9000.0;
        let idx = spawn(&mut state, EnemyKind::Melee, 3000.0);
        // 150 range at 2/tick: reaches the left bound after 75 ticks
        for _ in 0..75 {
            update_enemies(&mut state);
        }
        assert_eq!(state.enemies[idx].pos.x, 2850.0);
        assert_eq!(state.enemies[idx].facing, 1.0);
        for _ in 0..150 {
            update_enemies(&mut state);
        }
        assert_eq!(state.enemies[idx].pos.x, 3150.0);
        assert_eq!(state.enemies[idx].facing, -1.0);
        assert_eq!(state.enemies[idx].state, EnemyState::Patrol);
    }

    #[test]
    fn test_patrol_to_aggro_requires_band() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Melee, 1400.0);
        state.enemies[idx].pos.y = 100.0; // 390 units above the player
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Patrol);

        state.enemies[idx].pos.y = 490.0;
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Aggro);
    }

    #[test]
    fn test_aggro_chases_player() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Melee, 1400.0);
        update_enemies(&mut state);
        let x0 = state.enemies[idx].pos.x;
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].facing, -1.0);
        assert_eq!(state.enemies[idx].pos.x, x0 - 2.0);
    }

    #[test]
    fn test_melee_strike_then_recover() {
        let mut state = arena();
        // Centers 2.5 apart: inside strike and contact range
        let idx = spawn(&mut state, EnemyKind::Melee, 1000.0);
        state.enemies[idx].state = EnemyState::Aggro;
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Attack);
        // Strike lands first; contact in the same tick is absorbed by invulnerability
        assert_eq!(state.player.hp, 130);

        for _ in 0..20 {
            update_enemies(&mut state);
        }
        assert_eq!(state.enemies[idx].state, EnemyState::Aggro);
    }

    #[test]
    fn test_contact_damage_respects_invulnerability() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Melee, 1000.0);
        state.enemies[idx].state = EnemyState::Aggro;
        state.enemies[idx].last_attack_ms = Some(0.0); // strike on cooldown
        state.enemies[idx].attack_cooldown_ms = 1.0e9;

        update_enemies(&mut state);
        assert_eq!(state.player.hp, 135);
        for _ in 0..59 {
            state.player.invulnerable_ticks -= 1;
            update_enemies(&mut state);
        }
        assert_eq!(state.player.invulnerable_ticks, 1);
        assert_eq!(state.player.hp, 135);

        state.player.invulnerable_ticks = 0;
        update_enemies(&mut state);
        assert_eq!(state.player.hp, 120);
    }

    #[test]
    fn test_ranged_fires_aimed_projectile() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Ranged, 1400.0);
        state.enemies[idx].pos.y = 410.0;
        state.enemies[idx].state = EnemyState::Aggro;
        update_enemies(&mut state);

        assert_eq!(state.enemies[idx].state, EnemyState::Attack);
        assert_eq!(state.projectiles.len(), 1);
        let shot = &state.projectiles[0];
        assert_eq!(shot.vel.x, -9.0);
        assert_eq!(shot.vel.y, (490.0 - 410.0) / 40.0);
        assert_eq!(shot.owner, Owner::Enemy);

        // Cooldown holds the next shot
        for _ in 0..30 {
            update_enemies(&mut state);
        }
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_aggro_leash_returns_to_patrol() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Melee, 3000.0);
        state.enemies[idx].state = EnemyState::Aggro;
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Patrol);
        assert_eq!(state.enemies[idx].patrol_origin, 3000.0);
    }

    #[test]
    fn test_boss_volley_and_encounter() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Boss, 1500.0);
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Aggro);
        assert_eq!(state.phase, GamePhase::BossFight);
        assert_eq!(state.drain_events(), vec![GameEvent::BossEncountered]);

        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Attack);
        assert_eq!(state.projectiles.len(), 5);
        let vys: Vec<f32> = state.projectiles.iter().map(|p| p.vel.y).collect();
        assert_eq!(vys, vec![-5.0, -2.5, 0.0, 2.5, 5.0]);
        assert!(state.projectiles.iter().all(|p| p.vel.x == -8.0));
    }

    #[test]
    fn test_boss_holds_minimum_distance() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Boss, 1100.0);
        state.enemies[idx].state = EnemyState::Aggro;
        state.enemies[idx].last_attack_ms = Some(0.0);
        state.enemies[idx].attack_cooldown_ms = 1.0e9;
        // Boss center 1170, player center 1020: 150 apart
        for _ in 0..60 {
            update_enemies(&mut state);
        }
        let gap = (state.enemies[idx].center().x - state.player.center().x).abs();
        assert!(gap <= 120.0 && gap > 117.0, "gap {gap}");
    }

    #[test]
    fn test_dead_enemy_is_inert_then_reaped() {
        let mut state = arena();
        let idx = spawn(&mut state, EnemyKind::Melee, 1000.0);
        state.enemies[idx].hp = 0;
        state.enemies[idx].state = EnemyState::Aggro;
        update_enemies(&mut state);
        assert_eq!(state.enemies[idx].state, EnemyState::Dead);
        assert_eq!(state.player.hp, 150);

        for _ in 0..30 {
            update_enemies(&mut state);
            assert_eq!(state.player.hp, 150);
        }
        update_enemies(&mut state);
        assert!(state.enemies.is_empty());
    }

    proptest! {
        #[test]
        fn prop_enemy_hp_never_increases(px in 0.0f32..6000.0, steps in 1usize..120) {
            let mut state = arena();
            state.player.pos.x = px;
            spawn(&mut state, EnemyKind::Melee, 1200.0);
            spawn(&mut state, EnemyKind::Ranged, 2000.0);
            spawn(&mut state, EnemyKind::Boss, 4800.0);
            let mut last: Vec<(u32, i32)> = state.enemies.iter().map(|e| (e.id, e.hp)).collect();
            for step in 0..steps {
                if step % 7 == 0 {
                    // Chip damage through the normal combat path
                    state.player.last_attack_ms = None;
                    crate::sim::combat::resolve_player_attack(&mut state, true);
                }
                update_enemies(&mut state);
                state.time_ticks += 1;
                for e in &state.enemies {
                    if let Some((_, hp)) = last.iter().find(|(id, _)| *id == e.id) {
                        prop_assert!(e.hp <= *hp);
                    }
                    prop_assert_eq!(e.is_dead(), e.hp <= 0);
                }
                last = state.enemies.iter().map(|e| (e.id, e.hp)).collect();
            }
        }
    }
}
