//! Player movement integration
//!
//! Per-tick units: velocities are added to position once per fixed tick, and
//! gravity/friction are applied once per tick.

use super::state::Player;
use super::tick::Intents;
use crate::roster::CharacterStats;
use crate::tuning::Tuning;

/// Advance player velocity and position by one tick.
///
/// Clears `grounded`; the collision pass sets it again if the player is
/// still supported.
pub fn integrate_player(player: &mut Player, intents: &Intents, stats: &CharacterStats, tuning: &Tuning) {
    let max_speed = stats.speed.abs();

    let mut dir = 0.0;
    if intents.move_left {
        dir -= 1.0;
        player.facing = -1.0;
    }
    if intents.move_right {
        dir += 1.0;
        player.facing = 1.0;
    }

    if dir != 0.0 {
        player.vel.x = (player.vel.x + dir * max_speed * tuning.acceleration).clamp(-max_speed, max_speed);
    } else {
        player.vel.x *= tuning.friction;
        if player.vel.x.abs() < tuning.stop_threshold {
            player.vel.x = 0.0;
        }
    }

    // Single jump: only from the ground
    if intents.jump && player.grounded {
        player.vel.y = -stats.jump_power;
    }

    player.vel.y += tuning.gravity;
    player.pos += player.vel;
    player.grounded = false;

    // Left world boundary
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = player.vel.x.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn stats() -> CharacterStats {
        CharacterStats {
            hp: 100,
            attack: 20,
            speed: 5.0,
            jump_power: 10.0,
        }
    }

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 300.0), 40.0, 60.0, 100)
    }

    fn right() -> Intents {
        Intents {
            move_right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_acceleration_clamps_to_max_speed() {
        let tuning = Tuning::default();
        let mut p = player();
        integrate_player(&mut p, &right(), &stats(), &tuning);
        assert!((p.vel.x - 0.5).abs() < 1e-6);
        for _ in 0..30 {
            integrate_player(&mut p, &right(), &stats(), &tuning);
        }
        assert_eq!(p.vel.x, 5.0);
        assert_eq!(p.facing, 1.0);
    }

    #[test]
    fn test_friction_decays_to_zero() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 5.0;
        integrate_player(&mut p, &Intents::default(), &stats(), &tuning);
        assert!((p.vel.x - 4.0).abs() < 1e-6);
        for _ in 0..40 {
            integrate_player(&mut p, &Intents::default(), &stats(), &tuning);
        }
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_gravity_applies_every_tick() {
        let tuning = Tuning::default();
        let mut p = player();
        p.grounded = true;
        integrate_player(&mut p, &Intents::default(), &stats(), &tuning);
        assert_eq!(p.vel.y, 0.5);
        assert_eq!(p.pos.y, 300.5);
        assert!(!p.grounded);
    }

    #[test]
    fn test_jump_requires_ground() {
        let tuning = Tuning::default();
        let jump = Intents {
            jump: true,
            ..Default::default()
        };

        let mut airborne = player();
        integrate_player(&mut airborne, &jump, &stats(), &tuning);
        assert_eq!(airborne.vel.y, 0.5);

        let mut grounded = player();
        grounded.grounded = true;
        integrate_player(&mut grounded, &jump, &stats(), &tuning);
        assert_eq!(grounded.vel.y, -9.5);
    }

    #[test]
    fn test_left_boundary_clamp() {
        let tuning = Tuning::default();
        let mut p = player();
        p.pos.x = 1.0;
        p.vel.x = -5.0;
        let left = Intents {
            move_left: true,
            ..Default::default()
        };
        integrate_player(&mut p, &left, &stats(), &tuning);
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.facing, -1.0);
    }

    #[test]
    fn test_opposing_directions_cancel() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 2.0;
        let both = Intents {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        integrate_player(&mut p, &both, &stats(), &tuning);
        // Treated as no direction: friction applies
        assert!((p.vel.x - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_speed_is_tolerated() {
        let tuning = Tuning::default();
        let mut p = player();
        let still = CharacterStats { speed: 0.0, ..stats() };
        integrate_player(&mut p, &right(), &still, &tuning);
        assert_eq!(p.vel.x, 0.0);
    }
}
