//! Particles and damage numbers
//!
//! Purely cosmetic: gameplay code writes into this module but never reads it.

use glam::Vec2;
use rand::Rng;

/// Default particle cap (overridden from settings by the host)
pub const MAX_PARTICLES: usize = 512;

/// Hit sparks on enemies
pub const SPARK_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Player taking damage
pub const BLOOD_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
/// Enemy death
pub const DEATH_COLOR: [f32; 4] = [0.98, 0.75, 0.14, 1.0];

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    /// 0-1, decreases linearly
    pub life: f32,
}

/// A floating damage callout
#[derive(Debug, Clone)]
pub struct DamageText {
    pub pos: Vec2,
    pub value: String,
    pub color: [f32; 4],
    pub life: f32,
}

/// All live visual effects
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub texts: Vec<DamageText>,
    /// Bursts stop spawning once this many particles are alive
    pub max_particles: usize,
    /// Damage callouts on/off
    pub show_damage_text: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            texts: Vec::new(),
            max_particles: MAX_PARTICLES,
            show_damage_text: true,
        }
    }
}

impl Effects {
    /// Spawn `count` particles at `pos` with random velocity in
    /// [-max_speed, max_speed] per axis
    pub fn burst<R: Rng>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        color: [f32; 4],
        count: usize,
        max_speed: f32,
    ) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        let max_speed = max_speed.abs();
        for _ in 0..count.min(room) {
            let vel = if max_speed > 0.0 {
                Vec2::new(
                    rng.random_range(-max_speed..=max_speed),
                    rng.random_range(-max_speed..=max_speed),
                )
            } else {
                Vec2::ZERO
            };
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life: 1.0,
            });
        }
    }

    /// Spawn a rising damage number
    pub fn callout(&mut self, pos: Vec2, value: impl Into<String>, color: [f32; 4]) {
        if !self.show_damage_text {
            return;
        }
        self.texts.push(DamageText {
            pos,
            value: value.into(),
            color,
            life: 1.0,
        });
    }

    /// Advance one tick: move, decay, drop expired entries
    pub fn update(&mut self, particle_decay: f32, text_rise: f32, text_decay: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life = (particle.life - particle_decay).max(0.0);
        }
        self.particles.retain(|p| p.life > 0.0);

        for text in self.texts.iter_mut() {
            text.pos.y -= text_rise;
            text.life = (text.life - text_decay).max(0.0);
        }
        self.texts.retain(|t| t.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
    }
}
