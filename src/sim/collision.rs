//! Collision detection and response for axis-aligned geometry
//!
//! Platforms only resolve downward landings: a player falling through the
//! top surface is snapped onto it. There is no side or ceiling blocking.

use super::state::{Platform, Player};

/// Slack allowed on the "was above the surface last tick" test, absorbs
/// float error after a previous snap
const LANDING_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Strict horizontal overlap only
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// Result of resolving the player against static geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingResult {
    /// Index of the platform landed on
    pub platform: usize,
    /// Surface y the player now rests on
    pub surface_y: f32,
}

/// Find the platform whose top surface the player's bottom edge crossed
/// this tick. With several candidates the highest surface wins.
pub fn find_landing(player: &Player, platforms: &[Platform]) -> Option<LandingResult> {
    let vy = player.vel.y;
    if vy < 0.0 {
        return None;
    }

    let body = player.bounds();
    let bottom = player.bottom();
    let prev_bottom = bottom - vy;

    let mut best: Option<LandingResult> = None;
    for (i, platform) in platforms.iter().enumerate() {
        if !body.overlaps_x(&platform.rect()) {
            continue;
        }
        let top = platform.y;
        let crossed = bottom >= top && prev_bottom <= top + LANDING_EPSILON;
        if !crossed {
            continue;
        }
        if best.is_none_or(|b| top < b.surface_y) {
            best = Some(LandingResult {
                platform: i,
                surface_y: top,
            });
        }
    }
    best
}

/// Snap the player onto the surface it fell through, if any
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform]) -> Option<LandingResult> {
    let landing = find_landing(player, platforms)?;
    player.pos.y = landing.surface_y - player.height;
    player.vel.y = 0.0;
    player.grounded = true;
    Some(landing)
}
