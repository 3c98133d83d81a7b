//! Presentation transforms: letterboxed viewport and horizontal follow camera
//!
//! Neither touches simulation coordinates.

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::Player;

/// Maps the fixed logical canvas into a display area of any size,
/// preserving aspect ratio with letterbox bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Display size in physical pixels
    pub display: Vec2,
    /// Uniform logical-to-display scale
    pub scale: f32,
    /// Top-left of the canvas inside the display
    pub offset: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let mut viewport = Self {
            display: Vec2::ZERO,
            scale: 0.0,
            offset: Vec2::ZERO,
        };
        viewport.resize(width, height);
        viewport
    }

    /// Recompute scale and letterbox offsets for a new display size
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        self.display = Vec2::new(width, height);
        self.scale = (width / CANVAS_WIDTH).min(height / CANVAS_HEIGHT);
        let used = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT) * self.scale;
        self.offset = (self.display - used) * 0.5;
    }

    /// Size of the scaled canvas in display pixels
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT) * self.scale
    }

    /// Logical canvas point to display pixels
    pub fn to_display(&self, logical: Vec2) -> Vec2 {
        self.offset + logical * self.scale
    }

    /// Display pixels to logical canvas point (None in a zero-size display)
    pub fn to_logical(&self, display: Vec2) -> Option<Vec2> {
        if self.scale <= 0.0 {
            return None;
        }
        Some((display - self.offset) / self.scale)
    }
}

/// Keeps the player horizontally centered; never scrolls left of the world
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    /// World x shown at the canvas's left edge
    pub offset_x: f32,
}

impl Camera {
    pub fn follow(&mut self, player: &Player) {
        self.offset_x = (player.pos.x - CANVAS_WIDTH / 2.0).max(0.0);
    }

    /// World point to logical canvas point
    pub fn world_to_canvas(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.offset_x, world.y)
    }

    /// Whether a horizontal span intersects the visible canvas
    pub fn is_visible(&self, x: f32, width: f32) -> bool {
        x + width >= self.offset_x && x <= self.offset_x + CANVAS_WIDTH
    }
}
