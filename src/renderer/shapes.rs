//! Triangle-list builders for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Append a filled axis-aligned rectangle (two triangles)
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let (x2, y2) = (x + w, y + h);
    out.extend_from_slice(&[
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]);
}

/// Append a rectangle outline of the given thickness
pub fn rect_outline(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(w * 0.5).min(h * 0.5);
    rect(out, x, y, w, t, color);
    rect(out, x, y + h - t, w, t, color);
    rect(out, x, y + t, t, h - 2.0 * t, color);
    rect(out, x + w - t, y + t, t, h - 2.0 * t, color);
}

/// Append a filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Append a progress bar: backing plus a fill for `fraction` of the width
pub fn bar(out: &mut Vec<Vertex>, area: Rect, fraction: f32, back: [f32; 4], fill: [f32; 4]) {
    rect(out, area.x, area.y, area.w, area.h, back);
    rect(out, area.x, area.y, area.w * fraction.clamp(0.0, 1.0), area.h, fill);
}
