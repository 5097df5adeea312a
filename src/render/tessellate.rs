use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::{Canvas, Layer, Rgba, Shape};
use crate::config::{ARC_SEGMENTS, CURVE_SEGMENTS};

/// Vertex uploaded to the GPU. Position is in logical pixels.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Canvas that flattens every shape into a triangle list
#[derive(Debug, Default)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Scale every vertex alpha by the layer's opacity and fade at its height.
    ///
    /// The fade is linear in y, so per-vertex alpha interpolates to the same
    /// ramp the layer describes.
    pub fn apply_layer(&mut self, layer: Layer, height: f32) {
        if height <= 0.0 {
            return;
        }
        for vertex in &mut self.vertices {
            vertex.color[3] *= layer.alpha_at(vertex.position[1] / height);
        }
    }
}

impl Canvas for ShapeBatch {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn fill(&mut self, shape: &Shape, color: Rgba) {
        let (hub, rim) = outline(shape);
        if rim.len() < 2 {
            return;
        }

        let vertex = |p: Vec2| Vertex {
            position: p.to_array(),
            color,
        };

        // Every outline is star-shaped around its hub, so a fan covers it
        for i in 0..rim.len() {
            let next = rim[(i + 1) % rim.len()];
            self.vertices.push(vertex(hub));
            self.vertices.push(vertex(rim[i]));
            self.vertices.push(vertex(next));
        }
    }
}

/// Fan hub and closed rim of a shape, in logical pixels
fn outline(shape: &Shape) -> (Vec2, Vec<Vec2>) {
    match *shape {
        Shape::Circle { center, radius } => {
            let mut rim = Vec::with_capacity(ARC_SEGMENTS * 2);
            arc(&mut rim, Vec2::ZERO, radius, 0.0, TAU, ARC_SEGMENTS * 2, false);
            (center, place(rim, center, 0.0))
        }
        Shape::Capsule {
            center,
            heading,
            length,
            radius,
        } => {
            let half = length / 2.0;
            let mut rim = Vec::with_capacity(ARC_SEGMENTS * 2 + 2);
            arc(&mut rim, Vec2::new(-half, 0.0), radius, FRAC_PI_2, PI, ARC_SEGMENTS, true);
            arc(&mut rim, Vec2::new(half, 0.0), radius, -FRAC_PI_2, PI, ARC_SEGMENTS, true);
            (center, place(rim, center, heading))
        }
        Shape::Teardrop {
            center,
            heading,
            length,
            tail_radius,
        } => {
            let half = length / 2.0;
            let tail = Vec2::new(-half, 0.0);
            let tip = Vec2::new(half, 0.0);
            let mut rim = Vec::with_capacity(ARC_SEGMENTS + CURVE_SEGMENTS * 2 + 1);
            arc(&mut rim, tail, tail_radius, FRAC_PI_2, PI, ARC_SEGMENTS, true);
            quadratic(
                &mut rim,
                Vec2::new(-half, -tail_radius),
                Vec2::new(-length / 4.0, -tail_radius * 0.2),
                tip,
            );
            quadratic(
                &mut rim,
                tip,
                Vec2::new(-length / 4.0, tail_radius * 0.2),
                Vec2::new(-half, tail_radius),
            );
            let hub = center + Vec2::from_angle(heading).rotate(tail);
            (hub, place(rim, center, heading))
        }
    }
}

/// Append points on an arc of `sweep` radians starting at `start`
fn arc(
    out: &mut Vec<Vec2>,
    center: Vec2,
    radius: f32,
    start: f32,
    sweep: f32,
    segments: usize,
    inclusive: bool,
) {
    let steps = if inclusive { segments + 1 } else { segments };
    for i in 0..steps {
        let angle = start + sweep * i as f32 / segments as f32;
        out.push(center + Vec2::from_angle(angle) * radius);
    }
}

/// Append a quadratic Bezier, skipping its first point (already on the rim)
fn quadratic(out: &mut Vec<Vec2>, from: Vec2, control: Vec2, to: Vec2) {
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f32 / CURVE_SEGMENTS as f32;
        let u = 1.0 - t;
        out.push(from * (u * u) + control * (2.0 * u * t) + to * (t * t));
    }
}

/// Rotate local points by `heading` and move them to `center`
fn place(points: Vec<Vec2>, center: Vec2, heading: f32) -> Vec<Vec2> {
    let rotation = Vec2::from_angle(heading);
    points
        .into_iter()
        .map(|p| center + rotation.rotate(p))
        .collect()
}
