mod tessellate;

pub use tessellate::{ShapeBatch, Vertex};

use glam::Vec2;

/// Straight (non-premultiplied) RGBA in [0, 1]
pub type Rgba = [f32; 4];

/// A filled silhouette in logical pixels. `heading` is in radians, y down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
    },
    /// Pill with round caps of `radius` at both ends of a `length` spine
    Capsule {
        center: Vec2,
        heading: f32,
        length: f32,
        radius: f32,
    },
    /// Round tail of `tail_radius` behind, tapering to a point ahead
    Teardrop {
        center: Vec2,
        heading: f32,
        length: f32,
        tail_radius: f32,
    },
}

/// How a field's layer is composited over its background
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    /// Alpha applied to everything on the layer
    pub opacity: f32,
    /// Fraction of the height below which the layer fades out linearly,
    /// reaching zero at the bottom edge. 1.0 disables the fade.
    pub fade_start: f32,
}

impl Layer {
    pub const fn new(opacity: f32, fade_start: f32) -> Self {
        Self {
            opacity,
            fade_start,
        }
    }

    /// Alpha multiplier at `y_fraction` of the height, 0 at the top edge
    pub fn alpha_at(&self, y_fraction: f32) -> f32 {
        if y_fraction <= self.fade_start {
            return self.opacity;
        }
        let fade = (1.0 - y_fraction) / (1.0 - self.fade_start);
        self.opacity * fade.clamp(0.0, 1.0)
    }
}

/// Immediate-mode drawing target for one frame
pub trait Canvas {
    /// Drop everything drawn so far
    fn clear(&mut self);

    fn fill(&mut self, shape: &Shape, color: Rgba);
}
