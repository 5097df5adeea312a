use glam::Vec2;

use super::{step_agent, Agent, Field, Motion, PointerState};
use crate::config::{
    DOT_BACKGROUND, DOT_COLOR, DOT_FADE_START, DOT_FORCES, DOT_INFLUENCE_RADIUS,
    DOT_LAYER_OPACITY, DOT_RADIUS, DOT_REST_EPSILON, DOT_SPACING,
};
use crate::render::{Canvas, Layer, Shape};
use crate::scheduler::SleepPolicy;
use crate::viewport::Viewport;

/// Regular lattice of dots that settle back into place
#[derive(Debug, Default)]
pub struct DotGrid {
    dots: Vec<Agent>,
}

impl DotGrid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Field for DotGrid {
    fn name(&self) -> &'static str {
        "dot grid"
    }

    fn sleep_policy(&self) -> SleepPolicy {
        SleepPolicy::AutoSleep
    }

    fn influence_radius(&self) -> f32 {
        DOT_INFLUENCE_RADIUS
    }

    fn background(&self) -> [f64; 4] {
        DOT_BACKGROUND
    }

    fn layer(&self) -> Layer {
        Layer::new(DOT_LAYER_OPACITY, DOT_FADE_START)
    }

    fn regenerate(&mut self, viewport: Viewport) {
        self.dots = lattice(viewport);
    }

    fn step(&mut self, pointer: &PointerState, _viewport: Viewport) -> Motion {
        let mut motion = Motion::Settled;
        for dot in &mut self.dots {
            let anchor = dot.anchor;
            step_agent(dot, anchor, pointer, &DOT_FORCES);
            if dot.velocity.x.abs() > DOT_REST_EPSILON || dot.velocity.y.abs() > DOT_REST_EPSILON {
                motion = Motion::Moving;
            }
        }
        motion
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        for dot in &self.dots {
            canvas.fill(
                &Shape::Circle {
                    center: dot.position,
                    radius: DOT_RADIUS,
                },
                DOT_COLOR,
            );
        }
    }

    fn len(&self) -> usize {
        self.dots.len()
    }
}

/// Dots every `DOT_SPACING` pixels from the origin, column by column
pub fn lattice(viewport: Viewport) -> Vec<Agent> {
    let columns = (viewport.width / DOT_SPACING).floor().max(0.0) as usize;
    let rows = (viewport.height / DOT_SPACING).floor().max(0.0) as usize;

    let mut dots = Vec::with_capacity(columns * rows);
    for column in 0..columns {
        for row in 0..rows {
            let position = Vec2::new(column as f32 * DOT_SPACING, row as f32 * DOT_SPACING);
            dots.push(Agent::at_rest(position));
        }
    }
    dots
}
