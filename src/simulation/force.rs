use glam::Vec2;

use crate::config::POINTER_SENTINEL;

/// Tuning for the shared force model. No physical units; values are chosen by feel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    /// Peak push applied at the pointer, falling linearly to zero at the radius
    pub repulsion_strength: f32,
    /// Spring constant pulling an agent back to its anchor
    pub return_strength: f32,
    /// Per-frame velocity damping, < 1
    pub friction: f32,
    /// Hard cap on velocity magnitude after damping
    pub max_speed: f32,
}

/// A point agent bound to an anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    pub anchor: Vec2,
    pub velocity: Vec2,
}

impl Agent {
    /// Agent sitting still on its own anchor
    pub fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            anchor: position,
            velocity: Vec2::ZERO,
        }
    }
}

/// Pointer shared by every agent of one session. Written by input events, read by the step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub influence_radius: f32,
}

impl PointerState {
    /// Pointer parked at the off-screen sentinel
    pub fn new(influence_radius: f32) -> Self {
        Self {
            position: Vec2::splat(POINTER_SENTINEL),
            influence_radius,
        }
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Park the pointer off-screen so no force applies
    pub fn clear(&mut self) {
        self.position = Vec2::splat(POINTER_SENTINEL);
    }

    pub fn is_present(&self) -> bool {
        self.position != Vec2::splat(POINTER_SENTINEL)
    }
}

/// Velocity kick pushing `position` away from the pointer.
///
/// Linear falloff: `strength` at the pointer, zero at and beyond the influence
/// radius. Zero distance has no defined direction and yields no force.
pub fn repulsion(position: Vec2, pointer: &PointerState, strength: f32) -> Vec2 {
    let radius = pointer.influence_radius;
    let away = position - pointer.position;
    let distance = away.length();

    if distance <= 0.0 || distance >= radius {
        return Vec2::ZERO;
    }

    let falloff = (radius - distance) / radius;
    away / distance * falloff * strength
}

/// Advance one agent by one frame.
///
/// `anchor` is the rest point used for this frame only; callers that drift the
/// anchor pass the drifted value here and the stored anchor is left untouched.
pub fn step_agent(agent: &mut Agent, anchor: Vec2, pointer: &PointerState, params: &ForceParams) {
    agent.velocity += repulsion(agent.position, pointer, params.repulsion_strength);

    // Linear spring: unit direction scaled by distance, uncapped
    let to_anchor = anchor - agent.position;
    let distance = to_anchor.length();
    if distance > 0.0 {
        agent.velocity += to_anchor / distance * (distance * params.return_strength);
    }

    agent.velocity *= params.friction;
    agent.velocity = agent.velocity.clamp_length_max(params.max_speed);

    agent.position += agent.velocity;
}
