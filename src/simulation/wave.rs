use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{step_agent, Agent, Field, Motion, PointerState};
use crate::config::{
    WAVE_AMPLITUDE, WAVE_AREA_PER_AGENT, WAVE_BACKGROUND, WAVE_FORCES, WAVE_FREQUENCY,
    WAVE_HEADING_SMOOTHING, WAVE_INFLUENCE_RADIUS, WAVE_LENGTH_MIN, WAVE_LENGTH_SPREAD,
    WAVE_MASS_MIN, WAVE_MASS_SPREAD, WAVE_MAX_AGENTS, WAVE_NARROW_AGENTS, WAVE_PALETTE,
    WAVE_SIZE_MIN, WAVE_SIZE_SPREAD, WAVE_TEARDROP_TAIL, WAVE_LAYER_OPACITY, WAVE_TIME_STEP, WAVE_WRAP_MARGIN,
};
use crate::render::{Canvas, Layer, Rgba, Shape};
use crate::scheduler::SleepPolicy;
use crate::viewport::{DeviceClass, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkShape {
    Capsule,
    Teardrop,
}

/// Visual attributes of one wave-field agent, fixed at creation except `heading`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveMark {
    /// Thickness
    pub size: f32,
    pub length: f32,
    /// Drawn orientation, eased toward the direction of travel
    pub heading: f32,
    pub color: Rgba,
    pub shape: MarkShape,
    /// Reserved for tuning; the step does not read it
    pub mass_factor: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParticle {
    pub agent: Agent,
    pub mark: WaveMark,
}

/// Oriented marks drifting around wave-displaced anchors
pub struct WaveField {
    particles: Vec<WaveParticle>,
    /// Drift phase, advanced once per step
    time: f32,
}

impl WaveField {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            time: 0.0,
        }
    }

    /// Replace the population using the given random source
    pub fn regenerate_with<R: Rng>(&mut self, rng: &mut R, viewport: Viewport) {
        let count = population_size(viewport);
        self.particles = (0..count).map(|_| spawn(rng, viewport)).collect();
    }
}

impl Default for WaveField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for WaveField {
    fn name(&self) -> &'static str {
        "wave field"
    }

    fn sleep_policy(&self) -> SleepPolicy {
        SleepPolicy::Continuous
    }

    fn influence_radius(&self) -> f32 {
        WAVE_INFLUENCE_RADIUS
    }

    fn background(&self) -> [f64; 4] {
        WAVE_BACKGROUND
    }

    fn layer(&self) -> Layer {
        Layer::new(WAVE_LAYER_OPACITY, 1.0)
    }

    fn regenerate(&mut self, viewport: Viewport) {
        self.regenerate_with(&mut rand::thread_rng(), viewport);
    }

    fn step(&mut self, pointer: &PointerState, viewport: Viewport) -> Motion {
        self.time += WAVE_TIME_STEP;

        for particle in &mut self.particles {
            let anchor = drift_anchor(particle.agent.anchor, self.time);
            step_agent(&mut particle.agent, anchor, pointer, &WAVE_FORCES);
            particle.agent.position = wrap(particle.agent.position, viewport);

            let velocity = particle.agent.velocity;
            particle.mark.heading = ease_heading(
                particle.mark.heading,
                velocity.y.atan2(velocity.x),
                WAVE_HEADING_SMOOTHING,
            );
        }

        Motion::Moving
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        for particle in &self.particles {
            let mark = &particle.mark;
            let center = particle.agent.position;
            let shape = match mark.shape {
                MarkShape::Capsule => Shape::Capsule {
                    center,
                    heading: mark.heading,
                    length: mark.length,
                    radius: mark.size,
                },
                MarkShape::Teardrop => Shape::Teardrop {
                    center,
                    heading: mark.heading,
                    length: mark.length,
                    tail_radius: mark.size * WAVE_TEARDROP_TAIL,
                },
            };
            canvas.fill(&shape, mark.color);
        }
    }

    fn len(&self) -> usize {
        self.particles.len()
    }
}

/// Mark count for a viewport: fixed on narrow screens, area-scaled and capped otherwise
pub fn population_size(viewport: Viewport) -> usize {
    match viewport.device_class() {
        DeviceClass::Narrow => WAVE_NARROW_AGENTS,
        DeviceClass::Wide => {
            let by_area = (viewport.width * viewport.height / WAVE_AREA_PER_AGENT).floor();
            (by_area.max(0.0) as usize).min(WAVE_MAX_AGENTS)
        }
    }
}

fn spawn<R: Rng>(rng: &mut R, viewport: Viewport) -> WaveParticle {
    let position = Vec2::new(
        rng.gen::<f32>() * viewport.width,
        rng.gen::<f32>() * viewport.height,
    );
    let mark = WaveMark {
        size: WAVE_SIZE_MIN + rng.gen::<f32>() * WAVE_SIZE_SPREAD,
        length: WAVE_LENGTH_MIN + rng.gen::<f32>() * WAVE_LENGTH_SPREAD,
        heading: rng.gen::<f32>() * TAU,
        color: WAVE_PALETTE[rng.gen_range(0..WAVE_PALETTE.len())],
        shape: if rng.gen_bool(0.5) {
            MarkShape::Teardrop
        } else {
            MarkShape::Capsule
        },
        mass_factor: WAVE_MASS_MIN + rng.gen::<f32>() * WAVE_MASS_SPREAD,
    };

    WaveParticle {
        agent: Agent::at_rest(position),
        mark,
    }
}

/// Anchor displaced by the travelling wave at phase `time`.
/// Both offsets are taken from the undisplaced anchor.
pub fn drift_anchor(anchor: Vec2, time: f32) -> Vec2 {
    Vec2::new(
        anchor.x + (anchor.y * WAVE_FREQUENCY + time).sin() * WAVE_AMPLITUDE,
        anchor.y + (anchor.x * WAVE_FREQUENCY + time).cos() * WAVE_AMPLITUDE,
    )
}

/// Re-enter from the opposite edge once past the margin
pub fn wrap(mut position: Vec2, viewport: Viewport) -> Vec2 {
    let m = WAVE_WRAP_MARGIN;
    if position.x < -m {
        position.x = viewport.width + m;
    }
    if position.x > viewport.width + m {
        position.x = -m;
    }
    if position.y < -m {
        position.y = viewport.height + m;
    }
    if position.y > viewport.height + m {
        position.y = -m;
    }
    position
}

/// Move `current` a fraction of the way to `target` along the shorter arc
pub fn ease_heading(current: f32, target: f32, factor: f32) -> f32 {
    let delta = (target - current + PI).rem_euclid(TAU) - PI;
    let eased = current + delta * factor;
    (eased + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_population_size_wide() {
        assert_eq!(population_size(Viewport::new(1600.0, 900.0)), 100);
        // 1024 * 600 / 8000 = 76.8
        assert_eq!(population_size(Viewport::new(1024.0, 600.0)), 76);
    }

    #[test]
    fn test_population_size_narrow() {
        assert_eq!(population_size(Viewport::new(360.0, 640.0)), 40);
        assert_eq!(population_size(Viewport::new(0.0, 0.0)), 40);
    }

    #[test]
    fn test_population_size_hidpi_window() {
        // 700x800 logical on a 2x display
        let viewport = Viewport::from_size(winit::dpi::PhysicalSize::new(1400, 1600), 2.0);
        assert_eq!(population_size(viewport), 40);
    }

    #[test]
    fn test_regenerate_places_inside_viewport() {
        let viewport = Viewport::new(1280.0, 720.0);
        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), viewport);

        assert_eq!(field.len(), 100);
        for p in &field.particles {
            assert_eq!(p.agent.position, p.agent.anchor);
            assert_eq!(p.agent.velocity, Vec2::ZERO);
            assert!(p.agent.position.x >= 0.0 && p.agent.position.x <= viewport.width);
            assert!(p.agent.position.y >= 0.0 && p.agent.position.y <= viewport.height);
            assert!(p.mark.size >= 1.0 && p.mark.size < 2.5);
            assert!(p.mark.length >= 4.0 && p.mark.length < 9.0);
            assert!(p.mark.mass_factor >= 1.0 && p.mark.mass_factor < 31.0);
            assert!(WAVE_PALETTE.contains(&p.mark.color));
        }
    }

    #[test]
    fn test_regenerate_replaces_population() {
        let mut field = WaveField::new();
        let mut rng = seeded();
        field.regenerate_with(&mut rng, Viewport::new(1600.0, 900.0));
        assert_eq!(field.len(), 100);
        field.regenerate_with(&mut rng, Viewport::new(360.0, 640.0));
        assert_eq!(field.len(), 40);
    }

    #[test]
    fn test_both_shapes_generated() {
        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), Viewport::new(1600.0, 900.0));
        let teardrops = field
            .particles
            .iter()
            .filter(|p| p.mark.shape == MarkShape::Teardrop)
            .count();
        assert!(teardrops > 0 && teardrops < field.len());
    }

    #[test]
    fn test_wrap_past_right_edge() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(wrap(Vec2::new(851.0, 300.0), viewport), Vec2::new(-50.0, 300.0));
        assert_eq!(wrap(Vec2::new(-51.0, 300.0), viewport), Vec2::new(850.0, 300.0));
        assert_eq!(wrap(Vec2::new(400.0, 651.0), viewport), Vec2::new(400.0, -50.0));
        assert_eq!(wrap(Vec2::new(400.0, -51.0), viewport), Vec2::new(400.0, 650.0));
        // Inside the margin nothing moves
        assert_eq!(wrap(Vec2::new(840.0, -40.0), viewport), Vec2::new(840.0, -40.0));
    }

    #[test]
    fn test_step_wraps_escaping_mark() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), viewport);
        {
            let p = &mut field.particles[0];
            p.agent.position = Vec2::new(849.0, 300.0);
            p.agent.anchor = Vec2::new(849.0, 300.0);
            p.agent.velocity = Vec2::new(8.0, 0.0);
        }
        field.step(&PointerState::new(WAVE_INFLUENCE_RADIUS), viewport);
        assert_eq!(field.particles[0].agent.position.x, -50.0);
    }

    #[test]
    fn test_drift_is_transient() {
        let viewport = Viewport::new(1600.0, 900.0);
        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), viewport);
        let anchors: Vec<Vec2> = field.particles.iter().map(|p| p.agent.anchor).collect();

        let pointer = PointerState::new(WAVE_INFLUENCE_RADIUS);
        for _ in 0..10 {
            field.step(&pointer, viewport);
        }

        let after: Vec<Vec2> = field.particles.iter().map(|p| p.agent.anchor).collect();
        assert_eq!(anchors, after);
        assert!((field.time - 10.0 * WAVE_TIME_STEP).abs() < 1e-5);
        // The drift alone sets marks in motion
        assert!(field.particles.iter().any(|p| p.agent.velocity != Vec2::ZERO));
    }

    #[test]
    fn test_drift_anchor_uses_undisplaced_coordinates() {
        let anchor = Vec2::new(100.0, 200.0);
        let drifted = drift_anchor(anchor, 0.5);
        let expected_x = 100.0 + (200.0f32 * 0.01 + 0.5).sin() * 30.0;
        let expected_y = 200.0 + (100.0f32 * 0.01 + 0.5).cos() * 30.0;
        assert!((drifted.x - expected_x).abs() < 1e-4);
        assert!((drifted.y - expected_y).abs() < 1e-4);
    }

    #[test]
    fn test_speed_never_exceeds_cap() {
        let viewport = Viewport::new(1600.0, 900.0);
        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), viewport);
        let mut pointer = PointerState::new(WAVE_INFLUENCE_RADIUS);

        for frame in 0..200 {
            pointer.move_to(Vec2::new((frame * 8) as f32, 450.0));
            field.step(&pointer, viewport);
            for p in &field.particles {
                assert!(p.agent.velocity.length() <= WAVE_FORCES.max_speed + 1e-3);
            }
        }
    }

    #[test]
    fn test_ease_heading_takes_short_way() {
        // From just below +pi to just above -pi is a small clockwise step
        let eased = ease_heading(3.0, -3.0, 0.5);
        assert!(eased > 3.0 || eased < -3.0, "eased = {}", eased);

        let eased = ease_heading(0.0, 1.0, 0.1);
        assert!((eased - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_draw_emits_one_shape_per_mark() {
        struct Counter {
            clears: usize,
            fills: usize,
        }
        impl Canvas for Counter {
            fn clear(&mut self) {
                self.clears += 1;
            }
            fn fill(&mut self, _shape: &Shape, _color: Rgba) {
                self.fills += 1;
            }
        }

        let mut field = WaveField::new();
        field.regenerate_with(&mut seeded(), Viewport::new(360.0, 640.0));
        let mut counter = Counter { clears: 0, fills: 0 };
        field.draw(&mut counter);
        assert_eq!(counter.clears, 1);
        assert_eq!(counter.fills, 40);
    }
}
