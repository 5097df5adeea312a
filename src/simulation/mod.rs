mod dots;
mod force;
mod wave;

pub use dots::DotGrid;
pub use force::{step_agent, Agent, ForceParams, PointerState};
pub use wave::WaveField;

use crate::render::{Canvas, Layer};
use crate::scheduler::SleepPolicy;
use crate::viewport::Viewport;

/// Whether any agent is still visibly moving after a step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Motion {
    #[default]
    Settled,
    Moving,
}

/// One decorative population: how it is generated, stepped and drawn.
pub trait Field {
    fn name(&self) -> &'static str;

    fn sleep_policy(&self) -> SleepPolicy;

    /// Radius of pointer influence for this field's pointer state
    fn influence_radius(&self) -> f32;

    /// Clear color behind the agents, RGBA
    fn background(&self) -> [f64; 4];

    /// Opacity and fade of the drawn layer
    fn layer(&self) -> Layer;

    /// Replace the whole population for a new viewport
    fn regenerate(&mut self, viewport: Viewport);

    /// Advance every agent by one frame
    fn step(&mut self, pointer: &PointerState, viewport: Viewport) -> Motion;

    /// Clear `canvas` and draw the current population
    fn draw(&self, canvas: &mut dyn Canvas);

    fn len(&self) -> usize;
}
