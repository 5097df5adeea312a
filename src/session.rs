use std::time::{Duration, Instant};

use glam::Vec2;

use crate::config::RESIZE_DEBOUNCE_MS;
use crate::render::{Canvas, Layer};
use crate::scheduler::{FrameContext, FrameScheduler, FrameState};
use crate::simulation::{Field, PointerState};
use crate::viewport::{Debouncer, Viewport};

/// Result of one frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Surface hidden or session released; nothing was cleared, stepped or drawn
    Hidden,
    /// Loop asleep; the population was not stepped
    Idle,
    /// Population stepped and drawn; the state says whether to request another frame
    Drawn(FrameState),
}

/// Everything one mounted field owns: population, pointer, viewport and frame loop.
///
/// Host events arrive one at a time through `&mut self`, never concurrently
/// with [`Session::frame`]. Methods returning `bool` report whether the host
/// should request a redraw.
pub struct Session {
    field: Box<dyn Field>,
    pointer: PointerState,
    viewport: Viewport,
    scheduler: FrameScheduler,
    resize: Debouncer<Viewport>,
    released: bool,
}

impl Session {
    pub fn new(mut field: Box<dyn Field>, viewport: Viewport) -> Self {
        field.regenerate(viewport);
        log::debug!(
            "{}: {} agents for {}x{}",
            field.name(),
            field.len(),
            viewport.width,
            viewport.height
        );

        Self {
            pointer: PointerState::new(field.influence_radius()),
            scheduler: FrameScheduler::new(field.sleep_policy()),
            resize: Debouncer::new(Duration::from_millis(RESIZE_DEBOUNCE_MS)),
            field,
            viewport,
            released: false,
        }
    }

    /// Allow animation. Returns whether to request a redraw.
    pub fn start(&mut self) -> bool {
        !self.released && self.scheduler.start()
    }

    /// Pointer moved to surface-local `(x, y)`
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        if self.released || !self.scheduler.is_visible() {
            return false;
        }

        if y < 0.0 || y > self.viewport.height {
            self.pointer.clear();
            return false;
        }

        self.pointer.move_to(Vec2::new(x, y));
        self.scheduler.wake()
    }

    pub fn pointer_left(&mut self) {
        self.pointer.clear();
    }

    /// Record a new surface size; regeneration waits for the resize to settle
    pub fn resize_requested(&mut self, viewport: Viewport, now: Instant) {
        if self.released {
            return;
        }
        if viewport == self.viewport && !self.resize.is_pending() {
            return;
        }
        self.resize.schedule(now, viewport);
    }

    /// Regenerate if the debounce window has closed.
    ///
    /// Returns the new viewport so the host can resize the drawable surface.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Viewport> {
        let viewport = self.resize.poll(now)?;

        self.viewport = viewport;
        self.field.regenerate(viewport);
        log::debug!(
            "{}: regenerated {} agents for {}x{}",
            self.field.name(),
            self.field.len(),
            viewport.width,
            viewport.height
        );

        self.scheduler.wake();
        Some(viewport)
    }

    /// When the host should next call [`Session::poll_resize`]
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Visibility of the drawable surface changed. Returns whether to request a redraw.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.released {
            return false;
        }
        log::trace!("{}: visible = {}", self.field.name(), visible);
        self.scheduler.set_visible(visible)
    }

    /// Run one frame callback: step, clear and redraw while scheduled
    pub fn frame(&mut self, canvas: &mut dyn Canvas) -> FrameOutcome {
        if self.released || !self.scheduler.is_visible() {
            return FrameOutcome::Hidden;
        }
        if !self.scheduler.is_scheduled() {
            return FrameOutcome::Idle;
        }

        let motion = self.field.step(&self.pointer, self.viewport);
        self.field.draw(canvas);

        let state = self.scheduler.tick(FrameContext {
            motion,
            pointer_present: self.pointer.is_present(),
        });
        FrameOutcome::Drawn(state)
    }

    /// Redraw the current population without advancing it
    pub fn repaint(&self, canvas: &mut dyn Canvas) {
        if self.released || !self.scheduler.is_visible() {
            return;
        }
        self.field.draw(canvas);
    }

    /// Release everything at once: pending resize, frame loop and pointer.
    /// The session ignores all later events.
    pub fn teardown(&mut self) {
        if self.released {
            return;
        }
        self.resize.cancel();
        self.scheduler.stop();
        self.pointer.clear();
        self.released = true;
        log::debug!(
            "{}: released after {} frames",
            self.field.name(),
            self.scheduler.frames()
        );
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    pub fn background(&self) -> [f64; 4] {
        self.field.background()
    }

    pub fn layer(&self) -> Layer {
        self.field.layer()
    }

    pub fn agent_count(&self) -> usize {
        self.field.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Rgba, Shape};
    use crate::simulation::{DotGrid, WaveField};

    #[derive(Default)]
    struct RecordingCanvas {
        clears: usize,
        fills: usize,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill(&mut self, _shape: &Shape, _color: Rgba) {
            self.fills += 1;
        }
    }

    fn dot_session() -> Session {
        Session::new(Box::new(DotGrid::new()), Viewport::new(320.0, 320.0))
    }

    fn wave_session() -> Session {
        Session::new(Box::new(WaveField::new()), Viewport::new(1600.0, 900.0))
    }

    /// Drive frames until the loop suspends, like a host honouring redraw requests
    fn run_until_idle(session: &mut Session, canvas: &mut RecordingCanvas, limit: usize) -> usize {
        for frame in 0..limit {
            match session.frame(canvas) {
                FrameOutcome::Drawn(FrameState::Scheduled) => continue,
                _ => return frame,
            }
        }
        panic!("loop still running after {} frames", limit);
    }

    #[test]
    fn test_new_session_populates() {
        assert_eq!(wave_session().agent_count(), 100);
        assert_eq!(dot_session().agent_count(), 100);
    }

    #[test]
    fn test_dot_grid_sleeps_at_rest() {
        let mut session = dot_session();
        let mut canvas = RecordingCanvas::default();
        assert!(session.start());

        assert_eq!(
            session.frame(&mut canvas),
            FrameOutcome::Drawn(FrameState::Suspended)
        );
        assert_eq!(canvas.fills, 100);

        // Asleep: further callbacks do no work
        assert_eq!(session.frame(&mut canvas), FrameOutcome::Idle);
        assert_eq!(canvas.fills, 100);
        assert_eq!(canvas.clears, 1);
    }

    #[test]
    fn test_pointer_wakes_sleeping_grid() {
        let mut session = dot_session();
        let mut canvas = RecordingCanvas::default();
        session.start();
        session.frame(&mut canvas);
        assert!(!session.scheduler.is_scheduled());

        assert!(session.pointer_moved(100.0, 100.0));
        assert_eq!(
            session.frame(&mut canvas),
            FrameOutcome::Drawn(FrameState::Scheduled)
        );

        // Pointer leaves; the grid settles and sleeps again
        session.pointer_left();
        run_until_idle(&mut session, &mut canvas, 500);
        assert!(!session.scheduler.is_scheduled());
    }

    #[test]
    fn test_pointer_outside_vertical_bounds_is_cleared() {
        let mut session = dot_session();
        session.start();
        assert!(!session.pointer_moved(100.0, 400.0));
        assert!(!session.pointer.is_present());

        session.pointer_moved(100.0, 100.0);
        assert!(session.pointer.is_present());
        session.pointer_moved(100.0, -5.0);
        assert!(!session.pointer.is_present());
    }

    #[test]
    fn test_hidden_surface_draws_nothing() {
        for mut session in [wave_session(), dot_session()] {
            let mut canvas = RecordingCanvas::default();
            session.start();
            session.set_visible(false);

            assert_eq!(session.frame(&mut canvas), FrameOutcome::Hidden);
            session.repaint(&mut canvas);
            assert_eq!(canvas.clears, 0);
            assert_eq!(canvas.fills, 0);

            // Pointer input while hidden is dropped
            assert!(!session.pointer_moved(10.0, 10.0));
            assert!(!session.pointer.is_present());

            // Visible again: drawing resumes without any other event
            assert!(session.set_visible(true));
            assert!(matches!(session.frame(&mut canvas), FrameOutcome::Drawn(_)));
            assert!(canvas.fills > 0);
        }
    }

    #[test]
    fn test_wave_field_runs_continuously() {
        let mut session = wave_session();
        let mut canvas = RecordingCanvas::default();
        session.start();
        for _ in 0..20 {
            assert_eq!(
                session.frame(&mut canvas),
                FrameOutcome::Drawn(FrameState::Scheduled)
            );
        }
        assert_eq!(canvas.clears, 20);
        assert_eq!(canvas.fills, 20 * 100);
    }

    #[test]
    fn test_resize_is_debounced_and_replaces_population() {
        let mut session = wave_session();
        let start = Instant::now();

        session.resize_requested(Viewport::new(1000.0, 500.0), start);
        session.resize_requested(Viewport::new(360.0, 640.0), start + Duration::from_millis(50));
        assert_eq!(session.poll_resize(start + Duration::from_millis(120)), None);
        assert_eq!(session.agent_count(), 100);

        let viewport = session.poll_resize(start + Duration::from_millis(150));
        assert_eq!(viewport, Some(Viewport::new(360.0, 640.0)));
        assert_eq!(session.agent_count(), 40);
        assert_eq!(session.viewport(), Viewport::new(360.0, 640.0));
    }

    #[test]
    fn test_resize_to_current_size_is_ignored() {
        let mut session = wave_session();
        session.resize_requested(Viewport::new(1600.0, 900.0), Instant::now());
        assert_eq!(session.resize_deadline(), None);
    }

    #[test]
    fn test_resize_wakes_sleeping_grid() {
        let mut session = dot_session();
        let mut canvas = RecordingCanvas::default();
        session.start();
        session.frame(&mut canvas);
        assert!(!session.scheduler.is_scheduled());

        let start = Instant::now();
        session.resize_requested(Viewport::new(640.0, 320.0), start);
        session.poll_resize(start + Duration::from_millis(RESIZE_DEBOUNCE_MS));
        assert_eq!(session.agent_count(), 200);
        assert!(session.scheduler.is_scheduled());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut session = dot_session();
        let mut canvas = RecordingCanvas::default();
        session.start();
        session.pointer_moved(50.0, 50.0);
        session.resize_requested(Viewport::new(640.0, 640.0), Instant::now());

        session.teardown();
        assert!(session.released);
        assert_eq!(session.resize_deadline(), None);
        assert!(!session.pointer.is_present());
        assert_eq!(session.frame(&mut canvas), FrameOutcome::Hidden);
        assert!(!session.pointer_moved(60.0, 60.0));
        assert!(!session.set_visible(true));
        assert!(!session.start());
        assert_eq!(canvas.clears, 0);
    }
}
