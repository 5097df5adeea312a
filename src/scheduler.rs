use crate::simulation::Motion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    /// No frame requested; nothing runs until an event wakes the loop
    Suspended,
    /// A frame is requested from the host
    Scheduled,
}

/// How a visible field decides whether to keep requesting frames
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepPolicy {
    /// Request every frame while visible
    Continuous,
    /// Stop once settled with the pointer away
    AutoSleep,
}

/// What the frame that just ran observed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameContext {
    pub motion: Motion,
    pub pointer_present: bool,
}

/// Visibility-gated frame loop.
///
/// The host asks for a redraw whenever an operation returns `true` and calls
/// [`FrameScheduler::tick`] after each frame it ran.
#[derive(Debug)]
pub struct FrameScheduler {
    policy: SleepPolicy,
    state: FrameState,
    visible: bool,
    stopped: bool,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(policy: SleepPolicy) -> Self {
        Self {
            policy,
            state: FrameState::Suspended,
            visible: true,
            stopped: false,
            frames: 0,
        }
    }

    /// Begin the loop. Returns whether a frame must be requested.
    pub fn start(&mut self) -> bool {
        self.resume()
    }

    /// Halt for good; later wakes and visibility changes are ignored
    pub fn stop(&mut self) {
        self.stopped = true;
        self.suspend();
    }

    /// Resume after input or regeneration. Returns whether a frame must be requested.
    pub fn wake(&mut self) -> bool {
        self.resume()
    }

    /// Returns whether a frame must be requested.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.visible = visible;
        if visible {
            self.resume()
        } else {
            self.suspend();
            false
        }
    }

    /// Decide the next state from the frame that just ran
    pub fn tick(&mut self, context: FrameContext) -> FrameState {
        self.frames += 1;

        if self.stopped || !self.visible {
            self.suspend();
            return self.state;
        }

        let keep_going = match self.policy {
            SleepPolicy::Continuous => true,
            SleepPolicy::AutoSleep => {
                context.motion == Motion::Moving || context.pointer_present
            }
        };

        if keep_going {
            self.state = FrameState::Scheduled;
        } else {
            log::trace!("settled after frame {}, sleeping", self.frames);
            self.suspend();
        }
        self.state
    }

    /// Whether the next frame callback should do any work
    pub fn is_scheduled(&self) -> bool {
        self.state == FrameState::Scheduled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Frames run since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn resume(&mut self) -> bool {
        if self.stopped || !self.visible || self.state == FrameState::Scheduled {
            return false;
        }
        log::trace!("frame loop resumed");
        self.state = FrameState::Scheduled;
        true
    }

    fn suspend(&mut self) {
        self.state = FrameState::Suspended;
    }
}
