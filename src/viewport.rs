use std::time::{Duration, Instant};

use winit::dpi::{LogicalSize, PhysicalSize};

use crate::config::NARROW_BREAKPOINT;

/// Density tier used to pick a population size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Narrow,
    Wide,
}

/// Drawable region size in logical pixels.
///
/// Every length the fields use (breakpoint, spacing, radii) is in logical
/// pixels, so a HiDPI window is laid out like a standard one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Logical viewport of a window's physical inner size
    pub fn from_size(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical: LogicalSize<f32> = size.to_logical(scale_factor);
        Self::new(logical.width, logical.height)
    }

    pub fn device_class(&self) -> DeviceClass {
        if self.width < NARROW_BREAKPOINT {
            DeviceClass::Narrow
        } else {
            DeviceClass::Wide
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Holds back a value until no newer one has arrived for `delay`.
///
/// Time is passed in by the caller, so the event loop decides when to poll
/// and tests never sleep.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Release the pending value once its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(self.pending, Some((deadline, _)) if deadline <= now);
        if ready {
            self.pending.take().map(|(_, value)| value)
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
