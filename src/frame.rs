//! Frame scheduling independent of the browser.
//!
//! The platform supplies a timestamp per display refresh; [`FrameDriver`]
//! turns it into a [`FrameTick`] and runs update then render on its effect.
//! Tests drive it with synthetic timestamps.

use std::cell::Cell;
use std::rc::Rc;

/// Longest frame gap fed to the simulation, in seconds. Background tabs stop
/// delivering frames and the first frame after returning would otherwise
/// fling everything.
pub const MAX_DELTA: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTick {
    /// Seconds since the first frame.
    pub elapsed: f32,
    /// Seconds since the previous frame, clamped to [`MAX_DELTA`].
    pub delta: f32,
    pub frame: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    last_ms: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `now_ms` is the platform's monotonic timestamp. The first call yields a
    /// zero delta. Timestamps going backwards are treated as no time passing.
    pub fn tick(&mut self, now_ms: f64) -> FrameTick {
        let start = *self.start_ms.get_or_insert(now_ms);
        let delta = if self.frame == 0 {
            0.0
        } else {
            ((now_ms - self.last_ms).max(0.0) / 1000.0) as f32
        };
        self.last_ms = self.last_ms.max(now_ms);
        let tick = FrameTick {
            elapsed: ((self.last_ms - start) / 1000.0) as f32,
            delta: delta.min(MAX_DELTA),
            frame: self.frame,
        };
        self.frame += 1;
        tick
    }
}

/// Anything the frame loop can drive.
pub trait Effect {
    fn update(&mut self, tick: &FrameTick);
    fn render(&mut self);
}

/// Shared flag flipped when the hosting view goes away.
///
/// Timer and frame callbacks hold a clone and do nothing once it is dead.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn tear_down(&self) {
        self.0.set(false);
    }

    /// The page was hidden. A page kept in the back/forward cache comes back
    /// with its state intact, so only a real unload tears down. Returns
    /// whether it did.
    pub fn page_hidden(&self, persisted: bool) -> bool {
        if !persisted {
            self.tear_down();
        }
        !persisted
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrameDriver<E> {
    clock: FrameClock,
    effect: E,
    liveness: Liveness,
}

impl<E: Effect> FrameDriver<E> {
    pub fn new(effect: E, liveness: Liveness) -> Self {
        Self {
            clock: FrameClock::new(),
            effect,
            liveness,
        }
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// Runs one frame. Returns `false` once the view is torn down; the caller
    /// stops scheduling further frames.
    pub fn step(&mut self, now_ms: f64) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }
        let tick = self.clock.tick(now_ms);
        self.effect.update(&tick);
        self.effect.render();
        true
    }
}
