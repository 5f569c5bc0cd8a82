//! Lightbox with a shared-element transition.
//!
//! [`Lightbox`] is a state machine over an abstract [`Stage`]. Every input
//! returns a [`Wait`] telling the driver what must happen before the next
//! call: nothing, one rendered frame, or a timer. The driver feeds back
//! [`Lightbox::frame`] or [`Lightbox::timer`] accordingly, so the machine
//! never touches a clock itself.

use crate::config::GalleryConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// What the driver must wait for before calling back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Idle,
    NextFrame,
    Delay(u32),
}

/// Where a proxy is cloned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxySource {
    Thumbnail(usize),
    Viewer(MediaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    CloseButton,
    Backdrop,
    Escape,
}

/// The page elements the transition manipulates.
pub trait Stage {
    /// Handle to a floating visual clone.
    type Proxy;

    fn media_kind(&self, item: usize) -> Option<MediaKind>;
    fn thumbnail_rect(&self, item: usize) -> Rect;
    fn set_thumbnail_visible(&mut self, item: usize, visible: bool);

    /// Loads the item into the viewer and shows it fully transparent so its
    /// final layout can be measured.
    fn present_viewer(&mut self, item: usize, kind: MediaKind);
    fn viewer_rect(&self, kind: MediaKind) -> Rect;
    fn set_viewer_opaque(&mut self, kind: MediaKind, opaque: bool);
    /// Hides the viewer and stops any playing media.
    fn dismiss_viewer(&mut self, kind: MediaKind);

    fn lock_scroll(&mut self, locked: bool);

    fn spawn_proxy(&mut self, source: ProxySource, rect: Rect) -> Self::Proxy;
    /// Starts the proxy's animated move to `rect`.
    fn move_proxy(&mut self, proxy: &Self::Proxy, rect: Rect);
    fn fade_proxy(&mut self, proxy: &Self::Proxy);
    fn discard_proxy(&mut self, proxy: Self::Proxy);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Viewer shown transparent; waiting for it to lay out.
    Measure,
    /// Proxy placed at its start rectangle; waiting one frame so the move
    /// animates instead of jumping.
    Launch,
    /// Proxy travelling.
    Travel,
    /// Closing only: proxy fading out over the thumbnail.
    Fade,
}

struct Active<P> {
    item: usize,
    kind: MediaKind,
    step: Step,
    proxy: Option<P>,
}

pub struct Lightbox<S: Stage> {
    stage: S,
    config: GalleryConfig,
    phase: Phase,
    active: Option<Active<S::Proxy>>,
    close_requested: bool,
}

impl<S: Stage> Lightbox<S> {
    pub fn new(stage: S, config: GalleryConfig) -> Self {
        Self {
            stage,
            config,
            phase: Phase::Closed,
            active: None,
            close_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_item(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.item)
    }

    pub fn active_kind(&self) -> Option<MediaKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// A gallery entry was clicked. Ignored unless fully closed.
    pub fn open(&mut self, item: usize) -> Wait {
        if self.phase != Phase::Closed {
            return Wait::Idle;
        }
        let Some(kind) = self.stage.media_kind(item) else {
            return Wait::Idle;
        };
        self.stage.lock_scroll(true);
        self.stage.present_viewer(item, kind);
        self.active = Some(Active {
            item,
            kind,
            step: Step::Measure,
            proxy: None,
        });
        self.close_requested = false;
        self.phase = Phase::Opening;
        Wait::NextFrame
    }

    /// Close button, backdrop click or Escape. A request that arrives while
    /// opening is held until the viewer is fully open.
    pub fn close(&mut self, _trigger: Trigger) -> Wait {
        match self.phase {
            Phase::Open => self.begin_closing(),
            Phase::Opening => {
                self.close_requested = true;
                Wait::Idle
            }
            Phase::Closed | Phase::Closing => Wait::Idle,
        }
    }

    /// A requested frame has been rendered.
    pub fn frame(&mut self) -> Wait {
        let Some(active) = self.active.as_mut() else {
            return Wait::Idle;
        };
        match (self.phase, active.step) {
            (Phase::Opening, Step::Measure) => {
                let from = self.stage.thumbnail_rect(active.item);
                let proxy = self
                    .stage
                    .spawn_proxy(ProxySource::Thumbnail(active.item), from);
                self.stage.set_thumbnail_visible(active.item, false);
                active.proxy = Some(proxy);
                active.step = Step::Launch;
                Wait::NextFrame
            }
            (Phase::Opening, Step::Launch) => {
                let to = self.stage.viewer_rect(active.kind);
                if let Some(proxy) = &active.proxy {
                    self.stage.move_proxy(proxy, to);
                }
                active.step = Step::Travel;
                Wait::Delay(self.config.transition_ms)
            }
            (Phase::Closing, Step::Launch) => {
                let to = self.stage.thumbnail_rect(active.item);
                if let Some(proxy) = &active.proxy {
                    self.stage.move_proxy(proxy, to);
                }
                active.step = Step::Travel;
                Wait::Delay(self.config.transition_ms)
            }
            _ => Wait::Idle,
        }
    }

    /// A requested delay has elapsed.
    pub fn timer(&mut self) -> Wait {
        let Some(active) = self.active.as_mut() else {
            return Wait::Idle;
        };
        match (self.phase, active.step) {
            (Phase::Opening, Step::Travel) => {
                self.stage.set_viewer_opaque(active.kind, true);
                if let Some(proxy) = active.proxy.take() {
                    self.stage.discard_proxy(proxy);
                }
                self.phase = Phase::Open;
                if std::mem::take(&mut self.close_requested) {
                    self.begin_closing()
                } else {
                    Wait::Idle
                }
            }
            (Phase::Closing, Step::Travel) => {
                self.stage.set_thumbnail_visible(active.item, true);
                if let Some(proxy) = &active.proxy {
                    self.stage.fade_proxy(proxy);
                }
                active.step = Step::Fade;
                Wait::Delay(self.config.fade_out_ms)
            }
            (Phase::Closing, Step::Fade) => {
                if let Some(proxy) = active.proxy.take() {
                    self.stage.discard_proxy(proxy);
                }
                self.active = None;
                self.phase = Phase::Closed;
                Wait::Idle
            }
            _ => Wait::Idle,
        }
    }

    /// Drops whatever transition is in flight and restores the page as if
    /// the lightbox had never opened. For when the driver can no longer
    /// deliver frames or timers.
    pub fn abort(&mut self) {
        self.close_requested = false;
        if let Some(mut active) = self.active.take() {
            if let Some(proxy) = active.proxy.take() {
                self.stage.discard_proxy(proxy);
            }
            self.stage.set_thumbnail_visible(active.item, true);
            self.stage.set_viewer_opaque(active.kind, false);
            self.stage.dismiss_viewer(active.kind);
            self.stage.lock_scroll(false);
        }
        self.phase = Phase::Closed;
    }

    fn begin_closing(&mut self) -> Wait {
        let Some(active) = self.active.as_mut() else {
            self.phase = Phase::Closed;
            return Wait::Idle;
        };
        let from = self.stage.viewer_rect(active.kind);
        let proxy = self.stage.spawn_proxy(ProxySource::Viewer(active.kind), from);
        self.stage.set_viewer_opaque(active.kind, false);
        self.stage.dismiss_viewer(active.kind);
        self.stage.lock_scroll(false);
        active.proxy = Some(proxy);
        active.step = Step::Launch;
        self.phase = Phase::Closing;
        Wait::NextFrame
    }
}

/// Delay before the `index`-th item of an intersection batch is revealed.
pub fn reveal_delay(index: usize, config: &GalleryConfig) -> u32 {
    let batch = config.reveal_batch.max(1);
    (index % batch) as u32 * config.reveal_stagger_ms
}
