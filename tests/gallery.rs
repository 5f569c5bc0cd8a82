use petalfx::config::GalleryConfig;
use petalfx::gallery::{
    reveal_delay, Lightbox, MediaKind, Phase, ProxySource, Rect, Stage, Trigger, Wait,
};

/// Records what the lightbox does to the page.
#[derive(Default)]
struct FakeStage {
    kinds: Vec<MediaKind>,
    hidden: Vec<usize>,
    viewer_opaque: bool,
    viewer_shown: bool,
    scroll_locked: bool,
    next_proxy: u32,
    proxies: Vec<(u32, ProxySource, Rect)>,
    faded: Vec<u32>,
}

impl FakeStage {
    fn with_items(kinds: &[MediaKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            ..Self::default()
        }
    }
}

const VIEWER: Rect = Rect {
    x: 100.0,
    y: 50.0,
    width: 800.0,
    height: 600.0,
};

impl Stage for FakeStage {
    type Proxy = u32;

    fn media_kind(&self, item: usize) -> Option<MediaKind> {
        self.kinds.get(item).copied()
    }

    fn thumbnail_rect(&self, item: usize) -> Rect {
        Rect::new(item as f32 * 200.0, 900.0, 180.0, 180.0)
    }

    fn set_thumbnail_visible(&mut self, item: usize, visible: bool) {
        if visible {
            self.hidden.retain(|&i| i != item);
        } else {
            self.hidden.push(item);
        }
    }

    fn present_viewer(&mut self, _item: usize, _kind: MediaKind) {
        self.viewer_shown = true;
        self.viewer_opaque = false;
    }

    fn viewer_rect(&self, _kind: MediaKind) -> Rect {
        VIEWER
    }

    fn set_viewer_opaque(&mut self, _kind: MediaKind, opaque: bool) {
        self.viewer_opaque = opaque;
    }

    fn dismiss_viewer(&mut self, _kind: MediaKind) {
        self.viewer_shown = false;
    }

    fn lock_scroll(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn spawn_proxy(&mut self, source: ProxySource, rect: Rect) -> u32 {
        self.next_proxy += 1;
        self.proxies.push((self.next_proxy, source, rect));
        self.next_proxy
    }

    fn move_proxy(&mut self, proxy: &u32, rect: Rect) {
        if let Some(p) = self.proxies.iter_mut().find(|p| p.0 == *proxy) {
            p.2 = rect;
        }
    }

    fn fade_proxy(&mut self, proxy: &u32) {
        self.faded.push(*proxy);
    }

    fn discard_proxy(&mut self, proxy: u32) {
        self.proxies.retain(|p| p.0 != proxy);
    }
}

fn lightbox(kinds: &[MediaKind]) -> Lightbox<FakeStage> {
    Lightbox::new(FakeStage::with_items(kinds), GalleryConfig::default())
}

/// Plays scheduled waits until the machine goes idle, returning them.
fn settle(lb: &mut Lightbox<FakeStage>, mut wait: Wait) -> Vec<Wait> {
    let mut seen = Vec::new();
    while wait != Wait::Idle {
        seen.push(wait);
        wait = match wait {
            Wait::NextFrame => lb.frame(),
            Wait::Delay(_) => lb.timer(),
            Wait::Idle => unreachable!(),
        };
    }
    seen
}

#[test]
fn open_moves_a_proxy_from_thumbnail_to_viewer() {
    let mut lb = lightbox(&[MediaKind::Image, MediaKind::Video]);
    let wait = lb.open(1);
    assert_eq!(wait, Wait::NextFrame);
    assert_eq!(lb.phase(), Phase::Opening);
    assert!(lb.stage().scroll_locked);
    assert!(lb.stage().viewer_shown);
    assert!(!lb.stage().viewer_opaque);

    let wait = lb.frame();
    assert_eq!(wait, Wait::NextFrame);
    let (_, source, rect) = lb.stage().proxies[0];
    assert_eq!(source, ProxySource::Thumbnail(1));
    assert_eq!(rect, Rect::new(200.0, 900.0, 180.0, 180.0));
    assert_eq!(lb.stage().hidden, vec![1]);

    let wait = lb.frame();
    assert_eq!(wait, Wait::Delay(600));
    assert_eq!(lb.stage().proxies[0].2, VIEWER);

    assert_eq!(lb.timer(), Wait::Idle);
    assert_eq!(lb.phase(), Phase::Open);
    assert_eq!(lb.active_kind(), Some(MediaKind::Video));
    assert!(lb.stage().viewer_opaque);
    assert!(lb.stage().proxies.is_empty());
}

#[test]
fn close_round_trip_restores_the_page() {
    for trigger in [Trigger::CloseButton, Trigger::Backdrop, Trigger::Escape] {
        let mut lb = lightbox(&[MediaKind::Image, MediaKind::Image, MediaKind::Image]);
        let wait = lb.open(2);
        settle(&mut lb, wait);
        assert_eq!(lb.phase(), Phase::Open);

        let wait = lb.close(trigger);
        assert_eq!(lb.phase(), Phase::Closing);
        assert!(!lb.stage().scroll_locked);
        assert!(!lb.stage().viewer_shown);
        let (_, source, rect) = lb.stage().proxies[0];
        assert_eq!(source, ProxySource::Viewer(MediaKind::Image));
        assert_eq!(rect, VIEWER);

        let waits = settle(&mut lb, wait);
        assert_eq!(waits, vec![Wait::NextFrame, Wait::Delay(600), Wait::Delay(200)]);
        assert_eq!(lb.phase(), Phase::Closed);
        assert_eq!(lb.active_item(), None);
        assert!(lb.stage().hidden.is_empty());
        assert!(lb.stage().proxies.is_empty());
        assert_eq!(lb.stage().faded.len(), 1);
    }
}

#[test]
fn closing_while_closed_does_nothing() {
    let mut lb = lightbox(&[MediaKind::Image]);
    assert_eq!(lb.close(Trigger::Escape), Wait::Idle);
    assert_eq!(lb.phase(), Phase::Closed);
    assert!(lb.stage().proxies.is_empty());
    assert!(!lb.stage().scroll_locked);
}

#[test]
fn close_during_opening_runs_after_open_completes() {
    let mut lb = lightbox(&[MediaKind::Image]);
    let wait = lb.open(0);
    let wait = match wait {
        Wait::NextFrame => lb.frame(),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(lb.close(Trigger::Escape), Wait::Idle);
    assert_eq!(lb.phase(), Phase::Opening);

    settle(&mut lb, wait);
    assert_eq!(lb.phase(), Phase::Closed);
    assert!(lb.stage().hidden.is_empty());
    assert!(lb.stage().proxies.is_empty());
}

#[test]
fn second_open_is_ignored_until_closed() {
    let mut lb = lightbox(&[MediaKind::Image, MediaKind::Image]);
    let wait = lb.open(0);
    assert_eq!(lb.open(1), Wait::Idle);
    settle(&mut lb, wait);
    assert_eq!(lb.open(1), Wait::Idle);
    assert_eq!(lb.active_item(), Some(0));
}

#[test]
fn unknown_item_does_not_open() {
    let mut lb = lightbox(&[MediaKind::Image]);
    assert_eq!(lb.open(5), Wait::Idle);
    assert_eq!(lb.phase(), Phase::Closed);
    assert!(!lb.stage().scroll_locked);
}

#[test]
fn reveal_delay_staggers_in_batches_of_three() {
    let config = GalleryConfig::default();
    let delays: Vec<u32> = (0..7).map(|i| reveal_delay(i, &config)).collect();
    assert_eq!(delays, vec![0, 100, 200, 0, 100, 200, 0]);

    let unbatched = GalleryConfig {
        reveal_batch: 0,
        ..config
    };
    assert_eq!(reveal_delay(4, &unbatched), 0);
}

#[test]
fn stalled_opening_can_be_abandoned() {
    let mut lb = lightbox(&[MediaKind::Image, MediaKind::Video]);
    assert_eq!(lb.open(0), Wait::NextFrame);
    // No frame or timer ever arrives.
    for trigger in [Trigger::CloseButton, Trigger::Backdrop, Trigger::Escape] {
        assert_eq!(lb.close(trigger), Wait::Idle);
    }
    assert_eq!(lb.open(1), Wait::Idle);
    assert_eq!(lb.phase(), Phase::Opening);
    assert!(lb.stage().scroll_locked);

    lb.abort();
    assert_eq!(lb.phase(), Phase::Closed);
    assert_eq!(lb.active_item(), None);
    assert!(!lb.stage().scroll_locked);
    assert!(!lb.stage().viewer_shown);
    assert!(!lb.stage().viewer_opaque);
    assert!(lb.stage().hidden.is_empty());
    assert!(lb.stage().proxies.is_empty());

    let wait = lb.open(1);
    assert_eq!(wait, Wait::NextFrame);
    settle(&mut lb, wait);
    assert_eq!(lb.phase(), Phase::Open);
    assert_eq!(lb.active_item(), Some(1));
}

#[test]
fn abort_mid_flight_removes_the_proxy() {
    let mut lb = lightbox(&[MediaKind::Image]);
    lb.open(0);
    lb.frame();
    assert_eq!(lb.stage().hidden, vec![0]);
    assert_eq!(lb.stage().proxies.len(), 1);
    assert_eq!(lb.close(Trigger::Escape), Wait::Idle);

    lb.abort();
    assert_eq!(lb.phase(), Phase::Closed);
    assert!(lb.stage().hidden.is_empty());
    assert!(lb.stage().proxies.is_empty());
    // The deferred close is forgotten along with the transition.
    let wait = lb.open(0);
    settle(&mut lb, wait);
    assert_eq!(lb.phase(), Phase::Open);
}

#[test]
fn abort_while_closed_changes_nothing() {
    let mut lb = lightbox(&[MediaKind::Image]);
    lb.abort();
    assert_eq!(lb.phase(), Phase::Closed);
    assert!(!lb.stage().scroll_locked);
    assert!(lb.stage().proxies.is_empty());
}
