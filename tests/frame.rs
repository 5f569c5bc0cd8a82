use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use petalfx::config::FlatConfig;
use petalfx::flat::{FlatField, FlatParticle};
use petalfx::frame::{Effect, FrameClock, FrameDriver, FrameTick, Liveness, MAX_DELTA};
use petalfx::render::{FlatBackground, FlatSurface};

#[test]
fn clock_measures_seconds_between_frames() {
    let mut clock = FrameClock::new();
    let first = clock.tick(5000.0);
    assert_eq!(first.delta, 0.0);
    assert_eq!(first.elapsed, 0.0);
    assert_eq!(first.frame, 0);

    let second = clock.tick(5016.0);
    assert!((second.delta - 0.016).abs() < 1e-6);
    assert!((second.elapsed - 0.016).abs() < 1e-6);
    assert_eq!(second.frame, 1);
}

#[test]
fn long_gaps_and_backwards_time_are_tamed() {
    let mut clock = FrameClock::new();
    clock.tick(0.0);
    let after_gap = clock.tick(10_000.0);
    assert_eq!(after_gap.delta, MAX_DELTA);
    assert!((after_gap.elapsed - 10.0).abs() < 1e-4);

    let backwards = clock.tick(9_000.0);
    assert_eq!(backwards.delta, 0.0);
    assert!(backwards.elapsed >= after_gap.elapsed);
}

#[derive(Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<&'static str>>>,
    ticks: Vec<FrameTick>,
}

impl Effect for Recorder {
    fn update(&mut self, tick: &FrameTick) {
        self.calls.borrow_mut().push("update");
        self.ticks.push(*tick);
    }

    fn render(&mut self) {
        self.calls.borrow_mut().push("render");
    }
}

#[test]
fn driver_updates_before_rendering_each_frame() {
    let recorder = Recorder::default();
    let calls = recorder.calls.clone();
    let mut driver = FrameDriver::new(recorder, Liveness::new());
    for i in 0..3 {
        assert!(driver.step(i as f64 * 16.0));
    }
    assert_eq!(
        *calls.borrow(),
        vec!["update", "render", "update", "render", "update", "render"]
    );
    assert_eq!(driver.effect().ticks.len(), 3);
}

#[test]
fn torn_down_driver_stops() {
    let liveness = Liveness::new();
    let mut driver = FrameDriver::new(Recorder::default(), liveness.clone());
    assert!(driver.step(0.0));
    liveness.tear_down();
    assert!(!driver.step(16.0));
    assert_eq!(driver.effect().ticks.len(), 1);
}

#[test]
fn cached_page_keeps_running_after_hide() {
    let liveness = Liveness::new();
    let mut driver = FrameDriver::new(Recorder::default(), liveness.clone());
    assert!(!liveness.page_hidden(true));
    assert!(liveness.is_alive());
    assert!(driver.step(0.0));

    assert!(liveness.page_hidden(false));
    assert!(!liveness.is_alive());
    assert!(!driver.step(16.0));
}

#[derive(Debug, PartialEq)]
enum Draw {
    Clear(Vec2),
    Circle(Vec2),
    Line(Vec2, Vec2),
}

#[derive(Default)]
struct RecordingSurface(Vec<Draw>);

impl FlatSurface for RecordingSurface {
    fn clear(&mut self, size: Vec2) {
        self.0.push(Draw::Clear(size));
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, _rgb: [u8; 3], _alpha: f32) {
        self.0.push(Draw::Circle(center));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, _rgb: [u8; 3], _alpha: f32) {
        self.0.push(Draw::Line(from, to));
    }
}

#[test]
fn constellation_frame_draws_updated_positions() {
    let bounds = Vec2::new(300.0, 200.0);
    let field = FlatField::from_particles(
        FlatConfig::default(),
        bounds,
        vec![
            FlatParticle::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), 2.0, 0.5),
            FlatParticle::new(Vec2::new(50.0, 10.0), Vec2::new(-1.0, 0.0), 2.0, 0.5),
        ],
    );
    let mut driver = FrameDriver::new(
        FlatBackground::new(field, RecordingSurface::default()),
        Liveness::new(),
    );
    assert!(driver.step(0.0));
    let a = Vec2::new(11.0, 10.0);
    let b = Vec2::new(49.0, 10.0);
    assert_eq!(
        driver.effect().surface().0,
        vec![Draw::Clear(bounds), Draw::Circle(a), Draw::Circle(b), Draw::Line(a, b)]
    );
}
