use glam::Vec2;
use petalfx::config::SwarmConfig;
use petalfx::frame::FrameClock;
use petalfx::pointer::PointerState;
use petalfx::scene::{Scene, SceneConfig};

fn small_config() -> SceneConfig {
    SceneConfig {
        swarm: SwarmConfig {
            count: 200,
            ..SwarmConfig::default()
        },
        ..SceneConfig::default()
    }
}

#[test]
fn click_starts_shockwave_and_splatter_at_the_same_point() {
    let mut scene = Scene::seeded(small_config(), 1.0, 1);
    scene.pointer_released(Vec2::new(0.25, 0.5));
    let origin = scene.shockwaves().active().unwrap().origin;
    let splatter = scene.splatters().splatters().next().unwrap();
    assert_eq!(splatter.droplets[0].pos, origin);
    assert!(origin.z.abs() < 1e-3);
}

#[test]
fn advancing_fills_every_instance_buffer() {
    let config = small_config();
    let mut scene = Scene::seeded(config, 1.5, 2);
    let mut clock = FrameClock::new();
    scene.pointer_moved(PointerState::At(Vec2::new(0.1, 0.1)));
    scene.pointer_released(Vec2::ZERO);

    scene.advance(&clock.tick(0.0));
    scene.pointer_moved(PointerState::At(Vec2::new(0.5, 0.1)));
    scene.advance(&clock.tick(16.0));

    assert_eq!(scene.swarm_instances().len(), 200);
    assert!(scene.swarm_instances().needs_upload());
    let (droplets, tints) = scene.droplets();
    assert_eq!(droplets.len(), config.splatter.droplets);
    assert_eq!(tints.len(), droplets.len() * 4);
    let trail: usize = scene.trail_batches().iter().map(|b| b.len()).sum();
    assert_eq!(trail, scene.trail().len());
    assert_eq!(trail, 2);
    let falling: usize = scene.falling_batches().iter().map(|b| b.len()).sum();
    assert_eq!(falling, config.falling.count);

    scene.mark_uploaded();
    assert!(!scene.swarm_instances().needs_upload());
}

#[test]
fn pointer_leaving_stops_the_trail() {
    let mut scene = Scene::seeded(small_config(), 1.0, 3);
    let mut clock = FrameClock::new();
    scene.pointer_moved(PointerState::At(Vec2::new(0.3, 0.0)));
    scene.advance(&clock.tick(0.0));
    scene.pointer_left();
    assert_eq!(scene.pointer(), PointerState::Absent);
    let before = scene.trail().len();
    scene.advance(&clock.tick(16.0));
    assert!(scene.trail().len() <= before);
}
