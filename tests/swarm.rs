use glam::Vec3;
use petalfx::config::{ShockwaveConfig, SwarmConfig};
use petalfx::impulse::ShockwaveSlot;
use petalfx::instance::InstanceBuffer;
use petalfx::swarm::{damp_toward, repulsion, Swarm, SwarmParticle};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn small_swarm(count: usize) -> Swarm {
    let config = SwarmConfig {
        count,
        ..SwarmConfig::default()
    };
    Swarm::new(config, &mut StdRng::seed_from_u64(11))
}

fn particle_at(anchor: Vec3) -> SwarmParticle {
    SwarmParticle {
        pos: anchor,
        anchor,
        phase: 0.0,
        speed: 0.0,
        scale_speed: 0.1,
        scale_offset: 0.0,
        base_scale: 0.02,
    }
}

#[test]
fn damping_approaches_without_overshoot() {
    let target = Vec3::new(3.0, -2.0, 1.0);
    let mut pos = Vec3::ZERO;
    let mut last = pos.distance(target);
    for _ in 0..60 {
        pos = damp_toward(pos, target, 0.08);
        let dist = pos.distance(target);
        assert!(dist < last);
        assert!(pos.x <= target.x && pos.y >= target.y && pos.z <= target.z);
        last = dist;
    }
    assert!(last < 0.05);
}

#[test]
fn spawns_inside_extent_with_fixed_colours() {
    let swarm = small_swarm(500);
    let half = swarm.config().extent * 0.5;
    assert_eq!(swarm.len(), 500);
    assert_eq!(swarm.colors().len(), 500);
    assert_eq!(swarm.colors().as_slice().len(), 1500);
    for p in swarm.particles() {
        assert!(p.anchor.abs().cmple(half).all());
    }

    let mut swarm = swarm;
    let before = swarm.colors().as_slice().to_vec();
    let mut out = InstanceBuffer::default();
    swarm.update(1.0, Some(Vec3::ZERO), &ShockwaveSlot::default(), &mut out);
    assert_eq!(swarm.colors().as_slice(), &before[..]);
    assert_eq!(out.len(), 500);
}

#[test]
fn drift_stays_within_amplitude() {
    let config = SwarmConfig::default();
    let mut p = particle_at(Vec3::new(1.0, 2.0, 3.0));
    p.speed = 0.15;
    p.phase = 42.0;
    for step in 0..100 {
        let t = p.drift_target(step as f32 * 0.37, &config);
        let offset = (t - p.anchor).abs();
        assert!(offset.max_element() <= config.drift_amplitude + 1e-5);
    }
}

#[test]
fn repulsion_is_linear_inside_radius_and_zero_outside() {
    let push = repulsion(Vec3::new(2.5, 0.0, 0.0), Vec3::ZERO, 5.0, 4.0).unwrap();
    assert!((push - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    assert!(repulsion(Vec3::new(6.0, 0.0, 0.0), Vec3::ZERO, 5.0, 4.0).is_none());
    assert!(repulsion(Vec3::ZERO, Vec3::ZERO, 5.0, 4.0).is_none());
}

#[test]
fn pointer_pushes_target_and_boosts_scale() {
    let swarm = small_swarm(0);
    let p = particle_at(Vec3::new(1.0, 0.0, 0.0));
    let calm = swarm.target(&p, 0.0, None, &ShockwaveSlot::default());
    let (target, scale) = swarm.target(&p, 0.0, Some(Vec3::new(-1.0, 0.0, 0.0)), &ShockwaveSlot::default());
    assert!(target.x > calm.0.x);
    assert!((scale - 1.2).abs() < 1e-6);
}

#[test]
fn particle_on_the_pointer_is_left_alone() {
    let swarm = small_swarm(0);
    let p = particle_at(Vec3::ZERO);
    let drift = p.drift_target(0.0, swarm.config());
    let (target, scale) = swarm.target(&p, 0.0, Some(drift), &ShockwaveSlot::default());
    assert!(target.is_finite());
    assert_eq!(target, drift);
    assert_eq!(scale, 1.0);
}

#[test]
fn shockwave_force_scales_with_remaining_time() {
    let swarm = small_swarm(0);
    let p = particle_at(Vec3::new(7.5, 0.0, 0.0));
    let drift = p.drift_target(0.0, swarm.config());

    let mut slot = ShockwaveSlot::new(ShockwaveConfig::default());
    slot.trigger(Vec3::new(drift.x - 7.5, drift.y, drift.z));
    let (fresh, fresh_scale) = swarm.target(&p, 0.0, None, &slot);
    // (15 - 7.5) / 15 * 20 * 1.0
    assert!((fresh.x - drift.x - 10.0).abs() < 1e-3);
    assert!((fresh_scale - 2.0).abs() < 1e-6);

    slot.advance(1.0 / 6.0);
    let wave = slot.active().unwrap();
    assert!((wave.time - 0.5).abs() < 1e-6);
    let (aged, aged_scale) = swarm.target(&p, 0.0, None, &slot);
    assert!((aged.x - drift.x - 5.0).abs() < 1e-3);
    assert!((aged_scale - 1.5).abs() < 1e-6);
}

#[test]
fn swarm_settles_back_after_pointer_leaves() {
    let mut swarm = small_swarm(50);
    let shock = ShockwaveSlot::default();
    let mut out = InstanceBuffer::default();
    for _ in 0..30 {
        swarm.update(0.0, Some(Vec3::ZERO), &shock, &mut out);
    }
    for _ in 0..300 {
        swarm.update(0.0, None, &shock, &mut out);
    }
    let config = *swarm.config();
    for p in swarm.particles() {
        assert!(p.pos.distance(p.drift_target(0.0, &config)) < 0.01);
    }
}
