use glam::Vec3;
use petalfx::config::{ShockwaveConfig, SplatterConfig};
use petalfx::impulse::{ShockwaveSlot, SplatterField, DROPLET_RADIUS};
use petalfx::instance::InstanceBuffer;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn shockwave_decays_by_three_times_delta_then_expires() {
    let mut slot = ShockwaveSlot::new(ShockwaveConfig::default());
    assert!(slot.active().is_none());
    slot.trigger(Vec3::new(1.0, 2.0, 0.0));

    let mut last = slot.active().unwrap().time;
    assert_eq!(last, 1.0);
    // Exactly representable so the frame count is deterministic.
    let delta = 0.0625;
    let mut frames = 0;
    while let Some(wave) = slot.active() {
        assert!(wave.time > 0.0);
        slot.advance(delta);
        frames += 1;
        if let Some(wave) = slot.active() {
            assert!((last - wave.time - delta * 3.0).abs() < 1e-5);
            last = wave.time;
        }
        assert!(frames <= 10);
    }
    // 1.0 - 6 * 0.1875 < 0
    assert_eq!(frames, 6);
}

#[test]
fn new_click_replaces_the_running_shockwave() {
    let mut slot = ShockwaveSlot::new(ShockwaveConfig::default());
    slot.trigger(Vec3::ZERO);
    slot.advance(0.2);
    slot.trigger(Vec3::X);
    let wave = slot.active().unwrap();
    assert_eq!(wave.origin, Vec3::X);
    assert_eq!(wave.time, 1.0);
}

#[test]
fn splatter_droplets_die_out() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut field = SplatterField::new(SplatterConfig::default());
    field.spawn(Vec3::ZERO, &mut rng);
    assert_eq!(field.droplet_count(), 12);

    let mut last = field.droplet_count();
    for _ in 0..34 {
        field.update();
        let count = field.droplet_count();
        assert!(count <= last);
        last = count;
    }
    assert_eq!(field.droplet_count(), 0);
    assert!(field.is_empty());
}

#[test]
fn droplets_fly_outward_and_shrink() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = SplatterField::new(SplatterConfig::default());
    let origin = Vec3::new(2.0, -1.0, 0.0);
    field.spawn(origin, &mut rng);
    let before: Vec<f32> = field.splatters().flat_map(|s| s.droplets.iter().map(|d| d.scale)).collect();
    for _ in 0..10 {
        field.update();
    }
    let splatter = field.splatters().next().unwrap();
    for (d, scale) in splatter.droplets.iter().zip(before) {
        assert!(d.pos.distance(origin) > 0.0);
        assert!(d.scale < scale);
        assert!((d.life - 0.7).abs() < 1e-4);
    }
}

#[test]
fn rapid_clicks_keep_at_most_max_splatters() {
    let mut rng = StdRng::seed_from_u64(9);
    let config = SplatterConfig::default();
    let mut field = SplatterField::new(config);
    for i in 0..100 {
        field.spawn(Vec3::new(i as f32, 0.0, 0.0), &mut rng);
        assert!(field.splatters().count() <= config.max_splatters);
    }
    // The survivors are the most recent clicks.
    let first = field.splatters().next().unwrap();
    assert_eq!(first.droplets[0].pos.x, (100 - config.max_splatters) as f32);
}

#[test]
fn instances_carry_life_as_alpha() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut field = SplatterField::new(SplatterConfig::default());
    field.spawn(Vec3::ZERO, &mut rng);
    field.update();

    let mut transforms = InstanceBuffer::default();
    let mut tints = Vec::new();
    field.write_instances(&mut transforms, &mut tints);
    assert_eq!(transforms.len(), 12);
    assert_eq!(tints.len(), 12 * 4);
    assert!((tints[3] - 0.97).abs() < 1e-5);

    let d = field.splatters().next().unwrap().droplets[0];
    let (scale, _, translation) = transforms.matrix(0).unwrap().to_scale_rotation_translation();
    assert!((scale.x - d.scale * DROPLET_RADIUS).abs() < 1e-5);
    assert!((translation - d.pos).length() < 1e-5);
}
