//! Emoji icons tumbling down through the scene.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::config::FallingConfig;
use crate::instance::IconBatch;
use crate::lerp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingIcon {
    pub pos: Vec3,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub speed: f32,
    pub spin: f32,
    pub icon: usize,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct FallingIcons {
    config: FallingConfig,
    icons: Vec<FallingIcon>,
}

impl FallingIcons {
    /// Icons start above the visible band and drift into view.
    pub fn new(config: FallingConfig, rng: &mut impl Rng) -> Self {
        let icons = (0..config.count)
            .map(|_| FallingIcon {
                pos: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * config.spread_x,
                    config.ceiling + rng.gen::<f32>() * config.ceiling.abs(),
                    (rng.gen::<f32>() - 0.5) * config.spread_z,
                ),
                rotation: Vec3::new(
                    rng.gen::<f32>() * std::f32::consts::PI,
                    rng.gen::<f32>() * std::f32::consts::PI,
                    rng.gen::<f32>() * std::f32::consts::PI,
                ),
                speed: lerp(config.min_speed, config.max_speed, rng.gen()),
                spin: (rng.gen::<f32>() * 2.0 - 1.0) * config.max_spin,
                icon: if config.icons == 0 { 0 } else { rng.gen_range(0..config.icons) },
                scale: lerp(config.min_scale, config.max_scale, rng.gen()),
            })
            .collect();
        Self { config, icons }
    }

    pub fn icons(&self) -> &[FallingIcon] {
        &self.icons
    }

    pub fn icons_mut(&mut self) -> &mut [FallingIcon] {
        &mut self.icons
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        let cfg = self.config;
        for icon in &mut self.icons {
            icon.pos.y -= icon.speed;
            icon.rotation += Vec3::splat(icon.spin);
            if icon.pos.y < cfg.floor {
                icon.pos.y = cfg.ceiling;
                icon.pos.x = (rng.gen::<f32>() - 0.5) * cfg.spread_x;
            }
        }
    }

    /// One batch per icon class; `batches` must have `config.icons` entries.
    pub fn write_instances(&self, batches: &mut [IconBatch]) {
        batches.iter_mut().for_each(IconBatch::begin);
        for icon in &self.icons {
            if let Some(batch) = batches.get_mut(icon.icon) {
                let r = icon.rotation;
                let rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
                batch.push(icon.pos, rotation, icon.scale, 1.0);
            }
        }
    }
}
