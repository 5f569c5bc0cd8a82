//! 3D particle swarm.
//!
//! Particles never integrate a velocity. Each frame a target is computed from
//! the particle's anchor, a slow sinusoidal drift and any active repulsion,
//! and the particle moves a fixed fraction of the way there. The swarm
//! therefore always settles back around its anchors once the pointer or a
//! shockwave leaves.

use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::color::Rgb;
use crate::config::SwarmConfig;
use crate::impulse::ShockwaveSlot;
use crate::instance::{ColorBuffer, InstanceBuffer};
use crate::lerp;
use crate::pointer::direction_from;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmParticle {
    pub pos: Vec3,
    pub anchor: Vec3,
    pub phase: f32,
    pub speed: f32,
    pub scale_speed: f32,
    pub scale_offset: f32,
    pub base_scale: f32,
}

impl SwarmParticle {
    /// Anchor plus drift at `elapsed` seconds.
    pub fn drift_target(&self, elapsed: f32, config: &SwarmConfig) -> Vec3 {
        let t = elapsed * self.speed;
        let f = config.drift_frequency;
        let a = config.drift_amplitude;
        self.anchor
            + Vec3::new(
                (t * f.x + self.phase).sin() * a,
                (t * f.y + self.phase).cos() * a,
                (t * f.z + self.phase).sin() * a,
            )
    }
}

/// Offset pushing `target` away from `origin`, linearly weaker towards the
/// edge of `radius`. Points outside the radius or exactly on the origin get
/// no push.
pub fn repulsion(target: Vec3, origin: Vec3, radius: f32, strength: f32) -> Option<Vec3> {
    let (dir, dist) = direction_from(origin, target)?;
    if dist >= radius {
        return None;
    }
    let force = (radius - dist) / radius;
    Some(dir * force * strength)
}

/// One exponential smoothing step from `pos` towards `target`.
pub fn damp_toward(pos: Vec3, target: Vec3, factor: f32) -> Vec3 {
    pos + (target - pos) * factor
}

#[derive(Debug, Clone)]
pub struct Swarm {
    config: SwarmConfig,
    particles: Vec<SwarmParticle>,
    colors: ColorBuffer,
}

impl Swarm {
    /// Fills the spawn box uniformly and picks a jittered palette colour per
    /// particle. Colours are fixed from here on.
    pub fn new(config: SwarmConfig, rng: &mut impl Rng) -> Self {
        let half = config.extent * 0.5;
        let palette = config.palette.map(Rgb::from_bytes);

        let mut colors = Vec::with_capacity(config.count);
        let particles = (0..config.count)
            .map(|_| {
                let anchor = Vec3::new(
                    (rng.gen::<f32>() * 2.0 - 1.0) * half.x,
                    (rng.gen::<f32>() * 2.0 - 1.0) * half.y,
                    (rng.gen::<f32>() * 2.0 - 1.0) * half.z,
                );

                let base = palette[rng.gen_range(0..palette.len())];
                let jitter = (rng.gen::<f32>() * 2.0 - 1.0) * config.lightness_jitter;
                colors.push(base.offset_lightness(jitter).to_array());

                SwarmParticle {
                    pos: anchor,
                    anchor,
                    phase: rng.gen::<f32>() * config.max_phase,
                    speed: lerp(config.min_speed, config.max_speed, rng.gen()),
                    scale_speed: lerp(config.min_scale_speed, config.max_scale_speed, rng.gen()),
                    scale_offset: rng.gen::<f32>() * TAU,
                    base_scale: lerp(config.min_base_scale, config.max_base_scale, rng.gen()),
                }
            })
            .collect();

        Self {
            config,
            particles,
            colors: ColorBuffer::from_colors(colors),
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn particles(&self) -> &[SwarmParticle] {
        &self.particles
    }

    pub fn colors(&self) -> &ColorBuffer {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Target position and scale multiplier for one particle this frame.
    pub fn target(
        &self,
        particle: &SwarmParticle,
        elapsed: f32,
        pointer: Option<Vec3>,
        shockwaves: &ShockwaveSlot,
    ) -> (Vec3, f32) {
        let cfg = &self.config;
        let mut target = particle.drift_target(elapsed, cfg);
        let mut scale = 1.0;

        if let Some(pointer) = pointer {
            if let Some(push) = repulsion(target, pointer, cfg.pointer_radius, cfg.pointer_strength) {
                target += push;
                scale *= cfg.pointer_scale_boost;
            }
        }

        if let Some(wave) = shockwaves.active() {
            let shock = shockwaves.config();
            let strength = shock.strength * wave.time;
            if let Some(push) = repulsion(target, wave.origin, shock.radius, strength) {
                target += push;
                scale *= 1.0 + wave.time;
            }
        }

        (target, scale)
    }

    /// Moves every particle one smoothing step towards its target and writes
    /// its transform into `out`.
    pub fn update(
        &mut self,
        elapsed: f32,
        pointer: Option<Vec3>,
        shockwaves: &ShockwaveSlot,
        out: &mut InstanceBuffer,
    ) {
        out.begin();
        for i in 0..self.particles.len() {
            let (target, boost) = self.target(&self.particles[i], elapsed, pointer, shockwaves);
            let cfg = &self.config;
            let p = &mut self.particles[i];
            p.pos = damp_toward(p.pos, target, cfg.damping);

            let sparkle = cfg.sparkle_floor
                + cfg.sparkle_amplitude
                    * (elapsed * cfg.sparkle_rate * p.scale_speed + p.scale_offset).sin();
            out.push(p.pos, Quat::IDENTITY, p.base_scale * boost * sparkle);
        }
    }
}
