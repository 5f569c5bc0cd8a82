//! Click impulses: the shockwave that scatters the swarm and the paint
//! splatters that burst from the click point.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::color::Rgb;
use crate::config::{ShockwaveConfig, SplatterConfig};
use crate::instance::InstanceBuffer;
use crate::lerp;

/// Droplets are drawn as spheres of this radius times their scale.
pub const DROPLET_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    pub origin: Vec3,
    /// Starts at 1.0 and falls to zero; scales both push and scale inflation.
    pub time: f32,
}

/// Holds at most one live shockwave; a new click replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct ShockwaveSlot {
    config: ShockwaveConfig,
    current: Option<Shockwave>,
}

impl ShockwaveSlot {
    pub fn new(config: ShockwaveConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &ShockwaveConfig {
        &self.config
    }

    pub fn trigger(&mut self, origin: Vec3) {
        self.current = Some(Shockwave { origin, time: 1.0 });
    }

    /// Ages the shockwave by one frame and drops it once spent.
    pub fn advance(&mut self, delta: f32) {
        if let Some(wave) = &mut self.current {
            wave.time -= delta * self.config.decay_rate;
            if wave.time <= 0.0 {
                self.current = None;
            }
        }
    }

    pub fn active(&self) -> Option<&Shockwave> {
        self.current.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub pos: Vec3,
    pub vel: Vec3,
    pub scale: f32,
    pub life: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Splatter {
    pub color: Rgb,
    pub droplets: Vec<Droplet>,
}

/// Live splatters, oldest first. Bounded so rapid clicking cannot grow it
/// without limit.
#[derive(Debug, Clone, Default)]
pub struct SplatterField {
    config: SplatterConfig,
    splatters: VecDeque<Splatter>,
}

impl SplatterField {
    pub fn new(config: SplatterConfig) -> Self {
        Self {
            config,
            splatters: VecDeque::with_capacity(config.max_splatters),
        }
    }

    /// Bursts droplets outward from `origin` in random directions in the XY
    /// plane with a smaller random Z component.
    pub fn spawn(&mut self, origin: Vec3, rng: &mut impl Rng) {
        let color = Rgb::from_hsl(rng.gen(), 1.0, 0.6);
        let cfg = self.config;
        let droplets = (0..cfg.droplets)
            .map(|_| {
                let angle = rng.gen::<f32>() * TAU;
                let speed = lerp(cfg.min_speed, cfg.max_speed, rng.gen());
                Droplet {
                    pos: origin,
                    vel: Vec3::new(
                        angle.cos() * speed,
                        angle.sin() * speed,
                        (rng.gen::<f32>() - 0.5) * speed,
                    ),
                    scale: lerp(cfg.min_scale, cfg.max_scale, rng.gen()),
                    life: 1.0,
                }
            })
            .collect();

        if cfg.max_splatters == 0 {
            return;
        }
        while self.splatters.len() >= cfg.max_splatters {
            self.splatters.pop_front();
        }
        self.splatters.push_back(Splatter { color, droplets });
    }

    pub fn update(&mut self) {
        let cfg = self.config;
        for splatter in &mut self.splatters {
            for d in &mut splatter.droplets {
                d.pos += d.vel;
                d.life -= cfg.life_decrement;
                d.scale *= cfg.shrink;
            }
            splatter.droplets.retain(|d| d.life > 0.0);
        }
        self.splatters.retain(|s| !s.droplets.is_empty());
    }

    pub fn splatters(&self) -> impl Iterator<Item = &Splatter> {
        self.splatters.iter()
    }

    pub fn droplet_count(&self) -> usize {
        self.splatters.iter().map(|s| s.droplets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.splatters.is_empty()
    }

    /// Writes one transform per droplet plus an RGBA tint whose alpha is the
    /// droplet's remaining life.
    pub fn write_instances(&self, transforms: &mut InstanceBuffer, tints: &mut Vec<f32>) {
        transforms.begin();
        tints.clear();
        for splatter in &self.splatters {
            let [r, g, b] = splatter.color.to_array();
            for d in &splatter.droplets {
                transforms.push(d.pos, Quat::IDENTITY, d.scale * DROPLET_RADIUS);
                tints.extend_from_slice(&[r, g, b, d.life]);
            }
        }
    }
}
