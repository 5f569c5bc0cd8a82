//! 2D constellation: slow drifting dots that bounce off the viewport edges and
//! shy away from the pointer.

use glam::Vec2;
use rand::Rng;

use crate::config::FlatConfig;
use crate::lerp;
use crate::pointer::PointerState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    opacity: f32,
}

impl FlatParticle {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, opacity: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            opacity,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// A line between two particles closer than the connection distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: Vec2,
    pub b: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct FlatField {
    config: FlatConfig,
    bounds: Vec2,
    particles: Vec<FlatParticle>,
}

impl FlatField {
    /// Scatters `config.count` particles uniformly over `[0, bounds]`.
    pub fn new(config: FlatConfig, bounds: Vec2, rng: &mut impl Rng) -> Self {
        let bounds = bounds.max(Vec2::ZERO);
        let particles = (0..config.count)
            .map(|_| {
                let pos = Vec2::new(
                    rng.gen::<f32>() * bounds.x,
                    rng.gen::<f32>() * bounds.y,
                );
                let vel = Vec2::new(
                    symmetric(rng, config.max_speed),
                    symmetric(rng, config.max_speed),
                );
                let radius = lerp(config.min_radius, config.max_radius, rng.gen());
                let opacity = lerp(config.min_opacity, config.max_opacity, rng.gen());
                FlatParticle::new(pos, vel, radius, opacity)
            })
            .collect();
        Self {
            config,
            bounds,
            particles,
        }
    }

    pub fn from_particles(config: FlatConfig, bounds: Vec2, particles: Vec<FlatParticle>) -> Self {
        Self {
            config,
            bounds,
            particles,
        }
    }

    pub fn config(&self) -> &FlatConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Viewport resized. Particles left outside the new bounds walk back in
    /// through the regular bounce rule.
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds.max(Vec2::ZERO);
    }

    pub fn particles(&self) -> &[FlatParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advances every particle by one frame.
    pub fn update(&mut self, pointer: PointerState) {
        let bounds = self.bounds;
        let pointer = pointer.to_client(bounds.x, bounds.y);
        let radius = self.config.pointer_radius;
        let nudge = self.config.pointer_nudge;

        for p in &mut self.particles {
            p.pos += p.vel;

            // Reflect only when heading outward so a particle pushed outside by
            // the pointer cannot get stuck flipping back and forth.
            if p.pos.x < 0.0 {
                p.vel.x = p.vel.x.abs();
            } else if p.pos.x > bounds.x {
                p.vel.x = -p.vel.x.abs();
            }
            if p.pos.y < 0.0 {
                p.vel.y = p.vel.y.abs();
            } else if p.pos.y > bounds.y {
                p.vel.y = -p.vel.y.abs();
            }

            if let Some(pointer) = pointer {
                let delta = pointer - p.pos;
                let dist = delta.length();
                if dist > f32::EPSILON && dist < radius {
                    let force = (radius - dist) / radius;
                    p.pos -= delta / dist * force * p.radius * nudge;
                }
            }
        }
    }

    /// Every unordered pair closer than the connection distance, with opacity
    /// fading linearly to zero at the threshold.
    ///
    /// This is a quadratic scan. It is fine for a few dozen dots; larger
    /// counts would need a spatial grid.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let max = self.config.connection_distance;
        let alpha = self.config.connection_alpha;
        self.particles.iter().enumerate().flat_map(move |(i, a)| {
            self.particles[i + 1..].iter().filter_map(move |b| {
                let dist = a.pos.distance(b.pos);
                (dist < max).then(|| Connection {
                    a: a.pos,
                    b: b.pos,
                    alpha: (1.0 - dist / max) * alpha,
                })
            })
        })
    }
}

fn symmetric(rng: &mut impl Rng, max: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * max
}
