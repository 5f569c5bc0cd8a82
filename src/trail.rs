//! Sparkle sprites dropped behind the moving pointer.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::config::TrailConfig;
use crate::instance::IconBatch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSprite {
    pub pos: Vec3,
    pub scale: f32,
    pub opacity: f32,
    pub icon: usize,
}

#[derive(Debug, Clone)]
pub struct Trail {
    config: TrailConfig,
    sprites: VecDeque<TrailSprite>,
    last_spawn: Vec3,
}

impl Trail {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            sprites: VecDeque::with_capacity(config.capacity),
            last_spawn: Vec3::ZERO,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn sprites(&self) -> impl Iterator<Item = &TrailSprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Adds a sprite at `pos`, evicting the oldest past capacity.
    pub fn spawn(&mut self, pos: Vec3, rng: &mut impl Rng) {
        if self.config.capacity == 0 {
            return;
        }
        while self.sprites.len() >= self.config.capacity {
            self.sprites.pop_front();
        }
        let icon = if self.config.icons == 0 {
            0
        } else {
            rng.gen_range(0..self.config.icons)
        };
        self.sprites.push_back(TrailSprite {
            pos,
            scale: 1.0,
            opacity: 1.0,
            icon,
        });
        self.last_spawn = pos;
    }

    /// Spawns if the pointer travelled far enough, then fades everything and
    /// drops what has become invisible.
    pub fn update(&mut self, pointer: Option<Vec3>, rng: &mut impl Rng) {
        if let Some(pos) = pointer {
            if pos.distance(self.last_spawn) > self.config.spawn_distance {
                self.spawn(pos, rng);
            }
        }

        let fade = self.config.fade;
        for s in &mut self.sprites {
            s.scale *= fade;
            s.opacity *= fade;
        }
        let cull = self.config.cull_opacity;
        self.sprites.retain(|s| s.opacity > cull);
    }

    pub fn write_instances(&self, batches: &mut [IconBatch]) {
        batches.iter_mut().for_each(IconBatch::begin);
        let size = self.config.sprite_size;
        for s in &self.sprites {
            if let Some(batch) = batches.get_mut(s.icon) {
                batch.push(s.pos, Quat::IDENTITY, s.scale * size, s.opacity);
            }
        }
    }
}
