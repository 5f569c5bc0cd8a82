//! Owned state for the 3D background: the swarm and everything that reacts
//! to the pointer, plus the per-frame instance buffers the renderer reads.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{
    CameraConfig, FallingConfig, ShockwaveConfig, SplatterConfig, SwarmConfig, TrailConfig,
};
use crate::falling::FallingIcons;
use crate::frame::FrameTick;
use crate::impulse::{ShockwaveSlot, SplatterField};
use crate::instance::{icon_batches, IconBatch, InstanceBuffer};
use crate::pointer::{Camera, PointerState};
use crate::swarm::Swarm;
use crate::trail::Trail;

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub swarm: SwarmConfig,
    pub shockwave: ShockwaveConfig,
    pub splatter: SplatterConfig,
    pub trail: TrailConfig,
    pub falling: FallingConfig,
}

pub struct Scene {
    camera: Camera,
    pointer: PointerState,
    rng: SmallRng,
    swarm: Swarm,
    shockwaves: ShockwaveSlot,
    splatters: SplatterField,
    trail: Trail,
    falling: FallingIcons,

    swarm_instances: InstanceBuffer,
    droplet_instances: InstanceBuffer,
    droplet_tints: Vec<f32>,
    trail_batches: Vec<IconBatch>,
    falling_batches: Vec<IconBatch>,
}

impl Scene {
    pub fn new(config: SceneConfig, aspect: f32, mut rng: SmallRng) -> Self {
        let swarm = Swarm::new(config.swarm, &mut rng);
        let falling = FallingIcons::new(config.falling, &mut rng);
        Self {
            camera: Camera::new(config.camera, aspect),
            pointer: PointerState::Absent,
            swarm,
            shockwaves: ShockwaveSlot::new(config.shockwave),
            splatters: SplatterField::new(config.splatter),
            trail: Trail::new(config.trail),
            falling,
            swarm_instances: InstanceBuffer::with_capacity(config.swarm.count),
            droplet_instances: InstanceBuffer::default(),
            droplet_tints: Vec::new(),
            trail_batches: icon_batches(config.trail.icons),
            falling_batches: icon_batches(config.falling.icons),
            rng,
        }
    }

    /// Scene seeded from a fixed value, for reproducible runs.
    pub fn seeded(config: SceneConfig, aspect: f32, seed: u64) -> Self {
        Self::new(config, aspect, SmallRng::seed_from_u64(seed))
    }

    pub fn pointer_moved(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    pub fn pointer_left(&mut self) {
        self.pointer = PointerState::Absent;
    }

    /// A click at `ndc`: restarts the shockwave and bursts a splatter at the
    /// same world point.
    pub fn pointer_released(&mut self, ndc: Vec2) {
        if let Some(origin) = self.camera.unproject_to_plane(ndc) {
            self.shockwaves.trigger(origin);
            self.splatters.spawn(origin, &mut self.rng);
        }
    }

    pub fn resize(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Runs every rule for one frame and refreshes all instance buffers.
    pub fn advance(&mut self, tick: &FrameTick) {
        self.shockwaves.advance(tick.delta);
        let pointer = self.camera.pointer_world(self.pointer);

        self.swarm
            .update(tick.elapsed, pointer, &self.shockwaves, &mut self.swarm_instances);

        self.splatters.update();
        self.splatters
            .write_instances(&mut self.droplet_instances, &mut self.droplet_tints);

        self.trail.update(pointer, &mut self.rng);
        self.trail.write_instances(&mut self.trail_batches);

        self.falling.update(&mut self.rng);
        self.falling.write_instances(&mut self.falling_batches);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn shockwaves(&self) -> &ShockwaveSlot {
        &self.shockwaves
    }

    pub fn splatters(&self) -> &SplatterField {
        &self.splatters
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn swarm_instances(&self) -> &InstanceBuffer {
        &self.swarm_instances
    }

    /// Clears the change flags once the renderer has uploaded every buffer.
    pub fn mark_uploaded(&mut self) {
        self.swarm_instances.mark_uploaded();
        self.droplet_instances.mark_uploaded();
        for batch in self.trail_batches.iter_mut().chain(&mut self.falling_batches) {
            batch.transforms.mark_uploaded();
        }
    }

    pub fn droplets(&self) -> (&InstanceBuffer, &[f32]) {
        (&self.droplet_instances, &self.droplet_tints)
    }

    pub fn trail_batches(&self) -> &[IconBatch] {
        &self.trail_batches
    }

    pub fn falling_batches(&self) -> &[IconBatch] {
        &self.falling_batches
    }
}
