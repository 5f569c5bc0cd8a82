#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Decorative page effects: a 2D constellation, a 3D particle swarm with click
//! shockwaves, paint splatters, a cursor trail and falling icons, a lightbox
//! with shared-element transitions, and a typewriter letter.
//!
//! Everything outside `wasm` is platform-neutral and tested on the host.

pub mod color;
pub mod config;
pub mod error;
pub mod falling;
pub mod flat;
pub mod frame;
pub mod gallery;
pub mod impulse;
pub mod instance;
pub mod mesh;
pub mod pointer;
pub mod render;
pub mod scene;
pub mod swarm;
pub mod trail;
pub mod typewriter;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm;

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
