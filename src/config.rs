//! Tunable constants for every effect, grouped per effect.
//!
//! These are compile-time knobs rather than a runtime configuration surface:
//! each struct is `Copy`, carries the page's values in `Default`, and is
//! handed to the effect at construction.

use glam::Vec3;

/// 2D constellation background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatConfig {
    pub count: usize,
    /// Pairs closer than this are joined by a line.
    pub connection_distance: f32,
    /// Line opacity at zero distance.
    pub connection_alpha: f32,
    /// Pointer influence radius in CSS pixels.
    pub pointer_radius: f32,
    /// Displacement per frame per unit of particle radius at full force.
    pub pointer_nudge: f32,
    /// Velocity components are drawn from `-max_speed..max_speed`.
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub rgb: [u8; 3],
}

impl Default for FlatConfig {
    fn default() -> Self {
        Self {
            count: 60,
            connection_distance: 150.0,
            connection_alpha: 0.2,
            pointer_radius: 200.0,
            pointer_nudge: 0.1,
            max_speed: 0.25,
            min_radius: 1.0,
            max_radius: 3.0,
            min_opacity: 0.2,
            max_opacity: 0.7,
            rgb: [236, 72, 153],
        }
    }
}

/// 3D particle swarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmConfig {
    pub count: usize,
    /// Full extent of the spawn box, centred on the origin.
    pub extent: Vec3,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_scale_speed: f32,
    pub max_scale_speed: f32,
    pub min_base_scale: f32,
    pub max_base_scale: f32,
    /// Upper bound of the per-particle phase factor.
    pub max_phase: f32,
    pub drift_amplitude: f32,
    /// Per-axis multipliers applied to `elapsed * speed`.
    pub drift_frequency: Vec3,
    /// Fraction of the remaining distance to the target covered per frame.
    pub damping: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub pointer_scale_boost: f32,
    /// Sparkle scale is `base * (sparkle_floor + sparkle_amplitude * sin(..))`.
    pub sparkle_floor: f32,
    pub sparkle_amplitude: f32,
    pub sparkle_rate: f32,
    /// Maximum absolute lightness jitter applied to each palette colour.
    pub lightness_jitter: f32,
    pub palette: [[u8; 3]; 3],
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 12_000,
            extent: Vec3::new(50.0, 50.0, 30.0),
            min_speed: 0.05,
            max_speed: 0.2,
            min_scale_speed: 0.05,
            max_scale_speed: 0.15,
            min_base_scale: 0.01,
            max_base_scale: 0.04,
            max_phase: 100.0,
            drift_amplitude: 1.5,
            drift_frequency: Vec3::new(0.5, 0.3, 0.4),
            damping: 0.08,
            pointer_radius: 5.0,
            pointer_strength: 4.0,
            pointer_scale_boost: 1.2,
            sparkle_floor: 0.8,
            sparkle_amplitude: 0.5,
            sparkle_rate: 3.0,
            lightness_jitter: 0.05,
            palette: [[0xFF, 0xC1, 0x25], [0xFF, 0x14, 0x93], [0x00, 0xB2, 0xEE]],
        }
    }
}

/// Click-triggered radial impulse on the swarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockwaveConfig {
    pub radius: f32,
    pub strength: f32,
    /// Time remaining drops by `delta * decay_rate` each frame.
    pub decay_rate: f32,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            strength: 20.0,
            decay_rate: 3.0,
        }
    }
}

/// Click-triggered paint droplets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatterConfig {
    pub droplets: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Life lost per frame; a droplet starts with life 1.0.
    pub life_decrement: f32,
    /// Scale multiplier per frame.
    pub shrink: f32,
    /// Oldest splatters are dropped beyond this many.
    pub max_splatters: usize,
}

impl Default for SplatterConfig {
    fn default() -> Self {
        Self {
            droplets: 12,
            min_speed: 0.1,
            max_speed: 0.3,
            min_scale: 0.2,
            max_scale: 0.7,
            life_decrement: 0.03,
            shrink: 0.95,
            max_splatters: 32,
        }
    }
}

/// Emoji sprites left behind by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    /// World distance the pointer must travel before another sprite spawns.
    pub spawn_distance: f32,
    pub capacity: usize,
    /// Scale and opacity multiplier per frame.
    pub fade: f32,
    /// Sprites at or below this opacity are dropped.
    pub cull_opacity: f32,
    pub icons: usize,
    pub sprite_size: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            spawn_distance: 0.5,
            capacity: 20,
            fade: 0.967,
            cull_opacity: 0.1,
            icons: 4,
            sprite_size: 0.5,
        }
    }
}

/// Tumbling emoji icons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingConfig {
    pub count: usize,
    pub icons: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Spin per frame is drawn from `-max_spin..max_spin`.
    pub max_spin: f32,
    pub floor: f32,
    pub ceiling: f32,
    pub spread_x: f32,
    pub spread_z: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            count: 50,
            icons: 7,
            min_speed: 0.02,
            max_speed: 0.07,
            max_spin: 0.025,
            floor: -20.0,
            ceiling: 20.0,
            spread_x: 40.0,
            spread_z: 10.0,
            min_scale: 0.5,
            max_scale: 1.0,
        }
    }
}

/// Perspective camera looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Lightbox shared-element transition timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryConfig {
    pub transition_ms: u32,
    pub fade_out_ms: u32,
    pub reveal_stagger_ms: u32,
    pub reveal_batch: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            transition_ms: 600,
            fade_out_ms: 200,
            reveal_stagger_ms: 100,
            reveal_batch: 3,
        }
    }
}

/// Letter typing cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterConfig {
    pub start_delay_ms: u32,
    pub greeting_char_ms: u32,
    pub paragraph_char_ms: u32,
    pub paragraph_pause_ms: u32,
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            greeting_char_ms: 70,
            paragraph_char_ms: 40,
            paragraph_pause_ms: 300,
        }
    }
}
