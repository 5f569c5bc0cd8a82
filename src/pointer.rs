//! Pointer tracking and screen-to-world projection.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Last known pointer location in normalized device coordinates.
///
/// `Absent` is the state before the first move and after the pointer leaves
/// the window; every force treats it as "no repulsion source this frame".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Absent,
    At(Vec2),
}

impl PointerState {
    /// Builds the state from client pixel coordinates, flipping Y so that up is
    /// positive. A zero-sized viewport yields `Absent`.
    pub fn from_client(x: f32, y: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return PointerState::Absent;
        }
        PointerState::At(Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0))
    }

    pub fn ndc(&self) -> Option<Vec2> {
        match self {
            PointerState::Absent => None,
            PointerState::At(p) => Some(*p),
        }
    }

    /// Inverse of [`PointerState::from_client`] for a viewport of the given size.
    pub fn to_client(&self, width: f32, height: f32) -> Option<Vec2> {
        self.ndc()
            .map(|p| Vec2::new((p.x + 1.0) * 0.5 * width, (1.0 - p.y) * 0.5 * height))
    }
}

/// Perspective camera used for both rendering and pointer unprojection.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            fov_y: config.fov_y_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: sanitize_aspect(aspect),
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Casts a ray from the camera through `ndc` and returns where it meets the
    /// world plane z = 0. Rays parallel to the plane have no hit.
    pub fn unproject_to_plane(&self, ndc: Vec2) -> Option<Vec3> {
        let inverse = self.view_projection().inverse();
        let on_near = inverse.project_point3(ndc.extend(0.0));
        let dir = (on_near - self.position).normalize_or_zero();
        if dir.z.abs() <= f32::EPSILON {
            return None;
        }
        let distance = -self.position.z / dir.z;
        Some(self.position + dir * distance)
    }

    /// World position of the pointer on the z = 0 plane, if there is a pointer.
    pub fn pointer_world(&self, pointer: PointerState) -> Option<Vec3> {
        pointer.ndc().and_then(|ndc| self.unproject_to_plane(ndc))
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Vector from `origin` to `point` normalised and paired with its length.
/// Coincident points have no defined direction and yield `None`.
pub fn direction_from(origin: Vec3, point: Vec3) -> Option<(Vec3, f32)> {
    let delta = point - origin;
    let dist = delta.length();
    if dist <= f32::EPSILON || !dist.is_finite() {
        return None;
    }
    Some((delta / dist, dist))
}
