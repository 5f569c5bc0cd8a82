//! Drawing seam for the 2D constellation.
//!
//! [`FlatBackground`] owns the field, the pointer and a [`FlatSurface`]; the
//! browser implements the surface on a 2D canvas context, tests record calls.

use glam::Vec2;

use crate::flat::FlatField;
use crate::frame::{Effect, FrameTick};
use crate::pointer::PointerState;

pub trait FlatSurface {
    fn clear(&mut self, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, rgb: [u8; 3], alpha: f32);
}

/// Clears the surface, draws every dot, then every connection line.
pub fn draw_flat(field: &FlatField, surface: &mut impl FlatSurface) {
    let rgb = field.config().rgb;
    surface.clear(field.bounds());
    for p in field.particles() {
        surface.fill_circle(p.pos, p.radius(), rgb, p.opacity());
    }
    for line in field.connections() {
        surface.stroke_line(line.a, line.b, rgb, line.alpha);
    }
}

pub struct FlatBackground<S> {
    field: FlatField,
    pointer: PointerState,
    surface: S,
}

impl<S: FlatSurface> FlatBackground<S> {
    pub fn new(field: FlatField, surface: S) -> Self {
        Self {
            field,
            pointer: PointerState::Absent,
            surface,
        }
    }

    pub fn field(&self) -> &FlatField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    pub fn resize(&mut self, size: Vec2) {
        self.field.resize(size);
    }
}

impl<S: FlatSurface> Effect for FlatBackground<S> {
    fn update(&mut self, _tick: &FrameTick) {
        self.field.update(self.pointer);
    }

    fn render(&mut self) {
        draw_flat(&self.field, &mut self.surface);
    }
}
