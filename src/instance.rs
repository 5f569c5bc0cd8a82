//! Per-instance data handed to an instanced draw call.

use glam::{Mat4, Quat, Vec3};

const MAT4_FLOATS: usize = 16;

/// Reusable column-major transform storage, one `Mat4` per instance.
///
/// Writers overwrite slots in place and the buffer records that it changed;
/// the renderer uploads it and clears the flag. Nothing is reallocated per
/// frame unless the instance count grows.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    data: Vec<f32>,
    len: usize,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn with_capacity(instances: usize) -> Self {
        Self {
            data: vec![0.0; instances * MAT4_FLOATS],
            len: 0,
            dirty: false,
        }
    }

    /// Number of instances written since the last [`InstanceBuffer::begin`].
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Starts a new frame's worth of writes.
    pub fn begin(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, translation: Vec3, rotation: Quat, scale: f32) {
        let matrix = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, translation);
        let start = self.len * MAT4_FLOATS;
        if self.data.len() < start + MAT4_FLOATS {
            self.data.resize(start + MAT4_FLOATS, 0.0);
        }
        matrix.write_cols_to_slice(&mut self.data[start..start + MAT4_FLOATS]);
        self.len += 1;
        self.dirty = true;
    }

    pub fn matrix(&self, index: usize) -> Option<Mat4> {
        (index < self.len).then(|| {
            let start = index * MAT4_FLOATS;
            Mat4::from_cols_slice(&self.data[start..start + MAT4_FLOATS])
        })
    }

    /// Floats for the instances written this frame.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.len * MAT4_FLOATS]
    }

    pub fn needs_upload(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }
}

/// Per-instance RGB, filled once at creation and never rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorBuffer {
    data: Vec<f32>,
}

impl ColorBuffer {
    pub fn from_colors(colors: impl IntoIterator<Item = [f32; 3]>) -> Self {
        Self {
            data: colors.into_iter().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<[f32; 3]> {
        self.data
            .get(index * 3..index * 3 + 3)
            .map(|c| [c[0], c[1], c[2]])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Transforms and opacities for one textured sprite class.
#[derive(Debug, Clone, Default)]
pub struct IconBatch {
    pub transforms: InstanceBuffer,
    pub opacity: Vec<f32>,
}

impl IconBatch {
    pub fn begin(&mut self) {
        self.transforms.begin();
        self.opacity.clear();
    }

    pub fn push(&mut self, translation: Vec3, rotation: Quat, scale: f32, opacity: f32) {
        self.transforms.push(translation, rotation, scale);
        self.opacity.push(opacity);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// One empty batch per sprite class.
pub fn icon_batches(classes: usize) -> Vec<IconBatch> {
    (0..classes).map(|_| IconBatch::default()).collect()
}
