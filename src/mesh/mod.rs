// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

mod geometry;
mod header;

#[cfg(test)]
pub(crate) mod fixture;

pub use header::{MeshFeatures, MeshHeader, MeshTrailer, TRAILER_SIZE};

use glam::IVec3;

use crate::common::{FormatRevision, SmartKind};
use crate::error::Result;
use crate::obj::UNSCALED;
use crate::{ByteSpan, ReadableFile};

/// Axis-aligned bounds of a mesh, in model units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl Bounds {
    pub fn size(&self) -> IVec3 {
        self.max - self.min
    }
}

/// A decoded model.
///
/// Vertices and triangles are stored as parallel lists, the way the cache lays them out.
/// Every triangle index is guaranteed to be a valid vertex.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub vertex_x: Vec<i32>,
    pub vertex_y: Vec<i32>,
    pub vertex_z: Vec<i32>,

    pub triangle_a: Vec<u16>,
    pub triangle_b: Vec<u16>,
    pub triangle_c: Vec<u16>,
    /// Packed HSL color of each triangle.
    pub triangle_color: Vec<u16>,

    /// Draw priority shared by every triangle, unless `triangle_priorities` is set.
    pub priority: u8,
    pub triangle_priorities: Option<Vec<u8>>,
    /// Skin (label) groups used by animations.
    pub triangle_skins: Option<Vec<u8>>,
    /// Render type of each triangle, present when the mesh is textured.
    pub triangle_info: Option<Vec<u8>>,
    pub vertex_skins: Option<Vec<u8>>,
    pub triangle_alphas: Option<Vec<u8>>,
}

impl Mesh {
    /// Decodes a whole mesh blob, trailer included. `deltas` is almost always
    /// [`SmartKind::Signed`].
    pub fn decode(deltas: SmartKind, data: ByteSpan) -> Result<Mesh> {
        let header = MeshHeader::decode(data)?;
        Mesh::decode_with_header(deltas, data, &header)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_x.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_a.len()
    }

    pub fn vertex(&self, index: usize) -> Option<IVec3> {
        Some(IVec3::new(
            *self.vertex_x.get(index)?,
            *self.vertex_y.get(index)?,
            *self.vertex_z.get(index)?,
        ))
    }

    /// The vertex indices of triangle `index`.
    pub fn triangle(&self, index: usize) -> Option<[usize; 3]> {
        Some([
            *self.triangle_a.get(index)? as usize,
            *self.triangle_b.get(index)? as usize,
            *self.triangle_c.get(index)? as usize,
        ])
    }

    /// Replaces every triangle colored `original` with `replacement`.
    pub fn recolor(&mut self, original: u16, replacement: u16) {
        for color in &mut self.triangle_color {
            if *color == original {
                *color = replacement;
            }
        }
    }

    /// Scales each axis by `factor / 128`, so 128 leaves it alone. Coordinates that no
    /// longer fit in an `i32` saturate.
    pub fn scale(&mut self, x: u16, y: u16, z: u16) {
        fn apply(values: &mut [i32], factor: u16) {
            if factor == UNSCALED {
                return;
            }

            for value in values {
                let scaled = *value as i64 * factor as i64 / UNSCALED as i64;
                *value = scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
            }
        }

        apply(&mut self.vertex_x, x);
        apply(&mut self.vertex_y, y);
        apply(&mut self.vertex_z, z);
    }

    /// Returns `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertex(0)?;

        let bounds = (1..self.vertex_count())
            .filter_map(|i| self.vertex(i))
            .fold(Bounds { min: first, max: first }, |bounds, vertex| Bounds {
                min: bounds.min.min(vertex),
                max: bounds.max.max(vertex),
            });

        Some(bounds)
    }
}

/// Meshes are packed the same way in every revision, so this always uses signed deltas.
impl ReadableFile for Mesh {
    fn from_existing(_revision: FormatRevision, buffer: ByteSpan) -> Result<Self> {
        Mesh::decode(SmartKind::Signed, buffer)
    }
}
