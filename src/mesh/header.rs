// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Cursor;

use binrw::BinRead;
use binrw::binread;
use bitflags::bitflags;

use crate::common::FormatRevision;
use crate::error::{Error, GeometryFault, Result};
use crate::{ByteSpan, ReadableFile};

/// Size of the trailer at the end of every mesh.
pub const TRAILER_SIZE: usize = 18;

/// `face_priority` value meaning "one priority byte per triangle".
const PER_TRIANGLE_PRIORITY: u8 = 255;

/// The fixed block at the end of a mesh, describing everything before it.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[br(big)]
pub struct MeshTrailer {
    pub vertex_count: u16,
    pub triangle_count: u16,
    pub textured_triangle_count: u8,

    pub textures: u8,
    /// Either 255 for per-triangle priorities, or the priority of the whole mesh.
    pub face_priority: u8,
    pub transparency: u8,
    pub face_skin: u8,
    pub vertex_skin: u8,

    pub x_data_length: u16,
    pub y_data_length: u16,
    pub z_data_length: u16,
    pub face_data_length: u16,
}

bitflags! {
    /// Optional sections present in a mesh.
    pub struct MeshFeatures: u8 {
        const TEXTURES = 0x01;
        const TRIANGLE_PRIORITIES = 0x02;
        const TRANSPARENCY = 0x04;
        const TRIANGLE_SKINS = 0x08;
        const VERTEX_SKINS = 0x10;
    }
}

impl MeshTrailer {
    pub fn features(&self) -> MeshFeatures {
        let mut features = MeshFeatures::empty();
        features.set(MeshFeatures::TEXTURES, self.textures == 1);
        features.set(
            MeshFeatures::TRIANGLE_PRIORITIES,
            self.face_priority == PER_TRIANGLE_PRIORITY,
        );
        features.set(MeshFeatures::TRANSPARENCY, self.transparency == 1);
        features.set(MeshFeatures::TRIANGLE_SKINS, self.face_skin == 1);
        features.set(MeshFeatures::VERTEX_SKINS, self.vertex_skin == 1);
        features
    }
}

/// Hands out consecutive section offsets.
struct SectionCursor {
    offset: usize,
}

impl SectionCursor {
    fn take(&mut self, length: usize) -> usize {
        let start = self.offset;
        self.offset += length;
        start
    }

    fn take_if(&mut self, present: bool, length: usize) -> Option<usize> {
        present.then(|| self.take(length))
    }
}

/// Where each section of a mesh starts, computed from its trailer.
///
/// Optional sections that are switched off have no offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshHeader {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub textured_triangle_count: usize,
    pub features: MeshFeatures,
    /// Priority of every triangle, when there are no per-triangle priorities.
    pub priority: u8,

    pub vertex_direction_offset: usize,
    pub triangle_type_offset: usize,
    pub triangle_priority_offset: Option<usize>,
    pub triangle_skin_offset: Option<usize>,
    pub triangle_info_offset: Option<usize>,
    pub vertex_skin_offset: Option<usize>,
    pub triangle_alpha_offset: Option<usize>,
    pub face_data_offset: usize,
    pub triangle_color_offset: usize,
    pub texture_face_offset: usize,
    pub vertex_delta_x_offset: usize,
    pub vertex_delta_y_offset: usize,
    pub vertex_delta_z_offset: usize,
    /// One past the last byte of the Z deltas, the last section.
    pub sections_end: usize,
}

impl MeshHeader {
    /// Reads the trailer of `data` and lays out its sections.
    pub fn decode(data: ByteSpan) -> Result<MeshHeader> {
        let Some(limit) = data.len().checked_sub(TRAILER_SIZE) else {
            return Err(Error::OutOfData {
                position: 0,
                needed: TRAILER_SIZE,
                available: data.len(),
            });
        };

        let trailer =
            MeshTrailer::read(&mut Cursor::new(&data[limit..])).map_err(|_| Error::OutOfData {
                position: limit,
                needed: TRAILER_SIZE,
                available: data.len() - limit,
            })?;

        let header = MeshHeader::from_trailer(&trailer);
        if header.sections_end > limit {
            return Err(GeometryFault::SectionOverrun {
                end: header.sections_end,
                limit,
            }
            .into());
        }

        Ok(header)
    }

    /// Lays out the sections described by `trailer`. The order matters, since each
    /// section starts where the previous one ended.
    pub fn from_trailer(trailer: &MeshTrailer) -> MeshHeader {
        let features = trailer.features();
        let vertices = trailer.vertex_count as usize;
        let triangles = trailer.triangle_count as usize;
        let textured = trailer.textured_triangle_count as usize;

        let mut cursor = SectionCursor { offset: 0 };

        let vertex_direction_offset = cursor.take(vertices);
        let triangle_type_offset = cursor.take(triangles);
        let triangle_priority_offset =
            cursor.take_if(features.contains(MeshFeatures::TRIANGLE_PRIORITIES), triangles);
        let triangle_skin_offset =
            cursor.take_if(features.contains(MeshFeatures::TRIANGLE_SKINS), triangles);
        let triangle_info_offset =
            cursor.take_if(features.contains(MeshFeatures::TEXTURES), triangles);
        let vertex_skin_offset =
            cursor.take_if(features.contains(MeshFeatures::VERTEX_SKINS), vertices);
        let triangle_alpha_offset =
            cursor.take_if(features.contains(MeshFeatures::TRANSPARENCY), triangles);
        let face_data_offset = cursor.take(trailer.face_data_length as usize);
        let triangle_color_offset = cursor.take(triangles * 2);
        let texture_face_offset = cursor.take(textured * 6);
        let vertex_delta_x_offset = cursor.take(trailer.x_data_length as usize);
        let vertex_delta_y_offset = cursor.take(trailer.y_data_length as usize);
        let vertex_delta_z_offset = cursor.take(trailer.z_data_length as usize);

        MeshHeader {
            vertex_count: vertices,
            triangle_count: triangles,
            textured_triangle_count: textured,
            features,
            priority: if features.contains(MeshFeatures::TRIANGLE_PRIORITIES) {
                0
            } else {
                trailer.face_priority
            },
            vertex_direction_offset,
            triangle_type_offset,
            triangle_priority_offset,
            triangle_skin_offset,
            triangle_info_offset,
            vertex_skin_offset,
            triangle_alpha_offset,
            face_data_offset,
            triangle_color_offset,
            texture_face_offset,
            vertex_delta_x_offset,
            vertex_delta_y_offset,
            vertex_delta_z_offset,
            sections_end: cursor.offset,
        }
    }
}

impl ReadableFile for MeshHeader {
    fn from_existing(_revision: FormatRevision, buffer: ByteSpan) -> Result<Self> {
        MeshHeader::decode(buffer)
    }
}
