// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use modular_bitfield::prelude::*;

use crate::ByteSpan;
use crate::buffer::Buffer;
use crate::common::SmartKind;
use crate::error::{Error, GeometryFault, Result};
use crate::mesh::{Mesh, MeshHeader};

/// Which axes of a vertex move away from the previous vertex.
#[bitfield]
#[derive(Clone, Copy)]
struct VertexDirection {
    x: bool,
    y: bool,
    z: bool,
    #[skip]
    __: B5,
}

/// How a triangle picks its vertices, relative to the previous triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriangleKind {
    /// Three new vertices.
    Fresh = 1,
    /// Keeps the first vertex, the last becomes the second.
    KeepFirst = 2,
    /// Keeps the second vertex, the last becomes the first.
    KeepSecond = 3,
    /// Swaps the first two vertices, and adds a new last one.
    Flip = 4,
}

impl TriangleKind {
    fn from_byte(kind: u8) -> Option<TriangleKind> {
        match kind {
            1 => Some(TriangleKind::Fresh),
            2 => Some(TriangleKind::KeepFirst),
            3 => Some(TriangleKind::KeepSecond),
            4 => Some(TriangleKind::Flip),
            _ => None,
        }
    }
}

fn copy_section(data: ByteSpan, offset: Option<usize>, length: usize) -> Result<Option<Vec<u8>>> {
    let Some(offset) = offset else {
        return Ok(None);
    };

    match data.get(offset..offset + length) {
        Some(section) => Ok(Some(section.to_vec())),
        None => Err(Error::OutOfData {
            position: offset,
            needed: length,
            available: data.len().saturating_sub(offset),
        }),
    }
}

impl Mesh {
    /// Decodes the geometry of `data`, using a header previously read from it.
    pub fn decode_with_header(
        deltas: SmartKind,
        data: ByteSpan,
        header: &MeshHeader,
    ) -> Result<Mesh> {
        let (vertex_x, vertex_y, vertex_z) = Mesh::decode_vertices(deltas, data, header)?;
        let triangle_color = Mesh::decode_colors(data, header)?;
        let (triangle_a, triangle_b, triangle_c) = Mesh::decode_triangles(deltas, data, header)?;

        let triangles = header.triangle_count;

        Ok(Mesh {
            vertex_x,
            vertex_y,
            vertex_z,
            triangle_a,
            triangle_b,
            triangle_c,
            triangle_color,
            priority: header.priority,
            triangle_priorities: copy_section(data, header.triangle_priority_offset, triangles)?,
            triangle_skins: copy_section(data, header.triangle_skin_offset, triangles)?,
            triangle_info: copy_section(data, header.triangle_info_offset, triangles)?,
            vertex_skins: copy_section(data, header.vertex_skin_offset, header.vertex_count)?,
            triangle_alphas: copy_section(data, header.triangle_alpha_offset, triangles)?,
        })
    }

    /// Vertices are a running sum: each delta is added to the previous vertex, and axes
    /// without a direction bit stay where they were.
    fn decode_vertices(
        deltas: SmartKind,
        data: ByteSpan,
        header: &MeshHeader,
    ) -> Result<(Vec<i32>, Vec<i32>, Vec<i32>)> {
        let mut directions = Buffer::with_position(data, header.vertex_direction_offset);
        let mut x_deltas = Buffer::with_position(data, header.vertex_delta_x_offset);
        let mut y_deltas = Buffer::with_position(data, header.vertex_delta_y_offset);
        let mut z_deltas = Buffer::with_position(data, header.vertex_delta_z_offset);

        let mut vertex_x = Vec::with_capacity(header.vertex_count);
        let mut vertex_y = Vec::with_capacity(header.vertex_count);
        let mut vertex_z = Vec::with_capacity(header.vertex_count);

        let (mut base_x, mut base_y, mut base_z) = (0i32, 0i32, 0i32);

        for _ in 0..header.vertex_count {
            let direction = VertexDirection::from_bytes([directions.read_u8()?]);

            if direction.x() {
                base_x += deltas.read(&mut x_deltas)?;
            }
            if direction.y() {
                base_y += deltas.read(&mut y_deltas)?;
            }
            if direction.z() {
                base_z += deltas.read(&mut z_deltas)?;
            }

            vertex_x.push(base_x);
            vertex_y.push(base_y);
            vertex_z.push(base_z);
        }

        Ok((vertex_x, vertex_y, vertex_z))
    }

    fn decode_colors(data: ByteSpan, header: &MeshHeader) -> Result<Vec<u16>> {
        let mut colors = Buffer::with_position(data, header.triangle_color_offset);

        (0..header.triangle_count)
            .map(|_| colors.read_u16())
            .collect()
    }

    fn decode_triangles(
        deltas: SmartKind,
        data: ByteSpan,
        header: &MeshHeader,
    ) -> Result<(Vec<u16>, Vec<u16>, Vec<u16>)> {
        let mut face_data = Buffer::with_position(data, header.face_data_offset);
        let mut types = Buffer::with_position(data, header.triangle_type_offset);

        let mut triangle_a = Vec::with_capacity(header.triangle_count);
        let mut triangle_b = Vec::with_capacity(header.triangle_count);
        let mut triangle_c = Vec::with_capacity(header.triangle_count);

        let (mut a, mut b, mut c) = (0i32, 0i32, 0i32);
        let mut offset = 0i32;

        // every new index is a delta from the last new index
        let mut next_index = || -> Result<i32> {
            offset += deltas.read(&mut face_data)?;
            Ok(offset)
        };

        for triangle in 0..header.triangle_count {
            let kind = types.read_u8()?;

            match TriangleKind::from_byte(kind) {
                Some(TriangleKind::Fresh) => {
                    a = next_index()?;
                    b = next_index()?;
                    c = next_index()?;
                }
                Some(TriangleKind::KeepFirst) => {
                    b = c;
                    c = next_index()?;
                }
                Some(TriangleKind::KeepSecond) => {
                    a = c;
                    c = next_index()?;
                }
                Some(TriangleKind::Flip) => {
                    std::mem::swap(&mut a, &mut b);
                    c = next_index()?;
                }
                None => {
                    return Err(GeometryFault::UnknownTriangleType { triangle, kind }.into());
                }
            }

            for (index, list) in [
                (a, &mut triangle_a),
                (b, &mut triangle_b),
                (c, &mut triangle_c),
            ] {
                if index < 0 || index as usize >= header.vertex_count {
                    return Err(GeometryFault::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count: header.vertex_count,
                    }
                    .into());
                }

                list.push(index as u16);
            }
        }

        Ok((triangle_a, triangle_b, triangle_c))
    }
}
