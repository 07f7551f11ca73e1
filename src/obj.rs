// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ByteSpan;
use crate::buffer::Buffer;
use crate::common::FormatRevision;
use crate::error::{Error, Result};

#[cfg(feature = "visual_data")]
use crate::mesh::Mesh;

/// The scale that leaves a mesh untouched.
pub const UNSCALED: u16 = 128;

/// Color substitutions applied to an object's mesh, from opcode 40.
///
/// The two lists always have the same length, and entry `i` of `original` is replaced by
/// entry `i` of `replacement`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorTable {
    original: Vec<u16>,
    replacement: Vec<u16>,
}

impl ColorTable {
    fn decode(buffer: &mut Buffer) -> Result<ColorTable> {
        let count = buffer.read_u8()? as usize;

        let mut original = Vec::with_capacity(count);
        let mut replacement = Vec::with_capacity(count);
        for _ in 0..count {
            original.push(buffer.read_u16()?);
            replacement.push(buffer.read_u16()?);
        }

        Ok(ColorTable {
            original,
            replacement,
        })
    }

    pub fn original(&self) -> &[u16] {
        &self.original
    }

    pub fn replacement(&self) -> &[u16] {
        &self.replacement
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Iterates over `(original, replacement)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.original
            .iter()
            .copied()
            .zip(self.replacement.iter().copied())
    }
}

/// A placeable object, such as an item, as stored in `obj.dat`.
///
/// Transform fields are public so viewers can tweak them for previews.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDefinition {
    pub id: u32,
    /// The mesh drawn for this object, see [`crate::cache::CacheData::mesh`].
    pub model_id: u32,
    /// Only present when the record carried opcode 40, even if it listed no colors.
    pub colors: Option<ColorTable>,
    /// Angles are in 1/2048ths of a turn.
    pub pitch: u16,
    pub yaw: u16,
    pub roll: u16,
    pub translate_x: i16,
    pub translate_y: i16,
    pub zoom: u16,
    /// Added to the base ambient light when the mesh is lit.
    pub ambient: i8,
    /// Added to the base light attenuation. Already multiplied by 5.
    pub attenuation: i16,
    pub scale_x: u16,
    pub scale_y: u16,
    pub scale_z: u16,
    pub name: Option<String>,
}

impl ObjectDefinition {
    /// An object with every field at its default, as if its record was only a terminator.
    pub fn new(revision: FormatRevision, id: u32) -> ObjectDefinition {
        ObjectDefinition {
            id,
            model_id: 0,
            colors: None,
            pitch: 0,
            yaw: 0,
            roll: 0,
            translate_x: 0,
            translate_y: 0,
            zoom: revision.default_zoom(),
            ambient: 0,
            attenuation: 0,
            scale_x: UNSCALED,
            scale_y: UNSCALED,
            scale_z: UNSCALED,
            name: None,
        }
    }

    /// Decodes the record in `data`. The record ends at the first 0 opcode, anything after
    /// it is ignored.
    pub fn decode(revision: FormatRevision, data: ByteSpan, id: u32) -> Result<ObjectDefinition> {
        let mut buffer = Buffer::new(data);
        let mut definition = ObjectDefinition::new(revision, id);

        loop {
            if buffer.is_empty() {
                return Err(Error::UnterminatedRecord { id });
            }

            let position = buffer.position();
            let opcode = buffer.read_u8()?;

            match opcode {
                0 => return Ok(definition),
                1 => definition.model_id = buffer.read_u16()?.into(),
                2 => {
                    let name = buffer.read_string()?;
                    if revision.keeps_names() {
                        definition.name = Some(name);
                    }
                }
                3 | 30..=39 => buffer.skip_string()?,
                4 => definition.zoom = buffer.read_u16()?,
                5 => definition.pitch = buffer.read_u16()?,
                6 => definition.yaw = buffer.read_u16()?,
                // stored unsigned, but these are really signed 16-bit offsets
                7 => definition.translate_x = buffer.read_u16()? as i16,
                8 => definition.translate_y = buffer.read_u16()? as i16,
                10 | 24 | 26 | 78 | 79 | 90..=93 | 97 | 98 | 115 => {
                    buffer.read_u16()?;
                }
                12 => {
                    buffer.read_i32()?;
                }
                23 | 25 => {
                    buffer.read_u16()?;
                    buffer.read_u8()?;
                }
                40 => definition.colors = Some(ColorTable::decode(&mut buffer)?),
                95 => definition.roll = buffer.read_u16()?,
                100..=109 => {
                    buffer.read_u16()?;
                    buffer.read_u16()?;
                }
                110 => definition.scale_x = buffer.read_u16()?,
                111 => definition.scale_z = buffer.read_u16()?,
                112 => definition.scale_y = buffer.read_u16()?,
                113 => definition.ambient = buffer.read_i8()?,
                114 => definition.attenuation = buffer.read_i8()? as i16 * 5,
                _ => {
                    return Err(Error::UnrecognizedOpcode {
                        id,
                        opcode,
                        position,
                    });
                }
            }
        }
    }

    pub fn original_colors(&self) -> Option<&[u16]> {
        self.colors.as_ref().map(ColorTable::original)
    }

    pub fn replacement_colors(&self) -> Option<&[u16]> {
        self.colors.as_ref().map(ColorTable::replacement)
    }

    /// Whether any axis has a non-default scale.
    pub fn is_scaled(&self) -> bool {
        self.scale_x != UNSCALED || self.scale_y != UNSCALED || self.scale_z != UNSCALED
    }

    /// Applies this object's scale and color substitutions to its decoded mesh.
    #[cfg(feature = "visual_data")]
    pub fn apply_to(&self, mesh: &mut Mesh) {
        if self.is_scaled() {
            // opcode 111 stretches the vertical axis and 112 the depth axis
            mesh.scale(self.scale_x, self.scale_z, self.scale_y);
        }

        if let Some(colors) = &self.colors {
            for (original, replacement) in colors.iter() {
                mesh.recolor(original, replacement);
            }
        }
    }
}
