// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Assembles mesh blobs for tests, section by section.

/// The sections of a mesh, in file order. Counts and flags in the trailer are derived
/// from which sections are filled in.
#[derive(Debug, Default, Clone)]
pub(crate) struct MeshBlob {
    pub vertex_directions: Vec<u8>,
    pub triangle_types: Vec<u8>,
    pub priorities: Option<Vec<u8>>,
    pub triangle_skins: Option<Vec<u8>>,
    pub info: Option<Vec<u8>>,
    pub vertex_skins: Option<Vec<u8>>,
    pub alphas: Option<Vec<u8>>,
    pub face_data: Vec<u8>,
    pub colors: Vec<u16>,
    pub texture_faces: Vec<u8>,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
    pub z: Vec<u8>,
    /// Written as the priority flag when `priorities` is empty.
    pub priority: u8,
}

impl MeshBlob {
    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![];

        data.extend(&self.vertex_directions);
        data.extend(&self.triangle_types);
        for section in [
            &self.priorities,
            &self.triangle_skins,
            &self.info,
            &self.vertex_skins,
            &self.alphas,
        ]
        .into_iter()
        .flatten()
        {
            data.extend(section);
        }
        data.extend(&self.face_data);
        for color in &self.colors {
            data.extend(color.to_be_bytes());
        }
        data.extend(&self.texture_faces);
        data.extend(&self.x);
        data.extend(&self.y);
        data.extend(&self.z);

        data.extend((self.vertex_directions.len() as u16).to_be_bytes());
        data.extend((self.triangle_types.len() as u16).to_be_bytes());
        data.push((self.texture_faces.len() / 6) as u8);
        data.push(self.info.is_some() as u8);
        data.push(if self.priorities.is_some() {
            255
        } else {
            self.priority
        });
        data.push(self.alphas.is_some() as u8);
        data.push(self.triangle_skins.is_some() as u8);
        data.push(self.vertex_skins.is_some() as u8);
        data.extend((self.x.len() as u16).to_be_bytes());
        data.extend((self.y.len() as u16).to_be_bytes());
        data.extend((self.z.len() as u16).to_be_bytes());
        data.extend((self.face_data.len() as u16).to_be_bytes());

        data
    }
}
