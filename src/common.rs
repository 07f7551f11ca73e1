// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::buffer::Buffer;
use crate::error::Result;

/// The flavour of object data being read.
///
/// Both revisions share the same opcodes, and only differ in a few defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatRevision {
    /// Data as packed for the inventory editor: objects keep their names, and zoom defaults
    /// to 2000.
    #[default]
    Editor,
    /// Data as packed for the game client: names are dropped, and zoom defaults to 0.
    Client,
}

impl FormatRevision {
    /// The zoom an object has when its record never sets one.
    pub fn default_zoom(&self) -> u16 {
        match self {
            FormatRevision::Editor => 2000,
            FormatRevision::Client => 0,
        }
    }

    /// Whether opcode 2 names are kept, or read and thrown away.
    pub fn keeps_names(&self) -> bool {
        matches!(self, FormatRevision::Editor)
    }
}

/// How the vertex and face index deltas of a mesh are packed.
///
/// This is independent of [`FormatRevision`]: caches of both revisions ship meshes with
/// signed deltas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmartKind {
    /// `-64..=63` in one byte, otherwise `-16384..=16383` in two. See
    /// [`Buffer::read_signed_smart`].
    #[default]
    Signed,
    /// `0..=127` in one byte, otherwise `0..=32767` in two. See [`Buffer::read_smart`].
    Unsigned,
}

impl SmartKind {
    /// Reads one delta.
    #[cfg_attr(not(feature = "visual_data"), allow(dead_code))]
    pub(crate) fn read(&self, buffer: &mut Buffer) -> Result<i32> {
        match self {
            SmartKind::Signed => buffer.read_signed_smart(),
            SmartKind::Unsigned => buffer.read_smart(),
        }
    }
}

/// Returns a short name for `revision`, used in log output.
pub fn get_revision_string(revision: &FormatRevision) -> &'static str {
    match revision {
        FormatRevision::Editor => "editor",
        FormatRevision::Client => "client",
    }
}
