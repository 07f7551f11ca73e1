// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoders for the file formats found in legacy (revision 317 era) game caches: object
//! definitions, the object table that indexes them, and the meshes they reference.

/// A continuous block of memory which is not owned, and comes either from an in-memory location or from a file.
pub type ByteSpan<'a> = &'a [u8];

/// A continuous block of memory which is owned.
pub type ByteBuffer = Vec<u8>;

/// Big-endian cursor with the cache's variable length integer and string encodings.
pub mod buffer;

/// Common structures used by other modules.
pub mod common;
pub use common::{FormatRevision, SmartKind};

mod error;
pub use error::{Error, GeometryFault, Result};

/// Reading object definitions.
pub mod obj;

/// Reading the object table (`obj.idx` and `obj.dat`).
pub mod obj_table;

/// Reading meshes (models).
#[cfg(feature = "visual_data")]
pub mod mesh;

/// Sources of raw cache files, and chaining them together.
pub mod resource;

/// High-level access to the objects and meshes of a cache.
pub mod cache;

/// A file that can be parsed from its raw bytes.
pub trait ReadableFile: Sized {
    /// Parses `buffer`, as laid out by `revision`.
    fn from_existing(revision: FormatRevision, buffer: ByteSpan) -> Result<Self>;
}

#[cfg(test)]
fn pass_random_invalid<T: ReadableFile>() {
    use std::fs::read;
    use std::path::PathBuf;

    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("resources/tests");
    d.push("random");

    // Feeding it invalid data should not panic
    let data = read(d).unwrap();
    for revision in [FormatRevision::Editor, FormatRevision::Client] {
        let _ = T::from_existing(revision, &data);
    }
}
