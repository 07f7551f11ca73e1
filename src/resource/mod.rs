// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

mod resolver;
pub use resolver::ResourceResolver;

mod memory;
pub use memory::MemoryResource;

mod unpacked;
pub use unpacked::UnpackedResource;

use crate::ByteBuffer;

/// Represents a source of cache files for reading.
///
/// Files are addressed by their store (0 for configs, 1 for models, and so on) and their
/// id within that store. Some files are archives, whose entries are addressed by name.
/// This could represent files extracted to disk, files kept in memory, or even a network.
pub trait Resource {
    /// Reads file `file` from store `store`. This is returned as an in-memory buffer, and
    /// will usually have to be further parsed.
    ///
    /// # Example
    ///
    /// ```
    /// # use cache317::resource::{Resource, MemoryResource};
    /// let mut resource = MemoryResource::new();
    /// resource.insert(1, 42, vec![1, 2, 3]);
    ///
    /// assert_eq!(resource.read(1, 42), Some(vec![1, 2, 3]));
    /// assert_eq!(resource.read(1, 43), None);
    /// ```
    fn read(&mut self, store: u8, file: u32) -> Option<ByteBuffer>;

    /// Reads the entry `name` of the archive `file` in store `store`, such as `obj.dat`.
    fn read_named(&mut self, store: u8, file: u32, name: &str) -> Option<ByteBuffer>;

    /// Checks if a file exists.
    ///
    /// While you could abuse `read` to do this, in some Resources they can optimize this since it doesn't read data.
    fn exists(&mut self, store: u8, file: u32) -> bool;

    /// Checks if an archive entry exists.
    fn exists_named(&mut self, store: u8, file: u32, name: &str) -> bool {
        self.read_named(store, file, name).is_some()
    }
}
