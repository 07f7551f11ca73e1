// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::{trace, warn};

use crate::{ByteBuffer, Error, FormatRevision, ReadableFile};

use super::Resource;

/// Allows chaining multiple Resources together, with the first source that has a file winning.
///
/// # Example
///
/// ```
/// # use cache317::resource::{ResourceResolver, MemoryResource, UnpackedResource};
/// let mut patched = MemoryResource::new();
/// patched.insert(1, 42, vec![0; 18]);
///
/// let mut resolver = ResourceResolver::new();
/// resolver.add_source(patched); // first has most priority
/// resolver.add_source(UnpackedResource::from_existing("cache/")); // this is the fallback
/// ```
#[derive(Default)]
pub struct ResourceResolver {
    resources: Vec<Box<dyn Resource>>,
}

impl ResourceResolver {
    /// Create a new, empty resolver.
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Adds a new source to this resolver, and makes it the least prioritized.
    pub fn add_source(&mut self, source: impl Resource + 'static) {
        self.resources.push(Box::new(source));
    }

    /// The number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.resources.len()
    }

    /// Reads and parses file `file` of store `store`. This avoids having to call both
    /// `read` and `from_existing`.
    ///
    /// # Example
    ///
    /// ```
    /// # use cache317::{Error, FormatRevision};
    /// # use cache317::mesh::Mesh;
    /// # use cache317::resource::{ResourceResolver, MemoryResource};
    /// let mut resolver = ResourceResolver::new();
    /// resolver.add_source(MemoryResource::new());
    ///
    /// let mesh = resolver.parsed::<Mesh>(FormatRevision::Editor, 1, 42);
    /// assert!(matches!(mesh, Err(Error::NotFound { store: 1, file: 42, .. })));
    /// ```
    pub fn parsed<F: ReadableFile>(
        &mut self,
        revision: FormatRevision,
        store: u8,
        file: u32,
    ) -> Result<F, Error> {
        let data = self.read(store, file).ok_or(Error::NotFound {
            store,
            file,
            name: None,
        })?;

        F::from_existing(revision, &data)
    }

    fn first_found<T>(
        &mut self,
        description: &str,
        mut f: impl FnMut(&mut dyn Resource) -> Option<T>,
    ) -> Option<T> {
        for (source, resource) in self.resources.iter_mut().enumerate() {
            if let Some(found) = f(resource.as_mut()) {
                trace!(source, file = description, "Found file");
                return Some(found);
            }
        }

        warn!(file = description, "File not found in any source.");
        None
    }
}

impl Resource for ResourceResolver {
    fn read(&mut self, store: u8, file: u32) -> Option<ByteBuffer> {
        self.first_found(&format!("{store}/{file}"), |resource| {
            resource.read(store, file)
        })
    }

    fn read_named(&mut self, store: u8, file: u32, name: &str) -> Option<ByteBuffer> {
        self.first_found(&format!("{store}/{file}/{name}"), |resource| {
            resource.read_named(store, file, name)
        })
    }

    fn exists(&mut self, store: u8, file: u32) -> bool {
        self.resources
            .iter_mut()
            .any(|resource| resource.exists(store, file))
    }

    fn exists_named(&mut self, store: u8, file: u32, name: &str) -> bool {
        self.resources
            .iter_mut()
            .any(|resource| resource.exists_named(store, file, name))
    }
}
