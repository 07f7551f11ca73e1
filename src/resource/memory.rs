// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;

use crate::ByteBuffer;

use super::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FileKey {
    store: u8,
    file: u32,
    name: Option<String>,
}

/// Serves cache files that are already in memory, for example ones downloaded or
/// assembled by hand.
#[derive(Debug, Default, Clone)]
pub struct MemoryResource {
    files: HashMap<FileKey, ByteBuffer>,
}

impl MemoryResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) file `file` of store `store`.
    pub fn insert(&mut self, store: u8, file: u32, data: ByteBuffer) {
        self.files.insert(
            FileKey {
                store,
                file,
                name: None,
            },
            data,
        );
    }

    /// Adds (or replaces) the archive entry `name`.
    pub fn insert_named(&mut self, store: u8, file: u32, name: &str, data: ByteBuffer) {
        self.files.insert(
            FileKey {
                store,
                file,
                name: Some(name.to_lowercase()),
            },
            data,
        );
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn get(&self, store: u8, file: u32, name: Option<&str>) -> Option<&ByteBuffer> {
        self.files.get(&FileKey {
            store,
            file,
            name: name.map(str::to_lowercase),
        })
    }
}

impl Resource for MemoryResource {
    fn read(&mut self, store: u8, file: u32) -> Option<ByteBuffer> {
        self.get(store, file, None).cloned()
    }

    fn read_named(&mut self, store: u8, file: u32, name: &str) -> Option<ByteBuffer> {
        self.get(store, file, Some(name)).cloned()
    }

    fn exists(&mut self, store: u8, file: u32) -> bool {
        self.get(store, file, None).is_some()
    }

    fn exists_named(&mut self, store: u8, file: u32, name: &str) -> bool {
        self.get(store, file, Some(name)).is_some()
    }
}
