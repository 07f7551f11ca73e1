// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use tracing::warn;

use crate::ByteBuffer;

use super::Resource;

/// Used to read unpacked cache files from a directory.
///
/// Files live at `<base>/<store>/<file>`, and archive entries at
/// `<base>/<store>/<file>/<name>`. In most cases, you probably want to use this inside of
/// a `ResourceResolver`.
pub struct UnpackedResource {
    base_directory: PathBuf,
}

impl UnpackedResource {
    pub fn from_existing(base_directory: &str) -> Self {
        let base_directory = PathBuf::from(base_directory);
        if !base_directory.is_dir() {
            warn!(
                directory = %base_directory.display(),
                "Unpacked cache directory not found."
            );
        }

        Self { base_directory }
    }

    fn file_path(&self, store: u8, file: u32) -> PathBuf {
        let mut path = self.base_directory.clone();
        path.push(store.to_string());
        path.push(file.to_string());
        path
    }

    fn entry_path(&self, store: u8, file: u32, name: &str) -> PathBuf {
        let mut path = self.file_path(store, file);
        path.push(name.to_lowercase());
        path
    }
}

impl Resource for UnpackedResource {
    fn read(&mut self, store: u8, file: u32) -> Option<ByteBuffer> {
        let path = self.file_path(store, file);
        if !path.is_file() {
            return None;
        }

        std::fs::read(path).ok()
    }

    fn read_named(&mut self, store: u8, file: u32, name: &str) -> Option<ByteBuffer> {
        std::fs::read(self.entry_path(store, file, name)).ok()
    }

    fn exists(&mut self, store: u8, file: u32) -> bool {
        self.file_path(store, file).is_file()
    }

    fn exists_named(&mut self, store: u8, file: u32, name: &str) -> bool {
        self.entry_path(store, file, name).is_file()
    }
}
