// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::debug;

use crate::common::{FormatRevision, SmartKind, get_revision_string};
use crate::error::{Error, Result};
#[cfg(feature = "visual_data")]
use crate::mesh::Mesh;
use crate::obj::ObjectDefinition;
use crate::obj_table::ObjectTable;
use crate::resource::{Resource, ResourceResolver};
use crate::ByteBuffer;

/// Where things are kept in a cache, and how they are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheLayout {
    /// How object definitions are packed.
    pub revision: FormatRevision,
    /// How mesh deltas are packed.
    pub mesh_deltas: SmartKind,
    /// Store holding the archive with the object table.
    pub object_store: u8,
    /// Archive holding the object table.
    pub object_archive: u32,
    pub object_index_name: String,
    pub object_data_name: String,
    /// Store holding one file per mesh, named by the mesh id.
    pub mesh_store: u8,
}

impl Default for CacheLayout {
    fn default() -> Self {
        Self {
            revision: FormatRevision::default(),
            mesh_deltas: SmartKind::default(),
            object_store: 0,
            object_archive: 2,
            object_index_name: "obj.idx".to_string(),
            object_data_name: "obj.dat".to_string(),
            mesh_store: 1,
        }
    }
}

/// Framework for reading objects and meshes out of a cache.
///
/// The object table is read once, on first use, and kept. Meshes are read from the
/// resolver every time.
///
/// # Example
///
/// ```
/// # use cache317::cache::{CacheData, CacheLayout};
/// # use cache317::resource::{ResourceResolver, UnpackedResource};
/// let mut resolver = ResourceResolver::new();
/// resolver.add_source(UnpackedResource::from_existing("cache/"));
///
/// let mut cache = CacheData::new(resolver, CacheLayout::default());
/// if let Ok(chair) = cache.object(42) {
///     println!("{:?}", chair.name);
/// }
/// ```
pub struct CacheData {
    resolver: ResourceResolver,
    layout: CacheLayout,
    table: Option<ObjectTable>,
}

impl CacheData {
    pub fn new(resolver: ResourceResolver, layout: CacheLayout) -> Self {
        Self {
            resolver,
            layout,
            table: None,
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// The underlying resolver, for reading files this type doesn't know about.
    ///
    /// If sources added here change the object table, call [`CacheData::reload`].
    pub fn resolver(&mut self) -> &mut ResourceResolver {
        &mut self.resolver
    }

    /// Forgets the object table, so the next lookup reads it again.
    pub fn reload(&mut self) {
        self.table = None;
    }

    fn read_object_file(&mut self, name: &str) -> Result<ByteBuffer> {
        let store = self.layout.object_store;
        let file = self.layout.object_archive;

        self.resolver
            .read_named(store, file, name)
            .ok_or_else(|| Error::NotFound {
                store,
                file,
                name: Some(name.to_string()),
            })
    }

    /// Every object definition, read and indexed on first use.
    pub fn object_table(&mut self) -> Result<&ObjectTable> {
        let table = match self.table.take() {
            Some(table) => table,
            None => self.load_object_table()?,
        };

        let table: &ObjectTable = self.table.insert(table);
        Ok(table)
    }

    fn load_object_table(&mut self) -> Result<ObjectTable> {
        let index_name = self.layout.object_index_name.clone();
        let data_name = self.layout.object_data_name.clone();

        let index = self.read_object_file(&index_name)?;
        let data = self.read_object_file(&data_name)?;

        debug!(
            revision = get_revision_string(&self.layout.revision),
            index_size = index.len(),
            data_size = data.len(),
            "Building object table"
        );

        ObjectTable::from_existing(self.layout.revision, &index, &data)
    }

    /// Reads the object definition `id`.
    pub fn object(&mut self, id: u32) -> Result<ObjectDefinition> {
        self.object_table()?.lookup(id)
    }

    /// Reads the mesh `id`, as it is stored.
    #[cfg(feature = "visual_data")]
    pub fn mesh(&mut self, id: u32) -> Result<Mesh> {
        let store = self.layout.mesh_store;

        let data = self.resolver.read(store, id).ok_or(Error::NotFound {
            store,
            file: id,
            name: None,
        })?;

        debug!(id, size = data.len(), "Decoding mesh");

        Mesh::decode(self.layout.mesh_deltas, &data)
    }

    /// Reads the mesh of `object`, recolored and scaled the way the object wants it.
    #[cfg(feature = "visual_data")]
    pub fn mesh_for(&mut self, object: &ObjectDefinition) -> Result<Mesh> {
        let mut mesh = self.mesh(object.model_id)?;
        object.apply_to(&mut mesh);
        Ok(mesh)
    }
}
