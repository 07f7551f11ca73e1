// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::buffer::Buffer;
use crate::common::FormatRevision;
use crate::error::{Error, Result};
use crate::obj::ObjectDefinition;
use crate::{ByteBuffer, ByteSpan};

/// Object records are kept in the config store.
const OBJECT_STORE: u8 = 0;

/// The first record starts after the count mirrored at the top of `obj.dat`.
const FIRST_RECORD_OFFSET: usize = 2;

/// Where a single record lives in `obj.dat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub offset: usize,
    pub length: usize,
}

/// Every object definition in the cache, indexed by id.
///
/// `obj.idx` starts with the number of records, followed by the length of each record.
/// Records are laid out back to back in `obj.dat`, so the offset of a record is the sum of
/// the lengths before it.
#[derive(Debug, Clone)]
pub struct ObjectTable {
    revision: FormatRevision,
    data: ByteBuffer,
    entries: Vec<TableEntry>,
}

impl ObjectTable {
    /// Reads the index, and takes a copy of the data blob for later lookups.
    pub fn from_existing(
        revision: FormatRevision,
        index: ByteSpan,
        data: ByteSpan,
    ) -> Result<ObjectTable> {
        let mut buffer = Buffer::new(index);
        let count = buffer.read_u16()? as usize;

        let mut entries = Vec::with_capacity(count);
        let mut offset = FIRST_RECORD_OFFSET;
        for _ in 0..count {
            let length = buffer.read_u16()? as usize;

            if offset + length > data.len() {
                return Err(Error::OutOfData {
                    position: offset,
                    needed: length,
                    available: data.len().saturating_sub(offset),
                });
            }

            entries.push(TableEntry { offset, length });
            offset += length;
        }

        Ok(ObjectTable {
            revision,
            data: data.to_vec(),
            entries,
        })
    }

    pub fn revision(&self) -> FormatRevision {
        self.revision
    }

    /// The number of records in the table.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, id: u32) -> Option<TableEntry> {
        self.entries.get(id as usize).copied()
    }

    /// Offset of record `id` within `obj.dat`.
    pub fn offset(&self, id: u32) -> Option<usize> {
        self.entry(id).map(|entry| entry.offset)
    }

    /// The raw bytes of record `id`, bounded by its declared length.
    pub fn record(&self, id: u32) -> Option<ByteSpan> {
        let entry = self.entry(id)?;
        self.data.get(entry.offset..entry.offset + entry.length)
    }

    /// Decodes record `id`.
    pub fn lookup(&self, id: u32) -> Result<ObjectDefinition> {
        let record = self.record(id).ok_or(Error::NotFound {
            store: OBJECT_STORE,
            file: id,
            name: None,
        })?;

        ObjectDefinition::decode(self.revision, record, id)
    }

    /// Decodes every record in id order.
    pub fn iter(&self) -> impl Iterator<Item = Result<ObjectDefinition>> + '_ {
        (0..self.count() as u32).map(|id| self.lookup(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(records: &[&[u8]]) -> (Vec<u8>, Vec<u8>) {
        let mut index = (records.len() as u16).to_be_bytes().to_vec();
        let mut data = (records.len() as u16).to_be_bytes().to_vec();
        for record in records {
            index.extend((record.len() as u16).to_be_bytes());
            data.extend(*record);
        }

        (index, data)
    }

    #[test]
    fn empty_table() {
        let (index, data) = table(&[]);
        let table = ObjectTable::from_existing(FormatRevision::Editor, &index, &data).unwrap();

        assert_eq!(table.count(), 0);
        assert_eq!(table.offset(0), None);
        assert_eq!(
            table.lookup(0),
            Err(Error::NotFound {
                store: 0,
                file: 0,
                name: None
            })
        );
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn offsets_accumulate() {
        let (index, data) = table(&[&[1, 0, 7, 0], &[0], &[5, 0, 1, 0]]);
        let table = ObjectTable::from_existing(FormatRevision::Editor, &index, &data).unwrap();

        assert_eq!(table.count(), 3);
        assert_eq!(table.offset(0), Some(2));
        assert_eq!(table.offset(1), Some(6));
        assert_eq!(table.offset(2), Some(7));
        assert_eq!(
            table.entry(2),
            Some(TableEntry {
                offset: 7,
                length: 4
            })
        );
        assert_eq!(table.offset(3), None);
    }

    #[test]
    fn lookup() {
        let (index, data) = table(&[&[1, 0, 7, 0], &[0], &[5, 0, 1, 0]]);
        let table = ObjectTable::from_existing(FormatRevision::Client, &index, &data).unwrap();

        let first = table.lookup(0).unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.model_id, 7);

        let second = table.lookup(1).unwrap();
        assert_eq!(second, ObjectDefinition::new(FormatRevision::Client, 1));

        let third = table.lookup(2).unwrap();
        assert_eq!(third.pitch, 1);

        assert!(matches!(table.lookup(3), Err(Error::NotFound { file: 3, .. })));

        let all: Vec<_> = table.iter().collect::<Result<_>>().unwrap();
        assert_eq!(all, vec![first, second, third]);
    }

    #[test]
    fn records_are_bounded() {
        // the first record is missing its terminator, and must not run into the second
        let (index, data) = table(&[&[1, 0, 7], &[0]]);
        let table = ObjectTable::from_existing(FormatRevision::Editor, &index, &data).unwrap();

        assert_eq!(table.lookup(0), Err(Error::UnterminatedRecord { id: 0 }));
        assert!(table.lookup(1).is_ok());
    }

    #[test]
    fn index_past_data() {
        let (index, mut data) = table(&[&[0], &[1, 0, 7, 0]]);
        data.truncate(5);

        assert_eq!(
            ObjectTable::from_existing(FormatRevision::Editor, &index, &data).unwrap_err(),
            Error::OutOfData {
                position: 3,
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn truncated_index() {
        let index = [0u8, 2, 0, 1];
        let data = [0u8, 2, 0, 0];

        assert!(matches!(
            ObjectTable::from_existing(FormatRevision::Editor, &index, &data),
            Err(Error::OutOfData { position: 4, .. })
        ));
        assert!(matches!(
            ObjectTable::from_existing(FormatRevision::Editor, &[], &[]),
            Err(Error::OutOfData { position: 0, .. })
        ));
    }
}
