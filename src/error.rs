// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Everything that can go wrong while fetching or decoding cache data.
///
/// None of these are retryable: decoding the same bytes again fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A read ran past the end of the buffer. The input is truncated or corrupt.
    #[error("out of data: needed {needed} byte(s) at position {position}, but only {available} remain")]
    OutOfData {
        /// Cursor position where the read started.
        position: usize,
        /// How many bytes the read wanted.
        needed: usize,
        /// How many bytes were left.
        available: usize,
    },
    /// An object record ended without ever emitting the terminator opcode.
    #[error("object {id} is missing its terminating opcode")]
    UnterminatedRecord {
        /// The object being decoded.
        id: u32,
    },
    /// An object record contained an opcode with no known operand layout.
    #[error("object {id} has unrecognized opcode {opcode} at position {position}")]
    UnrecognizedOpcode {
        /// The object being decoded.
        id: u32,
        /// The offending opcode.
        opcode: u8,
        /// Position of the opcode byte within the record.
        position: usize,
    },
    /// Mesh data decoded, but describes impossible geometry.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(#[from] GeometryFault),
    /// The requested file or record does not exist.
    #[error("not found: store {store}, file {file}{}", describe_name(.name))]
    NotFound {
        /// Store index.
        store: u8,
        /// File id, or record id for table lookups.
        file: u32,
        /// File name within the archive, if one was requested.
        name: Option<String>,
    },
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}

/// The specific reason a mesh was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryFault {
    /// The trailer describes sections that extend past the data before it.
    #[error("sections end at byte {end}, but the trailer starts at byte {limit}")]
    SectionOverrun {
        /// One past the last byte the sections claim.
        end: usize,
        /// Where the trailer starts.
        limit: usize,
    },
    /// A triangle references a vertex that doesn't exist.
    #[error("triangle {triangle} references vertex {index}, but there are only {vertex_count}")]
    IndexOutOfRange {
        /// The triangle being decoded.
        triangle: usize,
        /// The offending vertex index, which may be negative.
        index: i32,
        /// How many vertices the mesh has.
        vertex_count: usize,
    },
    /// A triangle type byte outside of 1..=4.
    #[error("triangle {triangle} has unknown type {kind}")]
    UnknownTriangleType {
        /// The triangle being decoded.
        triangle: usize,
        /// The type byte that was read.
        kind: u8,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
