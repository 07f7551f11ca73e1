// SPDX-FileCopyrightText: 2026 cache317 contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Cursor;

use binrw::BinReaderExt;

use crate::ByteSpan;
use crate::error::{Error, Result};

/// Terminates every string in the cache (a line feed).
pub const STRING_TERMINATOR: u8 = 10;

/// A forward-only, big-endian read cursor over cache data.
///
/// Besides the usual fixed-width integers, this knows how to read the two "smart"
/// encodings used by the format, which take one byte for small values and two bytes
/// otherwise. The top bit of the first byte tells the two forms apart.
#[derive(Debug, Clone)]
pub struct Buffer<'a> {
    cursor: Cursor<ByteSpan<'a>>,
}

impl<'a> Buffer<'a> {
    /// Creates a buffer positioned at the start of `data`.
    pub fn new(data: ByteSpan<'a>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Creates a buffer positioned at `position`. Used by the mesh decoder, which walks
    /// several sections of one blob at once.
    pub fn with_position(data: ByteSpan<'a>, position: usize) -> Self {
        let mut cursor = Cursor::new(data);
        cursor.set_position(position as u64);
        Self { cursor }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Number of unread bytes. Zero if the cursor was placed past the end.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(Error::OutOfData {
                position: self.position(),
                needed,
                available,
            });
        }

        Ok(())
    }

    fn out_of_data(&self, needed: usize) -> Error {
        Error::OutOfData {
            position: self.position(),
            needed,
            available: self.remaining(),
        }
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.get_ref()[self.position()])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.cursor.read_be::<u8>().map_err(|_| self.out_of_data(1))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        self.cursor.read_be::<i8>().map_err(|_| self.out_of_data(1))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        self.cursor.read_be::<u16>().map_err(|_| self.out_of_data(2))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        self.cursor.read_be::<i32>().map_err(|_| self.out_of_data(4))
    }

    /// Reads a line feed terminated string. The terminator is consumed but not returned,
    /// and each byte maps to one Latin-1 character.
    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_string_bytes()?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Consumes a terminated string without decoding it.
    pub fn skip_string(&mut self) -> Result<()> {
        self.read_string_bytes().map(|_| ())
    }

    fn read_string_bytes(&mut self) -> Result<ByteSpan<'a>> {
        let data: ByteSpan<'a> = *self.cursor.get_ref();
        let start = self.position();
        let rest = data.get(start..).unwrap_or_default();

        let Some(length) = rest.iter().position(|&b| b == STRING_TERMINATOR) else {
            // a terminator would have been the byte after everything we have
            return Err(self.out_of_data(rest.len() + 1));
        };

        self.cursor.set_position((start + length + 1) as u64);
        Ok(&rest[..length])
    }

    /// Reads the unsigned smart: `0..=127` in one byte, otherwise two bytes with the
    /// top bit cleared, giving `0..=32767`.
    pub fn read_smart(&mut self) -> Result<i32> {
        if self.peek_u8()? < 128 {
            Ok(self.read_u8()? as i32)
        } else {
            Ok(self.read_u16()? as i32 - 0x8000)
        }
    }

    /// Reads the sign-centred smart that mesh deltas are packed with: `-64..=63` in
    /// one byte, otherwise `-16384..=16383` in two.
    pub fn read_signed_smart(&mut self) -> Result<i32> {
        if self.peek_u8()? < 128 {
            Ok(self.read_u8()? as i32 - 64)
        } else {
            Ok(self.read_u16()? as i32 - 0xC000)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn encode_smart(value: i32) -> Vec<u8> {
        if (0..128).contains(&value) {
            vec![value as u8]
        } else {
            let packed = (value + 0x8000) as u16;
            packed.to_be_bytes().to_vec()
        }
    }

    fn encode_signed_smart(value: i32) -> Vec<u8> {
        if (-64..64).contains(&value) {
            vec![(value + 64) as u8]
        } else {
            let packed = (value + 0xC000) as u16;
            packed.to_be_bytes().to_vec()
        }
    }

    #[test]
    fn read_integers() {
        let data = [0xFFu8, 0x12, 0x34, 0x80, 0x00, 0x00, 0x01, 0xFE];
        let mut buffer = Buffer::new(&data);

        assert_eq!(buffer.read_u8().unwrap(), 0xFF);
        assert_eq!(buffer.read_u16().unwrap(), 0x1234);
        assert_eq!(buffer.read_i32().unwrap(), i32::MIN + 1);
        assert_eq!(buffer.read_i8().unwrap(), -2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn read_past_end() {
        let data = [0x01u8];
        let mut buffer = Buffer::new(&data);

        assert_eq!(
            buffer.read_u16(),
            Err(Error::OutOfData {
                position: 0,
                needed: 2,
                available: 1
            })
        );

        // a failed read leaves the cursor alone
        assert_eq!(buffer.read_u8().unwrap(), 1);
        assert!(matches!(buffer.read_u8(), Err(Error::OutOfData { .. })));
    }

    #[test]
    fn position_past_end() {
        let data = [0u8; 4];
        let mut buffer = Buffer::with_position(&data, 10);

        assert_eq!(buffer.remaining(), 0);
        assert_eq!(
            buffer.read_u8(),
            Err(Error::OutOfData {
                position: 10,
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn read_strings() {
        // the second string carries a Latin-1 é
        let data = b"Oak\nL\xE9gs\n";
        let mut buffer = Buffer::new(data);

        assert_eq!(buffer.read_string().unwrap(), "Oak");
        assert_eq!(buffer.read_string().unwrap(), "Légs");
        assert!(buffer.is_empty());
    }

    #[test]
    fn read_empty_string() {
        let data = b"\nx";
        let mut buffer = Buffer::new(data);

        assert_eq!(buffer.read_string().unwrap(), "");
        assert_eq!(buffer.position(), 1);
    }

    #[test]
    fn unterminated_string() {
        let data = b"abc";
        let mut buffer = Buffer::new(data);

        assert_eq!(
            buffer.skip_string(),
            Err(Error::OutOfData {
                position: 0,
                needed: 4,
                available: 3
            })
        );
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn read_smart_forms() {
        let data = [0x00u8, 0x7F, 0x80, 0x80, 0xFF, 0xFF];
        let mut buffer = Buffer::new(&data);

        assert_eq!(buffer.read_smart().unwrap(), 0);
        assert_eq!(buffer.read_smart().unwrap(), 127);
        assert_eq!(buffer.read_smart().unwrap(), 128);
        assert_eq!(buffer.read_smart().unwrap(), 32767);
    }

    #[test]
    fn read_signed_smart_forms() {
        let data = [0x00u8, 0x40, 0x7F, 0x80, 0x00, 0xFF, 0xFF];
        let mut buffer = Buffer::new(&data);

        assert_eq!(buffer.read_signed_smart().unwrap(), -64);
        assert_eq!(buffer.read_signed_smart().unwrap(), 0);
        assert_eq!(buffer.read_signed_smart().unwrap(), 63);
        assert_eq!(buffer.read_signed_smart().unwrap(), -16384);
        assert_eq!(buffer.read_signed_smart().unwrap(), 16383);
    }

    #[test]
    fn truncated_smart() {
        let data = [0x81u8];
        let mut buffer = Buffer::new(&data);

        assert_eq!(
            buffer.read_smart(),
            Err(Error::OutOfData {
                position: 0,
                needed: 2,
                available: 1
            })
        );
    }

    proptest! {
        #[test]
        fn smart_round_trips(value in 0i32..=32767) {
            let encoded = encode_smart(value);
            prop_assert_eq!(encoded.len(), if value < 128 { 1 } else { 2 });

            let mut buffer = Buffer::new(&encoded);
            prop_assert_eq!(buffer.read_smart().unwrap(), value);
            prop_assert!(buffer.is_empty());
        }

        #[test]
        fn signed_smart_round_trips(value in -16384i32..=16383) {
            let encoded = encode_signed_smart(value);

            let mut buffer = Buffer::new(&encoded);
            prop_assert_eq!(buffer.read_signed_smart().unwrap(), value);
            prop_assert!(buffer.is_empty());
        }
    }
}
