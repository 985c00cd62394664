//! Sequential little-endian reading and writing for course buffers.
//!
//! Course data has no length prefixes and no random access: every field's
//! offset is the sum of the widths of all fields before it. [`ByteCursor`]
//! captures that by owning the read position, and [`ByteWriter`] is its exact
//! inverse for re-encoding.
//!
//! All reads are bounds checked. A read that would run past the end of the
//! buffer fails with [`CourseError::BufferUnderrun`] and leaves the position
//! untouched; nothing is ever zero-filled.
//!
//! # Example
//!
//! ```
//! use course_codec::binary::{ByteCursor, ByteWriter};
//!
//! let mut writer = ByteWriter::with_capacity(8);
//! writer.write_u16(0x1234);
//! writer.write_i16(-2);
//! writer.write_u32(100_646);
//! let bytes = writer.into_inner();
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! assert_eq!(cursor.read_u16().unwrap(), 0x1234);
//! assert_eq!(cursor.read_i16().unwrap(), -2);
//! assert_eq!(cursor.read_u32().unwrap(), 100_646);
//! assert!(cursor.read_u8().is_err());
//! ```

use crate::error::{CourseError, Result};

/// A read position over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Returns the current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Reads `len` bytes and advances past them.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CourseError::buffer_underrun(
                self.position,
                len,
                self.remaining(),
            ));
        }

        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Reads exactly `N` bytes into an array.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Advances `len` bytes without interpreting them.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Reads a `u8`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads an `i8`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` at the end of the buffer.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i16`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 2 bytes remain.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i32`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 4 bytes remain.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 8 bytes remain.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Reads a fixed-width UTF-16LE string field of `len` bytes.
    ///
    /// Trailing NUL code units are stripped. Unpaired surrogates become
    /// U+FFFD rather than failing the decode. An odd trailing byte is
    /// consumed but ignored.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than `len` bytes remain.
    ///
    /// # Example
    ///
    /// ```
    /// use course_codec::binary::ByteCursor;
    ///
    /// let data = [b'H', 0, b'i', 0, 0, 0, 0, 0];
    /// let mut cursor = ByteCursor::new(&data);
    /// assert_eq!(cursor.read_fixed_utf16(8).unwrap(), "Hi");
    /// assert_eq!(cursor.position(), 8);
    /// ```
    pub fn read_fixed_utf16(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;

        let mut units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        while units.last() == Some(&0) {
            units.pop();
        }

        Ok(String::from_utf16_lossy(&units))
    }
}

/// An append-only little-endian writer, the inverse of [`ByteCursor`].
///
/// Create it with the exact size of the output so the buffer is allocated
/// once and never grows.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    /// Creates a writer whose buffer can hold `capacity` bytes without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consumes the writer and returns the written bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Appends `len` zero bytes.
    pub fn zeros(&mut self, len: usize) {
        self.buffer.resize(self.buffer.len() + len, 0);
    }

    /// Appends a `u8`.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Appends an `i8`.
    pub fn write_i8(&mut self, value: i8) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `i16`.
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `i32`.
    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `i64`.
    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Appends `value` as a fixed-width UTF-16LE field of exactly `len` bytes.
    ///
    /// Text that does not fit is cut before the first character that would
    /// overflow, so a surrogate pair is never split; the rest of the field is
    /// NUL padded.
    pub fn write_fixed_utf16(&mut self, value: &str, len: usize) {
        let start = self.buffer.len();
        let mut units = [0u16; 2];
        for ch in value.chars() {
            let encoded = ch.encode_utf16(&mut units);
            if self.buffer.len() - start + encoded.len() * 2 > len {
                break;
            }
            for unit in encoded.iter() {
                self.buffer.extend_from_slice(&unit.to_le_bytes());
            }
        }
        let written = self.buffer.len() - start;
        self.zeros(len - written);
    }
}
