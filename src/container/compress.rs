//! DEFLATE and zlib (de)compression for course containers.
//!
//! Archived courses (ZCD) wrap the encrypted container in raw, headerless
//! DEFLATE; database-stored courses wrap the plaintext in zlib. Both are
//! written at maximum compression.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use tracing::{debug, trace};

use crate::error::{CourseError, Result};
use crate::format::ContainerFormat;

/// Compresses `data` as raw (headerless) DEFLATE at maximum level.
///
/// # Errors
///
/// Returns `CourseError::ContainerDecodeError` if the encoder fails.
///
/// # Example
///
/// ```
/// use course_codec::container::compress::{compress_raw, decompress_raw};
///
/// let packed = compress_raw(&[0u8; 4096]).unwrap();
/// assert!(packed.len() < 64);
/// assert_eq!(decompress_raw(&packed).unwrap(), vec![0u8; 4096]);
/// ```
pub fn compress_raw(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .map(|out| {
            debug!("Raw DEFLATE: {} bytes -> {} bytes", data.len(), out.len());
            out
        })
        .map_err(|e| CourseError::container(ContainerFormat::Zcd, format!("compression failed: {e}")))
}

/// Decompresses a raw (headerless) DEFLATE stream.
///
/// # Errors
///
/// Returns `CourseError::ContainerDecodeError` if the stream is corrupt.
pub fn decompress_raw(data: &[u8]) -> Result<Vec<u8>> {
    trace!("Raw DEFLATE decompression of {} bytes", data.len());

    let mut result = Vec::new();
    DeflateDecoder::new(data)
        .read_to_end(&mut result)
        .map_err(|e| {
            CourseError::container(ContainerFormat::Zcd, format!("raw DEFLATE stream invalid: {e}"))
        })?;

    debug!("Raw DEFLATE: {} bytes -> {} bytes", data.len(), result.len());
    Ok(result)
}

/// Compresses `data` as a zlib stream at maximum level.
///
/// # Errors
///
/// Returns `CourseError::ContainerDecodeError` if the encoder fails.
pub fn compress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .map_err(|e| CourseError::container(ContainerFormat::Zlib, format!("compression failed: {e}")))
}

/// Decompresses a zlib-wrapped DEFLATE stream.
///
/// # Errors
///
/// Returns `CourseError::ContainerDecodeError` if the stream is corrupt.
pub fn decompress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    trace!("Zlib decompression of {} bytes", data.len());

    let mut result = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut result).map_err(|e| {
        CourseError::container(ContainerFormat::Zlib, format!("zlib stream invalid: {e}"))
    })?;

    debug!("Zlib: {} bytes -> {} bytes", data.len(), result.len());
    Ok(result)
}
