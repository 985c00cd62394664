//! Error types for the course codec.
//!
//! This module defines the error hierarchy for every failure case in the
//! crate: reading past the end of a buffer, undecodable containers,
//! level decode failures, over-full slot arrays, unreadable screenshots and
//! bad configuration.
//!
//! Unknown enumeration codes are deliberately absent: they are carried as
//! [`Name::Unknown`](crate::enums::Name::Unknown) values instead of errors.

use thiserror::Error;

use crate::format::ContainerFormat;

/// The main error type for course codec operations.
///
/// # Example
///
/// ```
/// use course_codec::error::{CourseError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(CourseError::ConfigError {
///         reason: "course key must be 16 bytes".to_string(),
///     })
/// }
///
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum CourseError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A cursor read would have gone past the end of its buffer.
    ///
    /// This indicates either corrupt input or a format-constant mismatch.
    /// The cursor position is left unchanged.
    #[error(
        "Buffer underrun at offset {offset}: needed {needed} bytes, but only {available} available"
    )]
    BufferUnderrun {
        /// Cursor position at which the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer at that position.
        available: usize,
    },

    /// The encryption or compression layer of a container could not be undone.
    ///
    /// Fatal for a single file; batch drivers skip the file and continue.
    #[error("Container decode failed ({format}): {reason}")]
    ContainerDecodeError {
        /// The container shape that was being opened or sealed.
        format: ContainerFormat,
        /// A description of the failure.
        reason: String,
    },

    /// A plaintext course buffer could not be decoded into a level.
    ///
    /// There is no partial recovery: a truncated field desynchronizes every
    /// field after it.
    #[error("Level decode failed in {section}: {source}")]
    LevelDecodeError {
        /// The part of the layout being read (`header`, `overworld`, `subworld`).
        section: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<CourseError>,
    },

    /// An entry list would exceed its category's fixed slot capacity.
    #[error("Too many {category}: capacity is {capacity}, attempted {attempted}")]
    CapacityExceeded {
        /// The record category (e.g. `objects`).
        category: &'static str,
        /// The fixed slot capacity of the category.
        capacity: usize,
        /// The number of entries that was attempted.
        attempted: usize,
    },

    /// A screenshot could not be decoded or an image could not be written.
    #[error("Image error: {reason}")]
    ImageError {
        /// A description of the failure.
        reason: String,
    },

    /// The configuration is malformed.
    #[error("Invalid configuration: {reason}")]
    ConfigError {
        /// A description of what is wrong.
        reason: String,
    },
}

impl CourseError {
    /// Creates a `BufferUnderrun` error.
    #[must_use]
    pub fn buffer_underrun(offset: usize, needed: usize, available: usize) -> Self {
        CourseError::BufferUnderrun {
            offset,
            needed,
            available,
        }
    }

    /// Creates a `ContainerDecodeError` for the given container shape.
    ///
    /// # Example
    ///
    /// ```
    /// use course_codec::error::CourseError;
    /// use course_codec::format::ContainerFormat;
    ///
    /// let err = CourseError::container(ContainerFormat::Zcd, "corrupt deflate stream");
    /// assert!(err.to_string().contains("corrupt deflate stream"));
    /// ```
    #[must_use]
    pub fn container(format: ContainerFormat, reason: impl Into<String>) -> Self {
        CourseError::ContainerDecodeError {
            format,
            reason: reason.into(),
        }
    }

    /// Wraps an error as a `LevelDecodeError` for the named section.
    #[must_use]
    pub fn in_section(self, section: &'static str) -> Self {
        CourseError::LevelDecodeError {
            section,
            source: Box::new(self),
        }
    }

    /// Returns whether this error was caused by reading past the end of a buffer.
    #[must_use]
    pub fn is_underrun(&self) -> bool {
        match self {
            CourseError::BufferUnderrun { .. } => true,
            CourseError::LevelDecodeError { source, .. } => source.is_underrun(),
            _ => false,
        }
    }
}

impl From<image::ImageError> for CourseError {
    fn from(err: image::ImageError) -> Self {
        CourseError::ImageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CourseError {
    fn from(err: serde_json::Error) -> Self {
        CourseError::ConfigError {
            reason: err.to_string(),
        }
    }
}

/// A specialized Result type for course codec operations.
pub type Result<T> = std::result::Result<T, CourseError>;
