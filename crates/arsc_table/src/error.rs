//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[cfg(feature = "serde")]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// A read needed more bytes than the buffer holds
    #[error("truncated input at offset {offset:#x}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Absolute offset of the read
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer at that offset
        available: usize,
    },

    /// A slice was requested outside of the buffer
    #[error("range {offset:#x}+{length} is outside of a {len} byte buffer")]
    OutOfBounds {
        /// Absolute offset of the requested range
        offset: usize,
        /// Length of the requested range
        length: usize,
        /// Length of the buffer
        len: usize,
    },

    /// A structural invariant of the resource table does not hold
    #[error("malformed resource table at offset {offset:#x}: {reason}")]
    MalformedTable {
        /// Absolute offset of the offending chunk
        offset: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A string pool lookup went past the end of the pool
    #[error("index {index} is out of range for a pool of {count} strings")]
    IndexOutOfRange {
        /// Requested index
        index: u32,
        /// Number of strings in the pool
        count: usize,
    },

    /// A resource value points past the end of the global string pool
    #[error("value {index} cannot be resolved against a pool of {count} strings")]
    UnresolvedValue {
        /// Data word of the value
        index: u32,
        /// Number of strings in the global pool
        count: usize,
    },
}

impl Error {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Error::MalformedTable {
            offset,
            reason: reason.into(),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
