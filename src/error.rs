//! Error types shared by `BinaryWriter` and `BinaryReader`.

use alloc::borrow::Cow;
use alloc::string::String;

/// A value, type or kind name has no wire encoding.
///
/// Only booleans, fixed-width integers of 1, 2, 4 or 8 bytes, and strings can be encoded by the
/// runtime-typed paths (`write_any`, `read_any`, `Kind::of`, `Kind::from_str`). Floating point
/// numbers, slices and aggregates are rejected with this error.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("no wire encoding is defined for `{name}`")]
pub struct UnsupportedKind {
    name: Cow<'static, str>,
}

impl UnsupportedKind {
    /// Builds the error for the Rust type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(core::any::type_name::<T>()),
        }
    }

    /// Builds the error for a kind name that did not parse.
    pub fn named(name: &str) -> Self {
        Self {
            name: Cow::Owned(String::from(name)),
        }
    }

    /// The rejected type or kind name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Error type for the fallible `write_*` functions of `BinaryWriter`.
///
/// When a write fails, nothing has been appended to the output.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum WriterError {
    /// The payload is too long for its length prefix: more than 255 bytes for a short-prefixed
    /// value, or more than `i32::MAX` bytes for a length-prefixed one.
    #[error("payload of {len} bytes exceeds the {max} byte limit of its length prefix")]
    LengthOverflow {
        /// Length of the rejected payload.
        len: usize,
        /// Largest length the prefix can carry.
        max: usize,
    },

    /// The value's runtime type has no wire encoding.
    #[error(transparent)]
    UnsupportedKind(#[from] UnsupportedKind),
}

/// The input is malformed. Retrying with more data will not help.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum FormatError {
    /// A 4-byte length prefix was negative but not the `-1` absence marker.
    #[error("invalid length prefix {0}")]
    NegativeLength(i32),

    /// A string payload was not well-formed UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Error type for `BinaryReader`.
///
/// A `read_*` call that fails leaves the read position where it was before the call.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ReaderError {
    /// The read needs more bytes than remain in the input. Usually this means the reader and the
    /// writer disagree about the sequence of values, or that the input was truncated.
    #[error("read of {needed} bytes is out of range, only {remaining} bytes remain")]
    OutOfRange {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },

    /// The input is malformed.
    #[error("malformed input: {0}")]
    Format(#[from] FormatError),

    /// The requested type has no wire encoding.
    #[error(transparent)]
    UnsupportedKind(#[from] UnsupportedKind),
}

/// An error decoded from the input by `BinaryReader::read_error`.
///
/// The wire format only carries the error's message, so that is all this holds.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{message}")]
pub struct WireError {
    message: String,
}

impl WireError {
    /// Wraps a decoded message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
