use core::any::Any;
use core::fmt;

use alloc::string::ToString;
use alloc::vec::Vec;
use zerocopy::byteorder::{BE, I16, I32, I64, U16, U32, U64};
use zerocopy::IntoBytes;

use crate::error::WriterError;
use crate::value::Value;

pub type Result<T> = core::result::Result<T, WriterError>;

/// Largest payload a short (1-byte) length prefix can describe.
pub const MAX_SHORT_LEN: usize = u8::MAX as usize;

/// Largest payload a 4-byte length prefix can describe.
pub const MAX_LEN: usize = i32::MAX as usize;

/// The 4-byte length that marks an absent value.
pub const ABSENT_LEN: i32 = -1;

/// Appends big-endian binary values to a growable buffer.
///
/// Values are written back to back with no padding and no type information. A [`BinaryReader`]
/// must read them back with the matching `read_*` calls, in the same order.
///
/// [`BinaryReader`]: crate::BinaryReader
#[derive(Clone, Default, Debug)]
pub struct BinaryWriter {
    out: Vec<u8>,
}

impl BinaryWriter {
    /// Creates a new, empty `BinaryWriter`.
    pub fn new() -> Self {
        Self { out: Vec::new() }
    }

    /// Creates a new `BinaryWriter` with room for `len` bytes before it reallocates.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            out: Vec::with_capacity(len),
        }
    }

    /// The bytes written so far. Does not reset the writer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Extracts the output buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Writes `bytes` to the output verbatim, with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) {
        self.write_bytes(&value)
    }

    /// Appends everything `other` has written so far.
    pub fn write_writer(&mut self, other: &BinaryWriter) {
        self.write_bytes(other.as_bytes())
    }

    /// Writes a byte sequence with a 4-byte signed length prefix.
    ///
    /// `None` is written as the length `-1` with no payload. `Some(&[])` is written as the
    /// length `0`, so the two can be told apart when read back.
    pub fn write_prefixed_bytes(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        let Some(bytes) = bytes else {
            self.write_absent();
            return Ok(());
        };
        let len = i32::try_from(bytes.len()).map_err(|_| overflow(bytes.len(), MAX_LEN))?;
        self.write_i32(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a byte sequence of at most 255 bytes with a 1-byte length prefix.
    ///
    /// `None` and `Some(&[])` are both written as the single byte `0`, and both read back as
    /// `None`. Longer payloads fail with [`WriterError::LengthOverflow`] and write nothing.
    pub fn write_short_prefixed_bytes(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        let Some(bytes) = bytes else {
            self.write_u8(0);
            return Ok(());
        };
        let len = u8::try_from(bytes.len()).map_err(|_| overflow(bytes.len(), MAX_SHORT_LEN))?;
        self.write_u8(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a UTF-8 string with a 4-byte length prefix.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_prefixed_bytes(Some(s.as_bytes()))
    }

    /// Writes a UTF-8 string of at most 255 bytes with a 1-byte length prefix.
    pub fn write_short_str(&mut self, s: &str) -> Result<()> {
        self.write_short_prefixed_bytes(Some(s.as_bytes()))
    }

    /// Writes an optional error message. `None` means "no error".
    pub fn write_error_message(&mut self, message: Option<&str>) -> Result<()> {
        self.write_prefixed_bytes(message.map(str::as_bytes))
    }

    /// Writes the message of an optional error, as formatted by its `Display` impl.
    pub fn write_error(&mut self, err: Option<&dyn fmt::Display>) -> Result<()> {
        let Some(err) = err else {
            return self.write_error_message(None);
        };
        self.write_error_message(Some(&err.to_string()))
    }

    /// Writes a standalone `-1` as a 4-byte integer, meaning "no value follows".
    pub fn write_absent(&mut self) {
        self.write_i32(ABSENT_LEN)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) {
        self.write_cbytes([value])
    }

    /// Writes a single byte. Same as `write_u8`.
    pub fn write_byte(&mut self, value: u8) {
        self.write_u8(value)
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) {
        self.write_cbytes([value as u8])
    }

    /// Writes a single `u16` value in big-endian byte order
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(U16::<BE>::new(value).as_bytes())
    }

    /// Writes a single `u32` value in big-endian byte order
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(U32::<BE>::new(value).as_bytes())
    }

    /// Writes a single `u64` value in big-endian byte order
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(U64::<BE>::new(value).as_bytes())
    }

    /// Writes a single `i16` value in big-endian byte order
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(I16::<BE>::new(value).as_bytes())
    }

    /// Writes a single `i32` value in big-endian byte order
    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(I32::<BE>::new(value).as_bytes())
    }

    /// Writes a single `i64` value in big-endian byte order
    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(I64::<BE>::new(value).as_bytes())
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8)
    }

    /// Writes a runtime-typed value, using the encoding of its kind. No type tag is written.
    pub fn write_value(&mut self, value: Value<'_>) -> Result<()> {
        match value {
            Value::Bool(v) => self.write_bool(v),
            Value::U8(v) => self.write_u8(v),
            Value::U16(v) => self.write_u16(v),
            Value::U32(v) => self.write_u32(v),
            Value::U64(v) => self.write_u64(v),
            Value::I8(v) => self.write_i8(v),
            Value::I16(v) => self.write_i16(v),
            Value::I32(v) => self.write_i32(v),
            Value::I64(v) => self.write_i64(v),
            Value::String(s) => self.write_str(s)?,
        }
        Ok(())
    }

    /// Writes a value whose concrete type is not known to the caller.
    ///
    /// Fails with [`WriterError::UnsupportedKind`] for types with no wire encoding, such as
    /// `f64` or a struct. Nothing is written in that case.
    pub fn write_any<T: Any>(&mut self, value: &T) -> Result<()> {
        let value = Value::from_any(value).inspect_err(|e| {
            tracing::debug!(type_name = e.name(), "rejected value with no wire encoding");
        })?;
        self.write_value(value)
    }

    /// Writes a list of heterogeneous values in order.
    ///
    /// If any value fails, the output is rolled back to where it was before the call.
    pub fn write_values(&mut self, values: &[Value<'_>]) -> Result<()> {
        tracing::trace!(fields = values.len(), "encoding value list");
        let start = self.out.len();
        for &value in values {
            if let Err(e) = self.write_value(value) {
                self.out.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }
}

fn overflow(len: usize, max: usize) -> WriterError {
    tracing::debug!(len, max, "payload too long for its length prefix");
    WriterError::LengthOverflow { len, max }
}

#[cfg(feature = "std")]
impl std::io::Write for BinaryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.write_bytes(buf);
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
