use core::any::{Any, TypeId};

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use zerocopy::byteorder::{BE, I16, I32, I64, U16, U32, U64};
use zerocopy::FromBytes;

use crate::error::{FormatError, ReaderError, UnsupportedKind, WireError};
use crate::value::{Kind, Value};
use crate::writer::ABSENT_LEN;

pub type Result<T> = core::result::Result<T, ReaderError>;

/// Reads values from a slice of bytes, in the order a [`BinaryWriter`] wrote them.
///
/// Fixed-width integers are big-endian. Byte sequences and strings carry either a 4-byte signed
/// length prefix, where `-1` marks an absent value, or a 1-byte length prefix, where `0` marks
/// both an absent and an empty value. The input has no type information, so the caller must
/// call the `read_*` methods that mirror the `write_*` calls that produced it.
///
/// The reader only moves forward. Each successful `read_*` call advances the read position by
/// exactly the number of bytes it decoded. A call that fails does not move it.
///
/// Byte sequences and strings are returned as slices of the input; nothing is copied.
///
/// A reader is single-pass: it cannot be cloned, so there is no way to look ahead or go back.
///
/// ```compile_fail
/// let r = be_binary_io::BinaryReader::new(&[0, 7]);
/// let saved: be_binary_io::BinaryReader = r.clone();
/// ```
///
/// [`BinaryWriter`]: crate::BinaryWriter
#[derive(Debug)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    /// Constructor
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True if every byte of the input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining_len() == 0
    }

    /// Reads a single byte.
    #[inline(always)]
    pub fn read_byte(&mut self) -> Result<u8> {
        let [b] = self.read_cbytes()?;
        Ok(b)
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining_len();
        if remaining < len {
            return Err(ReaderError::OutOfRange {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.read_be::<[u8; N]>()
    }

    /// Decodes a fixed-size value directly from the next `size_of::<T>()` bytes.
    #[inline(always)]
    fn read_be<T: FromBytes>(&mut self) -> Result<T> {
        let needed = core::mem::size_of::<T>();
        let remaining = self.remaining_len();
        match T::read_from_prefix(&self.data[self.pos..]) {
            Ok((value, _)) => {
                self.pos += needed;
                Ok(value)
            }
            Err(_) => Err(ReaderError::OutOfRange { needed, remaining }),
        }
    }

    /// Runs `f`, restoring the read position if it fails.
    fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.pos;
        let result = f(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_byte()? as i8)
    }

    /// Reads a `u16` in big-endian byte order.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_be::<U16<BE>>()?.get())
    }

    /// Reads a `u32` in big-endian byte order.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_be::<U32<BE>>()?.get())
    }

    /// Reads a `u64` in big-endian byte order.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.read_be::<U64<BE>>()?.get())
    }

    /// Reads a `i16` in big-endian byte order.
    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_be::<I16<BE>>()?.get())
    }

    /// Reads a `i32` in big-endian byte order.
    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_be::<I32<BE>>()?.get())
    }

    /// Reads a `i64` in big-endian byte order.
    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_be::<I64<BE>>()?.get())
    }

    /// Reads a `bool`. Only the byte `1` decodes as `true`; every other byte value decodes as
    /// `false` without being rejected.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_byte()? == 1)
    }

    /// Reads a byte sequence with a 4-byte signed length prefix.
    ///
    /// Returns `None` if the prefix is the absence marker `-1`, and `Some(&[])` if it is `0`. Any
    /// other negative length is rejected with [`FormatError::NegativeLength`].
    pub fn read_prefixed_bytes(&mut self) -> Result<Option<&'a [u8]>> {
        self.atomically(|r| {
            let len = r.read_i32()?;
            if len == ABSENT_LEN {
                return Ok(None);
            }
            let Ok(len) = usize::try_from(len) else {
                tracing::debug!(len, position = r.pos, "negative length prefix");
                return Err(FormatError::NegativeLength(len).into());
            };
            r.read_bytes(len).map(Some)
        })
    }

    /// Reads a byte sequence with a 1-byte length prefix.
    ///
    /// Returns `None` if the length is `0`. The encoding does not distinguish an empty sequence
    /// from an absent one, so an empty sequence is never returned.
    pub fn read_short_prefixed_bytes(&mut self) -> Result<Option<&'a [u8]>> {
        self.atomically(|r| match r.read_u8()? {
            0 => Ok(None),
            len => r.read_bytes(len as usize).map(Some),
        })
    }

    /// Reads a UTF-8 string with a 4-byte length prefix and returns it as `Option<&str>`.
    ///
    /// Returns `None` if the string was written as absent. Fails with
    /// [`FormatError::InvalidUtf8`] if the contents are not well-formed UTF-8.
    pub fn read_opt_str(&mut self) -> Result<Option<&'a str>> {
        self.atomically(|r| r.read_prefixed_bytes()?.map(utf8).transpose())
    }

    /// Reads a UTF-8 string with a 4-byte length prefix and returns it as `&str`.
    ///
    /// An absent string reads as `""`. Use [`read_opt_str`](Self::read_opt_str) to tell the two
    /// apart.
    pub fn read_str(&mut self) -> Result<&'a str> {
        Ok(self.read_opt_str()?.unwrap_or(""))
    }

    /// Reads a UTF-8 string with a 1-byte length prefix and returns it as `&str`.
    ///
    /// Absent and empty strings both read as `""`.
    pub fn read_short_str(&mut self) -> Result<&'a str> {
        self.atomically(|r| {
            let s = r.read_short_prefixed_bytes()?.map(utf8).transpose()?;
            Ok(s.unwrap_or(""))
        })
    }

    /// Reads a UTF-8 string with a 4-byte length prefix and returns it as `Cow<str>`.
    ///
    /// Byte sequences that are not valid UTF-8 are replaced with the Unicode replacement
    /// character. An absent string reads as `""`.
    pub fn read_str_lossy(&mut self) -> Result<Cow<'a, str>> {
        Ok(match self.read_prefixed_bytes()? {
            Some(bytes) => String::from_utf8_lossy(bytes),
            None => Cow::Borrowed(""),
        })
    }

    /// Reads a byte string with a 4-byte length prefix, as a `bstr::BStr`.
    ///
    /// The contents are not validated as UTF-8.
    #[cfg(feature = "bstr")]
    pub fn read_bstr(&mut self) -> Result<Option<&'a bstr::BStr>> {
        Ok(self.read_prefixed_bytes()?.map(bstr::BStr::new))
    }

    /// Reads a byte string with a 1-byte length prefix, as a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn read_short_bstr(&mut self) -> Result<Option<&'a bstr::BStr>> {
        Ok(self.read_short_prefixed_bytes()?.map(bstr::BStr::new))
    }

    /// Reads an optional error. Returns `None` for "no error", otherwise an error carrying the
    /// decoded message.
    ///
    /// Messages that are not well-formed UTF-8 are decoded lossily rather than rejected.
    pub fn read_error(&mut self) -> Result<Option<WireError>> {
        Ok(self
            .read_prefixed_bytes()?
            .map(|bytes| WireError::new(String::from_utf8_lossy(bytes))))
    }

    /// Reads a value of the given kind. The kind is supplied by the caller; it is not read from
    /// the input.
    pub fn read_value(&mut self, kind: Kind) -> Result<Value<'a>> {
        Ok(match kind {
            Kind::Bool => Value::Bool(self.read_bool()?),
            Kind::U8 => Value::U8(self.read_u8()?),
            Kind::U16 => Value::U16(self.read_u16()?),
            Kind::U32 => Value::U32(self.read_u32()?),
            Kind::U64 => Value::U64(self.read_u64()?),
            Kind::I8 => Value::I8(self.read_i8()?),
            Kind::I16 => Value::I16(self.read_i16()?),
            Kind::I32 => Value::I32(self.read_i32()?),
            Kind::I64 => Value::I64(self.read_i64()?),
            Kind::String => Value::String(self.read_str()?),
        })
    }

    /// Reads a value of type `T`, choosing the decoding from `T`'s runtime type.
    ///
    /// Fails with [`ReaderError::UnsupportedKind`] for types with no wire encoding, without
    /// consuming any input. Strings must be requested as `String`; `&str` is rejected up front
    /// because a typed read cannot hand out a borrowed string.
    pub fn read_any<T: Any>(&mut self) -> Result<T> {
        if TypeId::of::<T>() == TypeId::of::<&'static str>() {
            return Err(UnsupportedKind::of::<T>().into());
        }
        let kind = Kind::of::<T>()?;
        self.atomically(|r| {
            r.read_value(kind)?
                .downcast::<T>()
                .ok_or_else(|| UnsupportedKind::of::<T>().into())
        })
    }

    /// Reads one value for each kind in `kinds`, in order.
    ///
    /// If any value fails to decode, the read position is restored to where it was before the
    /// call.
    pub fn read_values(&mut self, kinds: &[Kind]) -> Result<Vec<Value<'a>>> {
        tracing::trace!(fields = kinds.len(), position = self.pos, "decoding value list");
        self.atomically(|r| kinds.iter().map(|&kind| r.read_value(kind)).collect())
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    core::str::from_utf8(bytes).map_err(|_| {
        tracing::debug!(len = bytes.len(), "string payload is not valid UTF-8");
        FormatError::InvalidUtf8.into()
    })
}
