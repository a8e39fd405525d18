//! Runtime-typed values, for encoding and decoding lists of fields whose types are only known at
//! run time.
//!
//! The wire format never carries a type tag. A reader must be driven with the same sequence of
//! [`Kind`]s that describes the values the writer produced.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;
use core::str::FromStr;

use crate::error::UnsupportedKind;

/// The kinds of value that have a wire encoding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    /// One byte, 1 for true.
    Bool,
    /// One byte.
    U8,
    /// Two bytes, big-endian.
    U16,
    /// Four bytes, big-endian.
    U32,
    /// Eight bytes, big-endian.
    U64,
    /// One byte, two's complement.
    I8,
    /// Two bytes, big-endian two's complement.
    I16,
    /// Four bytes, big-endian two's complement.
    I32,
    /// Eight bytes, big-endian two's complement.
    I64,
    /// UTF-8 text with a 4-byte length prefix.
    String,
}

macro_rules! kind_of_type {
    ($id:expr; $($ty:ty => $kind:ident),* $(,)?) => {
        $(
            if $id == TypeId::of::<$ty>() {
                return Ok(Kind::$kind);
            }
        )*
    };
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 10] = [
        Kind::Bool,
        Kind::U8,
        Kind::U16,
        Kind::U32,
        Kind::U64,
        Kind::I8,
        Kind::I16,
        Kind::I32,
        Kind::I64,
        Kind::String,
    ];

    /// Finds the kind that encodes values of the Rust type `T`.
    ///
    /// Both `String` and `&'static str` map to [`Kind::String`], but `&str` is write-only:
    /// `BinaryReader::read_any` rejects it because it can only return owned values.
    ///
    /// `usize` and `isize` are rejected. Their width depends on the platform, and encoding them
    /// as 32 bits would silently truncate values on 64-bit targets.
    pub fn of<T: ?Sized + 'static>() -> Result<Kind, UnsupportedKind> {
        let id = TypeId::of::<T>();
        kind_of_type! { id;
            bool => Bool,
            u8 => U8,
            u16 => U16,
            u32 => U32,
            u64 => U64,
            i8 => I8,
            i16 => I16,
            i32 => I32,
            i64 => I64,
            String => String,
            &'static str => String,
        }
        Err(UnsupportedKind::of::<T>())
    }

    /// The encoded size of values of this kind, or `None` for length-prefixed kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Kind::Bool | Kind::U8 | Kind::I8 => Some(1),
            Kind::U16 | Kind::I16 => Some(2),
            Kind::U32 | Kind::I32 => Some(4),
            Kind::U64 | Kind::I64 => Some(8),
            Kind::String => None,
        }
    }

    /// The canonical schema name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::U8 => "uint8",
            Kind::U16 => "uint16",
            Kind::U32 => "uint32",
            Kind::U64 => "uint64",
            Kind::I8 => "int8",
            Kind::I16 => "int16",
            Kind::I32 => "int32",
            Kind::I64 => "int64",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a schema kind name. Accepts the canonical names (`"uint16"`), the Rust primitive names
/// (`"u16"`), `"byte"` for `uint8` and `"str"` for `string`.
impl FromStr for Kind {
    type Err = UnsupportedKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Kind::Bool,
            "uint8" | "u8" | "byte" => Kind::U8,
            "uint16" | "u16" => Kind::U16,
            "uint32" | "u32" => Kind::U32,
            "uint64" | "u64" => Kind::U64,
            "int8" | "i8" => Kind::I8,
            "int16" | "i16" => Kind::I16,
            "int32" | "i32" => Kind::I32,
            "int64" | "i64" => Kind::I64,
            "string" | "str" => Kind::String,
            _ => return Err(UnsupportedKind::named(s)),
        })
    }
}

/// A single value of one of the supported kinds. Strings are borrowed, so values read by
/// `BinaryReader` point into the reader's input.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[allow(missing_docs)]
pub enum Value<'a> {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    String(&'a str),
}

impl<'a> Value<'a> {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::String(_) => Kind::String,
        }
    }

    /// Converts a value whose concrete type is not known to the caller.
    ///
    /// Fails for any type that [`Kind::of`] rejects. References are not followed: pass the
    /// referenced value itself.
    pub fn from_any<T: Any>(value: &'a T) -> Result<Value<'a>, UnsupportedKind> {
        let any = value as &'a dyn Any;

        macro_rules! try_downcast {
            ($($ty:ty => $variant:ident),* $(,)?) => {
                $(
                    if let Some(v) = any.downcast_ref::<$ty>() {
                        return Ok(Value::$variant(*v));
                    }
                )*
            };
        }

        try_downcast! {
            bool => Bool,
            u8 => U8,
            u16 => U16,
            u32 => U32,
            u64 => U64,
            i8 => I8,
            i16 => I16,
            i32 => I32,
            i64 => I64,
            &'static str => String,
        }
        if let Some(s) = any.downcast_ref::<String>() {
            return Ok(Value::String(s.as_str()));
        }

        Err(UnsupportedKind::of::<T>())
    }

    /// Converts this value into `T`, if `T` is the type this value's kind decodes to. Strings
    /// convert to an owned `String`.
    pub fn downcast<T: Any>(self) -> Option<T> {
        let boxed: Box<dyn Any> = match self {
            Value::Bool(v) => Box::new(v),
            Value::U8(v) => Box::new(v),
            Value::U16(v) => Box::new(v),
            Value::U32(v) => Box::new(v),
            Value::U64(v) => Box::new(v),
            Value::I8(v) => Box::new(v),
            Value::I16(v) => Box::new(v),
            Value::I32(v) => Box::new(v),
            Value::I64(v) => Box::new(v),
            Value::String(s) => Box::new(String::from(s)),
        };
        boxed.downcast::<T>().ok().map(|v| *v)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}
