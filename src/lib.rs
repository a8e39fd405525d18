//! Reads and writes buffers of big-endian binary values, for record and wire formats whose layout
//! is fixed by a schema rather than described by the data.
//!
//! [`BinaryWriter`] appends values to a growable buffer. [`BinaryReader`] reads them back from a
//! slice, in the same order. The encoded data carries no type tags, field names, framing or
//! version information; whatever reads the data must know what was written.
//!
//! # Encoding
//!
//! | Value                                | Encoding                                  |
//! |--------------------------------------|-------------------------------------------|
//! | `u8`, `i8`, `bool`                   | 1 byte; `bool` is 1 for true, 0 for false |
//! | `u16`, `i16`                         | 2 bytes, big-endian                       |
//! | `u32`, `i32`                         | 4 bytes, big-endian                       |
//! | `u64`, `i64`                         | 8 bytes, big-endian                       |
//! | absent byte sequence                 | `i32` -1                                  |
//! | byte sequence of length L            | `i32` L, then L bytes                     |
//! | absent or empty short byte sequence  | `u8` 0                                    |
//! | short byte sequence of length L      | `u8` L (at most 255), then L bytes        |
//! | string, short string                 | UTF-8, as a byte sequence / short one     |
//! | optional error                       | its message, as an optional byte sequence |
//!
//! A reader decodes `bool` leniently: only the byte 1 reads as true, and any other byte reads as
//! false.
//!
//! # Runtime-typed values
//!
//! [`Kind`] and [`Value`] let a list of fields be encoded and decoded when the types are only
//! known at run time, for example from a schema. The writer does not record the kinds, so the
//! reader has to be given the same list.
//!
//! ```
//! use be_binary_io::{BinaryReader, BinaryWriter, Kind, Value};
//!
//! let mut w = BinaryWriter::new();
//! w.write_values(&[Value::U16(1), Value::String("tableName"), Value::Bool(true)])?;
//! assert_eq!(w.as_bytes()[..2], [0x00, 0x01]);
//!
//! let mut r = BinaryReader::new(w.as_bytes());
//! let values = r.read_values(&[Kind::U16, Kind::String, Kind::Bool])?;
//! assert_eq!(values, [Value::U16(1), Value::String("tableName"), Value::Bool(true)]);
//! assert!(r.is_at_end());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
mod reader;
mod value;
mod writer;


pub use error::{FormatError, ReaderError, UnsupportedKind, WireError, WriterError};
pub use reader::BinaryReader;
pub use value::{Kind, Value};
pub use writer::{BinaryWriter, ABSENT_LEN, MAX_LEN, MAX_SHORT_LEN};
