//! DICOM encoding primitives for the in-memory data model.
//!
//! This crate provides the storage side of element values:
//!
//! - [`buffer`]: the endian-aware [`ByteBuffer`], with deferred storage,
//!   byte swapping, typed values and text access.
//! - [`text`]: specific character sets and text codecs.
//! - [`transfer_syntax`]: the transfer syntax descriptor
//!   and the [`TransferSyntaxIndex`] trait.
//! - [`write`]: write options and header length arithmetic.
//!
//! [`ByteBuffer`]: ./buffer/struct.ByteBuffer.html
//! [`TransferSyntaxIndex`]: ./transfer_syntax/trait.TransferSyntaxIndex.html
pub mod buffer;
pub mod text;
pub mod transfer_syntax;
pub mod write;

pub use crate::buffer::{ByteBuffer, ElementValue};
pub use crate::text::{SpecificCharacterSet, TextCodec};
pub use crate::transfer_syntax::{Endianness, TransferSyntax, TransferSyntaxIndex};
pub use crate::write::WriteOptions;

// re-export crates that are part of the public API
pub use byteordered;
