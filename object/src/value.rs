//! Loosely typed element values.
//!
//! [`ValueObject`] carries a single value of any element family,
//! so that values can be moved between elements without knowing their VR
//! at compile time. Elements only accept the exact [`ValueType`] they declare.

use dcm_core::chrono::NaiveDateTime;
use dcm_core::{DateRange, Tag, Uid};
use std::fmt;

/// The semantic type of the values held by an element family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Text (string VRs)
    Str,
    /// A point in time (DA, DT, TM)
    DateTime,
    /// A range of dates or times
    DateRange,
    /// An attribute tag (AT)
    Tag,
    /// A unique identifier with its description
    Uid,
    /// OB, UN
    U8,
    /// US, OW
    U16,
    /// SS
    I16,
    /// UL
    U32,
    /// SL
    I32,
    /// FL, OF
    F32,
    /// FD
    F64,
}

/// A single value of any element family.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueObject {
    Str(String),
    DateTime(NaiveDateTime),
    DateRange(DateRange),
    Tag(Tag),
    Uid(Uid),
    U8(u8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl ValueObject {
    /// The type of the value held.
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueObject::Str(_) => ValueType::Str,
            ValueObject::DateTime(_) => ValueType::DateTime,
            ValueObject::DateRange(_) => ValueType::DateRange,
            ValueObject::Tag(_) => ValueType::Tag,
            ValueObject::Uid(_) => ValueType::Uid,
            ValueObject::U8(_) => ValueType::U8,
            ValueObject::U16(_) => ValueType::U16,
            ValueObject::I16(_) => ValueType::I16,
            ValueObject::U32(_) => ValueType::U32,
            ValueObject::I32(_) => ValueType::I32,
            ValueObject::F32(_) => ValueType::F32,
            ValueObject::F64(_) => ValueType::F64,
        }
    }
}

impl fmt::Display for ValueObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueObject::Str(v) => f.write_str(v),
            ValueObject::DateTime(v) => write!(f, "{}", v),
            ValueObject::DateRange(v) => write!(f, "{:?}", v),
            ValueObject::Tag(v) => write!(f, "{}", v),
            ValueObject::Uid(v) => write!(f, "{}", v),
            ValueObject::U8(v) => write!(f, "{}", v),
            ValueObject::U16(v) => write!(f, "{}", v),
            ValueObject::I16(v) => write!(f, "{}", v),
            ValueObject::U32(v) => write!(f, "{}", v),
            ValueObject::I32(v) => write!(f, "{}", v),
            ValueObject::F32(v) => write!(f, "{}", v),
            ValueObject::F64(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_value {
    ($t: ty, $variant: ident) => {
        impl From<$t> for ValueObject {
            fn from(value: $t) -> Self {
                ValueObject::$variant(value)
            }
        }
    };
}

impl_from_value!(String, Str);
impl_from_value!(NaiveDateTime, DateTime);
impl_from_value!(DateRange, DateRange);
impl_from_value!(Tag, Tag);
impl_from_value!(Uid, Uid);
impl_from_value!(u8, U8);
impl_from_value!(u16, U16);
impl_from_value!(i16, I16);
impl_from_value!(u32, U32);
impl_from_value!(i32, I32);
impl_from_value!(f32, F32);
impl_from_value!(f64, F64);

impl From<&str> for ValueObject {
    fn from(value: &str) -> Self {
        ValueObject::Str(value.to_string())
    }
}
