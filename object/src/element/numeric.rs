//! Binary element families.

use super::string::invalid_value;
use super::{ElementFamily, RawElement};
use crate::value::{ValueObject, ValueType};
use crate::{BufferSnafu, Result, ValueIndexOutOfRangeSnafu};
use dcm_core::{Tag, VR};
use dcm_encoding::ElementValue;
use itertools::Itertools;
use num_traits::Num;
use snafu::{OptionExt, ResultExt};
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

/// A number type stored packed in a binary element.
pub trait NumericValue: ElementValue + Num + fmt::Display + Into<ValueObject> {
    /// The loosely typed counterpart.
    const VALUE_TYPE: ValueType;

    /// Extract a number of this exact type.
    fn from_object(value: &ValueObject) -> Option<Self>;

    /// Format a number, as fixed width uppercase hexadecimal if `hex` is set.
    fn format(self, hex: bool) -> String;

    /// Parse a number, as hexadecimal if `hex` is set.
    fn parse(token: &str, hex: bool) -> Option<Self> {
        let radix = if hex { 16 } else { 10 };
        Self::from_str_radix(token.trim(), radix).ok()
    }
}

macro_rules! impl_numeric_int {
    ($t: ty, $variant: ident) => {
        impl NumericValue for $t {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn from_object(value: &ValueObject) -> Option<Self> {
                match value {
                    ValueObject::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn format(self, hex: bool) -> String {
                if hex {
                    format!("{:01$X}", self, Self::SIZE * 2)
                } else {
                    self.to_string()
                }
            }
        }
    };
}

macro_rules! impl_numeric_float {
    ($t: ty, $variant: ident) => {
        impl NumericValue for $t {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn from_object(value: &ValueObject) -> Option<Self> {
                match value {
                    ValueObject::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn format(self, _hex: bool) -> String {
                self.to_string()
            }

            fn parse(token: &str, _hex: bool) -> Option<Self> {
                token.trim().parse().ok()
            }
        }
    };
}

impl_numeric_int!(u8, U8);
impl_numeric_int!(u16, U16);
impl_numeric_int!(i16, I16);
impl_numeric_int!(u32, U32);
impl_numeric_int!(i32, I32);
impl_numeric_float!(f32, F32);
impl_numeric_float!(f64, F64);

/// Whether the string form of a VR is hexadecimal.
fn is_hex(vr: VR) -> bool {
    matches!(vr, VR::OB | VR::OW | VR::UN)
}

/// An element of packed binary numbers:
/// FD, FL, OB, OF, OW, SL, SS, UL, UN and US.
///
/// Numbers are decoded in the byte order of the buffer.
#[derive(Debug, Clone)]
pub struct ValueElement<T> {
    raw: RawElement,
    phantom: PhantomData<T>,
}

impl<T: NumericValue> ValueElement<T> {
    pub(crate) fn new(raw: RawElement) -> Self {
        ValueElement {
            raw,
            phantom: PhantomData,
        }
    }

    /// The first number.
    pub fn value(&self) -> Result<T> {
        self.value_at(0)
    }

    /// The number at `index`.
    pub fn value_at(&self, index: usize) -> Result<T> {
        let tag = self.raw.tag();
        self.raw
            .buffer()
            .value_at::<T>(index)
            .context(BufferSnafu { tag })?
            .context(ValueIndexOutOfRangeSnafu {
                index,
                vm: self.raw.length() / T::SIZE,
            })
    }

    /// All numbers.
    pub fn values(&self) -> Result<Vec<T>> {
        let tag = self.raw.tag();
        self.raw
            .buffer()
            .values::<T>()
            .context(BufferSnafu { tag })
    }

    /// Replace the value with a single number.
    pub fn set_value(&mut self, value: T) -> Result<()> {
        self.set_values(&[value])
    }

    /// Replace the value with several numbers,
    /// in the byte order of the buffer.
    ///
    /// An odd number of bytes is padded with a trailing zero.
    pub fn set_values(&mut self, values: &[T]) -> Result<()> {
        let tag = self.raw.tag();
        let padding = self.raw.vr().padding();
        let buffer = self.raw.buffer_mut();
        buffer.set_values(values).context(BufferSnafu { tag })?;
        buffer.pad_even(padding).context(BufferSnafu { tag })
    }
}

impl<T: NumericValue> ElementFamily for ValueElement<T> {
    fn raw(&self) -> &RawElement {
        &self.raw
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        &mut self.raw
    }

    fn vm(&self) -> Result<usize> {
        Ok(self.raw.length() / T::SIZE)
    }

    fn value_string(&self) -> Result<String> {
        let hex = is_hex(self.raw.vr());
        Ok(self.values()?.into_iter().map(|v| v.format(hex)).join("\\"))
    }

    /// Parse backslash separated numbers.
    ///
    /// Tokens which do not parse are stored as zero.
    fn set_value_string(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.set_values(&[]);
        }
        let hex = is_hex(self.raw.vr());
        let values: Vec<T> = value
            .split('\\')
            .map(|token| {
                T::parse(token, hex).unwrap_or_else(|| {
                    warn!(
                        "Unparsable {} value `{}` in element {}, using default",
                        self.raw.vr(),
                        token,
                        self.raw.tag()
                    );
                    T::default()
                })
            })
            .collect();
        self.set_values(&values)
    }

    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        if self.vm()? == 0 {
            return Ok(None);
        }
        Ok(Some(self.value()?.into()))
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        Ok(self.values()?.into_iter().map(Into::into).collect())
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        match T::from_object(value) {
            Some(v) => self.set_value(v),
            None => invalid_value(&self.raw, value),
        }
    }

    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
        let values = values
            .iter()
            .map(|v| T::from_object(v).map_or_else(|| invalid_value(&self.raw, v), Ok))
            .collect::<Result<Vec<T>>>()?;
        self.set_values(&values)
    }
}

/// An attribute tag element (AT), stored as pairs of 16-bit numbers.
#[derive(Debug, Clone)]
pub struct AttributeTag {
    raw: RawElement,
}

impl AttributeTag {
    pub(crate) fn new(raw: RawElement) -> Self {
        AttributeTag { raw }
    }

    /// The tag at `index`.
    pub fn value_at(&self, index: usize) -> Result<Tag> {
        let values = self.values()?;
        let vm = values.len();
        values
            .get(index)
            .copied()
            .context(ValueIndexOutOfRangeSnafu { index, vm })
    }

    /// All tags.
    pub fn values(&self) -> Result<Vec<Tag>> {
        let tag = self.raw.tag();
        let fields = self
            .raw
            .buffer()
            .values::<u16>()
            .context(BufferSnafu { tag })?;
        Ok(fields
            .chunks_exact(2)
            .map(|pair| Tag(pair[0], pair[1]))
            .collect())
    }

    /// Replace the value with several tags.
    pub fn set_values(&mut self, values: &[Tag]) -> Result<()> {
        let tag = self.raw.tag();
        let fields: Vec<u16> = values.iter().flat_map(|t| [t.0, t.1]).collect();
        self.raw
            .buffer_mut()
            .set_values(&fields)
            .context(BufferSnafu { tag })
    }

    fn parse(&self, token: &str) -> Tag {
        let token = token.trim();
        let parsed = if token.len() == 8 && token.is_ascii() {
            u16::from_str_radix(&token[..4], 16)
                .ok()
                .zip(u16::from_str_radix(&token[4..], 16).ok())
        } else {
            None
        };
        match parsed {
            Some((group, element)) => Tag(group, element),
            None => {
                warn!(
                    "Unparsable tag `{}` in element {}, using (0000,0000)",
                    token,
                    self.raw.tag()
                );
                Tag(0, 0)
            }
        }
    }
}

impl ElementFamily for AttributeTag {
    fn raw(&self) -> &RawElement {
        &self.raw
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        &mut self.raw
    }

    fn vm(&self) -> Result<usize> {
        Ok(self.raw.length() / 4)
    }

    /// Tags written as `GGGGEEEE`, separated by backslashes.
    fn value_string(&self) -> Result<String> {
        Ok(self
            .values()?
            .into_iter()
            .map(|t| format!("{:04X}{:04X}", t.0, t.1))
            .join("\\"))
    }

    fn set_value_string(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            return self.set_values(&[]);
        }
        let tags: Vec<Tag> = value.split('\\').map(|t| self.parse(t)).collect();
        self.set_values(&tags)
    }

    fn value_type(&self) -> ValueType {
        ValueType::Tag
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        if self.vm()? == 0 {
            return Ok(None);
        }
        self.value_at(0).map(|t| Some(ValueObject::Tag(t)))
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        Ok(self.values()?.into_iter().map(ValueObject::Tag).collect())
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        match value {
            ValueObject::Tag(t) => self.set_values(&[*t]),
            v => invalid_value(&self.raw, v),
        }
    }

    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
        let tags = values
            .iter()
            .map(|v| match v {
                ValueObject::Tag(t) => Ok(*t),
                v => invalid_value(&self.raw, v),
            })
            .collect::<Result<Vec<Tag>>>()?;
        self.set_values(&tags)
    }
}
