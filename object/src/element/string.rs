//! Text element families.

use super::{ElementFamily, RawElement};
use crate::value::{ValueObject, ValueType};
use crate::{
    InvalidValueTypeSnafu, ParseNumberSnafu, Result, ValueIndexOutOfRangeSnafu,
};
use dcm_core::{Uid, UidDictionary};
use dcm_dictionary_std::StandardUidDictionary;
use dcm_encoding::TransferSyntax;
use itertools::Itertools;
use once_cell::unsync::OnceCell;
use snafu::{ensure, OptionExt};
use std::fmt::Display;
use std::str::FromStr;

/// Fail with [`Error::InvalidValueType`](crate::Error::InvalidValueType)
/// for a value not accepted by an element.
pub(crate) fn invalid_value<T>(raw: &RawElement, value: &ValueObject) -> Result<T> {
    InvalidValueTypeSnafu {
        vr: raw.vr(),
        found: value.value_type(),
    }
    .fail()
}

/// Collect the text of string value objects.
fn string_values<'a>(raw: &RawElement, values: &'a [ValueObject]) -> Result<Vec<&'a str>> {
    values
        .iter()
        .map(|v| match v {
            ValueObject::Str(s) => Ok(s.as_str()),
            v => invalid_value(raw, v),
        })
        .collect()
}

/// An element with a single text value: LO, LT, SH, ST and UT.
///
/// Backslashes are not separators in these VRs,
/// so the value multiplicity is always 1.
#[derive(Debug, Clone)]
pub struct StringElement {
    raw: RawElement,
}

impl StringElement {
    pub(crate) fn new(raw: RawElement) -> Self {
        StringElement { raw }
    }

    /// The text value.
    pub fn value(&self) -> Result<String> {
        self.raw.string()
    }

    /// Replace the text value.
    pub fn set_value(&mut self, value: &str) -> Result<()> {
        self.raw.set_string(value)
    }
}

impl ElementFamily for StringElement {
    fn raw(&self) -> &RawElement {
        &self.raw
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        &mut self.raw
    }

    fn vm(&self) -> Result<usize> {
        Ok(1)
    }

    fn value_string(&self) -> Result<String> {
        self.value()
    }

    fn set_value_string(&mut self, value: &str) -> Result<()> {
        self.set_value(value)
    }

    fn value_type(&self) -> ValueType {
        ValueType::Str
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        self.value().map(|v| Some(ValueObject::Str(v)))
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        Ok(vec![ValueObject::Str(self.value()?)])
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        match value {
            ValueObject::Str(s) => self.set_value(s),
            v => invalid_value(&self.raw, v),
        }
    }

    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
        let values = string_values(&self.raw, values)?;
        self.set_value(&values.iter().join("\\"))
    }
}

/// An element with backslash separated text values: AE, AS and CS,
/// and the base of the numeric, date and UID string families.
#[derive(Debug, Clone)]
pub struct MultiStringElement {
    raw: RawElement,
    vm: OnceCell<usize>,
}

impl MultiStringElement {
    pub(crate) fn new(raw: RawElement) -> Self {
        MultiStringElement {
            raw,
            vm: OnceCell::new(),
        }
    }

    /// All text values.
    ///
    /// An empty element yields a single empty value.
    pub fn values(&self) -> Result<Vec<String>> {
        Ok(self
            .raw
            .string()?
            .split('\\')
            .map(str::to_string)
            .collect())
    }

    /// The text value at `index`.
    pub fn value_at(&self, index: usize) -> Result<String> {
        let mut values = self.values()?;
        let vm = values.len();
        ensure!(index < vm, ValueIndexOutOfRangeSnafu { index, vm });
        Ok(values.swap_remove(index))
    }

    /// Replace the value with a single text value.
    pub fn set_value(&mut self, value: &str) -> Result<()> {
        self.vm.take();
        self.raw.set_string(value)
    }

    /// Replace the value with several text values.
    pub fn set_values<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.set_value(&values.into_iter().join("\\"))
    }
}

impl ElementFamily for MultiStringElement {
    fn raw(&self) -> &RawElement {
        &self.raw
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        // the bytes may change under the cached multiplicity
        self.vm.take();
        &mut self.raw
    }

    fn vm(&self) -> Result<usize> {
        if let Some(vm) = self.vm.get() {
            return Ok(*vm);
        }
        let vm = if self.raw.length() == 0 {
            0
        } else {
            self.values()?.len()
        };
        Ok(*self.vm.get_or_init(|| vm))
    }

    fn value_string(&self) -> Result<String> {
        self.raw.string()
    }

    fn set_value_string(&mut self, value: &str) -> Result<()> {
        self.set_value(value)
    }

    fn value_type(&self) -> ValueType {
        ValueType::Str
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        self.value_at(0).map(|v| Some(ValueObject::Str(v)))
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        Ok(self.values()?.into_iter().map(ValueObject::Str).collect())
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        match value {
            ValueObject::Str(s) => self.set_value(s),
            v => invalid_value(&self.raw, v),
        }
    }

    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
        let values = string_values(&self.raw, values)?;
        self.set_values(values)
    }
}

/// Implement [`ElementFamily`] for a wrapper by forwarding to its inner family,
/// optionally overriding how value objects are accepted.
macro_rules! forward_family {
    ($t: ty) => {
        forward_family!($t, |this, value| this.0.set_value_object(value));
    };
    ($t: ty, |$this: ident, $value: ident| $set: expr) => {
        impl ElementFamily for $t {
            fn raw(&self) -> &RawElement {
                self.0.raw()
            }

            fn raw_mut(&mut self) -> &mut RawElement {
                self.0.raw_mut()
            }

            fn vm(&self) -> Result<usize> {
                self.0.vm()
            }

            fn value_string(&self) -> Result<String> {
                self.0.value_string()
            }

            fn set_value_string(&mut self, value: &str) -> Result<()> {
                self.0.set_value_string(value)
            }

            fn value_type(&self) -> ValueType {
                self.0.value_type()
            }

            fn value_object(&self) -> Result<Option<ValueObject>> {
                self.0.value_object()
            }

            fn value_object_array(&self) -> Result<Vec<ValueObject>> {
                self.0.value_object_array()
            }

            fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
                let $this = self;
                let $value = value;
                $set
            }

            fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
                self.0.set_value_object_array(values)
            }
        }
    };
}

/// A person name (PN), made of `^` separated components.
#[derive(Debug, Clone)]
pub struct PersonName(StringElement);

impl PersonName {
    pub(crate) fn new(raw: RawElement) -> Self {
        PersonName(StringElement::new(raw))
    }

    pub(crate) fn inner(&self) -> &StringElement {
        &self.0
    }

    pub(crate) fn inner_mut(&mut self) -> &mut StringElement {
        &mut self.0
    }

    /// The whole name.
    pub fn value(&self) -> Result<String> {
        self.0.value()
    }

    /// Replace the whole name.
    pub fn set_value(&mut self, value: &str) -> Result<()> {
        self.0.set_value(value)
    }

    /// The component at `index`, empty if the name has fewer components.
    fn component(&self, index: usize) -> Result<String> {
        Ok(self
            .0
            .value()?
            .split('^')
            .nth(index)
            .unwrap_or_default()
            .to_string())
    }

    pub fn family_name(&self) -> Result<String> {
        self.component(0)
    }

    pub fn given_name(&self) -> Result<String> {
        self.component(1)
    }

    pub fn middle_name(&self) -> Result<String> {
        self.component(2)
    }

    pub fn name_prefix(&self) -> Result<String> {
        self.component(3)
    }

    pub fn name_suffix(&self) -> Result<String> {
        self.component(4)
    }
}

forward_family!(PersonName);

fn parse_number<T: FromStr>(value: &str) -> Result<T> {
    value.trim().parse().ok().context(ParseNumberSnafu { value })
}

/// Round to the given number of decimal digits, if any.
fn round_to(value: f64, digits: Option<u32>) -> f64 {
    match digits {
        Some(digits) => {
            let scale = 10f64.powi(digits as i32);
            (value * scale).round() / scale
        }
        None => value,
    }
}

/// A decimal string (DS).
///
/// Values which do not parse as a decimal number are an error.
#[derive(Debug, Clone)]
pub struct DecimalString(MultiStringElement);

impl DecimalString {
    pub(crate) fn new(raw: RawElement) -> Self {
        DecimalString(MultiStringElement::new(raw))
    }

    pub(crate) fn inner(&self) -> &MultiStringElement {
        &self.0
    }

    pub(crate) fn inner_mut(&mut self) -> &mut MultiStringElement {
        &mut self.0
    }

    /// The value at `index` as a double precision number.
    pub fn double(&self, index: usize) -> Result<f64> {
        parse_number(&self.0.value_at(index)?)
    }

    /// All values as double precision numbers.
    pub fn doubles(&self) -> Result<Vec<f64>> {
        self.strings()?.iter().map(|v| parse_number(v)).collect()
    }

    /// The value at `index` as a single precision number.
    pub fn float(&self, index: usize) -> Result<f32> {
        parse_number(&self.0.value_at(index)?)
    }

    /// All values as single precision numbers.
    pub fn floats(&self) -> Result<Vec<f32>> {
        self.strings()?.iter().map(|v| parse_number(v)).collect()
    }

    /// Replace the value with a number,
    /// optionally rounded to a number of decimal digits.
    pub fn set_double(&mut self, value: f64, round: Option<u32>) -> Result<()> {
        self.0.set_value(&round_to(value, round).to_string())
    }

    /// Replace the value with several numbers,
    /// optionally rounded to a number of decimal digits.
    pub fn set_doubles(&mut self, values: &[f64], round: Option<u32>) -> Result<()> {
        self.0
            .set_values(values.iter().map(|v| round_to(*v, round)))
    }

    /// Replace the value with a single precision number.
    pub fn set_float(&mut self, value: f32, round: Option<u32>) -> Result<()> {
        match round {
            None => self.0.set_value(&value.to_string()),
            Some(_) => self.0.set_value(&(round_to(f64::from(value), round) as f32).to_string()),
        }
    }

    /// Replace the value with several single precision numbers.
    pub fn set_floats(&mut self, values: &[f32], round: Option<u32>) -> Result<()> {
        match round {
            None => self.0.set_values(values),
            Some(_) => self
                .0
                .set_values(values.iter().map(|v| round_to(f64::from(*v), round) as f32)),
        }
    }

    /// The values of a non-empty element as text.
    fn strings(&self) -> Result<Vec<String>> {
        if self.0.raw().length() == 0 {
            return Ok(Vec::new());
        }
        self.0.values()
    }
}

forward_family!(DecimalString, |this, value| match value {
    ValueObject::F64(v) => this.set_double(*v, None),
    ValueObject::F32(v) => this.set_float(*v, None),
    v => this.0.set_value_object(v),
});

/// An integer string (IS).
#[derive(Debug, Clone)]
pub struct IntegerString(MultiStringElement);

impl IntegerString {
    pub(crate) fn new(raw: RawElement) -> Self {
        IntegerString(MultiStringElement::new(raw))
    }

    pub(crate) fn inner(&self) -> &MultiStringElement {
        &self.0
    }

    pub(crate) fn inner_mut(&mut self) -> &mut MultiStringElement {
        &mut self.0
    }

    /// The value at `index` as an integer.
    pub fn int(&self, index: usize) -> Result<i32> {
        parse_number(&self.0.value_at(index)?)
    }

    /// All values as integers.
    pub fn ints(&self) -> Result<Vec<i32>> {
        if self.0.raw().length() == 0 {
            return Ok(Vec::new());
        }
        self.0.values()?.iter().map(|v| parse_number(v)).collect()
    }

    /// Replace the value with an integer.
    pub fn set_int(&mut self, value: i32) -> Result<()> {
        self.0.set_value(&value.to_string())
    }

    /// Replace the value with several integers.
    pub fn set_ints(&mut self, values: &[i32]) -> Result<()> {
        self.0.set_values(values)
    }
}

forward_family!(IntegerString, |this, value| match value {
    ValueObject::I32(v) => this.set_int(*v),
    v => this.0.set_value_object(v),
});

/// A unique identifier (UI).
#[derive(Debug, Clone)]
pub struct UniqueIdentifier(MultiStringElement);

impl UniqueIdentifier {
    pub(crate) fn new(raw: RawElement) -> Self {
        UniqueIdentifier(MultiStringElement::new(raw))
    }

    pub(crate) fn inner(&self) -> &MultiStringElement {
        &self.0
    }

    pub(crate) fn inner_mut(&mut self) -> &mut MultiStringElement {
        &mut self.0
    }

    /// The identifier text at `index`.
    pub fn value_at(&self, index: usize) -> Result<String> {
        self.0.value_at(index)
    }

    /// The first identifier, described from the standard registry when known.
    pub fn uid(&self) -> Result<Uid> {
        Ok(StandardUidDictionary.lookup(&self.0.value_at(0)?))
    }

    /// The first identifier as a transfer syntax.
    pub fn transfer_syntax(&self) -> Result<TransferSyntax> {
        Ok(dcm_transfer_syntax_registry::lookup(&self.0.value_at(0)?))
    }

    /// Replace the value with an identifier.
    pub fn set_uid(&mut self, uid: &Uid) -> Result<()> {
        self.0.set_value(uid.uid())
    }

    /// Replace the value with the identifier of a transfer syntax.
    pub fn set_transfer_syntax(&mut self, syntax: &TransferSyntax) -> Result<()> {
        self.0.set_value(syntax.uid())
    }
}

forward_family!(UniqueIdentifier, |this, value| match value {
    ValueObject::Uid(uid) => this.set_uid(uid),
    v => this.0.set_value_object(v),
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use dcm_core::{Tag, VR};
    use dcm_encoding::buffer::ByteBuffer;
    use dcm_encoding::Endianness;

    fn raw(vr: VR, text: &str) -> RawElement {
        let buffer = ByteBuffer::new(Endianness::Little);
        let mut raw = RawElement::new(Tag(0x0009, 0x1010), vr, 0, buffer);
        raw.set_string(text).unwrap();
        raw
    }

    #[test]
    fn single_strings_keep_backslashes() {
        let e = StringElement::new(raw(VR::LO, "a\\b"));
        assert_eq!(e.vm().unwrap(), 1);
        assert_eq!(e.value().unwrap(), "a\\b");
    }

    #[test]
    fn multiplicity_follows_separators() {
        let mut e = MultiStringElement::new(raw(VR::CS, ""));
        assert_eq!(e.vm().unwrap(), 0);

        e.set_values(&["ORIGINAL", "PRIMARY", "AXIAL"]).unwrap();
        assert_eq!(e.vm().unwrap(), 3);
        assert_eq!(e.value_at(2).unwrap(), "AXIAL");
        assert!(matches!(
            e.value_at(3),
            Err(Error::ValueIndexOutOfRange { index: 3, vm: 3, .. })
        ));

        e.set_value("DERIVED").unwrap();
        assert_eq!(e.vm().unwrap(), 1);
    }

    #[test]
    fn person_name_components() {
        let pn = PersonName::new(raw(VR::PN, "Doe^John^M^Dr"));
        assert_eq!(pn.family_name().unwrap(), "Doe");
        assert_eq!(pn.given_name().unwrap(), "John");
        assert_eq!(pn.middle_name().unwrap(), "M");
        assert_eq!(pn.name_prefix().unwrap(), "Dr");
        assert_eq!(pn.name_suffix().unwrap(), "");
    }

    #[test]
    fn decimal_strings() {
        let mut ds = DecimalString::new(raw(VR::DS, "1.5\\-2\\3e2"));
        assert_eq!(ds.doubles().unwrap(), vec![1.5, -2., 300.]);
        assert_eq!(ds.float(1).unwrap(), -2.);

        ds.set_double(3.14159, Some(2)).unwrap();
        assert_eq!(ds.value_string().unwrap(), "3.14");

        ds.set_value_string("abc").unwrap();
        assert!(matches!(ds.double(0), Err(Error::ParseNumber { .. })));
    }

    #[test]
    fn integer_strings() {
        let mut is = IntegerString::new(raw(VR::IS, " 12\\-4 "));
        assert_eq!(is.ints().unwrap(), vec![12, -4]);
        is.set_value_object(&ValueObject::I32(7)).unwrap();
        assert_eq!(is.int(0).unwrap(), 7);
        assert!(matches!(
            is.set_value_object(&ValueObject::F64(7.)),
            Err(Error::InvalidValueType { .. })
        ));
    }

    #[test]
    fn unique_identifiers_resolve_names() {
        let ui = UniqueIdentifier::new(raw(VR::UI, "1.2.840.10008.1.2.1"));
        let uid = ui.uid().unwrap();
        assert_eq!(uid.name(), "Explicit VR Little Endian");
        assert!(ui.transfer_syntax().unwrap().is_explicit_vr());

        // UI values are padded with NUL
        assert_eq!(ui.raw().length(), 20);
        assert_eq!(ui.raw().buffer().bytes().unwrap()[19], 0);
    }
}
