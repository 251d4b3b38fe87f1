//! Data elements and their value representation families.
//!
//! Every element owns a [`ByteBuffer`] with its value bytes.
//! How those bytes are interpreted depends on the family of its VR:
//!
//! - [`StringElement`]: single valued text (LO, LT, SH, ST, UT),
//!   and [`PersonName`] on top of it (PN);
//! - [`MultiStringElement`]: backslash separated text (AE, AS, CS),
//!   extended by [`DecimalString`] (DS), [`IntegerString`] (IS),
//!   [`UniqueIdentifier`] (UI) and [`DateElement`] (DA, DT, TM);
//! - [`ValueElement`]: packed binary numbers
//!   (FD, FL, OB, OF, OW, SL, SS, UL, UN, US);
//! - [`AttributeTag`]: packed tag pairs (AT).
//!
//! Sequences (SQ) are not elements, see [`Sequence`](crate::Sequence).

mod date;
mod numeric;
mod string;

pub use self::date::DateElement;
pub use self::numeric::{AttributeTag, NumericValue, ValueElement};
pub use self::string::{
    DecimalString, IntegerString, MultiStringElement, PersonName, StringElement, UniqueIdentifier,
};

use crate::value::{ValueObject, ValueType};
use crate::{BufferSnafu, Result, SequenceFactorySnafu, UnhandledVrSnafu};
use dcm_core::header::Header;
use dcm_core::{Tag, VR};
use dcm_encoding::buffer::{local_endianness, ByteBuffer};
use dcm_encoding::text::SpecificCharacterSet;
use dcm_encoding::write::element_header_length;
use dcm_encoding::{Endianness, TransferSyntax};
use snafu::ResultExt;

/// The parts common to all elements: header, stream position and value bytes.
#[derive(Debug, Clone)]
pub struct RawElement {
    tag: Tag,
    vr: VR,
    position: u64,
    buffer: ByteBuffer,
}

impl RawElement {
    pub(crate) fn new(tag: Tag, vr: VR, position: u64, buffer: ByteBuffer) -> Self {
        RawElement {
            tag,
            vr,
            position,
            buffer,
        }
    }

    /// The element tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The value representation.
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Position of the element in its source stream, 0 if created in memory.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Byte length of the value.
    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    /// The value bytes.
    pub fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    /// Mutable access to the value bytes.
    pub fn buffer_mut(&mut self) -> &mut ByteBuffer {
        &mut self.buffer
    }

    /// The byte order of the value bytes.
    pub fn endian(&self) -> Endianness {
        self.buffer.endian()
    }

    /// The value as text, without trailing padding.
    pub(crate) fn string(&self) -> Result<String> {
        self.buffer.string().context(BufferSnafu { tag: self.tag })
    }

    /// Replace the value with text, padded to an even length.
    pub(crate) fn set_string(&mut self, value: &str) -> Result<()> {
        let padding = self.vr.padding();
        self.buffer
            .set_string(value, padding)
            .context(BufferSnafu { tag: self.tag })
    }

    /// The number of bytes swapped together when changing byte order.
    ///
    /// Attribute tags are swapped per 16-bit field.
    fn swap_unit(&self) -> usize {
        match self.vr {
            VR::AT => 2,
            vr => vr.unit_size() as usize,
        }
    }
}

/// Common interface of all element families.
pub trait ElementFamily {
    /// The shared element state.
    fn raw(&self) -> &RawElement;

    /// Mutable access to the shared element state.
    fn raw_mut(&mut self) -> &mut RawElement;

    /// Value multiplicity.
    fn vm(&self) -> Result<usize>;

    /// The canonical string form of the whole value.
    fn value_string(&self) -> Result<String>;

    /// Replace the value from its string form.
    fn set_value_string(&mut self, value: &str) -> Result<()>;

    /// The type of the values of this family.
    fn value_type(&self) -> ValueType;

    /// The first value, if any.
    fn value_object(&self) -> Result<Option<ValueObject>>;

    /// All values.
    fn value_object_array(&self) -> Result<Vec<ValueObject>>;

    /// Replace the value.
    /// The value must be of the type declared by the family.
    fn set_value_object(&mut self, value: &ValueObject) -> Result<()>;

    /// Replace all values.
    /// The values must be of the type declared by the family.
    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()>;

    /// The element tag.
    fn tag(&self) -> Tag {
        self.raw().tag()
    }

    /// The value representation.
    fn vr(&self) -> VR {
        self.raw().vr()
    }

    /// Byte length of the value.
    fn length(&self) -> usize {
        self.raw().length()
    }
}

/// A data element of any value representation except SQ.
#[derive(Debug, Clone)]
pub enum Element {
    AE(MultiStringElement),
    AS(MultiStringElement),
    AT(AttributeTag),
    CS(MultiStringElement),
    DA(DateElement),
    DS(DecimalString),
    DT(DateElement),
    FD(ValueElement<f64>),
    FL(ValueElement<f32>),
    IS(IntegerString),
    LO(StringElement),
    LT(StringElement),
    OB(ValueElement<u8>),
    OF(ValueElement<f32>),
    OW(ValueElement<u16>),
    PN(PersonName),
    SH(StringElement),
    SL(ValueElement<i32>),
    SS(ValueElement<i16>),
    ST(StringElement),
    TM(DateElement),
    UI(UniqueIdentifier),
    UL(ValueElement<u32>),
    UN(ValueElement<u8>),
    US(ValueElement<u16>),
    UT(StringElement),
}

macro_rules! dispatch {
    ($element: expr, $e: ident => $body: expr) => {
        match $element {
            Element::AE($e) | Element::AS($e) | Element::CS($e) => $body,
            Element::LO($e) | Element::LT($e) | Element::SH($e) | Element::ST($e) | Element::UT($e) => {
                $body
            }
            Element::DA($e) | Element::DT($e) | Element::TM($e) => $body,
            Element::OB($e) | Element::UN($e) => $body,
            Element::OW($e) | Element::US($e) => $body,
            Element::FL($e) | Element::OF($e) => $body,
            Element::AT($e) => $body,
            Element::DS($e) => $body,
            Element::FD($e) => $body,
            Element::IS($e) => $body,
            Element::PN($e) => $body,
            Element::SL($e) => $body,
            Element::SS($e) => $body,
            Element::UI($e) => $body,
            Element::UL($e) => $body,
        }
    };
}

impl Element {
    /// Create an empty element in memory, in the byte order of this machine.
    pub fn new(tag: Tag, vr: VR) -> Result<Self> {
        Element::create(tag, vr, 0, ByteBuffer::new(local_endianness()))
    }

    /// Create an element of the family of the given VR over existing bytes.
    ///
    /// The buffer keeps its byte order.
    /// Fails for SQ, which must be built as a [`Sequence`](crate::Sequence),
    /// and for the `NONE` sentinel.
    pub fn create(tag: Tag, vr: VR, position: u64, buffer: ByteBuffer) -> Result<Self> {
        let raw = RawElement::new(tag, vr, position, buffer);
        Ok(match vr {
            VR::AE => Element::AE(MultiStringElement::new(raw)),
            VR::AS => Element::AS(MultiStringElement::new(raw)),
            VR::AT => Element::AT(AttributeTag::new(raw)),
            VR::CS => Element::CS(MultiStringElement::new(raw)),
            VR::DA => Element::DA(DateElement::new(raw)),
            VR::DS => Element::DS(DecimalString::new(raw)),
            VR::DT => Element::DT(DateElement::new(raw)),
            VR::FD => Element::FD(ValueElement::new(raw)),
            VR::FL => Element::FL(ValueElement::new(raw)),
            VR::IS => Element::IS(IntegerString::new(raw)),
            VR::LO => Element::LO(StringElement::new(raw)),
            VR::LT => Element::LT(StringElement::new(raw)),
            VR::OB => Element::OB(ValueElement::new(raw)),
            VR::OF => Element::OF(ValueElement::new(raw)),
            VR::OW => Element::OW(ValueElement::new(raw)),
            VR::PN => Element::PN(PersonName::new(raw)),
            VR::SH => Element::SH(StringElement::new(raw)),
            VR::SL => Element::SL(ValueElement::new(raw)),
            VR::SS => Element::SS(ValueElement::new(raw)),
            VR::ST => Element::ST(StringElement::new(raw)),
            VR::TM => Element::TM(DateElement::new(raw)),
            VR::UI => Element::UI(UniqueIdentifier::new(raw)),
            VR::UL => Element::UL(ValueElement::new(raw)),
            VR::UN => Element::UN(ValueElement::new(raw)),
            VR::US => Element::US(ValueElement::new(raw)),
            VR::UT => Element::UT(StringElement::new(raw)),
            VR::SQ => return SequenceFactorySnafu { tag }.fail(),
            VR::NONE => return UnhandledVrSnafu { vr }.fail(),
        })
    }

    /// The element tag.
    pub fn tag(&self) -> Tag {
        self.raw().tag()
    }

    /// The value representation.
    pub fn vr(&self) -> VR {
        self.raw().vr()
    }

    /// Byte length of the value.
    pub fn length(&self) -> usize {
        self.raw().length()
    }

    /// Position of the element in its source stream.
    pub fn position(&self) -> u64 {
        self.raw().position()
    }

    /// The byte order of the value bytes.
    pub fn endian(&self) -> Endianness {
        self.raw().endian()
    }

    /// The value bytes.
    pub fn buffer(&self) -> &ByteBuffer {
        self.raw().buffer()
    }

    /// Rewrite the value bytes in the given byte order.
    ///
    /// Deferred bytes are loaded first.
    pub fn convert_to(&mut self, endian: Endianness) -> Result<()> {
        let raw = self.raw_mut();
        let unit = raw.swap_unit();
        let tag = raw.tag;
        if raw.buffer.endian() != endian {
            tracing::debug!("Converting element {} to {:?} endian", tag, endian);
        }
        raw.buffer
            .convert_to(endian, unit)
            .context(BufferSnafu { tag })
    }

    /// The number of bytes this element takes when written in `syntax`.
    pub fn write_length(&self, syntax: &TransferSyntax) -> u32 {
        element_header_length(self.vr(), syntax) + self.length() as u32
    }

    /// Load deferred value bytes into memory.
    pub fn preload(&mut self) -> Result<()> {
        let raw = self.raw_mut();
        let tag = raw.tag;
        if raw.buffer.is_deferred() {
            tracing::debug!("Loading deferred value of element {}", tag);
        }
        raw.buffer.materialize().context(BufferSnafu { tag })
    }

    /// Release value bytes which can be loaded again.
    pub fn unload(&mut self) {
        self.raw_mut().buffer.release();
    }

    /// Re-encode non-empty text in another character set.
    pub(crate) fn change_charset(&mut self, charset: SpecificCharacterSet) -> Result<()> {
        let raw = self.raw_mut();
        if !raw.vr.is_encoded_string() {
            return Ok(());
        }
        if raw.length() == 0 {
            raw.buffer.set_charset(charset);
            return Ok(());
        }
        let value = raw
            .buffer
            .string()
            .context(BufferSnafu { tag: raw.tag })?;
        raw.buffer.set_charset(charset);
        raw.set_string(&value)
    }

    /// Set the character set used to read and write text,
    /// without changing the bytes.
    pub(crate) fn set_charset(&mut self, charset: SpecificCharacterSet) {
        self.raw_mut().buffer.set_charset(charset);
    }

    /// The backslash separated text layer of multi-valued string families.
    pub(crate) fn multi_string(&self) -> Option<&MultiStringElement> {
        match self {
            Element::AE(e) | Element::AS(e) | Element::CS(e) => Some(e),
            Element::DA(e) | Element::DT(e) | Element::TM(e) => Some(e.inner()),
            Element::DS(e) => Some(e.inner()),
            Element::IS(e) => Some(e.inner()),
            Element::UI(e) => Some(e.inner()),
            _ => None,
        }
    }

    pub(crate) fn multi_string_mut(&mut self) -> Option<&mut MultiStringElement> {
        match self {
            Element::AE(e) | Element::AS(e) | Element::CS(e) => Some(e),
            Element::DA(e) | Element::DT(e) | Element::TM(e) => Some(e.inner_mut()),
            Element::DS(e) => Some(e.inner_mut()),
            Element::IS(e) => Some(e.inner_mut()),
            Element::UI(e) => Some(e.inner_mut()),
            _ => None,
        }
    }

    /// The text layer of single valued string families.
    pub(crate) fn single_string(&self) -> Option<&StringElement> {
        match self {
            Element::LO(e) | Element::LT(e) | Element::SH(e) | Element::ST(e) | Element::UT(e) => {
                Some(e)
            }
            Element::PN(e) => Some(e.inner()),
            _ => None,
        }
    }

    pub(crate) fn single_string_mut(&mut self) -> Option<&mut StringElement> {
        match self {
            Element::LO(e) | Element::LT(e) | Element::SH(e) | Element::ST(e) | Element::UT(e) => {
                Some(e)
            }
            Element::PN(e) => Some(e.inner_mut()),
            _ => None,
        }
    }

    /// Name of the family the element belongs to.
    pub fn family(&self) -> &'static str {
        match self {
            Element::AE(_) | Element::AS(_) | Element::CS(_) => "multi-valued string",
            Element::LO(_) | Element::LT(_) | Element::SH(_) | Element::ST(_) | Element::UT(_) => {
                "string"
            }
            Element::PN(_) => "person name",
            Element::DA(_) | Element::DT(_) | Element::TM(_) => "date",
            Element::DS(_) => "decimal string",
            Element::IS(_) => "integer string",
            Element::UI(_) => "unique identifier",
            Element::AT(_) => "attribute tag",
            _ => "binary value",
        }
    }
}

impl ElementFamily for Element {
    fn raw(&self) -> &RawElement {
        dispatch!(self, e => e.raw())
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        dispatch!(self, e => e.raw_mut())
    }

    fn vm(&self) -> Result<usize> {
        dispatch!(self, e => e.vm())
    }

    fn value_string(&self) -> Result<String> {
        dispatch!(self, e => e.value_string())
    }

    fn set_value_string(&mut self, value: &str) -> Result<()> {
        dispatch!(self, e => e.set_value_string(value))
    }

    fn value_type(&self) -> ValueType {
        dispatch!(self, e => e.value_type())
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        dispatch!(self, e => e.value_object())
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        dispatch!(self, e => e.value_object_array())
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        dispatch!(self, e => e.set_value_object(value))
    }

    fn set_value_object_array(&mut self, values: &[ValueObject]) -> Result<()> {
        dispatch!(self, e => e.set_value_object_array(values))
    }
}

impl Header for Element {
    fn tag(&self) -> Tag {
        self.raw().tag()
    }

    fn vr(&self) -> VR {
        self.raw().vr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn factory_picks_the_vr_family() {
        for vr in VR::ALL.iter().copied().filter(|vr| *vr != VR::SQ) {
            let element = Element::new(Tag(0x0009, 0x1000), vr).unwrap();
            assert_eq!(element.vr(), vr);
            assert_eq!(element.length(), 0);
            assert_eq!(element.position(), 0);
        }
    }

    #[test]
    fn factory_refuses_sequences_and_none() {
        assert!(matches!(
            Element::new(Tag(0x0008, 0x1140), VR::SQ),
            Err(Error::SequenceFactory { .. })
        ));
        assert!(matches!(
            Element::new(Tag(0x0008, 0x1140), VR::NONE),
            Err(Error::UnhandledVr { .. })
        ));
    }

    #[test]
    fn write_length_follows_header_layout() {
        let explicit = dcm_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
        let implicit = dcm_transfer_syntax_registry::entries::IMPLICIT_VR_LITTLE_ENDIAN;

        let mut cs = Element::new(Tag(0x0008, 0x0060), VR::CS).unwrap();
        cs.set_value_string("MR").unwrap();
        assert_eq!(cs.write_length(&explicit), 4 + 2 + 2 + 2);
        assert_eq!(cs.write_length(&implicit), 4 + 4 + 2);

        let mut ob = Element::new(Tag(0x0009, 0x1001), VR::OB).unwrap();
        ob.set_value_string("01\\02").unwrap();
        assert_eq!(ob.write_length(&explicit), 4 + 2 + 6 + 2);
        assert_eq!(ob.write_length(&implicit), 4 + 4 + 2);
    }

    #[test]
    fn attribute_tags_swap_per_field() {
        let mut at = Element::create(
            Tag(0x0028, 0x0009),
            VR::AT,
            0,
            ByteBuffer::new(Endianness::Little),
        )
        .unwrap();
        at.set_value_object(&ValueObject::Tag(Tag(0x0018, 0x1063)))
            .unwrap();
        assert_eq!(at.buffer().bytes().unwrap(), &[0x18, 0x00, 0x63, 0x10]);

        at.convert_to(Endianness::Big).unwrap();
        assert_eq!(at.buffer().bytes().unwrap(), &[0x00, 0x18, 0x10, 0x63]);
        assert_eq!(
            at.value_object().unwrap(),
            Some(ValueObject::Tag(Tag(0x0018, 0x1063)))
        );
    }

    #[test]
    fn charset_change_reencodes_text() {
        let mut pn = Element::new(Tag(0x0010, 0x0010), VR::PN).unwrap();
        pn.set_charset(SpecificCharacterSet::IsoIr100);
        pn.set_value_string("Müller").unwrap();
        assert_eq!(pn.length(), 6);

        pn.change_charset(SpecificCharacterSet::IsoIr192).unwrap();
        // ü takes two bytes in UTF-8, then padded to even length
        assert_eq!(pn.length(), 8);
        assert_eq!(pn.value_string().unwrap(), "Müller");
    }
}
