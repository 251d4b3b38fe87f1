//! The members of a data set.

use crate::dump::{self, DumpOptions};
use crate::element::Element;
use crate::fragments::FragmentSequence;
use crate::sequence::Sequence;
use crate::Result;
use dcm_core::header::Header;
use dcm_core::{Tag, VR};
use dcm_encoding::{Endianness, TransferSyntax, WriteOptions};

/// A data set member: a plain element, a sequence of nested data sets,
/// or a sequence of encapsulated pixel data fragments.
#[derive(Debug, Clone)]
pub enum Item {
    Element(Element),
    Sequence(Sequence),
    Fragments(FragmentSequence),
}

impl From<Element> for Item {
    fn from(element: Element) -> Self {
        Item::Element(element)
    }
}

impl From<Sequence> for Item {
    fn from(sequence: Sequence) -> Self {
        Item::Sequence(sequence)
    }
}

impl From<FragmentSequence> for Item {
    fn from(fragments: FragmentSequence) -> Self {
        Item::Fragments(fragments)
    }
}

impl Item {
    pub fn tag(&self) -> Tag {
        match self {
            Item::Element(e) => e.tag(),
            Item::Sequence(s) => s.tag(),
            Item::Fragments(f) => f.tag(),
        }
    }

    pub fn vr(&self) -> VR {
        match self {
            Item::Element(e) => e.vr(),
            Item::Sequence(s) => s.vr(),
            Item::Fragments(f) => f.vr(),
        }
    }

    pub fn position(&self) -> u64 {
        match self {
            Item::Element(e) => e.position(),
            Item::Sequence(s) => s.position(),
            Item::Fragments(f) => f.position(),
        }
    }

    pub fn endian(&self) -> Endianness {
        match self {
            Item::Element(e) => e.endian(),
            Item::Sequence(s) => s.endian(),
            Item::Fragments(f) => f.endian(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Item::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Item::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Item::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Item::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_fragments(&self) -> Option<&FragmentSequence> {
        match self {
            Item::Fragments(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_fragments_mut(&mut self) -> Option<&mut FragmentSequence> {
        match self {
            Item::Fragments(f) => Some(f),
            _ => None,
        }
    }

    /// The number of bytes this item takes when written in `syntax`.
    pub fn write_length(&self, syntax: &TransferSyntax, options: WriteOptions) -> u32 {
        match self {
            Item::Element(e) => e.write_length(syntax),
            Item::Sequence(s) => s.write_length(syntax, options),
            Item::Fragments(f) => f.write_length(syntax, options),
        }
    }

    /// Rewrite the item in the given byte order.
    pub fn convert_to(&mut self, endian: Endianness) -> Result<()> {
        match self {
            Item::Element(e) => e.convert_to(endian),
            Item::Sequence(s) => s.convert_to(endian),
            Item::Fragments(f) => f.convert_to(endian),
        }
    }

    /// Load deferred values into memory.
    pub fn preload(&mut self) -> Result<()> {
        match self {
            Item::Element(e) => e.preload(),
            Item::Sequence(s) => s.preload(),
            Item::Fragments(f) => f.preload(),
        }
    }

    /// Release values which can be loaded again.
    pub fn unload(&mut self) {
        match self {
            Item::Element(e) => e.unload(),
            Item::Sequence(s) => s.unload(),
            Item::Fragments(f) => f.unload(),
        }
    }

    pub(crate) fn dump(&self, out: &mut String, prefix: &str, options: DumpOptions) {
        match self {
            Item::Element(e) => dump::dump_element(e, out, prefix, options),
            Item::Sequence(s) => s.dump(out, prefix, options),
            Item::Fragments(f) => f.dump(out, prefix, options),
        }
    }
}

impl Header for Item {
    fn tag(&self) -> Tag {
        Item::tag(self)
    }

    fn vr(&self) -> VR {
        Item::vr(self)
    }
}
