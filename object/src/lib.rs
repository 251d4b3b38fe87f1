#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! This crate contains the in-memory DICOM data set.
//!
//! A [`Dataset`] is a tag-ordered collection of [items](Item).
//! Each item is either an [`Element`] holding a value in a byte buffer,
//! a [`Sequence`] of nested data sets,
//! or a [`FragmentSequence`] of encapsulated pixel data.
//!
//! Elements are a closed set of value representation families,
//! each exposing typed access to its value:
//!
//! ```
//! use dcm_dictionary_std::tags;
//! use dcm_object::Dataset;
//! # fn main() -> Result<(), dcm_object::Error> {
//! let mut dataset = Dataset::default();
//! dataset.add_element_with_value(tags::PATIENT_NAME, "Doe^John")?;
//! dataset.add_element_with_value(tags::ROWS, 512_u16)?;
//!
//! assert_eq!(dataset.get_string(tags::PATIENT_NAME, "")?, "Doe^John");
//! assert_eq!(dataset.get_u16(tags::ROWS, 0)?, 512);
//!
//! let name = dataset.get_pn(tags::PATIENT_NAME)?.unwrap();
//! assert_eq!(name.family_name()?, "Doe");
//! # Ok(())
//! # }
//! ```
//!
//! Accessing an element through the wrong family is an error,
//! whereas accessing an absent element yields nothing or a default.
pub mod dataset;
pub mod dump;
pub mod element;
pub mod fragments;
pub mod item;
pub mod sequence;
pub mod uid;
pub mod value;

pub use crate::dataset::{Dataset, DatasetValue};
pub use crate::dump::DumpOptions;
pub use crate::element::Element;
pub use crate::fragments::FragmentSequence;
pub use crate::item::Item;
pub use crate::sequence::{Sequence, SequenceItem};
pub use crate::uid::UidGenerator;
pub use crate::value::{ValueObject, ValueType};

pub use dcm_core::{Tag, TagMask, VR};
pub use dcm_dictionary_std::StandardDataDictionary;
pub use dcm_encoding::{TransferSyntax, WriteOptions};

use snafu::{Backtrace, Snafu};

/// The root of the unique identifiers created by this implementation.
pub const IMPLEMENTATION_CLASS_UID: &str = "2.25.213741590128460391427301775846237910482";

/// An error which may occur when manipulating a data set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The element exists but belongs to another VR family.
    #[snafu(display("Tried to access element {} with incorrect VR {} (expected {})", tag, vr, expected))]
    IncorrectVr {
        tag: Tag,
        vr: VR,
        expected: &'static str,
        backtrace: Backtrace,
    },
    /// The item exists but is a sequence rather than an element.
    #[snafu(display("Item {} is a sequence, not an element", tag))]
    ElementIsSequence { tag: Tag, backtrace: Backtrace },
    /// The element does not exist.
    #[snafu(display("Element {} does not exist in data set", tag))]
    NoSuchElement { tag: Tag, backtrace: Backtrace },
    /// A value of the wrong type was given to an element.
    #[snafu(display("Invalid value type {:?} for element of VR {}", found, vr))]
    InvalidValueType {
        vr: VR,
        found: ValueType,
        backtrace: Backtrace,
    },
    /// The element family has no value array form.
    #[snafu(display("Elements of VR {} have no value array form", vr))]
    NoValueArray { vr: VR, backtrace: Backtrace },
    /// Value index beyond the value multiplicity.
    #[snafu(display("Value index {} out of range (VM {})", index, vm))]
    ValueIndexOutOfRange {
        index: usize,
        vm: usize,
        backtrace: Backtrace,
    },
    /// A numeric string value could not be parsed.
    #[snafu(display("Could not parse `{}` as a number", value))]
    ParseNumber { value: String, backtrace: Backtrace },
    /// Sequences cannot be created by the element factory.
    #[snafu(display("Sequence element {} should be created explicitly", tag))]
    SequenceFactory { tag: Tag, backtrace: Backtrace },
    /// The VR has no element family.
    #[snafu(display("Unhandled VR {}", vr))]
    UnhandledVr { vr: VR, backtrace: Backtrace },
    /// Failed to access the value bytes.
    #[snafu(display("Could not access value of element {}", tag))]
    Buffer {
        tag: Tag,
        #[snafu(backtrace)]
        source: dcm_encoding::buffer::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
