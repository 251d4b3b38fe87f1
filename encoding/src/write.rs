//! Options and header arithmetic for computing encoded lengths.
//!
//! Lengths computed here describe the bytes a writer would produce,
//! so they must agree exactly with the wire format.

use crate::transfer_syntax::TransferSyntax;
use dcm_core::VR;

/// Size of the tag part of any header.
pub const TAG_LENGTH: u32 = 4;

/// Size of an item, item delimitation or sequence delimitation header.
pub const ITEM_HEADER_LENGTH: u32 = 8;

/// Size of a synthesized group length element, in either VR form:
/// tag, 2+2 VR and reserved bytes or 4 length bytes, then the UL value.
pub const GROUP_LENGTH_ELEMENT_LENGTH: u32 = 12;

/// Options for computing the encoded length of a data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteOptions {
    /// Group length elements are emitted at each group start.
    pub calculate_group_lengths: bool,
    /// Sequences have an explicit length,
    /// so no sequence delimitation item is written.
    pub explicit_length_sequence: bool,
    /// Sequence items have an explicit length,
    /// so no item delimitation item is written.
    pub explicit_length_sequence_item: bool,
    /// The basic offset table of encapsulated pixel data is filled in.
    pub write_fragment_offset_table: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            calculate_group_lengths: true,
            explicit_length_sequence: false,
            explicit_length_sequence_item: false,
            write_fragment_offset_table: true,
        }
    }
}

impl WriteOptions {
    /// The options with no flag set.
    pub fn none() -> Self {
        WriteOptions {
            calculate_group_lengths: false,
            explicit_length_sequence: false,
            explicit_length_sequence_item: false,
            write_fragment_offset_table: false,
        }
    }

    /// The same options without group lengths, as used in nested data sets.
    pub fn without_group_lengths(self) -> Self {
        WriteOptions {
            calculate_group_lengths: false,
            ..self
        }
    }
}

/// Length of an element header for the given VR in the given syntax.
///
/// Explicit VR: tag, 2 VR bytes, then a 2-byte length,
/// or 2 reserved bytes and a 4-byte length.
/// Implicit VR: tag and a 4-byte length.
pub fn element_header_length(vr: VR, syntax: &TransferSyntax) -> u32 {
    TAG_LENGTH
        + if syntax.is_explicit_vr() {
            2 + if vr.is_16bit_length_field() { 2 } else { 6 }
        } else {
            4
        }
}
