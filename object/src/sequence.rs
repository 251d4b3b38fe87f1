//! Sequences of nested data sets.

use crate::dataset::Dataset;
use crate::dump::{self, DumpOptions};
use crate::Result;
use dcm_core::{Length, Tag, VR};
use dcm_encoding::buffer::local_endianness;
use dcm_encoding::write::{element_header_length, ITEM_HEADER_LENGTH};
use dcm_encoding::{Endianness, TransferSyntax, WriteOptions};

/// One item of a sequence, wrapping a nested data set.
#[derive(Debug, Clone)]
pub struct SequenceItem {
    position: u64,
    endian: Endianness,
    dataset: Dataset,
}

impl Default for SequenceItem {
    fn default() -> Self {
        SequenceItem::new()
    }
}

impl SequenceItem {
    /// An item with an empty data set,
    /// in the byte order of this machine.
    pub fn new() -> Self {
        SequenceItem::create(0, local_endianness())
    }

    /// An item with an empty data set, read at `position` of a stream.
    pub fn create(position: u64, endian: Endianness) -> Self {
        SequenceItem {
            position,
            endian,
            dataset: Dataset::default(),
        }
    }

    /// An item over an existing data set.
    pub fn with_dataset(dataset: Dataset) -> Self {
        SequenceItem {
            position: 0,
            endian: local_endianness(),
            dataset,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn endian(&self) -> Endianness {
        self.endian
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// The item header, the nested data set without group lengths,
    /// and an item delimitation unless items have explicit lengths.
    pub fn write_length(&self, syntax: &TransferSyntax, options: WriteOptions) -> u32 {
        let mut length = ITEM_HEADER_LENGTH
            + self
                .dataset
                .write_length(syntax, options.without_group_lengths());
        if !options.explicit_length_sequence_item {
            length += ITEM_HEADER_LENGTH;
        }
        length
    }

    /// Rewrite the nested data set in the given byte order.
    pub fn convert_to(&mut self, endian: Endianness) -> Result<()> {
        self.dataset.select_byte_order(endian)?;
        self.endian = endian;
        Ok(())
    }

    pub fn preload(&mut self) -> Result<()> {
        self.dataset.preload_deferred_buffers()
    }

    pub fn unload(&mut self) {
        self.dataset.unload_deferred_buffers();
    }

    pub(crate) fn dump(&self, out: &mut String, prefix: &str, options: DumpOptions) {
        out.push('\n');
        out.push_str(prefix);
        out.push_str(" Item:\n");
        let nested = format!("{}  > ", prefix);
        self.dataset.dump_into(out, &nested, options);
        out.pop();
    }
}

/// A sequence element (SQ).
#[derive(Debug, Clone)]
pub struct Sequence {
    tag: Tag,
    position: u64,
    stream_length: Length,
    endian: Endianness,
    items: Vec<SequenceItem>,
}

impl Sequence {
    /// An empty sequence of undefined length,
    /// in the byte order of this machine.
    pub fn new(tag: Tag) -> Self {
        Sequence::create(tag, 0, Length::UNDEFINED, local_endianness())
    }

    /// An empty sequence read at `position` of a stream,
    /// with the length found there.
    pub fn create(tag: Tag, position: u64, stream_length: Length, endian: Endianness) -> Self {
        Sequence {
            tag,
            position,
            stream_length,
            endian,
            items: Vec::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn vr(&self) -> VR {
        VR::SQ
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// The length recorded in the source stream.
    pub fn stream_length(&self) -> Length {
        self.stream_length
    }

    pub fn endian(&self) -> Endianness {
        self.endian
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<SequenceItem> {
        &mut self.items
    }

    /// Append an item.
    pub fn add_item(&mut self, item: SequenceItem) {
        self.items.push(item);
    }

    /// The header, every item, and a sequence delimitation
    /// unless sequences have explicit lengths.
    pub fn write_length(&self, syntax: &TransferSyntax, options: WriteOptions) -> u32 {
        let mut length = element_header_length(VR::SQ, syntax)
            + self
                .items
                .iter()
                .map(|item| item.write_length(syntax, options))
                .sum::<u32>();
        if !options.explicit_length_sequence {
            length += ITEM_HEADER_LENGTH;
        }
        length
    }

    /// Rewrite every item in the given byte order.
    pub fn convert_to(&mut self, endian: Endianness) -> Result<()> {
        for item in &mut self.items {
            item.convert_to(endian)?;
        }
        self.endian = endian;
        Ok(())
    }

    /// Move every nested data set to another transfer syntax.
    pub(crate) fn set_transfer_syntax(&mut self, syntax: &TransferSyntax) -> Result<()> {
        let endian = syntax.endianness();
        for item in &mut self.items {
            item.dataset.set_internal_transfer_syntax(syntax)?;
            item.endian = endian;
        }
        self.endian = endian;
        Ok(())
    }

    pub fn preload(&mut self) -> Result<()> {
        self.items.iter_mut().try_for_each(SequenceItem::preload)
    }

    pub fn unload(&mut self) {
        self.items.iter_mut().for_each(SequenceItem::unload);
    }

    pub(crate) fn dump(&self, out: &mut String, prefix: &str, options: DumpOptions) {
        out.push_str(prefix);
        out.push_str(&format!("{} SQ {}", self.tag, dump::tag_name(self.tag)));
        for item in &self.items {
            item.dump(out, prefix, options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcm_transfer_syntax_registry::entries::{
        EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN,
    };

    const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
    const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);

    fn one_item_sequence() -> Sequence {
        let mut item = SequenceItem::new();
        item.dataset_mut()
            .add_element_with_value(REFERENCED_SOP_CLASS_UID, "1.2.3.4")
            .unwrap();
        let mut sq = Sequence::new(REFERENCED_IMAGE_SEQUENCE);
        sq.add_item(item);
        sq
    }

    #[test]
    fn undefined_lengths_add_delimiters() {
        let sq = one_item_sequence();
        // UI value "1.2.3.4" padded to 8 bytes
        let element = 8 + 8;
        assert_eq!(
            sq.write_length(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::none()),
            12 + (8 + element + 8) + 8
        );
        let mut explicit = WriteOptions::none();
        explicit.explicit_length_sequence = true;
        explicit.explicit_length_sequence_item = true;
        assert_eq!(
            sq.write_length(&EXPLICIT_VR_LITTLE_ENDIAN, explicit),
            12 + 8 + element
        );
    }

    #[test]
    fn nested_data_sets_have_no_group_lengths() {
        let sq = one_item_sequence();
        assert_eq!(
            sq.write_length(&IMPLICIT_VR_LITTLE_ENDIAN, WriteOptions::default()),
            8 + (8 + 16 + 8) + 8
        );
    }

    #[test]
    fn endian_conversion_reaches_items() {
        let mut sq = one_item_sequence();
        sq.convert_to(Endianness::Big).unwrap();
        assert_eq!(sq.endian(), Endianness::Big);
        assert_eq!(sq.items()[0].endian(), Endianness::Big);
    }

    #[test]
    fn dump_nests_items() {
        let sq = one_item_sequence();
        let mut out = String::new();
        sq.dump(&mut out, "", DumpOptions::none());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "(0008,1140) SQ Referenced Image Sequence");
        assert_eq!(lines[1], " Item:");
        assert!(lines[2].starts_with("  > (0008,1150) UI [1.2.3.4]"));
        assert_eq!(lines.len(), 3);
    }
}
