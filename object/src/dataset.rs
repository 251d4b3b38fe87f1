//! The in-memory data set.
//!
//! A [`Dataset`] keeps its [items](Item) ordered by tag,
//! with at most one item per tag.
//! Every item is kept in the byte order of the data set's
//! internal transfer syntax.

use crate::dump::DumpOptions;
use crate::element::{
    AttributeTag, DateElement, DecimalString, Element, ElementFamily, IntegerString,
    MultiStringElement, PersonName, StringElement, UniqueIdentifier, ValueElement,
};
use crate::item::Item;
use crate::sequence::{Sequence, SequenceItem};
use crate::value::ValueObject;
use crate::{
    ElementIsSequenceSnafu, IncorrectVrSnafu, NoSuchElementSnafu, Result,
    ValueIndexOutOfRangeSnafu,
};
use dcm_core::chrono::{Local, NaiveDateTime, Timelike};
use dcm_core::{DataDictionary, Length, Tag, TagMask, Uid, VR};
use dcm_dictionary_std::{tags, StandardDataDictionary};
use dcm_encoding::buffer::ByteBuffer;
use dcm_encoding::text::SpecificCharacterSet;
use dcm_encoding::write::GROUP_LENGTH_ELEMENT_LENGTH;
use dcm_encoding::{Endianness, TransferSyntax, WriteOptions};
use snafu::ensure;
use std::any::Any;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

/// Opaque state attached to a data set by its user.
pub type UserState = Arc<dyn Any + Send + Sync>;

/// A tag-ordered collection of elements, sequences and fragment sequences.
#[derive(Debug, Clone)]
pub struct Dataset {
    items: BTreeMap<Tag, Item>,
    transfer_syntax: TransferSyntax,
    stream_position: u64,
    stream_length: Length,
    user_state: Option<UserState>,
}

impl Default for Dataset {
    /// An empty data set in explicit VR little endian.
    fn default() -> Self {
        Dataset::new(dcm_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN)
    }
}

/// A value which can be stored in a new element
/// of the dictionary VR of its tag.
pub trait DatasetValue {
    /// The VRs accepted, for error reporting.
    const EXPECTED: &'static str;

    /// Whether an element of `vr` can hold this value.
    fn accepts(vr: VR) -> bool;

    /// Store the value in a freshly created element.
    fn assign(self, element: &mut Element) -> Result<()>;
}

impl<'a> DatasetValue for &'a str {
    const EXPECTED: &'static str = "a string VR";

    fn accepts(vr: VR) -> bool {
        vr.is_string()
    }

    fn assign(self, element: &mut Element) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        element.set_value_string(self)
    }
}

impl<'a> DatasetValue for &'a Uid {
    const EXPECTED: &'static str = "a string VR";

    fn accepts(vr: VR) -> bool {
        vr.is_string()
    }

    fn assign(self, element: &mut Element) -> Result<()> {
        self.uid().assign(element)
    }
}

macro_rules! impl_dataset_value {
    ($t: ty, $expected: literal, $($vr: ident)|+) => {
        impl DatasetValue for $t {
            const EXPECTED: &'static str = $expected;

            fn accepts(vr: VR) -> bool {
                matches!(vr, $(VR::$vr)|+)
            }

            fn assign(self, element: &mut Element) -> Result<()> {
                element.set_value_object(&ValueObject::from(self))
            }
        }
    };
}

impl_dataset_value!(u16, "US", US);
impl_dataset_value!(i32, "IS or SL", IS | SL);
impl_dataset_value!(f64, "DS or FD", DS | FD);
impl_dataset_value!(NaiveDateTime, "DA, DT or TM", DA | DT | TM);
impl_dataset_value!(Tag, "AT", AT);

/// Typed access to the element family of each VR.
macro_rules! typed_accessors {
    ($($variant: ident => $get: ident, $get_mut: ident, $family: ty;)*) => {
        impl Dataset {
            $(
                #[doc = concat!("The ", stringify!($variant), " element at `tag`, if present.")]
                ///
                /// An element of another VR or a sequence at `tag` is an error.
                pub fn $get(&self, tag: Tag) -> Result<Option<&$family>> {
                    match self.items.get(&tag) {
                        None => Ok(None),
                        Some(Item::Element(Element::$variant(e))) => Ok(Some(e)),
                        Some(Item::Element(e)) => IncorrectVrSnafu {
                            tag,
                            vr: e.vr(),
                            expected: stringify!($variant),
                        }
                        .fail(),
                        Some(_) => ElementIsSequenceSnafu { tag }.fail(),
                    }
                }

                #[doc = concat!("Mutable access to the ", stringify!($variant), " element at `tag`.")]
                pub fn $get_mut(&mut self, tag: Tag) -> Result<Option<&mut $family>> {
                    match self.items.get_mut(&tag) {
                        None => Ok(None),
                        Some(Item::Element(Element::$variant(e))) => Ok(Some(e)),
                        Some(Item::Element(e)) => IncorrectVrSnafu {
                            tag,
                            vr: e.vr(),
                            expected: stringify!($variant),
                        }
                        .fail(),
                        Some(_) => ElementIsSequenceSnafu { tag }.fail(),
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    AE => get_ae, get_ae_mut, MultiStringElement;
    AS => get_as, get_as_mut, MultiStringElement;
    AT => get_at, get_at_mut, AttributeTag;
    CS => get_cs, get_cs_mut, MultiStringElement;
    DA => get_da, get_da_mut, DateElement;
    DS => get_ds, get_ds_mut, DecimalString;
    DT => get_dt, get_dt_mut, DateElement;
    FD => get_fd, get_fd_mut, ValueElement<f64>;
    FL => get_fl, get_fl_mut, ValueElement<f32>;
    IS => get_is, get_is_mut, IntegerString;
    LO => get_lo, get_lo_mut, StringElement;
    LT => get_lt, get_lt_mut, StringElement;
    OB => get_ob, get_ob_mut, ValueElement<u8>;
    OF => get_of, get_of_mut, ValueElement<f32>;
    OW => get_ow, get_ow_mut, ValueElement<u16>;
    PN => get_pn, get_pn_mut, PersonName;
    SH => get_sh, get_sh_mut, StringElement;
    SL => get_sl, get_sl_mut, ValueElement<i32>;
    SS => get_ss, get_ss_mut, ValueElement<i16>;
    ST => get_st, get_st_mut, StringElement;
    TM => get_tm, get_tm_mut, DateElement;
    UI => get_ui, get_ui_mut, UniqueIdentifier;
    UL => get_ul, get_ul_mut, ValueElement<u32>;
    UN => get_un, get_un_mut, ValueElement<u8>;
    US => get_us, get_us_mut, ValueElement<u16>;
    UT => get_ut, get_ut_mut, StringElement;
}

type Elements<'a> = Box<dyn Iterator<Item = &'a Element> + 'a>;
type ElementsMut<'a> = Box<dyn Iterator<Item = &'a mut Element> + 'a>;

impl Dataset {
    /// An empty data set encoded in the given transfer syntax.
    pub fn new(transfer_syntax: TransferSyntax) -> Self {
        Dataset::from_stream(0, Length::UNDEFINED, transfer_syntax)
    }

    /// An empty data set read at `position` of a stream.
    pub fn from_stream(position: u64, length: Length, transfer_syntax: TransferSyntax) -> Self {
        Dataset {
            items: BTreeMap::new(),
            transfer_syntax,
            stream_position: position,
            stream_length: length,
            user_state: None,
        }
    }

    /// The transfer syntax the items are encoded in.
    pub fn transfer_syntax(&self) -> &TransferSyntax {
        &self.transfer_syntax
    }

    pub fn stream_position(&self) -> u64 {
        self.stream_position
    }

    pub fn stream_length(&self) -> Length {
        self.stream_length
    }

    /// State attached by the user. Cloning a data set shares it.
    pub fn user_state(&self) -> Option<&UserState> {
        self.user_state.as_ref()
    }

    pub fn set_user_state(&mut self, state: Option<UserState>) {
        self.user_state = state;
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// The tags present, in order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.items.keys().copied()
    }

    // --- write length

    /// The number of bytes the data set takes when written in `syntax`.
    ///
    /// Stored group length elements are ignored.
    /// With `calculate_group_lengths`, one group length element
    /// is accounted for at the start of each group.
    pub fn write_length(&self, syntax: &TransferSyntax, options: WriteOptions) -> u32 {
        let mut length = 0;
        let mut group = None;
        for item in self.items.values() {
            let tag = item.tag();
            if tag.is_group_length() {
                continue;
            }
            if group != Some(tag.group()) {
                group = Some(tag.group());
                if options.calculate_group_lengths {
                    length += GROUP_LENGTH_ELEMENT_LENGTH;
                }
            }
            length += item.write_length(syntax, options);
        }
        length
    }

    /// The number of bytes the items of one group take when written,
    /// excluding its group length element.
    pub fn calculate_group_write_length(
        &self,
        group: u16,
        syntax: &TransferSyntax,
        options: WriteOptions,
    ) -> u32 {
        self.items
            .range(Tag(group, 0x0001)..=Tag(group, 0xFFFF))
            .map(|(_, item)| item.write_length(syntax, options))
            .sum()
    }

    // --- byte order and deferred values

    /// Convert every item to the given byte order.
    pub(crate) fn select_byte_order(&mut self, endian: Endianness) -> Result<()> {
        self.items
            .values_mut()
            .try_for_each(|item| item.convert_to(endian))
    }

    /// Switch to another transfer syntax,
    /// converting every item and nested data set to its byte order.
    ///
    /// Values are not transcoded.
    pub fn set_internal_transfer_syntax(&mut self, syntax: &TransferSyntax) -> Result<()> {
        let endian = syntax.endianness();
        tracing::debug!(
            "Setting internal transfer syntax to {} ({:?} endian)",
            syntax.name(),
            endian
        );
        for item in self.items.values_mut() {
            match item {
                Item::Sequence(sq) => sq.set_transfer_syntax(syntax)?,
                item => item.convert_to(endian)?,
            }
        }
        self.transfer_syntax = syntax.clone();
        Ok(())
    }

    /// Load every deferred value, recursively.
    pub fn preload_deferred_buffers(&mut self) -> Result<()> {
        self.items.values_mut().try_for_each(Item::preload)
    }

    /// Release every value which can be loaded again, recursively.
    pub fn unload_deferred_buffers(&mut self) {
        self.items.values_mut().for_each(Item::unload);
    }

    // --- structure

    /// Insert an item, replacing any item with the same tag.
    ///
    /// The item is converted to the byte order of the data set.
    pub fn add_item(&mut self, item: impl Into<Item>) -> Result<()> {
        let mut item = item.into();
        item.convert_to(self.transfer_syntax.endianness())?;
        self.items.insert(item.tag(), item);
        Ok(())
    }

    /// Add every item of another data set, replacing items with the same tag.
    pub fn merge(&mut self, other: Dataset) -> Result<()> {
        other
            .items
            .into_iter()
            .try_for_each(|(_, item)| self.add_item(item))
    }

    /// Remove the item at `tag`, if any.
    pub fn remove(&mut self, tag: Tag) -> Option<Item> {
        self.items.remove(&tag)
    }

    /// Remove every item whose tag matches the mask.
    pub fn remove_masked(&mut self, mask: TagMask) {
        self.items.retain(|tag, _| !mask.matches(*tag));
    }

    /// The tags matching the mask, in order.
    pub fn masked_tags(&self, mask: TagMask) -> impl Iterator<Item = Tag> + '_ {
        self.tags().filter(move |tag| mask.matches(*tag))
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.items.contains_key(&tag)
    }

    /// The VR of the item at `tag`.
    pub fn vr(&self, tag: Tag) -> Option<VR> {
        self.items.get(&tag).map(Item::vr)
    }

    pub fn item(&self, tag: Tag) -> Option<&Item> {
        self.items.get(&tag)
    }

    pub fn item_mut(&mut self, tag: Tag) -> Option<&mut Item> {
        self.items.get_mut(&tag)
    }

    /// The element at `tag`, if there is one and it is not a sequence.
    pub fn element(&self, tag: Tag) -> Option<&Element> {
        self.items.get(&tag).and_then(Item::as_element)
    }

    pub fn element_mut(&mut self, tag: Tag) -> Option<&mut Element> {
        self.items.get_mut(&tag).and_then(Item::as_element_mut)
    }

    /// The sequence at `tag`, if present.
    pub fn get_sq(&self, tag: Tag) -> Result<Option<&Sequence>> {
        match self.items.get(&tag) {
            None => Ok(None),
            Some(Item::Sequence(sq)) => Ok(Some(sq)),
            Some(item) => IncorrectVrSnafu {
                tag,
                vr: item.vr(),
                expected: "SQ",
            }
            .fail(),
        }
    }

    pub fn get_sq_mut(&mut self, tag: Tag) -> Result<Option<&mut Sequence>> {
        match self.items.get_mut(&tag) {
            None => Ok(None),
            Some(Item::Sequence(sq)) => Ok(Some(sq)),
            Some(item) => IncorrectVrSnafu {
                tag,
                vr: item.vr(),
                expected: "SQ",
            }
            .fail(),
        }
    }

    /// An element which holds a value, or an error if `tag` is a sequence.
    fn element_with_value(&self, tag: Tag) -> Result<Option<&Element>> {
        match self.items.get(&tag) {
            None => Ok(None),
            Some(Item::Element(e)) if e.length() == 0 => Ok(None),
            Some(Item::Element(e)) => Ok(Some(e)),
            Some(_) => ElementIsSequenceSnafu { tag }.fail(),
        }
    }

    // --- element creation

    /// Add an empty element with the dictionary VR of `tag`,
    /// replacing any item with the same tag.
    pub fn add_element(&mut self, tag: Tag) -> Result<&mut Element> {
        self.add_element_with_vr(tag, StandardDataDictionary.default_vr(tag))
    }

    /// Add an empty element of the given VR,
    /// replacing any item with the same tag.
    ///
    /// Text elements are set up to use the data set's character set.
    pub fn add_element_with_vr(&mut self, tag: Tag, vr: VR) -> Result<&mut Element> {
        let buffer = ByteBuffer::new(self.transfer_syntax.endianness());
        let mut element = Element::create(tag, vr, 0, buffer)?;
        if vr.is_encoded_string() {
            element.set_charset(self.charset()?);
        }
        let slot = match self.items.entry(tag) {
            Entry::Occupied(mut o) => {
                o.insert(Item::Element(element));
                o.into_mut()
            }
            Entry::Vacant(v) => v.insert(Item::Element(element)),
        };
        match slot {
            Item::Element(e) => Ok(e),
            _ => ElementIsSequenceSnafu { tag }.fail(),
        }
    }

    /// Add an element with the dictionary VR of `tag` holding `value`.
    ///
    /// The dictionary VR must be able to hold the type of value.
    pub fn add_element_with_value<V: DatasetValue>(&mut self, tag: Tag, value: V) -> Result<()> {
        let vr = StandardDataDictionary.default_vr(tag);
        ensure!(
            V::accepts(vr),
            IncorrectVrSnafu {
                tag,
                vr,
                expected: V::EXPECTED
            }
        );
        value.assign(self.add_element_with_vr(tag, vr)?)
    }

    /// Add an element with the dictionary VR of `tag`,
    /// holding a value given in string form.
    pub fn add_element_with_value_string(&mut self, tag: Tag, value: &str) -> Result<()> {
        self.add_element(tag)?.set_value_string(value)
    }

    /// Add an element with the dictionary VR of `tag` holding `value`.
    pub fn add_element_with_object_value(&mut self, tag: Tag, value: &ValueObject) -> Result<()> {
        self.add_element(tag)?.set_value_object(value)
    }

    /// Append an item to the sequence at `tag`, creating the sequence if absent.
    fn append_sequence_item(&mut self, tag: Tag, item: SequenceItem) -> Result<()> {
        if let Some(sq) = self.get_sq_mut(tag)? {
            let mut item = item;
            item.convert_to(sq.endian())?;
            sq.add_item(item);
            return Ok(());
        }
        let mut sq = Sequence::new(tag);
        sq.add_item(item);
        self.add_item(sq)
    }

    /// Append a reference to a SOP instance to the sequence at `tag`.
    pub fn add_reference_sequence_item(
        &mut self,
        tag: Tag,
        class_uid: &Uid,
        instance_uid: &Uid,
    ) -> Result<()> {
        let mut item = SequenceItem::new();
        let dataset = item.dataset_mut();
        dataset.add_element_with_value(tags::REFERENCED_SOP_CLASS_UID, class_uid)?;
        dataset.add_element_with_value(tags::REFERENCED_SOP_INSTANCE_UID, instance_uid)?;
        self.append_sequence_item(tag, item)
    }

    /// Record the current values of `tags` in a new item
    /// of the Original Attributes Sequence, before they are modified.
    ///
    /// Tags absent from the data set are skipped.
    pub fn create_original_attributes_sequence<I>(
        &mut self,
        source: &str,
        modifying_system: &str,
        reason: &str,
        tags_to_modify: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Tag>,
    {
        let mut modified = SequenceItem::new();
        for tag in tags_to_modify {
            if let Some(original) = self.items.get(&tag) {
                modified.dataset_mut().add_item(original.clone())?;
            }
        }
        let mut modified_sq = Sequence::new(tags::MODIFIED_ATTRIBUTES_SEQUENCE);
        modified_sq.add_item(modified);

        let mut item = SequenceItem::new();
        let dataset = item.dataset_mut();
        dataset.add_element_with_value(tags::SOURCE_OF_PREVIOUS_VALUES, source)?;
        dataset.add_element_with_value(
            tags::ATTRIBUTE_MODIFICATION_DATE_TIME,
            Local::now().naive_local(),
        )?;
        dataset.add_element_with_value(tags::MODIFYING_SYSTEM, modifying_system)?;
        dataset.add_element_with_value(tags::REASON_FOR_THE_ATTRIBUTE_MODIFICATION, reason)?;
        dataset.add_item(modified_sq)?;

        self.append_sequence_item(tags::ORIGINAL_ATTRIBUTES_SEQUENCE, item)
    }

    // --- recursive traversal

    fn walk<'a>(&'a self, filter: Option<Tag>) -> Elements<'a> {
        Box::new(self.items.values().flat_map(move |item: &'a Item| -> Elements<'a> {
            match item {
                Item::Element(e) if filter.map_or(true, |t| t == e.tag()) => {
                    Box::new(std::iter::once(e))
                }
                Item::Sequence(sq) => Box::new(
                    sq.items()
                        .iter()
                        .flat_map(move |i: &'a SequenceItem| i.dataset().walk(filter)),
                ),
                _ => Box::new(std::iter::empty()),
            }
        }))
    }

    fn walk_mut<'a>(&'a mut self, filter: Option<Tag>) -> ElementsMut<'a> {
        Box::new(
            self.items
                .values_mut()
                .flat_map(move |item: &'a mut Item| -> ElementsMut<'a> {
                    match item {
                        Item::Element(e) if filter.map_or(true, |t| t == e.tag()) => {
                            Box::new(std::iter::once(e))
                        }
                        Item::Sequence(sq) => Box::new(
                            sq.items_mut()
                                .iter_mut()
                                .flat_map(move |i: &'a mut SequenceItem| {
                                    i.dataset_mut().walk_mut(filter)
                                }),
                        ),
                        _ => Box::new(std::iter::empty()),
                    }
                }),
        )
    }

    /// Every element with the given tag, at any depth, in depth-first order.
    pub fn search(&self, tag: Tag) -> impl Iterator<Item = &Element> {
        self.walk(Some(tag))
    }

    pub fn search_mut(&mut self, tag: Tag) -> impl Iterator<Item = &mut Element> {
        self.walk_mut(Some(tag))
    }

    /// Every element at any depth, in depth-first order.
    pub fn recurse(&self) -> impl Iterator<Item = &Element> {
        self.walk(None)
    }

    pub fn recurse_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.walk_mut(None)
    }

    /// Set `value` on every element with the given tag, at any depth.
    pub fn replace_all(&mut self, tag: Tag, value: &ValueObject) -> Result<()> {
        self.search_mut(tag)
            .try_for_each(|e| e.set_value_object(value))
    }

    /// Set the UID at `tag`, and replace its previous value
    /// in every UI element at any depth.
    pub fn replace_uid(&mut self, tag: Tag, uid: &Uid) -> Result<()> {
        let old = self.get_uid(tag)?;
        self.add_element_with_value(tag, uid)?;
        let old = match old {
            Some(old) => old,
            None => return Ok(()),
        };
        for element in self.recurse_mut() {
            if let Element::UI(ui) = element {
                if ui.raw().length() > 0 && ui.uid()? == old {
                    ui.set_uid(uid)?;
                }
            }
        }
        Ok(())
    }

    // --- string access

    /// The string form of the element at `tag`.
    pub fn value_string(&self, tag: Tag) -> Result<Option<String>> {
        self.element(tag).map(Element::value_string).transpose()
    }

    /// The first text value of the element at `tag`, or `default` if absent.
    pub fn get_string(&self, tag: Tag, default: &str) -> Result<String> {
        self.get_string_at(tag, 0, default)
    }

    /// The text value at `index` of the element at `tag`, or `default` if absent.
    ///
    /// The element must be of a string family.
    pub fn get_string_at(&self, tag: Tag, index: usize, default: &str) -> Result<String> {
        let element = match self.items.get(&tag) {
            None => return Ok(default.to_string()),
            Some(Item::Element(e)) => e,
            Some(_) => return ElementIsSequenceSnafu { tag }.fail(),
        };
        if let Some(e) = element.multi_string() {
            return e.value_at(index);
        }
        if let Some(e) = element.single_string() {
            ensure!(index == 0, ValueIndexOutOfRangeSnafu { index, vm: 1_usize });
            return e.value();
        }
        IncorrectVrSnafu {
            tag,
            vr: element.vr(),
            expected: "a string VR",
        }
        .fail()
    }

    /// Replace the text of an existing string element.
    pub fn set_string(&mut self, tag: Tag, value: &str) -> Result<()> {
        let element = self.existing_element_mut(tag)?;
        let vr = element.vr();
        if let Some(e) = element.multi_string_mut() {
            return e.set_value(value);
        }
        if let Some(e) = element.single_string_mut() {
            return e.set_value(value);
        }
        IncorrectVrSnafu {
            tag,
            vr,
            expected: "a string VR",
        }
        .fail()
    }

    /// All text values of the element at `tag`, or `default` if absent.
    pub fn get_string_array(&self, tag: Tag, default: &[&str]) -> Result<Vec<String>> {
        let element = match self.items.get(&tag) {
            None => return Ok(default.iter().map(|s| s.to_string()).collect()),
            Some(Item::Element(e)) => e,
            Some(_) => return ElementIsSequenceSnafu { tag }.fail(),
        };
        if let Some(e) = element.multi_string() {
            return e.values();
        }
        if let Some(e) = element.single_string() {
            return Ok(vec![e.value()?]);
        }
        IncorrectVrSnafu {
            tag,
            vr: element.vr(),
            expected: "a string VR",
        }
        .fail()
    }

    /// Replace the values of an existing multi-valued string element.
    pub fn set_string_array<I>(&mut self, tag: Tag, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let element = self.existing_element_mut(tag)?;
        let vr = element.vr();
        match element.multi_string_mut() {
            Some(e) => e.set_values(values),
            None => IncorrectVrSnafu {
                tag,
                vr,
                expected: "a multi-valued string VR",
            }
            .fail(),
        }
    }

    fn existing_element_mut(&mut self, tag: Tag) -> Result<&mut Element> {
        match self.items.get_mut(&tag) {
            None => NoSuchElementSnafu { tag }.fail(),
            Some(Item::Element(e)) => Ok(e),
            Some(_) => ElementIsSequenceSnafu { tag }.fail(),
        }
    }

    // --- date access

    /// The first value of the date element at `tag`, or `default`.
    pub fn get_datetime(&self, tag: Tag, default: NaiveDateTime) -> Result<NaiveDateTime> {
        self.get_datetime_at(tag, 0, default)
    }

    /// The value at `index` of the date element at `tag`,
    /// or `default` if absent or unreadable.
    pub fn get_datetime_at(
        &self,
        tag: Tag,
        index: usize,
        default: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        match self.items.get(&tag) {
            None => Ok(default),
            Some(Item::Element(Element::DA(e)))
            | Some(Item::Element(Element::DT(e)))
            | Some(Item::Element(Element::TM(e))) => Ok(e.datetime(index).unwrap_or(default)),
            Some(Item::Element(e)) => IncorrectVrSnafu {
                tag,
                vr: e.vr(),
                expected: "DA, DT or TM",
            }
            .fail(),
            Some(_) => ElementIsSequenceSnafu { tag }.fail(),
        }
    }

    /// The date at `date_tag` combined with the time of day at `time_tag`.
    ///
    /// Without a date the `default` provides it.
    /// A missing or unreadable time leaves the time of the date as is.
    pub fn get_date_and_time(
        &self,
        date_tag: Tag,
        time_tag: Option<Tag>,
        default: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        let date = match self.get_da(date_tag)? {
            Some(da) => da.datetime(0)?,
            None => default,
        };
        let time = time_tag
            .and_then(|tag| self.get_tm(tag).ok().flatten())
            .and_then(|tm| tm.datetime(0).ok());
        Ok(match time {
            Some(time) => date
                .date()
                .and_hms_opt(time.hour(), time.minute(), time.second())
                .unwrap_or(date),
            None => date,
        })
    }

    /// Store a point in time as a DA element and a TM element.
    pub fn set_date_and_time(
        &mut self,
        date_tag: Tag,
        time_tag: Tag,
        value: NaiveDateTime,
    ) -> Result<()> {
        let value = ValueObject::DateTime(value);
        self.add_element_with_vr(date_tag, VR::DA)?
            .set_value_object(&value)?;
        self.add_element_with_vr(time_tag, VR::TM)?
            .set_value_object(&value)
    }

    // --- scalar access

    /// The first tag of the AT element at `tag`, if it holds any.
    pub fn get_tag_value(&self, tag: Tag) -> Result<Option<Tag>> {
        match self.get_at(tag)? {
            Some(at) if at.raw().length() > 0 => at.value_at(0).map(Some),
            _ => Ok(None),
        }
    }

    /// The first UID of the UI element at `tag`, if it holds any.
    pub fn get_uid(&self, tag: Tag) -> Result<Option<Uid>> {
        match self.get_ui(tag)? {
            Some(ui) if ui.raw().length() > 0 => ui.uid().map(Some),
            _ => Ok(None),
        }
    }

    /// The first integer of the IS or SL element at `tag`, or `default`.
    pub fn get_i32(&self, tag: Tag, default: i32) -> Result<i32> {
        match self.element_with_value(tag)? {
            None => Ok(default),
            Some(Element::IS(e)) => e.int(0),
            Some(Element::SL(e)) => e.value(),
            Some(e) => IncorrectVrSnafu {
                tag,
                vr: e.vr(),
                expected: "IS or SL",
            }
            .fail(),
        }
    }

    /// The first number of the SS element at `tag`, or `default`.
    pub fn get_i16(&self, tag: Tag, default: i16) -> Result<i16> {
        match self.get_ss(tag)? {
            Some(e) if e.raw().length() > 0 => e.value(),
            _ => Ok(default),
        }
    }

    /// The first number of the US element at `tag`, or `default`.
    pub fn get_u16(&self, tag: Tag, default: u16) -> Result<u16> {
        match self.get_us(tag)? {
            Some(e) if e.raw().length() > 0 => e.value(),
            _ => Ok(default),
        }
    }

    /// The first number of the FL or DS element at `tag`, or `default`.
    pub fn get_f32(&self, tag: Tag, default: f32) -> Result<f32> {
        match self.element_with_value(tag)? {
            None => Ok(default),
            Some(Element::FL(e)) => e.value(),
            Some(Element::DS(e)) => e.float(0),
            Some(e) => IncorrectVrSnafu {
                tag,
                vr: e.vr(),
                expected: "FL or DS",
            }
            .fail(),
        }
    }

    /// The first number of the FD or DS element at `tag`, or `default`.
    pub fn get_f64(&self, tag: Tag, default: f64) -> Result<f64> {
        match self.element_with_value(tag)? {
            None => Ok(default),
            Some(Element::FD(e)) => e.value(),
            Some(Element::DS(e)) => e.double(0),
            Some(e) => IncorrectVrSnafu {
                tag,
                vr: e.vr(),
                expected: "FD or DS",
            }
            .fail(),
        }
    }

    // --- character set

    /// The character set declared by Specific Character Set,
    /// the default repertoire if absent or empty.
    pub fn charset(&self) -> Result<SpecificCharacterSet> {
        match self.get_cs(tags::SPECIFIC_CHARACTER_SET)? {
            Some(cs) if cs.raw().length() > 0 => {
                Ok(SpecificCharacterSet::from_term(&cs.value_at(0)?))
            }
            _ => Ok(SpecificCharacterSet::Default),
        }
    }

    /// Declare a character set and re-encode the text
    /// of every non-empty element in it.
    pub fn set_charset(&mut self, charset: SpecificCharacterSet) -> Result<()> {
        self.add_element_with_value(tags::SPECIFIC_CHARACTER_SET, charset.defined_term())?;
        for item in self.items.values_mut() {
            if let Item::Element(e) = item {
                e.change_charset(charset)?;
            }
        }
        Ok(())
    }

    // --- dump

    /// A multi-line text description of the data set.
    pub fn dump(&self, options: DumpOptions) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, "", options);
        out
    }

    /// Append one line per item, each line starting with `prefix`.
    pub fn dump_into(&self, out: &mut String, prefix: &str, options: DumpOptions) {
        for item in self.items.values() {
            if item.tag().is_group_length() && !options.keep_group_length_elements {
                continue;
            }
            item.dump(out, prefix, options);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use dcm_core::chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn items_stay_in_tag_order() {
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::PATIENT_NAME, "Doe^John")
            .unwrap();
        ds.add_element_with_value(tags::MODALITY, "MR").unwrap();
        ds.add_element_with_value(tags::ROWS, 16_u16).unwrap();
        ds.add_element_with_value(tags::SPECIFIC_CHARACTER_SET, "ISO_IR 100")
            .unwrap();
        let tags: Vec<Tag> = ds.tags().collect();
        assert_eq!(
            tags,
            vec![
                tags::SPECIFIC_CHARACTER_SET,
                tags::MODALITY,
                tags::PATIENT_NAME,
                tags::ROWS
            ]
        );
    }

    #[test]
    fn value_types_must_fit_the_dictionary_vr() {
        let mut ds = Dataset::default();
        assert!(matches!(
            ds.add_element_with_value(tags::PATIENT_NAME, 3_u16),
            Err(Error::IncorrectVr { .. })
        ));
        ds.add_element_with_value(tags::SERIES_NUMBER, 3_i32).unwrap();
        ds.add_element_with_value(tags::REFERENCE_PIXEL_X0, -3_i32)
            .unwrap();
        ds.add_element_with_value(tags::PATIENT_WEIGHT, 71.5_f64)
            .unwrap();
        ds.add_element_with_value(tags::FRAME_INCREMENT_POINTER, tags::NUMBER_OF_FRAMES)
            .unwrap();

        assert_eq!(ds.get_i32(tags::SERIES_NUMBER, 0).unwrap(), 3);
        assert_eq!(ds.get_i32(tags::REFERENCE_PIXEL_X0, 0).unwrap(), -3);
        assert_eq!(ds.get_f64(tags::PATIENT_WEIGHT, 0.).unwrap(), 71.5);
        assert_eq!(ds.get_f32(tags::PATIENT_WEIGHT, 0.).unwrap(), 71.5);
        assert_eq!(
            ds.get_tag_value(tags::FRAME_INCREMENT_POINTER).unwrap(),
            Some(tags::NUMBER_OF_FRAMES)
        );
    }

    #[test]
    fn absent_is_soft_mismatch_is_hard() {
        let mut ds = Dataset::default();
        assert_eq!(ds.get_u16(tags::ROWS, 7).unwrap(), 7);
        assert_eq!(ds.get_string(tags::PATIENT_ID, "none").unwrap(), "none");
        assert_eq!(ds.get_pn(tags::PATIENT_NAME).unwrap().map(|_| ()), None);

        ds.add_element_with_value(tags::MODALITY, "CT").unwrap();
        assert!(matches!(
            ds.get_us(tags::MODALITY),
            Err(Error::IncorrectVr { .. })
        ));
        assert!(matches!(
            ds.get_f64(tags::MODALITY, 0.),
            Err(Error::IncorrectVr { .. })
        ));

        ds.add_item(Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE))
            .unwrap();
        assert!(matches!(
            ds.get_string(tags::REFERENCED_IMAGE_SEQUENCE, ""),
            Err(Error::ElementIsSequence { .. })
        ));
        assert!(matches!(
            ds.set_string(tags::PATIENT_ID, "x"),
            Err(Error::NoSuchElement { .. })
        ));
    }

    #[test]
    fn empty_elements_read_as_default() {
        let mut ds = Dataset::default();
        ds.add_element(tags::ROWS).unwrap();
        ds.add_element(tags::SERIES_NUMBER).unwrap();
        assert_eq!(ds.get_u16(tags::ROWS, 9).unwrap(), 9);
        assert_eq!(ds.get_i32(tags::SERIES_NUMBER, -1).unwrap(), -1);
        assert_eq!(ds.get_uid(tags::SOP_INSTANCE_UID).unwrap(), None);
    }

    #[test]
    fn string_arrays() {
        let mut ds = Dataset::default();
        ds.add_element(tags::IMAGE_TYPE).unwrap();
        ds.set_string_array(tags::IMAGE_TYPE, &["ORIGINAL", "PRIMARY"])
            .unwrap();
        assert_eq!(
            ds.get_string_array(tags::IMAGE_TYPE, &[]).unwrap(),
            vec!["ORIGINAL".to_string(), "PRIMARY".to_string()]
        );
        assert_eq!(ds.get_string_at(tags::IMAGE_TYPE, 1, "").unwrap(), "PRIMARY");
        assert_eq!(
            ds.get_string_array(tags::PATIENT_ID, &["x"]).unwrap(),
            vec!["x".to_string()]
        );
    }

    #[test]
    fn dates_and_times() {
        let mut ds = Dataset::default();
        let when = NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(13, 45, 10)
            .unwrap();
        ds.set_date_and_time(tags::STUDY_DATE, tags::STUDY_TIME, when)
            .unwrap();
        assert_eq!(ds.get_string(tags::STUDY_DATE, "").unwrap(), "20230615");
        assert_eq!(ds.get_string(tags::STUDY_TIME, "").unwrap(), "134510");
        assert_eq!(
            ds.get_date_and_time(tags::STUDY_DATE, Some(tags::STUDY_TIME), day(2000, 1, 1))
                .unwrap(),
            when
        );
        assert_eq!(
            ds.get_date_and_time(tags::SERIES_DATE, None, day(2000, 1, 1))
                .unwrap(),
            day(2000, 1, 1)
        );
        assert_eq!(
            ds.get_datetime_at(tags::STUDY_DATE, 3, day(1999, 1, 1))
                .unwrap(),
            day(1999, 1, 1)
        );
    }

    #[test]
    fn group_lengths_are_synthesized() {
        let ts = dcm_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::MODALITY, "MR").unwrap();
        ds.add_element_with_value(tags::ROWS, 4_u16).unwrap();
        ds.add_element_with_value(tags::COLUMNS, 4_u16).unwrap();
        // a stored group length element is never counted
        ds.add_element_with_value_string(Tag(0x0028, 0x0000), "20")
            .unwrap();

        let elements = (8 + 2) + (8 + 2) + (8 + 2);
        assert_eq!(ds.write_length(&ts, WriteOptions::none()), elements);
        assert_eq!(
            ds.write_length(&ts, WriteOptions::default()),
            elements + 2 * 12
        );
        assert_eq!(
            ds.calculate_group_write_length(0x0028, &ts, WriteOptions::none()),
            20
        );
    }

    #[test]
    fn clones_are_deep_and_share_user_state() {
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::PATIENT_ID, "A").unwrap();
        ds.set_user_state(Some(Arc::new(42_u32)));

        let mut copy = ds.clone();
        copy.set_string(tags::PATIENT_ID, "B").unwrap();
        assert_eq!(ds.get_string(tags::PATIENT_ID, "").unwrap(), "A");
        assert!(Arc::ptr_eq(
            ds.user_state().unwrap(),
            copy.user_state().unwrap()
        ));
    }

    #[test]
    fn masks_and_merge() {
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::ROWS, 4_u16).unwrap();
        ds.add_element_with_value(tags::COLUMNS, 4_u16).unwrap();
        ds.add_element_with_value(tags::MODALITY, "MR").unwrap();

        let mut other = Dataset::default();
        other.add_element_with_value(tags::MODALITY, "CT").unwrap();
        ds.merge(other).unwrap();
        assert_eq!(ds.get_string(tags::MODALITY, "").unwrap(), "CT");

        let mask: TagMask = "(0028,xxxx)".parse().unwrap();
        assert_eq!(ds.masked_tags(mask).count(), 2);
        ds.remove_masked(mask);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn original_attributes_keep_present_values() {
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::PATIENT_NAME, "Doe^John")
            .unwrap();
        ds.create_original_attributes_sequence(
            "HOSPITAL",
            "ANONYMIZER",
            "COERCE",
            vec![tags::PATIENT_NAME, tags::PATIENT_ID],
        )
        .unwrap();
        ds.create_original_attributes_sequence("HOSPITAL", "ANONYMIZER", "CORRECT", vec![])
            .unwrap();

        let sq = ds
            .get_sq(tags::ORIGINAL_ATTRIBUTES_SEQUENCE)
            .unwrap()
            .unwrap();
        assert_eq!(sq.items().len(), 2);
        let first = sq.items()[0].dataset();
        assert_eq!(first.get_string(tags::MODIFYING_SYSTEM, "").unwrap(), "ANONYMIZER");
        let modified = first
            .get_sq(tags::MODIFIED_ATTRIBUTES_SEQUENCE)
            .unwrap()
            .unwrap();
        let kept = modified.items()[0].dataset();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get_string(tags::PATIENT_NAME, "").unwrap(), "Doe^John");
    }

    #[test]
    fn reference_items_accumulate() {
        let mut ds = Dataset::default();
        let class = Uid::unknown("1.2.840.10008.5.1.4.1.1.2");
        for instance in &["1.2.3.1", "1.2.3.2"] {
            ds.add_reference_sequence_item(
                tags::REFERENCED_IMAGE_SEQUENCE,
                &class,
                &Uid::unknown(*instance),
            )
            .unwrap();
        }
        let sq = ds.get_sq(tags::REFERENCED_IMAGE_SEQUENCE).unwrap().unwrap();
        assert_eq!(sq.items().len(), 2);
        assert_eq!(
            sq.items()[1]
                .dataset()
                .get_string(tags::REFERENCED_SOP_INSTANCE_UID, "")
                .unwrap(),
            "1.2.3.2"
        );
    }

    #[test]
    fn group_length_elements_hidden_from_dump() {
        let mut ds = Dataset::default();
        ds.add_element_with_value_string(Tag(0x0008, 0x0000), "10")
            .unwrap();
        ds.add_element_with_value(tags::MODALITY, "MR").unwrap();
        assert_eq!(ds.dump(DumpOptions::default()).lines().count(), 1);

        let mut options = DumpOptions::default();
        options.keep_group_length_elements(true);
        assert_eq!(ds.dump(options).lines().count(), 2);
    }
}
