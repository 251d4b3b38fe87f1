//! Data element dictionary implementation

use crate::tags::ENTRIES;
use dcm_core::dictionary::{DataDictionary, DictionaryEntryRef};
use dcm_core::header::Tag;
use dcm_core::VR;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

static DICT: Lazy<StandardDataDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// The unit type [`StandardDataDictionary`]
/// already provides a lazy loaded singleton implementing the necessary traits.
#[inline]
pub fn registry() -> &'static StandardDataDictionaryRegistry {
    &DICT
}

/// The data struct actually containing the standard dictionary.
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: alias → entry
    by_name: HashMap<&'static str, &'static DictionaryEntryRef<'static>>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, &'static DictionaryEntryRef<'static>>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> StandardDataDictionaryRegistry {
        StandardDataDictionaryRegistry {
            by_name: HashMap::with_capacity(ENTRIES.len()),
            by_tag: HashMap::with_capacity(ENTRIES.len()),
        }
    }

    fn index(&mut self, entry: &'static DictionaryEntryRef<'static>) -> &mut Self {
        self.by_name.insert(entry.alias, entry);
        self.by_tag.insert(entry.tag, entry);
        self
    }

    /// The number of indexed attributes.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Whether the registry holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Generic Private Creator dictionary entry.
static PRIVATE_CREATOR_ENTRY: DictionaryEntryRef<'static> = DictionaryEntryRef {
    tag: Tag(0x0009, 0x0010),
    alias: "PrivateCreator",
    name: "Private Creator",
    vr: VR::LO,
};

/// A data element dictionary which consults
/// the library's global DICOM attribute registry.
///
/// This is the type which would generally be used
/// whenever a data element dictionary is needed,
/// such as when creating elements from a tag alone.
///
/// The dictionary index is automatically initialized upon the first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl StandardDataDictionary {
    fn indexed_tag(tag: Tag) -> Option<&'static DictionaryEntryRef<'static>> {
        registry().by_tag.get(&tag).copied().or_else(|| {
            // private creator elements reserve a block of the private group
            if tag.is_private() && (0x0010..=0x00FF).contains(&tag.1) {
                return Some(&PRIVATE_CREATOR_ENTRY);
            }
            None
        })
    }
}

impl DataDictionary for StandardDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&DictionaryEntryRef<'static>> {
        registry().by_name.get(name).copied()
    }

    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntryRef<'static>> {
        StandardDataDictionary::indexed_tag(tag)
    }
}

impl<'a> DataDictionary for &'a StandardDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&DictionaryEntryRef<'static>> {
        registry().by_name.get(name).copied()
    }

    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntryRef<'static>> {
        StandardDataDictionary::indexed_tag(tag)
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index(entry);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::StandardDataDictionary;
    use crate::tags;
    use dcm_core::dictionary::{DataDictionary, DictionaryEntry};
    use dcm_core::header::Tag;
    use dcm_core::VR;

    // tests for just a few attributes to make sure that the entries
    // were well installed into the crate
    #[test]
    fn smoke_test() {
        let dict = StandardDataDictionary;

        let entry = dict.by_name("PatientName").expect("PatientName should exist");
        assert_eq!(entry.tag(), Tag(0x0010, 0x0010));
        assert_eq!(entry.vr(), VR::PN);
        assert_eq!(entry.name(), "Patient's Name");

        let entry = dict.by_tag(tags::MODALITY).expect("Modality should exist");
        assert_eq!(entry.alias(), "Modality");
        assert_eq!(entry.vr(), VR::CS);

        let entry = dict.by_tag(tags::PIXEL_DATA).expect("PixelData should exist");
        assert_eq!(entry.vr(), VR::OW);

        assert_eq!(dict.by_tag(tags::ITEM).map(|e| e.vr()), Some(VR::NONE));
    }

    #[test]
    fn fallback_names_and_vrs() {
        let dict = StandardDataDictionary;

        assert_eq!(dict.default_vr(Tag(0x0028, 0x0000)), VR::UL);
        assert_eq!(dict.name_of(Tag(0x0028, 0x0000)), "Group Length");

        assert_eq!(dict.default_vr(Tag(0x0011, 0x1001)), VR::UN);
        assert_eq!(dict.name_of(Tag(0x0011, 0x1001)), "Private Tag");

        assert_eq!(dict.default_vr(Tag(0x0011, 0x0010)), VR::LO);
        assert_eq!(dict.name_of(Tag(0x0011, 0x0010)), "Private Creator");

        assert_eq!(dict.name_of(Tag(0x0020, 0x9999)), "Unknown");
    }

    #[test]
    fn aliases_are_unique() {
        let dict = StandardDataDictionary;
        for entry in crate::tags::ENTRIES {
            let found = dict.by_name(entry.alias).unwrap();
            assert_eq!(found.tag(), entry.tag());
        }
        assert_eq!(super::registry().len(), crate::tags::ENTRIES.len());
    }
}
