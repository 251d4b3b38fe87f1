//! This module contains the concept of a DICOM data dictionary.
//!
//! Dictionaries are pure lookup tables: the data model consults them
//! for the default value representation and the display name of a tag,
//! and for the description of a unique identifier.

use crate::header::Tag;
use crate::uid::Uid;
use crate::vr::VR;
use std::fmt::Debug;

/** Type trait for a dictionary of DICOM attributes.
 *
 * The methods herein have no generic parameters, so as to enable being
 * used as a trait object.
 */
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its usual alias (e.g. "PatientName" or "SOPInstanceUID").
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// The typical value representation of the attribute.
    ///
    /// Group length tags resolve to `UL`, unknown tags to `UN`.
    fn default_vr(&self, tag: Tag) -> VR {
        match self.by_tag(tag) {
            Some(e) => e.vr(),
            None if tag.is_group_length() => VR::UL,
            None => VR::UN,
        }
    }

    /// The human readable name of the attribute.
    fn name_of(&self, tag: Tag) -> &str {
        match self.by_tag(tag) {
            Some(e) => e.name(),
            None if tag.is_group_length() => "Group Length",
            None if tag.is_private() => "Private Tag",
            None => "Unknown",
        }
    }
}

/// The dictionary entry data type, representing a DICOM attribute.
pub trait DictionaryEntry {
    /// The attribute tag.
    fn tag(&self) -> Tag;
    /// The alias of the attribute, with no spaces, in UpperCamelCase.
    fn alias(&self) -> &str;
    /// The human readable name of the attribute.
    fn name(&self) -> &str;
    /// The _typical_ value representation of the attribute.
    fn vr(&self) -> VR;
}

/// A data type for a dictionary entry with string slices for its names.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag
    pub tag: Tag,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase
    pub alias: &'a str,
    /// The display name of the attribute
    pub name: &'a str,
    /// The _typical_ value representation of the attribute
    pub vr: VR,
}

impl<'a> DictionaryEntry for DictionaryEntryRef<'a> {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn name(&self) -> &str {
        self.name
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// Type trait for a dictionary of well-known unique identifiers.
pub trait UidDictionary: Debug {
    /// Fetch a known UID by its value.
    ///
    /// Trailing NUL padding is ignored.
    fn by_uid(&self, uid: &str) -> Option<&Uid>;

    /// Resolve a UID string, producing an entry of unknown type
    /// when the UID is not in the dictionary.
    fn lookup(&self, uid: &str) -> Uid {
        let uid = uid.trim_end_matches(|c| c == '\0' || c == ' ');
        match self.by_uid(uid) {
            Some(known) => known.clone(),
            None => Uid::unknown(uid.to_string()),
        }
    }
}
