//! This crate contains the DICOM transfer syntax registry.
//! The transfer syntax registry maps a DICOM UID of a transfer syntax into the
//! respective transfer syntax specifier.
//!
//! ```
//! use dcm_transfer_syntax_registry::{entries, lookup, TransferSyntaxRegistry};
//! use dcm_encoding::TransferSyntaxIndex;
//!
//! let ts = TransferSyntaxRegistry.get("1.2.840.10008.1.2.2\0").unwrap();
//! assert!(ts.is_big_endian());
//! assert_eq!(ts, &entries::EXPLICIT_VR_BIG_ENDIAN);
//!
//! // unknown syntaxes are assumed to be encapsulated
//! assert!(lookup("1.2.3.4").is_encapsulated());
//! ```

pub mod entries;

use dcm_encoding::transfer_syntax::{TransferSyntax, TransferSyntaxIndex};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Data type for a registry of DICOM transfer syntaxes.
pub struct TransferSyntaxRegistryImpl {
    m: HashMap<&'static str, TransferSyntax>,
}

impl fmt::Debug for TransferSyntaxRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: HashMap<&str, &str> =
            self.m.iter().map(|(uid, ts)| (*uid, ts.name())).collect();
        f.debug_struct("TransferSyntaxRegistryImpl")
            .field("m", &entries)
            .finish()
    }
}

impl TransferSyntaxRegistryImpl {
    /// Obtain an iterator of all registered transfer syntaxes.
    pub fn iter(&self) -> impl Iterator<Item = &TransferSyntax> {
        self.m.values()
    }

    /// Obtain a transfer syntax by its UID.
    ///
    /// A trailing null character in `uid` is ignored.
    fn get<U: AsRef<str>>(&self, uid: U) -> Option<&TransferSyntax> {
        let uid = uid.as_ref();
        let ts_uid = uid.strip_suffix('\0').unwrap_or(uid);
        self.m.get(ts_uid)
    }

    fn register(&mut self, ts: &'static TransferSyntax) {
        self.m.insert(ts.uid(), ts.clone());
    }
}

lazy_static! {
    static ref REGISTRY: TransferSyntaxRegistryImpl = {
        let mut registry = TransferSyntaxRegistryImpl {
            m: HashMap::with_capacity(entries::ALL.len()),
        };
        for ts in entries::ALL {
            registry.register(ts);
        }
        registry
    };
}

/// Zero-sized representative of the main transfer syntax registry.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxRegistry {
    /// Obtain an iterator of all registered transfer syntaxes.
    pub fn iter(&self) -> impl Iterator<Item = &TransferSyntax> {
        get_registry().iter()
    }
}

impl TransferSyntaxIndex for TransferSyntaxRegistry {
    #[inline]
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        get_registry().get(uid)
    }
}

/// Retrieve the default transfer syntax.
pub fn default() -> TransferSyntax {
    entries::IMPLICIT_VR_LITTLE_ENDIAN
}

/// Retrieve a reference to the global registry.
#[inline]
pub fn get_registry() -> &'static TransferSyntaxRegistryImpl {
    &REGISTRY
}

/// Resolve a transfer syntax UID into its specifier.
///
/// Unknown UIDs resolve to an explicit VR little endian descriptor
/// with encapsulated, lossless pixel data, named after the UID itself.
pub fn lookup(uid: &str) -> TransferSyntax {
    let uid = uid.trim_end_matches(|c| c == '\0' || c == ' ');
    match get_registry().get(uid) {
        Some(ts) => ts.clone(),
        None => {
            tracing::warn!("Unknown transfer syntax {}, assuming encapsulated data", uid);
            TransferSyntax::unknown(uid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteordered::Endianness;

    #[test]
    fn has_all_known_syntaxes() {
        assert_eq!(TransferSyntaxRegistry.iter().count(), 28);

        let ts = TransferSyntaxRegistry.get("1.2.840.10008.1.2").unwrap();
        assert_eq!(ts.name(), "Implicit VR Little Endian");
        assert!(!ts.is_explicit_vr());
        assert_eq!(ts.endianness(), Endianness::Little);
        assert_eq!(ts, &default());
    }

    #[test]
    fn flags_of_compressed_syntaxes() {
        let baseline = TransferSyntaxRegistry.get("1.2.840.10008.1.2.4.50").unwrap();
        assert!(baseline.is_encapsulated());
        assert!(baseline.is_lossy());

        let lossless = TransferSyntaxRegistry.get("1.2.840.10008.1.2.4.70").unwrap();
        assert!(lossless.is_encapsulated());
        assert!(!lossless.is_lossy());

        let deflated = lookup(entries::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN.uid());
        assert!(deflated.is_deflated());
        assert!(!deflated.is_encapsulated());
    }

    #[test]
    fn trailing_padding_is_ignored() {
        assert!(TransferSyntaxRegistry.get("1.2.840.10008.1.2.5\0").is_some());
        assert_eq!(lookup("1.2.840.10008.1.2.1\0"), entries::EXPLICIT_VR_LITTLE_ENDIAN);
    }

    #[test]
    fn unknown_syntax_is_encapsulated_little_endian() {
        let ts = lookup("1.2.3.4.5");
        assert_eq!(ts.uid(), "1.2.3.4.5");
        assert_eq!(ts.name(), "1.2.3.4.5");
        assert!(ts.is_explicit_vr());
        assert!(ts.is_encapsulated());
        assert!(!ts.is_lossy());
        assert!(!ts.is_big_endian());
    }
}
