//! Module containing the transfer syntax descriptor.
//!
//! A transfer syntax states how a data set is laid out on the wire:
//! byte order, whether the VR is written explicitly,
//! and whether pixel data is encapsulated (compressed), lossy or deflated.
//!
//! This crate does not host specific transfer syntaxes.
//! They are listed in the transfer syntax registry, which implements
//! [`TransferSyntaxIndex`].
//!
//! [`TransferSyntaxIndex`]: ./trait.TransferSyntaxIndex.html

use std::borrow::Cow;
use std::fmt;

pub use byteordered::Endianness;

/// A DICOM transfer syntax specifier.
#[derive(Debug, Clone)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: Cow<'static, str>,
    /// The name of the transfer syntax.
    name: Cow<'static, str>,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// Whether pixel data is encapsulated in fragments.
    encapsulated: bool,
    /// Whether pixel data went through lossy compression.
    lossy: bool,
    /// Whether the whole data set is deflated.
    deflate: bool,
}

impl TransferSyntax {
    /// Create a new transfer syntax descriptor.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        encapsulated: bool,
        lossy: bool,
        deflate: bool,
    ) -> Self {
        TransferSyntax {
            uid: Cow::Borrowed(uid),
            name: Cow::Borrowed(name),
            byte_order,
            explicit_vr,
            encapsulated,
            lossy,
            deflate,
        }
    }

    /// Describe a transfer syntax which is not known.
    ///
    /// It is assumed to be an explicit VR little endian syntax
    /// with encapsulated, lossless pixel data.
    pub fn unknown(uid: impl Into<String>) -> Self {
        let uid = uid.into();
        TransferSyntax {
            name: Cow::Owned(uid.clone()),
            uid: Cow::Owned(uid),
            byte_order: Endianness::Little,
            explicit_vr: true,
            encapsulated: true,
            lossy: false,
            deflate: false,
        }
    }

    /// Obtain this transfer syntax' unique identifier.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Whether data is stored in big endian.
    pub fn is_big_endian(&self) -> bool {
        self.byte_order == Endianness::Big
    }

    /// Obtain whether this transfer syntax expects an explicit VR.
    pub fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Whether pixel data is encapsulated.
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }

    /// Whether pixel data compression is lossy.
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    /// Whether the data set is deflated.
    pub fn is_deflated(&self) -> bool {
        self.deflate
    }
}

/// Transfer syntaxes are identified by their UID alone.
impl PartialEq for TransferSyntax {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for TransferSyntax {}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Trait for containers of transfer syntax specifiers.
pub trait TransferSyntaxIndex {
    /// Obtain a DICOM transfer syntax by its respective UID.
    ///
    /// Implementations of this method should be robust to the possible
    /// presence of a trailing null characters (`\0`) in `uid`.
    fn get(&self, uid: &str) -> Option<&TransferSyntax>;
}

impl<T: ?Sized> TransferSyntaxIndex for &T
where
    T: TransferSyntaxIndex,
{
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        (**self).get(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_syntax_defaults() {
        let ts = TransferSyntax::unknown("1.2.3.4");
        assert_eq!(ts.uid(), "1.2.3.4");
        assert_eq!(ts.endianness(), Endianness::Little);
        assert!(ts.is_explicit_vr());
        assert!(ts.is_encapsulated());
        assert!(!ts.is_lossy());
        assert!(!ts.is_deflated());
    }

    #[test]
    fn equality_by_uid() {
        const A: TransferSyntax =
            TransferSyntax::new("1.2.3", "A", Endianness::Little, true, false, false, false);
        let b = TransferSyntax::unknown("1.2.3");
        assert_eq!(A, b);
        assert_eq!(A.to_string(), "A");
    }
}
