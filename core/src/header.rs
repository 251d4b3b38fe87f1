//! This module contains the basic addressing types of the data model:
//! the attribute tag, tag masks for bulk selection,
//! and the byte length of element values.

use crate::vr::VR;
use snafu::{ensure, Backtrace, OptionExt, Snafu};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing a tag or tag mask from its textual form.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ParseTagError {
    /// The text is not of the form `(gggg,eeee)` or `ggggeeee`.
    #[snafu(display("Invalid tag syntax `{}`", text))]
    Syntax { text: String, backtrace: Backtrace },
    /// A digit is not hexadecimal (nor a wildcard, when parsing masks).
    #[snafu(display("Invalid digit `{}` in `{}`", digit, text))]
    Digit {
        digit: char,
        text: String,
        backtrace: Backtrace,
    },
}

type Result<T, E = ParseTagError> = std::result::Result<T, E>;

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for attribute tags.
///
/// Tags are totally ordered by `(group, element)`,
/// which is also the order of items in a data set.
/// Both `(u16, u16)` and `[u16; 2]` can be converted to this type.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// The tag packed into a single 32-bit number,
    /// group in the upper half.
    #[inline]
    pub fn card(self) -> u32 {
        (u32::from(self.0) << 16) | u32::from(self.1)
    }

    /// Build a tag from its packed 32-bit form.
    #[inline]
    pub fn from_card(card: u32) -> Self {
        Tag((card >> 16) as u16, card as u16)
    }

    /// Whether this tag belongs to a private group (odd group number).
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether this is a group length tag `(gggg,0000)`.
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// Parse a tag from either `(gggg,eeee)` or `ggggeeee` notation.
impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self> {
        let mask = TagMask::from_str(s)?;
        ensure!(mask.mask == 0xFFFF_FFFF, SyntaxSnafu { text: s });
        Ok(Tag::from_card(mask.card))
    }
}

/// A tag pattern in which any hexadecimal digit may be a wildcard.
///
/// A tag matches the mask when all of the non-wildcard nibbles are equal.
/// In textual form, wildcards are written as `x`, as in `(0010,xxxx)`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TagMask {
    card: u32,
    mask: u32,
}

impl TagMask {
    /// Create a mask from a packed tag and the bits which must match.
    pub fn new(card: u32, mask: u32) -> Self {
        TagMask {
            card: card & mask,
            mask,
        }
    }

    /// A mask matching every tag of the given group.
    pub fn group(group: GroupNumber) -> Self {
        TagMask::new(u32::from(group) << 16, 0xFFFF_0000)
    }

    /// A mask matching exactly one tag.
    pub fn exact(tag: Tag) -> Self {
        TagMask::new(tag.card(), 0xFFFF_FFFF)
    }

    /// Check whether the given tag is selected by this mask.
    #[inline]
    pub fn matches(&self, tag: Tag) -> bool {
        tag.card() & self.mask == self.card
    }
}

impl From<Tag> for TagMask {
    fn from(tag: Tag) -> Self {
        TagMask::exact(tag)
    }
}

impl FromStr for TagMask {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits: smallvec::SmallVec<[char; 8]> =
            if trimmed.starts_with('(') && trimmed.ends_with(')') {
                let inner = &trimmed[1..trimmed.len() - 1];
                let (group, element) = inner.split_once(',').context(SyntaxSnafu { text: s })?;
                group.trim().chars().chain(element.trim().chars()).collect()
            } else {
                trimmed.chars().collect()
            };
        ensure!(digits.len() == 8, SyntaxSnafu { text: s });

        let mut card = 0u32;
        let mut mask = 0u32;
        for &c in &digits {
            card <<= 4;
            mask <<= 4;
            if c == 'x' || c == 'X' {
                continue;
            }
            let d = c.to_digit(16).context(DigitSnafu { digit: c, text: s })?;
            card |= d;
            mask |= 0xF;
        }
        Ok(TagMask::new(card, mask))
    }
}

impl fmt::Display for TagMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("(")?;
        for i in (0..8).rev() {
            if i == 3 {
                f.write_str(",")?;
            }
            let shift = i * 4;
            if (self.mask >> shift) & 0xF == 0 {
                f.write_str("x")?;
            } else {
                write!(f, "{:X}", (self.card >> shift) & 0xF)?;
            }
        }
        f.write_str(")")
    }
}

/// A type for representing data set content length, in bytes.
/// An internal value of `0xFFFF_FFFF` represents an undefined
/// (unspecified) length.
///
/// Two undefined lengths are not equal,
/// and comparisons involving an undefined length are always `false`.
///
/// ```
/// # use dcm_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!(Length::defined(16) < Length::defined(64));
/// assert!(!(Length::UNDEFINED < Length::defined(64)));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value with the given number of bytes.
    ///
    /// # Panic
    ///
    /// This function will panic if `len` represents an undefined length.
    #[inline]
    pub fn defined(len: u32) -> Self {
        assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined (unknown).
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }
}

impl From<u32> for Length {
    #[inline]
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

/// A trait for anything placed in a data set,
/// identified by a tag and typed by a value representation.
pub trait Header {
    /// Retrieve the entity's tag.
    fn tag(&self) -> Tag;

    /// Retrieve the entity's value representation.
    fn vr(&self) -> VR;

    /// Check whether this is the pixel data attribute.
    fn is_pixel_data(&self) -> bool {
        self.tag() == Tag(0x7FE0, 0x0010)
    }
}
