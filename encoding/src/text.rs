//! This module contains reusable components for encoding and decoding text
//! in DICOM data structures, according to the specific character set.
//!
//! The Specific Character Set (0008,0005) attribute holds a defined term,
//! which is mapped to a character encoding through a fixed table.
//! Terms that are not in the table fall back to the default repertoire.
//! Please see [`SpecificCharacterSet`] for the supported encodings.
//!
//! [`SpecificCharacterSet`]: ./enum.SpecificCharacterSet.html

use encoding::all::{
    ASCII, GB18030, ISO_2022_JP, ISO_8859_1, ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5,
    ISO_8859_6, ISO_8859_7, ISO_8859_8, UTF_8, WINDOWS_1254, WINDOWS_31J, WINDOWS_874,
    WINDOWS_949,
};
use encoding::{DecoderTrap, EncoderTrap, Encoding, EncodingRef, RawDecoder, StringWriter};
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;

/// An error type for text encoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    EncodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

/// An error type for text decoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    DecodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

type EncodeResult<T> = Result<T, EncodeTextError>;
type DecodeResult<T> = Result<T, DecodeTextError>;

/// A holder of encoding and decoding mechanisms for text in DICOM content,
/// which according to the standard, depends on the specific character set.
pub trait TextCodec {
    /// Obtain the defined term of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008,0005) element to refer to this codec.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting string
    /// _may_ contain backslash characters ('\') to delimit individual values.
    fn decode(&self, text: &[u8]) -> DecodeResult<String>;

    /// Encode a text value into a byte vector.
    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>>;
}

impl<'a, T: ?Sized> TextCodec for &'a T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        (**self).decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        (**self).encode(text)
    }
}

/// An enum type for all supported character encodings.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq, PartialOrd, Ord, Default)]
pub enum SpecificCharacterSet {
    /// **ISO-IR 6**: the default (ASCII) repertoire.
    #[default]
    Default,
    /// **ISO-IR 100** (ISO-8859-1): Latin alphabet no. 1.
    IsoIr100,
    /// **ISO-IR 101** (ISO-8859-2): Latin alphabet no. 2.
    IsoIr101,
    /// **ISO-IR 109** (ISO-8859-3): Latin alphabet no. 3.
    IsoIr109,
    /// **ISO-IR 110** (ISO-8859-4): Latin alphabet no. 4.
    IsoIr110,
    /// **ISO-IR 144** (ISO-8859-5): Latin/Cyrillic.
    IsoIr144,
    /// **ISO-IR 127** (ISO-8859-6): Latin/Arabic.
    IsoIr127,
    /// **ISO-IR 126** (ISO-8859-7): Latin/Greek.
    IsoIr126,
    /// **ISO-IR 138** (ISO-8859-8): Latin/Hebrew.
    IsoIr138,
    /// **ISO-IR 148** (ISO-8859-9): Latin alphabet no. 5, Turkish.
    IsoIr148,
    /// **ISO-IR 13**: JIS X 0201, as Shift JIS.
    IsoIr13,
    /// **ISO-IR 166**: TIS 620-2533, Thai.
    IsoIr166,
    /// **ISO-IR 192**: Unicode in UTF-8.
    IsoIr192,
    /// **ISO 2022 IR 87**: JIS X 0208 and JIS X 0212 through ISO 2022 escapes.
    Iso2022Ir87,
    /// **ISO 2022 IR 149**: KS X 1001, Korean.
    Iso2022Ir149,
    /// **GB18030**: Simplified Chinese.
    Gb18030,
}

/// The table of defined terms, in lookup order.
///
/// Several terms share one encoding,
/// in which case the first term is the one written back.
static DEFINED_TERMS: &[(&str, SpecificCharacterSet)] = {
    use SpecificCharacterSet::*;
    &[
        ("ISO_IR 100", IsoIr100),
        ("ISO_IR 101", IsoIr101),
        ("ISO_IR 109", IsoIr109),
        ("ISO_IR 110", IsoIr110),
        ("ISO_IR 144", IsoIr144),
        ("ISO_IR 127", IsoIr127),
        ("ISO_IR 126", IsoIr126),
        ("ISO_IR 138", IsoIr138),
        ("ISO_IR 148", IsoIr148),
        ("ISO_IR 13", IsoIr13),
        ("ISO_IR 166", IsoIr166),
        ("ISO_IR 192", IsoIr192),
        ("ISO 2022 IR 6", Default),
        ("ISO 2022 IR 100", IsoIr100),
        ("ISO 2022 IR 101", IsoIr101),
        ("ISO 2022 IR 109", IsoIr109),
        ("ISO 2022 IR 110", IsoIr110),
        ("ISO 2022 IR 144", IsoIr144),
        ("ISO 2022 IR 127", IsoIr127),
        ("ISO 2022 IR 126", IsoIr126),
        ("ISO 2022 IR 138", IsoIr138),
        ("ISO 2022 IR 148", IsoIr148),
        ("ISO 2022 IR 13", Iso2022Ir87),
        ("ISO 2022 IR 166", IsoIr166),
        ("ISO 2022 IR 87", Iso2022Ir87),
        ("ISO 2022 IR 159", Iso2022Ir87),
        ("ISO 2022 IR 149", Iso2022Ir149),
        ("GB18030", Gb18030),
    ]
};

impl SpecificCharacterSet {
    /// Obtain the specific character set identified by the given defined term,
    /// ignoring surrounding padding.
    ///
    /// Unknown or empty terms resolve to the default repertoire.
    ///
    /// # Example
    ///
    /// ```
    /// # use dcm_encoding::text::SpecificCharacterSet;
    /// let character_set = SpecificCharacterSet::from_term("ISO_IR 100");
    /// assert_eq!(character_set, SpecificCharacterSet::IsoIr100);
    /// assert_eq!(SpecificCharacterSet::from_term("X"), SpecificCharacterSet::Default);
    /// ```
    pub fn from_term(term: &str) -> Self {
        Self::from_code(term).unwrap_or_default()
    }

    /// Obtain the specific character set identified by the given defined term,
    /// if it is in the table.
    pub fn from_code(term: &str) -> Option<Self> {
        let term = term.trim_matches(|c| c == ' ' || c == '\0');
        DEFINED_TERMS
            .iter()
            .find(|(t, _)| *t == term)
            .map(|(_, cs)| *cs)
    }

    /// The defined term written back to the Specific Character Set attribute,
    /// the first term of the table which maps to this encoding.
    pub fn defined_term(self) -> &'static str {
        DEFINED_TERMS
            .iter()
            .find(|(_, cs)| *cs == self)
            .map(|(t, _)| *t)
            .unwrap_or("ISO 2022 IR 6")
    }

    fn encoding(self) -> EncodingRef {
        use SpecificCharacterSet::*;
        match self {
            Default => ASCII,
            IsoIr100 => ISO_8859_1,
            IsoIr101 => ISO_8859_2,
            IsoIr109 => ISO_8859_3,
            IsoIr110 => ISO_8859_4,
            IsoIr144 => ISO_8859_5,
            IsoIr127 => ISO_8859_6,
            IsoIr126 => ISO_8859_7,
            IsoIr138 => ISO_8859_8,
            // ISO-8859-9 differs from windows-1254 only in the C1 range
            IsoIr148 => WINDOWS_1254,
            IsoIr13 => WINDOWS_31J,
            IsoIr166 => WINDOWS_874,
            IsoIr192 => UTF_8,
            Iso2022Ir87 => ISO_2022_JP,
            Iso2022Ir149 => WINDOWS_949,
            Gb18030 => GB18030,
        }
    }
}

impl TextCodec for SpecificCharacterSet {
    fn name(&self) -> &'static str {
        self.defined_term()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        let encoding: EncodingRef = match self {
            // ISO 8859-1 is a superset, so stray high bytes survive decoding
            SpecificCharacterSet::Default => ISO_8859_1,
            other => other.encoding(),
        };
        encoding
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(|message| DecodeCustomSnafu { message }.build())
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        self.encoding()
            .encode(text, EncoderTrap::Strict)
            .map_err(|message| EncodeCustomSnafu { message }.build())
    }
}

fn decode_text_trap(
    _decoder: &mut dyn RawDecoder,
    input: &[u8],
    output: &mut dyn StringWriter,
) -> bool {
    let c = input[0];
    let o0 = c & 7;
    let o1 = (c & 56) >> 3;
    let o2 = (c & 192) >> 6;
    output.write_char('\\');
    output.write_char((o2 + b'0') as char);
    output.write_char((o1 + b'0') as char);
    output.write_char((o0 + b'0') as char);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec<T>(codec: T, string: &str, bytes: &[u8])
    where
        T: TextCodec,
    {
        assert_eq!(codec.encode(string).expect("encoding"), bytes);
        assert_eq!(codec.decode(bytes).expect("decoding"), string);
    }

    #[test]
    fn iso_ir_6_baseline() {
        let codec = SpecificCharacterSet::Default;
        test_codec(codec, "Smith^John", b"Smith^John");
        assert!(codec.encode("Simões").is_err());
    }

    #[test]
    fn iso_ir_192_baseline() {
        let codec = SpecificCharacterSet::IsoIr192;
        test_codec(&codec, "Simões^John", "Simões^John".as_bytes());
        test_codec(codec, "Иванков^Андрей", "Иванков^Андрей".as_bytes());
    }

    #[test]
    fn iso_ir_100_baseline() {
        let codec = SpecificCharacterSet::IsoIr100;
        test_codec(&codec, "Simões^João", b"Sim\xF5es^Jo\xE3o");
        test_codec(codec, "Günther^Hans", b"G\xfcnther^Hans");
    }

    #[test]
    fn iso_ir_144_baseline() {
        let codec = SpecificCharacterSet::IsoIr144;
        test_codec(
            codec,
            "Иванков^Андрей",
            b"\xb8\xd2\xd0\xdd\xda\xde\xd2^\xb0\xdd\xd4\xe0\xd5\xd9",
        );
    }

    #[test]
    fn iso_ir_126_baseline() {
        let codec = SpecificCharacterSet::IsoIr126;
        test_codec(codec, "Διονυσιος", b"\xc4\xe9\xef\xed\xf5\xf3\xe9\xef\xf2");
    }

    #[test]
    fn terms_resolve_through_table() {
        use SpecificCharacterSet::*;
        assert_eq!(SpecificCharacterSet::from_term("ISO_IR 192"), IsoIr192);
        assert_eq!(SpecificCharacterSet::from_term("ISO_IR 192 "), IsoIr192);
        assert_eq!(SpecificCharacterSet::from_term("ISO 2022 IR 100"), IsoIr100);
        assert_eq!(SpecificCharacterSet::from_term("ISO 2022 IR 159"), Iso2022Ir87);
        assert_eq!(SpecificCharacterSet::from_term(""), Default);
        assert_eq!(SpecificCharacterSet::from_term("KLINGON"), Default);
        assert_eq!(SpecificCharacterSet::from_code("KLINGON"), None);
        assert_eq!(DEFINED_TERMS.len(), 28);
    }

    #[test]
    fn first_term_is_written_back() {
        use SpecificCharacterSet::*;
        assert_eq!(IsoIr100.defined_term(), "ISO_IR 100");
        assert_eq!(Default.defined_term(), "ISO 2022 IR 6");
        assert_eq!(Iso2022Ir87.defined_term(), "ISO 2022 IR 13");
        assert_eq!(IsoIr192.name(), "ISO_IR 192");
    }
}
