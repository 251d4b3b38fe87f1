//! The value representation registry.
//!
//! Each [`VR`] carries a fixed descriptor, so that properties such as the
//! unit size or the width of the explicit VR length field
//! never need to be inferred from the data.

use std::fmt;
use std::str::{from_utf8, FromStr};

/// How the length of a value is restricted by its VR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueRestriction {
    /// The VR has no restricted length (sequences, the sentinel VR).
    NotApplicable,
    /// Each value has exactly `max_length` bytes.
    Fixed,
    /// Each value has at most `max_length` bytes.
    Maximum,
    /// Any length.
    Any,
}

/// An enum type for a DICOM value representation.
///
/// `NONE` is a sentinel for the absence of a value representation
/// and is never produced when looking up a textual code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VR {
    /// No value representation
    NONE,
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Double
    FD,
    /// Floating Point Single
    FL,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Float
    OF,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Time
    TM,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
}

/// The fixed properties of a value representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrDescriptor {
    /// Two letter code, `"NONE"` for the sentinel.
    pub code: &'static str,
    /// Human readable name.
    pub description: &'static str,
    /// Whether the value is textual.
    pub is_string: bool,
    /// Whether the text is subject to the specific character set.
    pub is_encoded_string: bool,
    /// Whether explicit VR encoding uses a 2-byte length field.
    pub is_16bit_length_field: bool,
    /// Byte used to pad odd-length values.
    pub padding: u8,
    /// Maximum (or fixed) value length in bytes, 0 when unbounded.
    pub max_length: u32,
    /// Bytes per atomic value, 0 when there is no fixed unit.
    pub unit_size: u32,
    /// Kind of length restriction.
    pub restriction: ValueRestriction,
}

const fn text(
    code: &'static str,
    description: &'static str,
    is_encoded_string: bool,
    padding: u8,
    max_length: u32,
    restriction: ValueRestriction,
) -> VrDescriptor {
    VrDescriptor {
        code,
        description,
        is_string: true,
        is_encoded_string,
        is_16bit_length_field: true,
        padding,
        max_length,
        unit_size: 1,
        restriction,
    }
}

const fn binary(
    code: &'static str,
    description: &'static str,
    is_16bit_length_field: bool,
    max_length: u32,
    unit_size: u32,
    restriction: ValueRestriction,
) -> VrDescriptor {
    VrDescriptor {
        code,
        description,
        is_string: false,
        is_encoded_string: false,
        is_16bit_length_field,
        padding: 0x00,
        max_length,
        unit_size,
        restriction,
    }
}

use ValueRestriction::*;

static NONE_D: VrDescriptor = binary("NONE", "No VR", false, 0, 0, NotApplicable);
static AE_D: VrDescriptor = text("AE", "Application Entity", false, b' ', 16, Maximum);
static AS_D: VrDescriptor = text("AS", "Age String", false, b' ', 4, Fixed);
static AT_D: VrDescriptor = binary("AT", "Attribute Tag", true, 4, 4, Fixed);
static CS_D: VrDescriptor = text("CS", "Code String", false, b' ', 16, Maximum);
static DA_D: VrDescriptor = text("DA", "Date", false, b' ', 8, Fixed);
static DS_D: VrDescriptor = text("DS", "Decimal String", false, b' ', 16, Maximum);
static DT_D: VrDescriptor = text("DT", "Date Time", false, b' ', 26, Maximum);
static FD_D: VrDescriptor = binary("FD", "Floating Point Double", true, 8, 8, Fixed);
static FL_D: VrDescriptor = binary("FL", "Floating Point Single", true, 4, 4, Fixed);
static IS_D: VrDescriptor = text("IS", "Integer String", false, b' ', 12, Maximum);
static LO_D: VrDescriptor = text("LO", "Long String", true, b' ', 64, Maximum);
static LT_D: VrDescriptor = text("LT", "Long Text", true, b' ', 10240, Maximum);
static OB_D: VrDescriptor = binary("OB", "Other Byte", false, 0, 1, Any);
static OF_D: VrDescriptor = binary("OF", "Other Float", false, 0, 4, Any);
static OW_D: VrDescriptor = binary("OW", "Other Word", false, 0, 2, Any);
static PN_D: VrDescriptor = text("PN", "Person Name", true, b' ', 64, Maximum);
static SH_D: VrDescriptor = text("SH", "Short String", true, b' ', 16, Maximum);
static SL_D: VrDescriptor = binary("SL", "Signed Long", true, 4, 4, Fixed);
static SQ_D: VrDescriptor = binary("SQ", "Sequence of Items", false, 0, 0, NotApplicable);
static SS_D: VrDescriptor = binary("SS", "Signed Short", true, 2, 2, Fixed);
static ST_D: VrDescriptor = text("ST", "Short Text", true, b' ', 1024, Maximum);
static TM_D: VrDescriptor = text("TM", "Time", false, b' ', 16, Maximum);
static UI_D: VrDescriptor = text("UI", "Unique Identifier", false, 0x00, 64, Maximum);
static UL_D: VrDescriptor = binary("UL", "Unsigned Long", true, 4, 4, Fixed);
static UN_D: VrDescriptor = binary("UN", "Unknown", false, 0, 1, Any);
static US_D: VrDescriptor = binary("US", "Unsigned Short", true, 2, 2, Fixed);
static UT_D: VrDescriptor = VrDescriptor {
    is_16bit_length_field: false,
    ..text("UT", "Unlimited Text", true, b' ', 0, Any)
};

impl VR {
    /// Every value representation with a two letter code,
    /// in alphabetical order.
    pub const ALL: [VR; 27] = [
        VR::AE,
        VR::AS,
        VR::AT,
        VR::CS,
        VR::DA,
        VR::DS,
        VR::DT,
        VR::FD,
        VR::FL,
        VR::IS,
        VR::LO,
        VR::LT,
        VR::OB,
        VR::OF,
        VR::OW,
        VR::PN,
        VR::SH,
        VR::SL,
        VR::SQ,
        VR::SS,
        VR::ST,
        VR::TM,
        VR::UI,
        VR::UL,
        VR::UN,
        VR::US,
        VR::UT,
    ];

    /// Retrieve the fixed descriptor of this VR.
    pub fn descriptor(self) -> &'static VrDescriptor {
        use VR::*;
        match self {
            NONE => &NONE_D,
            AE => &AE_D,
            AS => &AS_D,
            AT => &AT_D,
            CS => &CS_D,
            DA => &DA_D,
            DS => &DS_D,
            DT => &DT_D,
            FD => &FD_D,
            FL => &FL_D,
            IS => &IS_D,
            LO => &LO_D,
            LT => &LT_D,
            OB => &OB_D,
            OF => &OF_D,
            OW => &OW_D,
            PN => &PN_D,
            SH => &SH_D,
            SL => &SL_D,
            SQ => &SQ_D,
            SS => &SS_D,
            ST => &ST_D,
            TM => &TM_D,
            UI => &UI_D,
            UL => &UL_D,
            UN => &UN_D,
            US => &US_D,
            UT => &UT_D,
        }
    }

    /// Look up a VR by its code.
    ///
    /// Unrecognized codes resolve to `UN`, as prescribed by the standard
    /// for unknown value representations.
    pub fn lookup(code: &str) -> VR {
        VR::from_str(code).unwrap_or(VR::UN)
    }

    /// Look up a VR from its two ASCII characters packed in a `u16`,
    /// first character in the upper byte.
    ///
    /// Zero resolves to `NONE`, anything unrecognized to `UN`.
    pub fn from_u16(packed: u16) -> VR {
        if packed == 0 {
            return VR::NONE;
        }
        VR::from_binary(packed.to_be_bytes()).unwrap_or(VR::UN)
    }

    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    #[inline]
    pub fn to_string(self) -> &'static str {
        self.descriptor().code
    }

    /// Retrieve a copy of this VR's byte representation.
    /// `NONE` has no two-letter code and yields two zero bytes.
    pub fn to_bytes(self) -> [u8; 2] {
        match self {
            VR::NONE => [0, 0],
            vr => {
                let bytes = vr.to_string().as_bytes();
                [bytes[0], bytes[1]]
            }
        }
    }

    /// The VR packed in a `u16`, as accepted by [`VR::from_u16`].
    pub fn to_u16(self) -> u16 {
        u16::from_be_bytes(self.to_bytes())
    }

    /// Human readable name.
    #[inline]
    pub fn description(self) -> &'static str {
        self.descriptor().description
    }

    /// Whether values are textual.
    #[inline]
    pub fn is_string(self) -> bool {
        self.descriptor().is_string
    }

    /// Whether text values are subject to the specific character set.
    #[inline]
    pub fn is_encoded_string(self) -> bool {
        self.descriptor().is_encoded_string
    }

    /// Whether explicit VR headers carry a 2-byte length field.
    #[inline]
    pub fn is_16bit_length_field(self) -> bool {
        self.descriptor().is_16bit_length_field
    }

    /// The byte used to pad odd-length values.
    #[inline]
    pub fn padding(self) -> u8 {
        self.descriptor().padding
    }

    /// Maximum (or fixed) value length, 0 when unbounded.
    #[inline]
    pub fn max_length(self) -> u32 {
        self.descriptor().max_length
    }

    /// Bytes per atomic value, 0 when there is no fixed unit.
    #[inline]
    pub fn unit_size(self) -> u32 {
        self.descriptor().unit_size
    }

    /// How the value length is restricted.
    #[inline]
    pub fn restriction(self) -> ValueRestriction {
        self.descriptor().restriction
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        VR::ALL
            .iter()
            .copied()
            .find(|vr| vr.to_string() == string)
            .ok_or("no such value representation")
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_un() {
        assert_eq!(VR::lookup("XX"), VR::UN);
        assert_eq!(VR::lookup(""), VR::UN);
        assert_eq!(VR::lookup("pn"), VR::UN);
        assert_eq!(VR::lookup("PN"), VR::PN);
    }

    #[test]
    fn packed_codes() {
        assert_eq!(VR::from_u16(0), VR::NONE);
        assert_eq!(VR::from_u16(0x5553), VR::US);
        assert_eq!(VR::from_u16(0x4142), VR::UN);
        for vr in VR::ALL.iter() {
            assert_eq!(VR::from_u16(vr.to_u16()), *vr);
            assert_eq!(VR::from_binary(vr.to_bytes()), Some(*vr));
        }
    }

    #[test]
    fn descriptors_are_fixed() {
        assert!(VR::AE.is_string());
        assert!(!VR::AE.is_encoded_string());
        assert!(VR::PN.is_encoded_string());
        assert_eq!(VR::UI.padding(), 0x00);
        assert_eq!(VR::CS.padding(), b' ');
        assert_eq!(VR::AT.unit_size(), 4);
        assert_eq!(VR::OW.unit_size(), 2);
        assert_eq!(VR::SQ.unit_size(), 0);
        assert_eq!(VR::DT.max_length(), 26);
        assert_eq!(VR::AS.restriction(), ValueRestriction::Fixed);

        // explicit VR headers with 4-byte lengths
        let long: Vec<VR> = VR::ALL
            .iter()
            .copied()
            .filter(|vr| !vr.is_16bit_length_field())
            .collect();
        assert_eq!(long, vec![VR::OB, VR::OF, VR::OW, VR::SQ, VR::UN, VR::UT]);
    }

    #[test]
    fn encoded_strings() {
        let encoded: Vec<VR> = VR::ALL
            .iter()
            .copied()
            .filter(|vr| vr.is_encoded_string())
            .collect();
        assert_eq!(
            encoded,
            vec![VR::LO, VR::LT, VR::PN, VR::SH, VR::ST, VR::UT]
        );
    }
}
