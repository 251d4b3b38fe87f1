//! A list of compiled transfer syntax specifiers.
//!
//! These are all the transfer syntaxes known to the data model.
//! Retired JPEG processes are kept so that old data sets
//! can still be described, even though no codec handles them.

use byteordered::Endianness;
use dcm_encoding::TransferSyntax as Ts;

/// Create a little endian, explicit VR transfer syntax
/// with encapsulated pixel data.
const fn encapsulated(uid: &'static str, name: &'static str, lossy: bool) -> Ts {
    Ts::new(uid, name, Endianness::Little, true, true, lossy, false)
}

// -- the native transfer syntaxes --

/// Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    false,
    false,
    false,
);

/// Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    Endianness::Little,
    true,
    false,
    false,
    false,
);

/// Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    false,
    false,
    false,
);

/// Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
    false,
    false,
    true,
);

// -- encapsulated pixel data --

/// JPEG Baseline (Process 1)
pub const JPEG_BASELINE: Ts = encapsulated(
    "1.2.840.10008.1.2.4.50",
    "JPEG Baseline (Process 1)",
    true,
);
/// JPEG Extended (Process 2 & 4)
pub const JPEG_EXTENDED: Ts = encapsulated(
    "1.2.840.10008.1.2.4.51",
    "JPEG Extended (Process 2 & 4)",
    true,
);
/// JPEG Extended (Process 3 & 5) (Retired)
pub const JPEG_EXTENDED_3_5: Ts = encapsulated(
    "1.2.840.10008.1.2.4.52",
    "JPEG Extended (Process 3 & 5) (Retired)",
    true,
);
/// JPEG Spectral Selection, Non-Hierarchical (Process 6 & 8) (Retired)
pub const JPEG_SPECTRAL_SELECTION_6_8: Ts = encapsulated(
    "1.2.840.10008.1.2.4.53",
    "JPEG Spectral Selection, Non-Hierarchical (Process 6 & 8) (Retired)",
    true,
);
/// JPEG Spectral Selection, Non-Hierarchical (Process 7 & 9) (Retired)
pub const JPEG_SPECTRAL_SELECTION_7_9: Ts = encapsulated(
    "1.2.840.10008.1.2.4.54",
    "JPEG Spectral Selection, Non-Hierarchical (Process 7 & 9) (Retired)",
    true,
);
/// JPEG Full Progression, Non-Hierarchical (Process 10 & 12) (Retired)
pub const JPEG_FULL_PROGRESSION_10_12: Ts = encapsulated(
    "1.2.840.10008.1.2.4.55",
    "JPEG Full Progression, Non-Hierarchical (Process 10 & 12) (Retired)",
    true,
);
/// JPEG Full Progression, Non-Hierarchical (Process 11 & 13) (Retired)
pub const JPEG_FULL_PROGRESSION_11_13: Ts = encapsulated(
    "1.2.840.10008.1.2.4.56",
    "JPEG Full Progression, Non-Hierarchical (Process 11 & 13) (Retired)",
    true,
);
/// JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: Ts = encapsulated(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
    false,
);
/// JPEG Lossless, Non-Hierarchical (Process 15) (Retired)
pub const JPEG_LOSSLESS_15: Ts = encapsulated(
    "1.2.840.10008.1.2.4.58",
    "JPEG Lossless, Non-Hierarchical (Process 15) (Retired)",
    false,
);
/// JPEG Extended, Hierarchical (Process 16 & 18) (Retired)
pub const JPEG_EXTENDED_HIERARCHICAL_16_18: Ts = encapsulated(
    "1.2.840.10008.1.2.4.59",
    "JPEG Extended, Hierarchical (Process 16 & 18) (Retired)",
    true,
);
/// JPEG Extended, Hierarchical (Process 17 & 19) (Retired)
pub const JPEG_EXTENDED_HIERARCHICAL_17_19: Ts = encapsulated(
    "1.2.840.10008.1.2.4.60",
    "JPEG Extended, Hierarchical (Process 17 & 19) (Retired)",
    true,
);
/// JPEG Spectral Selection, Hierarchical (Process 20 & 22) (Retired)
pub const JPEG_SPECTRAL_SELECTION_HIERARCHICAL_20_22: Ts = encapsulated(
    "1.2.840.10008.1.2.4.61",
    "JPEG Spectral Selection, Hierarchical (Process 20 & 22) (Retired)",
    true,
);
/// JPEG Spectral Selection, Hierarchical (Process 21 & 23) (Retired)
pub const JPEG_SPECTRAL_SELECTION_HIERARCHICAL_21_23: Ts = encapsulated(
    "1.2.840.10008.1.2.4.62",
    "JPEG Spectral Selection, Hierarchical (Process 21 & 23) (Retired)",
    true,
);
/// JPEG Full Progression, Hierarchical (Process 24 & 26) (Retired)
pub const JPEG_FULL_PROGRESSION_HIERARCHICAL_24_26: Ts = encapsulated(
    "1.2.840.10008.1.2.4.63",
    "JPEG Full Progression, Hierarchical (Process 24 & 26) (Retired)",
    true,
);
/// JPEG Full Progression, Hierarchical (Process 25 & 27) (Retired)
pub const JPEG_FULL_PROGRESSION_HIERARCHICAL_25_27: Ts = encapsulated(
    "1.2.840.10008.1.2.4.64",
    "JPEG Full Progression, Hierarchical (Process 25 & 27) (Retired)",
    true,
);
/// JPEG Lossless, Hierarchical (Process 28) (Retired)
pub const JPEG_LOSSLESS_HIERARCHICAL_28: Ts = encapsulated(
    "1.2.840.10008.1.2.4.65",
    "JPEG Lossless, Hierarchical (Process 28) (Retired)",
    false,
);
/// JPEG Lossless, Hierarchical (Process 29) (Retired)
pub const JPEG_LOSSLESS_HIERARCHICAL_29: Ts = encapsulated(
    "1.2.840.10008.1.2.4.66",
    "JPEG Lossless, Hierarchical (Process 29) (Retired)",
    false,
);
/// JPEG Lossless, Non-Hierarchical, First-Order Prediction (Process 14 [Selection Value 1])
pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: Ts = encapsulated(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction (Process 14 [Selection Value 1])",
    false,
);
/// JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: Ts = encapsulated(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
    false,
);
/// JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY_IMAGE_COMPRESSION: Ts = encapsulated(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
    true,
);
/// JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = encapsulated(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
    false,
);
/// JPEG 2000 Image Compression
pub const JPEG_2000_IMAGE_COMPRESSION: Ts = encapsulated(
    "1.2.840.10008.1.2.4.91",
    "JPEG 2000 Image Compression",
    true,
);
/// MPEG2 Main Profile / Main Level
pub const MPEG2_MAIN_PROFILE_MAIN_LEVEL: Ts = encapsulated(
    "1.2.840.10008.1.2.4.100",
    "MPEG2 Main Profile / Main Level",
    true,
);
/// RLE Lossless
pub const RLE_LOSSLESS: Ts = encapsulated("1.2.840.10008.1.2.5", "RLE Lossless", false);

/// Every known transfer syntax.
pub(crate) static ALL: &[Ts] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    JPEG_BASELINE,
    JPEG_EXTENDED,
    JPEG_EXTENDED_3_5,
    JPEG_SPECTRAL_SELECTION_6_8,
    JPEG_SPECTRAL_SELECTION_7_9,
    JPEG_FULL_PROGRESSION_10_12,
    JPEG_FULL_PROGRESSION_11_13,
    JPEG_LOSSLESS_NON_HIERARCHICAL,
    JPEG_LOSSLESS_15,
    JPEG_EXTENDED_HIERARCHICAL_16_18,
    JPEG_EXTENDED_HIERARCHICAL_17_19,
    JPEG_SPECTRAL_SELECTION_HIERARCHICAL_20_22,
    JPEG_SPECTRAL_SELECTION_HIERARCHICAL_21_23,
    JPEG_FULL_PROGRESSION_HIERARCHICAL_24_26,
    JPEG_FULL_PROGRESSION_HIERARCHICAL_25_27,
    JPEG_LOSSLESS_HIERARCHICAL_28,
    JPEG_LOSSLESS_HIERARCHICAL_29,
    JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION,
    JPEG_LS_LOSSLESS_IMAGE_COMPRESSION,
    JPEG_LS_LOSSY_IMAGE_COMPRESSION,
    JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
    JPEG_2000_IMAGE_COMPRESSION,
    MPEG2_MAIN_PROFILE_MAIN_LEVEL,
    RLE_LOSSLESS,
];
