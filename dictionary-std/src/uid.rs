//! UID dictionary implementation.
//!
//! Resolves well-known identifiers to their description and kind.

use crate::uids::*;
use dcm_core::dictionary::UidDictionary;
use dcm_core::{Uid, UidType};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

static REGISTRY: Lazy<StandardUidRegistry> = Lazy::new(init_registry);

#[rustfmt::skip]
static ENTRIES: &[(&str, &str, UidType)] = &[
    (VERIFICATION, "Verification SOP Class", UidType::SopClass),
    (IMPLICIT_VR_LITTLE_ENDIAN, "Implicit VR Little Endian", UidType::TransferSyntax),
    (EXPLICIT_VR_LITTLE_ENDIAN, "Explicit VR Little Endian", UidType::TransferSyntax),
    (DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN, "Deflated Explicit VR Little Endian", UidType::TransferSyntax),
    (EXPLICIT_VR_BIG_ENDIAN, "Explicit VR Big Endian", UidType::TransferSyntax),
    (JPEG_BASELINE8_BIT, "JPEG Baseline (Process 1)", UidType::TransferSyntax),
    (JPEG_EXTENDED12_BIT, "JPEG Extended (Process 2 & 4)", UidType::TransferSyntax),
    (JPEG_LOSSLESS, "JPEG Lossless, Non-Hierarchical (Process 14)", UidType::TransferSyntax),
    (JPEG_LOSSLESS_SV1, "JPEG Lossless, Non-Hierarchical, First-Order Prediction (Process 14 [Selection Value 1])", UidType::TransferSyntax),
    (JPEG_LS_LOSSLESS, "JPEG-LS Lossless Image Compression", UidType::TransferSyntax),
    (JPEG_LS_NEAR_LOSSLESS, "JPEG-LS Lossy (Near-Lossless) Image Compression", UidType::TransferSyntax),
    (JPEG2000_LOSSLESS, "JPEG 2000 Image Compression (Lossless Only)", UidType::TransferSyntax),
    (JPEG2000, "JPEG 2000 Image Compression", UidType::TransferSyntax),
    (RLE_LOSSLESS, "RLE Lossless", UidType::TransferSyntax),
    (MPEG2_MPML, "MPEG2 Main Profile / Main Level", UidType::TransferSyntax),
    (COMPUTED_RADIOGRAPHY_IMAGE_STORAGE, "Computed Radiography Image Storage", UidType::SopClass),
    (DIGITAL_X_RAY_IMAGE_STORAGE_FOR_PRESENTATION, "Digital X-Ray Image Storage - For Presentation", UidType::SopClass),
    (CT_IMAGE_STORAGE, "CT Image Storage", UidType::SopClass),
    (ULTRASOUND_MULTI_FRAME_IMAGE_STORAGE, "Ultrasound Multi-frame Image Storage", UidType::SopClass),
    (MR_IMAGE_STORAGE, "MR Image Storage", UidType::SopClass),
    (ULTRASOUND_IMAGE_STORAGE, "Ultrasound Image Storage", UidType::SopClass),
    (SECONDARY_CAPTURE_IMAGE_STORAGE, "Secondary Capture Image Storage", UidType::SopClass),
    (NUCLEAR_MEDICINE_IMAGE_STORAGE, "Nuclear Medicine Image Storage", UidType::SopClass),
    (POSITRON_EMISSION_TOMOGRAPHY_IMAGE_STORAGE, "Positron Emission Tomography Image Storage", UidType::SopClass),
    (BASIC_TEXT_SR_STORAGE, "Basic Text SR Storage", UidType::SopClass),
    (STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND, "Study Root Query/Retrieve Information Model - FIND", UidType::SopClass),
    (DICOM_APPLICATION_CONTEXT_NAME, "DICOM Application Context Name", UidType::ApplicationContextName),
    (DICOM_CONTROLLED_TERMINOLOGY, "DICOM Controlled Terminology", UidType::CodingScheme),
    (TALAIRACH_BRAIN_ATLAS_FRAME_OF_REFERENCE, "Talairach Brain Atlas Frame of Reference", UidType::FrameOfReference),
];

/// Retrieve a singleton instance of the standard UID registry.
#[inline]
pub fn registry() -> &'static StandardUidRegistry {
    &REGISTRY
}

/// The data struct containing the standard UID dictionary.
#[derive(Debug)]
pub struct StandardUidRegistry {
    /// mapping: UID → entry
    by_uid: HashMap<&'static str, Uid>,
}

impl StandardUidRegistry {
    fn new() -> StandardUidRegistry {
        StandardUidRegistry {
            by_uid: HashMap::with_capacity(ENTRIES.len()),
        }
    }

    fn index(&mut self, uid: &'static str, name: &'static str, uid_type: UidType) -> &mut Self {
        self.by_uid.insert(uid, Uid::new(uid, name, uid_type));
        self
    }
}

/// A UID dictionary which consults the library's global UID registry.
///
/// The registry is initialized upon first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardUidDictionary;

impl UidDictionary for StandardUidDictionary {
    fn by_uid(&self, uid: &str) -> Option<&Uid> {
        registry().by_uid.get(uid.trim_end_matches('\0'))
    }
}

impl Display for StandardUidDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM UID Dictionary")
    }
}

fn init_registry() -> StandardUidRegistry {
    let mut r = StandardUidRegistry::new();
    for &(uid, name, uid_type) in ENTRIES {
        r.index(uid, name, uid_type);
    }
    r
}
