//! Attribute tag constants, along with the entries of the standard
//! data dictionary which they index.

use dcm_core::dictionary::DictionaryEntryRef;
use dcm_core::{Tag, VR};

macro_rules! dictionary {
    ($($konst: ident = ($g: literal, $e: literal), $vr: ident, $alias: literal, $name: literal;)*) => {
        $(
            #[doc = $name]
            #[doc = concat!(" ", stringify!(($g, $e)), " ", stringify!($vr))]
            pub const $konst: Tag = Tag($g, $e);
        )*

        /// Every entry of the standard dictionary, in tag order.
        pub(crate) static ENTRIES: &[DictionaryEntryRef<'static>] = &[
            $(
                DictionaryEntryRef {
                    tag: $konst,
                    alias: $alias,
                    name: $name,
                    vr: VR::$vr,
                },
            )*
        ];
    };
}

dictionary! {
    FILE_META_INFORMATION_VERSION = (0x0002, 0x0001), OB, "FileMetaInformationVersion", "File Meta Information Version";
    MEDIA_STORAGE_SOP_CLASS_UID = (0x0002, 0x0002), UI, "MediaStorageSOPClassUID", "Media Storage SOP Class UID";
    MEDIA_STORAGE_SOP_INSTANCE_UID = (0x0002, 0x0003), UI, "MediaStorageSOPInstanceUID", "Media Storage SOP Instance UID";
    TRANSFER_SYNTAX_UID = (0x0002, 0x0010), UI, "TransferSyntaxUID", "Transfer Syntax UID";
    IMPLEMENTATION_CLASS_UID = (0x0002, 0x0012), UI, "ImplementationClassUID", "Implementation Class UID";
    SOURCE_APPLICATION_ENTITY_TITLE = (0x0002, 0x0016), AE, "SourceApplicationEntityTitle", "Source Application Entity Title";
    SPECIFIC_CHARACTER_SET = (0x0008, 0x0005), CS, "SpecificCharacterSet", "Specific Character Set";
    IMAGE_TYPE = (0x0008, 0x0008), CS, "ImageType", "Image Type";
    SOP_CLASS_UID = (0x0008, 0x0016), UI, "SOPClassUID", "SOP Class UID";
    SOP_INSTANCE_UID = (0x0008, 0x0018), UI, "SOPInstanceUID", "SOP Instance UID";
    STUDY_DATE = (0x0008, 0x0020), DA, "StudyDate", "Study Date";
    SERIES_DATE = (0x0008, 0x0021), DA, "SeriesDate", "Series Date";
    ACQUISITION_DATE = (0x0008, 0x0022), DA, "AcquisitionDate", "Acquisition Date";
    CONTENT_DATE = (0x0008, 0x0023), DA, "ContentDate", "Content Date";
    ACQUISITION_DATE_TIME = (0x0008, 0x002A), DT, "AcquisitionDateTime", "Acquisition DateTime";
    STUDY_TIME = (0x0008, 0x0030), TM, "StudyTime", "Study Time";
    SERIES_TIME = (0x0008, 0x0031), TM, "SeriesTime", "Series Time";
    ACQUISITION_TIME = (0x0008, 0x0032), TM, "AcquisitionTime", "Acquisition Time";
    CONTENT_TIME = (0x0008, 0x0033), TM, "ContentTime", "Content Time";
    ACCESSION_NUMBER = (0x0008, 0x0050), SH, "AccessionNumber", "Accession Number";
    MODALITY = (0x0008, 0x0060), CS, "Modality", "Modality";
    MANUFACTURER = (0x0008, 0x0070), LO, "Manufacturer", "Manufacturer";
    INSTITUTION_NAME = (0x0008, 0x0080), LO, "InstitutionName", "Institution Name";
    INSTITUTION_ADDRESS = (0x0008, 0x0081), ST, "InstitutionAddress", "Institution Address";
    REFERRING_PHYSICIAN_NAME = (0x0008, 0x0090), PN, "ReferringPhysicianName", "Referring Physician's Name";
    STUDY_DESCRIPTION = (0x0008, 0x1030), LO, "StudyDescription", "Study Description";
    REFERENCED_STUDY_SEQUENCE = (0x0008, 0x1110), SQ, "ReferencedStudySequence", "Referenced Study Sequence";
    REFERENCED_SERIES_SEQUENCE = (0x0008, 0x1115), SQ, "ReferencedSeriesSequence", "Referenced Series Sequence";
    REFERENCED_IMAGE_SEQUENCE = (0x0008, 0x1140), SQ, "ReferencedImageSequence", "Referenced Image Sequence";
    REFERENCED_SOP_CLASS_UID = (0x0008, 0x1150), UI, "ReferencedSOPClassUID", "Referenced SOP Class UID";
    REFERENCED_SOP_INSTANCE_UID = (0x0008, 0x1155), UI, "ReferencedSOPInstanceUID", "Referenced SOP Instance UID";
    SIMPLE_FRAME_LIST = (0x0008, 0x1161), UL, "SimpleFrameList", "Simple Frame List";
    DERIVATION_DESCRIPTION = (0x0008, 0x2111), ST, "DerivationDescription", "Derivation Description";
    RECOMMENDED_DISPLAY_FRAME_RATE_IN_FLOAT = (0x0008, 0x9459), FL, "RecommendedDisplayFrameRateInFloat", "Recommended Display Frame Rate in Float";
    PATIENT_NAME = (0x0010, 0x0010), PN, "PatientName", "Patient's Name";
    PATIENT_ID = (0x0010, 0x0020), LO, "PatientID", "Patient ID";
    PATIENT_BIRTH_DATE = (0x0010, 0x0030), DA, "PatientBirthDate", "Patient's Birth Date";
    PATIENT_SEX = (0x0010, 0x0040), CS, "PatientSex", "Patient's Sex";
    PATIENT_AGE = (0x0010, 0x1010), AS, "PatientAge", "Patient's Age";
    PATIENT_WEIGHT = (0x0010, 0x1030), DS, "PatientWeight", "Patient's Weight";
    PATIENT_COMMENTS = (0x0010, 0x4000), LT, "PatientComments", "Patient Comments";
    SLICE_THICKNESS = (0x0018, 0x0050), DS, "SliceThickness", "Slice Thickness";
    REFERENCE_PIXEL_X0 = (0x0018, 0x6020), SL, "ReferencePixelX0", "Reference Pixel X0";
    DIFFUSION_B_VALUE = (0x0018, 0x9087), FD, "DiffusionBValue", "Diffusion b-value";
    TAG_ANGLE_SECOND_AXIS = (0x0018, 0x9219), SS, "TagAngleSecondAxis", "Tag Angle Second Axis";
    STUDY_INSTANCE_UID = (0x0020, 0x000D), UI, "StudyInstanceUID", "Study Instance UID";
    SERIES_INSTANCE_UID = (0x0020, 0x000E), UI, "SeriesInstanceUID", "Series Instance UID";
    STUDY_ID = (0x0020, 0x0010), SH, "StudyID", "Study ID";
    SERIES_NUMBER = (0x0020, 0x0011), IS, "SeriesNumber", "Series Number";
    INSTANCE_NUMBER = (0x0020, 0x0013), IS, "InstanceNumber", "Instance Number";
    IMAGE_POSITION_PATIENT = (0x0020, 0x0032), DS, "ImagePositionPatient", "Image Position (Patient)";
    IMAGE_ORIENTATION_PATIENT = (0x0020, 0x0037), DS, "ImageOrientationPatient", "Image Orientation (Patient)";
    FRAME_OF_REFERENCE_UID = (0x0020, 0x0052), UI, "FrameOfReferenceUID", "Frame of Reference UID";
    SAMPLES_PER_PIXEL = (0x0028, 0x0002), US, "SamplesPerPixel", "Samples per Pixel";
    PHOTOMETRIC_INTERPRETATION = (0x0028, 0x0004), CS, "PhotometricInterpretation", "Photometric Interpretation";
    PLANAR_CONFIGURATION = (0x0028, 0x0006), US, "PlanarConfiguration", "Planar Configuration";
    NUMBER_OF_FRAMES = (0x0028, 0x0008), IS, "NumberOfFrames", "Number of Frames";
    FRAME_INCREMENT_POINTER = (0x0028, 0x0009), AT, "FrameIncrementPointer", "Frame Increment Pointer";
    ROWS = (0x0028, 0x0010), US, "Rows", "Rows";
    COLUMNS = (0x0028, 0x0011), US, "Columns", "Columns";
    PIXEL_SPACING = (0x0028, 0x0030), DS, "PixelSpacing", "Pixel Spacing";
    BITS_ALLOCATED = (0x0028, 0x0100), US, "BitsAllocated", "Bits Allocated";
    BITS_STORED = (0x0028, 0x0101), US, "BitsStored", "Bits Stored";
    HIGH_BIT = (0x0028, 0x0102), US, "HighBit", "High Bit";
    PIXEL_REPRESENTATION = (0x0028, 0x0103), US, "PixelRepresentation", "Pixel Representation";
    SMALLEST_IMAGE_PIXEL_VALUE = (0x0028, 0x0106), US, "SmallestImagePixelValue", "Smallest Image Pixel Value";
    LARGEST_IMAGE_PIXEL_VALUE = (0x0028, 0x0107), US, "LargestImagePixelValue", "Largest Image Pixel Value";
    PIXEL_PADDING_VALUE = (0x0028, 0x0120), US, "PixelPaddingValue", "Pixel Padding Value";
    WINDOW_CENTER = (0x0028, 0x1050), DS, "WindowCenter", "Window Center";
    WINDOW_WIDTH = (0x0028, 0x1051), DS, "WindowWidth", "Window Width";
    RESCALE_INTERCEPT = (0x0028, 0x1052), DS, "RescaleIntercept", "Rescale Intercept";
    RESCALE_SLOPE = (0x0028, 0x1053), DS, "RescaleSlope", "Rescale Slope";
    RED_PALETTE_COLOR_LOOKUP_TABLE_DATA = (0x0028, 0x1201), OW, "RedPaletteColorLookupTableData", "Red Palette Color Lookup Table Data";
    LOSSY_IMAGE_COMPRESSION = (0x0028, 0x2110), CS, "LossyImageCompression", "Lossy Image Compression";
    LOSSY_IMAGE_COMPRESSION_RATIO = (0x0028, 0x2112), DS, "LossyImageCompressionRatio", "Lossy Image Compression Ratio";
    LOSSY_IMAGE_COMPRESSION_METHOD = (0x0028, 0x2114), CS, "LossyImageCompressionMethod", "Lossy Image Compression Method";
    TEXT_VALUE = (0x0040, 0xA160), UT, "TextValue", "Text Value";
    VECTOR_GRID_DATA = (0x0064, 0x0009), OF, "VectorGridData", "Vector Grid Data";
    MODIFIED_ATTRIBUTES_SEQUENCE = (0x0400, 0x0550), SQ, "ModifiedAttributesSequence", "Modified Attributes Sequence";
    ORIGINAL_ATTRIBUTES_SEQUENCE = (0x0400, 0x0561), SQ, "OriginalAttributesSequence", "Original Attributes Sequence";
    ATTRIBUTE_MODIFICATION_DATE_TIME = (0x0400, 0x0562), DT, "AttributeModificationDateTime", "Attribute Modification DateTime";
    MODIFYING_SYSTEM = (0x0400, 0x0563), LO, "ModifyingSystem", "Modifying System";
    SOURCE_OF_PREVIOUS_VALUES = (0x0400, 0x0564), LO, "SourceOfPreviousValues", "Source of Previous Values";
    REASON_FOR_THE_ATTRIBUTE_MODIFICATION = (0x0400, 0x0565), CS, "ReasonForTheAttributeModification", "Reason for the Attribute Modification";
    PIXEL_DATA = (0x7FE0, 0x0010), OW, "PixelData", "Pixel Data";
    ITEM = (0xFFFE, 0xE000), NONE, "Item", "Item";
    ITEM_DELIMITATION_ITEM = (0xFFFE, 0xE00D), NONE, "ItemDelimitationItem", "Item Delimitation Item";
    SEQUENCE_DELIMITATION_ITEM = (0xFFFE, 0xE0DD), NONE, "SequenceDelimitationItem", "Sequence Delimitation Item";
}
