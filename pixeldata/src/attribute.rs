//! Image attributes describing the layout of pixel data.

use dcm_dictionary_std::tags;
use dcm_object::{Dataset, Element};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum GetAttributeError {
    #[snafu(display("Could not read attribute `{}`", name))]
    ReadAttribute {
        name: &'static str,
        #[snafu(backtrace)]
        source: dcm_object::Error,
    },

    #[snafu(display("Could not write attribute `{}`", name))]
    WriteAttribute {
        name: &'static str,
        #[snafu(backtrace)]
        source: dcm_object::Error,
    },
}

pub type Result<T, E = GetAttributeError> = std::result::Result<T, E>;

/// The image module attributes which shape pixel data,
/// along with the lossy compression history.
///
/// Absent attributes take their usual defaults:
/// one frame, a rescale slope of 1, and a high bit one below bits stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PixelAttributes {
    pub columns: u16,
    pub rows: u16,
    pub bits_allocated: u16,
    pub bits_stored: u16,
    pub high_bit: u16,
    pub samples_per_pixel: u16,
    pub pixel_representation: u16,
    pub planar_configuration: u16,
    pub photometric_interpretation: String,
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
    /// whether the pixel data went through lossy compression
    pub lossy: bool,
    pub lossy_method: String,
    pub lossy_ratio: String,
    /// the Pixel Padding Value, if the data set declares one
    pub pixel_padding_value: Option<i32>,
}

impl PixelAttributes {
    /// Read the attributes from a data set.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let lossy = dataset
            .get_string(tags::LOSSY_IMAGE_COMPRESSION, "00")
            .context(ReadAttributeSnafu {
                name: "LossyImageCompression",
            })?
            != "00";
        let bits_stored = u16_or(dataset, tags::BITS_STORED, "BitsStored", 0)?;
        let mut attributes = PixelAttributes {
            columns: u16_or(dataset, tags::COLUMNS, "Columns", 0)?,
            rows: u16_or(dataset, tags::ROWS, "Rows", 0)?,
            bits_allocated: u16_or(dataset, tags::BITS_ALLOCATED, "BitsAllocated", 0)?,
            bits_stored,
            high_bit: u16_or(
                dataset,
                tags::HIGH_BIT,
                "HighBit",
                bits_stored.wrapping_sub(1),
            )?,
            samples_per_pixel: u16_or(dataset, tags::SAMPLES_PER_PIXEL, "SamplesPerPixel", 0)?,
            pixel_representation: u16_or(
                dataset,
                tags::PIXEL_REPRESENTATION,
                "PixelRepresentation",
                0,
            )?,
            planar_configuration: u16_or(
                dataset,
                tags::PLANAR_CONFIGURATION,
                "PlanarConfiguration",
                0,
            )?,
            photometric_interpretation: dataset
                .get_string(tags::PHOTOMETRIC_INTERPRETATION, "")
                .context(ReadAttributeSnafu {
                    name: "PhotometricInterpretation",
                })?,
            rescale_slope: dataset
                .get_f64(tags::RESCALE_SLOPE, 1.)
                .context(ReadAttributeSnafu {
                    name: "RescaleSlope",
                })?,
            rescale_intercept: dataset
                .get_f64(tags::RESCALE_INTERCEPT, 0.)
                .context(ReadAttributeSnafu {
                    name: "RescaleIntercept",
                })?,
            lossy,
            lossy_method: dataset
                .get_string(tags::LOSSY_IMAGE_COMPRESSION_METHOD, "")
                .context(ReadAttributeSnafu {
                    name: "LossyImageCompressionMethod",
                })?,
            lossy_ratio: dataset
                .get_string(tags::LOSSY_IMAGE_COMPRESSION_RATIO, "")
                .context(ReadAttributeSnafu {
                    name: "LossyImageCompressionRatio",
                })?,
            pixel_padding_value: None,
        };

        if dataset.contains(tags::PIXEL_PADDING_VALUE) {
            let name = "PixelPaddingValue";
            let value = match dataset.element(tags::PIXEL_PADDING_VALUE) {
                Some(Element::US(us)) => i32::from(us.value().context(ReadAttributeSnafu { name })?),
                Some(Element::SS(ss)) => i32::from(ss.value().context(ReadAttributeSnafu { name })?),
                _ => attributes.minimum_data_value(),
            };
            attributes.pixel_padding_value = Some(value);
        }
        Ok(attributes)
    }

    /// The number of whole bytes holding one sample.
    pub fn bytes_allocated(&self) -> usize {
        (usize::from(self.bits_allocated) + 7) / 8
    }

    pub fn is_signed(&self) -> bool {
        self.pixel_representation != 0
    }

    /// Whether color samples are stored plane by plane.
    pub fn is_planar(&self) -> bool {
        self.planar_configuration != 0
    }

    /// The smallest value a stored sample can take.
    pub fn minimum_data_value(&self) -> i32 {
        if self.is_signed() {
            (-(1_i64 << (self.stored_bits() - 1))) as i32
        } else {
            0
        }
    }

    /// The largest value a stored sample can take.
    pub fn maximum_data_value(&self) -> i32 {
        if self.is_signed() {
            ((1_i64 << (self.stored_bits() - 1)) - 1) as i32
        } else {
            ((1_i64 << self.stored_bits()) - 1) as i32
        }
    }

    fn stored_bits(&self) -> u32 {
        u32::from(self.bits_stored.clamp(1, 32))
    }

    /// The number of bytes in one uncompressed frame.
    pub fn uncompressed_frame_size(&self) -> usize {
        usize::from(self.columns)
            * usize::from(self.rows)
            * self.bytes_allocated()
            * usize::from(self.samples_per_pixel)
    }

    /// Write the attributes back into a data set.
    ///
    /// Lossy compression history and the padding value are not written here.
    /// Rescale parameters go with single sample images,
    /// the planar configuration with color images.
    pub fn write_to(&self, dataset: &mut Dataset, frames: u32) -> Result<()> {
        put(dataset, tags::NUMBER_OF_FRAMES, "NumberOfFrames", frames as i32)?;
        put(dataset, tags::COLUMNS, "Columns", self.columns)?;
        put(dataset, tags::ROWS, "Rows", self.rows)?;
        put(dataset, tags::HIGH_BIT, "HighBit", self.high_bit)?;
        put(dataset, tags::BITS_STORED, "BitsStored", self.bits_stored)?;
        put(dataset, tags::BITS_ALLOCATED, "BitsAllocated", self.bits_allocated)?;
        put(
            dataset,
            tags::SAMPLES_PER_PIXEL,
            "SamplesPerPixel",
            self.samples_per_pixel,
        )?;
        put(
            dataset,
            tags::PIXEL_REPRESENTATION,
            "PixelRepresentation",
            self.pixel_representation,
        )?;
        put(
            dataset,
            tags::PHOTOMETRIC_INTERPRETATION,
            "PhotometricInterpretation",
            self.photometric_interpretation.as_str(),
        )?;
        if self.samples_per_pixel == 1 {
            put(dataset, tags::RESCALE_SLOPE, "RescaleSlope", self.rescale_slope)?;
            put(
                dataset,
                tags::RESCALE_INTERCEPT,
                "RescaleIntercept",
                self.rescale_intercept,
            )?;
        } else {
            put(
                dataset,
                tags::PLANAR_CONFIGURATION,
                "PlanarConfiguration",
                self.planar_configuration,
            )?;
        }
        Ok(())
    }
}

fn u16_or(
    dataset: &Dataset,
    tag: dcm_core::Tag,
    name: &'static str,
    default: u16,
) -> Result<u16> {
    dataset
        .get_u16(tag, default)
        .context(ReadAttributeSnafu { name })
}

fn put<V: dcm_object::DatasetValue>(
    dataset: &mut Dataset,
    tag: dcm_core::Tag,
    name: &'static str,
    value: V,
) -> Result<()> {
    dataset
        .add_element_with_value(tag, value)
        .context(WriteAttributeSnafu { name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct_slice() -> Dataset {
        let mut ds = Dataset::default();
        ds.add_element_with_value(tags::ROWS, 512_u16).unwrap();
        ds.add_element_with_value(tags::COLUMNS, 256_u16).unwrap();
        ds.add_element_with_value(tags::BITS_ALLOCATED, 16_u16)
            .unwrap();
        ds.add_element_with_value(tags::BITS_STORED, 12_u16).unwrap();
        ds.add_element_with_value(tags::SAMPLES_PER_PIXEL, 1_u16)
            .unwrap();
        ds.add_element_with_value(tags::PIXEL_REPRESENTATION, 1_u16)
            .unwrap();
        ds.add_element_with_value(tags::PHOTOMETRIC_INTERPRETATION, "MONOCHROME2")
            .unwrap();
        ds.add_element_with_value(tags::RESCALE_INTERCEPT, -1024.)
            .unwrap();
        ds
    }

    #[test]
    fn defaults_for_absent_attributes() {
        let attributes = PixelAttributes::from_dataset(&ct_slice()).unwrap();
        assert_eq!(attributes.columns, 256);
        assert_eq!(attributes.rows, 512);
        assert_eq!(attributes.high_bit, 11);
        assert_eq!(attributes.rescale_slope, 1.);
        assert_eq!(attributes.rescale_intercept, -1024.);
        assert!(!attributes.lossy);
        assert_eq!(attributes.pixel_padding_value, None);
        assert_eq!(attributes.bytes_allocated(), 2);
        assert_eq!(attributes.uncompressed_frame_size(), 512 * 256 * 2);
    }

    #[test]
    fn data_value_bounds() {
        let mut attributes = PixelAttributes::from_dataset(&ct_slice()).unwrap();
        assert_eq!(attributes.minimum_data_value(), -2048);
        assert_eq!(attributes.maximum_data_value(), 2047);
        attributes.pixel_representation = 0;
        assert_eq!(attributes.minimum_data_value(), 0);
        assert_eq!(attributes.maximum_data_value(), 4095);
    }

    #[test]
    fn padding_value_by_vr() {
        let mut ds = ct_slice();
        ds.add_element_with_value(tags::PIXEL_PADDING_VALUE, 0xFFFF_u16)
            .unwrap();
        let attributes = PixelAttributes::from_dataset(&ds).unwrap();
        assert_eq!(attributes.pixel_padding_value, Some(0xFFFF));

        ds.add_element_with_vr(tags::PIXEL_PADDING_VALUE, dcm_core::VR::SS)
            .unwrap();
        ds.get_ss_mut(tags::PIXEL_PADDING_VALUE)
            .unwrap()
            .unwrap()
            .set_value(-2000)
            .unwrap();
        let attributes = PixelAttributes::from_dataset(&ds).unwrap();
        assert_eq!(attributes.pixel_padding_value, Some(-2000));
    }

    #[test]
    fn color_images_write_planar_configuration() {
        let mut attributes = PixelAttributes::from_dataset(&ct_slice()).unwrap();
        attributes.samples_per_pixel = 3;
        attributes.planar_configuration = 1;
        let mut ds = Dataset::default();
        attributes.write_to(&mut ds, 2).unwrap();
        assert_eq!(ds.get_i32(tags::NUMBER_OF_FRAMES, 0).unwrap(), 2);
        assert_eq!(ds.get_u16(tags::PLANAR_CONFIGURATION, 0).unwrap(), 1);
        assert!(!ds.contains(tags::RESCALE_SLOPE));
    }
}
