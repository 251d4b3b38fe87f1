//! This crate contains the DICOM pixel data handlers.
//!
//! [`PixelData`] is a projection of the image attributes
//! and the pixel data item of a data set.
//! It gives access to the bytes of each frame,
//! whether stored natively or as encapsulated fragments,
//! and builds new pixel data frame by frame.
//!
//! Changing a data set to another transfer syntax
//! goes through the [`Transcode`] extension trait,
//! with the help of the codecs in a [`CodecRegistry`].
//!
//! # Examples
//! ```
//! # use std::error::Error;
//! use dcm_dictionary_std::tags;
//! use dcm_object::element::ElementFamily;
//! use dcm_object::Dataset;
//! use dcm_pixeldata::PixelDecoder;
//!
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut dataset = Dataset::default();
//! dataset.add_element_with_value(tags::ROWS, 2_u16)?;
//! dataset.add_element_with_value(tags::COLUMNS, 2_u16)?;
//! dataset.add_element_with_value(tags::BITS_ALLOCATED, 8_u16)?;
//! dataset.add_element_with_value(tags::BITS_STORED, 8_u16)?;
//! dataset.add_element_with_value(tags::SAMPLES_PER_PIXEL, 1_u16)?;
//! dataset
//!     .add_element_with_vr(tags::PIXEL_DATA, dcm_core::VR::OB)?
//!     .set_value_string("1\\2\\3\\4")?;
//!
//! let pixel_data = dataset.pixel_data()?;
//! assert_eq!(pixel_data.number_of_frames(), 1);
//! assert_eq!(pixel_data.frame_data_u8(0)?, vec![1, 2, 3, 4]);
//! #   Ok(())
//! # }
//! ```

use byteorder::{ByteOrder, NativeEndian};
use dcm_core::{Tag, VR};
use dcm_dictionary_std::tags;
use dcm_encoding::buffer::local_endianness;
use dcm_encoding::{ByteBuffer, Endianness, TransferSyntax};
use dcm_object::element::ElementFamily;
use dcm_object::{uid, Dataset, Element, FragmentSequence, Item};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::fmt;

pub mod attribute;
pub mod codec;
pub mod encapsulation;
mod transcode;

pub use attribute::PixelAttributes;
pub use codec::{CodecError, CodecParameters, CodecRegistry, PixelDataCodec};
pub use transcode::{Error as TranscodeError, Transcode};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Data set has no pixel data"))]
    MissingPixelData { backtrace: Backtrace },

    #[snafu(display("Could not read image attributes"))]
    ReadAttributes {
        #[snafu(backtrace)]
        source: attribute::GetAttributeError,
    },

    #[snafu(display("Could not write image attributes"))]
    WriteAttributes {
        #[snafu(backtrace)]
        source: attribute::GetAttributeError,
    },

    #[snafu(display("Could not access data set"))]
    AccessDataset {
        #[snafu(backtrace)]
        source: dcm_object::Error,
    },

    #[snafu(display("Could not access pixel data bytes"))]
    Buffer {
        #[snafu(backtrace)]
        source: dcm_encoding::buffer::Error,
    },

    #[snafu(display("Pixel data item {} is a sequence of data sets", vr))]
    InvalidPixelData { vr: VR, backtrace: Backtrace },

    #[snafu(display("Frame {} out of range (number of frames: {})", frame, frames))]
    FrameOutOfRange {
        frame: u32,
        frames: u32,
        backtrace: Backtrace,
    },

    #[snafu(display("Pixel data is not fragmented"))]
    NotFragmented { backtrace: Backtrace },

    #[snafu(display(
        "Unable to determine frame length from {} fragments over {} frames",
        fragments,
        frames
    ))]
    UndeterminedFrameLength {
        fragments: usize,
        frames: u32,
        backtrace: Backtrace,
    },

    #[snafu(display(
        "Frame {} needs {} bytes but pixel data holds {}",
        frame,
        needed,
        available
    ))]
    InsufficientData {
        frame: u32,
        needed: usize,
        available: usize,
        backtrace: Backtrace,
    },

    #[snafu(display("BitsAllocated={} is unsupported", bits_allocated))]
    UnsupportedBitsAllocated {
        bits_allocated: u16,
        backtrace: Backtrace,
    },

    #[snafu(display("SamplesPerPixel={} is unsupported", samples_per_pixel))]
    UnsupportedSamplesPerPixel {
        samples_per_pixel: u16,
        backtrace: Backtrace,
    },

    #[snafu(display("PhotometricInterpretation={} is unsupported", pi))]
    UnsupportedPhotometricInterpretation { pi: String, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The pixel data of a data set,
/// along with the attributes needed to interpret it.
#[derive(Debug, Clone)]
pub struct PixelData {
    transfer_syntax: TransferSyntax,
    attributes: PixelAttributes,
    frames: u32,
    item: Item,
    fragment_size: u32,
}

impl PixelData {
    /// Project the pixel data of a data set.
    ///
    /// The pixel data item is copied out of the data set.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let item = dataset
            .item(tags::PIXEL_DATA)
            .context(MissingPixelDataSnafu)?
            .clone();
        if let Item::Sequence(sq) = &item {
            return InvalidPixelDataSnafu { vr: sq.vr() }.fail();
        }
        let frames = dataset
            .get_i32(tags::NUMBER_OF_FRAMES, 1)
            .context(AccessDatasetSnafu)?;
        Ok(PixelData {
            transfer_syntax: dataset.transfer_syntax().clone(),
            attributes: PixelAttributes::from_dataset(dataset).context(ReadAttributesSnafu)?,
            frames: frames.max(0) as u32,
            item,
            fragment_size: u32::MAX,
        })
    }

    /// Empty pixel data in the given transfer syntax,
    /// with all attributes unset.
    pub fn new(transfer_syntax: TransferSyntax) -> Result<Self> {
        PixelData::with_attributes(transfer_syntax, PixelAttributes::default())
    }

    /// Empty pixel data in the given transfer syntax,
    /// taking the image attributes of `template`.
    pub fn with_template(transfer_syntax: TransferSyntax, template: &PixelData) -> Result<Self> {
        PixelData::with_attributes(transfer_syntax, template.attributes.clone())
    }

    /// Empty pixel data in the given transfer syntax and attributes.
    ///
    /// Encapsulated transfer syntaxes receive an OB fragment sequence.
    /// Otherwise the pixel data is OW for implicit VR or for 9 to 16 bits allocated,
    /// and OB in every other case.
    pub fn with_attributes(
        transfer_syntax: TransferSyntax,
        attributes: PixelAttributes,
    ) -> Result<Self> {
        let endian = transfer_syntax.endianness();
        let item = if transfer_syntax.is_encapsulated() {
            Item::from(FragmentSequence::create(tags::PIXEL_DATA, VR::OB, 0, endian))
        } else {
            let bits = attributes.bits_allocated;
            let vr = if !transfer_syntax.is_explicit_vr() || (bits > 8 && bits <= 16) {
                VR::OW
            } else {
                VR::OB
            };
            Item::from(
                Element::create(tags::PIXEL_DATA, vr, 0, ByteBuffer::new(endian))
                    .context(AccessDatasetSnafu)?,
            )
        };
        Ok(PixelData {
            transfer_syntax,
            attributes,
            frames: 0,
            item,
            fragment_size: u32::MAX,
        })
    }

    pub fn transfer_syntax(&self) -> &TransferSyntax {
        &self.transfer_syntax
    }

    pub fn attributes(&self) -> &PixelAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut PixelAttributes {
        &mut self.attributes
    }

    pub fn number_of_frames(&self) -> u32 {
        self.frames
    }

    /// The pixel data item, either an element or a fragment sequence.
    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn is_encapsulated(&self) -> bool {
        self.transfer_syntax.is_encapsulated()
    }

    /// Whether the pixel data is held in fragments.
    pub fn is_fragmented(&self) -> bool {
        matches!(self.item, Item::Fragments(_))
    }

    /// The largest fragment created when adding frames.
    pub fn fragment_size(&self) -> u32 {
        self.fragment_size
    }

    pub fn set_fragment_size(&mut self, fragment_size: u32) {
        self.fragment_size = fragment_size;
    }

    fn check_frame(&self, frame: u32) -> Result<()> {
        ensure!(
            frame < self.frames,
            FrameOutOfRangeSnafu {
                frame,
                frames: self.frames
            }
        );
        Ok(())
    }

    /// The number of bytes in a frame.
    pub fn frame_size(&self, frame: u32) -> Result<usize> {
        self.check_frame(frame)?;
        if !self.is_fragmented() {
            return Ok(self.attributes.uncompressed_frame_size());
        }
        Ok(self
            .frame_fragments(frame)?
            .iter()
            .map(|f| f.len())
            .sum())
    }

    /// The fragments holding a frame of encapsulated pixel data.
    pub fn frame_fragments(&self, frame: u32) -> Result<Vec<&ByteBuffer>> {
        self.check_frame(frame)?;
        match &self.item {
            Item::Fragments(sequence) => {
                encapsulation::frame_fragments(sequence, self.frames, frame)
            }
            _ => NotFragmentedSnafu.fail(),
        }
    }

    /// The bytes of a frame.
    ///
    /// Native samples come out in the byte order of this machine.
    /// Fragmented frames are the concatenation of their fragments.
    pub fn frame_data_u8(&self, frame: u32) -> Result<Vec<u8>> {
        self.check_frame(frame)?;
        let element = match &self.item {
            Item::Fragments(_) => {
                return Ok(self
                    .frame_fragments(frame)?
                    .into_iter()
                    .map(|fragment| fragment.bytes().context(BufferSnafu))
                    .collect::<Result<Vec<_>>>()?
                    .concat());
            }
            Item::Element(element) => element,
            Item::Sequence(sq) => return InvalidPixelDataSnafu { vr: sq.vr() }.fail(),
        };

        let size = self.attributes.uncompressed_frame_size();
        let offset = size * frame as usize;
        let buffer = element.buffer();
        let bytes = buffer.bytes().context(BufferSnafu)?;
        let mut data = bytes
            .get(offset..offset + size)
            .context(InsufficientDataSnafu {
                frame,
                needed: offset + size,
                available: bytes.len(),
            })?
            .to_vec();

        let bytes_allocated = self.attributes.bytes_allocated();
        if bytes_allocated > 1 && buffer.endian() != local_endianness() {
            swap_bytes(&mut data, bytes_allocated);
        } else if bytes_allocated == 1 && element.vr() == VR::OW && buffer.endian() == Endianness::Big
        {
            swap_bytes(&mut data, 2);
        }
        Ok(data)
    }

    /// The 16-bit words of a frame, in the byte order of this machine.
    pub fn frame_data_u16(&self, frame: u32) -> Result<Vec<u16>> {
        let data = self.frame_data_u8(frame)?;
        let mut words = vec![0; data.len() / 2];
        NativeEndian::read_u16_into(&data[..words.len() * 2], &mut words);
        Ok(words)
    }

    /// The pixels of a frame as 32-bit integers.
    ///
    /// Single sample pixels are extracted below the high bit,
    /// the bit itself being the sign when signed.
    /// Three sample 8-bit RGB or YBR_FULL pixels are packed as `0xRRGGBB`.
    pub fn frame_data_s32(&self, frame: u32) -> Result<Vec<i32>> {
        let attributes = &self.attributes;
        let count = usize::from(attributes.columns) * usize::from(attributes.rows);
        match attributes.samples_per_pixel {
            1 => {
                let data: Vec<i64> = match attributes.bits_allocated {
                    8 => self.frame_data_u8(frame)?.into_iter().map(i64::from).collect(),
                    16 => self
                        .frame_data_u16(frame)?
                        .into_iter()
                        .map(i64::from)
                        .collect(),
                    bits_allocated => {
                        return UnsupportedBitsAllocatedSnafu { bits_allocated }.fail()
                    }
                };
                ensure_samples(frame, count, data.len())?;

                let high_bit = u32::from(attributes.high_bit).min(32);
                let pixels = if attributes.is_signed() {
                    let sign = 1_i64 << high_bit;
                    let mask = sign - 1;
                    data[..count]
                        .iter()
                        .map(|&d| {
                            if d & sign != 0 {
                                -(d & mask) as i32
                            } else {
                                (d & mask) as i32
                            }
                        })
                        .collect()
                } else {
                    let mask = (1_i64 << (high_bit + 1)) - 1;
                    data[..count].iter().map(|&d| (d & mask) as i32).collect()
                };
                Ok(pixels)
            }
            3 => {
                ensure!(
                    attributes.bits_allocated == 8,
                    UnsupportedBitsAllocatedSnafu {
                        bits_allocated: attributes.bits_allocated
                    }
                );
                let pi = attributes.photometric_interpretation.as_str();
                ensure!(
                    pi == "RGB" || pi == "YBR_FULL",
                    UnsupportedPhotometricInterpretationSnafu { pi }
                );
                let data = self.frame_data_u8(frame)?;
                ensure_samples(frame, count * 3, data.len())?;

                let pack = |r: u8, g: u8, b: u8| {
                    (i32::from(r) << 16) | (i32::from(g) << 8) | i32::from(b)
                };
                let pixels = if attributes.is_planar() {
                    let (red, rest) = data.split_at(count);
                    let (green, blue) = rest.split_at(count);
                    (0..count).map(|i| pack(red[i], green[i], blue[i])).collect()
                } else {
                    data.chunks_exact(3)
                        .take(count)
                        .map(|p| pack(p[0], p[1], p[2]))
                        .collect()
                };
                Ok(pixels)
            }
            samples_per_pixel => UnsupportedSamplesPerPixelSnafu { samples_per_pixel }.fail(),
        }
    }

    /// Append a frame.
    ///
    /// Fragmented pixel data records the frame offset
    /// and splits the frame into fragments of at most
    /// [`fragment_size`](Self::fragment_size) bytes.
    /// Native pixel data takes samples in the byte order of this machine
    /// and stores the frame at its position by frame index,
    /// so frames must be added in order.
    pub fn add_frame(&mut self, data: &[u8]) -> Result<()> {
        let frame_index = self.frames;
        let fragment_size = self.fragment_size;
        let bytes_allocated = self.attributes.bytes_allocated();
        let position = self.attributes.uncompressed_frame_size() * frame_index as usize;
        let endian = self.transfer_syntax.endianness();

        match &mut self.item {
            Item::Fragments(sequence) => {
                encapsulation::append_frame(sequence, data, fragment_size);
            }
            Item::Element(element) => {
                let mut data = data.to_vec();
                if bytes_allocated > 1 && endian != local_endianness() {
                    swap_bytes(&mut data, bytes_allocated);
                } else if bytes_allocated == 1
                    && element.vr() == VR::OW
                    && endian == Endianness::Big
                {
                    swap_bytes(&mut data, 2);
                }

                let buffer = element.raw_mut().buffer_mut();
                let bytes = buffer.bytes_mut().context(BufferSnafu)?;
                let end = position + data.len();
                if bytes.len() < end {
                    bytes.resize(end, 0);
                }
                bytes[position..end].copy_from_slice(&data);
                buffer.pad_even(0).context(BufferSnafu)?;
            }
            Item::Sequence(sq) => return InvalidPixelDataSnafu { vr: sq.vr() }.fail(),
        }

        self.frames += 1;
        Ok(())
    }

    /// Write the image attributes and the pixel data item into a data set.
    ///
    /// Lossy pixel data marks the image as derived,
    /// gives it a new SOP instance UID
    /// and appends its method and ratio
    /// to the lossy compression history already in the data set.
    pub fn update_dataset(&self, dataset: &mut Dataset) -> Result<()> {
        if self.attributes.lossy {
            if let Some(image_type) = dataset
                .get_cs_mut(tags::IMAGE_TYPE)
                .context(AccessDatasetSnafu)?
            {
                let mut values = image_type.values().context(AccessDatasetSnafu)?;
                if let Some(first) = values.first_mut() {
                    *first = "DERIVED".to_string();
                }
                image_type.set_values(values).context(AccessDatasetSnafu)?;
            }

            let sop_instance_uid = uid::generate();
            tracing::debug!(
                "Lossy pixel data, new SOP Instance UID {}",
                sop_instance_uid.uid()
            );
            dataset
                .add_element_with_value(tags::SOP_INSTANCE_UID, &sop_instance_uid)
                .context(AccessDatasetSnafu)?;
            dataset
                .add_element_with_value(tags::LOSSY_IMAGE_COMPRESSION, "01")
                .context(AccessDatasetSnafu)?;
            append_value(
                dataset,
                tags::LOSSY_IMAGE_COMPRESSION_METHOD,
                &self.attributes.lossy_method,
            )?;
            append_value(
                dataset,
                tags::LOSSY_IMAGE_COMPRESSION_RATIO,
                &self.attributes.lossy_ratio,
            )?;
        }

        self.attributes
            .write_to(dataset, self.frames)
            .context(WriteAttributesSnafu)?;
        dataset
            .add_item(self.item.clone())
            .context(AccessDatasetSnafu)
    }

    /// Release deferred pixel data bytes.
    pub fn unload(&mut self) {
        self.item.unload();
    }

    /// The MD5 digest of all frames, as upper case hexadecimal.
    pub fn compute_md5(&self) -> Result<String> {
        let mut context = md5::Context::new();
        for frame in 0..self.frames {
            context.consume(self.frame_data_u8(frame)?);
        }
        Ok(format!("{:X}", context.compute()))
    }
}

impl fmt::Display for PixelData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.attributes;
        writeln!(
            f,
            "Pixel Data (VR={}): {}",
            self.item.vr(),
            self.transfer_syntax
        )?;
        writeln!(
            f,
            "    Photometric Interpretation: {}",
            a.photometric_interpretation
        )?;
        writeln!(
            f,
            "    Bits Allocated: {};  Stored: {};  High: {};  Signed: {}",
            a.bits_allocated,
            a.bits_stored,
            a.high_bit,
            a.is_signed()
        )?;
        writeln!(
            f,
            "    Width: {};  Height: {};  Frames: {}",
            a.columns, a.rows, self.frames
        )?;
        if a.samples_per_pixel > 1 {
            writeln!(
                f,
                "    Samples/Pixel: {};  Planar: {}",
                a.samples_per_pixel,
                a.is_planar()
            )?;
        } else {
            writeln!(
                f,
                "    Rescale Slope: {};  Intercept: {}",
                a.rescale_slope, a.rescale_intercept
            )?;
        }
        if a.lossy {
            writeln!(f, "    Lossy: {} ({})", a.lossy_method, a.lossy_ratio)?;
        }
        Ok(())
    }
}

fn ensure_samples(frame: u32, needed: usize, available: usize) -> Result<()> {
    ensure!(
        available >= needed,
        InsufficientDataSnafu {
            frame,
            needed,
            available
        }
    );
    Ok(())
}

/// Append a value to a multi-valued string element,
/// creating the element if absent.
/// A value already ending the list is not repeated.
fn append_value(dataset: &mut Dataset, tag: Tag, value: &str) -> Result<()> {
    let mut values = dataset
        .get_string_array(tag, &[])
        .context(AccessDatasetSnafu)?;
    if !value.is_empty() && values.last().map(String::as_str) != Some(value) {
        values.push(value.to_string());
    }
    dataset
        .add_element_with_value_string(tag, &values.join("\\"))
        .context(AccessDatasetSnafu)
}

fn swap_bytes(data: &mut [u8], unit: usize) {
    for chunk in data.chunks_exact_mut(unit) {
        chunk.reverse();
    }
}

/// Pixel data access over a data set.
pub trait PixelDecoder {
    /// Project the pixel data of the data set.
    fn pixel_data(&self) -> Result<PixelData>;

    /// The MD5 digest of all pixel data frames.
    fn compute_pixel_data_md5(&self) -> Result<String>;
}

impl PixelDecoder for Dataset {
    fn pixel_data(&self) -> Result<PixelData> {
        PixelData::from_dataset(self)
    }

    fn compute_pixel_data_md5(&self) -> Result<String> {
        self.pixel_data()?.compute_md5()
    }
}
