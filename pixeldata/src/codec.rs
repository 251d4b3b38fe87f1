//! Pixel data codecs and their registry.
//!
//! Transfer syntaxes with encapsulated pixel data
//! need a [`PixelDataCodec`] to be decoded into native pixel data
//! and encoded back.
//! Codecs are looked up by transfer syntax UID in a [`CodecRegistry`],
//! which callers build and hand to
//! [`change_transfer_syntax`](crate::Transcode::change_transfer_syntax).

use crate::PixelData;
use dcm_encoding::TransferSyntax;
use dcm_object::Dataset;
use dcm_transfer_syntax_registry::entries::{
    EXPLICIT_VR_BIG_ENDIAN, EXPLICIT_VR_LITTLE_ENDIAN, IMPLICIT_VR_LITTLE_ENDIAN,
};
use snafu::{Backtrace, OptionExt, Snafu};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The possible error conditions when encoding or decoding pixel data.
///
/// Codec implementers should pick the most fitting variant.
/// When none fits, the [`Custom`](CodecError::Custom) variant may be used,
/// most easily through [`snafu::whatever!`].
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum CodecError {
    /// A custom error reported by the codec.
    #[snafu(whatever, display("{}", message))]
    Custom {
        /// The error message.
        message: String,
        /// The underlying error cause, if any.
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync + 'static>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// The pixel data could not be read or assembled.
    #[snafu(display("Could not access pixel data"))]
    PixelData {
        #[snafu(source(from(crate::Error, Box::new)))]
        source: Box<crate::Error>,
    },

    /// The input pixel data is not encapsulated.
    NotEncapsulated,

    /// The input pixel data is not native, it should be decoded first.
    NotNative,

    /// The codec does not accept the given parameter value.
    #[snafu(display("Invalid value `{}` for codec parameter `{}`", value, name))]
    InvalidParameter { name: String, value: String },
}

pub type CodecResult<T, E = CodecError> = std::result::Result<T, E>;

/// An error looking up a codec.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    /// No codec is registered for the transfer syntax.
    #[snafu(display("No registered codec for transfer syntax {}", uid))]
    NoCodec { uid: String, backtrace: Backtrace },
}

/// Codec specific settings, as named textual values.
///
/// Each codec documents the parameters it reads
/// and supplies its own [defaults](PixelDataCodec::default_parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecParameters {
    values: BTreeMap<String, String>,
}

impl CodecParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style variant of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Fetch and parse a parameter.
    ///
    /// Absent parameters yield `Ok(None)`.
    pub fn parse<T: FromStr>(&self, name: &str) -> CodecResult<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .ok()
                .context(InvalidParameterSnafu { name, value })
                .map(Some),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A pixel data codec bound to one transfer syntax.
///
/// Both directions receive the data set being converted,
/// the pixel data as found in it,
/// and the new pixel data to fill,
/// created from the same attributes in the target transfer syntax.
/// The new pixel data is written back into the data set afterwards.
pub trait PixelDataCodec: fmt::Debug + Send + Sync {
    /// A human readable name of the codec.
    fn name(&self) -> &str;

    /// The transfer syntax this codec encodes to and decodes from.
    fn transfer_syntax(&self) -> &TransferSyntax;

    /// The parameters used when the caller gives none.
    fn default_parameters(&self) -> CodecParameters {
        CodecParameters::default()
    }

    /// Compress native pixel data into fragments of `new`.
    fn encode(
        &self,
        dataset: &Dataset,
        old: &PixelData,
        new: &mut PixelData,
        parameters: &CodecParameters,
    ) -> CodecResult<()>;

    /// Decompress the fragments of `old` into frames of `new`.
    fn decode(
        &self,
        dataset: &Dataset,
        old: &PixelData,
        new: &mut PixelData,
        parameters: &CodecParameters,
    ) -> CodecResult<()>;
}

/// A collection of codecs keyed by transfer syntax UID.
#[derive(Debug, Default, Clone)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, Arc<dyn PixelDataCodec>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codec, returning the one it replaces, if any.
    pub fn register<C>(&mut self, codec: C) -> Option<Arc<dyn PixelDataCodec>>
    where
        C: PixelDataCodec + 'static,
    {
        let uid = codec.transfer_syntax().uid().to_string();
        tracing::debug!("Registering codec {} for {}", codec.name(), uid);
        self.codecs.insert(uid, Arc::new(codec))
    }

    /// The codec for a transfer syntax.
    pub fn get(&self, ts: &TransferSyntax) -> Result<&dyn PixelDataCodec, RegistryError> {
        match self.codecs.get(ts.uid()) {
            Some(codec) => Ok(codec.as_ref()),
            None => NoCodecSnafu { uid: ts.uid() }.fail(),
        }
    }

    /// Whether pixel data in the transfer syntax can be handled.
    ///
    /// The uncompressed transfer syntaxes need no codec.
    pub fn has_codec(&self, ts: &TransferSyntax) -> bool {
        [
            &IMPLICIT_VR_LITTLE_ENDIAN,
            &EXPLICIT_VR_LITTLE_ENDIAN,
            &EXPLICIT_VR_BIG_ENDIAN,
        ]
        .iter()
        .any(|native| native.uid() == ts.uid())
            || self.codecs.contains_key(ts.uid())
    }

    /// The UIDs of the transfer syntaxes with a registered codec.
    pub fn registered_transfer_syntaxes(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// The names of the registered codecs.
    pub fn codec_names(&self) -> impl Iterator<Item = &str> {
        self.codecs.values().map(|c| c.name())
    }
}

/// Rearrange 8-bit color samples between interleaved (0)
/// and planar (1) configuration, in place.
///
/// `old_planar_configuration` is the layout of the input.
pub fn change_planar_configuration(
    pixel_data: &mut [u8],
    bits_allocated: u16,
    samples_per_pixel: u16,
    old_planar_configuration: u16,
) -> CodecResult<()> {
    if bits_allocated != 8 {
        snafu::whatever!("BitsAllocated={} is not supported", bits_allocated);
    }
    let samples = usize::from(samples_per_pixel);
    if samples == 0 {
        return Ok(());
    }
    let pixels = pixel_data.len() / samples;
    let values = pixels * samples;
    let mut buffer = vec![0; values];
    for n in 0..pixels {
        for s in 0..samples {
            if old_planar_configuration == 1 {
                buffer[n * samples + s] = pixel_data[n + pixels * s];
            } else {
                buffer[n + pixels * s] = pixel_data[n * samples + s];
            }
        }
    }
    pixel_data[..values].copy_from_slice(&buffer);
    Ok(())
}
