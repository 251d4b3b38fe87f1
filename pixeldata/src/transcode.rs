use dcm_dictionary_std::tags;
use dcm_encoding::TransferSyntax;
use dcm_object::Dataset;
use dcm_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
use snafu::{ResultExt, Snafu};

use crate::codec::{CodecError, CodecParameters, CodecRegistry, RegistryError};
use crate::PixelData;

#[derive(Debug, Snafu)]
pub struct Error(InnerError);

/// An error occurred during the transfer syntax change.
#[derive(Debug, Snafu)]
pub(crate) enum InnerError {
    /// Could not read pixel data of receiving data set
    ReadPixelData { source: crate::Error },

    /// No codec for the transfer syntax
    MissingCodec { source: RegistryError },

    /// Could not decode pixel data of receiving data set
    DecodePixelData { source: CodecError },

    /// Could not encode pixel data to target transfer syntax
    EncodePixelData { source: CodecError },

    /// Could not copy frame {frame} of native pixel data
    CopyFrame { frame: u32, source: crate::Error },

    /// Could not write pixel data back into the data set
    WritePixelData { source: crate::Error },

    /// Could not convert data set to the target byte order
    ConvertDataset { source: dcm_object::Error },
}

/// Alias for the result of changing the transfer syntax of a data set.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Interface for converting a data set
/// to comply with a different transfer syntax.
pub trait Transcode {
    /// Convert the receiving data set to the transfer syntax `ts`.
    ///
    /// Pixel data is decoded when leaving an encapsulated transfer syntax,
    /// encoded when entering one,
    /// and copied frame by frame between native transfer syntaxes.
    /// Between two encapsulated transfer syntaxes
    /// the data set is first decoded to explicit VR little endian.
    /// Every element then takes the byte order of `ts`.
    ///
    /// Codecs are taken from `codecs`,
    /// with their default parameters unless `parameters` is given.
    /// In case of an encoding error,
    /// the data set may be left in an intermediate state.
    fn change_transfer_syntax(
        &mut self,
        ts: &TransferSyntax,
        codecs: &CodecRegistry,
        parameters: Option<&CodecParameters>,
    ) -> Result<()>;
}

impl Transcode for Dataset {
    fn change_transfer_syntax(
        &mut self,
        ts: &TransferSyntax,
        codecs: &CodecRegistry,
        parameters: Option<&CodecParameters>,
    ) -> Result<()> {
        let mut old_ts = self.transfer_syntax().clone();
        if old_ts == *ts {
            return Ok(());
        }
        tracing::debug!("Changing transfer syntax from {} to {}", old_ts, ts);

        if old_ts.is_encapsulated() && ts.is_encapsulated() {
            self.change_transfer_syntax(&EXPLICIT_VR_LITTLE_ENDIAN, codecs, parameters)?;
            old_ts = EXPLICIT_VR_LITTLE_ENDIAN;
        }

        if self.contains(tags::PIXEL_DATA) {
            let old = PixelData::from_dataset(self).context(ReadPixelDataSnafu)?;
            let mut new = PixelData::with_template(ts.clone(), &old).context(ReadPixelDataSnafu)?;

            if old_ts.is_encapsulated() {
                let codec = codecs.get(&old_ts).context(MissingCodecSnafu)?;
                let parameters = parameters
                    .cloned()
                    .unwrap_or_else(|| codec.default_parameters());
                tracing::debug!("Decoding pixel data with {}", codec.name());
                codec
                    .decode(self, &old, &mut new, &parameters)
                    .context(DecodePixelDataSnafu)?;
            } else if ts.is_encapsulated() {
                let codec = codecs.get(ts).context(MissingCodecSnafu)?;
                let parameters = parameters
                    .cloned()
                    .unwrap_or_else(|| codec.default_parameters());
                tracing::debug!("Encoding pixel data with {}", codec.name());
                codec
                    .encode(self, &old, &mut new, &parameters)
                    .context(EncodePixelDataSnafu)?;
            } else {
                for frame in 0..old.number_of_frames() {
                    let data = old
                        .frame_data_u8(frame)
                        .context(CopyFrameSnafu { frame })?;
                    new.add_frame(&data).context(CopyFrameSnafu { frame })?;
                }
            }

            new.update_dataset(self).context(WritePixelDataSnafu)?;
        }

        self.set_internal_transfer_syntax(ts)
            .context(ConvertDatasetSnafu)?;
        Ok(())
    }
}
