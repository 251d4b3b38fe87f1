//! The endian-aware byte container behind every element value.
//!
//! A [`ByteBuffer`] holds the raw bytes of a value together with the byte
//! order they are stored in. The bytes may be resident in memory or deferred,
//! meaning that they live in an external source (such as a file) and are
//! only brought into memory by an explicit [`ByteBuffer::materialize`].
//! Accessing the bytes of a buffer which was not materialized is an error
//! rather than a hidden read.

use crate::text::{DecodeTextError, EncodeTextError, SpecificCharacterSet, TextCodec};
use byteordered::{ByteOrdered, Endianness};
use snafu::{Backtrace, ResultExt, Snafu};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The value bytes are deferred and have not been loaded
    #[snafu(display("Value of {} bytes is deferred and was not loaded", length))]
    NotLoaded { length: u32, backtrace: Backtrace },
    /// Could not read deferred value bytes
    #[snafu(display("Could not read {} bytes at offset {}", length, offset))]
    ReadSegment {
        offset: u64,
        length: u32,
        source: io::Error,
        backtrace: Backtrace,
    },
    /// Could not decode text
    #[snafu(display("Could not decode text"))]
    DecodeText {
        #[snafu(backtrace)]
        source: DecodeTextError,
    },
    /// Could not encode text
    #[snafu(display("Could not encode text"))]
    EncodeText {
        #[snafu(backtrace)]
        source: EncodeTextError,
    },
    /// Could not encode a binary value
    #[snafu(display("Could not write binary value"))]
    WriteValue {
        source: io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The byte order of the running machine.
pub fn local_endianness() -> Endianness {
    if cfg!(target_endian = "big") {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

/// A source of deferred value bytes.
pub trait ByteSource: fmt::Debug + Send + Sync {
    /// Read `length` bytes starting at `offset`.
    fn read_range(&self, offset: u64, length: u32) -> io::Result<Vec<u8>>;
}

/// Deferred bytes held in a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl ByteSource for FileSource {
    fn read_range(&self, offset: u64, length: u32) -> io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut data = vec![0; length as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }
}

/// A window into a byte source.
#[derive(Debug, Clone)]
pub struct Segment {
    source: Arc<dyn ByteSource>,
    offset: u64,
    length: u32,
}

impl Segment {
    pub fn new(source: Arc<dyn ByteSource>, offset: u64, length: u32) -> Self {
        Segment {
            source,
            offset,
            length,
        }
    }

    /// Offset of the first byte in the source.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes in the window.
    pub fn length(&self) -> u32 {
        self.length
    }

    fn read(&self) -> Result<Vec<u8>> {
        self.source
            .read_range(self.offset, self.length)
            .context(ReadSegmentSnafu {
                offset: self.offset,
                length: self.length,
            })
    }
}

#[derive(Debug, Clone)]
enum Storage {
    Resident(Vec<u8>),
    Deferred(Segment),
    /// Loaded from a segment and untouched since,
    /// so it may be released again.
    Loaded { data: Vec<u8>, segment: Segment },
}

/// A fixed-size value type which can be stored in a byte buffer.
pub trait ElementValue: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// Size of one value, in bytes.
    const SIZE: usize;

    /// Read one value.
    fn read_from<R: Read>(reader: &mut ByteOrdered<R, Endianness>) -> io::Result<Self>;

    /// Write one value.
    fn write_to<W: Write>(self, writer: &mut ByteOrdered<W, Endianness>) -> io::Result<()>;
}

macro_rules! impl_element_value {
    ($t: ty, $size: expr, $read: ident, $write: ident) => {
        impl ElementValue for $t {
            const SIZE: usize = $size;

            #[inline]
            fn read_from<R: Read>(reader: &mut ByteOrdered<R, Endianness>) -> io::Result<Self> {
                reader.$read()
            }

            #[inline]
            fn write_to<W: Write>(
                self,
                writer: &mut ByteOrdered<W, Endianness>,
            ) -> io::Result<()> {
                writer.$write(self)
            }
        }
    };
}

impl_element_value!(u8, 1, read_u8, write_u8);
impl_element_value!(u16, 2, read_u16, write_u16);
impl_element_value!(i16, 2, read_i16, write_i16);
impl_element_value!(u32, 4, read_u32, write_u32);
impl_element_value!(i32, 4, read_i32, write_i32);
impl_element_value!(f32, 4, read_f32, write_f32);
impl_element_value!(f64, 8, read_f64, write_f64);

/// An endian-aware container of value bytes.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    endian: Endianness,
    charset: SpecificCharacterSet,
    storage: Storage,
}

impl Default for ByteBuffer {
    fn default() -> Self {
        ByteBuffer::new(local_endianness())
    }
}

impl ByteBuffer {
    /// An empty buffer in the given byte order.
    pub fn new(endian: Endianness) -> Self {
        ByteBuffer::from_bytes(Vec::new(), endian)
    }

    /// A buffer over bytes already stored in the given byte order.
    pub fn from_bytes(data: Vec<u8>, endian: Endianness) -> Self {
        ByteBuffer {
            endian,
            charset: SpecificCharacterSet::Default,
            storage: Storage::Resident(data),
        }
    }

    /// A buffer whose bytes stay in `segment` until materialized.
    pub fn deferred(segment: Segment, endian: Endianness) -> Self {
        ByteBuffer {
            endian,
            charset: SpecificCharacterSet::Default,
            storage: Storage::Deferred(segment),
        }
    }

    /// Byte order of the stored bytes.
    #[inline]
    pub fn endian(&self) -> Endianness {
        self.endian
    }

    /// The character set used for text access.
    #[inline]
    pub fn charset(&self) -> SpecificCharacterSet {
        self.charset
    }

    /// Change the character set used for text access.
    /// The stored bytes are not touched.
    pub fn set_charset(&mut self, charset: SpecificCharacterSet) {
        self.charset = charset;
    }

    /// Number of value bytes, known even while deferred.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Resident(data) | Storage::Loaded { data, .. } => data.len(),
            Storage::Deferred(segment) => segment.length as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the bytes are not in memory.
    pub fn is_deferred(&self) -> bool {
        matches!(self.storage, Storage::Deferred(_))
    }

    /// Bring deferred bytes into memory. No-op when already resident.
    pub fn materialize(&mut self) -> Result<()> {
        if let Storage::Deferred(segment) = &self.storage {
            let data = segment.read()?;
            let segment = segment.clone();
            self.storage = Storage::Loaded { data, segment };
        }
        Ok(())
    }

    /// Drop bytes which can be read again from their source.
    ///
    /// Buffers created in memory or modified since loading
    /// are kept, as they have nowhere to be reloaded from.
    pub fn release(&mut self) {
        if let Storage::Loaded { segment, .. } = &self.storage {
            self.storage = Storage::Deferred(segment.clone());
        }
    }

    /// The stored bytes.
    pub fn bytes(&self) -> Result<&[u8]> {
        match &self.storage {
            Storage::Resident(data) | Storage::Loaded { data, .. } => Ok(data),
            Storage::Deferred(segment) => NotLoadedSnafu {
                length: segment.length,
            }
            .fail(),
        }
    }

    /// Mutable access to the stored bytes.
    /// The buffer no longer matches its source afterwards.
    pub fn bytes_mut(&mut self) -> Result<&mut Vec<u8>> {
        if let Storage::Loaded { data, .. } = &mut self.storage {
            let data = std::mem::take(data);
            self.storage = Storage::Resident(data);
        }
        match &mut self.storage {
            Storage::Resident(data) | Storage::Loaded { data, .. } => Ok(data),
            Storage::Deferred(segment) => NotLoadedSnafu {
                length: segment.length,
            }
            .fail(),
        }
    }

    /// Replace the contents with bytes in the buffer's byte order.
    pub fn set_bytes(&mut self, data: Vec<u8>) {
        self.storage = Storage::Resident(data);
    }

    /// Remove all bytes.
    pub fn clear(&mut self) {
        self.storage = Storage::Resident(Vec::new());
    }

    /// Reverse the bytes of every `unit` sized chunk in place.
    /// A trailing partial chunk is left as is.
    pub fn swap(&mut self, unit: usize) -> Result<()> {
        if unit <= 1 {
            return Ok(());
        }
        for chunk in self.bytes_mut()?.chunks_exact_mut(unit) {
            chunk.reverse();
        }
        Ok(())
    }

    /// Convert the stored bytes to the given byte order,
    /// swapping in units of `unit` bytes.
    ///
    /// Deferred bytes are loaded first, since they must be rewritten.
    /// When `unit` is 1 or less only the recorded byte order changes.
    pub fn convert_to(&mut self, endian: Endianness, unit: usize) -> Result<()> {
        if self.endian == endian {
            return Ok(());
        }
        if unit > 1 && !self.is_empty() {
            self.materialize()?;
            self.swap(unit)?;
        }
        self.endian = endian;
        Ok(())
    }

    /// Decode the bytes as text in the buffer's character set,
    /// without trailing space and NUL padding.
    pub fn string(&self) -> Result<String> {
        let decoded = self.charset.decode(self.bytes()?).context(DecodeTextSnafu)?;
        let trimmed_len = decoded.trim_end_matches(|c| c == ' ' || c == '\0').len();
        let mut decoded = decoded;
        decoded.truncate(trimmed_len);
        Ok(decoded)
    }

    /// Encode text in the buffer's character set,
    /// padding odd lengths with `padding`.
    pub fn set_string(&mut self, value: &str, padding: u8) -> Result<()> {
        let mut data = self.charset.encode(value).context(EncodeTextSnafu)?;
        if data.len() % 2 == 1 {
            data.push(padding);
        }
        self.set_bytes(data);
        Ok(())
    }

    /// Decode every complete value in the buffer's byte order.
    pub fn values<T: ElementValue>(&self) -> Result<Vec<T>> {
        let data = self.bytes()?;
        let count = data.len() / T::SIZE;
        let mut reader = ByteOrdered::runtime(data, self.endian);
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            // the slice holds at least `count` values
            out.push(T::read_from(&mut reader).unwrap_or_default());
        }
        Ok(out)
    }

    /// Decode the value at the given index, if present.
    pub fn value_at<T: ElementValue>(&self, index: usize) -> Result<Option<T>> {
        let data = self.bytes()?;
        let start = index * T::SIZE;
        match data.get(start..start + T::SIZE) {
            Some(chunk) => {
                let mut reader = ByteOrdered::runtime(chunk, self.endian);
                Ok(Some(T::read_from(&mut reader).unwrap_or_default()))
            }
            None => Ok(None),
        }
    }

    /// Encode the values in the buffer's byte order, replacing the contents.
    pub fn set_values<T: ElementValue>(&mut self, values: &[T]) -> Result<()> {
        let mut data = Vec::with_capacity(values.len() * T::SIZE);
        {
            let mut writer = ByteOrdered::runtime(&mut data, self.endian);
            for v in values {
                v.write_to(&mut writer).context(WriteValueSnafu)?;
            }
        }
        self.set_bytes(data);
        Ok(())
    }

    /// Pad the contents to an even length.
    pub fn pad_even(&mut self, padding: u8) -> Result<()> {
        let data = self.bytes_mut()?;
        if data.len() % 2 == 1 {
            data.push(padding);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn typed_values_follow_buffer_endianness() {
        let mut buf = ByteBuffer::new(Endianness::Big);
        buf.set_values(&[0x0102u16, 0x0304]).unwrap();
        assert_eq!(buf.bytes().unwrap(), &[1, 2, 3, 4]);
        assert_eq!(buf.values::<u16>().unwrap(), vec![0x0102, 0x0304]);

        buf.convert_to(Endianness::Little, 2).unwrap();
        assert_eq!(buf.bytes().unwrap(), &[2, 1, 4, 3]);
        assert_eq!(buf.values::<u16>().unwrap(), vec![0x0102, 0x0304]);
        assert_eq!(buf.value_at::<u16>(1).unwrap(), Some(0x0304));
        assert_eq!(buf.value_at::<u16>(2).unwrap(), None);
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let mut buf = ByteBuffer::from_bytes(vec![1, 2, 3, 4, 5, 6, 7, 8], Endianness::Little);
        buf.swap(4).unwrap();
        assert_eq!(buf.bytes().unwrap(), &[4, 3, 2, 1, 8, 7, 6, 5]);
        buf.swap(4).unwrap();
        assert_eq!(buf.bytes().unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn unit_one_only_relabels() {
        let mut buf = ByteBuffer::from_bytes(vec![1, 2], Endianness::Little);
        buf.convert_to(Endianness::Big, 1).unwrap();
        assert_eq!(buf.endian(), Endianness::Big);
        assert_eq!(buf.bytes().unwrap(), &[1, 2]);
    }

    #[test]
    fn strings_are_padded_and_trimmed() {
        let mut buf = ByteBuffer::new(Endianness::Little);
        buf.set_string("ABC", b' ').unwrap();
        assert_eq!(buf.bytes().unwrap(), b"ABC ");
        assert_eq!(buf.string().unwrap(), "ABC");

        buf.set_string("1.2.3", 0).unwrap();
        assert_eq!(buf.bytes().unwrap(), b"1.2.3\0");
        assert_eq!(buf.string().unwrap(), "1.2.3");
    }

    #[test]
    fn charset_drives_text_encoding() {
        let mut buf = ByteBuffer::new(Endianness::Little);
        buf.set_charset(SpecificCharacterSet::IsoIr192);
        buf.set_string("Simões", b' ').unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.string().unwrap(), "Simões");

        buf.set_charset(SpecificCharacterSet::Default);
        assert!(buf.set_string("Simões", b' ').is_err());
    }

    #[test]
    fn deferred_bytes_need_materializing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xAA, 0xBB, 0x01, 0x00, 0x02, 0x00]).unwrap();
        file.flush().unwrap();

        let source: Arc<dyn ByteSource> = Arc::new(FileSource::new(file.path()));
        let mut buf = ByteBuffer::deferred(Segment::new(source, 2, 4), Endianness::Little);
        assert_eq!(buf.len(), 4);
        assert!(buf.is_deferred());
        assert!(matches!(buf.bytes(), Err(Error::NotLoaded { length: 4, .. })));

        buf.materialize().unwrap();
        assert_eq!(buf.values::<u16>().unwrap(), vec![1, 2]);

        buf.release();
        assert!(buf.is_deferred());

        // conversion loads, and the swapped bytes stay resident
        buf.convert_to(Endianness::Big, 2).unwrap();
        buf.release();
        assert!(!buf.is_deferred());
        assert_eq!(buf.bytes().unwrap(), &[0, 1, 0, 2]);
    }

    #[test]
    fn pad_even_appends_once() {
        let mut buf = ByteBuffer::from_bytes(vec![1, 2, 3], Endianness::Little);
        buf.pad_even(0).unwrap();
        assert_eq!(buf.len(), 4);
        buf.pad_even(0).unwrap();
        assert_eq!(buf.len(), 4);
    }
}
