//! Encapsulated pixel data.

use crate::dump::{self, DumpOptions};
use crate::{BufferSnafu, Result};
use dcm_core::{Tag, VR};
use dcm_encoding::buffer::{local_endianness, ByteBuffer};
use dcm_encoding::write::{element_header_length, ITEM_HEADER_LENGTH};
use dcm_encoding::{Endianness, TransferSyntax, WriteOptions};
use smallvec::SmallVec;
use snafu::ResultExt;

/// Inline storage for the usual handful of fragments and offsets.
pub type C<T> = SmallVec<[T; 2]>;

/// A sequence of encapsulated pixel data fragments (OB or OW),
/// preceded by an optional basic offset table.
///
/// The offset table holds the byte offset of the first fragment
/// of each frame, relative to the first fragment.
#[derive(Debug, Clone)]
pub struct FragmentSequence {
    tag: Tag,
    vr: VR,
    position: u64,
    endian: Endianness,
    offset_table: Option<C<u32>>,
    fragments: C<ByteBuffer>,
}

impl FragmentSequence {
    /// An empty fragment sequence with no offset table,
    /// in the byte order of this machine.
    pub fn new(tag: Tag, vr: VR) -> Self {
        FragmentSequence::create(tag, vr, 0, local_endianness())
    }

    /// An empty fragment sequence read at `position` of a stream.
    pub fn create(tag: Tag, vr: VR, position: u64, endian: Endianness) -> Self {
        FragmentSequence {
            tag,
            vr,
            position,
            endian,
            offset_table: None,
            fragments: C::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn vr(&self) -> VR {
        self.vr
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn endian(&self) -> Endianness {
        self.endian
    }

    /// Whether an offset table was set, even an empty one.
    pub fn has_offset_table(&self) -> bool {
        self.offset_table.is_some()
    }

    /// The offsets of the basic offset table, empty if there is none.
    pub fn offset_table(&self) -> &[u32] {
        self.offset_table.as_deref().unwrap_or(&[])
    }

    /// Mutable access to the offset table, creating an empty one if absent.
    pub fn offset_table_mut(&mut self) -> &mut C<u32> {
        self.offset_table.get_or_insert_with(C::new)
    }

    /// Replace the offset table.
    pub fn set_offset_table(&mut self, offsets: &[u32]) {
        self.offset_table = Some(offsets.iter().copied().collect());
    }

    /// Replace the offset table with the 32-bit values of a buffer.
    pub fn set_offset_table_from_buffer(&mut self, table: &ByteBuffer) -> Result<()> {
        let offsets = table
            .values::<u32>()
            .context(BufferSnafu { tag: self.tag })?;
        self.offset_table = Some(offsets.into_iter().collect());
        Ok(())
    }

    /// The offset table encoded in the sequence's byte order.
    pub fn offset_table_buffer(&self) -> Result<ByteBuffer> {
        let mut buffer = ByteBuffer::new(self.endian);
        buffer
            .set_values(self.offset_table())
            .context(BufferSnafu { tag: self.tag })?;
        Ok(buffer)
    }

    pub fn fragments(&self) -> &[ByteBuffer] {
        &self.fragments
    }

    pub fn fragments_mut(&mut self) -> &mut C<ByteBuffer> {
        &mut self.fragments
    }

    /// Append a fragment. Its byte order is kept as is.
    pub fn add_fragment(&mut self, fragment: ByteBuffer) {
        self.fragments.push(fragment);
    }

    /// The number of bytes this sequence takes when written in `syntax`:
    /// the header, the offset table item and one item per fragment.
    pub fn write_length(&self, syntax: &TransferSyntax, options: WriteOptions) -> u32 {
        let mut length = element_header_length(self.vr, syntax) + ITEM_HEADER_LENGTH;
        if options.write_fragment_offset_table {
            if let Some(table) = &self.offset_table {
                length += table.len() as u32 * 4;
            }
        }
        length
            + self
                .fragments
                .iter()
                .map(|f| ITEM_HEADER_LENGTH + f.len() as u32)
                .sum::<u32>()
    }

    /// Rewrite every fragment in the given byte order.
    pub fn convert_to(&mut self, endian: Endianness) -> Result<()> {
        let unit = self.vr.unit_size() as usize;
        for fragment in &mut self.fragments {
            fragment
                .convert_to(endian, unit)
                .context(BufferSnafu { tag: self.tag })?;
        }
        self.endian = endian;
        Ok(())
    }

    /// Load every deferred fragment into memory.
    pub fn preload(&mut self) -> Result<()> {
        for fragment in &mut self.fragments {
            fragment.materialize().context(BufferSnafu { tag: self.tag })?;
        }
        Ok(())
    }

    /// Release every fragment which can be loaded again.
    pub fn unload(&mut self) {
        for fragment in &mut self.fragments {
            fragment.release();
        }
    }

    pub(crate) fn dump(&self, out: &mut String, prefix: &str, _options: DumpOptions) {
        out.push_str(prefix);
        out.push_str(&format!(
            "{} {} {} {}",
            self.tag,
            self.vr,
            dump::tag_name(self.tag),
            if self.has_offset_table() {
                "/w Offset Table"
            } else {
                ""
            }
        ));
        for (i, fragment) in self.fragments.iter().enumerate() {
            out.push('\n');
            out.push_str(prefix);
            out.push_str(&format!(" Fragment {}:  {} bytes", i, fragment.len()));
        }
    }
}
