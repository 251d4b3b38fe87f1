//! Encapsulated pixel data.
//!
//! This module resolves which fragments of an encapsulated pixel data
//! sequence make up each frame,
//! and splits frames into fragments when building one.
use crate::{Result, UndeterminedFrameLengthSnafu};
use dcm_core::{Tag, VR};
use dcm_encoding::{ByteBuffer, Endianness};
use dcm_object::FragmentSequence;
use snafu::ensure;

/// Size of the item header preceding every fragment.
const FRAGMENT_HEADER_LENGTH: u64 = 8;

/// Encapsulate the pixel data of the frames.
/// If `fragment_size` > 0, frames are split into fragments of at most that size,
/// otherwise each frame takes one fragment.
///
/// The offset table receives one entry per frame.
///
/// # Example
/// ```
/// use dcm_dictionary_std::tags;
/// use dcm_encoding::Endianness;
/// use dcm_pixeldata::encapsulation::encapsulate;
///
/// // Single 512x512 frame
/// let frames = vec![vec![0; 262144]];
/// let sequence = encapsulate(tags::PIXEL_DATA, &frames, 0, Endianness::Little);
/// assert_eq!(sequence.fragments().len(), 1);
/// assert_eq!(sequence.offset_table(), &[0]);
/// ```
pub fn encapsulate(
    tag: Tag,
    frames: &[Vec<u8>],
    fragment_size: u32,
    endian: Endianness,
) -> FragmentSequence {
    let mut sequence = FragmentSequence::create(tag, VR::OB, 0, endian);
    for frame in frames {
        append_frame(&mut sequence, frame, fragment_size);
    }
    sequence
}

/// Append one frame to a fragment sequence,
/// recording its offset in the offset table.
///
/// The frame is split into chunks of at most `fragment_size` bytes,
/// each one padded to an even length.
pub fn append_frame(sequence: &mut FragmentSequence, data: &[u8], fragment_size: u32) {
    let offset = sequence
        .fragments()
        .iter()
        .map(|f| FRAGMENT_HEADER_LENGTH + f.len() as u64)
        .sum::<u64>();
    sequence.offset_table_mut().push(offset as u32);

    let endian = sequence.endian();
    for fragment in split_fragments(data, fragment_size, endian) {
        sequence.add_fragment(fragment);
    }
}

/// Split bytes into fragments of at most `fragment_size` bytes.
/// A size of 0 keeps all bytes in one fragment.
pub fn split_fragments(data: &[u8], fragment_size: u32, endian: Endianness) -> Vec<ByteBuffer> {
    if data.is_empty() {
        return Vec::new();
    }
    let chunk = match fragment_size as usize {
        0 => data.len(),
        size => size,
    };
    data.chunks(chunk)
        .map(|chunk| {
            let mut bytes = chunk.to_vec();
            if bytes.len() % 2 != 0 {
                bytes.push(0);
            }
            ByteBuffer::from_bytes(bytes, endian)
        })
        .collect()
}

/// Resolve the fragments holding frame `frame` of `frames`.
///
/// In order of preference:
/// a single frame owns every fragment,
/// one fragment per frame maps by index,
/// an offset table with one entry per frame is followed,
/// and otherwise the frame boundaries are guessed from fragment lengths.
/// An offset table which does not land on fragment boundaries is ignored.
///
/// The frame index is not range checked here.
pub fn frame_fragments(
    sequence: &FragmentSequence,
    frames: u32,
    frame: u32,
) -> Result<Vec<&ByteBuffer>> {
    let fragments = sequence.fragments();
    let frames = frames as usize;
    let frame = frame as usize;

    if frames == 1 {
        return Ok(fragments.iter().collect());
    }

    if fragments.len() == frames {
        return Ok(fragments.get(frame).into_iter().collect());
    }

    let table = sequence.offset_table();
    if sequence.has_offset_table() && table.len() == frames {
        if let Some(found) = follow_offset_table(fragments, table, frame) {
            return Ok(found);
        }
        tracing::warn!(
            "Offset table entry {} does not match a fragment boundary, guessing frame layout",
            table[frame]
        );
    }

    guess_frame_fragments(fragments, frames, frame)
}

fn follow_offset_table<'a>(
    fragments: &'a [ByteBuffer],
    table: &[u32],
    frame: usize,
) -> Option<Vec<&'a ByteBuffer>> {
    let mut offset = u64::from(table[frame]);
    let stop = table.get(frame + 1).map_or(u64::MAX, |&s| u64::from(s));

    let mut pos = 0;
    let mut i = 0;
    while pos < offset && i < fragments.len() {
        pos += FRAGMENT_HEADER_LENGTH + fragments[i].len() as u64;
        i += 1;
    }
    if pos != offset {
        return None;
    }

    let mut found = Vec::new();
    while offset < stop && i < fragments.len() {
        found.push(&fragments[i]);
        offset += FRAGMENT_HEADER_LENGTH + fragments[i].len() as u64;
        i += 1;
    }
    Some(found)
}

fn guess_frame_fragments(
    fragments: &[ByteBuffer],
    frames: usize,
    frame: usize,
) -> Result<Vec<&ByteBuffer>> {
    let fragment_size = match fragments.first() {
        Some(first) => first.len(),
        None => return Ok(Vec::new()),
    };

    if fragments.iter().all(|f| f.len() == fragment_size) {
        ensure!(
            frames > 0 && fragments.len() % frames == 0,
            UndeterminedFrameLengthSnafu {
                fragments: fragments.len(),
                frames: frames as u32,
            }
        );
        let count = fragments.len() / frames;
        let start = frame * count;
        return Ok(fragments
            .iter()
            .skip(start)
            .take(count)
            .collect());
    }

    // a fragment shorter or longer than the first one closes a frame
    let mut boundaries = 0;
    let mut start = 0;
    while start < fragments.len() && boundaries < frame {
        if fragments[start].len() != fragment_size {
            boundaries += 1;
        }
        start += 1;
    }

    let mut found = Vec::new();
    for fragment in &fragments[start..] {
        found.push(fragment);
        if fragment.len() != fragment_size {
            break;
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcm_dictionary_std::tags;

    fn sequence_of(lengths: &[usize]) -> FragmentSequence {
        let mut sequence = FragmentSequence::create(tags::PIXEL_DATA, VR::OB, 0, Endianness::Little);
        for (i, &len) in lengths.iter().enumerate() {
            sequence.add_fragment(ByteBuffer::from_bytes(vec![i as u8; len], Endianness::Little));
        }
        sequence
    }

    fn markers(found: &[&ByteBuffer]) -> Vec<u8> {
        found.iter().map(|f| f.bytes().unwrap()[0]).collect()
    }

    #[test]
    fn test_encapsulated_pixels() {
        let enc = encapsulate(
            tags::PIXEL_DATA,
            &[vec![20, 30, 40], vec![50, 60, 70, 80]],
            0,
            Endianness::Little,
        );
        assert_eq!(enc.offset_table(), &[0, 12]);
        assert_eq!(enc.fragments().len(), 2);
        assert_eq!(enc.fragments()[0].len(), 4);
        assert_eq!(enc.fragments()[1].len(), 4);

        let enc = encapsulate(tags::PIXEL_DATA, &[vec![20, 30, 40]], 2, Endianness::Little);
        assert_eq!(enc.offset_table(), &[0]);
        assert_eq!(enc.fragments().len(), 2);
        assert_eq!(enc.fragments()[0].bytes().unwrap(), &[20, 30]);
        assert_eq!(enc.fragments()[1].bytes().unwrap(), &[40, 0]);
    }

    #[test]
    fn single_frame_owns_all_fragments() {
        let sequence = sequence_of(&[4, 4, 2]);
        let found = frame_fragments(&sequence, 1, 0).unwrap();
        assert_eq!(markers(&found), vec![0, 1, 2]);
    }

    #[test]
    fn offset_table_delimits_frames() {
        let mut sequence = sequence_of(&[4, 2, 6, 4, 4]);
        // frame 0: fragments 0 and 1, frame 1: fragment 2, frame 2: fragments 3 and 4
        sequence.set_offset_table(&[0, 12 + 10, 12 + 10 + 14]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 0).unwrap()), vec![0, 1]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 1).unwrap()), vec![2]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 2).unwrap()), vec![3, 4]);
    }

    #[test]
    fn offset_table_off_boundary_falls_back_to_lengths() {
        let mut sequence = sequence_of(&[4, 2, 4, 2, 4, 2]);
        sequence.set_offset_table(&[0, 13, 27]);
        // boundaries are guessed from the short fragments
        assert_eq!(markers(&frame_fragments(&sequence, 3, 1).unwrap()), vec![2, 3]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 2).unwrap()), vec![4, 5]);
    }

    #[test]
    fn equal_fragments_split_evenly() {
        let sequence = sequence_of(&[4, 4, 4, 4, 4, 4]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 0).unwrap()), vec![0, 1]);
        assert_eq!(markers(&frame_fragments(&sequence, 3, 2).unwrap()), vec![4, 5]);

        let uneven = sequence_of(&[4, 4, 4, 4, 4]);
        assert!(matches!(
            frame_fragments(&uneven, 2, 0),
            Err(crate::Error::UndeterminedFrameLength { .. })
        ));
    }

    #[test]
    fn no_fragments_yield_empty_frames() {
        let sequence = sequence_of(&[]);
        assert!(frame_fragments(&sequence, 2, 1).unwrap().is_empty());
    }
}
