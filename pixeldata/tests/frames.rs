use std::sync::Arc;

use dcm_core::VR;
use dcm_dictionary_std::tags;
use dcm_encoding::buffer::{FileSource, Segment};
use dcm_encoding::{ByteBuffer, Endianness};
use dcm_object::{Dataset, Element, FragmentSequence};
use dcm_pixeldata::{PixelData, PixelDecoder};
use dcm_transfer_syntax_registry::entries::{EXPLICIT_VR_LITTLE_ENDIAN, RLE_LOSSLESS};
use rstest::rstest;

fn image(ds: &mut Dataset, columns: u16, rows: u16, bits: u16, frames: i32) {
    ds.add_element_with_value(tags::COLUMNS, columns).unwrap();
    ds.add_element_with_value(tags::ROWS, rows).unwrap();
    ds.add_element_with_value(tags::BITS_ALLOCATED, bits).unwrap();
    ds.add_element_with_value(tags::BITS_STORED, bits).unwrap();
    ds.add_element_with_value(tags::SAMPLES_PER_PIXEL, 1_u16)
        .unwrap();
    ds.add_element_with_value(tags::PHOTOMETRIC_INTERPRETATION, "MONOCHROME2")
        .unwrap();
    ds.add_element_with_value(tags::NUMBER_OF_FRAMES, frames)
        .unwrap();
}

fn native(columns: u16, rows: u16, frames: i32, pixels: &[u8]) -> Dataset {
    let mut ds = Dataset::new(EXPLICIT_VR_LITTLE_ENDIAN);
    image(&mut ds, columns, rows, 8, frames);
    ds.add_element_with_vr(tags::PIXEL_DATA, VR::OB).unwrap();
    ds.get_ob_mut(tags::PIXEL_DATA)
        .unwrap()
        .unwrap()
        .set_values(pixels)
        .unwrap();
    ds
}

fn encapsulated(frames: i32, fragments: &[Vec<u8>], offsets: Option<&[u32]>) -> Dataset {
    let mut ds = Dataset::new(RLE_LOSSLESS);
    image(&mut ds, 2, 2, 8, frames);
    let mut sequence =
        FragmentSequence::create(tags::PIXEL_DATA, VR::OB, 0, Endianness::Little);
    if let Some(offsets) = offsets {
        sequence.set_offset_table(offsets);
    }
    for fragment in fragments {
        sequence.add_fragment(ByteBuffer::from_bytes(fragment.clone(), Endianness::Little));
    }
    ds.add_item(sequence).unwrap();
    ds
}

#[test]
fn flat_frames_do_not_overlap() {
    let pixels: Vec<u8> = (0..32).collect();
    let ds = native(4, 4, 2, &pixels);
    let pixel_data = ds.pixel_data().unwrap();

    assert_eq!(pixel_data.number_of_frames(), 2);
    assert!(!pixel_data.is_fragmented());
    assert_eq!(pixel_data.frame_size(1).unwrap(), 16);
    assert_eq!(pixel_data.frame_data_u8(0).unwrap(), pixels[..16].to_vec());
    assert_eq!(pixel_data.frame_data_u8(1).unwrap(), pixels[16..].to_vec());
    assert!(pixel_data.frame_data_u8(2).is_err());
}

#[test]
fn short_pixel_data_is_reported() {
    let ds = native(4, 4, 2, &[0; 20]);
    let pixel_data = ds.pixel_data().unwrap();
    assert!(pixel_data.frame_data_u8(0).is_ok());
    assert!(matches!(
        pixel_data.frame_data_u8(1),
        Err(dcm_pixeldata::Error::InsufficientData {
            frame: 1,
            needed: 32,
            available: 20,
            ..
        })
    ));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn one_fragment_per_frame(#[case] frame: u32) {
    let fragments = vec![vec![10, 11], vec![20, 21, 22, 23], vec![30, 31]];
    let ds = encapsulated(3, &fragments, None);
    let pixel_data = ds.pixel_data().unwrap();

    let found = pixel_data.frame_fragments(frame).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].bytes().unwrap(),
        fragments[frame as usize].as_slice()
    );
    assert_eq!(
        pixel_data.frame_data_u8(frame).unwrap(),
        fragments[frame as usize]
    );
}

#[test]
fn equal_fragments_are_partitioned_per_frame() {
    // this layout used to hand every fragment to every frame
    let fragments: Vec<Vec<u8>> = (0..4).map(|i| vec![i; 2]).collect();
    let ds = encapsulated(2, &fragments, None);
    let pixel_data = ds.pixel_data().unwrap();
    assert_eq!(pixel_data.frame_data_u8(0).unwrap(), vec![0, 0, 1, 1]);
    assert_eq!(pixel_data.frame_data_u8(1).unwrap(), vec![2, 2, 3, 3]);
    assert_eq!(pixel_data.frame_size(1).unwrap(), 4);
}

#[test]
fn inconsistent_offset_table_falls_back() {
    let fragments = vec![vec![1, 1, 1, 1], vec![2, 2], vec![3, 3, 3, 3], vec![4, 4]];
    let ds = encapsulated(2, &fragments, Some(&[0, 7]));
    let pixel_data = ds.pixel_data().unwrap();
    assert_eq!(pixel_data.frame_data_u8(1).unwrap(), vec![3, 3, 3, 3, 4, 4]);

    let ds = encapsulated(2, &fragments, Some(&[0, 22]));
    let pixel_data = ds.pixel_data().unwrap();
    assert_eq!(pixel_data.frame_data_u8(1).unwrap(), vec![3, 3, 3, 3, 4, 4]);
}

#[rstest]
#[case(1, b"abc".to_vec(), "900150983CD24FB0D6963F7D28E17F72")]
#[case(2, b"abcdef".to_vec(), "E80B5017098950FC58AAD83C8C14978E")]
fn md5_covers_every_frame(#[case] frames: i32, #[case] pixels: Vec<u8>, #[case] digest: &str) {
    let ds = native(3, 1, frames, &pixels);
    assert_eq!(ds.compute_pixel_data_md5().unwrap(), digest);
}

#[test]
fn missing_pixel_data() {
    let mut ds = Dataset::default();
    image(&mut ds, 2, 2, 8, 1);
    assert!(matches!(
        ds.pixel_data(),
        Err(dcm_pixeldata::Error::MissingPixelData { .. })
    ));
}

#[test]
fn frames_written_back_into_a_dataset() {
    let source = native(2, 2, 1, &[1, 2, 3, 4]);
    let old = source.pixel_data().unwrap();

    let mut pixel_data = PixelData::with_template(EXPLICIT_VR_LITTLE_ENDIAN, &old).unwrap();
    pixel_data.add_frame(&[1, 2, 3, 4]).unwrap();
    pixel_data.add_frame(&[5, 6, 7, 8]).unwrap();

    let mut target = Dataset::new(EXPLICIT_VR_LITTLE_ENDIAN);
    pixel_data.update_dataset(&mut target).unwrap();
    assert_eq!(target.get_i32(tags::NUMBER_OF_FRAMES, 0).unwrap(), 2);
    assert_eq!(target.get_u16(tags::BITS_ALLOCATED, 0).unwrap(), 8);
    assert_eq!(target.get_f64(tags::RESCALE_SLOPE, 0.).unwrap(), 1.);
    assert!(!target.contains(tags::LOSSY_IMAGE_COMPRESSION));

    let reread = target.pixel_data().unwrap();
    assert_eq!(reread.frame_data_u8(1).unwrap(), vec![5, 6, 7, 8]);
}

#[test]
fn failed_frame_is_not_counted() {
    let mut ds = Dataset::new(EXPLICIT_VR_LITTLE_ENDIAN);
    image(&mut ds, 2, 2, 8, 1);
    let source = Arc::new(FileSource::new("pixels.raw"));
    let buffer = ByteBuffer::deferred(Segment::new(source, 0, 4), Endianness::Little);
    ds.add_item(Element::create(tags::PIXEL_DATA, VR::OB, 0, buffer).unwrap())
        .unwrap();

    let mut pixel_data = ds.pixel_data().unwrap();
    assert!(pixel_data.add_frame(&[1, 2, 3, 4]).is_err());
    assert_eq!(pixel_data.number_of_frames(), 1);
}

#[test]
fn lossy_history_is_appended() {
    let old = native(2, 2, 1, &[1, 2, 3, 4]).pixel_data().unwrap();
    let mut pixel_data = PixelData::with_template(EXPLICIT_VR_LITTLE_ENDIAN, &old).unwrap();
    pixel_data.add_frame(&[1, 2, 3, 4]).unwrap();
    let attributes = pixel_data.attributes_mut();
    attributes.lossy = true;
    attributes.lossy_method = "ISO_14495_1".to_string();
    attributes.lossy_ratio = "2".to_string();

    let mut target = Dataset::new(EXPLICIT_VR_LITTLE_ENDIAN);
    target
        .add_element_with_value(tags::LOSSY_IMAGE_COMPRESSION_METHOD, "ISO_10918_1")
        .unwrap();
    target
        .add_element_with_value_string(tags::LOSSY_IMAGE_COMPRESSION_RATIO, "10")
        .unwrap();

    // writing the same history twice does not repeat it
    for _ in 0..2 {
        pixel_data.update_dataset(&mut target).unwrap();
        assert_eq!(
            target
                .get_string_array(tags::LOSSY_IMAGE_COMPRESSION_METHOD, &[])
                .unwrap(),
            vec!["ISO_10918_1", "ISO_14495_1"]
        );
        assert_eq!(
            target
                .get_string_array(tags::LOSSY_IMAGE_COMPRESSION_RATIO, &[])
                .unwrap(),
            vec!["10", "2"]
        );
    }
    assert_eq!(target.get_string(tags::LOSSY_IMAGE_COMPRESSION, "").unwrap(), "01");
}
