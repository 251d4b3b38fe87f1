use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use dcm_core::chrono::NaiveDate;
use dcm_core::{Tag, Uid, VR};
use dcm_dictionary_std::tags;
use dcm_encoding::buffer::{FileSource, Segment};
use dcm_encoding::{ByteBuffer, Endianness, SpecificCharacterSet, WriteOptions};
use dcm_object::element::ElementFamily;
use dcm_object::{uid, Dataset, Element, Sequence, SequenceItem, ValueObject};
use dcm_transfer_syntax_registry::entries::{EXPLICIT_VR_BIG_ENDIAN, EXPLICIT_VR_LITTLE_ENDIAN};

fn item_with_uid(tag: Tag, uid: &str) -> SequenceItem {
    let mut item = SequenceItem::new();
    item.dataset_mut().add_element_with_value(tag, uid).unwrap();
    item
}

#[test]
fn patient_scenario_with_utf8() {
    let mut ds = Dataset::default();
    ds.add_element_with_value(tags::PATIENT_NAME, "Doe^John")
        .unwrap();
    ds.add_element_with_value_string(tags::STUDY_DATE, "20230615")
        .unwrap();

    assert_eq!(ds.get_string(tags::PATIENT_NAME, "").unwrap(), "Doe^John");
    let default = NaiveDate::from_ymd_opt(1900, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(
        ds.get_datetime(tags::STUDY_DATE, default).unwrap(),
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );

    ds.set_charset(SpecificCharacterSet::IsoIr192).unwrap();
    assert_eq!(
        ds.get_string(tags::SPECIFIC_CHARACTER_SET, "").unwrap(),
        "ISO_IR 192"
    );
    assert_eq!(ds.charset().unwrap(), SpecificCharacterSet::IsoIr192);
    assert_eq!(ds.get_string(tags::PATIENT_NAME, "").unwrap(), "Doe^John");

    // new text elements follow the declared character set
    ds.add_element_with_value(tags::PATIENT_NAME, "Müller^Jürgen")
        .unwrap();
    let pn = ds.get_pn(tags::PATIENT_NAME).unwrap().unwrap();
    assert_eq!(pn.family_name().unwrap(), "Müller");
    assert_eq!(pn.raw().length() % 2, 0);
}

#[test]
fn write_length_counts_one_group_length_per_group() {
    let mut ds = Dataset::default();
    ds.add_element_with_value(tags::SOP_INSTANCE_UID, "1.2.3.4")
        .unwrap();
    ds.add_element_with_value(tags::MODALITY, "CT").unwrap();
    ds.add_element_with_value(tags::PATIENT_NAME, "Doe^Jane")
        .unwrap();
    ds.add_element_with_value(tags::ROWS, 4_u16).unwrap();
    ds.add_element_with_value(tags::COLUMNS, 4_u16).unwrap();

    let elements: u32 = ds
        .iter()
        .map(|item| item.write_length(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::none()))
        .sum();
    assert_eq!(elements, (8 + 8) + (8 + 2) + (8 + 8) + (8 + 2) + (8 + 2));
    assert_eq!(
        ds.write_length(&EXPLICIT_VR_LITTLE_ENDIAN, WriteOptions::default()),
        elements + 3 * 12
    );
}

#[test]
fn items_enumerate_in_tag_order() {
    let mut ds = Dataset::default();
    for tag in &[
        tags::ROWS,
        tags::PATIENT_NAME,
        tags::SPECIFIC_CHARACTER_SET,
        tags::PIXEL_DATA,
        tags::MODALITY,
        tags::COLUMNS,
    ] {
        ds.add_element(*tag).unwrap();
    }
    let tags: Vec<Tag> = ds.tags().collect();
    assert!(tags.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(tags.len(), 6);
}

#[test]
fn second_insert_wins() {
    let mut ds = Dataset::default();
    ds.add_element_with_value(tags::MODALITY, "CT").unwrap();
    let mut replacement = Element::new(tags::MODALITY, VR::CS).unwrap();
    replacement.set_value_string("MR").unwrap();
    ds.add_item(replacement).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.get_string(tags::MODALITY, "").unwrap(), "MR");
}

#[test]
fn replace_uid_reaches_nested_references() {
    let old = "1.2.3.100";
    let mut ds = Dataset::default();
    ds.add_element_with_value(tags::SOP_INSTANCE_UID, old)
        .unwrap();

    let mut sq = Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE);
    sq.add_item(item_with_uid(tags::REFERENCED_SOP_INSTANCE_UID, old));
    sq.add_item(item_with_uid(tags::REFERENCED_SOP_INSTANCE_UID, "1.2.3.200"));
    let mut nested = item_with_uid(tags::REFERENCED_SOP_CLASS_UID, "1.2.840.10008.5.1.4.1.1.2");
    let mut deeper = Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE);
    deeper.add_item(item_with_uid(tags::REFERENCED_SOP_INSTANCE_UID, old));
    nested.dataset_mut().add_item(deeper).unwrap();
    sq.add_item(nested);
    ds.add_item(sq).unwrap();

    let new = Uid::unknown("1.2.3.999");
    ds.replace_uid(tags::SOP_INSTANCE_UID, &new).unwrap();

    assert_eq!(ds.get_uid(tags::SOP_INSTANCE_UID).unwrap(), Some(new));
    let references: Vec<String> = ds
        .search(tags::REFERENCED_SOP_INSTANCE_UID)
        .map(|e| e.value_string().unwrap())
        .collect();
    assert_eq!(references, vec!["1.2.3.999", "1.2.3.200", "1.2.3.999"]);
    assert_eq!(ds.search(tags::REFERENCED_SOP_CLASS_UID).count(), 1);
}

#[test]
fn replace_all_sets_every_match() {
    let mut ds = Dataset::default();
    let mut sq = Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE);
    sq.add_item(item_with_uid(tags::REFERENCED_SOP_INSTANCE_UID, "1.1"));
    sq.add_item(item_with_uid(tags::REFERENCED_SOP_INSTANCE_UID, "1.2"));
    ds.add_item(sq).unwrap();

    ds.replace_all(
        tags::REFERENCED_SOP_INSTANCE_UID,
        &ValueObject::from("9.9"),
    )
    .unwrap();
    assert!(ds
        .search(tags::REFERENCED_SOP_INSTANCE_UID)
        .all(|e| e.value_string().unwrap() == "9.9"));
}

#[test]
fn numeric_values_survive_endian_round_trip() {
    let mut ds = Dataset::default();
    ds.add_element_with_vr(tags::PIXEL_DATA, VR::OW).unwrap();
    let ow = ds.get_ow_mut(tags::PIXEL_DATA).unwrap().unwrap();
    ow.set_values(&[0x0102, 0x0304, 0xFFFE]).unwrap();
    ds.add_element_with_vr(tags::FRAME_INCREMENT_POINTER, VR::AT)
        .unwrap()
        .set_value_object(&ValueObject::Tag(tags::NUMBER_OF_FRAMES))
        .unwrap();

    ds.set_internal_transfer_syntax(&EXPLICIT_VR_BIG_ENDIAN)
        .unwrap();
    let ow = ds.get_ow(tags::PIXEL_DATA).unwrap().unwrap();
    assert_eq!(ow.raw().buffer().bytes().unwrap()[..2], [0x01, 0x02]);
    assert_eq!(ow.values().unwrap(), vec![0x0102, 0x0304, 0xFFFE]);

    ds.set_internal_transfer_syntax(&EXPLICIT_VR_LITTLE_ENDIAN)
        .unwrap();
    let ow = ds.get_ow(tags::PIXEL_DATA).unwrap().unwrap();
    assert_eq!(ow.raw().buffer().bytes().unwrap()[..2], [0x02, 0x01]);
    assert_eq!(ow.values().unwrap(), vec![0x0102, 0x0304, 0xFFFE]);
    assert_eq!(
        ds.get_tag_value(tags::FRAME_INCREMENT_POINTER).unwrap(),
        Some(tags::NUMBER_OF_FRAMES)
    );
}

#[test]
fn values_are_padded_to_even_length() {
    let mut ds = Dataset::default();
    ds.add_element_with_value(tags::MODALITY, "MRI").unwrap();
    ds.add_element_with_value(tags::SOP_INSTANCE_UID, "1.2.3")
        .unwrap();
    ds.add_element_with_value(tags::PATIENT_WEIGHT, 70.25_f64)
        .unwrap();
    ds.add_element_with_vr(tags::PIXEL_DATA, VR::OB)
        .unwrap()
        .set_value_object(&ValueObject::U8(7))
        .unwrap();
    for item in ds.iter() {
        let element = item.as_element().unwrap();
        assert_eq!(element.length() % 2, 0, "odd length in {}", element.tag());
    }
    // padding is not part of the value
    assert_eq!(ds.get_string(tags::MODALITY, "").unwrap(), "MRI");
    assert_eq!(ds.get_string(tags::SOP_INSTANCE_UID, "").unwrap(), "1.2.3");
}

#[test]
fn concurrent_uids_are_distinct_and_ordered() {
    let generator = Arc::new(dcm_object::UidGenerator::new("1.2.826.0.1.3680043.2.1143"));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            std::thread::spawn(move || {
                (0..125)
                    .map(|_| generator.generate().uid().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        let uids = handle.join().unwrap();
        let suffixes: Vec<u64> = uids
            .iter()
            .map(|u| u.rsplit('.').next().unwrap().parse().unwrap())
            .collect();
        // each caller observes increasing stamps
        assert!(suffixes.windows(2).all(|pair| pair[0] < pair[1]));
        all.extend(uids);
    }
    assert_eq!(all.len(), 1000);
    assert!(all
        .iter()
        .all(|u| u.starts_with("1.2.826.0.1.3680043.2.1143.")));
    let distinct: HashSet<&String> = all.iter().collect();
    assert_eq!(distinct.len(), 1000);

    assert_ne!(uid::generate(), uid::generate());
}

#[test]
fn deferred_values_load_on_request() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0xAA, 0xBB, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00])
        .unwrap();
    file.flush().unwrap();

    let source = Arc::new(FileSource::new(file.path()));
    let segment = Segment::new(source, 2, 6);
    let buffer = ByteBuffer::deferred(segment, Endianness::Little);
    let element = Element::create(tags::PIXEL_DATA, VR::OW, 2, buffer).unwrap();

    let mut ds = Dataset::default();
    ds.add_item(element).unwrap();
    let ow = ds.get_ow(tags::PIXEL_DATA).unwrap().unwrap();
    assert_eq!(ow.raw().length(), 6);
    assert!(ow.values().is_err());

    ds.preload_deferred_buffers().unwrap();
    let ow = ds.get_ow(tags::PIXEL_DATA).unwrap().unwrap();
    assert_eq!(ow.values().unwrap(), vec![1, 2, 3]);

    ds.unload_deferred_buffers();
    let ow = ds.get_ow(tags::PIXEL_DATA).unwrap().unwrap();
    assert!(ow.raw().buffer().is_deferred());
}
