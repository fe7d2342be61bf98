use byteorder::{BigEndian, WriteBytesExt};
use clonecheck_core::align::align;
use clonecheck_core::io::decode_base_calls;
use clonecheck_core::seq::circular::rotate;
use clonecheck_core::seq::{shift_features, translate, translate_strict, Feature, FeatureLocation, Strand};
use clonecheck_core::{
    verify_clone, verify_orf, CheckError, CloneStatus, CloneVerifyParams, OrfSearchParams,
    OrfStatus, ReferenceSequence, SequencingRead,
};

const PLASMID: &str = concat!(
    "TTGACAGCTAGCTCAGTCCTAGG",
    "ATGGCCAAAGAACTGTGGCGCACCTAA",
    "GGATCCGAATTC",
    "ATGAGCGCCGATTTTCAGGAAAAATGA",
    "CTCGAGCACCACTGA",
);

fn cds(name: &str, start: usize, end: usize) -> Feature {
    Feature::new(name, "CDS", FeatureLocation::new(start, end, Strand::Plus).unwrap())
}

#[test]
fn translation_drops_partial_codon_and_keeps_internal_stops() {
    assert_eq!(translate(b"ATGGCC", 0).unwrap(), b"MA");
    assert_eq!(translate(b"ATGGCCTG", 0).unwrap(), b"MA");
    assert_eq!(translate_strict(b"ATGTAAGCC").unwrap(), b"M*A");
    assert_eq!(translate(b"ATG", 3), Err(CheckError::InvalidFrame { frame: 3 }));
}

#[test]
fn orf_found_across_origin() {
    let orf = "ATGAAATGGCTG";
    let reference = format!("{}{}{}", &orf[11..], "C".repeat(18), &orf[..11]);
    assert_eq!(reference.len(), 30);
    let report = verify_orf("wrap", &reference, "MKWL", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    let hit = report.placement().unwrap();
    assert!(hit.wraps);
    assert_eq!(hit.length % 3, 0);
}

#[test]
fn two_copies_are_indeterminate() {
    let core = "ATGAAAACCGCCTATATTGCCAAACAGCGT";
    let reference = format!("CCCC{core}CCCCCC{core}CCCC");
    let report = verify_orf("dup", &reference, "MKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Indeterminate);
    assert_ne!(report.status, OrfStatus::Verified);
}

#[test]
fn self_alignment_is_perfect() {
    let seq = PLASMID.as_bytes();
    let res = align(seq, seq, None);
    assert_eq!(res.identity, 1.0);
    assert!(!res.has_differences());
    assert_eq!(res.aligned_expected, PLASMID);
    assert_eq!(res.aligned_observed, PLASMID);
}

#[test]
fn clean_deletion_is_one_gap() {
    let res = align(b"ACGTACGTACGT", b"ACGTACGT", None);
    assert!(res.insertions.is_empty());
    assert_eq!(res.deletions.len(), 1);
    assert_eq!(res.deletions[0].length, 4);
}

#[test]
fn frameshift_outranks_substitution() {
    let mut read: Vec<u8> = PLASMID.bytes().collect();
    read.remove(42);
    read[68] = b'T';
    let read = SequencingRead::new("read", std::str::from_utf8(&read).unwrap()).unwrap();
    let reference = ReferenceSequence::new("pTest", PLASMID)
        .unwrap()
        .with_features([cds("cdsA", 24, 50), cds("cdsB", 63, 89)]);
    let params = CloneVerifyParams::default().with_max_mismatches(1);
    let report = verify_clone(&reference, &read, &params).unwrap();
    assert_eq!(report.status, CloneStatus::Frameshift);
    assert!(!report.is_pass());
    assert!(report.deletions[0].causes_frameshift);
}

#[test]
fn rotation_round_trips() {
    let seq = PLASMID.as_bytes();
    let len = seq.len();
    let features = vec![cds("cdsA", 24, 50), cds("cdsB", 63, 89)];
    assert_eq!(rotate(seq, 0), seq);
    assert_eq!(shift_features(&features, 0, len), features);
    for start in [1, 23, 62, 103] {
        assert_eq!(rotate(&rotate(seq, start), len - start), seq);
        let shifted = shift_features(&features, start, len);
        assert_eq!(shift_features(&shifted, len - start, len), features);
    }
}

fn minimal_trace(tag_number: u32) -> Vec<u8> {
    let mut data = b"ABIF".to_vec();
    data.write_u16::<BigEndian>(101).unwrap();
    // root entry: one directory entry stored at byte 34
    data.extend_from_slice(b"tdir");
    data.write_u32::<BigEndian>(1).unwrap();
    data.write_u16::<BigEndian>(1023).unwrap();
    data.write_u16::<BigEndian>(28).unwrap();
    data.write_u32::<BigEndian>(1).unwrap();
    data.write_u32::<BigEndian>(28).unwrap();
    data.write_u32::<BigEndian>(34).unwrap();
    data.write_u32::<BigEndian>(0).unwrap();
    // PBAS entry with its four bytes inline
    data.extend_from_slice(b"PBAS");
    data.write_u32::<BigEndian>(tag_number).unwrap();
    data.write_u16::<BigEndian>(2).unwrap();
    data.write_u16::<BigEndian>(1).unwrap();
    data.write_u32::<BigEndian>(4).unwrap();
    data.write_u32::<BigEndian>(4).unwrap();
    data.extend_from_slice(b"ACGT");
    data.write_u32::<BigEndian>(0).unwrap();
    data
}

#[test]
fn trace_decoding() {
    let data = minimal_trace(1);
    assert_eq!(data.len(), 62);
    assert_eq!(decode_base_calls(&data).unwrap(), "ACGT");

    let mut bad = data.clone();
    bad[..4].copy_from_slice(b"FIBA");
    assert!(matches!(
        decode_base_calls(&bad),
        Err(CheckError::InvalidFormat { .. })
    ));

    assert_eq!(
        decode_base_calls(&minimal_trace(2)),
        Err(CheckError::MissingBaseCalls)
    );
}

#[test]
fn read_from_trace() {
    let read = SequencingRead::from_trace("ab1", &minimal_trace(1)).unwrap();
    assert_eq!(read.sequence(), b"ACGT");
    assert_eq!(read.name(), "ab1");
}

#[cfg(feature = "serde")]
#[test]
fn reports_serialize_with_wire_names() {
    let reference = ReferenceSequence::new("pTest", PLASMID)
        .unwrap()
        .with_features([cds("cdsA", 24, 50)]);
    let read = SequencingRead::new("read", PLASMID).unwrap();
    let report = verify_clone(&reference, &read, &CloneVerifyParams::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "perfect");
    assert_eq!(json["orientation"], "forward");

    let orf = verify_orf("miss", PLASMID, "WWWWW", &OrfSearchParams::default()).unwrap();
    let json = serde_json::to_value(&orf).unwrap();
    assert_eq!(json["status"], "not-found");
}

#[cfg(feature = "serde")]
#[test]
fn deserialized_zero_start_is_rejected() {
    let feature: Feature = serde_json::from_value(serde_json::json!({
        "name": "cdsA",
        "feature_type": "CDS",
        "location": { "start": 0, "end": 50, "strand": "plus" },
    }))
    .unwrap();
    let reference = ReferenceSequence::new("pTest", PLASMID)
        .unwrap()
        .with_feature(feature);
    let read = SequencingRead::new("read", PLASMID).unwrap();
    assert_eq!(
        verify_clone(&reference, &read, &CloneVerifyParams::default()),
        Err(CheckError::InvalidLocation {
            start: 0,
            end: 50,
            len: 104
        })
    );
}
