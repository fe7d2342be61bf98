use super::*;
use crate::alphabets::dna::reverse_complement;

const CORE: &str = "ATGAAAACCGCCTATATTGCCAAACAGCGT"; // MKTAYIAKQR

fn wrapped_reference() -> String {
    // MKWL coding on 20..=30 with its last base at position 1.
    let orf = "ATGAAATGGCTG";
    format!("{}{}{}", &orf[11..], "C".repeat(18), &orf[..11])
}

#[test]
fn verifies_single_placement() {
    let reference = format!("CCCC{CORE}CCCCCC");
    let report = verify_orf("demo", &reference, "MKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    assert!(report.reason.is_none());
    let hit = report.placement().unwrap();
    assert_eq!(hit.strand, Strand::Plus);
    assert_eq!(hit.frame, 1);
    assert_eq!((hit.start, hit.end), (5, 34));
    assert!(!hit.wraps);
    assert_eq!(hit.length, 30);
    assert_eq!(hit.coding_sequence, CORE);
    assert_eq!(report.amino_acid_identity, Some(1.0));
    assert_eq!(report.nucleotide_identity, Some(1.0));

    let variant = report.variant.unwrap();
    assert_eq!(variant.query, "MKTAYIAKQR");
    assert_eq!(variant.codon_table.len(), 10);
    assert_eq!(variant.codon_table[0].codon, "ATG");
    assert_eq!(variant.codon_table[0].residue, 'M');
    assert_eq!(variant.components.len(), 1);
    assert_eq!(variant.components[0].name, "demo core");
    assert_eq!(variant.components[0].kind, ComponentKind::Core);
    assert_eq!(variant.components[0].nt_range, 0..30);
}

#[test]
fn finds_orf_through_origin() {
    let reference = wrapped_reference();
    assert_eq!(reference.len(), 30);
    let report = verify_orf("wrap", &reference, "MKWL", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    let hit = report.placement().unwrap();
    assert!(hit.wraps);
    assert_eq!((hit.start, hit.end), (20, 1));
    assert_eq!(hit.length % 3, 0);
    assert_eq!(hit.coding_sequence, "ATGAAATGGCTG");
}

#[test]
fn finds_orf_on_minus_strand() {
    let reference = String::from_utf8(reverse_complement(wrapped_reference().as_bytes())).unwrap();
    let report = verify_orf("rev", &reference, "MKWL", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    let hit = report.placement().unwrap();
    assert_eq!(hit.strand, Strand::Minus);
    assert!(hit.wraps);
    assert_eq!((hit.start, hit.end), (11, 30));
}

#[test]
fn duplicate_copies_are_indeterminate() {
    let reference = format!("CCCC{CORE}CCCCCC{CORE}CCCC");
    let report = verify_orf("dup", &reference, "MKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Indeterminate);
    assert_eq!(report.candidates.len(), 2);
    assert!(report.placement().is_none());
    assert!(report.variant.is_none());
    assert_eq!(
        report.reason.as_deref(),
        Some("multiple placements detected (2 matches)")
    );
}

#[test]
fn absent_query_is_not_found() {
    let reference = format!("CCCC{CORE}CCCCCC");
    let report = verify_orf("miss", &reference, "MWWWW", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::NotFound);
    assert_eq!(report.reason.as_deref(), Some("no amino-acid matches found"));
    assert!(report.candidates.is_empty());
}

#[test]
fn query_longer_than_reference_is_not_found() {
    let report = verify_orf("long", "ATGAAA", "MKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::NotFound);
}

#[test]
fn alternative_start_codons() {
    let reference = format!("CCCCGTG{}CCCCCC", &CORE[3..]);
    let strict = verify_orf("alt", &reference, "VKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(strict.status, OrfStatus::NotFound);

    let params = OrfSearchParams::default().with_alt_start(true);
    let relaxed = verify_orf("alt", &reference, "VKTAYIAKQR", &params).unwrap();
    assert_eq!(relaxed.status, OrfStatus::Verified);
    assert_eq!(relaxed.placement().map(|h| h.start), Some(5));
}

#[test]
fn internal_start_codon_rejected_on_request() {
    let reference = "CCCCATGAAAATGGCCTATATTGCCAAACAGCGTCCCCCC";
    let lenient = verify_orf("met", reference, "MKMAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(lenient.status, OrfStatus::Verified);

    let params = OrfSearchParams::default().with_disallow_internal_met(true);
    let strict = verify_orf("met", reference, "MKMAYIAKQR", &params).unwrap();
    assert_eq!(strict.status, OrfStatus::NotFound);
}

#[test]
fn mismatch_tolerance() {
    let reference = format!("CCCC{CORE}CCCCCC");
    let exact = verify_orf("mm", &reference, "MKTAYIAKQW", &OrfSearchParams::default()).unwrap();
    assert_eq!(exact.status, OrfStatus::NotFound);

    let params = OrfSearchParams::default()
        .with_min_identity(0.9)
        .with_max_mismatches(1);
    let report = verify_orf("mm", &reference, "MKTAYIAKQW", &params).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    assert_eq!(
        report.discrepancies(),
        &[Discrepancy {
            position: 10,
            expected: 'W',
            observed: 'R'
        }]
    );
    assert!((report.amino_acid_identity.unwrap() - 0.9).abs() < 1e-12);
    assert_eq!(report.variant.unwrap().observed_residues, "MKTAYIAKQR");
}

#[test]
fn detects_flanking_tags() {
    // His6 in frame before the query, GGGGS after it.
    let reference = format!("CCCATCACCATCACCATCAC{CORE}GGTGGCGGTGGCAGCCCCC");
    let report = verify_orf("tagged", &reference, "MKTAYIAKQR", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
    let hit = report.placement().unwrap();
    assert_eq!(hit.start, 21);
    let ids: Vec<_> = hit.tags.iter().map(|t| (t.terminus, t.id.as_str())).collect();
    assert_eq!(ids, vec![(Terminus::N, "his6"), (Terminus::C, "ggggs")]);

    let components = report.variant.unwrap().components;
    let names: Vec<_> = components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Auto-detected N-terminal: His6",
            "tagged core",
            "Auto-detected C-terminal: GGGGS"
        ]
    );
    assert_eq!(components[2].kind, ComponentKind::Linker);
}

#[test]
fn sanitizes_before_search() {
    let reference = format!("cccc {}\n cccccc", CORE.to_lowercase());
    let report = verify_orf("clean", &reference, "mktay iakqr", &OrfSearchParams::default()).unwrap();
    assert_eq!(report.status, OrfStatus::Verified);
}

#[test]
fn malformed_input_is_an_error() {
    let params = OrfSearchParams::default();
    assert_eq!(
        verify_orf("x", "ACGNAC", "M", &params),
        Err(CheckError::AmbiguousBase { pos: 3 })
    );
    assert!(matches!(
        verify_orf("x", "ACGTAC", "MB", &params),
        Err(CheckError::InvalidChar { ch: 'B', .. })
    ));
    assert_eq!(
        verify_orf("x", "", "M", &params),
        Err(CheckError::EmptySequence { what: "reference" })
    );
    assert_eq!(
        verify_orf("x", "ACGT", "  ", &params),
        Err(CheckError::EmptySequence { what: "query" })
    );
    let bad = OrfSearchParams::default().with_min_identity(1.5);
    assert!(matches!(
        verify_orf("x", "ACGT", "M", &bad),
        Err(CheckError::InvalidParameter { .. })
    ));
}

#[test]
fn identity_of_empty_query_is_one() {
    let (identity, discrepancies) = compute_identity(b"", b"");
    assert_eq!(identity, 1.0);
    assert!(discrepancies.is_empty());
}
