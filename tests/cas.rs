extern crate pamvar;

use pamvar::cas::{CasProfile, Orientation};
use pamvar::errors::ErrorKind;

fn complement(nuc: u8) -> u8 {
    match nuc {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        other => other,
    }
}

#[test]
fn test_cas_lookup_is_case_insensitive() {
    assert_eq!(CasProfile::get("spcas9").map(|v| v.name), Some("SpCas9"));
    assert_eq!(CasProfile::get("SPCAS9").map(|v| v.name), Some("SpCas9"));
    assert_eq!(CasProfile::get("Cpf1").map(|v| v.name), Some("cpf1"));
    assert_eq!(CasProfile::get("sacas9_kkh").map(|v| v.name), Some("SaCas9_KKH"));
}

#[test]
fn test_cas_unknown() {
    assert_eq!(CasProfile::get("Cas7"), None);
    assert_eq!(CasProfile::get(""), None);

    match CasProfile::lookup("Cas7") {
        Err(err) => match err.kind() {
            ErrorKind::UnknownNuclease(name) => assert_eq!(name, "Cas7"),
            kind => panic!("unexpected error {:?}", kind),
        },
        Ok(_) => panic!("lookup of unknown nuclease succeeded"),
    }
}

#[test]
fn test_cas_registry() {
    let profiles = CasProfile::all();

    assert_eq!(profiles.len(), 12);
    for cas in &profiles {
        assert_eq!(cas.guide_length, 20);
        assert_eq!(cas.forward_pattern.len(), cas.pam_length(), "{}", cas.name);
        assert_eq!(cas.reverse_pattern.len(), cas.pam_length(), "{}", cas.name);
    }
}

#[test]
fn test_cas_reverse_patterns_are_reverse_complements() {
    for cas in CasProfile::all() {
        let expected: Vec<u8> = cas.forward_pattern.iter().rev().map(|&v| complement(v)).collect();

        assert_eq!(cas.reverse_pattern, &expected[..], "{}", cas.name);
    }
}

#[test]
fn test_cas_orientation() {
    for cas in CasProfile::all() {
        let expected = if cas.name == "cpf1" {
            Orientation::FivePrime
        } else {
            Orientation::ThreePrime
        };

        assert_eq!(cas.orientation, expected, "{}", cas.name);
    }
}

#[test]
fn test_parse_list_single_guide_length() {
    let profiles = CasProfile::parse_list("SpCas9, cpf1", &[23]).unwrap();
    let names: Vec<_> = profiles.iter().map(|v| (v.name, v.guide_length)).collect();

    assert_eq!(names, vec![("SpCas9", 23), ("cpf1", 23)]);
}

#[test]
fn test_parse_list_guide_length_per_nuclease() {
    let profiles = CasProfile::parse_list("SpCas9,cpf1", &[20, 24]).unwrap();
    let names: Vec<_> = profiles.iter().map(|v| (v.name, v.guide_length)).collect();

    assert_eq!(names, vec![("SpCas9", 20), ("cpf1", 24)]);
}

#[test]
fn test_parse_list_default_guide_length() {
    let profiles = CasProfile::parse_list("SaCas9", &[]).unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].guide_length, 20);
}

#[test]
fn test_parse_list_all() {
    assert_eq!(CasProfile::parse_list("all", &[]).unwrap().len(), 12);
    assert_eq!(CasProfile::parse_list("ALL", &[21]).unwrap()[11].guide_length, 21);
}

#[test]
fn test_parse_list_errors() {
    assert!(CasProfile::parse_list("SpCas9,cpf1", &[20, 21, 22]).is_err());
    assert!(CasProfile::parse_list("SpCas9,Foo", &[]).is_err());
    assert!(CasProfile::parse_list("", &[]).is_err());
}

#[test]
fn test_index_extension() {
    let cas = CasProfile::lookup("SpCas9_VQR_1").unwrap();

    assert_eq!(cas.index_extension(), ".pamvar_spcas9_vqr_1");
}
