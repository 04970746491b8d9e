extern crate pamvar;
extern crate tempfile;

use std::fs;

use pamvar::annotation::Annotations;

#[test]
fn test_annotation_lookup() {
    let mut annotations = Annotations::new();
    annotations.insert("chr1", 100, "A", "T", "rs123", "0.25");

    assert_eq!(
        annotations.lookup("chr1", 100, "A", "T"),
        ("rs123".to_string(), "0.25".to_string())
    );
    assert_eq!(
        annotations.lookup("1", 100, "a", "t"),
        ("rs123".to_string(), "0.25".to_string())
    );
    assert_eq!(
        annotations.lookup("chr1", 100, "A", "G"),
        ("chr1:100:A:G".to_string(), "0".to_string())
    );
}

#[test]
fn test_read_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("annotations.tsv");
    fs::write(
        &filename,
        "chrom\tpos\tref\talt\trsid\taf\n1\t100\tA\tT\trs123\t0.25\n1\t200\tC\tCA\trs456\t0.01\n",
    )
    .unwrap();

    let annotations = Annotations::read(&filename).unwrap();

    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations.lookup("chr1", 200, "C", "CA").0, "rs456");
}

#[test]
fn test_read_invalid_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("annotations.tsv");
    fs::write(&filename, "1\t100\tA\tT\trs123\n").unwrap();

    assert!(Annotations::read(&filename).is_err());
}
