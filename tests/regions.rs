extern crate pamvar;
extern crate tempfile;

use std::fs;

use pamvar::guide::Span;
use pamvar::regions::Regions;

#[test]
fn test_regions_are_merged() {
    let mut regions = Regions::new();
    regions.add("chr1", 30, 40);
    regions.add("chr1", 10, 20);
    regions.add("chr1", 15, 25);
    regions.add("chr1", 25, 28);
    regions.add("chr1", 50, 50);
    regions.merge();

    assert_eq!(regions.get("chr1"), &[Span::new(11, 28), Span::new(31, 40)]);
    assert_eq!(regions.len(), 2);
}

#[test]
fn test_region_coordinates() {
    let mut regions = Regions::new();
    regions.add("chr1", 10, 20);
    regions.merge();

    assert!(!regions.contains("chr1", 10));
    assert!(regions.contains("chr1", 11));
    assert!(regions.contains("chr1", 20));
    assert!(!regions.contains("chr1", 21));
    assert!(!regions.contains("chr2", 15));
}

#[test]
fn test_region_chromosome_prefix() {
    let mut regions = Regions::new();
    regions.add("1", 10, 20);
    regions.add("chrX", 0, 5);
    regions.merge();

    assert!(regions.contains("chr1", 15));
    assert!(regions.contains("X", 1));
    assert!(regions.get("2").is_empty());
    assert_eq!(regions.chromosomes(), vec!["1", "chrX"]);
}

#[test]
fn test_read_bed() {
    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("regions.bed");
    fs::write(
        &filename,
        "chr1\t10\t20\tgene1\nchr1\t100\t200\tgene2\nchr2\t0\t50\tgene3\n",
    )
    .unwrap();

    let regions = Regions::read(&filename).unwrap();

    assert_eq!(regions.len(), 3);
    assert_eq!(regions.get("chr1"), &[Span::new(11, 20), Span::new(101, 200)]);
    assert!(regions.contains("chr2", 1));
}
